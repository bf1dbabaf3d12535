use crate::clock::TickClock;
use crate::config::GameConfig;
use crate::grid::{Cell, Dir};
use crate::input::DirectionBuffer;
use crate::snake::Snake;
use rand::Rng;
use std::time::Duration;

/// Direction the snake faces at the start of every round.
pub const START_DIR: Dir = Dir::PosX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    Paused,
    GameOver { since: Duration },
}

/// Discrete notifications produced by a tick, consumed by the renderer's
/// effect layer and the log. Fire-and-forget; nothing feeds back into the
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    FoodEaten { score: u32 },
    WallCollision,
    SelfCollision,
    GameOver { score: u32 },
    Reset,
}

#[derive(Debug, Default)]
pub struct TickResult {
    /// Whether a movement step actually ran this call.
    pub stepped: bool,
    pub events: Vec<TickEvent>,
}

/// One round of snake: the occupancy model, the input latch, the tick gate
/// and the score, owned together and mutated only through `tick` and the
/// input entry points. The driver loop calls `tick(now)` once per frame;
/// at most one movement step runs per call.
pub struct GameSession {
    config: GameConfig,
    status: Status,
    score: u32,
    snake: Snake,
    food: Cell,
    buffer: DirectionBuffer,
    clock: TickClock,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let snake = Snake::hatch(Cell::new(0, 0));
        let food = spawn_food(&snake, &config);
        let buffer = DirectionBuffer::new(START_DIR, config.debounce_duration());
        let clock = TickClock::new(config.start_interval);
        Self {
            config,
            status: Status::Idle,
            score: 0,
            snake,
            food,
            buffer,
            clock,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    /// Seconds per tick at the current difficulty.
    pub fn interval(&self) -> f32 {
        self.clock.interval()
    }

    pub fn half_extent(&self) -> i32 {
        self.config.half_extent
    }

    /// Offer a direction change from an input event. Starts the round when
    /// Idle; ignored entirely during GameOver. Returns whether the
    /// direction was accepted.
    pub fn request_direction(&mut self, dir: Dir, now: Duration) -> bool {
        match self.status {
            Status::GameOver { .. } => false,
            Status::Idle => {
                self.begin(now);
                self.buffer.request(dir, now)
            }
            Status::Running | Status::Paused => self.buffer.request(dir, now),
        }
    }

    /// Explicit start (Idle -> Running). Returns whether it transitioned.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.status == Status::Idle {
            self.begin(now);
            true
        } else {
            false
        }
    }

    /// Toggle Running <-> Paused. Returns whether anything changed.
    pub fn toggle_pause(&mut self, now: Duration) -> bool {
        match self.status {
            Status::Running => {
                self.status = Status::Paused;
                true
            }
            Status::Paused => {
                self.status = Status::Running;
                // Swallow the time spent paused instead of bursting.
                self.clock.rearm(now);
                true
            }
            _ => false,
        }
    }

    /// Advance the session to `now`. Runs at most one movement step, or the
    /// delayed GameOver -> Idle reset once `reset_delay` has elapsed.
    pub fn tick(&mut self, now: Duration) -> TickResult {
        let mut result = TickResult::default();
        match self.status {
            Status::Idle | Status::Paused => {}
            Status::GameOver { since } => {
                if now.saturating_sub(since) >= self.config.reset_delay_duration() {
                    self.reset_round();
                    result.events.push(TickEvent::Reset);
                }
            }
            Status::Running => {
                if self.clock.due(now) {
                    self.step(now, &mut result);
                }
            }
        }
        result
    }

    fn begin(&mut self, now: Duration) {
        self.status = Status::Running;
        self.clock.rearm(now);
    }

    fn step(&mut self, now: Duration, result: &mut TickResult) {
        result.stepped = true;
        self.clock.mark(now);

        let dir = self.buffer.commit();
        let new_head = self.snake.head().step(dir);

        if !self.in_bounds(new_head) {
            result.events.push(TickEvent::WallCollision);
            self.end_round(now, result);
            return;
        }

        let eating = new_head.distance(self.food) < self.config.eat_radius;
        // The tail vacates its cell this tick unless we grow, so stepping
        // into it only kills when eating.
        if self.snake.would_bite(new_head, !eating) {
            result.events.push(TickEvent::SelfCollision);
            self.end_round(now, result);
            return;
        }

        self.snake.advance(new_head, eating);
        if eating {
            self.score += self.config.points_per_food;
            self.clock
                .quicken(self.config.interval_step, self.config.min_interval);
            self.food = spawn_food(&self.snake, &self.config);
            result.events.push(TickEvent::FoodEaten { score: self.score });
        }
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x.abs() <= self.config.half_extent && cell.z.abs() <= self.config.half_extent
    }

    fn end_round(&mut self, now: Duration, result: &mut TickResult) {
        self.status = Status::GameOver { since: now };
        result.events.push(TickEvent::GameOver { score: self.score });
    }

    fn reset_round(&mut self) {
        self.score = 0;
        self.snake = Snake::hatch(Cell::new(0, 0));
        self.food = spawn_food(&self.snake, &self.config);
        self.buffer.rearm(START_DIR);
        self.clock.reset(self.config.start_interval);
        self.status = Status::Idle;
    }
}

/// Uniform rejection sampling over the food span, skipping occupied cells.
/// Terminates because the span vastly exceeds any practical snake length.
fn spawn_food(snake: &Snake, config: &GameConfig) -> Cell {
    let mut rng = rand::thread_rng();
    let range = config.food_range;
    loop {
        let cell = Cell::new(
            rng.gen_range(-range..=range),
            rng.gen_range(-range..=range),
        );
        if !snake.occupies(cell) {
            return cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const TICK: Duration = Duration::from_millis(250);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// A running session with the food parked out of the way.
    fn running() -> GameSession {
        let mut session = GameSession::new(GameConfig::default());
        session.start(Duration::ZERO);
        session.food = Cell::new(7, 7);
        session
    }

    /// Grow the snake along +X so the head ends at `(len - 1, 0)`.
    fn grow_line(session: &mut GameSession, len: usize) {
        for x in 1..len as i32 {
            session.snake.advance(Cell::new(x, 0), true);
        }
    }

    fn assert_distinct_cells(session: &GameSession) {
        let cells: HashSet<Cell> = session.snake.cells().collect();
        assert_eq!(cells.len(), session.snake.len());
    }

    #[test]
    fn single_step_moves_head_without_eating() {
        // Head (0,0) facing +X with food at (2,0): one tick lands on (1,0),
        // which is adjacent to the food but not on it.
        let mut session = running();
        session.food = Cell::new(2, 0);
        let result = session.tick(TICK);
        assert!(result.stepped);
        assert!(result.events.is_empty());
        assert_eq!(session.snake.head(), Cell::new(1, 0));
        assert_eq!(session.snake.len(), 1);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn tick_is_gated_by_the_interval() {
        let mut session = running();
        assert!(!session.tick(ms(100)).stepped);
        assert!(session.tick(TICK).stepped);
        // Only one step per due window.
        assert!(!session.tick(ms(300)).stepped);
    }

    #[test]
    fn wall_collision_ends_the_round() {
        let mut session = running();
        session.snake = Snake::hatch(Cell::new(9, 0));
        let result = session.tick(TICK);
        assert_eq!(
            result.events,
            vec![TickEvent::WallCollision, TickEvent::GameOver { score: 0 }]
        );
        assert_eq!(session.status(), Status::GameOver { since: TICK });
        // The head never left the playable area.
        assert_eq!(session.snake.head(), Cell::new(9, 0));
    }

    #[test]
    fn reversal_request_is_ignored() {
        let mut session = running();
        grow_line(&mut session, 3);
        assert!(!session.request_direction(Dir::NegX, ms(10)));
        let result = session.tick(TICK);
        assert!(result.events.is_empty());
        assert_eq!(session.snake.head(), Cell::new(3, 0));
    }

    #[test]
    fn eating_scores_quickens_and_relocates_food() {
        let mut session = running();
        session.food = Cell::new(1, 0);
        let before = session.interval();
        let result = session.tick(TICK);
        assert_eq!(result.events, vec![TickEvent::FoodEaten { score: 10 }]);
        assert_eq!(session.score(), 10);
        assert_eq!(session.snake.len(), 2);
        assert!((before - session.interval() - 0.005).abs() < 1e-6);
        assert!(!session.snake.occupies(session.food()));
    }

    #[test]
    fn interval_never_drops_below_the_floor() {
        let mut session = running();
        let mut prev = session.interval();
        for i in 0..40 {
            let now = TICK * (i + 1);
            // Park the food directly ahead of wherever the head is going.
            let head = session.snake.head();
            session.food = head.step(session.buffer.applied());
            if !session.in_bounds(session.food) {
                break;
            }
            session.tick(now);
            assert!(session.interval() <= prev);
            assert!(session.interval() >= session.config.min_interval - 1e-6);
            prev = session.interval();
        }
    }

    #[test]
    fn tail_chasing_is_legal_when_not_eating() {
        let mut session = running();
        // Square loop with the head one step from the vacating tail cell.
        session.snake = Snake::hatch(Cell::new(0, 0));
        session.snake.advance(Cell::new(1, 0), true);
        session.snake.advance(Cell::new(1, 1), true);
        session.snake.advance(Cell::new(0, 1), true);
        assert!(session.request_direction(Dir::NegZ, ms(10)));
        let result = session.tick(TICK);
        assert!(result.events.is_empty());
        assert_eq!(session.status(), Status::Running);
        assert_eq!(session.snake.head(), Cell::new(0, 0));
        assert_eq!(session.snake.len(), 4);
        assert_distinct_cells(&session);
    }

    #[test]
    fn biting_the_body_ends_the_round() {
        let mut session = running();
        grow_line(&mut session, 5);
        // Hook back into the body: +Z, -X, -Z lands on (3,0).
        assert!(session.request_direction(Dir::PosZ, ms(10)));
        session.tick(TICK);
        assert!(session.request_direction(Dir::NegX, ms(300)));
        session.tick(TICK * 2);
        assert!(session.request_direction(Dir::NegZ, ms(550)));
        let result = session.tick(TICK * 3);
        assert_eq!(
            result.events,
            vec![TickEvent::SelfCollision, TickEvent::GameOver { score: 0 }]
        );
        assert!(matches!(session.status(), Status::GameOver { .. }));
    }

    #[test]
    fn length_law_holds_across_a_patrol() {
        let mut session = running();
        // Steer a clockwise box forever; food stays unreachable.
        let route = [Dir::PosX, Dir::PosZ, Dir::NegX, Dir::NegZ];
        let mut now = Duration::ZERO;
        for lap in 0..3u32 {
            for (leg, &dir) in route.iter().enumerate() {
                now += ms(300);
                session.request_direction(dir, now);
                for _ in 0..3 {
                    now += TICK;
                    let before = session.snake.len();
                    let result = session.tick(now);
                    let ate = result
                        .events
                        .iter()
                        .any(|e| matches!(e, TickEvent::FoodEaten { .. }));
                    assert_eq!(session.snake.len(), before + usize::from(ate));
                    assert_distinct_cells(&session);
                    assert_eq!(session.status(), Status::Running, "lap {lap} leg {leg}");
                }
            }
        }
    }

    #[test]
    fn game_over_resets_to_idle_after_the_delay() {
        let mut session = running();
        session.food = Cell::new(1, 0);
        session.tick(TICK); // eat: score 10
        session.snake = Snake::hatch(Cell::new(9, 0));
        session.tick(TICK * 2); // wall
        assert!(matches!(session.status(), Status::GameOver { .. }));

        // Input is dead while the round winds down.
        assert!(!session.request_direction(Dir::PosZ, ms(600)));
        assert!(session.tick(ms(700)).events.is_empty());

        let result = session.tick(ms(1600));
        assert_eq!(result.events, vec![TickEvent::Reset]);
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake.len(), 1);
        assert_eq!(session.snake.head(), Cell::new(0, 0));
        assert!((session.interval() - session.config.start_interval).abs() < 1e-6);
        assert!(!session.snake.occupies(session.food()));
    }

    #[test]
    fn pause_freezes_the_simulation() {
        let mut session = running();
        assert!(session.toggle_pause(ms(100)));
        assert!(!session.tick(TICK).stepped);
        assert_eq!(session.status(), Status::Paused);
        // Resuming re-anchors the clock: no catch-up step.
        assert!(session.toggle_pause(ms(5000)));
        assert!(!session.tick(ms(5100)).stepped);
        assert!(session.tick(ms(5250)).stepped);
    }

    #[test]
    fn pause_is_a_noop_outside_running_or_paused() {
        let mut session = GameSession::new(GameConfig::default());
        assert!(!session.toggle_pause(ms(0)));
        assert_eq!(session.status(), Status::Idle);
    }

    #[test]
    fn first_direction_input_starts_the_round() {
        let mut session = GameSession::new(GameConfig::default());
        session.food = Cell::new(7, 7);
        assert_eq!(session.status(), Status::Idle);
        assert!(session.request_direction(Dir::PosZ, ms(500)));
        assert_eq!(session.status(), Status::Running);
        // The clock anchors at the starting input, not at zero.
        assert!(!session.tick(ms(600)).stepped);
        assert!(session.tick(ms(750)).stepped);
        assert_eq!(session.snake.head(), Cell::new(0, 1));
    }

    #[test]
    fn food_spawns_inside_its_span_and_off_the_snake() {
        let config = GameConfig::default();
        let mut snake = Snake::hatch(Cell::new(0, 0));
        for x in 1..=8 {
            snake.advance(Cell::new(x, 0), true);
        }
        for _ in 0..200 {
            let food = spawn_food(&snake, &config);
            assert!(food.x.abs() <= config.food_range);
            assert!(food.z.abs() <= config.food_range);
            assert!(!snake.occupies(food));
        }
    }
}
