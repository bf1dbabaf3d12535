use crate::grid::Cell;
use crate::session::TickEvent;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// How long a single glitch flash stays on screen.
const FLASH_LEN: Duration = Duration::from_millis(300);
/// Game over fires a burst of five flashes, one every 200 ms.
const GAME_OVER_PULSES: u64 = 5;
const PULSE_SPACING: Duration = Duration::from_millis(200);

/// Per-segment glow animation parameters, randomised when a cell is first
/// seen so neighbouring segments shimmer out of phase.
#[derive(Debug, Clone, Copy)]
pub struct GlowPhase {
    pub offset: f32,
    pub speed: f32,
    pub depth: f32,
}

/// Ephemeral presentation state, keyed by entity identity. Owned by the
/// renderer; the simulation never sees any of this. Body cells work as
/// identities because occupied cells never move, they only appear at the
/// head and disappear at the tail.
pub struct EffectField {
    glow: HashMap<Cell, GlowPhase>,
    flash_until: Option<Duration>,
    queued_flashes: VecDeque<Duration>,
    rng: SmallRng,
}

impl EffectField {
    pub fn new() -> Self {
        Self {
            glow: HashMap::new(),
            flash_until: None,
            queued_flashes: VecDeque::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Fold a tick's events into the effect timers.
    pub fn observe(&mut self, events: &[TickEvent], now: Duration) {
        for event in events {
            match event {
                TickEvent::FoodEaten { .. } => self.flash(now),
                TickEvent::GameOver { .. } => {
                    for i in 0..GAME_OVER_PULSES {
                        self.queued_flashes.push_back(now + PULSE_SPACING * i as u32);
                    }
                }
                TickEvent::Reset => {
                    self.glow.clear();
                    self.queued_flashes.clear();
                    self.flash_until = None;
                }
                TickEvent::WallCollision | TickEvent::SelfCollision => {}
            }
        }
    }

    /// Trigger a glitch flash right now (direction change, round start).
    pub fn flash(&mut self, now: Duration) {
        self.flash_until = Some(now + FLASH_LEN);
    }

    /// Current glitch strength in `0.0..=1.0`, decaying over the flash.
    /// Promotes any queued game-over pulses whose time has come.
    pub fn glitch(&mut self, now: Duration) -> f32 {
        while let Some(&at) = self.queued_flashes.front() {
            if at > now {
                break;
            }
            self.queued_flashes.pop_front();
            self.flash_until = Some(at + FLASH_LEN);
        }
        match self.flash_until {
            Some(until) if now < until => {
                (until - now).as_secs_f32() / FLASH_LEN.as_secs_f32()
            }
            _ => 0.0,
        }
    }

    /// Glow parameters for a body cell, minted on first sight.
    pub fn glow(&mut self, cell: Cell) -> GlowPhase {
        let rng = &mut self.rng;
        *self.glow.entry(cell).or_insert_with(|| GlowPhase {
            offset: rng.gen_range(0.0..10.0),
            speed: 1.0 + rng.gen_range(0.0..1.0),
            depth: 0.1 + rng.gen_range(0.0..0.1),
        })
    }

    /// Drop glow state for cells the snake no longer occupies.
    pub fn sweep(&mut self, occupied: impl Fn(Cell) -> bool) {
        self.glow.retain(|&cell, _| occupied(cell));
    }

    pub fn jitter(&mut self, span: i32) -> i32 {
        self.rng.gen_range(-span..=span)
    }
}

impl Default for EffectField {
    fn default() -> Self {
        Self::new()
    }
}
