//! Pixel-frame renderer for the neon playfield.
//!
//! Everything presentational lives here: the palette, the per-cell glow
//! timers, the food bob, the glitch flashes and the HUD. The renderer only
//! ever reads the session through its accessors.

pub mod effects;
pub mod text;

use crate::grid::Cell;
use crate::session::{GameSession, Status, TickEvent};
use effects::EffectField;
use std::time::Duration;

pub const CELL_PX: u32 = 36;

const BACKGROUND: Rgb = Rgb(0x0a, 0x0a, 0x12);
const GRID_LINE: Rgb = Rgb(0x1a, 0x1a, 0x2e);
const NEON_PINK: Rgb = Rgb(0xff, 0x00, 0x80);
const NEON_BLUE: Rgb = Rgb(0x00, 0xff, 0xd5);
const NEON_YELLOW: Rgb = Rgb(0xf7, 0xff, 0x00);
const HUD_TEXT: Rgb = Rgb(0xe6, 0xe6, 0xe6);

#[derive(Debug, Clone, Copy)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scale brightness by `f`, clamped to the displayable range.
    fn lit(self, f: f32) -> Rgb {
        let scale = |v: u8| (v as f32 * f).clamp(0.0, 255.0) as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }
}

pub struct Renderer {
    width: u32,
    height: u32,
    half_extent: i32,
    effects: EffectField,
}

impl Renderer {
    pub fn new(half_extent: i32) -> Self {
        let (width, height) = Self::surface_size(half_extent);
        Self {
            width,
            height,
            half_extent,
            effects: EffectField::new(),
        }
    }

    /// Frame dimensions: the playable span plus a one-cell wall ring.
    pub fn surface_size(half_extent: i32) -> (u32, u32) {
        let cells = (2 * half_extent + 3) as u32;
        (cells * CELL_PX, cells * CELL_PX)
    }

    /// Feed tick events into the effect layer.
    pub fn observe(&mut self, events: &[TickEvent], now: Duration) {
        self.effects.observe(events, now);
    }

    /// Trigger a glitch flash (direction change, round start).
    pub fn flash(&mut self, now: Duration) {
        self.effects.flash(now);
    }

    pub fn draw(&mut self, frame: &mut [u8], session: &GameSession, now: Duration) {
        let t = now.as_secs_f32();

        for px in frame.chunks_exact_mut(4) {
            px[0] = BACKGROUND.0;
            px[1] = BACKGROUND.1;
            px[2] = BACKGROUND.2;
            px[3] = 255;
        }

        self.draw_grid(frame);
        self.draw_walls(frame);
        self.draw_food(frame, session.food(), t);
        self.draw_snake(frame, session, t);
        self.draw_hud(frame, session);
        self.draw_overlay(frame, session);
        self.draw_glitch(frame, now);

        let snake = session.snake();
        self.effects.sweep(|cell| snake.occupies(cell));
    }

    fn cell_origin(&self, cell: Cell) -> (i32, i32) {
        let edge = self.half_extent + 1;
        (
            (cell.x + edge) * CELL_PX as i32,
            (cell.z + edge) * CELL_PX as i32,
        )
    }

    fn fill_cell(&self, frame: &mut [u8], cell: Cell, color: Rgb, alpha: u8, inset: i32) {
        let (x, y) = self.cell_origin(cell);
        fill_rect(
            frame,
            self.width,
            self.height,
            x + inset,
            y + inset,
            CELL_PX as i32 - 2 * inset,
            CELL_PX as i32 - 2 * inset,
            color,
            alpha,
        );
    }

    /// Faint cell grid with brighter accent lines every five world units,
    /// alternating pink and blue.
    fn draw_grid(&self, frame: &mut [u8]) {
        let edge = self.half_extent + 1;
        for line in -edge..=edge {
            let px = (line + edge) * CELL_PX as i32;
            let accent = line % 5 == 0;
            let (v_color, h_color) = if line % 10 == 0 {
                (NEON_BLUE, NEON_PINK)
            } else {
                (NEON_PINK, NEON_BLUE)
            };
            let (vc, hc, alpha) = if accent {
                (v_color, h_color, 70)
            } else {
                (GRID_LINE, GRID_LINE, 160)
            };
            fill_rect(frame, self.width, self.height, px, 0, 1, self.height as i32, vc, alpha);
            fill_rect(frame, self.width, self.height, 0, px, self.width as i32, 1, hc, alpha);
        }
    }

    /// One-cell wall ring: blue along north/south, pink along east/west.
    fn draw_walls(&self, frame: &mut [u8]) {
        let edge = self.half_extent + 1;
        let blue = NEON_BLUE.lit(0.75);
        let pink = NEON_PINK.lit(0.75);
        for x in -edge..=edge {
            self.fill_cell(frame, Cell::new(x, -edge), blue, 255, 2);
            self.fill_cell(frame, Cell::new(x, edge), blue, 255, 2);
        }
        for z in (-edge + 1)..edge {
            self.fill_cell(frame, Cell::new(-edge, z), pink, 255, 2);
            self.fill_cell(frame, Cell::new(edge, z), pink, 255, 2);
        }
    }

    /// Yellow diamond with a sine-bob and a soft halo standing in for the
    /// food spotlight.
    fn draw_food(&self, frame: &mut [u8], food: Cell, t: f32) {
        let (x, y) = self.cell_origin(food);
        let half = CELL_PX as i32 / 2;
        let (cx, cy) = (x + half, y + half);

        let halo = (CELL_PX as f32 * 1.1) as i32;
        for dy in -halo..=halo {
            for dx in -halo..=halo {
                let d = ((dx * dx + dy * dy) as f32).sqrt();
                if d < halo as f32 {
                    let a = ((1.0 - d / halo as f32) * 60.0) as u8;
                    blend(frame, self.width, self.height, cx + dx, cy + dy, NEON_YELLOW, a);
                }
            }
        }

        let bob = (t * 3.0).sin() * 0.2;
        let r = (CELL_PX as f32 * 0.42 * (1.0 + bob)) as i32;
        for dy in -r..=r {
            let run = r - dy.abs();
            for dx in -run..=run {
                blend(frame, self.width, self.height, cx + dx, cy + dy, NEON_YELLOW, 235);
            }
        }
    }

    fn draw_snake(&mut self, frame: &mut [u8], session: &GameSession, t: f32) {
        for (i, cell) in session.snake().cells().enumerate() {
            if i == 0 {
                // Head pulse, brightest of the body.
                let pulse = 1.0 + (t * 2.0).sin() * 0.2;
                self.fill_cell(frame, cell, NEON_BLUE.lit(pulse), 235, 1);
            } else {
                // Body cells alternate hue by grid parity (stable, since
                // occupied cells never move) and shimmer out of phase.
                let base = if (cell.x + cell.z).rem_euclid(2) == 0 {
                    NEON_BLUE
                } else {
                    NEON_PINK
                };
                let glow = self.effects.glow(cell);
                let f = 0.75 + ((t + glow.offset) * glow.speed).sin() * glow.depth;
                self.fill_cell(frame, cell, base.lit(f), 220, 2);
            }
        }
    }

    fn draw_hud(&self, frame: &mut [u8], session: &GameSession) {
        let (w, h) = (self.width, self.height);
        let score = format!("SCORE {}", session.score());
        let length = format!("LENGTH {}", session.snake().len());
        text::draw(&score, 10, 10, 2, |x, y| {
            blend(frame, w, h, x as i32, y as i32, HUD_TEXT, 255)
        });
        text::draw(&length, 10, 30, 2, |x, y| {
            blend(frame, w, h, x as i32, y as i32, HUD_TEXT.lit(0.8), 255)
        });
    }

    fn draw_overlay(&self, frame: &mut [u8], session: &GameSession) {
        match session.status() {
            Status::Running => {}
            Status::Idle => {
                self.dim(frame, 110);
                self.center_text(frame, "NEON SNAKE", -30, 3, NEON_BLUE);
                self.center_text(frame, "PRESS AN ARROW KEY", 20, 2, HUD_TEXT);
            }
            Status::Paused => {
                self.dim(frame, 110);
                self.center_text(frame, "PAUSED", -10, 3, NEON_YELLOW);
            }
            Status::GameOver { .. } => {
                self.dim(frame, 140);
                self.center_text(frame, "GAME OVER", -30, 3, NEON_PINK);
                let line = format!("SCORE {}", session.score());
                self.center_text(frame, &line, 20, 2, HUD_TEXT);
            }
        }
    }

    fn dim(&self, frame: &mut [u8], alpha: u8) {
        fill_rect(
            frame,
            self.width,
            self.height,
            0,
            0,
            self.width as i32,
            self.height as i32,
            Rgb(0, 0, 0),
            alpha,
        );
    }

    fn center_text(&self, frame: &mut [u8], line: &str, dy: i32, scale: u32, color: Rgb) {
        let (w, h) = (self.width, self.height);
        let x = (self.width.saturating_sub(text::measure(line, scale))) / 2;
        let y = (self.height as i32 / 2 + dy).max(0) as u32;
        text::draw(line, x, y, scale, |px, py| {
            blend(frame, w, h, px as i32, py as i32, color, 255)
        });
    }

    /// Scanline tint plus horizontal row displacement while a flash decays.
    fn draw_glitch(&mut self, frame: &mut [u8], now: Duration) {
        let g = self.effects.glitch(now);
        if g <= 0.0 {
            return;
        }

        let bands = 1 + (g * 4.0) as u32;
        let h = self.height as i32;
        for _ in 0..bands {
            let y0 = (h / 2 + self.effects.jitter(h / 2 - 8)).clamp(0, h - 8);
            let band = 3 + self.effects.jitter(3).unsigned_abs() as i32;
            let dx = self.effects.jitter((18.0 * g) as i32 + 2);
            for y in y0..(y0 + band).min(h) {
                shift_row(frame, self.width, y as u32, dx);
            }
        }

        let tint = (28.0 * g) as u8;
        for y in (0..self.height).step_by(4) {
            fill_rect(frame, self.width, self.height, 0, y as i32, self.width as i32, 1, NEON_PINK, tint);
        }
    }
}

fn blend(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: Rgb, alpha: u8) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let idx = ((y as u32 * width + x as u32) * 4) as usize;
    if idx + 3 >= frame.len() {
        return;
    }
    let a = alpha as u16;
    let ia = 255 - a;
    frame[idx] = ((color.0 as u16 * a + frame[idx] as u16 * ia) / 255) as u8;
    frame[idx + 1] = ((color.1 as u16 * a + frame[idx + 1] as u16 * ia) / 255) as u8;
    frame[idx + 2] = ((color.2 as u16 * a + frame[idx + 2] as u16 * ia) / 255) as u8;
    frame[idx + 3] = 255;
}

#[allow(clippy::too_many_arguments)]
fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: Rgb,
    alpha: u8,
) {
    for py in y.max(0)..(y + h).min(height as i32) {
        for px in x.max(0)..(x + w).min(width as i32) {
            blend(frame, width, height, px, py, color, alpha);
        }
    }
}

/// Rotate one row of pixels horizontally by `dx` cells of 4 bytes.
fn shift_row(frame: &mut [u8], width: u32, y: u32, dx: i32) {
    let start = (y * width * 4) as usize;
    let end = start + (width * 4) as usize;
    if end > frame.len() {
        return;
    }
    let row = &mut frame[start..end];
    let shift = ((dx.unsigned_abs() % width) * 4) as usize;
    if dx >= 0 {
        row.rotate_right(shift);
    } else {
        row.rotate_left(shift);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn surface_covers_playfield_plus_walls() {
        let (w, h) = Renderer::surface_size(9);
        assert_eq!(w, 21 * CELL_PX);
        assert_eq!(w, h);
    }

    #[test]
    fn draw_fills_the_frame() {
        let mut renderer = Renderer::new(9);
        let session = GameSession::new(GameConfig::default());
        let (w, h) = Renderer::surface_size(9);
        let mut frame = vec![0u8; (w * h * 4) as usize];
        renderer.draw(&mut frame, &session, Duration::from_millis(16));
        // Alpha is opaque everywhere and something non-background got drawn.
        assert!(frame.chunks_exact(4).all(|px| px[3] == 255));
        assert!(
            frame
                .chunks_exact(4)
                .any(|px| px[0] != BACKGROUND.0 || px[1] != BACKGROUND.1)
        );
    }

    #[test]
    fn shift_row_preserves_pixel_count() {
        let width = 8u32;
        let mut frame: Vec<u8> = (0..width * 4).map(|v| v as u8).collect();
        let original = frame.clone();
        shift_row(&mut frame, width, 0, 3);
        shift_row(&mut frame, width, 0, -3);
        assert_eq!(frame, original);
    }
}
