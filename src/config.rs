use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for a game session. Defaults match the classic setup: a 20x20
/// board with walls at the +-9.5 line, four ticks per second ramping up to
/// ten as the score grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playable cells span `-half_extent..=half_extent` on both axes.
    pub half_extent: i32,
    /// Food spawns within `-food_range..=food_range` on both axes.
    pub food_range: i32,
    /// Seconds per tick at score zero.
    pub start_interval: f32,
    /// Seconds shaved off the interval per food eaten.
    pub interval_step: f32,
    /// The interval never drops below this.
    pub min_interval: f32,
    /// Score awarded per food.
    pub points_per_food: u32,
    /// Head-to-food distance below which the food counts as eaten.
    pub eat_radius: f32,
    /// Minimum seconds between accepted direction changes.
    pub debounce: f32,
    /// Seconds spent in GameOver before the session resets to Idle.
    pub reset_delay: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            half_extent: 9,
            food_range: 8,
            start_interval: 0.25,
            interval_step: 0.005,
            min_interval: 0.1,
            points_per_food: 10,
            eat_radius: 0.5,
            debounce: 0.05,
            reset_delay: 1.0,
        }
    }
}

impl GameConfig {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.half_extent > 0, "half_extent must be positive");
        ensure!(
            self.food_range > 0 && self.food_range <= self.half_extent,
            "food_range must be within the playable area"
        );
        ensure!(self.min_interval > 0.0, "min_interval must be positive");
        ensure!(
            self.start_interval >= self.min_interval,
            "start_interval must not be below min_interval"
        );
        ensure!(self.interval_step >= 0.0, "interval_step must not be negative");
        ensure!(self.eat_radius > 0.0, "eat_radius must be positive");
        ensure!(self.debounce >= 0.0, "debounce must not be negative");
        ensure!(self.reset_delay >= 0.0, "reset_delay must not be negative");
        Ok(())
    }

    pub fn debounce_duration(&self) -> Duration {
        Duration::from_secs_f32(self.debounce)
    }

    pub fn reset_delay_duration(&self) -> Duration {
        Duration::from_secs_f32(self.reset_delay)
    }
}
