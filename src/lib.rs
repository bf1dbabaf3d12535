//! Neon Snake - a cyberpunk snake game on a fixed-timestep simulation core.
//!
//! The simulation (`session`, `snake`, `input`, `clock`, `grid`) is plain
//! data driven by `GameSession::tick` and knows nothing about windows or
//! pixels. The `render` module owns every presentation concern, including
//! the per-entity glow/pulse timers and the glitch flashes.

pub mod clock;
pub mod config;
pub mod grid;
pub mod input;
pub mod render;
pub mod session;
pub mod snake;
