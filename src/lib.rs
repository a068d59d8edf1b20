//! Space Defender: a fixed-tick arcade shooter simulation.
//!
//! - `entities`: plain data for the ship, bullets, enemies and world state
//! - `config`: tunable constants, loadable from JSON
//! - `compute`: per-step simulation functions and the composed `tick`
//! - `game_loop`: session owner that drives ticks and publishes snapshots

pub mod compute;
pub mod config;
pub mod entities;
pub mod game_loop;

pub use config::{ConfigError, GameConfig};
pub use entities::{Direction, GameEvent, GameState, InputState, Position, Snapshot};
pub use game_loop::GameLoop;
