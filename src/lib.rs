//! Walls of Doom - a side-scrolling platformer on a grid bounded by walls
//!
//! Core modules:
//! - `sim`: Deterministic simulation (matrix, platforms, player, perks, tick)
//! - `renderer`: Rendering backend abstraction and a terminal renderer
//! - `host`: Wall clock and input backends
//! - `session`: Paced match loop tying the above together
//! - `settings`: Configuration surface loaded at start

pub mod error;
pub mod highscores;
pub mod host;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use highscores::HighScores;
pub use settings::Settings;

use glam::IVec2;

/// Game configuration defaults
pub mod consts {
    /// Fixed simulation rate
    pub const FPS: u32 = 30;

    /// Playfield dimensions (borders included)
    pub const COLUMNS: i32 = 80;
    pub const LINES: i32 = 24;

    /// Tiles per tick added to the vertical velocity each frame
    pub const GRAVITY: i32 = 1;
    /// Maximum absolute vertical velocity
    pub const TERMINAL_VELOCITY: i32 = 4;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_VELOCITY: i32 = -4;
    /// Upward speed while levitating
    pub const LEVITATION_VELOCITY: i32 = 1;

    pub const PLATFORM_COUNT: u32 = 16;
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 9;
    pub const EXTRA_POINTS_BONUS: u64 = 60;

    /// Perk timings in seconds (multiplied by FPS to get frames)
    pub const PERK_INTERVAL_IN_SECONDS: u32 = 40;
    pub const PERK_DURATION_ON_SCREEN_IN_SECONDS: u32 = 20;
    pub const PERK_DURATION_ON_PLAYER_IN_SECONDS: u32 = 20;
    /// Placement attempts before a perk spawn is skipped
    pub const PERK_SPAWN_ATTEMPTS: u32 = 32;

    /// Five minutes of play
    pub const LIMIT_PLAYED_SECONDS: u32 = 5 * 60;
    pub const MESSAGE_DURATION_IN_SECONDS: u32 = 2;

    /// Maximum message length in bytes, ellipsis included
    pub const MAXIMUM_MESSAGE_SIZE: usize = 64;
    pub const MAXIMUM_PLAYER_NAME_SIZE: usize = 64;
}

/// Sign of an integer as a unit step (-1, 0 or 1)
#[inline]
pub fn unit_step(value: i32) -> i32 {
    value.signum()
}

/// Returns the four orthogonal neighbours of a cell
#[inline]
pub fn orthogonal_neighbours(cell: IVec2) -> [IVec2; 4] {
    [
        cell + IVec2::X,
        cell - IVec2::X,
        cell + IVec2::Y,
        cell - IVec2::Y,
    ]
}
