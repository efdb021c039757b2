//! Game settings
//!
//! Loaded once at start from a JSON file and immutable during a match.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Smallest playfield that still leaves a 3x3 interior
const MINIMUM_GRID_SIZE: i32 = 5;

/// Configuration surface of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Clock ===
    /// Logical frames per second
    pub fps: u32,

    // === Playfield ===
    pub columns: i32,
    pub lines: i32,

    // === Physics ===
    pub gravity: i32,
    pub terminal_velocity: i32,
    /// Negative values jump upwards
    pub jump_velocity: i32,
    pub levitation_velocity: i32,

    // === Platforms ===
    pub platform_count: u32,
    pub platform_min_width: i32,
    pub platform_max_width: i32,
    /// Largest absolute horizontal speed of generated platforms
    pub platform_max_speed: i32,
    /// Generated platforms move once every N frames, N in this range
    pub platform_min_interval: u32,
    pub platform_max_interval: u32,

    // === Player ===
    pub starting_lives: u32,
    pub max_lives: u32,
    pub spawn_x: i32,
    pub spawn_y: i32,
    /// Empty picks a random name
    pub player_name: String,

    // === Perks ===
    pub perk_interval_seconds: u32,
    pub perk_screen_seconds: u32,
    pub perk_player_seconds: u32,
    pub perk_spawn_attempts: u32,
    pub extra_points_bonus: u64,

    // === Match ===
    pub limit_played_frames: u64,
    pub message_seconds: u32,
    /// Fixed seed for reproducible matches; None seeds from the wall clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: FPS,

            columns: COLUMNS,
            lines: LINES,

            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            jump_velocity: JUMP_VELOCITY,
            levitation_velocity: LEVITATION_VELOCITY,

            platform_count: PLATFORM_COUNT,
            platform_min_width: 4,
            platform_max_width: 16,
            platform_max_speed: 1,
            platform_min_interval: FPS / 8,
            platform_max_interval: FPS / 2,

            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,
            spawn_x: COLUMNS / 2,
            spawn_y: LINES / 2,
            player_name: String::new(),

            perk_interval_seconds: PERK_INTERVAL_IN_SECONDS,
            perk_screen_seconds: PERK_DURATION_ON_SCREEN_IN_SECONDS,
            perk_player_seconds: PERK_DURATION_ON_PLAYER_IN_SECONDS,
            perk_spawn_attempts: PERK_SPAWN_ATTEMPTS,
            extra_points_bonus: EXTRA_POINTS_BONUS,

            limit_played_frames: (LIMIT_PLAYED_SECONDS * FPS) as u64,
            message_seconds: MESSAGE_DURATION_IN_SECONDS,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file does not exist. The result is always validated.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = match read_optional(path)? {
            Some(json) => {
                let settings: Settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            None => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(invalid("fps must be positive"));
        }
        if self.columns < MINIMUM_GRID_SIZE || self.lines < MINIMUM_GRID_SIZE {
            return Err(invalid(format!(
                "grid {}x{} is smaller than {MINIMUM_GRID_SIZE}x{MINIMUM_GRID_SIZE}",
                self.columns, self.lines
            )));
        }
        if !self.is_interior(self.spawn()) {
            return Err(invalid(format!(
                "spawn cell ({}, {}) is outside the playable area",
                self.spawn_x, self.spawn_y
            )));
        }
        if self.terminal_velocity < 1 {
            return Err(invalid("terminal velocity must be at least 1"));
        }
        if self.gravity < 0 {
            return Err(invalid("gravity must not be negative"));
        }
        if self.platform_min_width < 1 || self.platform_min_width > self.platform_max_width {
            return Err(invalid("platform width range is empty"));
        }
        // Wrapping is undefined for platforms wider than the interior
        if self.platform_max_width > self.interior_width() {
            return Err(invalid(format!(
                "platforms may not be wider than the interior ({})",
                self.interior_width()
            )));
        }
        if self.platform_max_speed < 1 {
            return Err(invalid("platform speed must be at least 1"));
        }
        if self.platform_min_interval < 1 || self.platform_min_interval > self.platform_max_interval
        {
            return Err(invalid("platform interval range is empty"));
        }
        if self.starting_lives < 1 || self.max_lives < self.starting_lives {
            return Err(invalid("lives must satisfy 1 <= starting <= max"));
        }
        if self.perk_spawn_attempts == 0 {
            return Err(invalid("perk spawn attempts must be positive"));
        }
        if self.perk_interval_seconds == 0 {
            return Err(invalid("perk interval must be positive"));
        }
        Ok(())
    }

    pub fn min_x(&self) -> i32 {
        1
    }

    pub fn max_x(&self) -> i32 {
        self.columns - 2
    }

    pub fn min_y(&self) -> i32 {
        1
    }

    pub fn max_y(&self) -> i32 {
        self.lines - 2
    }

    pub fn interior_width(&self) -> i32 {
        self.max_x() - self.min_x() + 1
    }

    /// True for cells inside the playable bounding box
    pub fn is_interior(&self, cell: IVec2) -> bool {
        (self.min_x()..=self.max_x()).contains(&cell.x)
            && (self.min_y()..=self.max_y()).contains(&cell.y)
    }

    pub fn spawn(&self) -> IVec2 {
        IVec2::new(self.spawn_x, self.spawn_y)
    }

    pub fn perk_interval_frames(&self) -> u64 {
        self.perk_interval_seconds as u64 * self.fps as u64
    }

    pub fn perk_screen_frames(&self) -> u64 {
        self.perk_screen_seconds as u64 * self.fps as u64
    }

    pub fn perk_player_frames(&self) -> u64 {
        self.perk_player_seconds as u64 * self.fps as u64
    }

    pub fn message_frames(&self) -> u64 {
        self.message_seconds as u64 * self.fps as u64
    }
}

fn invalid(reason: impl Into<String>) -> GameError {
    GameError::InvalidConfiguration(reason.into())
}

/// Read a file that is allowed to be missing
fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The 20x10 grid used by the simulation tests
#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        fps: 30,
        columns: 20,
        lines: 10,
        gravity: 1,
        terminal_velocity: 4,
        jump_velocity: -4,
        platform_count: 0,
        platform_min_width: 3,
        platform_max_width: 6,
        platform_min_interval: 1,
        platform_max_interval: 4,
        spawn_x: 10,
        spawn_y: 2,
        seed: Some(7),
        ..Settings::default()
    }
}
