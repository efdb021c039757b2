//! Game state: the aggregate owner of everything a match mutates

use serde::{Deserialize, Serialize};

use super::matrix::RigidMatrix;
use super::message::{Message, set_message};
use super::perk::PerkSlot;
use super::platform::{Platform, generate_platforms};
use super::player::{Player, respawn_cell};
use super::rng::RandomSource;
use crate::error::Result;
use crate::settings::Settings;

/// Message priorities, higher wins
pub const PRIORITY_INFO: u32 = 0;
pub const PRIORITY_PERK: u32 = 1;
pub const PRIORITY_DEATH: u32 = 2;

const ADJECTIVES: [&str; 12] = [
    "brave", "swift", "quiet", "lucky", "grim", "nimble", "bold", "sly", "tiny", "odd", "keen",
    "wild",
];
const NOUNS: [&str; 12] = [
    "falcon", "badger", "comet", "lantern", "otter", "raven", "pebble", "walrus", "gecko", "spark",
    "heron", "moth",
];

/// Why a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    OutOfLives,
    TimeUp,
    Quit,
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub settings: Settings,
    pub player: Player,
    /// Processed in insertion order every frame
    pub platforms: Vec<Platform>,
    pub matrix: RigidMatrix,
    pub perk: PerkSlot,
    pub message: Option<Message>,
    pub current_frame: u64,
    /// Frames on which the player was active and the game unpaused
    pub played_frames: u64,
    pub limit_played_frames: u64,
    pub paused: bool,
    pub ended: Option<EndReason>,
}

impl Game {
    /// Create a match with random platforms
    pub fn new(settings: Settings, rng: &mut impl RandomSource) -> Result<Self> {
        settings.validate()?;
        let platforms = generate_platforms(&settings, rng);
        let mut game = Self::with_platforms(settings, platforms)?;
        if game.player.name.is_empty() {
            game.player.name = random_name(rng);
        }
        log::info!(
            "New match for {}: {}x{} grid, {} platforms",
            game.player.name,
            game.settings.columns,
            game.settings.lines,
            game.platforms.len()
        );
        Ok(game)
    }

    /// Create a match with a fixed platform layout. The player starts frozen
    /// on the respawn cell.
    pub fn with_platforms(settings: Settings, platforms: Vec<Platform>) -> Result<Self> {
        settings.validate()?;
        let mut matrix = RigidMatrix::new(settings.columns, settings.lines);
        for platform in &platforms {
            matrix.modify_platform(platform, 1)?;
        }
        let spawn = respawn_cell(&matrix, &settings);
        let player = Player::new(&settings.player_name, spawn, settings.starting_lives);

        Ok(Self {
            limit_played_frames: settings.limit_played_frames,
            settings,
            player,
            platforms,
            matrix,
            perk: PerkSlot::Idle,
            message: None,
            current_frame: 0,
            played_frames: 0,
            paused: false,
            ended: None,
        })
    }

    pub fn is_over(&self) -> bool {
        self.ended.is_some()
    }

    /// Show a message in the bottom bar for the configured duration
    pub fn set_message(&mut self, text: &str, priority: u32) -> bool {
        let expire = self.current_frame + self.settings.message_frames();
        set_message(
            &mut self.message,
            Message::new(text, expire, priority),
            self.current_frame,
        )
    }

    /// Matrix total implied by the current occupants: border walls, the
    /// in-grid part of every platform, and the perk tile
    pub fn expected_matrix_total(&self) -> u64 {
        let platform_cells = self
            .platforms
            .iter()
            .flat_map(|p| p.cells())
            .filter(|c| self.matrix.contains(*c))
            .count() as u64;
        let perk = u64::from(!self.perk.is_idle());
        self.matrix.border_count() + platform_cells + perk
    }

    /// The matrix agrees with the occupants it is supposed to count
    pub fn matrix_is_consistent(&self) -> bool {
        self.matrix.total() == self.expected_matrix_total()
    }
}

/// Adjective + noun, capitalized
pub fn random_name(rng: &mut impl RandomSource) -> String {
    let adjective = ADJECTIVES[rng.random_integer(0, ADJECTIVES.len() as i32 - 1) as usize];
    let noun = NOUNS[rng.random_integer(0, NOUNS.len() as i32 - 1) as usize];
    format!("{}{}", capitalize(adjective), capitalize(noun))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
