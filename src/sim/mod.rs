//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (platforms in insertion order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod command;
pub mod matrix;
pub mod message;
pub mod perk;
pub mod platform;
pub mod player;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use clock::{Clock, FramePacer, FrameTiming, ManualClock};
pub use command::{Command, last_command};
pub use matrix::RigidMatrix;
pub use message::Message;
pub use perk::{Perk, PerkEvent, PerkSlot};
pub use platform::{Platform, PlatformId, advance_platforms, generate_platforms};
pub use player::{Hazard, Player, PlayerEvent};
pub use rng::{PcgRandom, RandomSource};
pub use snapshot::{GameSnapshot, TileRect, TopBar};
pub use state::{EndReason, Game};
pub use tick::{TickStatus, tick};
