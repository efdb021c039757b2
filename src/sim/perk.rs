//! Perks: timed powers and instant bonuses
//!
//! A single global slot holds at most one perk on the field. Collecting a
//! power perk moves its effect onto the player, replacing any active one.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::matrix::RigidMatrix;
use super::player::Player;
use super::rng::RandomSource;
use crate::error::Result;
use crate::orthogonal_neighbours;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Perk {
    Invincibility,
    Levitation,
    LowGravity,
    SuperJump,
    TimeStop,
    ExtraPoints,
    ExtraLife,
    #[default]
    None,
}

impl Perk {
    /// Every spawnable kind, in spawn-index order
    pub const KINDS: [Perk; 7] = [
        Perk::Invincibility,
        Perk::Levitation,
        Perk::LowGravity,
        Perk::SuperJump,
        Perk::TimeStop,
        Perk::ExtraPoints,
        Perk::ExtraLife,
    ];

    pub fn from_index(index: i32) -> Perk {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::KINDS.get(i).copied())
            .unwrap_or(Perk::None)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Perk::Invincibility => "Invincibility",
            Perk::Levitation => "Levitation",
            Perk::LowGravity => "Low Gravity",
            Perk::SuperJump => "Super Jump",
            Perk::TimeStop => "Time Stop",
            Perk::ExtraPoints => "Extra Points",
            Perk::ExtraLife => "Extra Life",
            Perk::None => "No Power",
        }
    }

    /// Bonus perks apply instantly on collection
    pub fn is_bonus(&self) -> bool {
        matches!(self, Perk::ExtraPoints | Perk::ExtraLife)
    }

    /// Power perks stay on the player for a while
    pub fn is_power(&self) -> bool {
        !self.is_bonus() && *self != Perk::None
    }
}

/// The global perk slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PerkSlot {
    #[default]
    Idle,
    OnField {
        kind: Perk,
        pos: IVec2,
        expire_frame: u64,
    },
}

impl PerkSlot {
    pub fn is_idle(&self) -> bool {
        matches!(self, PerkSlot::Idle)
    }

    /// Cell of the perk on the field, if any
    pub fn cell(&self) -> Option<IVec2> {
        match self {
            PerkSlot::OnField { pos, .. } => Some(*pos),
            PerkSlot::Idle => None,
        }
    }
}

/// What happened to the perk slot during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerkEvent {
    Spawned { kind: Perk, pos: IVec2 },
    /// No free cell found within the attempt budget
    SpawnSkipped,
    Collected(Perk),
    Expired(Perk),
}

/// Clear the player's power once its time is up. Returns the expired perk.
pub fn decay_active_perk(player: &mut Player, frame: u64) -> Option<Perk> {
    if player.perk != Perk::None && frame >= player.perk_end_frame {
        let expired = player.perk;
        player.perk = Perk::None;
        return Some(expired);
    }
    None
}

/// Advance the slot: collection, expiry, then scheduled spawning
pub fn update_perk_slot(
    slot: &mut PerkSlot,
    player: &mut Player,
    matrix: &mut RigidMatrix,
    settings: &Settings,
    frame: u64,
    rng: &mut impl RandomSource,
) -> Result<Vec<PerkEvent>> {
    let mut events = Vec::new();

    if let PerkSlot::OnField {
        kind,
        pos,
        expire_frame,
    } = *slot
    {
        if touches(player.pos, pos) {
            matrix.modify_point(pos.x, pos.y, -1)?;
            *slot = PerkSlot::Idle;
            apply_perk(player, kind, settings, frame);
            events.push(PerkEvent::Collected(kind));
        } else if frame >= expire_frame {
            matrix.modify_point(pos.x, pos.y, -1)?;
            *slot = PerkSlot::Idle;
            events.push(PerkEvent::Expired(kind));
        }
    }

    let interval = settings.perk_interval_frames();
    if slot.is_idle() && frame > 0 && interval > 0 && frame % interval == 0 {
        events.push(spawn_perk(slot, player, matrix, settings, frame, rng)?);
    }

    Ok(events)
}

/// Contact with the perk tile: same cell or orthogonally adjacent
fn touches(player: IVec2, perk: IVec2) -> bool {
    player == perk || orthogonal_neighbours(perk).contains(&player)
}

fn apply_perk(player: &mut Player, kind: Perk, settings: &Settings, frame: u64) {
    match kind {
        Perk::ExtraPoints => player.score += settings.extra_points_bonus,
        Perk::ExtraLife => player.lives = (player.lives + 1).min(settings.max_lives),
        Perk::None => {}
        power => {
            player.perk = power;
            player.perk_end_frame = frame + settings.perk_player_frames();
        }
    }
}

fn spawn_perk(
    slot: &mut PerkSlot,
    player: &Player,
    matrix: &mut RigidMatrix,
    settings: &Settings,
    frame: u64,
    rng: &mut impl RandomSource,
) -> Result<PerkEvent> {
    let kind = Perk::from_index(rng.random_integer(0, Perk::KINDS.len() as i32 - 1));

    for _ in 0..settings.perk_spawn_attempts {
        let pos = IVec2::new(
            rng.random_integer(settings.min_x(), settings.max_x()),
            rng.random_integer(settings.min_y(), settings.max_y()),
        );
        if pos == player.pos || matrix.is_solid(pos) {
            continue;
        }
        matrix.modify_point(pos.x, pos.y, 1)?;
        *slot = PerkSlot::OnField {
            kind,
            pos,
            expire_frame: frame + settings.perk_screen_frames(),
        };
        log::debug!("Spawned {} at ({}, {})", kind.name(), pos.x, pos.y);
        return Ok(PerkEvent::Spawned { kind, pos });
    }

    log::debug!("Skipped perk spawn on frame {frame}: no free cell");
    Ok(PerkEvent::SpawnSkipped)
}
