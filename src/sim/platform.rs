//! Moving platforms and the platform engine
//!
//! Platforms are processed in insertion order every frame. That order is the
//! tie-break for simultaneous conflicts and must never change.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::matrix::RigidMatrix;
use super::player::{Hazard, Player, PlayerEvent, ShoveOutcome};
use super::rng::RandomSource;
use crate::error::Result;
use crate::settings::Settings;
use crate::unit_step;

/// Stable handle to a platform (its index; platforms are never removed
/// during a match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub usize);

/// A horizontal run of solid tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    /// Tiles moved per step, signed
    pub speed_x: i32,
    pub speed_y: i32,
    /// Moves once every `rarity` frames
    pub rarity: u32,
}

impl Platform {
    pub fn new(x: i32, y: i32, width: i32, speed_x: i32, speed_y: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(1),
            speed_x,
            speed_y,
            rarity: 1,
        }
    }

    pub fn with_rarity(mut self, rarity: u32) -> Self {
        self.rarity = rarity.max(1);
        self
    }

    /// Cells of the current footprint, left to right
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.width).map(move |i| IVec2::new(self.x + i, self.y))
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.y == self.y && cell.x >= self.x && cell.x < self.x + self.width
    }

    pub fn is_moving(&self) -> bool {
        self.speed_x != 0 || self.speed_y != 0
    }

    /// Whether the platform takes a step on this frame
    pub fn moves_at(&self, frame: u64) -> bool {
        self.is_moving() && frame % u64::from(self.rarity.max(1)) == 0
    }

    /// Unit direction in which this platform pushes what it runs into.
    /// Horizontal motion takes precedence.
    pub fn shove_direction(&self) -> IVec2 {
        if self.speed_x != 0 {
            IVec2::new(unit_step(self.speed_x), 0)
        } else {
            IVec2::new(0, unit_step(self.speed_y))
        }
    }

    /// Advance one step, wrapping to the opposite side once the trailing
    /// cell has left the interior. Grazing the boundary does not wrap.
    pub fn step(&mut self, settings: &Settings) {
        self.x += self.speed_x;
        self.y += self.speed_y;

        if self.speed_x > 0 && self.x > settings.max_x() {
            self.x = settings.min_x() - 1;
        } else if self.speed_x < 0 && self.x + self.width - 1 < settings.min_x() {
            self.x = settings.max_x() + 2 - self.width;
        }

        if self.speed_y > 0 && self.y > settings.max_y() {
            self.y = settings.min_y() - 1;
        } else if self.speed_y < 0 && self.y < settings.min_y() {
            self.y = settings.max_y() + 1;
        }
    }
}

/// The first platform (in processing order) covering a cell
pub fn platform_at(platforms: &[Platform], cell: IVec2) -> Option<PlatformId> {
    platforms
        .iter()
        .position(|p| p.contains(cell))
        .map(PlatformId)
}

/// Advance every platform due on this frame, keeping the matrix and the
/// player consistent with the new footprints.
pub fn advance_platforms(
    platforms: &mut [Platform],
    matrix: &mut RigidMatrix,
    player: &mut Player,
    settings: &Settings,
    frame: u64,
) -> Result<Vec<PlayerEvent>> {
    let mut events = Vec::new();

    for (index, platform) in platforms.iter_mut().enumerate() {
        if !platform.moves_at(frame) {
            continue;
        }
        let id = PlatformId(index);

        matrix.modify_platform(platform, -1)?;
        platform.step(settings);

        // Drag the rider before the platform reoccupies its cells
        if player.is_alive() && player.on_platform == Some(id) && platform.speed_x != 0 {
            let origin = player.pos;
            player.pos.x += platform.speed_x;
            if matrix.is_solid(player.pos) {
                // Shove from the cell the rider stood on so a wall ejects it
                // inside the playfield
                player.pos = origin;
                let direction = IVec2::new(unit_step(platform.speed_x), 0);
                events.extend(resolve_shove(player, direction, matrix, settings));
            }
        }

        matrix.modify_platform(platform, 1)?;

        // The platform moved into the player
        if player.is_alive() && platform.contains(player.pos) {
            events.extend(resolve_shove(
                player,
                platform.shove_direction(),
                matrix,
                settings,
            ));
        }
    }

    Ok(events)
}

fn resolve_shove(
    player: &mut Player,
    direction: IVec2,
    matrix: &RigidMatrix,
    settings: &Settings,
) -> Option<PlayerEvent> {
    match player.shove(direction, matrix) {
        ShoveOutcome::Moved | ShoveOutcome::Ejected => None,
        ShoveOutcome::Crushed => Some(player.suffer(Hazard::Crushed, matrix, settings)),
    }
}

/// Random platforms for a new match. None of them starts on the spawn row.
pub fn generate_platforms(settings: &Settings, rng: &mut impl RandomSource) -> Vec<Platform> {
    let spawn = settings.spawn();
    (0..settings.platform_count)
        .map(|_| {
            let width = rng.random_integer(settings.platform_min_width, settings.platform_max_width);
            let mut y = rng.random_integer(settings.min_y(), settings.max_y() - 1);
            if y >= spawn.y {
                y += 1;
            }
            let x = rng.random_integer(settings.min_x(), settings.max_x() - width + 1);
            let magnitude = rng.random_integer(1, settings.platform_max_speed);
            let speed_x = if rng.random_integer(0, 1) == 0 {
                -magnitude
            } else {
                magnitude
            };
            let rarity = rng.random_integer(
                settings.platform_min_interval as i32,
                settings.platform_max_interval as i32,
            );
            Platform::new(x, y, width, speed_x, 0).with_rarity(rarity.max(1) as u32)
        })
        .collect()
}
