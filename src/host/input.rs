//! Input backends
//!
//! Backends are polled once per tick, never blocking. A backend may fail
//! transiently; the session logs and skips such failures.

use std::collections::VecDeque;

use glam::IVec2;

use crate::error::Result;
use crate::sim::command::Command;
use crate::sim::snapshot::{GameSnapshot, TileRect};

pub trait InputSource {
    /// Commands produced since the previous poll, oldest first
    fn poll(&mut self) -> Result<Vec<Command>>;

    /// Look at the frame that was just drawn
    fn observe(&mut self, _snapshot: &GameSnapshot) {}
}

/// Demo player driven by the last drawn frame.
///
/// Stays away from platform edges, jumps for perks overhead and steers
/// towards the nearest platform below while falling.
#[derive(Debug, Clone, Default)]
pub struct AutoPilot {
    last: Option<GameSnapshot>,
}

impl AutoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the command for the frame after `snapshot`
    pub fn decide(snapshot: &GameSnapshot) -> Command {
        if snapshot.paused || snapshot.ended.is_some() {
            return Command::None;
        }

        let player = IVec2::new(snapshot.player.x, snapshot.player.y);
        let support = snapshot
            .platforms
            .iter()
            .find(|p| covers(p, player + IVec2::Y));

        match support {
            Some(platform) => {
                if let Some(perk) = &snapshot.perk {
                    let dx = perk.x - player.x;
                    if dx == 0 && perk.y < player.y {
                        return Command::Jump;
                    }
                    if perk.y == player.y && spans(platform, perk.x) {
                        return step_towards(dx);
                    }
                }
                if platform.w < 3 {
                    Command::None
                } else if player.x <= platform.x {
                    Command::Right
                } else if player.x >= platform.x + platform.w - 1 {
                    Command::Left
                } else {
                    Command::None
                }
            }
            None => snapshot
                .platforms
                .iter()
                .filter(|p| p.y > player.y)
                .min_by_key(|p| (p.y - player.y, horizontal_gap(p, player.x)))
                .filter(|p| horizontal_gap(p, player.x) > 0)
                .map_or(Command::None, |p| step_towards(p.x + p.w / 2 - player.x)),
        }
    }
}

impl InputSource for AutoPilot {
    fn poll(&mut self) -> Result<Vec<Command>> {
        // Any forwarded command wakes the player on the first frame
        let command = match &self.last {
            Some(snapshot) => Self::decide(snapshot),
            None => Command::Right,
        };
        Ok(vec![command])
    }

    fn observe(&mut self, snapshot: &GameSnapshot) {
        self.last = Some(snapshot.clone());
    }
}

fn covers(rect: &TileRect, cell: IVec2) -> bool {
    spans(rect, cell.x) && (rect.y..rect.y + rect.h).contains(&cell.y)
}

fn spans(rect: &TileRect, x: i32) -> bool {
    (rect.x..rect.x + rect.w).contains(&x)
}

/// Columns between `x` and the nearest column of `rect`
fn horizontal_gap(rect: &TileRect, x: i32) -> i32 {
    if x < rect.x {
        rect.x - x
    } else if x >= rect.x + rect.w {
        x - (rect.x + rect.w - 1)
    } else {
        0
    }
}

fn step_towards(dx: i32) -> Command {
    match dx.signum() {
        1 => Command::Right,
        -1 => Command::Left,
        _ => Command::None,
    }
}

/// Replays a fixed command list, then goes quiet
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<Command>>,
}

impl ScriptedInput {
    /// One command per poll
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self::from_batches(commands.into_iter().map(|c| vec![c]))
    }

    /// Several commands per poll
    pub fn from_batches(batches: impl IntoIterator<Item = Vec<Command>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// Polls left before the script runs out
    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<Vec<Command>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
