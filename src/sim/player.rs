//! Player physics: input, gravity, jumping, vertical integration, lives

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::matrix::RigidMatrix;
use super::perk::Perk;
use super::platform::{Platform, PlatformId, platform_at};
use crate::consts::MAXIMUM_PLAYER_NAME_SIZE;
use crate::settings::Settings;

/// Ways to lose a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hazard {
    /// Pinned by a platform with nowhere to go
    Crushed,
    /// Dropped into the bottom wall
    FellOff,
    /// Head bump against the top wall
    HitCeiling,
}

impl Hazard {
    pub fn description(&self) -> &'static str {
        match self {
            Hazard::Crushed => "crushed",
            Hazard::FellOff => "fell off",
            Hazard::HitCeiling => "hit the ceiling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    LifeLost(Hazard),
    /// Invincibility absorbed the hazard
    Shielded(Hazard),
}

/// Result of forcing the player out of a solid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoveOutcome {
    Moved,
    Ejected,
    Crushed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub pos: IVec2,
    /// Tiles per tick, negative is up
    pub vy: i32,
    pub lives: u32,
    pub score: u64,
    pub perk: Perk,
    pub perk_end_frame: u64,
    /// Weak link to the supporting platform, resolved on every access
    pub on_platform: Option<PlatformId>,
    pub jumping: bool,
    /// False until the first command of the match
    pub active: bool,
}

impl Player {
    pub fn new(name: &str, pos: IVec2, lives: u32) -> Self {
        Self {
            name: bounded_name(name),
            pos,
            vy: 0,
            lives,
            score: 0,
            perk: Perk::None,
            perk_end_frame: 0,
            on_platform: None,
            jumping: false,
            active: false,
        }
    }

    /// Leave the initial frozen state
    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn is_standing(&self, matrix: &RigidMatrix) -> bool {
        blocks_descent(matrix, self.pos + IVec2::Y)
    }

    /// Steps before platforms move: horizontal input, gravity, jump
    pub fn begin_step(
        &mut self,
        command: Command,
        matrix: &RigidMatrix,
        platforms: &[Platform],
        settings: &Settings,
        frame: u64,
    ) {
        match command {
            Command::Left => self.try_move(IVec2::NEG_X, matrix, platforms),
            Command::Right => self.try_move(IVec2::X, matrix, platforms),
            Command::Center => {
                let midline = IVec2::new(settings.columns / 2, self.pos.y);
                if !matrix.is_solid(midline) {
                    self.pos = midline;
                    self.on_platform = self.supporting_platform(matrix, platforms);
                }
            }
            Command::Convert => self.convert_perk(frame, settings.fps),
            _ => {}
        }

        if self.perk == Perk::Levitation {
            self.vy = if command == Command::Down {
                settings.levitation_velocity
            } else {
                -settings.levitation_velocity
            };
        } else {
            // Low gravity pulls on even frames only
            let gravity = if self.perk == Perk::LowGravity && frame % 2 == 1 {
                0
            } else {
                settings.gravity
            };
            self.vy = (self.vy + gravity).clamp(-settings.terminal_velocity, settings.terminal_velocity);
        }

        if command == Command::Jump && self.is_standing(matrix) {
            let multiplier = if self.perk == Perk::SuperJump { 2 } else { 1 };
            self.vy = settings.jump_velocity * multiplier;
            self.jumping = true;
            self.on_platform = None;
        }
    }

    fn try_move(&mut self, step: IVec2, matrix: &RigidMatrix, platforms: &[Platform]) {
        let target = self.pos + step;
        if !matrix.is_solid(target) {
            self.pos = target;
            self.on_platform = self.supporting_platform(matrix, platforms);
        }
    }

    fn supporting_platform(&self, matrix: &RigidMatrix, platforms: &[Platform]) -> Option<PlatformId> {
        if self.is_standing(matrix) {
            platform_at(platforms, self.pos + IVec2::Y)
        } else {
            None
        }
    }

    /// Trade an active power for one point per remaining whole second
    fn convert_perk(&mut self, frame: u64, fps: u32) {
        if !self.perk.is_power() {
            return;
        }
        let remaining = self.perk_end_frame.saturating_sub(frame);
        self.score += remaining / u64::from(fps.max(1));
        self.perk = Perk::None;
    }

    /// Move `|vy|` cells one at a time, stopping at the first solid cell
    pub fn integrate(
        &mut self,
        matrix: &RigidMatrix,
        platforms: &[Platform],
        settings: &Settings,
    ) -> Option<PlayerEvent> {
        let step = IVec2::new(0, self.vy.signum());
        let mut hazard = None;

        for _ in 0..self.vy.unsigned_abs() {
            let next = self.pos + step;
            if step.y > 0 {
                if blocks_descent(matrix, next) {
                    break;
                }
            } else if matrix.is_solid(next) {
                self.vy = 0;
                if next.y == 0 && self.perk != Perk::Levitation {
                    hazard = Some(Hazard::HitCeiling);
                }
                break;
            }
            self.pos = next;
            if self.pos.y >= matrix.lines() - 1 {
                break;
            }
        }

        let standing = self.is_standing(matrix);
        if standing && self.vy > 0 {
            self.vy = 0;
            self.jumping = false;
        }
        self.on_platform = if standing {
            platform_at(platforms, self.pos + IVec2::Y)
        } else {
            None
        };

        hazard.map(|h| self.suffer(h, matrix, settings))
    }

    /// Falling into the bottom wall costs a life even when invincible
    pub fn check_floor(&mut self, matrix: &RigidMatrix, settings: &Settings) -> Option<PlayerEvent> {
        if self.pos.y >= settings.lines - 1 {
            Some(self.suffer(Hazard::FellOff, matrix, settings))
        } else {
            None
        }
    }

    /// Push the player along `direction` until a free cell turns up. A wall
    /// ends the search; the player then tries the cell above its own.
    pub fn shove(&mut self, direction: IVec2, matrix: &RigidMatrix) -> ShoveOutcome {
        let origin = self.pos;
        self.on_platform = None;

        if direction != IVec2::ZERO {
            let mut probe = origin + direction;
            while !matrix.is_wall(probe) {
                if !matrix.is_solid(probe) {
                    self.pos = probe;
                    return ShoveOutcome::Moved;
                }
                probe += direction;
            }
        }

        let above = origin + IVec2::NEG_Y;
        if !matrix.is_solid(above) {
            self.pos = above;
            return ShoveOutcome::Ejected;
        }
        ShoveOutcome::Crushed
    }

    /// Apply a hazard. Invincibility absorbs everything but falling off; an
    /// absorbed crush relocates the player to the respawn cell.
    pub fn suffer(&mut self, hazard: Hazard, matrix: &RigidMatrix, settings: &Settings) -> PlayerEvent {
        if hazard != Hazard::FellOff && self.perk == Perk::Invincibility {
            if matrix.is_solid(self.pos) {
                self.place_at_respawn(matrix, settings);
            }
            return PlayerEvent::Shielded(hazard);
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.place_at_respawn(matrix, settings);
        } else {
            self.vy = 0;
            self.on_platform = None;
        }
        PlayerEvent::LifeLost(hazard)
    }

    fn place_at_respawn(&mut self, matrix: &RigidMatrix, settings: &Settings) {
        self.pos = respawn_cell(matrix, settings);
        self.vy = 0;
        self.jumping = false;
        self.on_platform = None;
    }
}

/// Whether a cell stops downward motion. The bottom wall is a lethal floor:
/// it only supports the player where a platform also occupies it.
pub fn blocks_descent(matrix: &RigidMatrix, cell: IVec2) -> bool {
    let on_floor = cell.y == matrix.lines() - 1 && cell.x > 0 && cell.x < matrix.columns() - 1;
    if on_floor {
        matrix.get(cell.x, cell.y) >= 2
    } else {
        matrix.is_solid(cell)
    }
}

/// The spawn cell when free, otherwise the first free interior cell scanning
/// rows from the spawn row downwards and wrapping to the top
pub fn respawn_cell(matrix: &RigidMatrix, settings: &Settings) -> IVec2 {
    let spawn = settings.spawn();
    if !matrix.is_solid(spawn) {
        return spawn;
    }
    let rows = (spawn.y..=settings.max_y()).chain(settings.min_y()..spawn.y);
    for y in rows {
        for x in settings.min_x()..=settings.max_x() {
            let cell = IVec2::new(x, y);
            if !matrix.is_solid(cell) {
                return cell;
            }
        }
    }
    spawn
}

/// Truncate on a character boundary so the name fits its buffer
fn bounded_name(name: &str) -> String {
    let mut end = name.len().min(MAXIMUM_PLAYER_NAME_SIZE);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::test_settings;

    fn world(platforms: &[Platform]) -> (Settings, RigidMatrix) {
        let settings = test_settings();
        let mut matrix = RigidMatrix::new(settings.columns, settings.lines);
        for platform in platforms {
            matrix.modify_platform(platform, 1).expect("occupy");
        }
        (settings, matrix)
    }

    fn player_at(x: i32, y: i32) -> Player {
        let mut player = Player::new("Tester", IVec2::new(x, y), 3);
        player.activate();
        player
    }

    #[test]
    fn test_horizontal_moves_respect_solids() {
        let platforms = [Platform::new(6, 4, 2, 0, 0)];
        let (settings, matrix) = world(&platforms);
        let mut player = player_at(5, 4);

        player.begin_step(Command::Right, &matrix, &platforms, &settings, 1);
        assert_eq!(player.pos.x, 5);
        player.begin_step(Command::Left, &matrix, &platforms, &settings, 2);
        assert_eq!(player.pos.x, 4);

        let mut player = player_at(1, 4);
        player.begin_step(Command::Left, &matrix, &platforms, &settings, 3);
        assert_eq!(player.pos.x, 1);
    }

    #[test]
    fn test_center_teleports_to_midline() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(3, 4);
        player.begin_step(Command::Center, &matrix, &[], &settings, 1);
        assert_eq!(player.pos, IVec2::new(10, 4));

        let platforms = [Platform::new(9, 4, 3, 0, 0)];
        let (settings, matrix) = world(&platforms);
        let mut player = player_at(3, 4);
        player.begin_step(Command::Center, &matrix, &platforms, &settings, 1);
        assert_eq!(player.pos, IVec2::new(3, 4));
    }

    #[test]
    fn test_gravity_clamps_to_terminal_velocity() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(5, 2);
        for frame in 1..10 {
            player.begin_step(Command::None, &matrix, &[], &settings, frame);
        }
        assert_eq!(player.vy, settings.terminal_velocity);
    }

    #[test]
    fn test_low_gravity_applies_every_other_frame() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(5, 2);
        player.perk = Perk::LowGravity;
        player.begin_step(Command::None, &matrix, &[], &settings, 1);
        assert_eq!(player.vy, 0);
        player.begin_step(Command::None, &matrix, &[], &settings, 2);
        assert_eq!(player.vy, 1);
    }

    #[test]
    fn test_levitation_rises_and_descends_on_down() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(5, 5);
        player.perk = Perk::Levitation;
        player.begin_step(Command::None, &matrix, &[], &settings, 1);
        assert_eq!(player.vy, -settings.levitation_velocity);
        player.begin_step(Command::Down, &matrix, &[], &settings, 2);
        assert_eq!(player.vy, settings.levitation_velocity);
    }

    #[test]
    fn test_jump_requires_ground() {
        let platforms = [Platform::new(4, 5, 3, 0, 0)];
        let (settings, matrix) = world(&platforms);

        let mut standing = player_at(5, 4);
        standing.begin_step(Command::Jump, &matrix, &platforms, &settings, 1);
        assert_eq!(standing.vy, -4);
        assert!(standing.jumping);

        // Airborne: a jump changes nothing compared to no input
        let mut jumping = player_at(5, 2);
        let mut idle = player_at(5, 2);
        jumping.begin_step(Command::Jump, &matrix, &platforms, &settings, 1);
        idle.begin_step(Command::None, &matrix, &platforms, &settings, 1);
        assert_eq!(jumping.vy, idle.vy);
        assert!(!jumping.jumping);
    }

    #[test]
    fn test_super_jump_doubles_impulse() {
        let platforms = [Platform::new(4, 5, 3, 0, 0)];
        let (settings, matrix) = world(&platforms);
        let mut player = player_at(5, 4);
        player.perk = Perk::SuperJump;
        player.begin_step(Command::Jump, &matrix, &platforms, &settings, 1);
        assert_eq!(player.vy, -8);
    }

    #[test]
    fn test_integrate_lands_on_platform() {
        let platforms = [Platform::new(4, 5, 3, 0, 0)];
        let (settings, matrix) = world(&platforms);
        let mut player = player_at(5, 2);
        player.vy = 4;
        assert_eq!(player.integrate(&matrix, &platforms, &settings), None);
        assert_eq!(player.pos, IVec2::new(5, 4));
        assert_eq!(player.vy, 0);
        assert_eq!(player.on_platform, Some(PlatformId(0)));
    }

    #[test]
    fn test_head_bump_on_platform_stops() {
        let platforms = [Platform::new(4, 2, 3, 0, 0)];
        let (settings, matrix) = world(&platforms);
        let mut player = player_at(5, 5);
        player.vy = -4;
        assert_eq!(player.integrate(&matrix, &platforms, &settings), None);
        assert_eq!(player.pos, IVec2::new(5, 3));
        assert_eq!(player.vy, 0);
        assert_eq!(player.lives, 3);
    }

    #[test]
    fn test_head_bump_on_top_wall_is_lethal() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(5, 2);
        player.vy = -4;
        let event = player.integrate(&matrix, &[], &settings);
        assert_eq!(event, Some(PlayerEvent::LifeLost(Hazard::HitCeiling)));
        assert_eq!(player.lives, 2);
        assert_eq!(player.pos, settings.spawn());

        let mut shielded = player_at(5, 2);
        shielded.perk = Perk::Invincibility;
        shielded.vy = -4;
        let event = shielded.integrate(&matrix, &[], &settings);
        assert_eq!(event, Some(PlayerEvent::Shielded(Hazard::HitCeiling)));
        assert_eq!(shielded.pos, IVec2::new(5, 1));

        let mut floating = player_at(5, 1);
        floating.perk = Perk::Levitation;
        floating.vy = -1;
        assert_eq!(floating.integrate(&matrix, &[], &settings), None);
        assert_eq!(floating.lives, 3);
    }

    #[test]
    fn test_falling_into_bottom_wall() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(5, 7);
        player.vy = 4;
        assert_eq!(player.integrate(&matrix, &[], &settings), None);
        assert_eq!(player.pos, IVec2::new(5, 9));

        player.perk = Perk::Invincibility;
        let event = player.check_floor(&matrix, &settings);
        assert_eq!(event, Some(PlayerEvent::LifeLost(Hazard::FellOff)));
        assert_eq!(player.lives, 2);
        assert_eq!(player.pos, settings.spawn());
    }

    #[test]
    fn test_platform_on_floor_row_supports() {
        let platforms = [Platform::new(4, 9, 3, 0, 0)];
        let (_, matrix) = world(&platforms);
        let player = player_at(5, 8);
        assert!(player.is_standing(&matrix));
        let player = player_at(8, 8);
        assert!(!player.is_standing(&matrix));
    }

    #[test]
    fn test_last_life_keeps_player_in_place() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(5, 9);
        player.lives = 1;
        player.check_floor(&matrix, &settings);
        assert!(!player.is_alive());
        assert_eq!(player.pos, IVec2::new(5, 9));
    }

    #[test]
    fn test_respawn_scans_when_spawn_blocked() {
        let platforms = [Platform::new(1, 2, 18, 0, 0)];
        let (settings, matrix) = world(&platforms);
        assert_eq!(respawn_cell(&matrix, &settings), IVec2::new(1, 3));
    }

    #[test]
    fn test_convert_trades_power_for_points() {
        let (settings, matrix) = world(&[]);
        let mut player = player_at(5, 5);
        player.perk = Perk::TimeStop;
        player.perk_end_frame = 100 + 10 * 30 + 5;
        player.begin_step(Command::Convert, &matrix, &[], &settings, 100);
        assert_eq!(player.score, 10);
        assert_eq!(player.perk, Perk::None);
    }

    #[test]
    fn test_name_is_bounded() {
        let long = "x".repeat(200);
        assert_eq!(Player::new(&long, IVec2::ONE, 1).name.len(), MAXIMUM_PLAYER_NAME_SIZE);
    }
}
