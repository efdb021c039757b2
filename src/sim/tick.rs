//! Fixed timestep simulation tick
//!
//! Core game loop that advances the match deterministically, one logical
//! frame per call.

use super::command::{Command, last_command};
use super::message::expire_message;
use super::perk::{Perk, PerkEvent, decay_active_perk, update_perk_slot};
use super::platform::advance_platforms;
use super::player::PlayerEvent;
use super::rng::RandomSource;
use super::state::{EndReason, Game, PRIORITY_DEATH, PRIORITY_INFO, PRIORITY_PERK};
use crate::error::Result;

/// Whether the match goes on after this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Running,
    Ended(EndReason),
}

/// Advance the game by one fixed timestep.
///
/// `commands` holds everything the input backend produced since the previous
/// tick; only the last non-`None` one counts.
pub fn tick<I>(game: &mut Game, commands: I, rng: &mut impl RandomSource) -> Result<TickStatus>
where
    I: IntoIterator<Item = Command>,
{
    if let Some(reason) = game.ended {
        return Ok(TickStatus::Ended(reason));
    }

    // Handle pause toggle and exit requests
    let command = last_command(commands);
    if command.is_exit() {
        return Ok(end_match(game, EndReason::Quit));
    }
    if command == Command::Pause {
        game.paused = !game.paused;
        if game.paused {
            game.set_message("Game paused", PRIORITY_INFO);
        }
    }
    if game.paused {
        return Ok(TickStatus::Running);
    }

    // The player wakes up on its first command
    let command = if command.is_forwarded() {
        game.player.activate();
        command
    } else {
        Command::None
    };
    if !game.player.active {
        return Ok(TickStatus::Running);
    }

    game.current_frame += 1;
    game.played_frames += 1;
    let frame = game.current_frame;

    // Perks
    if let Some(expired) = decay_active_perk(&mut game.player, frame) {
        log::debug!("{} wore off on frame {frame}", expired.name());
    }
    let perk_events = update_perk_slot(
        &mut game.perk,
        &mut game.player,
        &mut game.matrix,
        &game.settings,
        frame,
        rng,
    )?;
    for event in perk_events {
        announce_perk(game, event);
    }

    // Input, gravity, jump
    game.player
        .begin_step(command, &game.matrix, &game.platforms, &game.settings, frame);

    // Platforms, frozen under Time Stop
    let mut player_events = Vec::new();
    if game.player.perk != Perk::TimeStop {
        player_events = advance_platforms(
            &mut game.platforms,
            &mut game.matrix,
            &mut game.player,
            &game.settings,
            frame,
        )?;
    }

    // Vertical integration and the floor check
    if game.player.is_alive() {
        player_events.extend(game.player.integrate(&game.matrix, &game.platforms, &game.settings));
        player_events.extend(game.player.check_floor(&game.matrix, &game.settings));
    }
    for event in player_events {
        announce_player(game, event);
    }

    // One point per second of play
    if game.played_frames % u64::from(game.settings.fps) == 0 {
        game.player.score += 1;
    }
    expire_message(&mut game.message, frame);

    if !game.player.is_alive() {
        return Ok(end_match(game, EndReason::OutOfLives));
    }
    if game.played_frames >= game.limit_played_frames {
        return Ok(end_match(game, EndReason::TimeUp));
    }
    Ok(TickStatus::Running)
}

fn end_match(game: &mut Game, reason: EndReason) -> TickStatus {
    game.ended = Some(reason);
    log::info!(
        "Match ended ({:?}) after {} played frames: {} scored {}",
        reason,
        game.played_frames,
        game.player.name,
        game.player.score
    );
    TickStatus::Ended(reason)
}

fn announce_perk(game: &mut Game, event: PerkEvent) {
    match event {
        PerkEvent::Collected(kind) => {
            log::info!("{} got {} on frame {}", game.player.name, kind.name(), game.current_frame);
            game.set_message(&format!("Got {}!", kind.name()), PRIORITY_PERK);
        }
        PerkEvent::Expired(kind) => log::debug!("{} vanished uncollected", kind.name()),
        PerkEvent::Spawned { .. } | PerkEvent::SpawnSkipped => {}
    }
}

fn announce_player(game: &mut Game, event: PlayerEvent) {
    match event {
        PlayerEvent::LifeLost(hazard) => {
            log::info!(
                "{} {} on frame {}, {} lives left",
                game.player.name,
                hazard.description(),
                game.current_frame,
                game.player.lives
            );
            let text = format!("You {}! Lives left: {}", hazard.description(), game.player.lives);
            game.set_message(&text, PRIORITY_DEATH);
        }
        PlayerEvent::Shielded(hazard) => {
            log::debug!("Invincibility absorbed: {}", hazard.description());
            game.set_message("Invincibility saved you!", PRIORITY_PERK);
        }
    }
}
