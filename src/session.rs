//! Paced match loop: poll input, tick, draw, wait for the next frame

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::host::InputSource;
use crate::renderer::{Renderer, draw_game};
use crate::sim::clock::{Clock, FramePacer};
use crate::sim::rng::RandomSource;
use crate::sim::state::{EndReason, Game};
use crate::sim::tick::{TickStatus, tick};

/// Outcome of a finished match, handed to the wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub player_name: String,
    pub score: u64,
    pub lives: u32,
    pub played_frames: u64,
    pub reason: EndReason,
    /// Frames whose update overran the budget
    pub late_frames: u64,
}

impl MatchSummary {
    fn new(game: &Game, reason: EndReason, late_frames: u64) -> Self {
        Self {
            player_name: game.player.name.clone(),
            score: game.player.score,
            lives: game.player.lives,
            played_frames: game.played_frames,
            reason,
            late_frames,
        }
    }

    /// One-line game over text
    pub fn describe(&self) -> String {
        let how = match self.reason {
            EndReason::OutOfLives => "died",
            EndReason::TimeUp => "ran out of time",
            EndReason::Quit => "gave up",
        };
        format!("{} {} after making {} points.", self.player_name, how, self.score)
    }
}

/// Run the match to its end at the configured frame rate
pub fn run_match(
    game: &mut Game,
    input: &mut impl InputSource,
    renderer: &mut impl Renderer,
    clock: &mut impl Clock,
    rng: &mut impl RandomSource,
) -> Result<MatchSummary> {
    let mut pacer = FramePacer::new(game.settings.fps);
    pacer.start(clock);

    loop {
        let commands = match input.poll() {
            Ok(commands) => commands,
            Err(e) if !e.is_fatal() => {
                log::warn!("Ignoring input failure: {e}");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let status = tick(game, commands, rng)?;
        let snapshot = game.snapshot();
        draw_game(&snapshot, renderer)?;
        input.observe(&snapshot);

        if let TickStatus::Ended(reason) = status {
            if pacer.late_frames() > 0 {
                log::debug!("{} of {} frames ran late", pacer.late_frames(), pacer.ticks());
            }
            return Ok(MatchSummary::new(game, reason, pacer.late_frames()));
        }
        pacer.pace(clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::host::ScriptedInput;
    use crate::renderer::{TextRenderer, screen_lines};
    use crate::settings::{Settings, test_settings};
    use crate::sim::clock::ManualClock;
    use crate::sim::command::Command;
    use crate::sim::platform::Platform;
    use crate::sim::rng::PcgRandom;
    use std::io;

    fn short_match() -> Game {
        let settings = Settings {
            limit_played_frames: 60,
            player_name: "Ada".to_string(),
            ..test_settings()
        };
        Game::with_platforms(settings, vec![Platform::new(1, 8, 18, 0, 0)]).expect("game")
    }

    fn renderer(game: &Game) -> TextRenderer<Vec<u8>> {
        TextRenderer::new(
            game.settings.columns,
            screen_lines(game.settings.lines),
            Vec::new(),
        )
    }

    #[test]
    fn test_match_runs_to_time_limit() {
        let mut game = short_match();
        let mut renderer = renderer(&game);
        let mut clock = ManualClock::default();
        let mut input = ScriptedInput::new([Command::Right]);

        let summary = run_match(
            &mut game,
            &mut input,
            &mut renderer,
            &mut clock,
            &mut PcgRandom::new(3),
        )
        .expect("match");

        assert_eq!(summary.reason, EndReason::TimeUp);
        assert_eq!(summary.played_frames, 60);
        assert_eq!(summary.score, 2);
        assert_eq!(summary.late_frames, 0);
        assert_eq!(summary.describe(), "Ada ran out of time after making 2 points.");
        assert_eq!(renderer.frames(), 60);
        // Paced between frames, not after the last one
        assert_eq!(clock.now, 59 * FramePacer::new(30).frame_ms());
        assert!(renderer.frame_text().contains('@'));
    }

    #[test]
    fn test_quit_ends_match() {
        let mut game = short_match();
        let mut renderer = renderer(&game);
        let mut input = ScriptedInput::new([Command::Right, Command::None, Command::Quit]);

        let summary = run_match(
            &mut game,
            &mut input,
            &mut renderer,
            &mut ManualClock::default(),
            &mut PcgRandom::new(3),
        )
        .expect("match");
        assert_eq!(summary.reason, EndReason::Quit);
        assert_eq!(summary.played_frames, 2);
        assert!(summary.describe().starts_with("Ada gave up"));
    }

    /// Fails once with the given error, then quits
    struct FlakyInput {
        failure: Option<GameError>,
    }

    impl InputSource for FlakyInput {
        fn poll(&mut self) -> Result<Vec<Command>> {
            match self.failure.take() {
                Some(e) => Err(e),
                None => Ok(vec![Command::Quit]),
            }
        }
    }

    #[test]
    fn test_transient_input_failures_are_skipped() {
        let mut game = short_match();
        let mut renderer = renderer(&game);
        let mut input = FlakyInput {
            failure: Some(GameError::TransientInput("keyboard hiccup".to_string())),
        };
        let summary = run_match(
            &mut game,
            &mut input,
            &mut renderer,
            &mut ManualClock::default(),
            &mut PcgRandom::new(3),
        )
        .expect("match");
        assert_eq!(summary.reason, EndReason::Quit);
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn test_fatal_input_failures_abort() {
        let mut game = short_match();
        let mut renderer = renderer(&game);
        let mut input = FlakyInput {
            failure: Some(GameError::Io(io::Error::other("device gone"))),
        };
        let result = run_match(
            &mut game,
            &mut input,
            &mut renderer,
            &mut ManualClock::default(),
            &mut PcgRandom::new(3),
        );
        assert!(matches!(result, Err(GameError::Io(_))));
        assert_eq!(renderer.frames(), 0);
    }
}
