//! Walls of Doom entry point
//!
//! Runs a match in the terminal, played from the keyboard or by the
//! autopilot with `--demo`, and records the result in the high score table.

use std::path::Path;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use clap::error::ErrorKind;

use walls_of_doom::host::{AutoPilot, KeyboardInput, SystemClock};
use walls_of_doom::renderer::{ScreenGuard, TextRenderer, screen_lines};
use walls_of_doom::session::{MatchSummary, run_match};
use walls_of_doom::sim::{Game, PcgRandom};
use walls_of_doom::{HighScores, Settings};

const SETTINGS_PATH: &str = "settings.json";
const HIGHSCORES_PATH: &str = "highscores.json";

/// Walls of Doom: dodge the platforms, collect perks, survive
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Let the autopilot play
    #[arg(long)]
    demo: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            match e.kind() {
                ErrorKind::DisplayVersion | ErrorKind::DisplayHelp => {
                    if let Err(io) = e.print() {
                        log::warn!("Failed to print usage: {io}");
                    }
                }
                _ => log::warn!("Unrecognized argument: {e}"),
            }
            return ExitCode::SUCCESS;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> walls_of_doom::Result<()> {
    let settings = Settings::load(Path::new(SETTINGS_PATH))?;
    let mut rng = PcgRandom::new(settings.seed.unwrap_or_else(|| unix_time() ^ 0x5eed_0f_d00d));
    log::info!("Walls of Doom starting (seed {})", rng.current_seed());

    let mut game = Game::new(settings, &mut rng)?;
    let summary = play(&mut game, &mut rng, cli.demo)?;
    println!("{}", summary.describe());

    let path = Path::new(HIGHSCORES_PATH);
    let mut scores = HighScores::load(path)?;
    let best = scores.top_score();
    match scores.add_score(&summary.player_name, summary.score, summary.played_frames, unix_time()) {
        Some(rank) => {
            if best.is_none_or(|best| summary.score > best) {
                println!("New record!");
            } else {
                println!("New high score, rank #{rank}!");
            }
            scores.save(path)?;
        }
        None => println!("No high score this time."),
    }
    for line in scores.table(game.settings.fps) {
        println!("{line}");
    }
    Ok(())
}

/// One match on the alternate screen; the terminal is restored on return
fn play(game: &mut Game, rng: &mut PcgRandom, demo: bool) -> walls_of_doom::Result<MatchSummary> {
    let _screen = ScreenGuard::enter()?;
    let mut renderer = TextRenderer::stdout(game.settings.columns, screen_lines(game.settings.lines));
    let mut clock = SystemClock::new();
    if demo {
        run_match(game, &mut AutoPilot::new(), &mut renderer, &mut clock, rng)
    } else {
        run_match(game, &mut KeyboardInput::new(), &mut renderer, &mut clock, rng)
    }
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
