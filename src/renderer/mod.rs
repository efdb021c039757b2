//! Rendering module
//!
//! The simulation never draws. After each tick the session hands a
//! [`GameSnapshot`] to [`draw_game`], which issues primitive calls against a
//! [`Renderer`] backend in tile coordinates.

pub mod text;

pub use text::{ScreenGuard, TextRenderer};

use crate::error::Result;
use crate::sim::snapshot::{GameSnapshot, TileRect, TopBar};

/// Lines reserved above and below the playfield for the status bars
pub const BAR_LINES: i32 = 1;

/// Total screen height for a playfield of `lines` rows
pub fn screen_lines(lines: i32) -> i32 {
    lines + 2 * BAR_LINES
}

/// What a tile represents, the backend picks the actual appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Border,
    Platform,
    Perk,
    Player,
}

/// Rendering backend
pub trait Renderer {
    fn begin_frame(&mut self);

    /// Fill a rectangle of tiles; parts off screen are clipped
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);

    /// Write `text` horizontally centered on screen line `line`
    fn draw_text_centered(&mut self, line: i32, text: &str);

    fn present(&mut self) -> Result<()>;
}

/// Draw a complete frame: top bar, playfield, bottom bar
pub fn draw_game(snapshot: &GameSnapshot, renderer: &mut impl Renderer) -> Result<()> {
    renderer.begin_frame();

    renderer.draw_text_centered(0, &top_bar_line(&snapshot.top_bar, snapshot.columns));

    // Borders
    let (w, h) = (snapshot.columns, snapshot.lines);
    renderer.draw_rect(0, BAR_LINES, w, 1, Color::Border);
    renderer.draw_rect(0, BAR_LINES + h - 1, w, 1, Color::Border);
    renderer.draw_rect(0, BAR_LINES, 1, h, Color::Border);
    renderer.draw_rect(w - 1, BAR_LINES, 1, h, Color::Border);

    for platform in &snapshot.platforms {
        draw_tiles(renderer, platform, Color::Platform);
    }
    if let Some(perk) = &snapshot.perk {
        draw_tiles(renderer, perk, Color::Perk);
    }
    draw_tiles(renderer, &snapshot.player, Color::Player);

    renderer.draw_text_centered(BAR_LINES + h, &bottom_bar_line(snapshot));
    renderer.present()
}

fn draw_tiles(renderer: &mut impl Renderer, rect: &TileRect, color: Color) {
    renderer.draw_rect(rect.x, rect.y + BAR_LINES, rect.w, rect.h, color);
}

/// The four top bar strings, each centered in a quarter of the width
fn top_bar_line(top_bar: &TopBar, columns: i32) -> String {
    let field = (columns / 4).max(1) as usize;
    top_bar
        .strings()
        .iter()
        .map(|s| format!("{s:^field$}"))
        .collect()
}

fn bottom_bar_line(snapshot: &GameSnapshot) -> String {
    if snapshot.bottom_bar.is_empty() && snapshot.paused {
        "Game paused".to_string()
    } else {
        snapshot.bottom_bar.clone()
    }
}
