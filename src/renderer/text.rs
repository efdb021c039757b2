//! Terminal renderer: one character per tile
//!
//! A frame is composed in a tile buffer, then emitted as a batch of queued
//! terminal commands and flushed once.

use std::io::{self, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use super::{Color, Renderer};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tile {
    ch: char,
    color: Option<Color>,
}

const BLANK: Tile = Tile {
    ch: ' ',
    color: None,
};

fn glyph(color: Color) -> char {
    match color {
        Color::Border => '#',
        Color::Platform => '=',
        Color::Perk => '*',
        Color::Player => '@',
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Border => TermColor::DarkGrey,
        Color::Platform => TermColor::Cyan,
        Color::Perk => TermColor::Yellow,
        Color::Player => TermColor::Green,
    }
}

/// Tile buffer flushed to a writer on every `present`
pub struct TextRenderer<W: Write> {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    out: W,
    /// Position rows with cursor moves and color them, instead of printing
    /// plain lines
    cursor_addressing: bool,
    frames: u64,
}

impl TextRenderer<io::Stdout> {
    /// Renderer drawing in place on the terminal. Pair it with a
    /// [`ScreenGuard`].
    pub fn stdout(width: i32, height: i32) -> Self {
        Self::terminal(width, height, io::stdout())
    }
}

impl<W: Write> TextRenderer<W> {
    /// Plain renderer: every frame is written as `height` lines of text
    pub fn new(width: i32, height: i32, out: W) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![BLANK; (width * height) as usize],
            out,
            cursor_addressing: false,
            frames: 0,
        }
    }

    /// Renderer redrawing in place with cursor moves and colors
    pub fn terminal(width: i32, height: i32, out: W) -> Self {
        Self {
            cursor_addressing: true,
            ..Self::new(width, height, out)
        }
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current buffer, one line per screen row
    pub fn frame_text(&self) -> String {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| t.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn put(&mut self, x: i32, y: i32, tile: Tile) {
        if (0..self.width).contains(&x) && (0..self.height).contains(&y) {
            self.tiles[(y * self.width + x) as usize] = tile;
        }
    }

    fn queue_lines(&mut self) -> io::Result<()> {
        let text = self.frame_text();
        for line in text.split('\n') {
            queue!(self.out, Print(line), Print('\n'))?;
        }
        Ok(())
    }

    fn queue_addressed(&mut self) -> io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            queue!(self.out, MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let tile = self.tiles[(y * self.width + x) as usize];
                if tile.color != current {
                    match tile.color {
                        Some(color) => queue!(self.out, SetForegroundColor(term_color(color)))?,
                        None => queue!(self.out, ResetColor)?,
                    }
                    current = tile.color;
                }
                queue!(self.out, Print(tile.ch))?;
            }
        }
        queue!(self.out, ResetColor)
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn begin_frame(&mut self) {
        self.tiles.fill(BLANK);
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let tile = Tile {
            ch: glyph(color),
            color: Some(color),
        };
        for ty in y..y + h {
            for tx in x..x + w {
                self.put(tx, ty, tile);
            }
        }
    }

    fn draw_text_centered(&mut self, line: i32, text: &str) {
        let len = text.chars().count() as i32;
        let start = ((self.width - len) / 2).max(0);
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, line, Tile { ch, color: None });
        }
    }

    fn present(&mut self) -> Result<()> {
        if self.cursor_addressing {
            self.queue_addressed()?;
        } else {
            self.queue_lines()?;
        }
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }
}

/// Raw mode and the alternate screen for as long as the guard lives.
/// Dropping it restores the terminal, also when unwinding.
#[derive(Debug)]
pub struct ScreenGuard {
    _private: (),
}

impl ScreenGuard {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on a failure still restores through Drop
        let guard = Self { _private: () };
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        Ok(guard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let restored = execute!(
            io::stdout(),
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )
        .and_then(|()| terminal::disable_raw_mode());
        if let Err(e) = restored {
            log::warn!("Failed to restore the terminal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rects_are_clipped() {
        let mut renderer = TextRenderer::new(4, 2, Vec::new());
        renderer.begin_frame();
        renderer.draw_rect(-1, 0, 3, 1, Color::Platform);
        renderer.draw_rect(3, 1, 5, 5, Color::Border);
        assert_eq!(renderer.frame_text(), "==  \n   #");
    }

    #[test]
    fn test_text_is_centered() {
        let mut renderer = TextRenderer::new(9, 1, Vec::new());
        renderer.begin_frame();
        renderer.draw_text_centered(0, "abc");
        assert_eq!(renderer.frame_text(), "   abc   ");

        // Wider than the screen: starts at the left edge
        renderer.draw_text_centered(0, "0123456789");
        assert_eq!(renderer.frame_text(), "012345678");
    }

    #[test]
    fn test_present_writes_frame() {
        let mut renderer = TextRenderer::new(3, 1, Vec::new());
        renderer.begin_frame();
        renderer.draw_rect(1, 0, 1, 1, Color::Player);
        renderer.present().expect("present");
        renderer.begin_frame();
        renderer.present().expect("present");
        assert_eq!(renderer.frames(), 2);
        let out = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert_eq!(out, " @ \n   \n");
    }

    #[test]
    fn test_terminal_frames_are_addressed_and_colored() {
        let mut renderer = TextRenderer::terminal(3, 2, Vec::new());
        renderer.begin_frame();
        renderer.draw_rect(1, 1, 1, 1, Color::Player);
        renderer.present().expect("present");

        let out = String::from_utf8(renderer.into_inner()).expect("utf8");
        // Rows are positioned explicitly (1-based CSI row;column)
        assert!(out.contains("\x1b[1;1H"));
        assert!(out.contains("\x1b[2;1H"));
        assert!(out.contains('@'));
        assert!(!out.contains('\n'));
        // Color is switched for the player and reset after it
        let player = out.find('@').expect("player glyph");
        assert!(out[..player].contains("\x1b[38;5;"));
        assert!(out.ends_with("\x1b[0m"));
    }
}
