//! Keyboard backend on terminal events
//!
//! Needs raw mode for single key presses; see `renderer::ScreenGuard`.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::input::InputSource;
use crate::error::{GameError, Result};
use crate::sim::command::Command;

/// Drains pending key presses without waiting for new ones
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        while event::poll(Duration::ZERO).map_err(transient)? {
            if let Event::Key(key) = event::read().map_err(transient)? {
                if key.kind != KeyEventKind::Release {
                    commands.push(key_command(key));
                }
            }
        }
        Ok(commands)
    }
}

fn transient(e: std::io::Error) -> GameError {
    GameError::TransientInput(e.to_string())
}

/// Map one key press. Digits double as the numeric keypad.
pub fn key_command(key: KeyEvent) -> Command {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Command::Close,
            _ => Command::None,
        };
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('8') => Command::Up,
        KeyCode::Left | KeyCode::Char('4') => Command::Left,
        KeyCode::Char('5') => Command::Center,
        KeyCode::Right | KeyCode::Char('6') => Command::Right,
        KeyCode::Down | KeyCode::Char('2') => Command::Down,
        KeyCode::Char(' ') => Command::Jump,
        KeyCode::Enter => Command::Enter,
        KeyCode::Char('c') => Command::Convert,
        KeyCode::Char('i') => Command::Invest,
        KeyCode::Char('p') | KeyCode::Esc => Command::Pause,
        KeyCode::Char('q') => Command::Quit,
        _ => Command::None,
    }
}
