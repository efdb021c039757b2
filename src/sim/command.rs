//! Abstract commands produced by input backends

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Command {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    Center,
    Jump,
    Enter,
    /// Trade the active power for points
    Convert,
    Invest,
    Pause,
    Quit,
    Close,
}

impl Command {
    /// Commands that end the match at the next tick boundary
    pub fn is_exit(&self) -> bool {
        matches!(self, Command::Quit | Command::Close)
    }

    /// Commands forwarded to player physics
    pub fn is_forwarded(&self) -> bool {
        !matches!(
            self,
            Command::None | Command::Pause | Command::Quit | Command::Close
        )
    }
}

/// Drain everything produced since the previous tick, keeping the last
/// non-`None` command
pub fn last_command<I>(commands: I) -> Command
where
    I: IntoIterator<Item = Command>,
{
    commands
        .into_iter()
        .filter(|c| *c != Command::None)
        .last()
        .unwrap_or(Command::None)
}
