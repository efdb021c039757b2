//! Read-only view of a finished tick, handed to the rendering consumer

use serde::{Deserialize, Serialize};

use super::state::{EndReason, Game};

/// Rectangle in tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl TileRect {
    pub fn tile(x: i32, y: i32) -> Self {
        Self { x, y, w: 1, h: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBar {
    pub name: String,
    pub perk_name: String,
    pub lives: u32,
    pub score: u64,
}

impl TopBar {
    /// The four strings shown left to right
    pub fn strings(&self) -> [String; 4] {
        [
            self.name.clone(),
            self.perk_name.clone(),
            format!("Lives: {}", self.lives),
            format!("Score: {}", self.score),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub frame: u64,
    pub columns: i32,
    pub lines: i32,
    pub top_bar: TopBar,
    /// Bottom bar message, empty when none
    pub bottom_bar: String,
    pub platforms: Vec<TileRect>,
    pub perk: Option<TileRect>,
    pub player: TileRect,
    pub paused: bool,
    pub ended: Option<EndReason>,
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            frame: self.current_frame,
            columns: self.settings.columns,
            lines: self.settings.lines,
            top_bar: TopBar {
                name: self.player.name.clone(),
                perk_name: self.player.perk.name().to_string(),
                lives: self.player.lives,
                score: self.player.score,
            },
            bottom_bar: self
                .message
                .as_ref()
                .map(|m| m.text().to_string())
                .unwrap_or_default(),
            platforms: self
                .platforms
                .iter()
                .map(|p| TileRect {
                    x: p.x,
                    y: p.y,
                    w: p.width,
                    h: 1,
                })
                .collect(),
            perk: self.perk.cell().map(|c| TileRect::tile(c.x, c.y)),
            player: TileRect::tile(self.player.pos.x, self.player.pos.y),
            paused: self.paused,
            ended: self.ended,
        }
    }
}
