//! Wire types for the game-record store boundary.

use chrono::{DateTime, Utc};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Store-assigned game identifier.
pub type GameId = u64;

/// Outcome of a single recorded reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveOutcome {
    Ok,
    Win,
    Lose,
}

impl MoveOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result shown in the game list. Games whose log ends without a
/// terminal move are still in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Lose,
    InProgress,
}

/// One mined coordinate of the persisted layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineCoord {
    pub r: u8,
    pub c: u8,
}

/// Request body for creating a game record. The full mine layout is
/// persisted up front; replays reconstruct the board from it rather than
/// from a seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
    pub player_name: String,
    pub width: u8,
    pub height: u8,
    pub mines_count: u16,
    pub mines_coords: Vec<MineCoord>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGame {
    pub id: GameId,
}

/// Request body for appending one reveal to a game's move log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRequest {
    pub move_number: u32,
    pub row: u8,
    pub col: u8,
    pub outcome: MoveOutcome,
}

/// One move as returned when fetching a stored game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMove {
    pub row_idx: u8,
    pub col_idx: u8,
    pub outcome: MoveOutcome,
}

/// A complete stored game: enough to reconstruct the board and replay the
/// move log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub width: u8,
    pub height: u8,
    pub mines_count: u16,
    pub mines_coords: Vec<MineCoord>,
    pub moves: Vec<StoredMove>,
}

/// Row of the game list view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub date: DateTime<Utc>,
    pub player_name: String,
    pub width: u8,
    pub height: u8,
    pub mines_count: u16,
    pub result: GameResult,
}
