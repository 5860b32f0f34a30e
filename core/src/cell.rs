use serde::{Deserialize, Serialize};

/// Player-visible state of one board cell.
///
/// `Hidden` and `Flagged` flip freely while the game is active; `Opened` and
/// `Mine` are terminal for the cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    /// Safe cell opened, carrying its adjacent mine count (0..=8).
    Opened(u8),
    /// Disclosed mine, either the one that was hit or any mine shown when
    /// the game is lost.
    Mine,
}

impl CellState {
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Opened(_) | Self::Mine)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
