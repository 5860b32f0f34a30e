use std::collections::VecDeque;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// One in-memory game: the fixed mine layout plus every piece of mutable
/// state the rules touch.
///
/// The status only ever moves `Active -> Won` or `Active -> Lost`; once the
/// game is over, `reveal` and `toggle_flag` degrade to no-ops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    mine_set: MineSet,
    board: Array2<CellState>,
    opened_safe: CellCount,
    flagged: CellCount,
    move_count: u32,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    pub fn new(mine_set: MineSet) -> Self {
        let board = Array2::default(mine_set.config().grid_dim());
        Self {
            mine_set,
            board,
            opened_safe: 0,
            flagged: 0,
            move_count: 0,
            status: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.mine_set.config()
    }

    pub fn mine_set(&self) -> &MineSet {
        &self.mine_set
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.board[coords.grid_index()]
    }

    /// Whole-board view, indexed `[row, col]`.
    pub fn cells(&self) -> &Array2<CellState> {
        &self.board
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn opened_safe_count(&self) -> CellCount {
        self.opened_safe
    }

    /// Mine count minus placed flags; may go negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        self.mine_set.mine_count() as isize - self.flagged as isize
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Reveals a hidden cell and reports the outcome.
    ///
    /// Clicks on opened or flagged cells, or after the game is over, return
    /// `NoChange` and count as nothing: no move is taken, nothing is
    /// emitted. Out-of-bounds coordinates are a caller bug and fail.
    pub fn reveal(
        &mut self,
        coords: Coord2,
        sink: &mut dyn PresentationSink,
    ) -> Result<RevealOutcome> {
        let coords = self.mine_set.validate_coords(coords)?;

        if self.status.is_over() || self.cell_at(coords) != CellState::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        self.move_count += 1;

        if self.mine_set.contains_mine(coords) {
            self.triggered_mine = Some(coords);
            self.disclose_mines(sink);
            self.finish(GameStatus::Lost, sink);
            return Ok(RevealOutcome::HitMine);
        }

        let adjacent = self.open_cell(coords, sink);
        if adjacent == 0 {
            self.cascade_from(coords, sink);
        }

        // Win check happens once per top-level reveal, after any cascade.
        if self.opened_safe == self.mine_set.safe_cell_count() {
            self.finish(GameStatus::Won, sink);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Flips a cell between hidden and flagged. Flags are presentation-only
    /// state and never reach the move log.
    pub fn toggle_flag(
        &mut self,
        coords: Coord2,
        sink: &mut dyn PresentationSink,
    ) -> Result<FlagOutcome> {
        let coords = self.mine_set.validate_coords(coords)?;

        if self.status.is_over() {
            return Ok(FlagOutcome::NoChange);
        }

        let next = match self.cell_at(coords) {
            CellState::Hidden => {
                self.flagged += 1;
                CellState::Flagged
            }
            CellState::Flagged => {
                self.flagged -= 1;
                CellState::Hidden
            }
            CellState::Opened(_) | CellState::Mine => return Ok(FlagOutcome::NoChange),
        };

        self.board[coords.grid_index()] = next;
        sink.cell_changed(coords, next);
        Ok(FlagOutcome::Toggled)
    }

    fn open_cell(&mut self, coords: Coord2, sink: &mut dyn PresentationSink) -> u8 {
        let adjacent = self.mine_set.adjacent_mine_count(coords);
        self.board[coords.grid_index()] = CellState::Opened(adjacent);
        self.opened_safe += 1;
        sink.cell_changed(coords, CellState::Opened(adjacent));
        adjacent
    }

    /// Worklist flood fill over the zero-adjacency region around `origin`.
    ///
    /// The opened state doubles as the visited set: a cell is only expanded
    /// while still hidden, so every cell opens at most once and the loop
    /// terminates on any board. Flagged cells are left alone.
    fn cascade_from(&mut self, origin: Coord2, sink: &mut dyn PresentationSink) {
        let mut frontier: VecDeque<Coord2> = self
            .mine_set
            .iter_neighbors(origin)
            .filter(|&pos| self.cell_at(pos) == CellState::Hidden)
            .collect();

        while let Some(coords) = frontier.pop_front() {
            if self.cell_at(coords) != CellState::Hidden {
                continue;
            }

            let adjacent = self.open_cell(coords, sink);
            if adjacent == 0 {
                frontier.extend(
                    self.mine_set
                        .iter_neighbors(coords)
                        .filter(|&pos| self.cell_at(pos) == CellState::Hidden),
                );
            }
        }
    }

    /// Shows every mine on the board after a loss. Flagged mines keep their
    /// flag; the player's marks stay visible under the disclosure.
    fn disclose_mines(&mut self, sink: &mut dyn PresentationSink) {
        let mine_coords: Vec<Coord2> = self.mine_set.iter_coords().collect();
        for coords in mine_coords {
            if self.cell_at(coords) == CellState::Flagged {
                continue;
            }
            self.board[coords.grid_index()] = CellState::Mine;
            sink.cell_changed(coords, CellState::Mine);
        }
    }

    fn finish(&mut self, status: GameStatus, sink: &mut dyn PresentationSink) {
        if self.status.is_over() {
            return;
        }
        self.status = status;
        sink.status_changed(status);
    }
}
