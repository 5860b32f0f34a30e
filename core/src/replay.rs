use ndarray::Array2;
use zapador_protocol::{GameRecord, MoveOutcome, StoredMove};

use crate::*;

/// Board state after one replayed move.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayFrame {
    pub move_number: u32,
    pub coords: Coord2,
    pub outcome: MoveOutcome,
    pub status: GameStatus,
    pub board: Array2<CellState>,
}

/// Deterministic re-enactment of a stored game.
///
/// The mine layout is taken from the record, never regenerated, so every run
/// derives the exact original boards. Each `next` applies one stored move
/// with full reveal semantics (cascade included) and yields a snapshot; the
/// caller decides the pacing between frames and may stop at any point.
///
/// Replay is hardened against corrupted records: the recomputed outcome must
/// match the stored one, otherwise the iterator yields the divergence as an
/// error and halts.
#[derive(Clone, Debug)]
pub struct Replay {
    mine_set: MineSet,
    moves: Vec<StoredMove>,
    session: GameSession,
    cursor: usize,
    halted: bool,
}

impl Replay {
    pub fn from_record(record: &GameRecord) -> Result<Self> {
        let config = GameConfig::new(record.width, record.height, record.mines_count)?;
        let coords: Vec<Coord2> = record
            .mines_coords
            .iter()
            .map(|mine| (mine.r, mine.c))
            .collect();
        let mine_set = MineSet::from_coords(&config, &coords)?;

        Ok(Self {
            session: GameSession::new(mine_set.clone()),
            mine_set,
            moves: record.moves.clone(),
            cursor: 0,
            halted: false,
        })
    }

    /// Rewinds to before the first move, against the same layout.
    pub fn restart(&mut self) {
        self.session = GameSession::new(self.mine_set.clone());
        self.cursor = 0;
        self.halted = false;
    }

    pub fn moves_total(&self) -> usize {
        self.moves.len()
    }

    /// The session as advanced so far; useful for rendering between steps.
    pub fn session(&self) -> &GameSession {
        &self.session
    }
}

impl Iterator for Replay {
    type Item = Result<ReplayFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted || self.cursor >= self.moves.len() {
            return None;
        }

        let stored = self.moves[self.cursor];
        self.cursor += 1;
        let move_number = self.cursor as u32;
        let coords = (stored.row_idx, stored.col_idx);

        let outcome = match self.session.reveal(coords, &mut NullSink) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.halted = true;
                return Some(Err(err));
            }
        };

        let computed = match outcome.move_outcome() {
            Some(computed) => computed,
            None => {
                self.halted = true;
                return Some(Err(GameError::ReplayNoEffect { move_number }));
            }
        };

        if computed != stored.outcome {
            self.halted = true;
            return Some(Err(GameError::ReplayDivergence {
                move_number,
                stored: stored.outcome,
                computed,
            }));
        }

        if computed == MoveOutcome::Lose {
            self.halted = true;
            let trailing = self.moves.len() - self.cursor;
            if trailing > 0 {
                log::warn!("Ignoring {trailing} move(s) recorded after a loss");
            }
        }

        Some(Ok(ReplayFrame {
            move_number,
            coords,
            outcome: computed,
            status: self.session.status(),
            board: self.session.cells().clone(),
        }))
    }
}
