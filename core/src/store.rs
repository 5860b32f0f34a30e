use core::fmt::Display;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use zapador_protocol::{
    GameId, GameRecord, GameResult, GameSummary, MoveOutcome, NewGame, StepRequest, StoredMove,
};

/// Persistence boundary for game records and their move logs.
///
/// Transport and storage are the implementor's concern; failures here never
/// invalidate the engine's in-memory state.
pub trait GameStore {
    type Error: Display;

    fn create_game(&mut self, game: &NewGame) -> Result<GameId, Self::Error>;
    fn append_move(&mut self, id: GameId, step: &StepRequest) -> Result<(), Self::Error>;
    fn fetch_game(&self, id: GameId) -> Result<GameRecord, Self::Error>;
    fn list_games(&self) -> Result<Vec<GameSummary>, Self::Error>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown game id {0}")]
    UnknownGame(GameId),
}

#[derive(Clone, Debug)]
struct StoredGame {
    game: NewGame,
    date: DateTime<Utc>,
    moves: Vec<StepRequest>,
}

impl StoredGame {
    /// A game counts as finished once its log carries a terminal move.
    fn result(&self) -> GameResult {
        match self.moves.last().map(|step| step.outcome) {
            Some(MoveOutcome::Win) => GameResult::Win,
            Some(MoveOutcome::Lose) => GameResult::Lose,
            Some(MoveOutcome::Ok) | None => GameResult::InProgress,
        }
    }
}

/// Reference store keeping everything in process memory. Ids are handed out
/// sequentially starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    games: BTreeMap<GameId, StoredGame>,
    next_id: GameId,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for InMemoryStore {
    type Error = StoreError;

    fn create_game(&mut self, game: &NewGame) -> Result<GameId, Self::Error> {
        self.next_id += 1;
        let id = self.next_id;
        self.games.insert(
            id,
            StoredGame {
                game: game.clone(),
                date: Utc::now(),
                moves: Vec::new(),
            },
        );
        Ok(id)
    }

    fn append_move(&mut self, id: GameId, step: &StepRequest) -> Result<(), Self::Error> {
        let stored = self.games.get_mut(&id).ok_or(StoreError::UnknownGame(id))?;
        stored.moves.push(*step);
        Ok(())
    }

    fn fetch_game(&self, id: GameId) -> Result<GameRecord, Self::Error> {
        let stored = self.games.get(&id).ok_or(StoreError::UnknownGame(id))?;
        Ok(GameRecord {
            width: stored.game.width,
            height: stored.game.height,
            mines_count: stored.game.mines_count,
            mines_coords: stored.game.mines_coords.clone(),
            moves: stored
                .moves
                .iter()
                .map(|step| StoredMove {
                    row_idx: step.row,
                    col_idx: step.col,
                    outcome: step.outcome,
                })
                .collect(),
        })
    }

    fn list_games(&self) -> Result<Vec<GameSummary>, Self::Error> {
        Ok(self
            .games
            .iter()
            .map(|(&id, stored)| GameSummary {
                id,
                date: stored.date,
                player_name: stored.game.player_name.clone(),
                width: stored.game.width,
                height: stored.game.height,
                mines_count: stored.game.mines_count,
                result: stored.result(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zapador_protocol::MineCoord;

    fn new_game(player: &str) -> NewGame {
        NewGame {
            player_name: player.into(),
            width: 3,
            height: 3,
            mines_count: 1,
            mines_coords: vec![MineCoord { r: 0, c: 0 }],
        }
    }

    #[test]
    fn create_append_fetch_round_trip() {
        let mut store = InMemoryStore::new();
        let id = store.create_game(&new_game("ada")).unwrap();
        assert_eq!(id, 1);

        store
            .append_move(
                id,
                &StepRequest {
                    move_number: 1,
                    row: 2,
                    col: 2,
                    outcome: MoveOutcome::Win,
                },
            )
            .unwrap();

        let record = store.fetch_game(id).unwrap();
        assert_eq!(record.width, 3);
        assert_eq!(record.mines_coords, vec![MineCoord { r: 0, c: 0 }]);
        assert_eq!(
            record.moves,
            vec![StoredMove {
                row_idx: 2,
                col_idx: 2,
                outcome: MoveOutcome::Win,
            }]
        );
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.fetch_game(7), Err(StoreError::UnknownGame(7)));
        assert_eq!(
            store.append_move(
                7,
                &StepRequest {
                    move_number: 1,
                    row: 0,
                    col: 0,
                    outcome: MoveOutcome::Ok,
                }
            ),
            Err(StoreError::UnknownGame(7))
        );
    }

    #[test]
    fn list_derives_results_from_the_move_log() {
        let mut store = InMemoryStore::new();
        let won = store.create_game(&new_game("ada")).unwrap();
        let lost = store.create_game(&new_game("brian")).unwrap();
        let open = store.create_game(&new_game("carol")).unwrap();

        for (id, outcome) in [(won, MoveOutcome::Win), (lost, MoveOutcome::Lose)] {
            store
                .append_move(
                    id,
                    &StepRequest {
                        move_number: 1,
                        row: 1,
                        col: 1,
                        outcome,
                    },
                )
                .unwrap();
        }

        let summaries = store.list_games().unwrap();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].result, GameResult::Win);
        assert_eq!(summaries[1].result, GameResult::Lose);
        assert_eq!(summaries[2].result, GameResult::InProgress);
        assert_eq!(summaries[2].id, open);
        assert_eq!(summaries[2].player_name, "carol");
    }
}
