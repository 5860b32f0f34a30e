use thiserror::Error;
use zapador_protocol::{GameId, MineCoord, NewGame, StepRequest};

use crate::{
    Coord2, FlagOutcome, GameConfig, GameError, GameSession, GameStore, MineSetGenerator,
    PresentationSink, RevealOutcome,
};

#[derive(Error, Debug)]
pub enum StartError<E> {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Game store rejected the new game: {0}")]
    Store(E),
}

/// A live game bound to its store record.
///
/// Creation persists the full mine layout; each effective reveal appends one
/// move. Flag toggles stay local. A failed append is logged and dropped: the
/// in-memory session remains authoritative either way.
pub struct RecordedGame {
    id: GameId,
    session: GameSession,
}

impl RecordedGame {
    pub fn start<S, G>(
        store: &mut S,
        generator: &G,
        player_name: &str,
        config: GameConfig,
    ) -> Result<Self, StartError<S::Error>>
    where
        S: GameStore,
        G: MineSetGenerator,
    {
        let mine_set = generator.generate(&config)?;
        let game = NewGame {
            player_name: player_name.to_owned(),
            width: config.width,
            height: config.height,
            mines_count: mine_set.mine_count(),
            mines_coords: mine_set
                .iter_coords()
                .map(|(r, c)| MineCoord { r, c })
                .collect(),
        };

        let id = store.create_game(&game).map_err(StartError::Store)?;
        log::debug!("Started game {id} for {player_name}");

        Ok(Self {
            id,
            session: GameSession::new(mine_set),
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn reveal<S: GameStore>(
        &mut self,
        store: &mut S,
        sink: &mut dyn PresentationSink,
        coords: Coord2,
    ) -> Result<RevealOutcome, GameError> {
        let outcome = self.session.reveal(coords, sink)?;

        if let Some(recorded) = outcome.move_outcome() {
            let step = StepRequest {
                move_number: self.session.move_count(),
                row: coords.0,
                col: coords.1,
                outcome: recorded,
            };
            if let Err(err) = store.append_move(self.id, &step) {
                log::warn!(
                    "Move {} of game {} was not persisted: {err}",
                    step.move_number,
                    self.id
                );
            }
        }

        Ok(outcome)
    }

    pub fn toggle_flag(
        &mut self,
        sink: &mut dyn PresentationSink,
        coords: Coord2,
    ) -> Result<FlagOutcome, GameError> {
        self.session.toggle_flag(coords, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameStatus, InMemoryStore, MineSet, NullSink, StoreError};
    use zapador_protocol::{GameRecord, GameSummary, MoveOutcome};

    /// Hands out a fixed layout, standing in for the random generator.
    struct FixedMines(Vec<Coord2>);

    impl MineSetGenerator for FixedMines {
        fn generate(&self, config: &GameConfig) -> crate::Result<MineSet> {
            MineSet::from_coords(config, &self.0)
        }
    }

    /// Store that only remembers the raw step requests it was sent.
    #[derive(Default)]
    struct CapturingStore {
        steps: Vec<StepRequest>,
    }

    impl GameStore for CapturingStore {
        type Error = StoreError;

        fn create_game(&mut self, _game: &NewGame) -> Result<GameId, Self::Error> {
            Ok(1)
        }

        fn append_move(&mut self, _id: GameId, step: &StepRequest) -> Result<(), Self::Error> {
            self.steps.push(*step);
            Ok(())
        }

        fn fetch_game(&self, id: GameId) -> Result<GameRecord, Self::Error> {
            Err(StoreError::UnknownGame(id))
        }

        fn list_games(&self) -> Result<Vec<GameSummary>, Self::Error> {
            Ok(Vec::new())
        }
    }

    /// Store that accepts creation but refuses every append.
    struct LossyStore(InMemoryStore);

    impl GameStore for LossyStore {
        type Error = StoreError;

        fn create_game(&mut self, game: &NewGame) -> Result<GameId, Self::Error> {
            self.0.create_game(game)
        }

        fn append_move(&mut self, _id: GameId, _step: &StepRequest) -> Result<(), Self::Error> {
            Err(StoreError::UnknownGame(0))
        }

        fn fetch_game(&self, id: GameId) -> Result<GameRecord, Self::Error> {
            self.0.fetch_game(id)
        }

        fn list_games(&self) -> Result<Vec<GameSummary>, Self::Error> {
            self.0.list_games()
        }
    }

    fn config_3x3() -> GameConfig {
        GameConfig::new(3, 3, 1).unwrap()
    }

    #[test]
    fn start_persists_the_mine_layout() {
        let mut store = InMemoryStore::new();
        let game = RecordedGame::start(
            &mut store,
            &FixedMines(vec![(0, 0)]),
            "ada",
            config_3x3(),
        )
        .unwrap();

        let record = store.fetch_game(game.id()).unwrap();
        assert_eq!(record.mines_coords, vec![MineCoord { r: 0, c: 0 }]);
        assert_eq!(record.mines_count, 1);
        assert!(record.moves.is_empty());
    }

    #[test]
    fn only_effective_reveals_are_recorded() {
        let mut store = InMemoryStore::new();
        let mut sink = NullSink;
        let mut game = RecordedGame::start(
            &mut store,
            &FixedMines(vec![(0, 0), (2, 0)]),
            "ada",
            GameConfig::new(3, 3, 2).unwrap(),
        )
        .unwrap();

        game.reveal(&mut store, &mut sink, (0, 1)).unwrap();
        game.reveal(&mut store, &mut sink, (0, 1)).unwrap(); // stale
        game.toggle_flag(&mut sink, (1, 1)).unwrap();
        game.toggle_flag(&mut sink, (1, 1)).unwrap();
        game.reveal(&mut store, &mut sink, (1, 1)).unwrap();

        let record = store.fetch_game(game.id()).unwrap();
        let outcomes: Vec<_> = record.moves.iter().map(|m| m.outcome).collect();
        assert_eq!(outcomes, vec![MoveOutcome::Ok, MoveOutcome::Ok]);
    }

    #[test]
    fn moves_are_numbered_from_one() {
        let mut store = CapturingStore::default();
        let mut sink = NullSink;
        let mut game = RecordedGame::start(
            &mut store,
            &FixedMines(vec![(0, 0), (0, 2), (2, 0), (2, 2)]),
            "ada",
            GameConfig::new(3, 3, 4).unwrap(),
        )
        .unwrap();

        game.reveal(&mut store, &mut sink, (0, 1)).unwrap();
        game.reveal(&mut store, &mut sink, (0, 1)).unwrap(); // stale, not numbered
        game.reveal(&mut store, &mut sink, (1, 0)).unwrap();
        game.reveal(&mut store, &mut sink, (1, 2)).unwrap();

        let numbers: Vec<_> = store.steps.iter().map(|step| step.move_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn terminal_moves_are_recorded_with_their_outcome() {
        let mut store = InMemoryStore::new();
        let mut sink = NullSink;
        let mut game = RecordedGame::start(
            &mut store,
            &FixedMines(vec![(0, 0)]),
            "ada",
            config_3x3(),
        )
        .unwrap();

        let outcome = game.reveal(&mut store, &mut sink, (0, 0)).unwrap();
        assert_eq!(outcome, RevealOutcome::HitMine);

        let record = store.fetch_game(game.id()).unwrap();
        assert_eq!(record.moves.len(), 1);
        assert_eq!(record.moves[0].outcome, MoveOutcome::Lose);
    }

    #[test]
    fn append_failure_leaves_the_session_playable() {
        let mut store = LossyStore(InMemoryStore::new());
        let mut sink = NullSink;
        let mut game = RecordedGame::start(
            &mut store,
            &FixedMines(vec![(0, 0)]),
            "ada",
            config_3x3(),
        )
        .unwrap();

        let outcome = game.reveal(&mut store, &mut sink, (2, 2)).unwrap();
        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.session().status(), GameStatus::Won);
        assert!(store.fetch_game(game.id()).unwrap().moves.is_empty());
    }
}
