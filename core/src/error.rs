use thiserror::Error;
use zapador_protocol::MoveOutcome;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board configuration: {width}x{height} with {mines} mines")]
    InvalidConfig { width: u8, height: u8, mines: u16 },
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Replay move {move_number} recomputed as '{computed}' but was stored as '{stored}'")]
    ReplayDivergence {
        move_number: u32,
        stored: MoveOutcome,
        computed: MoveOutcome,
    },
    #[error("Replay move {move_number} targets a cell that is no longer revealable")]
    ReplayNoEffect { move_number: u32 },
}

pub type Result<T> = core::result::Result<T, GameError>;
