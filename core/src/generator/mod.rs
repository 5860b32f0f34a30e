use crate::*;
pub use random::*;

mod random;

/// Produces the mine layout for a new game.
///
/// Determinism for replay does not come from here: the chosen layout is
/// persisted with the game record, so generation is free to be random.
pub trait MineSetGenerator {
    fn generate(&self, config: &GameConfig) -> Result<MineSet>;
}
