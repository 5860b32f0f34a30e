use ndarray::Array2;
use rand::Rng;

use super::*;

/// Uniform rejection sampler: draws random coordinates and discards
/// duplicates until the requested number of distinct mines is placed.
///
/// Retries are unbounded but cheap; the config invariant keeps the mine
/// count strictly below the cell count, so placement always terminates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RandomMineSetGenerator;

impl RandomMineSetGenerator {
    pub fn generate_with<R: Rng>(&self, rng: &mut R, config: &GameConfig) -> Result<MineSet> {
        config.validate()?;

        let mut mask: Array2<bool> = Array2::default(config.grid_dim());
        let mut placed: CellCount = 0;

        while placed < config.mines {
            let row = rng.random_range(0..config.height);
            let col = rng.random_range(0..config.width);

            let cell = &mut mask[(row, col).grid_index()];
            if !*cell {
                *cell = true;
                placed += 1;
            }
        }

        Ok(MineSet::from_mask(mask))
    }
}

impl MineSetGenerator for RandomMineSetGenerator {
    fn generate(&self, config: &GameConfig) -> Result<MineSet> {
        self.generate_with(&mut rand::rng(), config)
    }
}
