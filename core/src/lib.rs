use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use zapador_protocol::MoveOutcome;

pub use cell::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use replay::*;
pub use session::*;
pub use sink::*;
pub use store::*;
pub use types::*;

mod cell;
mod error;
mod game;
mod generator;
mod replay;
mod session;
mod sink;
mod store;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let config = Self {
            width,
            height,
            mines,
        };
        config.validate()?;
        Ok(config)
    }

    /// Dimensions must be non-zero and the mine count strictly below the
    /// cell count, so at least one safe cell always exists.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.mines >= self.total_cells() {
            Err(GameError::InvalidConfig {
                width: self.width,
                height: self.height,
                mines: self.mines,
            })
        } else {
            Ok(())
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        row < self.height && col < self.width
    }

    pub fn grid_dim(&self) -> [usize; 2] {
        [self.height.into(), self.width.into()]
    }
}

/// The fixed set of mined coordinates for one game.
///
/// Generated once at game start and reused identically for live play and
/// replay; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineSet {
    mask: Array2<bool>,
    count: CellCount,
}

impl MineSet {
    pub fn from_mask(mask: Array2<bool>) -> Self {
        let count = mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        Self { mask, count }
    }

    /// Rebuilds a layout from a persisted coordinate list. Duplicates
    /// collapse into a single mine; the resulting count wins over whatever
    /// the record declared.
    pub fn from_coords(config: &GameConfig, mine_coords: &[Coord2]) -> Result<Self> {
        config.validate()?;
        let mut mask: Array2<bool> = Array2::default(config.grid_dim());

        for &coords in mine_coords {
            if !config.contains(coords) {
                return Err(GameError::OutOfBounds);
            }
            mask[coords.grid_index()] = true;
        }

        let mine_set = Self::from_mask(mask);
        if mine_set.count != config.mines {
            log::warn!(
                "Mine layout declares {} mines but {} are distinct",
                config.mines,
                mine_set.count
            );
        }
        Ok(mine_set)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            width: self.width(),
            height: self.height(),
            mines: self.count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (height, width) = self.bounds();
        if coords.0 < height && coords.1 < width {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn width(&self) -> Coord {
        self.mask.dim().1.try_into().unwrap()
    }

    pub fn height(&self) -> Coord {
        self.mask.dim().0.try_into().unwrap()
    }

    /// `(height, width)`, the exclusive coordinate bounds.
    pub fn bounds(&self) -> Coord2 {
        (self.height(), self.width())
    }

    pub fn total_cells(&self) -> CellCount {
        self.mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    /// Mined coordinates in row-major order, for persisting the layout.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.bounds())
    }
}

impl Index<Coord2> for MineSet {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mask[coords.grid_index()]
    }
}

/// Outcome of a reveal action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// The outcome as recorded in the move log, `None` when nothing
    /// happened and no record is due.
    pub const fn move_outcome(self) -> Option<MoveOutcome> {
        match self {
            Self::NoChange => None,
            Self::Revealed => Some(MoveOutcome::Ok),
            Self::HitMine => Some(MoveOutcome::Lose),
            Self::Won => Some(MoveOutcome::Win),
        }
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Toggled,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Toggled)
    }
}
