use crate::*;

/// Receiver for board mutations, one call per cell that changes state plus
/// one per terminal transition.
///
/// Rendering, coloring, and result-string translation all live behind this
/// seam; the engine only reports what changed.
pub trait PresentationSink {
    fn cell_changed(&mut self, coords: Coord2, state: CellState);
    fn status_changed(&mut self, status: GameStatus);
}

/// Sink that discards every event. Used when stepping a replay headless and
/// in tests that only care about outcomes.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn cell_changed(&mut self, _coords: Coord2, _state: CellState) {}

    fn status_changed(&mut self, _status: GameStatus) {}
}

/// Event recorder shared by the module tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    pub cells: Vec<(Coord2, CellState)>,
    pub statuses: Vec<GameStatus>,
}

#[cfg(test)]
impl PresentationSink for EventLog {
    fn cell_changed(&mut self, coords: Coord2, state: CellState) {
        self.cells.push((coords, state));
    }

    fn status_changed(&mut self, status: GameStatus) {
        self.statuses.push(status);
    }
}
