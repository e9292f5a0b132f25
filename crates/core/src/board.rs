//! Board controller - the public face of the engine
//!
//! [`Board`] owns a [`GridStore`] and a [`ResolutionEngine`] and exposes the
//! only mutating entry points presentation code needs: tapping tiles
//! ([`Board::select`]) and proposing swaps ([`Board::attempt_swap`]).
//!
//! A swap that produces no match is committed and then reverted, so the view
//! can show the attempt. A swap that does match is handed to the
//! resolution engine and cascades to completion before the call returns.

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::grid::{GridStore, TileGrid};
use crate::matcher::has_any_match;
use crate::observer::BoardObserver;
use crate::resolve::ResolutionEngine;
use crate::snapshot::BoardSnapshot;
use crate::types::{
    BoardConfig, CascadeReport, EngineError, Position, RejectReason, SelectOutcome, SwapOutcome,
    TileType, MAX_GENERATION_ATTEMPTS,
};

/// Up to two tapped positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    slots: ArrayVec<Position, 2>,
}

impl Selection {
    pub fn first(&self) -> Option<Position> {
        self.slots.first().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn push(&mut self, pos: Position) {
        // Both slots full only happens mid-swap, which always clears afterwards.
        if !self.slots.is_full() {
            self.slots.push(pos);
        }
    }
}

/// The game board: grid store, cascade engine, selection and input lock
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    store: GridStore,
    engine: ResolutionEngine,
    selection: Selection,
    input_locked: bool,
    seed: u32,
    swaps: u32,
    rollbacks: u32,
    last_cascade: Option<CascadeReport>,
}

impl Board {
    /// Create a board with a guaranteed match-free starting grid
    pub fn new(config: BoardConfig, seed: u32) -> Result<Self, EngineError> {
        let store = GridStore::new(&config, seed)?;
        let mut board = Self::with_store(config, store, seed);
        board.initialize()?;
        Ok(board)
    }

    /// Create a board from explicit grids.
    ///
    /// The visible grid is taken as-is and may contain matches; call
    /// [`Board::settle`] to resolve them.
    pub fn from_grids(
        config: BoardConfig,
        visible: &[Vec<TileType>],
        reserve: &[Vec<TileType>],
        seed: u32,
    ) -> Result<Self, EngineError> {
        let store = GridStore::from_grids(&config, visible, reserve, seed)?;
        Ok(Self::with_store(config, store, seed))
    }

    fn with_store(config: BoardConfig, store: GridStore, seed: u32) -> Self {
        Self {
            config,
            store,
            engine: ResolutionEngine::new(),
            selection: Selection::default(),
            input_locked: false,
            seed,
            swaps: 0,
            rollbacks: 0,
            last_cascade: None,
        }
    }

    /// Re-roll the visible grid until it has no match; the reserve is left alone.
    ///
    /// Returns the number of grids examined.
    fn initialize(&mut self) -> Result<u32, EngineError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            if !has_any_match(self.store.visible()) {
                info!(
                    rows = self.config.rows,
                    cols = self.config.cols,
                    variations = self.config.variations,
                    attempts = attempt,
                    "board initialised"
                );
                self.log_dump("initial board");
                return Ok(attempt);
            }
            self.store.reroll_visible();
        }
        Err(EngineError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Start over with a fresh match-free grid and reserve
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.store.reroll_visible();
        self.store.regenerate_reserve();
        self.selection.clear();
        self.input_locked = false;
        self.swaps = 0;
        self.rollbacks = 0;
        self.last_cascade = None;
        self.initialize()?;
        Ok(())
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn swaps(&self) -> u32 {
        self.swaps
    }

    pub fn rollbacks(&self) -> u32 {
        self.rollbacks
    }

    pub fn last_cascade(&self) -> Option<CascadeReport> {
        self.last_cascade
    }

    /// Tile at `pos` on the visible grid, `None` if off-grid
    pub fn tile(&self, pos: Position) -> Option<TileType> {
        self.store.tile(pos)
    }

    pub fn grid(&self) -> &TileGrid {
        self.store.visible()
    }

    pub fn reserve(&self) -> &TileGrid {
        self.store.reserve()
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    /// Hold the lock while a presenter is still animating the last cascade
    pub fn lock_input(&mut self) {
        self.input_locked = true;
    }

    pub fn unlock_input(&mut self) {
        self.input_locked = false;
    }

    fn check(&self, pos: Position) -> Result<(), EngineError> {
        if pos.in_bounds(self.config.rows, self.config.cols) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                pos,
                rows: self.config.rows,
                cols: self.config.cols,
            })
        }
    }

    /// Tap the tile at `pos`.
    ///
    /// The first tap fills the selection. The second tap swaps if it is adjacent
    /// to the first, otherwise it empties the selection.
    pub fn select<O>(&mut self, pos: Position, observer: &mut O) -> Result<SelectOutcome, EngineError>
    where
        O: BoardObserver + ?Sized,
    {
        self.check(pos)?;
        if self.input_locked {
            return Ok(SelectOutcome::Ignored);
        }

        let Some(first) = self.selection.first() else {
            self.selection.push(pos);
            return Ok(SelectOutcome::Selected { at: pos });
        };

        if !first.is_adjacent(pos) {
            self.selection.clear();
            return Ok(SelectOutcome::Cleared);
        }

        self.selection.push(pos);
        let outcome = self.attempt_swap(first, pos, observer)?;
        Ok(SelectOutcome::Swapped { outcome })
    }

    /// Drop the current selection
    pub fn deselect(&mut self) {
        if !self.input_locked {
            self.selection.clear();
        }
    }

    /// Swap two adjacent tiles and resolve the result.
    ///
    /// Rejected attempts change nothing: grid, selection and lock are as before.
    /// Out-of-bounds positions are an error and also change nothing.
    pub fn attempt_swap<O>(
        &mut self,
        a: Position,
        b: Position,
        observer: &mut O,
    ) -> Result<SwapOutcome, EngineError>
    where
        O: BoardObserver + ?Sized,
    {
        self.check(a)?;
        self.check(b)?;
        if self.input_locked {
            warn!(%a, %b, "swap rejected: input locked");
            return Ok(SwapOutcome::Rejected {
                reason: RejectReason::InputLocked,
            });
        }
        if !a.is_adjacent(b) {
            debug!(%a, %b, "swap rejected: not adjacent");
            return Ok(SwapOutcome::Rejected {
                reason: RejectReason::NotAdjacent,
            });
        }

        self.input_locked = true;
        let result = self.swap_and_resolve(a, b, observer);
        self.input_locked = false;
        self.selection.clear();
        result
    }

    fn swap_and_resolve<O>(
        &mut self,
        a: Position,
        b: Position,
        observer: &mut O,
    ) -> Result<SwapOutcome, EngineError>
    where
        O: BoardObserver + ?Sized,
    {
        self.store.swap_cells(a, b)?;
        observer.on_swap_committed(a, b);

        if !has_any_match(self.store.visible()) {
            // Self-inverse: the same pair restores the prior grid.
            self.store.swap_cells(a, b)?;
            observer.on_swap_rolled_back(a, b);
            self.rollbacks += 1;
            info!(%a, %b, "swap rolled back");
            return Ok(SwapOutcome::RolledBack);
        }

        let report = self.engine.resolve(&mut self.store, observer)?;
        self.swaps += 1;
        self.last_cascade = Some(report);
        info!(
            %a,
            %b,
            passes = report.passes,
            cleared = report.cleared,
            "swap resolved"
        );
        self.log_dump("after cascade");
        Ok(SwapOutcome::Resolved { report })
    }

    /// Resolve any matches already on the visible grid.
    ///
    /// Entry point for boards built from explicit grids; a match-free grid is a no-op.
    pub fn settle<O>(&mut self, observer: &mut O) -> Result<CascadeReport, EngineError>
    where
        O: BoardObserver + ?Sized,
    {
        let was_locked = self.input_locked;
        self.input_locked = true;
        let result = self.engine.resolve(&mut self.store, observer);
        self.input_locked = was_locked;
        let report = result?;
        if !report.is_empty() {
            self.last_cascade = Some(report);
            self.log_dump("after settle");
        }
        Ok(report)
    }

    /// Fill `out` with the current state, reusing its buffers
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.clear();
        out.rows = self.config.rows;
        out.cols = self.config.cols;
        out.variations = self.config.variations;
        out.tiles.extend_from_slice(self.store.visible().cells());
        out.reserve.extend_from_slice(self.store.reserve().cells());
        out.selected = self.selection.first();
        out.input_locked = self.input_locked;
        out.seed = self.seed;
        out.swaps = self.swaps;
        out.rollbacks = self.rollbacks;
        out.last_cascade = self.last_cascade;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    fn log_dump(&self, context: &str) {
        if self.config.debug {
            debug!(target: "tui_match3::dump", "{}\n{}", context, self.store.dump());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{EventLog, NoopObserver};

    fn board_3x4() -> Board {
        // Swapping (0,2) <-> (0,3) makes row 0 read 1 1 1 2.
        Board::from_grids(
            BoardConfig::new(3, 4, 4),
            &[vec![1, 1, 2, 1], vec![2, 3, 4, 3], vec![3, 4, 1, 2]],
            &[vec![4, 2, 3, 4], vec![2, 4, 2, 1], vec![3, 1, 4, 2]],
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_new_board_is_match_free() {
        let board = Board::new(BoardConfig::default(), 12345).unwrap();
        assert!(!has_any_match(board.grid()));
        assert!(!board.is_input_locked());
        assert!(board.selection().is_empty());
    }

    #[test]
    fn test_new_board_rejects_degenerate_config() {
        let err = Board::new(BoardConfig::new(8, 8, 2), 1).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_first_tap_selects_and_far_tap_clears() {
        let mut board = board_3x4();
        let a = Position::new(0, 0);
        assert_eq!(
            board.select(a, &mut NoopObserver).unwrap(),
            SelectOutcome::Selected { at: a }
        );
        assert_eq!(board.selection().first(), Some(a));

        assert_eq!(
            board.select(Position::new(2, 2), &mut NoopObserver).unwrap(),
            SelectOutcome::Cleared
        );
        assert!(board.selection().is_empty());
    }

    #[test]
    fn test_tapping_same_tile_twice_clears() {
        let mut board = board_3x4();
        let a = Position::new(1, 1);
        board.select(a, &mut NoopObserver).unwrap();
        assert_eq!(
            board.select(a, &mut NoopObserver).unwrap(),
            SelectOutcome::Cleared
        );
    }

    #[test]
    fn test_second_adjacent_tap_swaps() {
        let mut board = board_3x4();
        let mut log = EventLog::new();
        board.select(Position::new(0, 2), &mut log).unwrap();
        let outcome = board.select(Position::new(1, 2), &mut log).unwrap();

        // 2 <-> 4 in column 2 makes no run; the swap is rolled back.
        assert_eq!(
            outcome,
            SelectOutcome::Swapped {
                outcome: SwapOutcome::RolledBack
            }
        );
        assert!(board.selection().is_empty());
        assert_eq!(board.rollbacks(), 1);
    }

    #[test]
    fn test_locked_tap_is_ignored() {
        let mut board = board_3x4();
        board.lock_input();
        assert_eq!(
            board.select(Position::new(0, 0), &mut NoopObserver).unwrap(),
            SelectOutcome::Ignored
        );
        assert!(board.selection().is_empty());
        board.unlock_input();
        assert!(!board.is_input_locked());
    }

    #[test]
    fn test_out_of_bounds_swap_is_an_error() {
        let mut board = board_3x4();
        let before = board.grid().clone();
        let err = board
            .attempt_swap(Position::new(2, 3), Position::new(3, 3), &mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, EngineError::OutOfBounds { .. }));
        assert_eq!(board.grid(), &before);
    }

    #[test]
    fn test_matching_swap_resolves_and_counts() {
        let mut board = board_3x4();
        let outcome = board
            .attempt_swap(Position::new(0, 2), Position::new(0, 3), &mut NoopObserver)
            .unwrap();
        assert_eq!(
            outcome,
            SwapOutcome::Resolved {
                report: CascadeReport {
                    passes: 1,
                    cleared: 3,
                    dropped: 0,
                    introduced: 3,
                }
            }
        );
        // Each emptied cell in row 0 takes the bottom reserve tile of its column.
        assert_eq!(board.grid().to_rows()[0], vec![3, 1, 4, 2]);
        assert_eq!(board.swaps(), 1);
        assert!(board.last_cascade().is_some());
        assert!(!has_any_match(board.grid()));
        assert!(!board.is_input_locked());
    }

    #[test]
    fn test_snapshot_mirrors_board() {
        let mut board = board_3x4();
        board.select(Position::new(2, 1), &mut NoopObserver).unwrap();
        let snap = board.snapshot();
        assert_eq!(snap.rows, 3);
        assert_eq!(snap.cols, 4);
        assert_eq!(snap.tiles, board.grid().cells());
        assert_eq!(snap.reserve, board.reserve().cells());
        assert_eq!(snap.selected, Some(Position::new(2, 1)));
        assert_eq!(snap.tile(Position::new(0, 2)), Some(2));
        assert_eq!(snap.tile(Position::new(3, 0)), None);
    }

    #[test]
    fn test_restart_clears_counters_and_selection() {
        let mut board = Board::new(BoardConfig::default(), 99).unwrap();
        board.select(Position::new(0, 0), &mut NoopObserver).unwrap();
        board.lock_input();
        board.restart().unwrap();
        assert!(board.selection().is_empty());
        assert!(!board.is_input_locked());
        assert_eq!(board.swaps(), 0);
        assert!(!has_any_match(board.grid()));
    }
}
