//! Resolution engine - the clear / gravity / refill cascade
//!
//! ```text
//! Idle -> Scanning -> Clearing -> Refilling -> Scanning -> ... -> Idle
//! ```
//!
//! One *pass* is a scan that found matches, the atomic clear of all of them, and
//! one full gravity/refill sweep followed by a reserve re-roll. Passes repeat
//! until a scan comes back empty.
//!
//! The sweep walks rows bottom to top and, within a row, columns left to right.
//! An empty cell takes the nearest tile above it in the same column. Once the
//! column above is drained it takes the bottom-most unconsumed reserve tile of
//! that column instead. Relative vertical order inside a column is preserved.

use tracing::{debug, trace};

use crate::grid::GridStore;
use crate::matcher::find_all_matches_into;
use crate::observer::BoardObserver;
use crate::types::{CascadeReport, EngineError, Position, EMPTY, MAX_CASCADE_PASSES};

/// Where the engine is in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePhase {
    #[default]
    Idle,
    Scanning,
    Clearing,
    Refilling,
}

/// Drives cascades to completion against a [`GridStore`]
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    phase: ResolvePhase,
    /// Scratch buffer reused across passes
    matches: Vec<Position>,
    max_passes: u32,
}

impl ResolutionEngine {
    pub fn new() -> Self {
        Self {
            phase: ResolvePhase::Idle,
            matches: Vec::new(),
            max_passes: MAX_CASCADE_PASSES,
        }
    }

    /// Override the pass bound (tests use a small one)
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn phase(&self) -> ResolvePhase {
        self.phase
    }

    /// Run passes until the visible grid is match-free.
    ///
    /// A grid that is already match-free returns an empty report without
    /// touching anything, reserve included.
    pub fn resolve<O>(
        &mut self,
        store: &mut GridStore,
        observer: &mut O,
    ) -> Result<CascadeReport, EngineError>
    where
        O: BoardObserver + ?Sized,
    {
        let result = self.run(store, observer);
        self.phase = ResolvePhase::Idle;
        result
    }

    fn run<O>(&mut self, store: &mut GridStore, observer: &mut O) -> Result<CascadeReport, EngineError>
    where
        O: BoardObserver + ?Sized,
    {
        let mut report = CascadeReport::default();

        loop {
            self.phase = ResolvePhase::Scanning;
            find_all_matches_into(store.visible(), &mut self.matches);
            if self.matches.is_empty() {
                return Ok(report);
            }
            if report.passes >= self.max_passes {
                return Err(EngineError::CascadeLimit {
                    passes: report.passes,
                });
            }
            report.passes += 1;

            self.phase = ResolvePhase::Clearing;
            store.clear_cells(&self.matches)?;
            for &at in &self.matches {
                observer.on_tile_cleared(at);
            }
            let cleared = self.matches.len() as u32;
            report.cleared += cleared;

            self.phase = ResolvePhase::Refilling;
            let sweep = apply_gravity(store, observer)?;
            report.dropped += sweep.dropped;
            report.introduced += sweep.introduced;
            store.regenerate_reserve();
            observer.on_reserve_regenerated();

            debug!(
                pass = report.passes,
                cleared,
                dropped = sweep.dropped,
                introduced = sweep.introduced,
                "cascade pass complete"
            );
        }
    }
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Tile movements performed by one gravity/refill sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepCounts {
    pub dropped: u32,
    pub introduced: u32,
}

/// Fill every empty visible cell from above, then from the reserve.
///
/// Does not re-roll the reserve; [`ResolutionEngine`] does that once per pass.
pub fn apply_gravity<O>(store: &mut GridStore, observer: &mut O) -> Result<SweepCounts, EngineError>
where
    O: BoardObserver + ?Sized,
{
    let rows = store.rows();
    let cols = store.cols();
    let mut counts = SweepCounts::default();

    for row in (0..rows).rev() {
        for col in 0..cols {
            let target = Position::new(row, col);
            if !store.visible().is_empty_at(target) {
                continue;
            }

            let above = (0..row)
                .rev()
                .find(|&r| store.tile(Position::new(r, col)).is_some_and(|t| t != EMPTY));

            if let Some(source_row) = above {
                store.drop_column_tile(source_row, row, col)?;
                let from = Position::new(source_row, col);
                trace!(%from, to = %target, "tile dropped");
                observer.on_tile_dropped(from, target);
                counts.dropped += 1;
                continue;
            }

            let reserve_row = (0..rows)
                .rev()
                .find(|&r| {
                    store
                        .reserve()
                        .get(Position::new(r, col))
                        .is_some_and(|t| t != EMPTY)
                })
                .ok_or(EngineError::ReserveExhausted { col })?;

            let tile = store.drop_reserve_tile(reserve_row, row, col)?;
            trace!(at = %target, tile, reserve_row, "reserve tile introduced");
            observer.on_reserve_tile_introduced(target, tile);
            counts.introduced += 1;
        }
    }

    Ok(counts)
}
