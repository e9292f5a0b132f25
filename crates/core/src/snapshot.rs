//! Snapshot module - plain board state for views and logs
//!
//! Filled by `Board::snapshot_into` so a frame loop can reuse one allocation.

use serde::{Deserialize, Serialize};

use crate::types::{CascadeReport, Position, TileType};

/// Everything a view needs to draw the board, detached from the engine
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub variations: u8,
    /// Visible grid, row-major
    pub tiles: Vec<TileType>,
    /// Reserve buffer, row-major
    pub reserve: Vec<TileType>,
    pub selected: Option<Position>,
    pub input_locked: bool,
    pub seed: u32,
    /// Swaps that produced a cascade
    pub swaps: u32,
    /// Swaps that were rolled back
    pub rollbacks: u32,
    pub last_cascade: Option<CascadeReport>,
}

impl BoardSnapshot {
    /// Reset in place, keeping the allocations
    pub fn clear(&mut self) {
        self.rows = 0;
        self.cols = 0;
        self.variations = 0;
        self.tiles.clear();
        self.reserve.clear();
        self.selected = None;
        self.input_locked = false;
        self.seed = 0;
        self.swaps = 0;
        self.rollbacks = 0;
        self.last_cascade = None;
    }

    pub fn tile(&self, pos: Position) -> Option<TileType> {
        if pos.in_bounds(self.rows, self.cols) {
            self.tiles.get(pos.row * self.cols + pos.col).copied()
        } else {
            None
        }
    }
}
