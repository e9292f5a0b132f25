//! Grid module - owns the visible grid and the reserve buffer
//!
//! Both matrices are `rows x cols` flat arrays in row-major order (`row * cols + col`).
//! The visible grid is what the player sees; the reserve buffer is a hidden,
//! pre-rolled grid that supplies replacement tiles when a column runs dry.
//!
//! All mutation goes through [`GridStore`]. Every mutator checks its positions
//! before touching either matrix, so a failed call leaves the store unchanged.

use std::fmt::Write as _;

use crate::rng::SimpleRng;
use crate::types::{BoardConfig, EngineError, Position, TileType, EMPTY};

/// A `rows x cols` matrix of tile types using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    cells: Vec<TileType>,
}

impl TileGrid {
    /// Create a grid with every cell set to `tile`
    pub fn filled(rows: usize, cols: usize, tile: TileType) -> Self {
        Self {
            rows,
            cols,
            cells: vec![tile; rows * cols],
        }
    }

    /// Fill every cell with a uniformly random type in `[1, variations]`.
    ///
    /// No match-free guarantee; callers that need one re-roll.
    pub fn random(rng: &mut SimpleRng, rows: usize, cols: usize, variations: u8) -> Self {
        let cells = (0..rows * cols).map(|_| rng.next_tile(variations)).collect();
        Self { rows, cols, cells }
    }

    /// Build from row vectors. Returns `None` unless the rows form a `rows x cols` rectangle.
    pub fn from_rows(rows_2d: &[Vec<TileType>], rows: usize, cols: usize) -> Option<Self> {
        if rows_2d.len() != rows || rows_2d.iter().any(|row| row.len() != cols) {
            return None;
        }
        let cells = rows_2d.iter().flatten().copied().collect();
        Some(Self { rows, cols, cells })
    }

    /// Calculate flat index, `None` if off-grid
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.in_bounds(self.rows, self.cols) {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the tile at `pos`.
    ///
    /// Off-grid lookups return `None`, which never compares equal to a tile. The
    /// match detector relies on this for edge and corner cells.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<TileType> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set the tile at `pos`. Returns false if out of bounds.
    pub fn set(&mut self, pos: Position, tile: TileType) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// True if `pos` is on-grid and holds [`EMPTY`]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos) == Some(EMPTY)
    }

    /// Flat row-major cells
    pub fn cells(&self) -> &[TileType] {
        &self.cells
    }

    pub fn count_non_empty(&self) -> usize {
        self.cells.iter().filter(|&&t| t != EMPTY).count()
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows * self.cols).map(move |i| Position::new(i / cols, i % cols))
    }

    pub fn to_rows(&self) -> Vec<Vec<TileType>> {
        self.cells.chunks(self.cols).map(|row| row.to_vec()).collect()
    }

    fn write_rows(&self, out: &mut String) {
        for (i, row) in self.cells.chunks(self.cols).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for tile in row {
                let _ = write!(out, " {}", tile);
            }
        }
    }
}

/// Owner of the visible grid and the reserve buffer
#[derive(Debug, Clone)]
pub struct GridStore {
    visible: TileGrid,
    reserve: TileGrid,
    variations: u8,
    rng: SimpleRng,
}

impl GridStore {
    /// Roll a visible grid and a reserve buffer.
    ///
    /// The visible grid may contain matches; the board controller re-rolls it.
    pub fn new(config: &BoardConfig, seed: u32) -> Result<Self, EngineError> {
        config.validate()?;
        let mut rng = SimpleRng::new(seed);
        let visible = TileGrid::random(&mut rng, config.rows, config.cols, config.variations);
        let reserve = TileGrid::random(&mut rng, config.rows, config.cols, config.variations);
        Ok(Self {
            visible,
            reserve,
            variations: config.variations,
            rng,
        })
    }

    /// Build a store from explicit matrices.
    ///
    /// Visible tiles must be in `[1, variations]`. Reserve cells may also be
    /// [`EMPTY`] (already consumed). `seed` drives later reserve regeneration.
    pub fn from_grids(
        config: &BoardConfig,
        visible: &[Vec<TileType>],
        reserve: &[Vec<TileType>],
        seed: u32,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let shape_err = |which| EngineError::ShapeMismatch {
            which,
            rows: config.rows,
            cols: config.cols,
        };
        let visible =
            TileGrid::from_rows(visible, config.rows, config.cols).ok_or(shape_err("visible"))?;
        let reserve =
            TileGrid::from_rows(reserve, config.rows, config.cols).ok_or(shape_err("reserve"))?;

        for (which, grid, allow_empty) in [("visible", &visible, false), ("reserve", &reserve, true)] {
            for pos in grid.positions() {
                let tile = grid.get(pos).unwrap_or(EMPTY);
                let in_range = (1..=config.variations).contains(&tile);
                if !(in_range || (allow_empty && tile == EMPTY)) {
                    return Err(EngineError::InvalidTile {
                        which,
                        pos,
                        tile,
                        variations: config.variations,
                    });
                }
            }
        }

        Ok(Self {
            visible,
            reserve,
            variations: config.variations,
            rng: SimpleRng::new(seed),
        })
    }

    pub fn rows(&self) -> usize {
        self.visible.rows()
    }

    pub fn cols(&self) -> usize {
        self.visible.cols()
    }

    pub fn variations(&self) -> u8 {
        self.variations
    }

    pub fn visible(&self) -> &TileGrid {
        &self.visible
    }

    pub fn reserve(&self) -> &TileGrid {
        &self.reserve
    }

    /// Read-only tile lookup on the visible grid
    pub fn tile(&self, pos: Position) -> Option<TileType> {
        self.visible.get(pos)
    }

    /// Roll a fresh grid with this store's dimensions and RNG
    pub fn generate(&mut self) -> TileGrid {
        let (rows, cols) = (self.rows(), self.cols());
        TileGrid::random(&mut self.rng, rows, cols, self.variations)
    }

    /// Replace the visible grid with a fresh roll
    pub fn reroll_visible(&mut self) {
        self.visible = self.generate();
    }

    /// Re-roll every reserve cell
    pub fn regenerate_reserve(&mut self) {
        self.reserve = self.generate();
    }

    fn check(&self, pos: Position) -> Result<usize, EngineError> {
        self.visible.index(pos).ok_or(EngineError::OutOfBounds {
            pos,
            rows: self.rows(),
            cols: self.cols(),
        })
    }

    /// Exchange the tiles at `a` and `b`.
    ///
    /// Self-inverse: applying it twice with the same pair restores the grid.
    pub fn swap_cells(&mut self, a: Position, b: Position) -> Result<(), EngineError> {
        let ia = self.check(a)?;
        let ib = self.check(b)?;
        self.visible.cells.swap(ia, ib);
        Ok(())
    }

    /// Set every listed cell to [`EMPTY`] in one pass.
    ///
    /// All positions are checked first; overlapping chains may list a cell twice.
    pub fn clear_cells(&mut self, positions: &[Position]) -> Result<(), EngineError> {
        for &pos in positions {
            self.check(pos)?;
        }
        for &pos in positions {
            self.visible.set(pos, EMPTY);
        }
        Ok(())
    }

    /// Move the tile at `(source_row, col)` down to the empty `(target_row, col)`.
    ///
    /// Returns the moved tile.
    pub fn drop_column_tile(
        &mut self,
        source_row: usize,
        target_row: usize,
        col: usize,
    ) -> Result<TileType, EngineError> {
        let src = self.check(Position::new(source_row, col))?;
        let dst = self.check(Position::new(target_row, col))?;
        let tile = self.visible.cells[src];
        debug_assert_ne!(tile, EMPTY, "dropping an empty cell");
        debug_assert_eq!(self.visible.cells[dst], EMPTY, "dropping onto a filled cell");
        self.visible.cells[dst] = tile;
        self.visible.cells[src] = EMPTY;
        Ok(tile)
    }

    /// Move the reserve tile at `(source_row, col)` into the visible grid at
    /// `(target_row, col)`, consuming it from the reserve.
    ///
    /// Returns the introduced tile.
    pub fn drop_reserve_tile(
        &mut self,
        source_row: usize,
        target_row: usize,
        col: usize,
    ) -> Result<TileType, EngineError> {
        let src = self.check(Position::new(source_row, col))?;
        let dst = self.check(Position::new(target_row, col))?;
        let tile = self.reserve.cells[src];
        debug_assert_ne!(tile, EMPTY, "reserve cell already consumed");
        debug_assert_eq!(self.visible.cells[dst], EMPTY, "dropping onto a filled cell");
        self.visible.cells[dst] = tile;
        self.reserve.cells[src] = EMPTY;
        Ok(tile)
    }

    /// Textual dump: reserve rows, a `-` per column, then visible rows
    ///
    /// ```
    /// use tui_match3_core::GridStore;
    /// use tui_match3_core::types::BoardConfig;
    ///
    /// let config = BoardConfig::new(3, 3, 3);
    /// let store = GridStore::from_grids(
    ///     &config,
    ///     &[vec![1, 2, 3], vec![2, 3, 1], vec![3, 1, 2]],
    ///     &[vec![3, 3, 3], vec![0, 2, 2], vec![1, 1, 1]],
    ///     1,
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     store.dump(),
    ///     " 3 3 3\n 0 2 2\n 1 1 1\n---\n 1 2 3\n 2 3 1\n 3 1 2"
    /// );
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity(self.rows() * self.cols() * 4 + self.cols() + 2);
        self.reserve.write_rows(&mut out);
        out.push('\n');
        out.extend(std::iter::repeat('-').take(self.cols()));
        out.push('\n');
        self.visible.write_rows(&mut out);
        out
    }
}
