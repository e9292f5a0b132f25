//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! Everything here is plain data, usable by the engine, the terminal front end
//! and the event log alike.
//!
//! # Board Layout
//!
//! The board is a `rows x cols` matrix stored row-major with `(0, 0)` at the
//! top-left. Gravity pulls tiles toward higher row numbers.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_ROWS` | 8 | Rows on a default board |
//! | `DEFAULT_COLS` | 8 | Columns on a default board |
//! | `DEFAULT_VARIATIONS` | 6 | Tile types on a default board |
//! | `MIN_DIMENSION` | 3 | Smallest row/column count that can hold a match |
//! | `MIN_VARIATIONS` | 3 | Fewest tile types that allow a match-free board |
//! | `MAX_VARIATIONS` | 9 | One colour and one dump digit per tile type |
//! | `MAX_CASCADE_PASSES` | 1000 | Safety bound on clear/refill passes |
//! | `MAX_GENERATION_ATTEMPTS` | 1000000 | Safety bound on initial re-rolls |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{BoardAction, BoardConfig, Position};
//!
//! let config = BoardConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent(Position::new(2, 4)));
//! assert!(!a.is_adjacent(Position::new(3, 4)));
//!
//! assert_eq!(BoardAction::from_str("select"), Some(BoardAction::Select));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rows on a default board
pub const DEFAULT_ROWS: usize = 8;

/// Columns on a default board
pub const DEFAULT_COLS: usize = 8;

/// Tile types on a default board
pub const DEFAULT_VARIATIONS: u8 = 6;

/// Smallest row or column count for which a straight run of three fits
pub const MIN_DIMENSION: usize = 3;

/// Fewest tile types for which a match-free arrangement always exists
pub const MIN_VARIATIONS: u8 = 3;

/// Most tile types supported (one colour and one dump digit each)
pub const MAX_VARIATIONS: u8 = 9;

/// Upper bound on clear/gravity/refill passes in a single resolution.
///
/// Exceeding it means the cascade loop is broken, not that the board is unlucky.
pub const MAX_CASCADE_PASSES: u32 = 1000;

/// Upper bound on whole-grid re-rolls while looking for a match-free start.
pub const MAX_GENERATION_ATTEMPTS: u32 = 1_000_000;

/// A tile type identifier.
///
/// Valid resting values are `1..=variations`. [`EMPTY`] marks a cell that has been
/// cleared and not yet refilled.
pub type TileType = u8;

/// The empty-cell sentinel, only ever seen while a resolution is in flight
pub const EMPTY: TileType = 0;

/// A `(row, col)` cell coordinate.
///
/// Positions are unsigned; whether one lies on a particular board is checked by
/// [`Position::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if the position lies on a `rows x cols` board
    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// Offset by a signed delta.
    ///
    /// Returns `None` when the result would be negative. The upper bound is not
    /// checked here; board lookups do that.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Self { row, col })
    }

    /// True iff the Manhattan distance is exactly 1.
    ///
    /// Diagonal neighbours and the position itself are never adjacent.
    ///
    /// ```
    /// use tui_match3_types::Position;
    ///
    /// let p = Position::new(1, 1);
    /// assert!(p.is_adjacent(Position::new(0, 1)));
    /// assert!(p.is_adjacent(Position::new(1, 2)));
    /// assert!(!p.is_adjacent(Position::new(2, 2)));
    /// assert!(!p.is_adjacent(p));
    /// ```
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    /// Number of distinct tile types
    pub variations: u8,
    /// Emit a textual dump of both matrices after each resolution
    pub debug: bool,
}

impl BoardConfig {
    pub fn new(rows: usize, cols: usize, variations: u8) -> Self {
        Self {
            rows,
            cols,
            variations,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Reject configurations for which the initial re-roll loop could never finish
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_DIMENSION {
            return Err(ConfigError::TooFewRows(self.rows));
        }
        if self.cols < MIN_DIMENSION {
            return Err(ConfigError::TooFewCols(self.cols));
        }
        if self.variations < MIN_VARIATIONS {
            return Err(ConfigError::TooFewVariations(self.variations));
        }
        if self.variations > MAX_VARIATIONS {
            return Err(ConfigError::TooManyVariations(self.variations));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS, DEFAULT_VARIATIONS)
    }
}

/// Degenerate board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board needs at least 3 rows, got {0}")]
    TooFewRows(usize),
    #[error("board needs at least 3 columns, got {0}")]
    TooFewCols(usize),
    #[error("board needs at least 3 tile variations, got {0}")]
    TooFewVariations(u8),
    #[error("board supports at most 9 tile variations, got {0}")]
    TooManyVariations(u8),
}

/// Engine failures.
///
/// `OutOfBounds`, `ShapeMismatch` and `InvalidTile` are caller contract
/// violations. `ReserveExhausted` and `CascadeLimit` indicate a logic bug and
/// should be treated as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("position {pos} is outside the {rows}x{cols} board")]
    OutOfBounds {
        pos: Position,
        rows: usize,
        cols: usize,
    },
    #[error("expected a {rows}x{cols} grid for the {which} matrix")]
    ShapeMismatch {
        which: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("tile {tile} at {pos} in the {which} matrix is outside 1..={variations}")]
    InvalidTile {
        which: &'static str,
        pos: Position,
        tile: TileType,
        variations: u8,
    },
    #[error("reserve column {col} ran dry during refill")]
    ReserveExhausted { col: usize },
    #[error("cascade did not settle after {passes} passes")]
    CascadeLimit { passes: u32 },
    #[error("no match-free board found after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
}

/// Why a swap was refused without touching the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// A previous swap is still resolving (or animating)
    InputLocked,
    /// The two positions are not orthogonal neighbours
    NotAdjacent,
}

/// Totals for one completed resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Clear/gravity/refill passes run before the grid settled
    pub passes: u32,
    /// Cells cleared across all passes
    pub cleared: u32,
    /// In-grid tiles moved down
    pub dropped: u32,
    /// Tiles pulled in from the reserve
    pub introduced: u32,
}

impl CascadeReport {
    pub fn is_empty(&self) -> bool {
        self.passes == 0
    }
}

/// Result of `attempt_swap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SwapOutcome {
    /// Nothing changed
    Rejected { reason: RejectReason },
    /// The swap produced no match and was reverted
    RolledBack,
    /// The swap produced a match and the cascade ran to completion
    Resolved { report: CascadeReport },
}

impl SwapOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SwapOutcome::Rejected { .. })
    }
}

/// Result of tapping a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectOutcome {
    /// Input is locked; the tap was dropped
    Ignored,
    /// First slot filled
    Selected { at: Position },
    /// Second tap was not adjacent; selection is empty again
    Cleared,
    /// Second tap attempted a swap
    Swapped { outcome: SwapOutcome },
}

/// Core -> presentation notifications.
///
/// Each variant carries enough to update a view without inspecting the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    TileCleared { at: Position },
    TileDropped { from: Position, to: Position },
    ReserveTileIntroduced { at: Position, tile: TileType },
    SwapCommitted { a: Position, b: Position },
    SwapRolledBack { a: Position, b: Position },
    ReserveRegenerated,
}

impl BoardEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardEvent::TileCleared { .. } => "tileCleared",
            BoardEvent::TileDropped { .. } => "tileDropped",
            BoardEvent::ReserveTileIntroduced { .. } => "reserveTileIntroduced",
            BoardEvent::SwapCommitted { .. } => "swapCommitted",
            BoardEvent::SwapRolledBack { .. } => "swapRolledBack",
            BoardEvent::ReserveRegenerated => "reserveRegenerated",
        }
    }
}

/// Player intents produced by input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Tap the tile under the cursor
    Select,
    /// Drop the current selection
    Deselect,
    /// Re-roll a fresh board
    Restart,
}

impl BoardAction {
    /// Parse action from string (case-insensitive)
    ///
    /// ```
    /// use tui_match3_types::BoardAction;
    ///
    /// assert_eq!(BoardAction::from_str("moveLeft"), Some(BoardAction::MoveLeft));
    /// assert_eq!(BoardAction::from_str("RESTART"), Some(BoardAction::Restart));
    /// assert_eq!(BoardAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(BoardAction::MoveUp),
            "movedown" => Some(BoardAction::MoveDown),
            "moveleft" => Some(BoardAction::MoveLeft),
            "moveright" => Some(BoardAction::MoveRight),
            "select" => Some(BoardAction::Select),
            "deselect" => Some(BoardAction::Deselect),
            "restart" => Some(BoardAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardAction::MoveUp => "moveUp",
            BoardAction::MoveDown => "moveDown",
            BoardAction::MoveLeft => "moveLeft",
            BoardAction::MoveRight => "moveRight",
            BoardAction::Select => "select",
            BoardAction::Deselect => "deselect",
            BoardAction::Restart => "restart",
        }
    }
}
