//! Core engine - pure, deterministic, and testable
//!
//! Everything about the rules of the board lives here: the grid and its reserve
//! buffer, match detection, the clear/gravity/refill cascade, and the tap/swap
//! controller. Nothing in this crate draws or reads input. Presentation code
//! learns about mutations through [`BoardObserver`] and reads state through
//! [`BoardSnapshot`].
//!
//! # Module Structure
//!
//! - [`grid`]: row-major tile grids and the visible/reserve pair
//! - [`matcher`]: six-pattern match detection
//! - [`resolve`]: the cascade state machine and gravity sweep
//! - [`board`]: selection, input lock, swap and rollback
//! - [`observer`]: the notification contract plus recorders
//! - [`rng`]: seeded LCG so a seed reproduces a whole session
//! - [`snapshot`]: plain-data view for renderers and logs
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Board, EventLog};
//! use tui_match3_types::{BoardConfig, Position, SwapOutcome};
//!
//! let mut board = Board::from_grids(
//!     BoardConfig::new(3, 3, 4),
//!     &[vec![1, 2, 1], vec![2, 1, 3], vec![3, 4, 2]],
//!     &[vec![4, 4, 4], vec![3, 3, 3], vec![2, 4, 3]],
//!     7,
//! )
//! .unwrap();
//!
//! // Moving the 1 at (1, 1) up completes the top row.
//! let mut log = EventLog::new();
//! let outcome = board
//!     .attempt_swap(Position::new(0, 1), Position::new(1, 1), &mut log)
//!     .unwrap();
//!
//! assert!(matches!(outcome, SwapOutcome::Resolved { .. }));
//! assert!(!board.is_input_locked());
//! ```

pub mod board;
pub mod grid;
pub mod matcher;
pub mod observer;
pub mod resolve;
pub mod rng;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Selection};
pub use grid::{GridStore, TileGrid};
pub use matcher::{find_all_matches, find_all_matches_into, has_any_match, is_adjacent, is_matched_at};
pub use observer::{BoardObserver, EventLog, NoopObserver};
pub use resolve::{apply_gravity, ResolutionEngine, ResolvePhase, SweepCounts};
pub use rng::SimpleRng;
pub use snapshot::BoardSnapshot;
