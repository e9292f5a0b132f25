//! Terminal presentation layer.
//!
//! A small, game-oriented rendering layer: the board is drawn into a plain
//! framebuffer which is then diffed and flushed to the terminal. No widget
//! toolkit is involved.
//!
//! - [`presenter`]: position-indexed sprite table driven by board notifications
//! - [`game_view`]: pure snapshot + presenter to framebuffer mapping
//! - [`renderer`]: crossterm flusher with run-length diffing

pub mod fb;
pub mod game_view;
pub mod presenter;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_color, AnchorY, GameView, ViewState, Viewport};
pub use presenter::{Fading, Motion, Sprite, TilePresenter};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
