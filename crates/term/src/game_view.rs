//! GameView: maps a board snapshot and its presenter into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::BoardSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::presenter::{TilePresenter, FADE_MS};
use crate::types::{Position, TileType, EMPTY};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(70, 70, 95);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// One colour per tile type, indexed by `tile - 1`
const TILE_COLORS: [Rgb; 9] = [
    Rgb::new(220, 80, 80),
    Rgb::new(80, 200, 110),
    Rgb::new(80, 130, 230),
    Rgb::new(240, 210, 80),
    Rgb::new(200, 110, 220),
    Rgb::new(80, 210, 220),
    Rgb::new(255, 150, 40),
    Rgb::new(235, 235, 235),
    Rgb::new(150, 100, 60),
];

/// Glyph pairs so tile types stay distinguishable without colour
const TILE_GLYPHS: [[char; 2]; 9] = [
    ['█', '█'],
    ['▓', '▓'],
    ['▒', '▒'],
    ['◆', ' '],
    ['●', ' '],
    ['■', ' '],
    ['▲', ' '],
    ['▼', ' '],
    ['#', '#'],
];

pub fn tile_color(tile: TileType) -> Option<Rgb> {
    (tile as usize).checked_sub(1).and_then(|i| TILE_COLORS.get(i).copied())
}

/// What the view needs besides the snapshot
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub presenter: &'a TilePresenter,
    pub cursor: Position,
}

/// Terminal renderer for the board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Frame size (border included) for a board of the given dimensions
    pub fn frame_size(&self, rows: usize, cols: usize) -> (u16, u16) {
        (
            (cols as u16).saturating_mul(self.cell_w).saturating_add(2),
            (rows as u16).saturating_mul(self.cell_h).saturating_add(2),
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        view: ViewState<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size(snap.rows, snap.cols);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG);
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w.saturating_sub(2),
            frame_h.saturating_sub(2),
            ' ',
            bg,
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h);

        let origin = (start_x + 1, start_y + 1);

        // Cursor underlay first so tiles keep their glyphs on top of it.
        if view.cursor.in_bounds(snap.rows, snap.cols) {
            let (x, y) = self.cell_origin(origin, view.cursor.row as f32, view.cursor.col as f32);
            fb.fill_rect(x, y, self.cell_w, self.cell_h, ' ', CellStyle::new(bg.fg, CURSOR_BG));
        }

        for fading in view.presenter.fading() {
            let level = fading.remaining.min(FADE_MS) as u16;
            if let Some(fg) = tile_color(fading.sprite.tile) {
                let style = CellStyle::new(fg.scaled(level, FADE_MS as u16), PLAY_BG).dim();
                let (x, y) = self.cell_origin(origin, fading.at.row as f32, fading.at.col as f32);
                self.fill_cell(fb, x, y, ['░', '░'], style);
            }
        }

        for row in 0..snap.rows {
            for col in 0..snap.cols {
                let slot = Position::new(row, col);
                let Some(sprite) = view.presenter.sprite(slot) else {
                    continue;
                };
                let (d_row, d_col) = sprite.offset(slot);
                let draw_row = row as f32 + d_row;
                let draw_col = col as f32 + d_col;
                // Sprites above the board (fresh reserve tiles) stay hidden.
                if draw_row < -0.5 {
                    continue;
                }
                let selected = snap.selected == Some(slot) && sprite.is_still();
                let under_cursor = view.cursor == slot && sprite.is_still();
                self.draw_tile(fb, origin, draw_row, draw_col, sprite.tile, selected, under_cursor);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x, start_y, frame_w);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &BoardSnapshot, view: ViewState<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, view, viewport, &mut fb);
        fb
    }

    fn cell_origin(&self, origin: (u16, u16), row: f32, col: f32) -> (u16, u16) {
        let x = origin.0 as f32 + col * self.cell_w as f32;
        let y = origin.1 as f32 + row * self.cell_h as f32;
        (x.round().max(0.0) as u16, y.round().max(0.0) as u16)
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, x: u16, y: u16, glyphs: [char; 2], style: CellStyle) {
        for dy in 0..self.cell_h {
            for dx in 0..self.cell_w {
                let ch = glyphs[(dx as usize).min(1)];
                fb.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        origin: (u16, u16),
        row: f32,
        col: f32,
        tile: TileType,
        selected: bool,
        under_cursor: bool,
    ) {
        if tile == EMPTY {
            return;
        }
        let Some(fg) = tile_color(tile) else {
            return;
        };
        let glyphs = TILE_GLYPHS[(tile as usize - 1).min(TILE_GLYPHS.len() - 1)];
        let bg = if under_cursor { CURSOR_BG } else { PLAY_BG };
        let mut style = CellStyle::new(fg, bg);
        if selected {
            // Selected tiles render at reduced intensity.
            style = CellStyle::new(fg.scaled(6, 10), bg).dim();
        } else if under_cursor {
            style = style.bold();
        }
        let (x, y) = self.cell_origin(origin, row, col);
        self.fill_cell(fb, x, y, glyphs, style);
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        let style = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &BoardSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "SEED", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.seed, value);
        y += 2;

        fb.put_str(panel_x, y, "SWAPS", label);
        y += 1;
        let x = fb.put_u32(panel_x, y, snap.swaps, value);
        let x = fb.put_str(x, y, " / ", value.dim());
        fb.put_u32(x, y, snap.rollbacks, value.dim());
        y += 2;

        fb.put_str(panel_x, y, "CASCADE", label);
        y += 1;
        match snap.last_cascade {
            Some(report) => {
                let x = fb.put_u32(panel_x, y, report.passes, value);
                let x = fb.put_str(x, y, "x ", value.dim());
                fb.put_u32(x, y, report.cleared, value);
            }
            None => {
                fb.put_str(panel_x, y, "-", value);
            }
        }
        y += 2;

        if snap.input_locked {
            let warn = CellStyle::new(Rgb::new(255, 190, 60), PANEL_BG).bold();
            fb.put_str(panel_x, y, "LOCKED", warn);
        }
    }
}
