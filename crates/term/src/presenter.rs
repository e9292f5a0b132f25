//! TilePresenter: the visual twin of the board.
//!
//! Holds one [`Sprite`] per `(row, col)` slot and keeps that table in sync from
//! [`BoardObserver`] callbacks alone. After any sequence of notifications the
//! tile types in the table equal the board's visible grid.
//!
//! Animations are purely cosmetic. The engine has already finished mutating
//! when they start; [`TilePresenter::is_animating`] lets the front end hold the
//! board's input lock until they settle.

use crate::core::{BoardObserver, BoardSnapshot};
use crate::types::{Position, TileType, EMPTY};

/// Milliseconds per row of fall distance
pub const FALL_MS_PER_ROW: u32 = 45;
/// Duration of a swap slide
pub const SLIDE_MS: u32 = 120;
/// Duration of the clear fade
pub const FADE_MS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Still,
    /// Falling into its slot from `from_row`, which may be above the board
    Fall { from_row: i32, elapsed: u32 },
    /// Sliding into its slot from a neighbouring one
    Slide { from: Position, elapsed: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub id: u32,
    pub tile: TileType,
    pub motion: Motion,
}

impl Sprite {
    pub fn is_still(&self) -> bool {
        self.motion == Motion::Still
    }

    /// Offset from the owning slot in cell units, as `(rows, cols)`.
    ///
    /// Negative rows are above the slot.
    pub fn offset(&self, slot: Position) -> (f32, f32) {
        match self.motion {
            Motion::Still => (0.0, 0.0),
            Motion::Fall { from_row, elapsed } => {
                let distance = slot.row as i32 - from_row;
                let total = fall_duration(distance);
                let left = 1.0 - elapsed.min(total) as f32 / total as f32;
                (-(distance as f32) * left, 0.0)
            }
            Motion::Slide { from, elapsed } => {
                let left = 1.0 - elapsed.min(SLIDE_MS) as f32 / SLIDE_MS as f32;
                (
                    (from.row as f32 - slot.row as f32) * left,
                    (from.col as f32 - slot.col as f32) * left,
                )
            }
        }
    }

    fn advance(&mut self, slot: Position, ms: u32) {
        self.motion = match self.motion {
            Motion::Still => Motion::Still,
            Motion::Fall { from_row, elapsed } => {
                let elapsed = elapsed.saturating_add(ms);
                if elapsed >= fall_duration(slot.row as i32 - from_row) {
                    Motion::Still
                } else {
                    Motion::Fall { from_row, elapsed }
                }
            }
            Motion::Slide { from, elapsed } => {
                let elapsed = elapsed.saturating_add(ms);
                if elapsed >= SLIDE_MS {
                    Motion::Still
                } else {
                    Motion::Slide { from, elapsed }
                }
            }
        };
    }

    /// Where the sprite appears to start its current fall, given its new slot
    fn fall_origin(&self, from: Position) -> i32 {
        match self.motion {
            // A sprite still falling keeps falling from where it started.
            Motion::Fall { from_row, .. } => from_row,
            _ => from.row as i32,
        }
    }
}

fn fall_duration(distance: i32) -> u32 {
    (distance.max(1) as u32) * FALL_MS_PER_ROW
}

/// A cleared sprite fading out at its last slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fading {
    pub at: Position,
    pub sprite: Sprite,
    pub remaining: u32,
}

#[derive(Debug, Clone)]
pub struct TilePresenter {
    rows: usize,
    cols: usize,
    slots: Vec<Option<Sprite>>,
    fading: Vec<Fading>,
    /// Reserve tiles introduced per column during the current sweep
    spawned: Vec<u16>,
    next_id: u32,
    animate: bool,
}

impl TilePresenter {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            slots: vec![None; rows * cols],
            fading: Vec::new(),
            spawned: vec![0; cols],
            next_id: 1,
            animate: true,
        }
    }

    /// Presenter whose notifications apply instantly
    pub fn without_animation(mut self) -> Self {
        self.animate = false;
        self
    }

    /// Build a presenter mirroring `snap`, every sprite at rest.
    pub fn from_snapshot(snap: &BoardSnapshot) -> Self {
        let mut p = Self::new(snap.rows, snap.cols);
        p.sync(snap);
        p
    }

    /// Discard all sprites and rebuild from `snap` (start and restart).
    pub fn sync(&mut self, snap: &BoardSnapshot) {
        if snap.rows != self.rows || snap.cols != self.cols {
            self.rows = snap.rows;
            self.cols = snap.cols;
            self.slots = vec![None; snap.rows * snap.cols];
            self.spawned = vec![0; snap.cols];
        }
        self.fading.clear();
        self.spawned.fill(0);
        for i in 0..self.slots.len() {
            let tile = snap.tiles.get(i).copied().unwrap_or(EMPTY);
            let sprite = (tile != EMPTY).then(|| self.spawn(tile, Motion::Still));
            self.slots[i] = sprite;
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        pos.in_bounds(self.rows, self.cols)
            .then(|| pos.row * self.cols + pos.col)
    }

    pub fn sprite(&self, pos: Position) -> Option<&Sprite> {
        self.index(pos).and_then(|i| self.slots[i].as_ref())
    }

    /// Tile type shown at `pos`, `EMPTY` for a vacant slot
    pub fn tile(&self, pos: Position) -> Option<TileType> {
        self.index(pos)
            .map(|i| self.slots[i].map_or(EMPTY, |s| s.tile))
    }

    /// Row-major tile types, comparable with a snapshot's `tiles`
    pub fn tiles(&self) -> Vec<TileType> {
        self.slots.iter().map(|s| s.map_or(EMPTY, |s| s.tile)).collect()
    }

    pub fn fading(&self) -> &[Fading] {
        &self.fading
    }

    pub fn is_animating(&self) -> bool {
        !self.fading.is_empty()
            || self
                .slots
                .iter()
                .flatten()
                .any(|s| s.motion != Motion::Still)
    }

    /// Advance every animation by `ms` milliseconds.
    pub fn tick(&mut self, ms: u32) {
        for i in 0..self.slots.len() {
            let slot = Position::new(i / self.cols, i % self.cols);
            if let Some(sprite) = self.slots[i].as_mut() {
                sprite.advance(slot, ms);
            }
        }
        self.fading.retain_mut(|f| {
            f.remaining = f.remaining.saturating_sub(ms);
            f.remaining > 0
        });
    }

    fn spawn(&mut self, tile: TileType, motion: Motion) -> Sprite {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        Sprite { id, tile, motion }
    }

    fn motion(&self, motion: Motion) -> Motion {
        if self.animate {
            motion
        } else {
            Motion::Still
        }
    }

    fn exchange(&mut self, a: Position, b: Position) {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return;
        };
        self.slots.swap(ia, ib);
        let slide_a = self.motion(Motion::Slide { from: b, elapsed: 0 });
        let slide_b = self.motion(Motion::Slide { from: a, elapsed: 0 });
        if let Some(s) = self.slots[ia].as_mut() {
            s.motion = slide_a;
        }
        if let Some(s) = self.slots[ib].as_mut() {
            s.motion = slide_b;
        }
    }
}

impl BoardObserver for TilePresenter {
    fn on_tile_cleared(&mut self, at: Position) {
        let Some(i) = self.index(at) else {
            return;
        };
        if let Some(mut sprite) = self.slots[i].take() {
            if self.animate {
                sprite.motion = Motion::Still;
                self.fading.push(Fading {
                    at,
                    sprite,
                    remaining: FADE_MS,
                });
            }
        }
    }

    fn on_tile_dropped(&mut self, from: Position, to: Position) {
        let (Some(src), Some(dst)) = (self.index(from), self.index(to)) else {
            return;
        };
        if let Some(mut sprite) = self.slots[src].take() {
            let from_row = sprite.fall_origin(from);
            sprite.motion = self.motion(Motion::Fall { from_row, elapsed: 0 });
            self.slots[dst] = Some(sprite);
        }
    }

    fn on_reserve_tile_introduced(&mut self, at: Position, tile: TileType) {
        let Some(i) = self.index(at) else {
            return;
        };
        // Bottom-up fill: each further spawn in a column starts one row higher.
        self.spawned[at.col] += 1;
        let from_row = -(self.spawned[at.col] as i32);
        let motion = self.motion(Motion::Fall { from_row, elapsed: 0 });
        self.slots[i] = Some(self.spawn(tile, motion));
    }

    fn on_swap_committed(&mut self, a: Position, b: Position) {
        self.exchange(a, b);
    }

    fn on_swap_rolled_back(&mut self, a: Position, b: Position) {
        self.exchange(a, b);
    }

    fn on_reserve_regenerated(&mut self) {
        self.spawned.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(rows: usize, cols: usize, tiles: Vec<TileType>) -> BoardSnapshot {
        BoardSnapshot {
            rows,
            cols,
            tiles,
            ..BoardSnapshot::default()
        }
    }

    #[test]
    fn test_sync_assigns_unique_ids() {
        let p = TilePresenter::from_snapshot(&snap(2, 2, vec![1, 2, 3, 1]));
        let mut ids: Vec<u32> = (0..4)
            .filter_map(|i| p.sprite(Position::new(i / 2, i % 2)).map(|s| s.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(!p.is_animating());
    }

    #[test]
    fn test_drop_moves_sprite_identity() {
        let mut p = TilePresenter::from_snapshot(&snap(3, 1, vec![1, 2, 3]));
        let top_id = p.sprite(Position::new(0, 0)).map(|s| s.id);

        p.on_tile_cleared(Position::new(2, 0));
        p.on_tile_dropped(Position::new(1, 0), Position::new(2, 0));
        p.on_tile_dropped(Position::new(0, 0), Position::new(1, 0));
        p.on_reserve_tile_introduced(Position::new(0, 0), 4);

        assert_eq!(p.tiles(), vec![4, 1, 2]);
        assert_eq!(p.sprite(Position::new(1, 0)).map(|s| s.id), top_id);
        assert_eq!(p.fading().len(), 1);
        assert!(p.is_animating());
    }

    #[test]
    fn test_spawns_stack_above_the_board() {
        let mut p = TilePresenter::from_snapshot(&snap(2, 1, vec![0, 0]));
        p.on_reserve_tile_introduced(Position::new(1, 0), 1);
        p.on_reserve_tile_introduced(Position::new(0, 0), 2);

        let low = p.sprite(Position::new(1, 0)).map(|s| s.motion);
        let high = p.sprite(Position::new(0, 0)).map(|s| s.motion);
        assert_eq!(low, Some(Motion::Fall { from_row: -1, elapsed: 0 }));
        assert_eq!(high, Some(Motion::Fall { from_row: -2, elapsed: 0 }));

        p.on_reserve_regenerated();
        assert_eq!(p.spawned, vec![0]);
    }

    #[test]
    fn test_swap_and_rollback_restore_table() {
        let mut p = TilePresenter::from_snapshot(&snap(1, 2, vec![1, 2]));
        p.on_swap_committed(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(p.tiles(), vec![2, 1]);
        p.on_swap_rolled_back(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(p.tiles(), vec![1, 2]);
    }

    #[test]
    fn test_tick_settles_every_animation() {
        let mut p = TilePresenter::from_snapshot(&snap(4, 1, vec![1, 2, 3, 4]));
        p.on_tile_cleared(Position::new(3, 0));
        for row in (0..3).rev() {
            p.on_tile_dropped(Position::new(row, 0), Position::new(row + 1, 0));
        }
        p.on_reserve_tile_introduced(Position::new(0, 0), 2);
        assert!(p.is_animating());

        let (dr, _) = p.sprite(Position::new(3, 0)).map(|s| s.offset(Position::new(3, 0))).unwrap();
        assert!(dr < 0.0);

        p.tick(FADE_MS.max(FALL_MS_PER_ROW * 4));
        assert!(!p.is_animating());
    }

    #[test]
    fn test_without_animation_is_never_animating() {
        let mut p = TilePresenter::from_snapshot(&snap(2, 1, vec![1, 2])).without_animation();
        p.on_tile_cleared(Position::new(1, 0));
        p.on_tile_dropped(Position::new(0, 0), Position::new(1, 0));
        p.on_reserve_tile_introduced(Position::new(0, 0), 3);
        assert!(!p.is_animating());
        assert_eq!(p.tiles(), vec![3, 1]);
    }
}
