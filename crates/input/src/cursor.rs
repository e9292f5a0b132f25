use crate::types::{BoardAction, Position};

/// Keyboard cursor over a `rows x cols` board.
///
/// Movement stops at the edges; it never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Position,
    rows: usize,
    cols: usize,
}

impl Cursor {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            pos: Position::new(0, 0),
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn move_to(&mut self, pos: Position) {
        self.pos = Position::new(pos.row.min(self.rows - 1), pos.col.min(self.cols - 1));
    }

    /// Apply a movement action. Returns false for non-movement actions.
    pub fn apply(&mut self, action: BoardAction) -> bool {
        let (d_row, d_col) = match action {
            BoardAction::MoveUp => (-1, 0),
            BoardAction::MoveDown => (1, 0),
            BoardAction::MoveLeft => (0, -1),
            BoardAction::MoveRight => (0, 1),
            _ => return false,
        };
        if let Some(next) = self.pos.offset(d_row, d_col) {
            if next.in_bounds(self.rows, self.cols) {
                self.pos = next;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps_at_edges() {
        let mut c = Cursor::new(3, 4);
        assert!(c.apply(BoardAction::MoveUp));
        assert!(c.apply(BoardAction::MoveLeft));
        assert_eq!(c.position(), Position::new(0, 0));

        for _ in 0..10 {
            c.apply(BoardAction::MoveRight);
            c.apply(BoardAction::MoveDown);
        }
        assert_eq!(c.position(), Position::new(2, 3));
    }

    #[test]
    fn test_non_movement_is_not_consumed() {
        let mut c = Cursor::new(8, 8);
        assert!(!c.apply(BoardAction::Select));
        assert_eq!(c.position(), Position::new(0, 0));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut c = Cursor::new(8, 8);
        c.move_to(Position::new(20, 3));
        assert_eq!(c.position(), Position::new(7, 3));
    }
}
