//! Observer module - the core -> presentation notification contract
//!
//! The engine never knows what is drawing the board. It reports each observable
//! mutation through [`BoardObserver`], and the presentation layer keeps its own
//! position-indexed view in sync from those calls alone.
//!
//! Every named callback defaults to forwarding a [`BoardEvent`] to
//! [`BoardObserver::on_event`], so simple recorders implement one method and
//! richer presenters override only what they need.

use crate::types::{BoardEvent, Position, TileType};

pub trait BoardObserver {
    /// Catch-all sink used by the default callback implementations
    fn on_event(&mut self, _event: BoardEvent) {}

    fn on_tile_cleared(&mut self, at: Position) {
        self.on_event(BoardEvent::TileCleared { at });
    }

    fn on_tile_dropped(&mut self, from: Position, to: Position) {
        self.on_event(BoardEvent::TileDropped { from, to });
    }

    fn on_reserve_tile_introduced(&mut self, at: Position, tile: TileType) {
        self.on_event(BoardEvent::ReserveTileIntroduced { at, tile });
    }

    fn on_swap_committed(&mut self, a: Position, b: Position) {
        self.on_event(BoardEvent::SwapCommitted { a, b });
    }

    fn on_swap_rolled_back(&mut self, a: Position, b: Position) {
        self.on_event(BoardEvent::SwapRolledBack { a, b });
    }

    /// Called once after each gravity/refill sweep re-rolls the reserve
    fn on_reserve_regenerated(&mut self) {
        self.on_event(BoardEvent::ReserveRegenerated);
    }
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BoardObserver for NoopObserver {}

/// Observer that records every event in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<BoardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of recorded events of the same kind as `like`
    pub fn count_like(&self, like: &BoardEvent) -> usize {
        let kind = std::mem::discriminant(like);
        self.events
            .iter()
            .filter(|e| std::mem::discriminant(*e) == kind)
            .count()
    }

    /// Drain the recorded events
    pub fn take(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl BoardObserver for EventLog {
    fn on_event(&mut self, event: BoardEvent) {
        self.events.push(event);
    }
}

impl<T: BoardObserver + ?Sized> BoardObserver for &mut T {
    fn on_event(&mut self, event: BoardEvent) {
        (**self).on_event(event);
    }

    fn on_tile_cleared(&mut self, at: Position) {
        (**self).on_tile_cleared(at);
    }

    fn on_tile_dropped(&mut self, from: Position, to: Position) {
        (**self).on_tile_dropped(from, to);
    }

    fn on_reserve_tile_introduced(&mut self, at: Position, tile: TileType) {
        (**self).on_reserve_tile_introduced(at, tile);
    }

    fn on_swap_committed(&mut self, a: Position, b: Position) {
        (**self).on_swap_committed(a, b);
    }

    fn on_swap_rolled_back(&mut self, a: Position, b: Position) {
        (**self).on_swap_rolled_back(a, b);
    }

    fn on_reserve_regenerated(&mut self) {
        (**self).on_reserve_regenerated();
    }
}

/// `None` ignores everything
impl<T: BoardObserver> BoardObserver for Option<T> {
    fn on_event(&mut self, event: BoardEvent) {
        if let Some(inner) = self {
            inner.on_event(event);
        }
    }

    fn on_tile_cleared(&mut self, at: Position) {
        if let Some(inner) = self {
            inner.on_tile_cleared(at);
        }
    }

    fn on_tile_dropped(&mut self, from: Position, to: Position) {
        if let Some(inner) = self {
            inner.on_tile_dropped(from, to);
        }
    }

    fn on_reserve_tile_introduced(&mut self, at: Position, tile: TileType) {
        if let Some(inner) = self {
            inner.on_reserve_tile_introduced(at, tile);
        }
    }

    fn on_swap_committed(&mut self, a: Position, b: Position) {
        if let Some(inner) = self {
            inner.on_swap_committed(a, b);
        }
    }

    fn on_swap_rolled_back(&mut self, a: Position, b: Position) {
        if let Some(inner) = self {
            inner.on_swap_rolled_back(a, b);
        }
    }

    fn on_reserve_regenerated(&mut self) {
        if let Some(inner) = self {
            inner.on_reserve_regenerated();
        }
    }
}

/// Fan out: both observers see every callback, first then second
impl<A: BoardObserver, B: BoardObserver> BoardObserver for (A, B) {
    fn on_event(&mut self, event: BoardEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }

    fn on_tile_cleared(&mut self, at: Position) {
        self.0.on_tile_cleared(at);
        self.1.on_tile_cleared(at);
    }

    fn on_tile_dropped(&mut self, from: Position, to: Position) {
        self.0.on_tile_dropped(from, to);
        self.1.on_tile_dropped(from, to);
    }

    fn on_reserve_tile_introduced(&mut self, at: Position, tile: TileType) {
        self.0.on_reserve_tile_introduced(at, tile);
        self.1.on_reserve_tile_introduced(at, tile);
    }

    fn on_swap_committed(&mut self, a: Position, b: Position) {
        self.0.on_swap_committed(a, b);
        self.1.on_swap_committed(a, b);
    }

    fn on_swap_rolled_back(&mut self, a: Position, b: Position) {
        self.0.on_swap_rolled_back(a, b);
        self.1.on_swap_rolled_back(a, b);
    }

    fn on_reserve_regenerated(&mut self) {
        self.0.on_reserve_regenerated();
        self.1.on_reserve_regenerated();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ClearCounter(usize);

    impl BoardObserver for ClearCounter {
        fn on_tile_cleared(&mut self, _at: Position) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_event_log_records_in_order() {
        let mut log = EventLog::new();
        let a = Position::new(0, 0);
        let b = Position::new(0, 1);
        log.on_swap_committed(a, b);
        log.on_swap_rolled_back(a, b);
        assert_eq!(
            log.events(),
            &[
                BoardEvent::SwapCommitted { a, b },
                BoardEvent::SwapRolledBack { a, b }
            ]
        );
        assert_eq!(log.count_like(&BoardEvent::ReserveRegenerated), 0);
    }

    #[test]
    fn test_pair_fans_out_to_both() {
        let mut log = EventLog::new();
        let mut counter = ClearCounter::default();
        {
            let mut pair = (&mut log, &mut counter);
            pair.on_tile_cleared(Position::new(1, 1));
            pair.on_reserve_regenerated();
        }
        assert_eq!(log.len(), 2);
        assert_eq!(counter.0, 1);
    }

    #[test]
    fn test_optional_observer() {
        let mut log = EventLog::new();
        let mut none: Option<&mut EventLog> = None;
        none.on_reserve_regenerated();

        let mut some = Some(&mut log);
        some.on_tile_dropped(Position::new(0, 0), Position::new(1, 0));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_take_drains() {
        let mut log = EventLog::new();
        log.on_reserve_regenerated();
        assert_eq!(log.take(), vec![BoardEvent::ReserveRegenerated]);
        assert!(log.is_empty());
    }
}
