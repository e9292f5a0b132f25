//! Wire shape of events, outcomes and snapshots

use serde_json::{json, Value};
use tui_match3::core::{Board, BoardSnapshot, EventLog};
use tui_match3::event_log::JsonLinesLog;
use tui_match3::types::{BoardConfig, BoardEvent, CascadeReport, Position, RejectReason, SwapOutcome};

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

#[test]
fn test_events_are_tagged_by_type() {
    let cases = [
        (
            BoardEvent::TileCleared { at: p(1, 2) },
            json!({"type": "tile_cleared", "at": {"row": 1, "col": 2}}),
        ),
        (
            BoardEvent::TileDropped { from: p(0, 0), to: p(2, 0) },
            json!({"type": "tile_dropped", "from": {"row": 0, "col": 0}, "to": {"row": 2, "col": 0}}),
        ),
        (
            BoardEvent::ReserveTileIntroduced { at: p(0, 3), tile: 5 },
            json!({"type": "reserve_tile_introduced", "at": {"row": 0, "col": 3}, "tile": 5}),
        ),
        (BoardEvent::ReserveRegenerated, json!({"type": "reserve_regenerated"})),
    ];

    for (event, expected) in cases {
        assert_eq!(serde_json::to_value(event).unwrap(), expected);
        let back: BoardEvent = serde_json::from_value(expected).unwrap();
        assert_eq!(back, event);
    }
}

#[test]
fn test_swap_outcomes_serialize_with_outcome_tag() {
    let rejected = SwapOutcome::Rejected {
        reason: RejectReason::InputLocked,
    };
    assert_eq!(
        serde_json::to_value(rejected).unwrap(),
        json!({"outcome": "rejected", "reason": "input_locked"})
    );

    let resolved = SwapOutcome::Resolved {
        report: CascadeReport {
            passes: 1,
            cleared: 3,
            dropped: 2,
            introduced: 3,
        },
    };
    let v: Value = serde_json::to_value(resolved).unwrap();
    assert_eq!(v["outcome"], "resolved");
    assert_eq!(v["report"]["cleared"], 3);
}

#[test]
fn test_event_log_file_matches_recorded_events() {
    let mut board = Board::from_grids(
        BoardConfig::new(3, 3, 4),
        &[vec![1, 2, 1], vec![2, 1, 3], vec![3, 4, 2]],
        &[vec![4, 4, 4], vec![3, 3, 3], vec![2, 4, 3]],
        7,
    )
    .unwrap();

    let mut recorded = EventLog::new();
    let mut lines = JsonLinesLog::new(Vec::new());
    board
        .attempt_swap(p(0, 1), p(1, 1), &mut (&mut recorded, &mut lines))
        .unwrap();
    lines.flush().unwrap();
    assert_eq!(lines.written() as usize, recorded.len());

    let text = String::from_utf8(lines.into_inner()).unwrap();
    let parsed: Vec<BoardEvent> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(parsed, recorded.events());
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let board = Board::new(BoardConfig::new(5, 6, 4), 31).unwrap();
    let snap = board.snapshot();
    let text = serde_json::to_string(&snap).unwrap();
    let back: BoardSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(back, snap);
    assert_eq!(back.tiles.len(), 30);
}
