//! Ordering semantics for concurrent fetches and overlay opens.
//!
//! Simulates the interleavings a UI produces: two listing fetches in
//! flight at once, a drag resolving while a fetch is pending, and a
//! detail open racing a close. The store and overlay must converge on
//! the newest intent regardless of response arrival order.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};

use taskdeck::board::{BoardStore, Transition};
use taskdeck::overlay::Overlay;
use taskdeck_proto::task::{Priority, Status, Task};

fn due() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).single().unwrap()
}

fn task(id: &str, title: &str, status: Status) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: "details".to_string(),
        priority: Priority::Medium,
        status,
        assignee: None,
        due_date: due(),
        badge: "v1".to_string(),
        created_at: due(),
    }
}

#[test]
fn fetch_responses_arriving_in_order_apply_in_order() {
    let mut board = BoardStore::new();
    let first = board.begin_fetch();
    assert!(board.apply_fetch(first, vec![task("a", "one", Status::Backlog)]));

    let second = board.begin_fetch();
    assert!(board.apply_fetch(second, vec![task("b", "two", Status::Backlog)]));
    assert_eq!(board.tasks().len(), 1);
    assert_eq!(board.tasks()[0].id, "b");
}

#[test]
fn older_fetch_resolving_last_cannot_clobber_the_newer_one() {
    let mut board = BoardStore::new();
    let stale = board.begin_fetch();
    let fresh = board.begin_fetch();

    // The newer request resolves first.
    assert!(board.apply_fetch(fresh, vec![task("new", "fresh listing", Status::Backlog)]));
    // The older one straggles in afterwards and must be dropped.
    assert!(!board.apply_fetch(stale, vec![task("old", "stale listing", Status::Backlog)]));

    assert_eq!(board.tasks().len(), 1);
    assert_eq!(board.tasks()[0].id, "new");
}

#[test]
fn optimistic_move_is_visible_while_the_confirmation_is_pending() {
    let mut board = BoardStore::new();
    let ticket = board.begin_fetch();
    board.apply_fetch(ticket, vec![task("a", "one", Status::Backlog)]);

    let transition = board.begin_transition("a", Status::InProgress);
    assert_eq!(transition, Transition::Started { previous: Status::Backlog });

    // Nothing has resolved yet; the UI already shows the new column.
    assert_eq!(board.get("a").unwrap().status, Status::InProgress);

    // The server answers with its reconciled record.
    let mut confirmed = task("a", "one", Status::InProgress);
    confirmed.badge = "v2".to_string();
    board.confirm_transition(confirmed);
    assert_eq!(board.get("a").unwrap().badge, "v2");
}

#[test]
fn rollback_after_a_later_fetch_restores_the_listed_status() {
    let mut board = BoardStore::new();
    let ticket = board.begin_fetch();
    board.apply_fetch(ticket, vec![task("a", "one", Status::Review)]);

    let Transition::Started { previous } = board.begin_transition("a", Status::Done) else {
        panic!("transition should start");
    };
    board.roll_back_transition("a", previous);
    assert_eq!(board.get("a").unwrap().status, Status::Review);
}

#[test]
fn clearing_the_board_invalidates_in_flight_fetches() {
    let mut board = BoardStore::new();
    let ticket = board.begin_fetch();
    board.clear();

    // A logout raced the fetch; the response must not repopulate the board.
    assert!(!board.apply_fetch(ticket, vec![task("a", "one", Status::Backlog)]));
    assert!(board.tasks().is_empty());
}

#[test]
fn overlay_open_racing_a_close_resolves_to_closed() {
    let mut overlay = Overlay::new();
    let ticket = overlay.begin_open();
    overlay.close();

    assert!(!overlay.complete_open(ticket, task("a", "one", Status::Backlog), Vec::new()));
    assert!(!overlay.is_open());
}

#[test]
fn overlay_reopen_keeps_only_the_latest_target() {
    let mut overlay = Overlay::new();
    let first = overlay.begin_open();
    let second = overlay.begin_open();

    assert!(overlay.complete_open(second, task("b", "two", Status::Backlog), Vec::new()));
    assert!(!overlay.complete_open(first, task("a", "one", Status::Backlog), Vec::new()));
    assert_eq!(overlay.open_task().map(|t| t.id.as_str()), Some("b"));
}

#[test]
fn fetch_arriving_during_an_open_transition_wins_wholesale() {
    let mut board = BoardStore::new();
    let ticket = board.begin_fetch();
    board.apply_fetch(ticket, vec![task("a", "one", Status::Backlog)]);
    board.begin_transition("a", Status::InProgress);

    // A full listing lands before the confirmation; it is authoritative.
    let ticket = board.begin_fetch();
    board.apply_fetch(ticket, vec![task("a", "one", Status::Done)]);
    assert_eq!(board.get("a").unwrap().status, Status::Done);
}
