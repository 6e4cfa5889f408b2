//! Property-based wire format tests.
//!
//! Uses proptest to verify:
//! 1. Any task survives a JSON serialize → deserialize round-trip.
//! 2. Enum wire forms parse back through `FromStr` regardless of case.
//! 3. Filter normalization: blank assignee ids never constrain, and the
//!    query string is empty exactly when the filter is.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use taskdeck_proto::filter::TaskFilter;
use taskdeck_proto::task::{Priority, Status, Task};
use taskdeck_proto::user::User;

// --- Strategies for wire types ---

fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Backlog),
        Just(Status::InProgress),
        Just(Status::Review),
        Just(Status::Done),
    ]
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

fn arb_user() -> impl Strategy<Value = User> {
    ("[a-z0-9-]{1,16}", "[a-z]{1,12}").prop_map(|(id, name)| User {
        id: format!("u-{id}"),
        email: format!("{name}@example.com"),
    })
}

/// Any representable task. Instants are whole seconds because the wire
/// format carries ISO-8601 with second precision.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        "[a-z0-9-]{1,16}",
        "[^\u{0}]{1,64}",
        "[^\u{0}]{1,256}",
        arb_priority(),
        arb_status(),
        prop::option::of(arb_user()),
        0i64..4_000_000_000,
        "(v[0-9]{1,3})?",
    )
        .prop_map(
            |(id, title, description, priority, status, assignee, due_secs, badge)| Task {
                id: format!("t-{id}"),
                title,
                description,
                priority,
                status,
                assignee,
                due_date: Utc.timestamp_opt(due_secs, 0).single().unwrap_or_default(),
                badge,
                created_at: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
            },
        )
}

// --- Properties ---

proptest! {
    #[test]
    fn task_round_trips_through_json(task in arb_task()) {
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(task, back);
    }

    #[test]
    fn status_wire_form_parses_back_in_any_case(status in arb_status()) {
        let lower = status.as_str().to_ascii_lowercase();
        prop_assert_eq!(lower.parse::<Status>().unwrap(), status);
        prop_assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
    }

    #[test]
    fn priority_wire_form_parses_back_in_any_case(priority in arb_priority()) {
        let lower = priority.as_str().to_ascii_lowercase();
        prop_assert_eq!(lower.parse::<Priority>().unwrap(), priority);
        prop_assert_eq!(priority.as_str().parse::<Priority>().unwrap(), priority);
    }

    #[test]
    fn garbage_status_never_panics(input in ".*") {
        // Parsing must fail gracefully on anything outside the wire forms.
        let _ = input.parse::<Status>();
        let _ = input.parse::<Priority>();
    }

    #[test]
    fn blank_assignee_never_constrains_the_filter(ws in "[ \t]{0,8}") {
        let mut filter = TaskFilter::new();
        filter.set_assignee(Some(ws));
        prop_assert!(filter.assignee_id().is_none());
        prop_assert!(filter.is_empty());
    }

    #[test]
    fn assignee_id_is_stored_trimmed(id in "[a-z0-9-]{1,16}", pad in "[ ]{0,4}") {
        let mut filter = TaskFilter::new();
        filter.set_assignee(Some(format!("{pad}{id}{pad}")));
        prop_assert_eq!(filter.assignee_id(), Some(id.as_str()));
    }

    #[test]
    fn query_string_is_empty_exactly_when_the_filter_is(
        assignee in prop::option::of("[a-z0-9-]{1,16}"),
        priority in prop::option::of(arb_priority()),
    ) {
        let mut filter = TaskFilter::new();
        filter.set_assignee(assignee.clone());
        filter.set_priority(priority);

        let pairs = filter.query_pairs();
        prop_assert_eq!(pairs.is_empty(), filter.is_empty());
        prop_assert_eq!(pairs.len(), usize::from(assignee.is_some()) + usize::from(priority.is_some()));
    }
}
