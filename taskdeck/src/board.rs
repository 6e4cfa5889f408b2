//! Board store: the authoritative in-memory task and user collections.
//!
//! All mutation of the visible board goes through this store. It owns
//! three reconciliation concerns:
//! - merging server responses (full replacements, user unions, upserts)
//! - the two-phase optimistic status transition used by drag-and-drop
//! - the stale-response guard that keeps interleaved list fetches from
//!   clobbering newer state
//!
//! The store never errors on a locally absent entry; an absent task or
//! user is a legitimate empty result, not a failure.

use std::collections::BTreeMap;

use taskdeck_proto::task::{Status, Task};
use taskdeck_proto::user::User;

/// Outcome of starting a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The task is absent or already at the target status. The store is
    /// unchanged and no remote call should be issued.
    Unchanged,
    /// The optimistic local update was applied; the caller must either
    /// confirm with the server's task or roll back to `previous`.
    Started {
        /// Status the task held before the optimistic update.
        previous: Status,
    },
}

/// Identifies one issued list fetch for the stale-response guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// One known user plus which source it was learned from.
///
/// The dedicated listing endpoint is authoritative: an entry learned
/// from it is never overwritten by incidental assignee payloads.
#[derive(Debug)]
struct UserEntry {
    user: User,
    from_listing: bool,
}

/// Single source of truth for the tasks and users visible to the UI.
#[derive(Debug, Default)]
pub struct BoardStore {
    tasks: Vec<Task>,
    users: Vec<UserEntry>,
    fetch_seq: u64,
}

impl BoardStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current task list in collection order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Known users in the order they were first learned.
    #[must_use]
    pub fn users(&self) -> Vec<&User> {
        self.users.iter().map(|entry| &entry.user).collect()
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|entry| entry.user.id == id)
            .map(|entry| &entry.user)
    }

    /// Discards all cached tasks and users (session ended).
    ///
    /// Any in-flight fetch ticket is invalidated, so a response that
    /// resolves after logout cannot repopulate the board.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.users.clear();
        self.fetch_seq += 1;
    }

    /// Replaces the full task set with a fetched one.
    ///
    /// The server already applied the active filter, so no local
    /// filtering happens here. Assignees found in the payload are
    /// merged into the user set as incidental knowledge.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        for task in &tasks {
            if let Some(assignee) = &task.assignee {
                self.learn_user(assignee.clone(), false);
            }
        }
        self.tasks = tasks;
    }

    /// Unions users from the dedicated listing into the user set,
    /// keyed by id, overwriting matching entries.
    pub fn merge_users(&mut self, users: Vec<User>) {
        for user in users {
            self.learn_user(user, true);
        }
    }

    /// Inserts or replaces a single user.
    ///
    /// Listing knowledge wins over incidental knowledge for the same
    /// id; the set only ever grows.
    fn learn_user(&mut self, user: User, from_listing: bool) {
        if let Some(entry) = self.users.iter_mut().find(|e| e.user.id == user.id) {
            if from_listing || !entry.from_listing {
                entry.user = user;
            }
            entry.from_listing |= from_listing;
        } else {
            self.users.push(UserEntry { user, from_listing });
        }
    }

    /// Inserts or replaces a task by id (used after create and after a
    /// confirmed status update).
    pub fn upsert(&mut self, task: Task) {
        if let Some(assignee) = &task.assignee {
            self.learn_user(assignee.clone(), false);
        }
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        } else {
            self.tasks.push(task);
        }
    }

    /// Partitions the collection into status-keyed buckets.
    ///
    /// Every status bucket is present (possibly empty); within a bucket
    /// tasks keep collection order, so re-grouping never reorders them.
    #[must_use]
    pub fn group_by_status(&self) -> BTreeMap<Status, Vec<&Task>> {
        let mut groups: BTreeMap<Status, Vec<&Task>> =
            Status::ALL.iter().map(|s| (*s, Vec::new())).collect();
        for task in &self.tasks {
            if let Some(bucket) = groups.get_mut(&task.status) {
                bucket.push(task);
            }
        }
        groups
    }

    /// Registers a new list fetch and returns its ticket.
    ///
    /// Issuing a new ticket supersedes every earlier one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_seq += 1;
        FetchTicket(self.fetch_seq)
    }

    /// Applies a fetched task list if its ticket is still the latest.
    ///
    /// Returns `false` (leaving the store untouched) when a newer fetch
    /// was issued after this one — the superseded response is discarded.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, tasks: Vec<Task>) -> bool {
        if ticket.0 != self.fetch_seq {
            return false;
        }
        self.replace_all(tasks);
        true
    }

    /// Phase one of a status transition: the optimistic local update.
    ///
    /// Returns [`Transition::Unchanged`] when the task is absent or
    /// already at `new_status`; otherwise records the move locally so
    /// the grouped view reflects it immediately.
    pub fn begin_transition(&mut self, id: &str, new_status: Status) -> Transition {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Transition::Unchanged;
        };
        if task.status == new_status {
            return Transition::Unchanged;
        }
        let previous = task.status;
        task.status = new_status;
        Transition::Started { previous }
    }

    /// Phase two, success: reconcile with the server's returned task.
    ///
    /// The whole record is replaced, not just the status — authoritative
    /// fields such as the badge may have changed server-side.
    pub fn confirm_transition(&mut self, task: Task) {
        self.upsert(task);
    }

    /// Phase two, failure: restore the pre-transition status.
    pub fn roll_back_transition(&mut self, id: &str, previous: Status) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = previous;
        }
    }
}
