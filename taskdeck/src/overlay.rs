//! Detail overlay: the one task currently inspected, plus its comments.
//!
//! The overlay has its own lifecycle, independent of the board store.
//! Opening fetches task and comments concurrently; the epoch counter
//! makes open/close last-writer-wins, so a completion that arrives
//! after the overlay was closed or re-targeted is ignored and the view
//! is never half-populated.

use taskdeck_proto::comment::Comment;
use taskdeck_proto::task::Task;

/// Identifies one in-flight open attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTicket(u64);

#[derive(Debug)]
struct OpenTask {
    task: Task,
    comments: Vec<Comment>,
}

/// Holds at most one open task with its comment thread.
#[derive(Debug, Default)]
pub struct Overlay {
    epoch: u64,
    open: Option<OpenTask>,
}

impl Overlay {
    /// Creates a closed overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an open attempt: clears the current content and returns
    /// the ticket the eventual completion must present.
    ///
    /// Starting a new attempt supersedes any earlier in-flight one.
    pub fn begin_open(&mut self) -> OverlayTicket {
        self.epoch += 1;
        self.open = None;
        OverlayTicket(self.epoch)
    }

    /// Populates the overlay atomically, task and comments together.
    ///
    /// Returns `false` (overlay untouched) when the ticket has been
    /// superseded by a newer open or a close.
    pub fn complete_open(&mut self, ticket: OverlayTicket, task: Task, comments: Vec<Comment>) -> bool {
        if ticket.0 != self.epoch {
            return false;
        }
        self.open = Some(OpenTask { task, comments });
        true
    }

    /// Closes the overlay, superseding any in-flight open.
    pub fn close(&mut self) {
        self.epoch += 1;
        self.open = None;
    }

    /// Appends a comment, but only while the overlay is open for that
    /// exact task — a stale add after close/switch is dropped.
    pub fn append_comment(&mut self, task_id: &str, comment: Comment) -> bool {
        match &mut self.open {
            Some(open) if open.task.id == task_id => {
                open.comments.push(comment);
                true
            }
            _ => false,
        }
    }

    /// The open task, if any.
    #[must_use]
    pub fn open_task(&self) -> Option<&Task> {
        self.open.as_ref().map(|open| &open.task)
    }

    /// The open task's comment thread (empty when closed).
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        self.open.as_ref().map_or(&[], |open| open.comments.as_slice())
    }

    /// Whether a task is currently open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open.is_some()
    }
}
