//! Task list filter.
//!
//! A pure value object describing the server-side constraint on the
//! task listing. Blank strings normalize to "no constraint" — the
//! fields are private so a filter can never hold an empty-string
//! constraint.

use crate::task::Priority;

/// Filter predicate for the task listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    assignee_id: Option<String>,
    priority: Option<Priority>,
}

impl TaskFilter {
    /// An unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a filter constrained to the given assignee.
    ///
    /// A blank or whitespace-only id leaves the filter unconstrained.
    #[must_use]
    pub fn with_assignee(mut self, id: impl Into<String>) -> Self {
        self.set_assignee(Some(id.into()));
        self
    }

    /// Returns a filter constrained to the given priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets or clears the assignee constraint, normalizing blank to unset.
    pub fn set_assignee(&mut self, id: Option<String>) {
        self.assignee_id = id.and_then(|id| {
            let trimmed = id.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
    }

    /// Sets or clears the priority constraint.
    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
    }

    /// Current assignee constraint, if any.
    #[must_use]
    pub fn assignee_id(&self) -> Option<&str> {
        self.assignee_id.as_deref()
    }

    /// Current priority constraint, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Whether the filter imposes no constraint at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assignee_id.is_none() && self.priority.is_none()
    }

    /// Query parameters for the listing request, one pair per active
    /// constraint.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.assignee_id {
            pairs.push(("assigneeId", id.clone()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        pairs
    }

    /// Whether a task matches this filter (client-side mirror of the
    /// server's constraint, used by in-process gateways).
    #[must_use]
    pub fn matches(&self, assignee_id: Option<&str>, priority: Priority) -> bool {
        if let Some(wanted) = &self.assignee_id {
            if assignee_id != Some(wanted.as_str()) {
                return false;
            }
        }
        if let Some(wanted) = self.priority {
            if priority != wanted {
                return false;
            }
        }
        true
    }
}
