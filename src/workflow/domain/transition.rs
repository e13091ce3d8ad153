//! Transition target selection.

use super::{StatusDomainError, StatusId};

/// Where a status transition should take a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTarget {
    /// Move to a specific status of the task's project.
    Explicit(StatusId),
    /// Move to the next ordered status, wrapping to the first.
    Advance,
}

impl TransitionTarget {
    /// Builds a target from the loosely typed request form.
    ///
    /// # Errors
    ///
    /// Returns [`StatusDomainError::ConflictingTransitionTarget`] when both an
    /// explicit status and `advance` are given, and
    /// [`StatusDomainError::MissingTransitionTarget`] when neither is.
    pub const fn from_parts(
        explicit: Option<StatusId>,
        advance: bool,
    ) -> Result<Self, StatusDomainError> {
        match (explicit, advance) {
            (Some(_), true) => Err(StatusDomainError::ConflictingTransitionTarget),
            (Some(status_id), false) => Ok(Self::Explicit(status_id)),
            (None, true) => Ok(Self::Advance),
            (None, false) => Err(StatusDomainError::MissingTransitionTarget),
        }
    }
}
