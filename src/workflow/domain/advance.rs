//! The advance rule: move to the next stage, or wrap to the first.

use super::{ProjectTaskStatus, StatusOrder};

/// Destination chosen by [`resolve_advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance<'a> {
    /// The status immediately after the current one.
    Next(&'a ProjectTaskStatus),
    /// The first status of the pipeline, reached because nothing follows.
    Wrapped(&'a ProjectTaskStatus),
}

impl<'a> Advance<'a> {
    /// Returns the destination status.
    #[must_use]
    pub const fn status(self) -> &'a ProjectTaskStatus {
        match self {
            Self::Next(status) | Self::Wrapped(status) => status,
        }
    }

    /// Returns whether the pipeline wrapped around.
    #[must_use]
    pub const fn wrapped(self) -> bool {
        matches!(self, Self::Wrapped(_))
    }
}

/// Resolves where a task at `current` moves when advanced.
///
/// The destination is the live status whose order is `current + 1`. When no
/// such status exists (the task is on the last stage, the chain has a gap,
/// or the current status is unordered) the task wraps to the live status
/// with the lowest order. Deleted and unordered entries of `pipeline` are
/// ignored. Returns `None` only when the pipeline has no live ordered status.
#[must_use]
pub fn resolve_advance(
    current: Option<StatusOrder>,
    pipeline: &[ProjectTaskStatus],
) -> Option<Advance<'_>> {
    let live = pipeline
        .iter()
        .filter(|status| !status.is_deleted() && status.is_ordered());

    let wanted = current.and_then(StatusOrder::successor);
    if let Some(next) = wanted.and_then(|order| live.clone().find(|s| s.order() == Some(order))) {
        return Some(Advance::Next(next));
    }

    live.min_by_key(|status| status.order()).map(Advance::Wrapped)
}
