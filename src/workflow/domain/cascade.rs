//! Cascade planning for repositioning a status inside its pipeline.

use super::{ProjectTaskStatus, StatusDomainError, StatusId, StatusOrder};

/// One order change produced by a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeShift {
    /// Status being pushed forward.
    pub status_id: StatusId,
    /// Order before the shift.
    pub from: StatusOrder,
    /// Order after the shift.
    pub to: StatusOrder,
}

/// Plans the shifts needed to move `moved` to `new_order`.
///
/// `candidates` are the project's live statuses at or after `new_order` in
/// ascending order. Starting at `new_order`, every status sitting on the
/// cursor is pushed one place forward and the cursor follows it; the walk
/// stops at the first candidate that is not on the cursor. Only the
/// contiguous run starting at `new_order` is shifted, so gaps and duplicates
/// already present further along are left as they are.
///
/// # Errors
///
/// Returns [`StatusDomainError::OrderOverflow`] when a shifted status would
/// move past `i8::MAX`.
pub fn plan_cascade<'a>(
    moved: StatusId,
    new_order: StatusOrder,
    candidates: impl IntoIterator<Item = &'a ProjectTaskStatus>,
) -> Result<Vec<CascadeShift>, StatusDomainError> {
    let mut shifts = Vec::new();
    let mut cursor = new_order;

    for status in candidates {
        if status.id() == moved {
            continue;
        }
        let Some(order) = status.order() else {
            continue;
        };
        if order < new_order {
            continue;
        }
        if order != cursor {
            break;
        }
        let next = cursor
            .successor()
            .ok_or(StatusDomainError::OrderOverflow(cursor.value()))?;
        shifts.push(CascadeShift {
            status_id: status.id(),
            from: order,
            to: next,
        });
        cursor = next;
    }

    Ok(shifts)
}
