//! Domain model for project status catalogs and task status transitions.
//!
//! A project's statuses form an ordered, mutable pipeline. The domain owns
//! the validated status attributes, the cascade that keeps orders packed when
//! a status is repositioned, and the advance rule that moves a task to the
//! next stage or wraps it back to the first. Storage and transactions stay
//! outside the domain boundary.

mod advance;
mod cascade;
mod color;
mod error;
mod ids;
mod name;
mod order;
mod query;
mod status;
mod task;
mod transition;

pub use advance::{Advance, resolve_advance};
pub use cascade::{CascadeShift, plan_cascade};
pub use color::StatusColor;
pub use error::StatusDomainError;
pub use ids::{OrganizationId, ProjectId, StatusId, TaskId, UserId};
pub use name::StatusName;
pub use order::StatusOrder;
pub use query::{
    OrderFilter, Page, Pagination, SortDirection, StatusFilter, StatusSort, StatusSortField,
};
pub use status::{NewStatusData, PersistedStatusData, ProjectTaskStatus, StatusChanges};
pub use task::{PersistedTaskData, Task};
pub use transition::TransitionTarget;
