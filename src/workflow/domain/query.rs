//! Catalog query types: filters, sort order, and pagination.

use super::{ProjectId, ProjectTaskStatus, StatusDomainError, StatusOrder};
use std::cmp::Ordering;

/// Comparison applied to a status's pipeline position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Order equals the value.
    Equal(StatusOrder),
    /// Order is strictly greater than the value.
    GreaterThan(StatusOrder),
    /// Order is greater than or equal to the value.
    AtLeast(StatusOrder),
    /// Order is strictly less than the value.
    LessThan(StatusOrder),
    /// Order is less than or equal to the value.
    AtMost(StatusOrder),
    /// Status is part of the ordered pipeline.
    Ordered,
    /// Status is kept out of the ordered pipeline.
    Unordered,
}

impl OrderFilter {
    /// Returns whether a status with `order` satisfies the comparison.
    ///
    /// Unordered statuses only satisfy [`OrderFilter::Unordered`].
    #[must_use]
    pub fn matches(self, order: Option<StatusOrder>) -> bool {
        match (self, order) {
            (Self::Unordered, found) => found.is_none(),
            (_, None) => false,
            (Self::Ordered, Some(_)) => true,
            (Self::Equal(value), Some(found)) => found == value,
            (Self::GreaterThan(value), Some(found)) => found > value,
            (Self::AtLeast(value), Some(found)) => found >= value,
            (Self::LessThan(value), Some(found)) => found < value,
            (Self::AtMost(value), Some(found)) => found <= value,
        }
    }
}

/// Project-scoped status filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    project_id: ProjectId,
    name_contains: Option<String>,
    is_default: Option<bool>,
    should_set_task_to_completed: Option<bool>,
    order: Option<OrderFilter>,
    include_deleted: bool,
}

impl StatusFilter {
    /// Matches every live status of a project.
    #[must_use]
    pub const fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id,
            name_contains: None,
            is_default: None,
            should_set_task_to_completed: None,
            order: None,
            include_deleted: false,
        }
    }

    /// Restricts to names containing `fragment`, ignoring case.
    #[must_use]
    pub fn with_name_containing(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Restricts to statuses with the given default flag.
    #[must_use]
    pub const fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }

    /// Restricts to statuses with the given completion flag.
    #[must_use]
    pub const fn with_completing(mut self, should_set_task_to_completed: bool) -> Self {
        self.should_set_task_to_completed = Some(should_set_task_to_completed);
        self
    }

    /// Restricts by pipeline position.
    #[must_use]
    pub const fn with_order(mut self, order: OrderFilter) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets whether soft-deleted statuses are included.
    #[must_use]
    pub const fn with_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    /// Returns the project scope.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the name fragment, if any.
    #[must_use]
    pub fn name_contains(&self) -> Option<&str> {
        self.name_contains.as_deref()
    }

    /// Returns the default-flag restriction, if any.
    #[must_use]
    pub const fn is_default(&self) -> Option<bool> {
        self.is_default
    }

    /// Returns the completion-flag restriction, if any.
    #[must_use]
    pub const fn should_set_task_to_completed(&self) -> Option<bool> {
        self.should_set_task_to_completed
    }

    /// Returns the order restriction, if any.
    #[must_use]
    pub const fn order(&self) -> Option<OrderFilter> {
        self.order
    }

    /// Returns whether soft-deleted statuses are included.
    #[must_use]
    pub const fn include_deleted(&self) -> bool {
        self.include_deleted
    }

    /// Returns whether `status` satisfies every restriction.
    #[must_use]
    pub fn matches(&self, status: &ProjectTaskStatus) -> bool {
        status.project_id() == self.project_id
            && (self.include_deleted || !status.is_deleted())
            && self.name_contains.as_deref().is_none_or(|fragment| {
                status
                    .name()
                    .as_str()
                    .to_lowercase()
                    .contains(&fragment.to_lowercase())
            })
            && self.is_default.is_none_or(|flag| status.is_default() == flag)
            && self
                .should_set_task_to_completed
                .is_none_or(|flag| status.should_set_task_to_completed() == flag)
            && self.order.is_none_or(|order| order.matches(status.order()))
    }
}

/// Column a status listing is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusSortField {
    /// Pipeline position; unordered statuses sort after ordered ones.
    #[default]
    Order,
    /// Display name.
    Name,
    /// Creation timestamp.
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Sort specification for status listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSort {
    /// Column to sort by.
    pub field: StatusSortField,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl StatusSort {
    /// Ascending pipeline order, the catalog's natural order.
    pub const BY_ORDER: Self = Self {
        field: StatusSortField::Order,
        direction: SortDirection::Ascending,
    };

    /// Creates a sort specification.
    #[must_use]
    pub const fn new(field: StatusSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two statuses under this sort.
    ///
    /// Ties fall back to creation time and then identifier so listings are
    /// stable across calls.
    #[must_use]
    pub fn compare(self, left: &ProjectTaskStatus, right: &ProjectTaskStatus) -> Ordering {
        let primary = match self.field {
            StatusSortField::Order => compare_nulls_last(left.order(), right.order()),
            StatusSortField::Name => left.name().as_str().cmp(right.name().as_str()),
            StatusSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
        };
        let directed = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        directed
            .then_with(|| left.created_at().cmp(&right.created_at()))
            .then_with(|| left.id().cmp(&right.id()))
    }
}

fn compare_nulls_last(left: Option<StatusOrder>, right: Option<StatusOrder>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    /// Page size used when the caller does not choose one.
    pub const DEFAULT_PER_PAGE: u32 = 20;

    /// Largest accepted page size.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Creates a validated page request.
    ///
    /// # Errors
    ///
    /// Returns [`StatusDomainError::InvalidPagination`] when `page` is zero or
    /// `per_page` is outside `1..=100`.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, StatusDomainError> {
        if page == 0 || per_page == 0 || per_page > Self::MAX_PER_PAGE {
            return Err(StatusDomainError::InvalidPagination { page, per_page });
        }
        Ok(Self { page, per_page })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn per_page(self) -> u32 {
        self.per_page
    }

    /// Returns the number of rows skipped before this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// A page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of matching items across all pages.
    pub total: u64,
    /// Request that produced this page.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Returns the number of pages needed to hold every match.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.pagination.per_page))
    }

    /// Returns whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.pagination.page) < self.total_pages()
    }
}
