//! Position of a status inside its project's ordered pipeline.

use super::StatusDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed 8-bit pipeline position.
///
/// Statuses without an order are kept out of the pipeline entirely, so the
/// aggregate stores `Option<StatusOrder>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusOrder(i8);

impl StatusOrder {
    /// Position assigned to the first ordered status of a project.
    pub const FIRST: Self = Self(0);

    /// Creates an order from its raw value.
    #[must_use]
    pub const fn new(value: i8) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> i8 {
        self.0
    }

    /// Returns the immediately following position, if representable.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<i8> for StatusOrder {
    fn from(value: i8) -> Self {
        Self(value)
    }
}

impl TryFrom<i16> for StatusOrder {
    type Error = StatusDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        i8::try_from(value)
            .map(Self)
            .map_err(|_| StatusDomainError::OrderOutOfRange(i64::from(value)))
    }
}

impl From<StatusOrder> for i16 {
    fn from(order: StatusOrder) -> Self {
        Self::from(order.0)
    }
}

impl fmt::Display for StatusOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
