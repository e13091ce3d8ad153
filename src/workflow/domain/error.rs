//! Error types for workflow domain validation and parsing.

use super::StatusId;
use thiserror::Error;

/// Errors returned while constructing or mutating workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusDomainError {
    /// The status name is empty after trimming.
    #[error("status name must not be empty")]
    EmptyStatusName,

    /// The status name exceeds the storage limit.
    #[error("status name exceeds {max} character limit: {name}")]
    StatusNameTooLong {
        /// Rejected name as supplied by the caller.
        name: String,
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The color is not a `#RRGGBB` hex triplet.
    #[error("invalid status color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    /// A status cannot be both the default and a completing status.
    #[error("a status cannot be both the default status and mark tasks as completed")]
    DefaultAndCompleting,

    /// Assigning the next order value would exceed the representable range.
    #[error("status order overflow: {0} has no successor")]
    OrderOverflow(i8),

    /// A stored order value does not fit the signed 8-bit order range.
    #[error("status order {0} is outside the range -128..=127")]
    OrderOutOfRange(i64),

    /// The status is already soft-deleted.
    #[error("status {0} is already deleted")]
    AlreadyDeleted(StatusId),

    /// A transition request named both an explicit target and advancing.
    #[error("transition request sets both an explicit status and advance")]
    ConflictingTransitionTarget,

    /// A transition request named neither an explicit target nor advancing.
    #[error("transition request needs an explicit status or advance")]
    MissingTransitionTarget,

    /// The page number or page size is outside the accepted range.
    #[error("invalid pagination: page {page}, page size {per_page}")]
    InvalidPagination {
        /// Requested one-based page number.
        page: u32,
        /// Requested page size.
        per_page: u32,
    },

    /// A public identifier string could not be parsed.
    #[error("invalid {kind} identifier '{value}'")]
    InvalidIdentity {
        /// Expected identifier prefix.
        kind: &'static str,
        /// Rejected input.
        value: String,
    },
}
