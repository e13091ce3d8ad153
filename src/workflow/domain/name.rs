//! Validated status display name.

use super::StatusDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a status name, matching the `VARCHAR(100)` column.
const MAX_NAME_LENGTH: usize = 100;

/// Trimmed, non-empty status display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusName(String);

impl StatusName {
    /// Creates a validated status name.
    ///
    /// # Errors
    ///
    /// Returns [`StatusDomainError::EmptyStatusName`] when the value is empty
    /// after trimming, or [`StatusDomainError::StatusNameTooLong`] when it
    /// exceeds 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, StatusDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(StatusDomainError::EmptyStatusName);
        }

        if normalized.chars().count() > MAX_NAME_LENGTH {
            return Err(StatusDomainError::StatusNameTooLong {
                name: raw,
                max: MAX_NAME_LENGTH,
            });
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StatusName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StatusName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
