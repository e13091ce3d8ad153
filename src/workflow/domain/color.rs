//! Validated status display color.

use super::StatusDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex color in `#RRGGBB` form, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusColor(String);

impl StatusColor {
    /// Creates a validated color.
    ///
    /// # Errors
    ///
    /// Returns [`StatusDomainError::InvalidColor`] unless the trimmed value
    /// is `#` followed by exactly six hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, StatusDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let is_valid = normalized
            .strip_prefix('#')
            .is_some_and(|digits| digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()));

        if !is_valid {
            return Err(StatusDomainError::InvalidColor(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the color as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StatusColor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
