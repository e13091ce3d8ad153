//! Identifier types for the workflow domain.
//!
//! Every identifier wraps a UUID (the canonical form used for storage and
//! equality) and also has a public form, `<prefix>_<32 hex digits>`, for
//! callers that expose identifiers to people.

use super::StatusDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! workflow_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Prefix used by the public identifier form.
            pub const PREFIX: &'static str = $prefix;

            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }

            /// Returns the public form of the identifier.
            #[must_use]
            pub fn public_id(self) -> String {
                format!("{}_{}", Self::PREFIX, self.0.simple())
            }

            /// Parses the public form produced by [`Self::public_id`].
            ///
            /// # Errors
            ///
            /// Returns [`StatusDomainError::InvalidIdentity`] when the prefix
            /// does not match or the encoded value is not 32 hex digits.
            pub fn parse_public(value: &str) -> Result<Self, StatusDomainError> {
                parse_public_uuid(Self::PREFIX, value).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

workflow_id!(
    /// Unique identifier for a project that owns a status catalog.
    ProjectId,
    "prj"
);

workflow_id!(
    /// Unique identifier for the organization a project belongs to.
    OrganizationId,
    "org"
);

workflow_id!(
    /// Unique identifier for a project task status.
    StatusId,
    "pts"
);

workflow_id!(
    /// Unique identifier for a task.
    TaskId,
    "tsk"
);

workflow_id!(
    /// Unique identifier for the user acting on a task.
    UserId,
    "usr"
);

fn parse_public_uuid(prefix: &'static str, value: &str) -> Result<Uuid, StatusDomainError> {
    let invalid = || StatusDomainError::InvalidIdentity {
        kind: prefix,
        value: value.to_owned(),
    };
    let encoded = value
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or_else(invalid)?;
    let is_simple_hex = encoded.len() == 32 && encoded.chars().all(|c| c.is_ascii_hexdigit());
    if !is_simple_hex {
        return Err(invalid());
    }
    Uuid::try_parse(encoded).map_err(|_| invalid())
}
