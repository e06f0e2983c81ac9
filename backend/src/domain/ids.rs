//! UUID-backed identifiers for users, tasks and comments.
//!
//! Each identifier is a distinct newtype so a task id cannot be passed where
//! a user id is expected.

use std::fmt;

use uuid::Uuid;

/// Error returned when an identifier string is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a valid UUID")]
pub struct InvalidId;

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its hyphenated UUID form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidId> {
                let raw = id.as_ref();
                if raw.trim() != raw {
                    return Err(InvalidId);
                }
                Uuid::parse_str(raw).map(Self).map_err(|_| InvalidId)
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_uuid_id! {
    /// Stable user identifier.
    UserId
}

define_uuid_id! {
    /// Stable task identifier.
    TaskId
}

define_uuid_id! {
    /// Stable comment identifier.
    CommentId
}
