//! Typed entity ids
//!
//! Ids are opaque strings. Freshly created entities get a ULID; ids arriving
//! from callers (slugs, imported data) are accepted as-is via `from_string`.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh ULID-backed id
            pub fn new() -> Self {
                Self(Ulid::new().to_string().to_lowercase())
            }

            /// Wrap an existing id string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// The id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(
    /// Identifies a board (the top-level aggregate)
    BoardId
);
define_id!(
    /// Identifies a column within a board
    ColumnId
);
define_id!(
    /// Identifies a task within a column
    TaskId
);
define_id!(
    /// Identifies a person or agent performing operations
    ActorId
);
define_id!(
    /// Identifies an activity log entry
    ActivityEntryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_string_round_trip() {
        let id = ColumnId::from_string("todo");
        assert_eq!(id.as_str(), "todo");
        assert_eq!(id.to_string(), "todo");
    }

    #[test]
    fn test_serde_transparent() {
        let id = BoardId::from_string("b1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"b1\"");
        let back: BoardId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
