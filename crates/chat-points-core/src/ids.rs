//! Identifier types for chat-points.
//!
//! This module provides strongly-typed identifiers for the opaque string IDs
//! handed out by the chat platform (users, channels, videos, chat sessions).
//!
//! # Macro-based ID Types
//!
//! The `platform_id_type!` macro reduces boilerplate for string-backed
//! identifier types, ensuring consistent implementation of serialization,
//! parsing, and display traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to define a string-backed identifier type with standard trait
/// implementations.
///
/// The platform treats these IDs as opaque tokens, so the newtype wraps a
/// `String` and only rejects empty input. The macro generates:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (as a bare string)
/// - `FromStr`, `Display`, `Debug`
/// - `AsRef<str>`, `AsRef<[u8]>`
macro_rules! platform_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from a raw platform string.
            ///
            /// The input is taken as-is; use `FromStr` when empty input must
            /// be rejected.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the raw bytes of the identifier (used for store keys).
            #[must_use]
            pub fn as_bytes(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(IdError::Empty);
                }
                Ok(Self(s.to_string()))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

platform_id_type!(
    UserId,
    "A chat participant identifier.\n\nAssigned by the chat platform (the author's channel ID) and used as the ledger's primary key."
);
platform_id_type!(
    ChannelId,
    "A channel identifier.\n\nThe canonical ID a channel handle resolves to."
);
platform_id_type!(
    VideoId,
    "A video/broadcast identifier.\n\nIdentifies one live broadcast on the platform."
);
platform_id_type!(
    LiveChatId,
    "A live chat session identifier.\n\nThe stable handle for one broadcast's chat feed, returned by the live session locator."
);

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input string is empty.
    #[error("identifier must not be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_roundtrip() {
        let id = UserId::new("UCabc123");
        let parsed = UserId::from_str(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn empty_id_rejected() {
        assert_eq!(UserId::from_str(""), Err(IdError::Empty));
    }

    #[test]
    fn user_id_serde_json() {
        let id = UserId::new("UCabc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"UCabc123\"");
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn display_is_raw_string() {
        let id = LiveChatId::new("chat-42");
        assert_eq!(id.to_string(), "chat-42");
        assert_eq!(format!("{id:?}"), "LiveChatId(chat-42)");
    }
}
