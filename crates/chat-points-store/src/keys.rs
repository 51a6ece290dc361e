//! Key encoding utilities for `RocksDB`.
//!
//! Platform user IDs are opaque UTF-8 strings; keys are their raw bytes.

use chat_points_core::UserId;

/// Create a ledger key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}
