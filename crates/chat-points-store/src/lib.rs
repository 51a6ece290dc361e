//! `RocksDB` point ledger for chat-points.
//!
//! This crate provides persistent storage for per-user point totals and
//! membership metadata using `RocksDB`.
//!
//! # Architecture
//!
//! A single column family holds the ledger:
//!
//! - `users`: `UserRecord` values encoded as CBOR, keyed by `user_id`
//!
//! The poller is the single writer; every mutation is an atomic
//! read-modify-write of one record, which keeps the ledger safe for a
//! future multi-worker extension without cross-record transactions.
//!
//! # Example
//!
//! ```no_run
//! use chat_points_store::{Ledger, RocksLedger};
//! use chat_points_core::{SubscriptionStatus, UserId};
//!
//! let ledger = RocksLedger::open("/tmp/chat-points-db").unwrap();
//!
//! let user_id = UserId::new("UCviewer");
//! ledger
//!     .upsert_on_first_contact(&user_id, SubscriptionStatus::None, None)
//!     .unwrap();
//! let total = ledger.add_points(&user_id, 15, SubscriptionStatus::None).unwrap();
//! assert_eq!(total, 15);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksLedger;

use chrono::{DateTime, Utc};

use chat_points_core::{SubscriptionStatus, UserId, UserRecord};

/// The ledger trait defining all point-store operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Ledger: Send + Sync {
    /// Get a user's record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get(&self, user_id: &UserId) -> Result<Option<UserRecord>>;

    /// Create a record on first observed contact, if absent.
    ///
    /// Idempotent: an existing record is returned untouched. A new record
    /// starts at zero points with the given status and first-seen value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_on_first_contact(
        &self,
        user_id: &UserId,
        status: SubscriptionStatus,
        first_seen_as_member: Option<DateTime<Utc>>,
    ) -> Result<UserRecord>;

    /// Record the first observed membership badge timestamp.
    ///
    /// Only ever transitions absent → present; a present value is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record doesn't exist.
    fn set_first_seen_as_member(&self, user_id: &UserId, timestamp: DateTime<Utc>) -> Result<()>;

    /// Award points atomically.
    ///
    /// Read-modify-write of one record: adds `delta` to the point total,
    /// refreshes `last_interaction`, and stores the freshly classified
    /// `status` so the cached tier stays consistent with the write.
    ///
    /// Returns the new point total.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record doesn't exist.
    fn add_points(&self, user_id: &UserId, delta: i64, status: SubscriptionStatus) -> Result<i64>;

    /// Administrative override of membership metadata.
    ///
    /// Unconditionally overwrites `first_seen_as_member` and
    /// `subscription_status` regardless of prior state, creating the record
    /// if absent. Bypasses the classifier; intended for manual corrections
    /// by an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn force_membership(
        &self,
        user_id: &UserId,
        start_timestamp: DateTime<Utc>,
        status: SubscriptionStatus,
    ) -> Result<()>;
}
