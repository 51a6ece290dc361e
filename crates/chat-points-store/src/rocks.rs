//! `RocksDB` ledger implementation.
//!
//! This module provides the `RocksLedger` implementation of the `Ledger`
//! trait.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options};

use chat_points_core::{SubscriptionStatus, UserId, UserRecord};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Ledger;

/// RocksDB-backed ledger implementation.
///
/// Opened once at startup; the handle is shared for the process lifetime.
pub struct RocksLedger {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksLedger {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Write a record back to the users column family.
    fn put_record(&self, record: &UserRecord) -> Result<()> {
        let cf = self.cf(cf::USERS)?;
        let key = keys::user_key(&record.user_id);
        let value = Self::serialize(record)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

impl Ledger for RocksLedger {
    fn get(&self, user_id: &UserId) -> Result<Option<UserRecord>> {
        let cf = self.cf(cf::USERS)?;
        let key = keys::user_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn upsert_on_first_contact(
        &self,
        user_id: &UserId,
        status: SubscriptionStatus,
        first_seen_as_member: Option<DateTime<Utc>>,
    ) -> Result<UserRecord> {
        if let Some(existing) = self.get(user_id)? {
            return Ok(existing);
        }

        let record = UserRecord::new_on_first_contact(user_id.clone(), status, first_seen_as_member);
        self.put_record(&record)?;

        tracing::debug!(user_id = %user_id, status = ?status, "Created ledger record on first contact");
        Ok(record)
    }

    fn set_first_seen_as_member(&self, user_id: &UserId, timestamp: DateTime<Utc>) -> Result<()> {
        let mut record = self.get(user_id)?.ok_or_else(|| StoreError::NotFound {
            user_id: user_id.to_string(),
        })?;

        // One-time transition: a present value is never overwritten.
        if record.first_seen_as_member.is_some() {
            return Ok(());
        }

        record.first_seen_as_member = Some(timestamp);
        record.updated_at = Utc::now();
        self.put_record(&record)?;

        tracing::debug!(user_id = %user_id, first_seen = %timestamp, "Recorded first membership badge");
        Ok(())
    }

    fn add_points(&self, user_id: &UserId, delta: i64, status: SubscriptionStatus) -> Result<i64> {
        let mut record = self.get(user_id)?.ok_or_else(|| StoreError::NotFound {
            user_id: user_id.to_string(),
        })?;

        let now = Utc::now();
        record.points += delta;
        record.last_interaction = Some(now);
        record.subscription_status = status;
        record.updated_at = now;

        self.put_record(&record)?;
        Ok(record.points)
    }

    fn force_membership(
        &self,
        user_id: &UserId,
        start_timestamp: DateTime<Utc>,
        status: SubscriptionStatus,
    ) -> Result<()> {
        let mut record = self.get(user_id)?.unwrap_or_else(|| {
            UserRecord::new_on_first_contact(user_id.clone(), SubscriptionStatus::None, None)
        });

        record.first_seen_as_member = Some(start_timestamp);
        record.subscription_status = status;
        record.updated_at = Utc::now();

        self.put_record(&record)?;

        tracing::info!(
            user_id = %user_id,
            start = %start_timestamp,
            status = ?status,
            "Membership metadata overridden by operator"
        );
        Ok(())
    }
}
