//! User record types for chat-points.
//!
//! This module defines the per-user ledger record and the membership tier
//! enumeration that drives the point multiplier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

// ============================================================================
// Constants
// ============================================================================

/// Base points awarded for one chat message.
pub const BASE_POINTS_PER_MESSAGE: i64 = 10;

/// Bonus points added when the message counts as an interaction.
pub const INTERACTION_BONUS_POINTS: i64 = 5;

/// Days of membership tenure required for the year-or-more tier.
pub const MEMBER_YEAR_DAYS: i64 = 365;

/// Days counted per month by the administrative membership override.
pub const MEMBER_MONTH_DAYS: i64 = 30;

/// A ledger record for one chat participant.
///
/// The record tracks the running point total, the most recent interaction,
/// and the membership metadata the classifier derives tiers from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// The participant's platform ID (ledger primary key).
    pub user_id: UserId,

    /// Cumulative points. Non-negative, and monotonically non-decreasing
    /// outside of administrative overrides.
    pub points: i64,

    /// Timestamp of the most recent point-earning event.
    pub last_interaction: Option<DateTime<Utc>>,

    /// Cached membership tier, consistent with `first_seen_as_member` and
    /// the clock at the moment it was last written.
    pub subscription_status: SubscriptionStatus,

    /// When a membership badge was first observed for this user. Set once;
    /// only the administrative override may overwrite it.
    pub first_seen_as_member: Option<DateTime<Utc>>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a record for a user's first observed chat message.
    ///
    /// Points start at zero; the first message's own award is applied as a
    /// separate ledger mutation.
    #[must_use]
    pub fn new_on_first_contact(
        user_id: UserId,
        status: SubscriptionStatus,
        first_seen_as_member: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            points: 0,
            last_interaction: None,
            subscription_status: status,
            first_seen_as_member,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Membership tier derived from badge observations and tenure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Never observed with a membership badge.
    None,

    /// Member for less than a year.
    Subscribed,

    /// Member for a year or more.
    YearOrMore,
}

impl SubscriptionStatus {
    /// Point multiplier applied by the accrual engine for this tier.
    #[must_use]
    pub const fn multiplier(self) -> i64 {
        match self {
            Self::None => 1,
            Self::Subscribed => 2,
            Self::YearOrMore => 3,
        }
    }
}
