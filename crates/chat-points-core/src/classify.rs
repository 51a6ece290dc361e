//! Membership classification.
//!
//! A pure function of the stored record (if any), one chat event, and the
//! current time. It derives the membership tier and the first-seen-as-member
//! timestamp the ledger should carry after processing the event.

use chrono::{DateTime, Duration, Utc};

use crate::record::MEMBER_YEAR_DAYS;
use crate::{ChatEvent, SubscriptionStatus, UserRecord};

/// The classifier's output for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Derived membership tier.
    pub status: SubscriptionStatus,

    /// First-seen-as-member timestamp after this event. Equal to the stored
    /// value unless this event is the first badge observation.
    pub first_seen_as_member: Option<DateTime<Utc>>,
}

impl Classification {
    /// Whether this classification observed a membership badge for the
    /// first time (absent → present transition the ledger must persist).
    #[must_use]
    pub fn first_badge_observed(&self, existing: Option<&UserRecord>) -> bool {
        self.first_seen_as_member.is_some()
            && existing.map_or(true, |r| r.first_seen_as_member.is_none())
    }
}

/// Classify a chat event against the stored record.
///
/// Rules:
/// - Unknown user with a badge: `Subscribed`, first-seen = `published_at`.
/// - Unknown user without a badge: `None`, first-seen absent.
/// - Known user, first-seen absent, badge present: first-seen =
///   `published_at` (one-time transition), tier evaluated from that instant.
/// - Known user, first-seen present, badge present: `YearOrMore` once
///   `now - first_seen >= 365 days` (boundary inclusive), else `Subscribed`.
/// - Badge absent on a known user: the stored tier is kept as-is. A lapsed
///   member retains the last computed tier until a badge-bearing message
///   re-evaluates it.
///
/// Moderator events never reach this function; the poller filters them.
#[must_use]
pub fn classify(
    existing: Option<&UserRecord>,
    event: &ChatEvent,
    now: DateTime<Utc>,
) -> Classification {
    let Some(record) = existing else {
        return if event.is_member {
            Classification {
                status: SubscriptionStatus::Subscribed,
                first_seen_as_member: Some(event.published_at),
            }
        } else {
            Classification {
                status: SubscriptionStatus::None,
                first_seen_as_member: None,
            }
        };
    };

    let first_seen = match record.first_seen_as_member {
        None if event.is_member => Some(event.published_at),
        other => other,
    };

    let status = match first_seen {
        // Tier is only re-evaluated while the badge is currently shown.
        Some(first) if event.is_member => {
            if now - first >= Duration::days(MEMBER_YEAR_DAYS) {
                SubscriptionStatus::YearOrMore
            } else {
                SubscriptionStatus::Subscribed
            }
        }
        _ => record.subscription_status,
    };

    Classification {
        status,
        first_seen_as_member: first_seen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;
    use chrono::TimeZone;

    fn event(is_member: bool, published_at: DateTime<Utc>) -> ChatEvent {
        ChatEvent {
            user_id: UserId::new("UCviewer"),
            display_name: "viewer".into(),
            is_moderator: false,
            is_member,
            member_since: None,
            message_text: "hello".into(),
            published_at,
        }
    }

    fn record(
        status: SubscriptionStatus,
        first_seen: Option<DateTime<Utc>>,
    ) -> UserRecord {
        let mut r = UserRecord::new_on_first_contact(UserId::new("UCviewer"), status, first_seen);
        r.points = 100;
        r
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn unknown_member_starts_subscribed() {
        let now = t0();
        let c = classify(None, &event(true, now), now);
        assert_eq!(c.status, SubscriptionStatus::Subscribed);
        assert_eq!(c.first_seen_as_member, Some(now));
        assert!(c.first_badge_observed(None));
    }

    #[test]
    fn unknown_non_member_starts_none() {
        let now = t0();
        let c = classify(None, &event(false, now), now);
        assert_eq!(c.status, SubscriptionStatus::None);
        assert_eq!(c.first_seen_as_member, None);
        assert!(!c.first_badge_observed(None));
    }

    #[test]
    fn first_badge_on_existing_record_sets_first_seen() {
        let now = t0();
        let rec = record(SubscriptionStatus::None, None);
        let c = classify(Some(&rec), &event(true, now), now);
        assert_eq!(c.status, SubscriptionStatus::Subscribed);
        assert_eq!(c.first_seen_as_member, Some(now));
        assert!(c.first_badge_observed(Some(&rec)));
    }

    #[test]
    fn first_seen_is_never_moved_by_later_badges() {
        let first = t0();
        let later = first + Duration::days(30);
        let rec = record(SubscriptionStatus::Subscribed, Some(first));
        let c = classify(Some(&rec), &event(true, later), later);
        assert_eq!(c.first_seen_as_member, Some(first));
        assert!(!c.first_badge_observed(Some(&rec)));
    }

    #[test]
    fn year_boundary_is_inclusive() {
        let first = t0();
        let rec = record(SubscriptionStatus::Subscribed, Some(first));

        // One second short of a year: still subscribed.
        let almost = first + Duration::days(365) - Duration::seconds(1);
        let c = classify(Some(&rec), &event(true, almost), almost);
        assert_eq!(c.status, SubscriptionStatus::Subscribed);

        // Exactly 365 days: year-or-more.
        let exact = first + Duration::days(365);
        let c = classify(Some(&rec), &event(true, exact), exact);
        assert_eq!(c.status, SubscriptionStatus::YearOrMore);
    }

    #[test]
    fn beyond_a_year_is_year_or_more() {
        let first = t0();
        let now = first + Duration::days(366);
        let rec = record(SubscriptionStatus::Subscribed, Some(first));
        let c = classify(Some(&rec), &event(true, now), now);
        assert_eq!(c.status, SubscriptionStatus::YearOrMore);
    }

    #[test]
    fn lapsed_member_keeps_last_tier() {
        let first = t0();
        let now = first + Duration::days(400);
        let rec = record(SubscriptionStatus::YearOrMore, Some(first));
        let c = classify(Some(&rec), &event(false, now), now);
        assert_eq!(c.status, SubscriptionStatus::YearOrMore);
        assert_eq!(c.first_seen_as_member, Some(first));
    }

    #[test]
    fn never_member_stays_none_without_badge() {
        let now = t0();
        let rec = record(SubscriptionStatus::None, None);
        let c = classify(Some(&rec), &event(false, now), now);
        assert_eq!(c.status, SubscriptionStatus::None);
        assert_eq!(c.first_seen_as_member, None);
    }
}
