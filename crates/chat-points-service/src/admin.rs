//! Administrative overrides.
//!
//! Manual corrections applied by an operator, deliberately invoked as an
//! explicit command rather than as a startup side effect. Overrides bypass
//! the classifier and write membership metadata directly.

use chrono::{Duration, Utc};

use chat_points_core::{SubscriptionStatus, UserId, MEMBER_MONTH_DAYS};
use chat_points_store::Ledger;

use crate::ServiceError;

/// Parse the `<user_id> <months>` arguments of the `set-membership`
/// command.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidCommand`] when an argument is missing,
/// the user id is empty, or the month count is not a number.
pub fn parse_set_membership_args(args: &[String]) -> Result<(UserId, u32), ServiceError> {
    let usage = || ServiceError::InvalidCommand("usage: set-membership <user_id> <months>".into());

    let user_id: UserId = args.first().ok_or_else(usage)?.parse().map_err(|_| usage())?;
    let months: u32 = args.get(1).ok_or_else(usage)?.parse().map_err(|_| usage())?;

    Ok((user_id, months))
}

/// Manually set a user's membership duration.
///
/// Computes a membership start of `now - months * 30 days` and stores
/// `YearOrMore` when `months >= 12`, else `Subscribed`, overwriting any
/// prior membership metadata. Points are untouched.
///
/// # Errors
///
/// Returns an error if the ledger write fails.
pub fn set_membership(
    ledger: &dyn Ledger,
    user_id: &UserId,
    months: u32,
) -> Result<(), chat_points_store::StoreError> {
    let start = Utc::now() - Duration::days(i64::from(months) * MEMBER_MONTH_DAYS);
    let status = if months >= 12 {
        SubscriptionStatus::YearOrMore
    } else {
        SubscriptionStatus::Subscribed
    };

    ledger.force_membership(user_id, start, status)?;

    tracing::info!(
        user_id = %user_id,
        months,
        start = %start,
        status = ?status,
        "Membership duration set manually"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_points_store::RocksLedger;
    use tempfile::TempDir;

    fn create_test_ledger() -> (RocksLedger, TempDir) {
        let dir = TempDir::new().unwrap();
        let ledger = RocksLedger::open(dir.path()).unwrap();
        (ledger, dir)
    }

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn command_args_parse() {
        let (user_id, months) = parse_set_membership_args(&args(&["UCx", "14"])).unwrap();
        assert_eq!(user_id.to_string(), "UCx");
        assert_eq!(months, 14);
    }

    #[test]
    fn missing_or_malformed_args_are_rejected() {
        for bad in [
            args(&[]),
            args(&["UCx"]),
            args(&["UCx", "soon"]),
            args(&["", "3"]),
        ] {
            let result = parse_set_membership_args(&bad);
            assert!(matches!(result, Err(ServiceError::InvalidCommand(_))));
        }
    }

    #[test]
    fn nine_months_is_subscribed() {
        let (ledger, _dir) = create_test_ledger();
        let user_id = UserId::new("UCnine");

        set_membership(&ledger, &user_id, 9).unwrap();

        let record = ledger.get(&user_id).unwrap().unwrap();
        assert_eq!(record.subscription_status, SubscriptionStatus::Subscribed);
        let first_seen = record.first_seen_as_member.unwrap();
        let age = Utc::now() - first_seen;
        assert_eq!(age.num_days(), 9 * MEMBER_MONTH_DAYS);
    }

    #[test]
    fn twelve_months_is_year_or_more() {
        let (ledger, _dir) = create_test_ledger();
        let user_id = UserId::new("UCtwelve");

        set_membership(&ledger, &user_id, 12).unwrap();

        let record = ledger.get(&user_id).unwrap().unwrap();
        assert_eq!(record.subscription_status, SubscriptionStatus::YearOrMore);
    }

    #[test]
    fn override_replaces_prior_metadata() {
        let (ledger, _dir) = create_test_ledger();
        let user_id = UserId::new("UCprior");

        set_membership(&ledger, &user_id, 2).unwrap();
        set_membership(&ledger, &user_id, 24).unwrap();

        let record = ledger.get(&user_id).unwrap().unwrap();
        assert_eq!(record.subscription_status, SubscriptionStatus::YearOrMore);
        let age = Utc::now() - record.first_seen_as_member.unwrap();
        assert_eq!(age.num_days(), 24 * MEMBER_MONTH_DAYS);
    }
}
