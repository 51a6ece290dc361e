//! Point accrual arithmetic.
//!
//! Pure integer arithmetic: a base amount, an optional interaction bonus,
//! and the membership-tier multiplier. No rounding is involved anywhere.

use crate::record::INTERACTION_BONUS_POINTS;
use crate::SubscriptionStatus;

/// Compute the points awarded for one chat event.
///
/// `(base_points + bonus) * multiplier`, where the bonus is
/// [`INTERACTION_BONUS_POINTS`] when `interacted` is true and the
/// multiplier comes from [`SubscriptionStatus::multiplier`].
#[must_use]
pub const fn accrue(base_points: i64, status: SubscriptionStatus, interacted: bool) -> i64 {
    let bonus = if interacted { INTERACTION_BONUS_POINTS } else { 0 };
    (base_points + bonus) * status.multiplier()
}
