//! Core types and pure logic for chat-points.
//!
//! This crate provides the foundational types used throughout the
//! chat-points system:
//!
//! - **Identifiers**: `UserId`, `ChannelId`, `VideoId`, `LiveChatId`
//! - **Records**: `UserRecord`, `SubscriptionStatus`
//! - **Events**: `ChatEvent`
//! - **Classification**: `classify`, `Classification`
//! - **Accrual**: `accrue`
//!
//! # Points
//!
//! Every non-moderator chat message earns its author points: a base amount,
//! an interaction bonus, and a membership-tier multiplier. Points are stored
//! as `i64` and only ever grow outside of administrative overrides.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accrual;
pub mod classify;
pub mod event;
pub mod ids;
pub mod record;

pub use accrual::accrue;
pub use classify::{classify, Classification};
pub use event::ChatEvent;
pub use ids::{ChannelId, IdError, LiveChatId, UserId, VideoId};
pub use record::{
    SubscriptionStatus, UserRecord, BASE_POINTS_PER_MESSAGE, INTERACTION_BONUS_POINTS,
    MEMBER_MONTH_DAYS, MEMBER_YEAR_DAYS,
};
