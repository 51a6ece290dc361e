//! Chat event types for chat-points.
//!
//! This module defines the single-message view the poller consumes. Events
//! are ephemeral: produced by the feed crate from one wire item, processed
//! once, then dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// One chat message plus author metadata from the live chat feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// The author's platform ID.
    pub user_id: UserId,

    /// The author's display name (for log output only).
    pub display_name: String,

    /// Whether the author is a chat moderator. Moderator messages are
    /// excluded from classification and accrual entirely.
    pub is_moderator: bool,

    /// Whether the author carried a membership badge on this message.
    pub is_member: bool,

    /// Platform-reported membership start. Best effort; may be absent even
    /// when `is_member` is true.
    pub member_since: Option<DateTime<Utc>>,

    /// The message text (for log output only).
    pub message_text: String,

    /// When the message was published (timezone-aware).
    pub published_at: DateTime<Utc>,
}
