//! Wire types for the platform Data API.
//!
//! Response shapes mirror the platform's JSON (camelCase fields, `items`
//! arrays). Only the fields the system reads are modeled; everything else
//! is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use chat_points_core::{ChatEvent, UserId};

use crate::error::FeedError;

// ----------------------------------------------------------------------------
// Channel resolution
// ----------------------------------------------------------------------------

/// Response to a channel lookup.
#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    /// Matching channels (zero or one for an exact lookup).
    #[serde(default)]
    pub items: Vec<ChannelResource>,
}

/// One channel resource.
#[derive(Debug, Deserialize)]
pub struct ChannelResource {
    /// The canonical channel ID.
    pub id: String,
}

// ----------------------------------------------------------------------------
// Live broadcast search
// ----------------------------------------------------------------------------

/// Response to a live-event search.
#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    /// Matching broadcasts.
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

/// One search result.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// The result's video reference.
    pub id: SearchResultId,
    /// Title and channel metadata.
    pub snippet: SearchSnippet,
}

/// Video reference inside a search result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    /// The video ID.
    pub video_id: String,
}

/// Search result snippet.
#[derive(Debug, Deserialize)]
pub struct SearchSnippet {
    /// The broadcast title (keyword-matched by the locator).
    pub title: String,
}

// ----------------------------------------------------------------------------
// Video liveness and chat session
// ----------------------------------------------------------------------------

/// Response to a video lookup.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    /// Matching videos (zero or one).
    #[serde(default)]
    pub items: Vec<VideoResource>,
}

/// One video resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    /// Basic video metadata.
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    /// Live-streaming metadata, present for broadcasts.
    #[serde(default)]
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

/// Video snippet fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    /// `"live"`, `"upcoming"`, or `"none"`.
    #[serde(default)]
    pub live_broadcast_content: String,
}

/// Live-streaming metadata for a broadcast.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    /// When the broadcast actually started.
    #[serde(default)]
    pub actual_start_time: Option<String>,
    /// When the broadcast ended, if it has.
    #[serde(default)]
    pub actual_end_time: Option<String>,
    /// The active chat-session handle.
    #[serde(default)]
    pub active_live_chat_id: Option<String>,
}

impl VideoResource {
    /// Whether this broadcast is live right now: flagged live, started,
    /// and not yet ended.
    #[must_use]
    pub fn is_live_now(&self) -> bool {
        let flagged_live = self
            .snippet
            .as_ref()
            .is_some_and(|s| s.live_broadcast_content == "live");

        let running = self.live_streaming_details.as_ref().is_some_and(|d| {
            d.actual_start_time.is_some() && d.actual_end_time.is_none()
        });

        flagged_live && running
    }
}

// ----------------------------------------------------------------------------
// Chat pages
// ----------------------------------------------------------------------------

/// One page of chat messages plus the cursor for the next page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPage {
    /// Raw wire items, in arrival order.
    #[serde(default)]
    pub items: Vec<ChatItem>,

    /// Opaque token for the next page. Absence signals end-of-stream, but
    /// polling continues on the same session.
    #[serde(default, rename = "nextPageToken")]
    pub next_cursor: Option<String>,
}

/// One raw chat message as the platform sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatItem {
    /// Message body fields.
    #[serde(default)]
    pub snippet: Option<ChatSnippet>,
    /// Author metadata.
    #[serde(default)]
    pub author_details: Option<AuthorDetails>,
}

/// Message body fields of a chat item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnippet {
    /// The rendered message text.
    #[serde(default)]
    pub display_message: Option<String>,
    /// Publish instant, RFC 3339.
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Author metadata of a chat item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetails {
    /// The author's channel ID (the ledger's user ID).
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Whether the author moderates this chat.
    #[serde(default)]
    pub is_chat_moderator: bool,
    /// Whether the author carries a paid membership badge.
    #[serde(default)]
    pub is_chat_sponsor: bool,
    /// Platform-reported membership start, when the platform exposes it.
    #[serde(default)]
    pub member_since: Option<String>,
}

impl ChatItem {
    /// Convert this wire item into a domain [`ChatEvent`].
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::MalformedEvent`] when a required field (author
    /// channel ID, publish timestamp) is missing or unparseable. The
    /// best-effort `memberSince` field is dropped silently when malformed.
    pub fn into_event(self) -> Result<ChatEvent, FeedError> {
        let author = self.author_details.ok_or_else(|| FeedError::MalformedEvent {
            reason: "missing authorDetails".into(),
        })?;

        let user_id = match author.channel_id.as_deref() {
            Some(id) if !id.is_empty() => UserId::new(id),
            _ => {
                return Err(FeedError::MalformedEvent {
                    reason: "missing author channelId".into(),
                })
            }
        };

        let snippet = self.snippet.unwrap_or(ChatSnippet {
            display_message: None,
            published_at: None,
        });

        let published_raw = snippet.published_at.ok_or_else(|| FeedError::MalformedEvent {
            reason: "missing publishedAt".into(),
        })?;
        let published_at = parse_instant(&published_raw).ok_or_else(|| {
            FeedError::MalformedEvent {
                reason: format!("unparseable publishedAt: {published_raw}"),
            }
        })?;

        // Best effort; the classifier derives tenure from first observation
        // anyway.
        let member_since = author.member_since.as_deref().and_then(parse_instant);

        Ok(ChatEvent {
            user_id,
            display_name: author.display_name.unwrap_or_default(),
            is_moderator: author.is_chat_moderator,
            is_member: author.is_chat_sponsor,
            member_since,
            message_text: snippet.display_message.unwrap_or_default(),
            published_at,
        })
    }
}

/// Parse an RFC 3339 instant into UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
