//! Error types for the chat feed client.

/// Errors that can occur talking to the live chat feed.
///
/// `Http` and `Api` are the transient taxonomy: the poller recovers from
/// them locally with a fixed-delay retry. The locate variants are terminal
/// for the current locate attempt and surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The channel handle did not resolve to a channel.
    #[error("channel not found: {handle}")]
    ChannelNotFound {
        /// The handle or channel ID that was looked up.
        handle: String,
    },

    /// No currently-live broadcast matched the keyword.
    #[error("no live broadcast matching {keyword:?} on channel {channel}")]
    NotLive {
        /// The channel that was searched.
        channel: String,
        /// The title keyword that was required.
        keyword: String,
    },

    /// The live broadcast has no active chat session.
    #[error("no active live chat for video {video}")]
    ChatUnavailable {
        /// The video whose chat was requested.
        video: String,
    },

    /// A single wire item could not be converted to a chat event.
    ///
    /// Per-event, not per-page: the poller logs and skips the event.
    #[error("malformed chat item: {reason}")]
    MalformedEvent {
        /// What was missing or unparseable.
        reason: String,
    },
}
