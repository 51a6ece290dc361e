//! Live session locator and chat feed client for chat-points.
//!
//! This crate talks to the video platform's Data API:
//!
//! - **Locating**: resolve a channel handle, find the live broadcast whose
//!   title matches a keyword, confirm it is live, and fetch the chat-session
//!   handle (`locate_live_session` composes all four steps).
//! - **Paginating**: fetch one page of chat messages at a time, carrying an
//!   opaque page token between calls.
//!
//! Authentication is a bearer token supplied by the credential provider;
//! token acquisition and refresh happen outside this crate.
//!
//! Wire items convert to [`chat_points_core::ChatEvent`] one at a time via
//! [`ChatItem::into_event`], so a malformed message fails that single event
//! rather than the whole page.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod types;

pub use client::LiveFeedClient;
pub use error::FeedError;
pub use types::{ChatItem, ChatPage};

use async_trait::async_trait;

use chat_points_core::LiveChatId;

/// The chat feed seam the poller consumes.
///
/// Implemented by [`LiveFeedClient`] against the real API and by scripted
/// fakes in tests.
#[async_trait]
pub trait ChatFeed: Send + Sync {
    /// Fetch the next page of chat messages.
    ///
    /// `cursor` is the opaque page token returned with the previous page,
    /// or `None` for the first call.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or API failure.
    async fn fetch_chat_page(
        &self,
        live_chat_id: &LiveChatId,
        cursor: Option<&str>,
    ) -> Result<ChatPage, FeedError>;
}
