//! Data API client implementation.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use async_trait::async_trait;

use chat_points_core::{ChannelId, LiveChatId, VideoId};

use crate::error::FeedError;
use crate::types::{ChannelListResponse, ChatPage, SearchListResponse, VideoListResponse};
use crate::ChatFeed;

/// Messages requested per chat page.
const CHAT_PAGE_MAX_RESULTS: u32 = 200;

/// Error envelope the platform returns on failed requests.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

/// Error body inside the envelope.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Data API client for the live session locator and chat feed.
#[derive(Debug, Clone)]
pub struct LiveFeedClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl LiveFeedClient {
    /// Create a new feed client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Data API URL (e.g., `"https://api.example.com/v3"`)
    /// * `api_token` - Bearer token from the credential provider
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    /// Resolve a channel handle (or raw channel ID) to the canonical
    /// channel ID.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or API failure.
    pub async fn resolve_channel(&self, handle: &str) -> Result<Option<ChannelId>, FeedError> {
        let url = format!("{}/channels", self.base_url);

        let mut query = vec![("part", "id")];
        if handle.starts_with('@') {
            query.push(("forUsername", handle));
        } else {
            query.push(("id", handle));
        }

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .query(&query)
            .send()
            .await?;

        let body: ChannelListResponse = self.handle_response(response).await?;
        Ok(body.items.into_iter().next().map(|c| ChannelId::new(c.id)))
    }

    /// Find the currently-live broadcast whose title contains `keyword`
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or API failure.
    pub async fn find_live_broadcast(
        &self,
        channel_id: &ChannelId,
        keyword: &str,
    ) -> Result<Option<VideoId>, FeedError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .query(&[
                ("part", "snippet"),
                ("channelId", channel_id.as_str()),
                ("eventType", "live"),
                ("type", "video"),
            ])
            .send()
            .await?;

        let body: SearchListResponse = self.handle_response(response).await?;
        let needle = keyword.to_lowercase();
        Ok(body
            .items
            .into_iter()
            .find(|item| item.snippet.title.to_lowercase().contains(&needle))
            .map(|item| VideoId::new(item.id.video_id)))
    }

    /// Check whether a broadcast is live right now (started, not ended).
    ///
    /// # Errors
    ///
    /// Returns an error on transport or API failure.
    pub async fn is_broadcast_live(&self, video_id: &VideoId) -> Result<bool, FeedError> {
        let url = format!("{}/videos", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .query(&[
                ("part", "snippet,liveStreamingDetails"),
                ("id", video_id.as_str()),
            ])
            .send()
            .await?;

        let body: VideoListResponse = self.handle_response(response).await?;
        Ok(body.items.first().is_some_and(crate::types::VideoResource::is_live_now))
    }

    /// Fetch the active chat-session handle for a broadcast.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or API failure.
    pub async fn live_chat_session(
        &self,
        video_id: &VideoId,
    ) -> Result<Option<LiveChatId>, FeedError> {
        let url = format!("{}/videos", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .query(&[("part", "liveStreamingDetails"), ("id", video_id.as_str())])
            .send()
            .await?;

        let body: VideoListResponse = self.handle_response(response).await?;
        Ok(body
            .items
            .into_iter()
            .next()
            .and_then(|v| v.live_streaming_details)
            .and_then(|d| d.active_live_chat_id)
            .map(LiveChatId::new))
    }

    /// Locate the active chat session for a channel: resolve the handle,
    /// find the keyword-matching live broadcast, confirm liveness, and
    /// return the chat-session handle.
    ///
    /// # Errors
    ///
    /// Terminal locate errors (`ChannelNotFound`, `NotLive`,
    /// `ChatUnavailable`) surface to the caller; retry cadence belongs to
    /// the host, not this client.
    pub async fn locate_live_session(
        &self,
        handle: &str,
        keyword: &str,
    ) -> Result<LiveChatId, FeedError> {
        let channel_id = self
            .resolve_channel(handle)
            .await?
            .ok_or_else(|| FeedError::ChannelNotFound {
                handle: handle.to_string(),
            })?;
        tracing::debug!(channel = %channel_id, "Resolved channel handle");

        let not_live = || FeedError::NotLive {
            channel: channel_id.to_string(),
            keyword: keyword.to_string(),
        };

        let video_id = self
            .find_live_broadcast(&channel_id, keyword)
            .await?
            .ok_or_else(not_live)?;

        if !self.is_broadcast_live(&video_id).await? {
            return Err(not_live());
        }

        let live_chat_id = self
            .live_chat_session(&video_id)
            .await?
            .ok_or_else(|| FeedError::ChatUnavailable {
                video: video_id.to_string(),
            })?;

        tracing::info!(video = %video_id, live_chat = %live_chat_id, "Located live chat session");
        Ok(live_chat_id)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FeedError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse the platform's error envelope
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => Err(FeedError::Api {
                status: if api_error.error.code == 0 {
                    status.as_u16()
                } else {
                    api_error.error.code
                },
                message: api_error.error.message,
            }),
            Err(_) => Err(FeedError::Api {
                status: status.as_u16(),
                message: format!("HTTP {status}"),
            }),
        }
    }
}

#[async_trait]
impl ChatFeed for LiveFeedClient {
    async fn fetch_chat_page(
        &self,
        live_chat_id: &LiveChatId,
        cursor: Option<&str>,
    ) -> Result<ChatPage, FeedError> {
        let url = format!("{}/liveChat/messages", self.base_url);
        let max_results = CHAT_PAGE_MAX_RESULTS.to_string();

        let mut query = vec![
            ("liveChatId", live_chat_id.as_str()),
            ("part", "snippet,authorDetails"),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = cursor {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .query(&query)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
