//! The chat ingestion loop.
//!
//! The poller drives the whole pipeline: it pulls one page of chat messages
//! at a time, feeds each message through classification and accrual, writes
//! the ledger, advances the pagination cursor, and sleeps between cycles.
//!
//! # States
//!
//! Locating happens before the loop starts (the host resolves the live
//! chat session and hands it to [`Poller::run`]). Inside the loop the
//! poller alternates between streaming and backoff:
//!
//! - **streaming**: fetch a page, process events in arrival order, advance
//!   the cursor, sleep the poll interval. Empty pages leave the cursor
//!   untouched; only a page that carried messages moves it.
//! - **backoff**: a fetch failed; log it, sleep the backoff interval, and
//!   retry the same page with the cursor unchanged. Unlimited retries, no
//!   exponential growth.
//!
//! The loop never terminates on its own. The host stops it through the
//! shutdown channel, observed at every suspension point (both sleeps and
//! the fetch itself), so the loop exits cleanly between cycles.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use chat_points_core::{accrue, classify, ChatEvent, LiveChatId, BASE_POINTS_PER_MESSAGE};
use chat_points_feed::{ChatFeed, ChatItem};
use chat_points_store::{Ledger, StoreError};

use crate::ServiceConfig;

/// The chat poller.
///
/// Owns the feed and ledger handles for the lifetime of the loop; the
/// poller is the single writer to the ledger.
pub struct Poller {
    feed: Arc<dyn ChatFeed>,
    ledger: Arc<dyn Ledger>,
    poll_interval: Duration,
    error_backoff: Duration,
}

impl Poller {
    /// Create a poller with intervals taken from the service config.
    #[must_use]
    pub fn new(feed: Arc<dyn ChatFeed>, ledger: Arc<dyn Ledger>, config: &ServiceConfig) -> Self {
        Self {
            feed,
            ledger,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            error_backoff: Duration::from_secs(config.error_backoff_seconds),
        }
    }

    /// Poll the given chat session until shutdown is signalled.
    ///
    /// Transient fetch failures are retried indefinitely with a fixed
    /// backoff and an unchanged cursor; per-event failures (malformed
    /// items, ledger write errors) are logged and skipped without
    /// aborting the page.
    pub async fn run(&self, live_chat_id: &LiveChatId, mut shutdown: watch::Receiver<bool>) {
        let mut cursor: Option<String> = None;

        tracing::info!(live_chat = %live_chat_id, "Monitoring chat");

        loop {
            let fetched = tokio::select! {
                () = shutdown_signalled(&mut shutdown) => break,
                result = self.feed.fetch_chat_page(live_chat_id, cursor.as_deref()) => result,
            };

            match fetched {
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        backoff_secs = self.error_backoff.as_secs(),
                        "Chat page fetch failed; backing off"
                    );
                    // Cursor stays unchanged so the same page is re-attempted.
                    if pause(self.error_backoff, &mut shutdown).await {
                        break;
                    }
                    continue;
                }
                Ok(page) => {
                    if page.items.is_empty() {
                        tracing::debug!("No new messages; cursor unchanged");
                    } else {
                        for item in page.items {
                            self.process_item(item);
                        }
                        cursor = page.next_cursor;
                        tracing::trace!(cursor = ?cursor, "Advanced pagination cursor");
                    }
                }
            }

            if pause(self.poll_interval, &mut shutdown).await {
                break;
            }
        }

        tracing::info!(live_chat = %live_chat_id, "Poller stopped");
    }

    /// Process one wire item: convert, filter moderators, classify, award.
    fn process_item(&self, item: ChatItem) {
        let event = match item.into_event() {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed chat item");
                return;
            }
        };

        tracing::info!(
            user_id = %event.user_id,
            name = %event.display_name,
            member = event.is_member,
            published_at = %event.published_at,
            message = %event.message_text,
            "Chat message"
        );

        if event.is_moderator {
            tracing::debug!(user_id = %event.user_id, "Moderator message; no points");
            return;
        }

        if let Err(err) = self.award(&event) {
            tracing::error!(
                user_id = %event.user_id,
                error = %err,
                "Ledger write failed; points not recorded"
            );
        }
    }

    /// Classify the event, persist membership transitions, and commit the
    /// point award.
    fn award(&self, event: &ChatEvent) -> Result<(), StoreError> {
        let existing = self.ledger.get(&event.user_id)?;
        let classification = classify(existing.as_ref(), event, Utc::now());

        if existing.is_none() {
            self.ledger.upsert_on_first_contact(
                &event.user_id,
                classification.status,
                classification.first_seen_as_member,
            )?;
        } else if classification.first_badge_observed(existing.as_ref()) {
            self.ledger
                .set_first_seen_as_member(&event.user_id, event.published_at)?;
        }

        // Message arrival is itself the interaction signal.
        let awarded = accrue(BASE_POINTS_PER_MESSAGE, classification.status, true);
        let total = self
            .ledger
            .add_points(&event.user_id, awarded, classification.status)?;

        tracing::info!(
            user_id = %event.user_id,
            awarded,
            total,
            status = ?classification.status,
            multiplier = classification.status.multiplier(),
            "Points awarded"
        );
        Ok(())
    }
}

/// Resolves when shutdown is requested, or when the sender side is gone
/// (a vanished host counts as a stop request).
async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Sleep for `duration`, returning `true` if shutdown was signalled before
/// the sleep completed.
async fn pause(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        () = shutdown_signalled(shutdown) => true,
        () = tokio::time::sleep(duration) => false,
    }
}
