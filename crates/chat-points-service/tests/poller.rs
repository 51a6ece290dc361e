//! Integration tests for the chat ingestion loop.
//!
//! The feed is replaced by a scripted fake; the ledger is a real RocksDB
//! instance on a temp directory. Tests run under paused tokio time so the
//! fixed sleeps elapse instantly while staying measurable.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tempfile::TempDir;
use tokio::sync::watch;
use tokio::time::Instant;

use chat_points_core::{LiveChatId, SubscriptionStatus, UserId};
use chat_points_feed::types::{AuthorDetails, ChatSnippet};
use chat_points_feed::{ChatFeed, ChatItem, ChatPage, FeedError};
use chat_points_service::{Poller, ServiceConfig};
use chat_points_store::{Ledger, RocksLedger};

/// One recorded fetch call.
#[derive(Debug, Clone)]
struct FetchCall {
    cursor: Option<String>,
    at: Instant,
}

/// A feed that replays a script of page results, then returns empty pages.
struct ScriptedFeed {
    script: Mutex<VecDeque<Result<ChatPage, FeedError>>>,
    calls: Mutex<Vec<FetchCall>>,
}

impl ScriptedFeed {
    fn new(script: Vec<Result<ChatPage, FeedError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatFeed for ScriptedFeed {
    async fn fetch_chat_page(
        &self,
        _live_chat_id: &LiveChatId,
        cursor: Option<&str>,
    ) -> Result<ChatPage, FeedError> {
        self.calls.lock().unwrap().push(FetchCall {
            cursor: cursor.map(str::to_string),
            at: Instant::now(),
        });

        self.script.lock().unwrap().pop_front().unwrap_or(Ok(ChatPage {
            items: Vec::new(),
            next_cursor: None,
        }))
    }
}

fn wire_item(user: &str, is_member: bool, is_moderator: bool, published_at: &str) -> ChatItem {
    ChatItem {
        snippet: Some(ChatSnippet {
            display_message: Some("hello chat".into()),
            published_at: Some(published_at.into()),
        }),
        author_details: Some(AuthorDetails {
            channel_id: Some(user.into()),
            display_name: Some(user.into()),
            is_chat_moderator: is_moderator,
            is_chat_sponsor: is_member,
            member_since: None,
        }),
    }
}

fn page(items: Vec<ChatItem>, next_cursor: Option<&str>) -> Result<ChatPage, FeedError> {
    Ok(ChatPage {
        items,
        next_cursor: next_cursor.map(str::to_string),
    })
}

fn transient_error() -> Result<ChatPage, FeedError> {
    Err(FeedError::Api {
        status: 503,
        message: "backend unavailable".into(),
    })
}

/// Everything a loop test needs, with the poller already running.
struct Harness {
    ledger: Arc<RocksLedger>,
    feed: Arc<ScriptedFeed>,
    shutdown: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
    _dir: TempDir,
}

impl Harness {
    fn start(feed: Arc<ScriptedFeed>) -> Self {
        let dir = TempDir::new().unwrap();
        let ledger = Arc::new(RocksLedger::open(dir.path()).unwrap());

        let config = ServiceConfig::default();
        let poller = Poller::new(
            feed.clone() as Arc<dyn ChatFeed>,
            ledger.clone() as Arc<dyn Ledger>,
            &config,
        );

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            poller.run(&LiveChatId::new("chat-test"), shutdown_rx).await;
        });

        Self {
            ledger,
            feed,
            shutdown,
            task,
            _dir: dir,
        }
    }

    /// Wait (under paused time) until the predicate holds, then stop the
    /// poller cleanly.
    async fn run_until<F: Fn(&RocksLedger, &ScriptedFeed) -> bool>(self, predicate: F) {
        tokio::time::timeout(Duration::from_secs(600), async {
            loop {
                if predicate(self.ledger.as_ref(), self.feed.as_ref()) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await
        .expect("predicate not reached before timeout");

        self.shutdown.send(true).unwrap();
        self.task.await.unwrap();
    }
}

fn points_of(ledger: &RocksLedger, user: &str) -> Option<i64> {
    ledger.get(&UserId::new(user)).unwrap().map(|r| r.points)
}

#[tokio::test(start_paused = true)]
async fn new_member_first_message_awards_thirty() {
    let published = Utc::now();
    let feed = ScriptedFeed::new(vec![page(
        vec![wire_item("UCnew", true, false, &published.to_rfc3339())],
        Some("tok-1"),
    )]);
    let harness = Harness::start(feed);
    let ledger = harness.ledger.clone();

    harness
        .run_until(|ledger, _| points_of(ledger, "UCnew").is_some())
        .await;

    let record = ledger.get(&UserId::new("UCnew")).unwrap().unwrap();
    // (10 base + 5 interaction) * 2 subscribed multiplier
    assert_eq!(record.points, 30);
    assert_eq!(record.subscription_status, SubscriptionStatus::Subscribed);
    assert_eq!(record.first_seen_as_member.unwrap(), published);
    assert!(record.last_interaction.is_some());
}

#[tokio::test(start_paused = true)]
async fn longtime_member_crosses_year_boundary() {
    let feed = ScriptedFeed::new(vec![page(
        vec![wire_item("UCold", true, false, &Utc::now().to_rfc3339())],
        None,
    )]);
    let harness = Harness::start(feed);
    let ledger = harness.ledger.clone();

    // Member since 366 days ago
    ledger
        .upsert_on_first_contact(
            &UserId::new("UCold"),
            SubscriptionStatus::Subscribed,
            Some(Utc::now() - ChronoDuration::days(366)),
        )
        .unwrap();

    harness
        .run_until(|ledger, _| points_of(ledger, "UCold").is_some_and(|p| p > 0))
        .await;

    let record = ledger.get(&UserId::new("UCold")).unwrap().unwrap();
    // (10 + 5) * 3 year-or-more multiplier
    assert_eq!(record.points, 45);
    assert_eq!(record.subscription_status, SubscriptionStatus::YearOrMore);
}

#[tokio::test(start_paused = true)]
async fn moderator_messages_never_touch_the_ledger() {
    let now = Utc::now().to_rfc3339();
    let feed = ScriptedFeed::new(vec![page(
        vec![
            wire_item("UCmod", true, true, &now),
            wire_item("UCviewer", false, false, &now),
        ],
        None,
    )]);
    let harness = Harness::start(feed);
    let ledger = harness.ledger.clone();

    harness
        .run_until(|ledger, _| points_of(ledger, "UCviewer").is_some())
        .await;

    // The moderator's message was on the same page and processed first.
    assert!(ledger.get(&UserId::new("UCmod")).unwrap().is_none());
    assert_eq!(points_of(&ledger, "UCviewer"), Some(15));
}

#[tokio::test(start_paused = true)]
async fn malformed_item_fails_only_that_event() {
    let broken = ChatItem {
        snippet: Some(ChatSnippet {
            display_message: Some("no timestamp".into()),
            published_at: None,
        }),
        author_details: Some(AuthorDetails {
            channel_id: Some("UCbroken".into()),
            display_name: Some("broken".into()),
            is_chat_moderator: false,
            is_chat_sponsor: false,
            member_since: None,
        }),
    };
    let feed = ScriptedFeed::new(vec![page(
        vec![broken, wire_item("UCfine", false, false, &Utc::now().to_rfc3339())],
        None,
    )]);
    let harness = Harness::start(feed);
    let ledger = harness.ledger.clone();

    harness
        .run_until(|ledger, _| points_of(ledger, "UCfine").is_some())
        .await;

    assert!(ledger.get(&UserId::new("UCbroken")).unwrap().is_none());
    assert_eq!(points_of(&ledger, "UCfine"), Some(15));
}

#[tokio::test(start_paused = true)]
async fn replaying_a_page_doubles_points() {
    let now = Utc::now().to_rfc3339();
    let feed = ScriptedFeed::new(vec![
        page(vec![wire_item("UCrepeat", false, false, &now)], Some("tok-1")),
        page(vec![wire_item("UCrepeat", false, false, &now)], Some("tok-2")),
    ]);
    let harness = Harness::start(feed);
    let ledger = harness.ledger.clone();

    harness
        .run_until(|ledger, _| points_of(ledger, "UCrepeat") == Some(30))
        .await;

    // No deduplication: at-least-once feed semantics are accepted.
    assert_eq!(points_of(&ledger, "UCrepeat"), Some(30));
}

#[tokio::test(start_paused = true)]
async fn fetch_failures_back_off_without_moving_the_cursor() {
    let start = Instant::now();
    let feed = ScriptedFeed::new(vec![
        transient_error(),
        transient_error(),
        page(
            vec![wire_item("UCpatient", false, false, &Utc::now().to_rfc3339())],
            Some("tok-1"),
        ),
    ]);
    let harness = Harness::start(feed.clone());
    let ledger = harness.ledger.clone();

    harness
        .run_until(|ledger, _| points_of(ledger, "UCpatient").is_some())
        .await;

    // The eventually-fetched page was processed.
    assert_eq!(points_of(&ledger, "UCpatient"), Some(15));

    let calls = feed.calls();
    assert!(calls.len() >= 3);
    // Cursor unchanged across both failed attempts and the retry.
    assert_eq!(calls[0].cursor, None);
    assert_eq!(calls[1].cursor, None);
    assert_eq!(calls[2].cursor, None);
    // Two full backoff intervals elapsed before the successful fetch.
    assert!(calls[2].at - start >= Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn cursor_moves_only_on_pages_with_messages() {
    let now = Utc::now().to_rfc3339();
    let feed = ScriptedFeed::new(vec![
        page(vec![wire_item("UCa", false, false, &now)], Some("tok-1")),
        page(Vec::new(), Some("tok-2")),
        page(vec![wire_item("UCb", false, false, &now)], None),
    ]);
    let harness = Harness::start(feed.clone());

    harness
        .run_until(|_, feed| feed.calls().len() >= 5)
        .await;

    let calls = feed.calls();
    assert_eq!(calls[0].cursor, None);
    assert_eq!(calls[1].cursor.as_deref(), Some("tok-1"));
    // The empty page's token is ignored; the cursor stays where messages
    // were last seen, so nothing between tok-1 and the next burst is lost.
    assert_eq!(calls[2].cursor.as_deref(), Some("tok-1"));
    // A message-bearing page without a token resets to "latest" and
    // polling continues.
    assert_eq!(calls[3].cursor, None);
    assert_eq!(calls[4].cursor, None);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loop_between_cycles() {
    let feed = ScriptedFeed::new(Vec::new());
    let harness = Harness::start(feed);

    // Let at least one idle cycle happen, then stop.
    harness.run_until(|_, feed| !feed.calls().is_empty()).await;
}
