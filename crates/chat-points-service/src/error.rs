//! Service error types.

use chat_points_feed::FeedError;
use chat_points_store::StoreError;

/// Top-level service error.
///
/// Everything the binary can fail with: bad invocation, missing
/// configuration, or a failure propagated from the ledger or the feed.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The command line could not be understood.
    #[error("invalid invocation: {0}")]
    InvalidCommand(String),

    /// Ledger failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Feed or session-location failure.
    #[error(transparent)]
    Feed(#[from] FeedError),
}
