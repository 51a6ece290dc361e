//! Chat polling daemon for chat-points.
//!
//! This crate wires the feed client, the classifier, the accrual engine,
//! and the ledger into the long-running ingestion loop, and exposes the
//! operator-invoked administrative override.
//!
//! # Operation
//!
//! Run with no arguments, the binary locates the channel's live chat
//! session and polls it until stopped (ctrl-c). Run as
//! `chat-points-service set-membership <user_id> <months>`, it applies a
//! manual membership correction to the ledger and exits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod admin;
pub mod config;
pub mod error;
pub mod poller;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use poller::Poller;
