//! feedback-api: transport for the feedback backend.
//!
//! Provides a transport-agnostic `FeedbackApi` trait with implementations for:
//! - `HttpFeedbackApi`: reqwest-backed client for the REST backend
//! - `MockFeedbackApi`: configurable in-memory double for tests
//!
//! Each operation emits an `ApiEvent` through the `ApiEventSink` trait so
//! callers can log or inspect traffic.

pub mod event;
pub mod http;
pub mod mock;
pub mod service;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "feedback-api"
}
