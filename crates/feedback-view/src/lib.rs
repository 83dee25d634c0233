//! feedback-view: view state for the feedback dashboard.
//!
//! Holds the session's instance collection, the per-instance feedback view
//! with its rating filter, and the controllers for the list and detail
//! screens. Controllers talk to the backend only through
//! `feedback_api::service::FeedbackApi`.

pub mod clipboard;
pub mod detail;
pub mod display;
pub mod feedback;
pub mod generation;
pub mod list;
pub mod notice;
pub mod store;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "feedback-view"
}
