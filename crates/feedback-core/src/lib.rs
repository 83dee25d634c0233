//! feedback-core: domain types, error taxonomy, and configuration for the
//! feedback dashboard.
//!
//! Defines the entities exchanged with the feedback backend (instances and
//! feedback items), the response envelope they travel in, the rating filter
//! used by the feedback view, and the explicit API configuration injected
//! into transports.

pub mod config;
pub mod error;
pub mod models;

/// Crate identity label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "feedback-core"
}
