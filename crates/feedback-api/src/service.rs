//! Feedback API trait, the boundary between view state and the backend.
//!
//! Implementations can talk to the REST backend or be mocked for testing.

use async_trait::async_trait;

use feedback_core::error::DashboardError;
use feedback_core::models::{FeedbackItem, Instance};

/// The feedback backend interface.
///
/// Every call is a single request; nothing is cached or retried here.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    /// List all instances in server order.
    async fn list_instances(&self) -> Result<Vec<Instance>, DashboardError>;

    /// Get a single instance by id. Returns `NotFound` when the backend has
    /// no such instance.
    async fn get_instance(&self, id: &str) -> Result<Instance, DashboardError>;

    /// Create an instance. The name is trimmed; an empty name fails with
    /// `Validation` before any request is sent.
    async fn create_instance(&self, name: &str) -> Result<Instance, DashboardError>;

    /// Delete an instance by key. Returns the backend's `success` flag.
    async fn delete_instance(&self, key: &str) -> Result<bool, DashboardError>;

    /// Fetch the feedback submitted to an instance, surfacing failures.
    async fn fetch_feedback(&self, key: &str) -> Result<Vec<FeedbackItem>, DashboardError>;

    /// Feedback for an instance. Failures are absorbed into an empty list:
    /// missing feedback never blocks the surrounding view.
    async fn list_feedback(&self, key: &str) -> Vec<FeedbackItem> {
        match self.fetch_feedback(key).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(key, error = %err, "feedback unavailable; treating as empty");
                Vec::new()
            }
        }
    }
}

/// Trim an instance name and reject it when nothing is left.
pub fn validate_instance_name(name: &str) -> Result<String, DashboardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::validation("instance name is required"));
    }
    Ok(trimmed.to_string())
}
