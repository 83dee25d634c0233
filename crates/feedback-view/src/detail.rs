//! Detail screen controller for a single instance.
//!
//! State machine `Loading -> Ready | Error`. The instance is taken from
//! navigation-carried state when available and looked up otherwise; failing
//! to resolve it is terminal for the screen. Feedback is best-effort and
//! never moves the screen to `Error`.
//!
//! Fetches are tagged with a load ticket. `leave` retires the ticket so a
//! response that arrives after the screen was torn down is dropped.

use std::time::Duration;

use feedback_api::service::FeedbackApi;
use feedback_core::config::ApiConfig;
use feedback_core::error::DashboardError;
use feedback_core::models::{FeedbackItem, Instance, RatingFilter};

use crate::clipboard::{Clipboard, TransientFlag};
use crate::feedback::FeedbackViewModel;
use crate::generation::{Generation, LoadTicket};
use crate::notice::Notice;
use crate::store::InstanceStore;

pub const INSTANCE_NOT_FOUND: &str = "Instance not found";
pub const DELETE_REJECTED_MESSAGE: &str = "Failed to delete the instance. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "An error occurred while deleting the instance.";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy URL. Please try again.";
pub const COPIED_MESSAGE: &str = "Copied to clipboard.";

/// How long the "copied" indicator stays up.
pub const COPIED_FLASH: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Instance deleted; the caller should return to the instance list.
    NavigateToList,
    /// Delete failed; the screen stays `Ready` with a notice.
    Failed(String),
    /// No confirmation was pending, nothing was sent.
    NotConfirmed,
}

#[derive(Debug)]
pub struct DetailController {
    submission: ApiConfig,
    instance_id: String,
    state: DetailState,
    instance: Option<Instance>,
    feedback: FeedbackViewModel,
    feedback_loading: bool,
    confirming_delete: bool,
    deleting: bool,
    notice: Option<Notice>,
    copied: TransientFlag,
    generation: Generation,
}

impl DetailController {
    /// `config` supplies the submission base URL for the copy action.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            submission: config,
            instance_id: String::new(),
            state: DetailState::Loading,
            instance: None,
            feedback: FeedbackViewModel::new(),
            feedback_loading: false,
            confirming_delete: false,
            deleting: false,
            notice: None,
            copied: TransientFlag::new(),
            generation: Generation::new(),
        }
    }

    /// Run the full entry sequence: resolve the instance, then its feedback.
    pub async fn open(
        &mut self,
        api: &dyn FeedbackApi,
        instance_id: &str,
        carried: Option<Instance>,
    ) -> &DetailState {
        let ticket = self.begin(instance_id);

        let resolved = match carried {
            Some(instance) => Ok(instance),
            None => api.get_instance(instance_id).await,
        };
        self.resolve(ticket, resolved);

        if let Some(key) = self.instance.as_ref().map(|instance| instance.key.clone()) {
            let items = api.list_feedback(&key).await;
            self.apply_feedback(ticket, items);
        }
        &self.state
    }

    /// Reset to `Loading` for `instance_id` and return the ticket its
    /// responses must present.
    pub fn begin(&mut self, instance_id: &str) -> LoadTicket {
        self.copied.clear();
        self.instance_id = instance_id.to_string();
        self.state = DetailState::Loading;
        self.instance = None;
        self.feedback.clear();
        self.feedback_loading = false;
        self.confirming_delete = false;
        self.deleting = false;
        self.notice = None;
        self.generation.advance()
    }

    /// Apply the instance lookup. Returns false when the ticket is stale.
    pub fn resolve(
        &mut self,
        ticket: LoadTicket,
        result: Result<Instance, DashboardError>,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), "dropping superseded instance lookup");
            return false;
        }

        match result {
            Ok(instance) => {
                self.instance = Some(instance);
                self.state = DetailState::Ready;
                self.feedback_loading = true;
            }
            Err(err) => {
                tracing::warn!(id = %self.instance_id, error = %err, "instance lookup failed");
                self.instance = None;
                self.state = DetailState::Error(INSTANCE_NOT_FOUND.to_string());
            }
        }
        true
    }

    /// Apply fetched feedback. Returns false when the ticket is stale or no
    /// instance is resolved.
    pub fn apply_feedback(&mut self, ticket: LoadTicket, items: Vec<FeedbackItem>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), "dropping superseded feedback");
            return false;
        }
        let Some(instance) = &self.instance else {
            return false;
        };
        self.feedback.replace(&instance.key, items);
        self.feedback_loading = false;
        true
    }

    /// Tear the screen down: outstanding responses are dropped and the
    /// copied indicator's timer is cancelled.
    pub fn leave(&mut self) {
        self.generation.invalidate();
        self.copied.clear();
        self.confirming_delete = false;
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == DetailState::Ready
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    pub fn feedback(&self) -> &FeedbackViewModel {
        &self.feedback
    }

    pub fn is_feedback_loading(&self) -> bool {
        self.feedback_loading
    }

    pub fn set_rating_filter(&mut self, filter: RatingFilter) {
        self.feedback.set_filter(filter);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // -- delete --

    /// First step of the delete flow: open the confirmation. Only possible
    /// once the instance is resolved.
    pub fn request_delete(&mut self) -> bool {
        if !self.is_ready() || self.instance.is_none() {
            return false;
        }
        self.confirming_delete = true;
        true
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Second step of the delete flow. On success the instance is dropped
    /// from `store` and the caller should navigate to the list.
    pub async fn confirm_delete(
        &mut self,
        api: &dyn FeedbackApi,
        store: &mut InstanceStore,
    ) -> DeleteOutcome {
        if !self.confirming_delete || !self.is_ready() {
            return DeleteOutcome::NotConfirmed;
        }
        let Some(key) = self
            .instance
            .as_ref()
            .map(|instance| instance.key.clone())
            .filter(|key| !key.is_empty())
        else {
            self.confirming_delete = false;
            return DeleteOutcome::NotConfirmed;
        };

        self.deleting = true;
        let result = api.delete_instance(&key).await;
        self.deleting = false;
        self.confirming_delete = false;

        match result {
            Ok(true) => {
                store.remove(&key);
                DeleteOutcome::NavigateToList
            }
            Ok(false) => self.delete_failed(DELETE_REJECTED_MESSAGE),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "delete failed");
                self.delete_failed(DELETE_FAILED_MESSAGE)
            }
        }
    }

    fn delete_failed(&mut self, message: &str) -> DeleteOutcome {
        self.notice = Some(Notice::err(message));
        DeleteOutcome::Failed(message.to_string())
    }

    // -- copy url --

    /// Public submission URL for the resolved instance.
    pub fn submission_url(&self) -> Option<String> {
        self.instance
            .as_ref()
            .map(|instance| self.submission.submission_url(&instance.key))
    }

    /// Write the submission URL to `clipboard`. On success the copied
    /// indicator is raised for [`COPIED_FLASH`] with an ok notice; on failure
    /// an error notice is set.
    pub fn copy_submission_url(&mut self, clipboard: &dyn Clipboard) -> Option<String> {
        let url = self.submission_url()?;
        match clipboard.write_text(&url) {
            Ok(()) => {
                self.copied.raise(COPIED_FLASH);
                self.notice = Some(Notice::ok(COPIED_MESSAGE));
                Some(url)
            }
            Err(err) => {
                tracing::warn!(error = %err, "copy failed");
                self.notice = Some(Notice::err(COPY_FAILED_MESSAGE));
                None
            }
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied.is_set()
    }
}
