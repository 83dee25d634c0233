//! Instance list screen controller and the create-instance dialog.

use feedback_api::service::{validate_instance_name, FeedbackApi};
use feedback_core::error::DashboardError;
use feedback_core::models::Instance;

use crate::notice::Notice;
use crate::store::{InstanceStore, StoreState};

pub const CREATE_FAILED_MESSAGE: &str =
    "Failed to create the feedback instance. Please try again.";

/// Navigation target for opening an instance's detail screen. Carrying the
/// instance lets the detail screen skip the lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRoute {
    pub instance_id: String,
    pub carried: Option<Instance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDialog {
    pub open: bool,
    pub name: String,
    pub creating: bool,
}

#[derive(Debug, Default)]
pub struct InstanceListController {
    store: InstanceStore,
    dialog: CreateDialog,
    notice: Option<Notice>,
}

impl InstanceListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    pub async fn load(&mut self, api: &dyn FeedbackApi) -> &StoreState {
        self.store.load(api).await
    }

    /// Nothing loaded and nothing failed: show the first-instance prompt.
    pub fn shows_empty_prompt(&self) -> bool {
        self.store.is_empty() && self.store.state().error().is_none()
    }

    pub fn select(&self, instance: &Instance) -> DetailRoute {
        DetailRoute {
            instance_id: instance.id.clone(),
            carried: Some(instance.clone()),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // -- create dialog --

    pub fn dialog(&self) -> &CreateDialog {
        &self.dialog
    }

    pub fn open_create_dialog(&mut self) {
        self.dialog.open = true;
    }

    /// Hide the dialog. The typed name is kept for the next open.
    pub fn close_create_dialog(&mut self) {
        self.dialog.open = false;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.dialog.name = name.into();
    }

    /// Submission is enabled only for a non-blank name with no create in
    /// flight.
    pub fn can_submit(&self) -> bool {
        !self.dialog.creating && !self.dialog.name.trim().is_empty()
    }

    /// Create an instance from the dialog's name.
    ///
    /// A blank name is rejected before any request. On success the instance
    /// is appended to the store and the dialog closes with its field cleared.
    /// On failure the dialog stays open with the name intact and a notice
    /// carries the server's message, or a generic one.
    pub async fn submit_create(
        &mut self,
        api: &dyn FeedbackApi,
    ) -> Result<Instance, DashboardError> {
        if self.dialog.creating {
            return Err(DashboardError::validation("a create request is already in flight"));
        }
        let name = validate_instance_name(&self.dialog.name)?;

        self.dialog.creating = true;
        let result = api.create_instance(&name).await;
        self.dialog.creating = false;

        match result {
            Ok(instance) => {
                self.store.add(instance.clone());
                self.dialog.name.clear();
                self.dialog.open = false;
                Ok(instance)
            }
            Err(err) => {
                tracing::warn!(name = %name, error = %err, "create instance failed");
                let message = err
                    .server_message()
                    .unwrap_or(CREATE_FAILED_MESSAGE)
                    .to_string();
                self.notice = Some(Notice::err(message));
                Err(err)
            }
        }
    }
}
