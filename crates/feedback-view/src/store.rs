//! In-memory instance collection for the active session.
//!
//! Lifecycle is `Empty -> Loading -> Ready | Error`. The collection is
//! loaded on request only and mutated after the backend confirms a create
//! or delete; it never reconciles edits made by other clients.

use feedback_api::service::FeedbackApi;
use feedback_core::error::DashboardError;
use feedback_core::models::Instance;

use crate::generation::{Generation, LoadTicket};

pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load feedback instances. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreState {
    Empty,
    Loading,
    Ready,
    Error(String),
}

impl StoreState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct InstanceStore {
    state: StoreState,
    instances: Vec<Instance>,
    generation: Generation,
}

impl Default for InstanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceStore {
    pub fn new() -> Self {
        Self {
            state: StoreState::Empty,
            instances: Vec::new(),
            generation: Generation::new(),
        }
    }

    /// Store already holding `instances`, as if a load had completed.
    pub fn with_instances(instances: Vec<Instance>) -> Self {
        let mut store = Self::new();
        let ticket = store.begin_load();
        store.finish_load(ticket, Ok(instances));
        store
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Instance> {
        self.instances.iter().find(|instance| instance.id == id)
    }

    pub fn find_by_key(&self, key: &str) -> Option<&Instance> {
        self.instances.iter().find(|instance| instance.key == key)
    }

    /// Fetch the full list, replacing the collection.
    pub async fn load(&mut self, api: &dyn FeedbackApi) -> &StoreState {
        let ticket = self.begin_load();
        let result = api.list_instances().await;
        self.finish_load(ticket, result);
        &self.state
    }

    /// Enter `Loading` and return the ticket the response must present.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.state = StoreState::Loading;
        self.generation.advance()
    }

    /// Apply a list response. Returns false when `ticket` was superseded and
    /// the response was dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Instance>, DashboardError>,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), "dropping superseded instance list");
            return false;
        }

        match result {
            Ok(instances) => {
                self.instances = instances;
                self.state = StoreState::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load instances");
                self.instances.clear();
                self.state = StoreState::Error(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Append an instance the backend just created. An instance sharing an
    /// id or key with one already held is not added twice.
    pub fn add(&mut self, instance: Instance) -> bool {
        let duplicate = self
            .instances
            .iter()
            .any(|held| held.id == instance.id || held.key == instance.key);
        if duplicate {
            return false;
        }
        self.instances.push(instance);
        true
    }

    /// Drop the instance with `key` after the backend deleted it.
    pub fn remove(&mut self, key: &str) -> Option<Instance> {
        let idx = self.instances.iter().position(|instance| instance.key == key)?;
        Some(self.instances.remove(idx))
    }
}
