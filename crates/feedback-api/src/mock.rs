//! Mock feedback API for unit testing.
//!
//! Keeps instances and feedback in memory, records every call, and returns
//! pre-configured errors once each.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use feedback_core::error::DashboardError;
use feedback_core::models::{FeedbackItem, Instance};

use crate::service::{validate_instance_name, FeedbackApi};

/// A recorded call to the mock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListInstances,
    GetInstance(String),
    CreateInstance(String),
    DeleteInstance(String),
    ListFeedback(String),
}

/// Mock implementation of `FeedbackApi` for testing.
pub struct MockFeedbackApi {
    instances: Mutex<Vec<Instance>>,
    feedback: Mutex<HashMap<String, Vec<FeedbackItem>>>,
    calls: Mutex<Vec<MockCall>>,
    next_id: Mutex<u64>,
    list_error: Mutex<Option<DashboardError>>,
    get_error: Mutex<Option<DashboardError>>,
    create_error: Mutex<Option<DashboardError>>,
    delete_error: Mutex<Option<DashboardError>>,
    feedback_error: Mutex<Option<DashboardError>>,
    delete_rejected: Mutex<bool>,
}

impl Default for MockFeedbackApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeedbackApi {
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(Vec::new()),
            feedback: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            list_error: Mutex::new(None),
            get_error: Mutex::new(None),
            create_error: Mutex::new(None),
            delete_error: Mutex::new(None),
            feedback_error: Mutex::new(None),
            delete_rejected: Mutex::new(false),
        }
    }

    /// Pre-populate an instance in the mock backend.
    pub fn with_instance(self, instance: Instance) -> Self {
        lock(&self.instances).push(instance);
        self
    }

    /// Pre-populate feedback for an instance key.
    pub fn with_feedback(self, key: &str, items: Vec<FeedbackItem>) -> Self {
        lock(&self.feedback).insert(key.to_string(), items);
        self
    }

    /// Configure list_instances to return an error.
    pub fn with_list_error(self, err: DashboardError) -> Self {
        *lock(&self.list_error) = Some(err);
        self
    }

    /// Configure get_instance to return an error.
    pub fn with_get_error(self, err: DashboardError) -> Self {
        *lock(&self.get_error) = Some(err);
        self
    }

    /// Configure create_instance to return an error.
    pub fn with_create_error(self, err: DashboardError) -> Self {
        *lock(&self.create_error) = Some(err);
        self
    }

    /// Configure delete_instance to return an error.
    pub fn with_delete_error(self, err: DashboardError) -> Self {
        *lock(&self.delete_error) = Some(err);
        self
    }

    /// Configure fetch_feedback to return an error.
    pub fn with_feedback_error(self, err: DashboardError) -> Self {
        *lock(&self.feedback_error) = Some(err);
        self
    }

    /// Make delete_instance answer `success: false` without deleting.
    pub fn with_delete_rejected(self) -> Self {
        *lock(&self.delete_rejected) = true;
        self
    }

    /// Return all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Return the number of recorded calls.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Instances currently held by the mock backend.
    pub fn instances(&self) -> Vec<Instance> {
        lock(&self.instances).clone()
    }

    fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
    }

    fn take_error(slot: &Mutex<Option<DashboardError>>) -> Option<DashboardError> {
        lock(slot).take()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Helper to create a test instance with a derived key.
pub fn test_instance(id: &str, name: &str) -> Instance {
    Instance {
        id: id.to_string(),
        key: format!("k{id}"),
        name: name.to_string(),
        created_at: Some(Utc::now()),
    }
}

/// Helper to create a test feedback item with the given rating.
pub fn test_feedback(id: &str, rating: i64) -> FeedbackItem {
    FeedbackItem {
        id: id.to_string(),
        instance_key: None,
        name: None,
        user_email: None,
        rating,
        message: Some(format!("feedback {id}")),
        created_at: Some(Utc::now()),
    }
}

#[async_trait]
impl FeedbackApi for MockFeedbackApi {
    async fn list_instances(&self) -> Result<Vec<Instance>, DashboardError> {
        self.record(MockCall::ListInstances);

        if let Some(err) = Self::take_error(&self.list_error) {
            return Err(err);
        }

        Ok(lock(&self.instances).clone())
    }

    async fn get_instance(&self, id: &str) -> Result<Instance, DashboardError> {
        self.record(MockCall::GetInstance(id.to_string()));

        if let Some(err) = Self::take_error(&self.get_error) {
            return Err(err);
        }

        lock(&self.instances)
            .iter()
            .find(|instance| instance.id == id)
            .cloned()
            .ok_or_else(|| DashboardError::not_found(id))
    }

    async fn create_instance(&self, name: &str) -> Result<Instance, DashboardError> {
        let name = validate_instance_name(name)?;
        self.record(MockCall::CreateInstance(name.clone()));

        if let Some(err) = Self::take_error(&self.create_error) {
            return Err(err);
        }

        let id = {
            let mut next = lock(&self.next_id);
            let id = *next;
            *next += 1;
            format!("mock-{id}")
        };
        let instance = Instance {
            id,
            key: uuid::Uuid::new_v4().simple().to_string(),
            name,
            created_at: Some(Utc::now()),
        };
        lock(&self.instances).push(instance.clone());
        Ok(instance)
    }

    async fn delete_instance(&self, key: &str) -> Result<bool, DashboardError> {
        self.record(MockCall::DeleteInstance(key.to_string()));

        if let Some(err) = Self::take_error(&self.delete_error) {
            return Err(err);
        }
        if *lock(&self.delete_rejected) {
            return Ok(false);
        }

        let mut instances = lock(&self.instances);
        let before = instances.len();
        instances.retain(|instance| instance.key != key);
        let removed = instances.len() != before;
        if removed {
            lock(&self.feedback).remove(key);
        }
        Ok(removed)
    }

    async fn fetch_feedback(&self, key: &str) -> Result<Vec<FeedbackItem>, DashboardError> {
        self.record(MockCall::ListFeedback(key.to_string()));

        if let Some(err) = Self::take_error(&self.feedback_error) {
            return Err(err);
        }

        Ok(lock(&self.feedback).get(key).cloned().unwrap_or_default())
    }
}
