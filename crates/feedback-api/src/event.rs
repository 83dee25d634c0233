//! API event recording for logging and debugging.
//!
//! Each transport operation emits an event that a sink can forward to the
//! log, keep in memory for assertions, or drop.

use chrono::{DateTime, Utc};

/// The kind of backend call that generated an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiEventKind {
    ListInstances,
    GetInstance,
    CreateInstance,
    DeleteInstance,
    ListFeedback,
}

impl std::fmt::Display for ApiEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ListInstances => "list_instances",
            Self::GetInstance => "get_instance",
            Self::CreateInstance => "create_instance",
            Self::DeleteInstance => "delete_instance",
            Self::ListFeedback => "list_feedback",
        };
        f.write_str(s)
    }
}

/// Outcome of a backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEventOutcome {
    Success,
    Error(String),
}

impl std::fmt::Display for ApiEventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiEvent {
    pub timestamp: DateTime<Utc>,
    /// Instance id or key the call targeted, if any.
    pub subject: Option<String>,
    pub kind: ApiEventKind,
    pub outcome: ApiEventOutcome,
    pub detail: String,
}

impl ApiEvent {
    pub fn new(
        subject: Option<String>,
        kind: ApiEventKind,
        outcome: ApiEventOutcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            subject,
            kind,
            outcome,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == ApiEventOutcome::Success
    }
}

/// Receives one event per backend call.
pub trait ApiEventSink: Send + Sync {
    fn record(&self, event: ApiEvent);
}

/// Forwards events to `tracing`: successes at debug, failures at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl ApiEventSink for TracingEventSink {
    fn record(&self, event: ApiEvent) {
        let subject = event.subject.as_deref().unwrap_or("-");
        match &event.outcome {
            ApiEventOutcome::Success => tracing::debug!(
                kind = %event.kind,
                subject,
                detail = %event.detail,
                "api call succeeded"
            ),
            ApiEventOutcome::Error(message) => tracing::warn!(
                kind = %event.kind,
                subject,
                error = %message,
                detail = %event.detail,
                "api call failed"
            ),
        }
    }
}

/// Keeps every event in memory so tests can query what the transport did.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: std::sync::Mutex<Vec<ApiEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_events<R>(&self, read: impl FnOnce(&[ApiEvent]) -> R) -> R {
        match self.events.lock() {
            Ok(guard) => read(&guard),
            Err(poisoned) => read(&poisoned.into_inner()),
        }
    }

    fn matching(&self, keep: impl Fn(&ApiEvent) -> bool) -> Vec<ApiEvent> {
        self.with_events(|events| events.iter().filter(|event| keep(*event)).cloned().collect())
    }

    pub fn events(&self) -> Vec<ApiEvent> {
        self.with_events(<[ApiEvent]>::to_vec)
    }

    pub fn count(&self) -> usize {
        self.with_events(<[ApiEvent]>::len)
    }

    pub fn kinds(&self) -> Vec<ApiEventKind> {
        self.with_events(|events| events.iter().map(|event| event.kind).collect())
    }

    pub fn last(&self) -> Option<ApiEvent> {
        self.with_events(|events| events.last().cloned())
    }

    /// Events for calls that targeted `subject` (an instance id or key).
    pub fn for_subject(&self, subject: &str) -> Vec<ApiEvent> {
        self.matching(|event| event.subject.as_deref() == Some(subject))
    }

    pub fn of_kind(&self, kind: ApiEventKind) -> Vec<ApiEvent> {
        self.matching(|event| event.kind == kind)
    }

    pub fn failures(&self) -> Vec<ApiEvent> {
        self.matching(|event| !event.is_success())
    }
}

impl ApiEventSink for InMemoryEventSink {
    fn record(&self, event: ApiEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// No-op event sink that discards all events.
pub struct NullEventSink;

impl ApiEventSink for NullEventSink {
    fn record(&self, _event: ApiEvent) {}
}
