//! REST transport: `FeedbackApi` implemented with reqwest against the
//! feedback backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use feedback_core::config::ApiConfig;
use feedback_core::error::DashboardError;
use feedback_core::models::{CreateInstanceRequest, Envelope, FeedbackItem, Instance};

use crate::event::{ApiEvent, ApiEventKind, ApiEventOutcome, ApiEventSink};
use crate::service::{validate_instance_name, FeedbackApi};

const INSTANCES_PATH: &str = "/api/feedback/instances";
const INSTANCE_PATH: &str = "/api/feedback/instance";
const FEEDBACKS_PATH: &str = "/api/feedback/feedbacks";

/// Feedback API implementation backed by HTTP calls to the backend.
pub struct HttpFeedbackApi {
    config: ApiConfig,
    client: Client,
    event_sink: Arc<dyn ApiEventSink>,
}

impl HttpFeedbackApi {
    pub fn new(
        config: ApiConfig,
        event_sink: Arc<dyn ApiEventSink>,
    ) -> Result<Self, DashboardError> {
        config.validate().map_err(DashboardError::validation)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DashboardError::network(format!("build http client: {e}")))?;

        Ok(Self {
            config,
            client,
            event_sink,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Endpoint URL with `segment` appended as a single percent-encoded path
    /// segment.
    fn url(&self, path: &str, segment: Option<&str>) -> Result<Url, DashboardError> {
        let mut url = Url::parse(&self.config.endpoint(path)).map_err(|e| {
            DashboardError::validation(format!(
                "invalid api base url {:?}: {e}",
                self.config.base_url
            ))
        })?;
        if let Some(segment) = segment {
            url.path_segments_mut()
                .map_err(|()| {
                    DashboardError::validation(format!(
                        "api base url {:?} cannot carry a path",
                        self.config.base_url
                    ))
                })?
                .push(segment);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, DashboardError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        if body.trim().is_empty() {
            tracing::debug!(status = status.as_u16(), "empty response body");
            return Ok(Envelope::default());
        }
        serde_json::from_str::<Envelope<T>>(&body).map_err(|e| DashboardError::Network {
            message: format!("decode response body: {e}"),
            status: Some(status.as_u16()),
            server_message: None,
        })
    }

    fn emit<T>(
        &self,
        subject: Option<&str>,
        kind: ApiEventKind,
        result: &Result<T, DashboardError>,
        detail: impl Into<String>,
    ) {
        let outcome = match result {
            Ok(_) => ApiEventOutcome::Success,
            Err(err) => ApiEventOutcome::Error(err.to_string()),
        };
        self.event_sink.record(ApiEvent::new(
            subject.map(str::to_string),
            kind,
            outcome,
            detail,
        ));
    }
}

#[async_trait]
impl FeedbackApi for HttpFeedbackApi {
    async fn list_instances(&self) -> Result<Vec<Instance>, DashboardError> {
        let result: Result<Vec<Instance>, DashboardError> = async {
            let url = self.url(INSTANCES_PATH, None)?;
            let envelope: Envelope<Vec<serde_json::Value>> =
                self.send(self.client.get(url)).await?;
            Ok(decode_each(envelope.into_data().unwrap_or_default(), "instance"))
        }
        .await;

        let detail = match &result {
            Ok(instances) => format!("returned {} instances", instances.len()),
            Err(_) => String::new(),
        };
        self.emit(None, ApiEventKind::ListInstances, &result, detail);
        result
    }

    async fn get_instance(&self, id: &str) -> Result<Instance, DashboardError> {
        let result: Result<Instance, DashboardError> = async {
            if id.trim().is_empty() {
                return Err(DashboardError::validation("instance id is required"));
            }
            let url = self.url(INSTANCES_PATH, Some(id))?;
            let envelope: Envelope<Instance> = match self.send(self.client.get(url)).await {
                Err(err) if err.status() == Some(StatusCode::NOT_FOUND.as_u16()) => {
                    return Err(DashboardError::not_found(id));
                }
                other => other?,
            };
            envelope
                .into_data()
                .ok_or_else(|| DashboardError::not_found(id))
        }
        .await;

        self.emit(Some(id), ApiEventKind::GetInstance, &result, "");
        result
    }

    async fn create_instance(&self, name: &str) -> Result<Instance, DashboardError> {
        let name = validate_instance_name(name)?;

        let result: Result<Instance, DashboardError> = async {
            let url = self.url(INSTANCE_PATH, None)?;
            let body = CreateInstanceRequest { name: name.clone() };
            let envelope: Envelope<Instance> =
                self.send(self.client.post(url).json(&body)).await?;
            let server_message = envelope.message.clone();
            envelope.into_data().ok_or_else(|| DashboardError::Network {
                message: "backend did not return the created instance".into(),
                status: None,
                server_message,
            })
        }
        .await;

        let detail = match &result {
            Ok(instance) => format!("created {:?} with key {}", instance.name, instance.key),
            Err(_) => format!("name {name:?}"),
        };
        let subject = result.as_ref().ok().map(|instance| instance.id.clone());
        self.emit(subject.as_deref(), ApiEventKind::CreateInstance, &result, detail);
        result
    }

    async fn delete_instance(&self, key: &str) -> Result<bool, DashboardError> {
        let result: Result<bool, DashboardError> = async {
            if key.trim().is_empty() {
                return Err(DashboardError::validation("instance key is required"));
            }
            let url = self.url(INSTANCE_PATH, Some(key))?;
            let envelope: Envelope<serde_json::Value> =
                self.send(self.client.delete(url)).await?;
            Ok(envelope.success)
        }
        .await;

        let detail = match &result {
            Ok(success) => format!("success={success}"),
            Err(_) => String::new(),
        };
        self.emit(Some(key), ApiEventKind::DeleteInstance, &result, detail);
        result
    }

    async fn fetch_feedback(&self, key: &str) -> Result<Vec<FeedbackItem>, DashboardError> {
        let result: Result<Vec<FeedbackItem>, DashboardError> = async {
            if key.trim().is_empty() {
                return Err(DashboardError::validation("instance key is required"));
            }
            let url = self.url(FEEDBACKS_PATH, Some(key))?;
            let envelope: Envelope<Vec<serde_json::Value>> =
                self.send(self.client.get(url)).await?;
            Ok(decode_each(envelope.into_data().unwrap_or_default(), "feedback item"))
        }
        .await;

        let detail = match &result {
            Ok(items) => format!("returned {} feedback items", items.len()),
            Err(_) => String::new(),
        };
        self.emit(Some(key), ApiEventKind::ListFeedback, &result, detail);
        result
    }
}

// -- helpers --

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode list elements one at a time; a malformed record is logged and
/// skipped instead of failing the whole list.
fn decode_each<T: DeserializeOwned>(values: Vec<serde_json::Value>, what: &str) -> Vec<T> {
    let total = values.len();
    let decoded: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed {what}");
                None
            }
        })
        .collect();
    if decoded.len() != total {
        tracing::warn!(kept = decoded.len(), total, "dropped malformed {what} records");
    }
    decoded
}

fn map_reqwest_error(err: reqwest::Error) -> DashboardError {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_decode() {
        "response body unreadable"
    } else {
        "request failed"
    };
    DashboardError::Network {
        message: format!("{kind}: {err}"),
        status: err.status().map(|status| status.as_u16()),
        server_message: None,
    }
}

fn status_error(status: StatusCode, body: &str) -> DashboardError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let server_message = parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty());
    DashboardError::Network {
        message: format!("HTTP {status}"),
        status: Some(status.as_u16()),
        server_message,
    }
}
