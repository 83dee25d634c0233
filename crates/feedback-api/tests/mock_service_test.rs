#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Contract tests for the `FeedbackApi` trait using the mock implementation.

use feedback_api::mock::{test_feedback, test_instance, MockCall, MockFeedbackApi};
use feedback_api::service::FeedbackApi;
use feedback_core::error::DashboardError;

// ── Instances ──

#[tokio::test]
async fn list_instances_preserves_server_order() {
    let api = MockFeedbackApi::new()
        .with_instance(test_instance("2", "Web"))
        .with_instance(test_instance("1", "Mobile"));

    let instances = api.list_instances().await.unwrap();
    let ids: Vec<&str> = instances.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
}

#[tokio::test]
async fn get_missing_instance_is_not_found() {
    let api = MockFeedbackApi::new();
    let err = api.get_instance("missing").await.unwrap_err();
    assert_eq!(err, DashboardError::not_found("missing"));
}

#[tokio::test]
async fn create_assigns_id_and_key() {
    let api = MockFeedbackApi::new();
    let created = api.create_instance("  Mobile App ").await.unwrap();
    assert_eq!(created.name, "Mobile App");
    assert!(!created.id.is_empty());
    assert!(!created.key.is_empty());
    assert_eq!(api.instances(), vec![created]);
}

#[tokio::test]
async fn create_with_blank_name_never_reaches_backend() {
    let api = MockFeedbackApi::new();
    let err = api.create_instance("   ").await.unwrap_err();
    assert!(matches!(err, DashboardError::Validation { .. }));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn configured_errors_fire_once() {
    let api = MockFeedbackApi::new().with_list_error(DashboardError::network("down"));
    assert!(api.list_instances().await.is_err());
    assert!(api.list_instances().await.is_ok());
}

#[tokio::test]
async fn delete_removes_instance_and_its_feedback() {
    let api = MockFeedbackApi::new()
        .with_instance(test_instance("1", "App A"))
        .with_feedback("k1", vec![test_feedback("f1", 5)]);

    assert!(api.delete_instance("k1").await.unwrap());
    assert!(api.instances().is_empty());
    assert!(api.fetch_feedback("k1").await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_delete_keeps_instance() {
    let api = MockFeedbackApi::new()
        .with_instance(test_instance("1", "App A"))
        .with_delete_rejected();

    assert!(!api.delete_instance("k1").await.unwrap());
    assert_eq!(api.instances().len(), 1);
}

// ── Feedback ──

#[tokio::test]
async fn list_feedback_absorbs_transport_errors() {
    let api = MockFeedbackApi::new()
        .with_feedback("k1", vec![test_feedback("f1", 5)])
        .with_feedback_error(DashboardError::network("connection reset"));

    assert!(api.list_feedback("k1").await.is_empty());
    assert_eq!(api.list_feedback("k1").await.len(), 1);
    assert_eq!(
        api.calls(),
        vec![
            MockCall::ListFeedback("k1".into()),
            MockCall::ListFeedback("k1".into())
        ]
    );
}

#[tokio::test]
async fn fetch_feedback_surfaces_errors() {
    let api = MockFeedbackApi::new().with_feedback_error(DashboardError::network("timeout"));
    let err = api.fetch_feedback("k1").await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unknown_key_has_no_feedback() {
    let api = MockFeedbackApi::new();
    assert!(api.list_feedback("nope").await.is_empty());
}
