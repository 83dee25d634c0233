#![allow(clippy::expect_used, clippy::unwrap_used)]

use feedback_api::mock::{test_instance, MockCall, MockFeedbackApi};
use feedback_core::error::DashboardError;
use feedback_view::list::{InstanceListController, CREATE_FAILED_MESSAGE};
use feedback_view::store::{StoreState, LOAD_FAILED_MESSAGE};

// ── Load ──

#[tokio::test]
async fn load_keeps_server_order() {
    let api = MockFeedbackApi::new()
        .with_instance(test_instance("2", "Beta"))
        .with_instance(test_instance("1", "Alpha"));
    let mut list = InstanceListController::new();

    assert_eq!(list.load(&api).await, &StoreState::Ready);
    let names: Vec<&str> = list.store().instances().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Beta", "Alpha"]);
}

#[tokio::test]
async fn load_failure_shows_retry_message() {
    let api = MockFeedbackApi::new()
        .with_instance(test_instance("1", "Alpha"))
        .with_list_error(DashboardError::network("503"));
    let mut list = InstanceListController::new();

    let state = list.load(&api).await.clone();
    assert_eq!(state, StoreState::Error(LOAD_FAILED_MESSAGE.to_string()));
    assert!(list.store().is_empty());

    // errors are one-shot; a retry succeeds
    assert_eq!(list.load(&api).await, &StoreState::Ready);
    assert_eq!(list.store().len(), 1);
}

// ── Create ──

#[tokio::test]
async fn create_appends_exactly_once_and_closes_dialog() {
    let api = MockFeedbackApi::new().with_instance(test_instance("1", "Alpha"));
    let mut list = InstanceListController::new();
    list.load(&api).await;

    list.open_create_dialog();
    list.set_name("  Mobile  ");
    let created = list.submit_create(&api).await.unwrap();

    assert_eq!(created.name, "Mobile");
    assert!(!created.key.is_empty());
    let matching = list
        .store()
        .instances()
        .iter()
        .filter(|i| i.id == created.id)
        .count();
    assert_eq!(matching, 1);
    assert_eq!(list.store().len(), 2);
    assert!(!list.dialog().open);
    assert!(list.dialog().name.is_empty());
    assert!(!list.dialog().creating);
    assert!(list.notice().is_none());
}

#[tokio::test]
async fn blank_name_makes_no_request() {
    let api = MockFeedbackApi::new();
    let mut list = InstanceListController::new();
    list.open_create_dialog();
    list.set_name("   ");

    let err = list.submit_create(&api).await.unwrap_err();
    assert!(matches!(err, DashboardError::Validation { .. }));
    assert_eq!(api.call_count(), 0);
    assert!(list.dialog().open);
}

#[tokio::test]
async fn create_failure_uses_server_message() {
    let api = MockFeedbackApi::new().with_create_error(DashboardError::Network {
        message: "http 400".into(),
        status: Some(400),
        server_message: Some("Instance name already taken".into()),
    });
    let mut list = InstanceListController::new();
    list.open_create_dialog();
    list.set_name("Web");

    assert!(list.submit_create(&api).await.is_err());
    assert_eq!(
        list.notice().map(|n| n.text.as_str()),
        Some("Instance name already taken")
    );
    assert!(list.dialog().open);
    assert_eq!(list.dialog().name, "Web");
    assert!(list.store().is_empty());
}

#[tokio::test]
async fn create_failure_without_server_message_is_generic() {
    let api = MockFeedbackApi::new().with_create_error(DashboardError::network("timed out"));
    let mut list = InstanceListController::new();
    list.open_create_dialog();
    list.set_name("Web");

    assert!(list.submit_create(&api).await.is_err());
    assert_eq!(list.notice().map(|n| n.text.as_str()), Some(CREATE_FAILED_MESSAGE));
    assert!(list.can_submit());

    list.dismiss_notice();
    let created = list.submit_create(&api).await.unwrap();
    assert_eq!(created.name, "Web");
    assert_eq!(
        api.calls(),
        vec![MockCall::CreateInstance("Web".into()), MockCall::CreateInstance("Web".into())]
    );
}

// ── Navigation ──

#[tokio::test]
async fn selected_route_opens_without_lookup() {
    use feedback_core::config::ApiConfig;
    use feedback_view::detail::DetailController;

    let api = MockFeedbackApi::new().with_instance(test_instance("1", "Alpha"));
    let mut list = InstanceListController::new();
    list.load(&api).await;

    let instance = list.store().get("1").cloned().unwrap();
    let route = list.select(&instance);
    let mut detail = DetailController::new(ApiConfig::default());
    detail.open(&api, &route.instance_id, route.carried).await;

    assert!(detail.is_ready());
    assert!(!api.calls().contains(&MockCall::GetInstance("1".into())));
}
