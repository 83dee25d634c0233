#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use feedback_api::mock::{test_feedback, test_instance, MockCall, MockFeedbackApi};
use feedback_core::config::ApiConfig;
use feedback_core::error::DashboardError;
use feedback_core::models::{Instance, RatingFilter};
use feedback_view::clipboard::MemoryClipboard;
use feedback_view::detail::{
    DeleteOutcome, DetailController, DetailState, COPIED_MESSAGE, COPY_FAILED_MESSAGE,
    DELETE_FAILED_MESSAGE, DELETE_REJECTED_MESSAGE, INSTANCE_NOT_FOUND,
};
use feedback_view::store::InstanceStore;

fn controller() -> DetailController {
    DetailController::new(
        ApiConfig::new("https://api.test").with_submission_base_url("https://api.test"),
    )
}

fn seeded_api() -> MockFeedbackApi {
    MockFeedbackApi::new()
        .with_instance(test_instance("1", "App A"))
        .with_instance(test_instance("2", "App B"))
        .with_feedback(
            "k1",
            vec![test_feedback("f1", 5), test_feedback("f2", 3), test_feedback("f3", 5)],
        )
}

async fn opened(api: &MockFeedbackApi, id: &str) -> DetailController {
    let mut detail = controller();
    detail.open(api, id, None).await;
    detail
}

// ── Entry ──

#[tokio::test]
async fn open_resolves_instance_and_feedback() {
    let api = seeded_api();
    let detail = opened(&api, "1").await;

    assert_eq!(detail.state(), &DetailState::Ready);
    assert_eq!(detail.instance().map(|i| i.name.as_str()), Some("App A"));
    assert_eq!(detail.feedback().count(), 3);
    assert!(!detail.is_feedback_loading());
    assert_eq!(
        api.calls(),
        vec![MockCall::GetInstance("1".into()), MockCall::ListFeedback("k1".into())]
    );
}

#[tokio::test]
async fn unknown_id_is_instance_not_found() {
    let api = seeded_api();
    let detail = opened(&api, "missing").await;

    assert_eq!(detail.state(), &DetailState::Error(INSTANCE_NOT_FOUND.to_string()));
    assert!(detail.instance().is_none());
    assert_eq!(api.calls(), vec![MockCall::GetInstance("missing".into())]);
}

#[tokio::test]
async fn lookup_transport_error_is_instance_not_found() {
    let api = seeded_api().with_get_error(DashboardError::network("timeout"));
    let detail = opened(&api, "1").await;
    assert_eq!(detail.state(), &DetailState::Error(INSTANCE_NOT_FOUND.to_string()));
}

#[tokio::test]
async fn carried_instance_skips_lookup() {
    let api = seeded_api();
    let mut detail = controller();
    detail
        .open(&api, "1", Some(test_instance("1", "App A")))
        .await;

    assert!(detail.is_ready());
    assert_eq!(api.calls(), vec![MockCall::ListFeedback("k1".into())]);
}

#[tokio::test]
async fn feedback_failure_keeps_screen_ready() {
    let api = seeded_api().with_feedback_error(DashboardError::network("502"));
    let detail = opened(&api, "1").await;

    assert!(detail.is_ready());
    assert_eq!(detail.feedback().count(), 0);
    assert!(detail.feedback().is_empty_state());
    assert!(detail.notice().is_none());
}

#[tokio::test]
async fn rating_filter_applies_to_loaded_feedback() {
    let api = seeded_api();
    let mut detail = opened(&api, "1").await;

    detail.set_rating_filter(RatingFilter::Exactly(5));
    assert_eq!(detail.feedback().count_label(), "2 items");
    detail.set_rating_filter(RatingFilter::Exactly(3));
    assert_eq!(detail.feedback().count_label(), "1 item");
}

// ── Stale responses ──

#[test]
fn superseded_lookup_is_dropped() {
    let mut detail = controller();
    let first = detail.begin("1");
    let second = detail.begin("2");

    assert!(!detail.resolve(first, Ok(test_instance("1", "App A"))));
    assert_eq!(detail.state(), &DetailState::Loading);

    assert!(detail.resolve(second, Ok(test_instance("2", "App B"))));
    assert_eq!(detail.instance().map(|i| i.id.as_str()), Some("2"));
}

#[test]
fn responses_after_leave_are_dropped() {
    let mut detail = controller();
    let ticket = detail.begin("1");
    assert!(detail.resolve(ticket, Ok(test_instance("1", "App A"))));
    assert!(detail.is_feedback_loading());

    detail.leave();
    assert!(!detail.apply_feedback(ticket, vec![test_feedback("late", 4)]));
    assert_eq!(detail.feedback().count(), 0);
}

#[test]
fn feedback_without_instance_is_ignored() {
    let mut detail = controller();
    let ticket = detail.begin("1");
    detail.resolve(ticket, Err(DashboardError::not_found("1")));
    assert!(!detail.apply_feedback(ticket, vec![test_feedback("f", 1)]));
}

// ── Delete ──

#[tokio::test]
async fn delete_requires_confirmation() {
    let api = seeded_api();
    let mut detail = opened(&api, "1").await;
    let mut store = InstanceStore::with_instances(api.instances());
    let before = api.call_count();

    let outcome = detail.confirm_delete(&api, &mut store).await;
    assert_eq!(outcome, DeleteOutcome::NotConfirmed);
    assert_eq!(api.call_count(), before);

    assert!(detail.request_delete());
    detail.cancel_delete();
    let outcome = detail.confirm_delete(&api, &mut store).await;
    assert_eq!(outcome, DeleteOutcome::NotConfirmed);
    assert_eq!(api.call_count(), before);
}

#[tokio::test]
async fn delete_not_offered_before_ready() {
    let api = seeded_api();
    let mut detail = opened(&api, "missing").await;
    assert!(!detail.request_delete());
}

#[tokio::test]
async fn confirmed_delete_removes_instance_from_store() {
    let api = seeded_api();
    let mut detail = opened(&api, "1").await;
    let mut store = InstanceStore::with_instances(api.instances());

    assert!(detail.request_delete());
    let outcome = detail.confirm_delete(&api, &mut store).await;

    assert_eq!(outcome, DeleteOutcome::NavigateToList);
    assert!(store.find_by_key("k1").is_none());
    assert_eq!(store.len(), 1);
    assert!(!detail.is_confirming_delete());
    assert!(api.calls().contains(&MockCall::DeleteInstance("k1".into())));
}

#[tokio::test]
async fn rejected_delete_shows_notice_and_keeps_instance() {
    let api = seeded_api().with_delete_rejected();
    let mut detail = opened(&api, "1").await;
    let mut store = InstanceStore::with_instances(api.instances());

    detail.request_delete();
    let outcome = detail.confirm_delete(&api, &mut store).await;

    assert_eq!(outcome, DeleteOutcome::Failed(DELETE_REJECTED_MESSAGE.to_string()));
    assert!(detail.is_ready());
    assert_eq!(detail.notice().map(|n| n.text.as_str()), Some(DELETE_REJECTED_MESSAGE));
    assert_eq!(store.len(), 2);
    assert!(!detail.is_confirming_delete());
}

#[tokio::test]
async fn failed_delete_shows_error_notice() {
    let api = seeded_api().with_delete_error(DashboardError::network("reset"));
    let mut detail = opened(&api, "1").await;
    let mut store = InstanceStore::with_instances(api.instances());

    detail.request_delete();
    let outcome = detail.confirm_delete(&api, &mut store).await;

    assert_eq!(outcome, DeleteOutcome::Failed(DELETE_FAILED_MESSAGE.to_string()));
    assert!(detail.notice().is_some_and(|n| n.is_error()));
    assert!(store.find_by_key("k1").is_some());
}

// ── Copy URL ──

#[tokio::test(start_paused = true)]
async fn copy_writes_url_and_flash_expires() {
    let api = seeded_api();
    let mut detail = opened(&api, "1").await;
    let clipboard = MemoryClipboard::new();

    let url = detail.copy_submission_url(&clipboard);
    assert_eq!(url.as_deref(), Some("https://api.test/api/feedback/submit/k1"));
    assert_eq!(clipboard.contents(), url);
    assert!(detail.is_copied());
    let notice = detail.notice().expect("copy notice");
    assert_eq!(notice.text, COPIED_MESSAGE);
    assert!(!notice.is_error());

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert!(detail.is_copied());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!detail.is_copied());
}

#[tokio::test]
async fn copy_failure_sets_notice() {
    let api = seeded_api();
    let mut detail = opened(&api, "1").await;

    let url = detail.copy_submission_url(&MemoryClipboard::unavailable());
    assert!(url.is_none());
    assert!(!detail.is_copied());
    assert_eq!(detail.notice().map(|n| n.text.as_str()), Some(COPY_FAILED_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn leave_cancels_copied_flash() {
    let api = seeded_api();
    let mut detail = opened(&api, "1").await;
    detail.copy_submission_url(&MemoryClipboard::new());
    assert!(detail.is_copied());

    detail.leave();
    assert!(!detail.is_copied());
}

#[test]
fn submission_url_needs_resolved_instance() {
    let mut detail = controller();
    assert_eq!(detail.submission_url(), None);

    let ticket = detail.begin("7");
    let instance = Instance {
        key: "abc def".to_string(),
        ..test_instance("7", "Spaced")
    };
    detail.resolve(ticket, Ok(instance));
    assert_eq!(
        detail.submission_url().as_deref(),
        Some("https://api.test/api/feedback/submit/abc def")
    );
}
