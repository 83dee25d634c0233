//! Per-instance feedback collection with a derived rating-filtered view.
//!
//! Items are kept in server order; the filtered view is recomputed on
//! every read and never re-sorted.

use feedback_api::service::FeedbackApi;
use feedback_core::models::{FeedbackItem, Instance, RatingFilter};

/// Items whose rating equals `rating`, or every item when `rating` is 0.
pub fn filter_by_rating(items: &[FeedbackItem], rating: i64) -> Vec<&FeedbackItem> {
    let filter = RatingFilter::from_value(rating);
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// `"1 item"` / `"N items"`.
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackViewModel {
    instance_key: Option<String>,
    items: Vec<FeedbackItem>,
    filter: RatingFilter,
}

impl FeedbackViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch feedback for `instance`. Transport failures leave the model
    /// holding no items. Returns the number of items fetched.
    pub async fn load_for(&mut self, api: &dyn FeedbackApi, instance: &Instance) -> usize {
        let items = api.list_feedback(&instance.key).await;
        self.replace(&instance.key, items);
        self.items.len()
    }

    /// Install items fetched for `key`. Switching to a different instance
    /// resets the rating filter.
    pub fn replace(&mut self, key: &str, items: Vec<FeedbackItem>) {
        if self.instance_key.as_deref() != Some(key) {
            self.filter = RatingFilter::All;
        }
        self.instance_key = Some(key.to_string());
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.instance_key = None;
        self.items.clear();
        self.filter = RatingFilter::All;
    }

    pub fn instance_key(&self) -> Option<&str> {
        self.instance_key.as_deref()
    }

    pub fn items(&self) -> &[FeedbackItem] {
        &self.items
    }

    pub fn filter(&self) -> RatingFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: RatingFilter) {
        self.filter = filter;
    }

    pub fn set_filter_value(&mut self, rating: i64) {
        self.filter = RatingFilter::from_value(rating);
    }

    pub fn visible(&self) -> Vec<&FeedbackItem> {
        filter_by_rating(&self.items, self.filter.value())
    }

    /// Number of items in the filtered view.
    pub fn count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .count()
    }

    pub fn count_label(&self) -> String {
        count_label(self.count())
    }

    /// Nothing to show under the current filter.
    pub fn is_empty_state(&self) -> bool {
        self.count() == 0
    }
}
