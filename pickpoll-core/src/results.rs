//! Aggregated results handed to the presenter when a session completes.
use crate::catalog::Item;
use crate::numbers::percent;
use crate::state::SessionState;
use serde::{Deserialize, Serialize};

/// Parallel per-item arrays in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub labels: Vec<String>,
    pub clicks: Vec<u32>,
    pub views: Vec<u32>,
}

impl Aggregates {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        let mut aggregates = Self {
            labels: Vec::with_capacity(state.items.len()),
            clicks: Vec::with_capacity(state.items.len()),
            views: Vec::with_capacity(state.items.len()),
        };
        for item in &state.items {
            aggregates.labels.push(item.name.clone());
            aggregates.clicks.push(item.clicks);
            aggregates.views.push(item.times_shown);
        }
        aggregates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// One summary sentence per item.
    #[must_use]
    pub fn result_lines(&self) -> Vec<String> {
        self.labels
            .iter()
            .zip(self.views.iter().zip(&self.clicks))
            .map(|(name, (views, clicks))| {
                format!("{name} had {views} views and was clicked {clicks} times.")
            })
            .collect()
    }

    /// Series for the votes chart.
    #[must_use]
    pub fn votes_series(&self) -> ChartSeries {
        ChartSeries {
            title: "Votes".to_string(),
            labels: self.labels.clone(),
            values: self.clicks.clone(),
        }
    }

    /// Series for the views chart.
    #[must_use]
    pub fn views_series(&self) -> ChartSeries {
        ChartSeries {
            title: "Views".to_string(),
            labels: self.labels.clone(),
            values: self.views.clone(),
        }
    }

    /// Click-through percentage per item, in catalog order.
    #[must_use]
    pub fn click_rates(&self) -> Vec<u32> {
        self.clicks
            .iter()
            .zip(&self.views)
            .map(|(clicks, views)| percent(*clicks, *views))
            .collect()
    }
}

/// One bar chart's worth of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u32>,
}

impl ChartSeries {
    /// Largest value, used to scale bars; never 0 so scaling cannot divide by zero.
    #[must_use]
    pub fn scale_max(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0).max(1)
    }
}

/// Clicks as a percentage of views, 0 for an item never shown.
#[must_use]
pub fn click_rate_pct(item: &Item) -> u32 {
    percent(item.clicks, item.times_shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn sample_state() -> SessionState {
        let json = r#"{"totalClicks": 0, "items": [
            {"name": "bag", "imageRef": "./img/bag.jpg", "timesShown": 4, "clicks": 1},
            {"name": "pen", "imageRef": "./img/pen.jpg", "timesShown": 3, "clicks": 2},
            {"name": "shark", "imageRef": "./img/shark.jpg"}
        ]}"#;
        SessionState::from_json(json).unwrap()
    }

    #[test]
    fn aggregates_follow_catalog_order() {
        let aggregates = Aggregates::from_state(&sample_state());
        assert_eq!(aggregates.labels, vec!["bag", "pen", "shark"]);
        assert_eq!(aggregates.clicks, vec![1, 2, 0]);
        assert_eq!(aggregates.views, vec![4, 3, 0]);
        assert_eq!(aggregates.len(), 3);
    }

    #[test]
    fn result_lines_match_summary_format() {
        let lines = Aggregates::from_state(&sample_state()).result_lines();
        assert_eq!(lines[0], "bag had 4 views and was clicked 1 times.");
        assert_eq!(lines[2], "shark had 0 views and was clicked 0 times.");
    }

    #[test]
    fn chart_series_and_rates() {
        let aggregates = Aggregates::from_state(&sample_state());
        let votes = aggregates.votes_series();
        assert_eq!(votes.title, "Votes");
        assert_eq!(votes.values, vec![1, 2, 0]);
        assert_eq!(votes.scale_max(), 2);
        assert_eq!(aggregates.views_series().scale_max(), 4);
        assert_eq!(aggregates.click_rates(), vec![25, 67, 0]);

        let empty = Aggregates::from_state(&SessionState::new(Catalog::default_products()));
        assert_eq!(empty.votes_series().scale_max(), 1);
        assert!(!empty.is_empty());
    }

    #[test]
    fn click_rate_for_unseen_item_is_zero() {
        let state = sample_state();
        assert_eq!(click_rate_pct(state.item("shark").unwrap()), 0);
        assert_eq!(click_rate_pct(state.item("pen").unwrap()), 67);
    }
}
