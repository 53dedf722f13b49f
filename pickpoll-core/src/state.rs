//! Persisted session snapshot.
use crate::catalog::{Catalog, Item};
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Full durable state: the catalog with lifetime counters plus the click
/// counter of the session cycle in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub total_clicks: u32,
    pub items: Catalog,
}

impl SessionState {
    /// Fresh state over a catalog, session counter at zero.
    #[must_use]
    pub const fn new(items: Catalog) -> Self {
        Self {
            total_clicks: 0,
            items,
        }
    }

    /// Decode a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, missing required fields, or a
    /// catalog that breaks membership invariants.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Encode for persistence. Field order is fixed, so equal states encode
    /// to identical bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// XXH64 digest of the encoded snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&bytes);
        hasher.finish()
    }

    #[must_use]
    pub fn total_item_clicks(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.clicks)).sum()
    }

    #[must_use]
    pub fn total_item_views(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.times_shown)).sum()
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.position(id).and_then(|idx| self.items.get(idx))
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Catalog::default_products())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_with_wire_names() {
        let state = SessionState::default();
        let json = state.to_json().unwrap();
        assert!(json.starts_with(r#"{"totalClicks":0,"items":[{"name":"bag","imageRef":"./img/bag.jpg","timesShown":0,"clicks":0}"#));
        assert_eq!(SessionState::from_json(&json).unwrap(), state);
        assert_eq!(state.to_json().unwrap(), json);
        assert_eq!(state.fingerprint(), SessionState::default().fingerprint());
    }

    #[test]
    fn malformed_snapshots_are_rejected() {
        assert!(SessionState::from_json("").is_err());
        assert!(SessionState::from_json("{").is_err());
        assert!(SessionState::from_json(r#"{"items": []}"#).is_err());
        assert!(SessionState::from_json(r#"{"totalClicks": 3}"#).is_err());
        assert!(SessionState::from_json(r#"{"totalClicks": 3, "items": []}"#).is_err());
        assert!(
            SessionState::from_json(
                r#"{"totalClicks": 1, "items": [{"name": "a", "imageRef": "a.jpg"}, {"name": "a", "imageRef": "b.jpg"}]}"#
            )
            .is_err()
        );
    }

    #[test]
    fn missing_item_counters_default_to_zero() {
        let state = SessionState::from_json(
            r#"{"totalClicks": 2, "items": [{"name": "a", "imageRef": "a.jpg", "clicks": 2}, {"name": "b", "imageRef": "b.jpg"}]}"#,
        )
        .unwrap();
        assert_eq!(state.total_clicks, 2);
        assert_eq!(state.item("b").map(|i| i.times_shown), Some(0));
        assert_eq!(state.total_item_clicks(), 2);
        assert_eq!(state.total_item_views(), 0);
        assert!(state.item("zzz").is_none());
    }
}
