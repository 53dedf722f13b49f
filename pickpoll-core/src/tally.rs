//! Durable per-item counters.
use crate::catalog::{Catalog, Item};
use crate::config::MIN_CATALOG_LEN;
use crate::state::SessionState;
use crate::storage::{BlobStore, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("unknown item '{id}'")]
    UnknownItem { id: String },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Where the hydrated state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// A valid snapshot was found under the key.
    Restored,
    /// Nothing was stored; the fallback catalog was seeded.
    Seeded,
    /// A snapshot was present but unreadable or too small to vote on; the
    /// fallback catalog was seeded.
    Recovered,
}

/// Counter store that rewrites the full snapshot after every mutation.
#[derive(Debug)]
pub struct TallyStore<S> {
    state: SessionState,
    storage: S,
    key: String,
}

impl<S: BlobStore> TallyStore<S> {
    /// Load the snapshot under `key`, or seed `fallback` when it is absent,
    /// malformed, or holds fewer than [`MIN_CATALOG_LEN`] items. Nothing is
    /// written until the first mutation.
    pub fn hydrate(
        storage: S,
        key: impl Into<String>,
        fallback: impl FnOnce() -> Catalog,
    ) -> (Self, SnapshotOrigin) {
        let key = key.into();
        let (state, origin) = match storage.get(&key) {
            Ok(Some(blob)) => match SessionState::from_json(&blob) {
                Ok(state) if state.items.len() >= MIN_CATALOG_LEN => {
                    (state, SnapshotOrigin::Restored)
                }
                Ok(state) => {
                    log::warn!(
                        "discarding snapshot under '{key}': {} item(s) cannot fill a round",
                        state.items.len()
                    );
                    (SessionState::new(fallback()), SnapshotOrigin::Recovered)
                }
                Err(err) => {
                    log::warn!("discarding unreadable snapshot under '{key}': {err}");
                    (SessionState::new(fallback()), SnapshotOrigin::Recovered)
                }
            },
            Ok(None) => (SessionState::new(fallback()), SnapshotOrigin::Seeded),
            Err(err) => {
                log::warn!("snapshot read failed for '{key}', starting fresh: {err}");
                (SessionState::new(fallback()), SnapshotOrigin::Recovered)
            }
        };
        (
            Self {
                state,
                storage,
                key,
            },
            origin,
        )
    }

    /// Wrap an explicit state without reading storage.
    pub fn with_state(storage: S, key: impl Into<String>, state: SessionState) -> Self {
        Self {
            state,
            storage,
            key: key.into(),
        }
    }

    /// Increment `timesShown` for an item and persist.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown item (nothing changes) or a failed write.
    pub fn record_shown(&mut self, id: &str) -> Result<(), TallyError> {
        let index = self.index_of(id)?;
        self.record_shown_at(index)
    }

    /// Increment `clicks` for an item and the session click counter, then persist.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown item (nothing changes) or a failed write.
    pub fn record_click(&mut self, id: &str) -> Result<(), TallyError> {
        let index = self.index_of(id)?;
        self.record_click_at(index)
    }

    /// Zero the session click counter and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn reset_session_counter(&mut self) -> Result<(), TallyError> {
        self.state.total_clicks = 0;
        self.persist()
    }

    pub(crate) fn record_shown_at(&mut self, index: usize) -> Result<(), TallyError> {
        let item = self.item_mut(index)?;
        item.times_shown = item.times_shown.saturating_add(1);
        self.persist()
    }

    pub(crate) fn record_click_at(&mut self, index: usize) -> Result<(), TallyError> {
        let item = self.item_mut(index)?;
        item.clicks = item.clicks.saturating_add(1);
        self.state.total_clicks = self.state.total_clicks.saturating_add(1);
        self.persist()
    }

    /// Write the current snapshot under the configured key.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn persist(&self) -> Result<(), TallyError> {
        let blob = self.state.to_json()?;
        self.storage.set(&self.key, &blob)?;
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, TallyError> {
        self.state
            .items
            .position(id)
            .ok_or_else(|| TallyError::UnknownItem { id: id.to_string() })
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut Item, TallyError> {
        self.state
            .items
            .get_mut(index)
            .ok_or_else(|| TallyError::UnknownItem {
                id: format!("#{index}"),
            })
    }
}

impl<S> TallyStore<S> {
    /// Owned copy of the full state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        self.state.fingerprint()
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}
