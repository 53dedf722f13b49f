//! `window.localStorage` backend for the session snapshot.

use crate::dom;
use pickpoll_core::{BlobStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum LocalStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("localStorage {op} failed for '{key}': {message}")]
    Operation {
        op: &'static str,
        key: String,
        message: String,
    },
}

impl From<LocalStorageError> for StorageError {
    fn from(err: LocalStorageError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Browser-backed blob store. The storage handle is resolved on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn handle() -> Result<web_sys::Storage, LocalStorageError> {
        dom::local_storage()
            .map_err(|err| LocalStorageError::Unavailable(dom::js_error_message(&err)))
    }

    fn op_error(op: &'static str, key: &str, err: &wasm_bindgen::JsValue) -> LocalStorageError {
        LocalStorageError::Operation {
            op,
            key: key.to_string(),
            message: dom::js_error_message(err),
        }
    }
}

impl BlobStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = Self::handle()?;
        storage
            .get_item(key)
            .map_err(|err| Self::op_error("read", key, &err).into())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::handle()?;
        storage
            .set_item(key, value)
            .map_err(|err| Self::op_error("write", key, &err).into())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let storage = Self::handle()?;
        storage
            .remove_item(key)
            .map_err(|err| Self::op_error("delete", key, &err).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_storage_errors_map_to_backend() {
        let err: StorageError = LocalStorageError::Unavailable("no window".into()).into();
        assert!(matches!(err, StorageError::Backend(ref msg) if msg.contains("no window")));

        let err: StorageError = LocalStorageError::Operation {
            op: "write",
            key: "pickpoll.session".into(),
            message: "QuotaExceededError".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "storage backend error: localStorage write failed for 'pickpoll.session': QuotaExceededError"
        );
    }
}
