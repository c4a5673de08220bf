//! Typed access to the three persisted blobs: questions, statistics and history.
//!
//! Each blob is a JSON document under its own key. An absent key reads as
//! `Ok(None)`; a present but unreadable blob is a `StorageError::Serialization`
//! so the caller can decide how to degrade.

use std::sync::Arc;

use qrlearn_core::model::{History, Question, Statistics};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{KeyValueStore, StorageError};

/// Default key prefix, matching the browser build's local storage keys.
pub const DEFAULT_KEY_PREFIX: &str = "qrlearning_advanced_";

/// Resolved key names for each blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub questions: String,
    pub statistics: String,
    pub history: String,
}

impl StorageKeys {
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            questions: format!("{prefix}questions"),
            statistics: format!("{prefix}statistics"),
            history: format!("{prefix}history"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(ser)
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(format!("{key}: {e}")))
}

/// Persistence gateway over any [`KeyValueStore`].
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl Gateway {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(key).await? {
            Some(raw) => decode(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Load the stored question collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or the blob cannot be decoded.
    pub async fn load_questions(&self) -> Result<Option<Vec<Question>>, StorageError> {
        self.load(&self.keys.questions).await
    }

    /// Replace the stored question collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let raw = encode(questions)?;
        self.store.put(&self.keys.questions, &raw).await?;
        tracing::debug!(key = %self.keys.questions, count = questions.len(), "questions saved");
        Ok(())
    }

    /// Load stored statistics. Fields missing from the blob take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or the blob cannot be decoded.
    pub async fn load_statistics(&self) -> Result<Option<Statistics>, StorageError> {
        self.load(&self.keys.statistics).await
    }

    /// Load the stored history, capped to the most recent entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or the blob cannot be decoded.
    pub async fn load_history(&self) -> Result<Option<History>, StorageError> {
        self.load(&self.keys.history).await
    }

    /// Store statistics and history together so a completion is never half-recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the batch write fails; in that case
    /// neither blob has changed.
    pub async fn save_records(
        &self,
        statistics: &Statistics,
        history: &History,
    ) -> Result<(), StorageError> {
        let entries = vec![
            (self.keys.statistics.clone(), encode(statistics)?),
            (self.keys.history.clone(), encode(history)?),
        ];
        self.store.put_many(&entries).await?;
        tracing::debug!(
            completions = statistics.total_completions,
            history = history.len(),
            "records saved"
        );
        Ok(())
    }
}
