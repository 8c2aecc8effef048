//! Cross-invocation state.
//!
//! A single small JSON file holding the last sound played per category and the
//! recent prompt timestamps per session. Loading never fails; saving is the
//! one place in the hook where an error is allowed to propagate.
//!
//! There is no locking. Two overlapping invocations may both read the same
//! state and the later write wins.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::category::Category;
use crate::error::StateError;

/// Persistent hook state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistentState {
    /// Last chosen sound file per category key.
    #[serde(default, deserialize_with = "de_last_played")]
    pub last_played: BTreeMap<String, String>,
    /// Recent prompt times (epoch seconds) per session id.
    #[serde(default, deserialize_with = "de_prompt_timestamps")]
    pub prompt_timestamps: BTreeMap<String, Vec<f64>>,
    /// Keys written by other tools sharing the file, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersistentState {
    pub fn last_played(&self, category: Category) -> Option<&str> {
        self.last_played.get(category.as_str()).map(String::as_str)
    }

    pub fn set_last_played(&mut self, category: Category, file: impl Into<String>) {
        self.last_played.insert(category.as_str().to_string(), file.into());
    }

    pub fn prompt_timestamps(&self, session_id: &str) -> &[f64] {
        self.prompt_timestamps
            .get(session_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn de_last_played<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(file) => Some((key, file)),
            _ => None,
        })
        .collect())
}

fn de_prompt_timestamps<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<f64>>, D::Error> {
    // Older writers stored a bare array here; that shape is discarded.
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(session, value)| match value {
            Value::Array(items) => Some((
                session,
                items.iter().filter_map(Value::as_f64).collect(),
            )),
            _ => None,
        })
        .collect())
}

/// Load/save capability for [`PersistentState`].
pub trait StateStore {
    /// Load state, returning an empty state when nothing usable is stored.
    fn load(&self) -> PersistentState;

    /// Persist state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or written.
    fn save(&self, state: &PersistentState) -> Result<(), StateError>;
}

/// [`StateStore`] backed by a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_failed(&self, source: std::io::Error) -> StateError {
        StateError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> PersistentState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return PersistentState::default(),
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "malformed state file, starting fresh"
            );
            PersistentState::default()
        })
    }

    fn save(&self, state: &PersistentState) -> Result<(), StateError> {
        let mut content = serde_json::to_string_pretty(state)?;
        content.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.write_failed(e))?;

        // Each writer gets its own temp file beside the target, then renames it
        // over the target. Readers never see a half-written file.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_failed(e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| self.write_failed(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_failed(e.error))?;

        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}
