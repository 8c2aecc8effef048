//! Sound pack manifests.
//!
//! A pack lives in `packs/<name>/` with a `manifest.json` listing sound files
//! per category and the files themselves under `sounds/`.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::category::Category;

/// One playable sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundEntry {
    /// File name relative to the pack's `sounds/` directory.
    pub file: String,
    /// Optional caption, e.g. the line being spoken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackCategory {
    #[serde(default, deserialize_with = "de_sounds")]
    pub sounds: Vec<SoundEntry>,
}

/// Parsed `manifest.json`.
///
/// Parsing is per entry: a malformed category or sound is dropped and the
/// rest of the pack stays playable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundPack {
    #[serde(default, deserialize_with = "de_name")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_categories")]
    pub categories: BTreeMap<String, PackCategory>,
}

fn de_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => Some(name),
        _ => None,
    })
}

fn de_categories<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, PackCategory>, D::Error> {
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(_) => PackCategory::deserialize(value).ok().map(|c| (key, c)),
            _ => None,
        })
        .collect())
}

fn de_sounds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SoundEntry>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| {
            let file = item.get("file")?.as_str()?;
            Some(SoundEntry {
                file: file.to_string(),
                line: item.get("line").and_then(Value::as_str).map(str::to_string),
            })
        })
        .collect())
}

impl SoundPack {
    /// Load a manifest, treating any failure as an empty pack.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "no manifest, pack is silent"
                );
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "malformed manifest, pack is silent"
            );
            Self::default()
        })
    }

    /// Sounds available for a category, empty if none are listed.
    pub fn sounds(&self, category: Category) -> &[SoundEntry] {
        self.categories
            .get(category.as_str())
            .map(|c| c.sounds.as_slice())
            .unwrap_or_default()
    }
}
