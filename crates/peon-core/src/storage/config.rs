//! JSON-based hook configuration.
//!
//! Stores user preferences including:
//! - Global on/off switch
//! - Per-category sound toggles
//! - Annoyance detection threshold and window
//! - Playback volume and active sound pack
//!
//! Configuration is read from `<peon dir>/config.json` on every invocation and
//! never written by the hook. Every key is optional and values are accepted
//! leniently: booleans may be given as strings, numbers as numeric strings.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::category::Category;

/// Per-category enable map. Categories missing from the map are enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryToggles(BTreeMap<Category, bool>);

impl CategoryToggles {
    pub fn is_enabled(&self, category: Category) -> bool {
        self.0.get(&category).copied().unwrap_or(true)
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        self.0.insert(category, enabled);
    }

    /// Fully populated map over [`Category::all`].
    pub fn resolved(&self) -> BTreeMap<Category, bool> {
        Category::all()
            .iter()
            .map(|c| (*c, self.is_enabled(*c)))
            .collect()
    }
}

impl<'de> Deserialize<'de> for CategoryToggles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let mut toggles = CategoryToggles::default();
        let Value::Object(entries) = raw else {
            return Ok(toggles);
        };
        for (key, value) in entries {
            // Unknown category keys are tolerated and dropped.
            let Ok(category) = key.parse::<Category>() else {
                continue;
            };
            // Null means "not set"; anything else is enabled only if it reads as "true".
            if !value.is_null() {
                toggles.set(category, value_as_text(&value).eq_ignore_ascii_case("true"));
            }
        }
        Ok(toggles)
    }
}

/// Hook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true", deserialize_with = "de_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub categories: CategoryToggles,
    #[serde(default = "default_annoyed_threshold", deserialize_with = "de_threshold")]
    pub annoyed_threshold: u32,
    #[serde(default = "default_annoyed_window", deserialize_with = "de_window")]
    pub annoyed_window_seconds: f64,
    #[serde(default = "default_volume", deserialize_with = "de_volume")]
    pub volume: f64,
    #[serde(default = "default_active_pack", deserialize_with = "de_pack")]
    pub active_pack: String,
}

fn default_true() -> bool {
    true
}
fn default_annoyed_threshold() -> u32 {
    3
}
fn default_annoyed_window() -> f64 {
    10.0
}
fn default_volume() -> f64 {
    0.5
}
fn default_active_pack() -> String {
    "peon".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            categories: CategoryToggles::default(),
            annoyed_threshold: default_annoyed_threshold(),
            annoyed_window_seconds: default_annoyed_window(),
            volume: default_volume(),
            active_pack: default_active_pack(),
        }
    }
}

impl Config {
    /// Parse configuration from JSON text.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load from disk or return default.
    ///
    /// A missing file is the normal case for a fresh install. A malformed file
    /// is logged and ignored.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "no config file, using defaults"
                );
                return Self::default();
            }
        };
        match Self::from_json(&content) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "malformed config, using defaults"
                );
                Self::default()
            }
        }
    }
}

/// Text form of a JSON scalar, as used for boolean-like comparisons.
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn de_enabled<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(true);
    }
    // Only an explicit "false" (any case) turns the hook off.
    Ok(!value_as_text(&value).eq_ignore_ascii_case("false"))
}

fn de_threshold<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value_as_f64(&value) {
        Some(n) if n < 1.0 => 1,
        Some(n) if n >= u32::MAX as f64 => u32::MAX,
        Some(n) => n.ceil() as u32,
        None => default_annoyed_threshold(),
    })
}

fn de_window<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value)
        .filter(|n| *n > 0.0)
        .unwrap_or_else(default_annoyed_window))
}

fn de_volume<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value)
        .map(|n| n.clamp(0.0, 1.0))
        .unwrap_or_else(default_volume))
}

fn de_pack<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::String(name) = value else {
        return Ok(default_active_pack());
    };
    // Keep only the final path component so a pack name cannot leave packs/.
    let name = Path::new(&name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "..")
        .map(str::to_string);
    match name {
        Some(name) => Ok(name),
        None => Ok(default_active_pack()),
    }
}
