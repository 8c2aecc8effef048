use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::classifier::NotifyColor;
use crate::effects::{FocusProbe, Notifier, Playback, TitleSink};
use crate::error::EffectError;

pub const ACTION_LOG_FILE: &str = "actions.log";

/// Records effects as JSON lines instead of performing them.
#[derive(Debug, Clone)]
pub struct ActionLog {
    dir: PathBuf,
}

impl ActionLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(ACTION_LOG_FILE)
    }

    fn append(&self, entry: serde_json::Value) -> Result<(), EffectError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Parsed entries, oldest first. Missing log means no entries.
    pub fn entries(&self) -> Vec<serde_json::Value> {
        std::fs::read_to_string(self.path())
            .unwrap_or_default()
            .lines()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect()
    }
}

impl Playback for ActionLog {
    fn play(&self, file: &Path, volume: f64, category: Category) -> Result<(), EffectError> {
        self.append(json!({
            "type": "sound",
            "category": category,
            "file": file.to_string_lossy(),
            "volume": volume,
        }))
    }
}

impl Notifier for ActionLog {
    fn send(&self, message: &str, title: &str, color: NotifyColor) -> Result<(), EffectError> {
        self.append(json!({
            "type": "notify",
            "color": color,
            "message": message,
            "title": title,
        }))
    }
}

impl FocusProbe for ActionLog {
    fn is_terminal_focused(&self) -> bool {
        false
    }
}

impl TitleSink for ActionLog {
    fn set_title(&self, title: &str) -> Result<(), EffectError> {
        self.append(json!({ "type": "title", "title": title }))
    }
}
