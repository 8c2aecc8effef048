mod config;
mod manifest;
mod state;

pub use config::{CategoryToggles, Config};
pub use manifest::{PackCategory, SoundEntry, SoundPack};
pub use state::{JsonStateStore, PersistentState, StateStore};

use std::path::{Component, Path, PathBuf};

/// Environment variables consulted, in order, for the peon directory.
pub const DIR_ENV_VARS: [&str; 2] = ["OPENCODE_PEON_DIR", "CLAUDE_PEON_DIR"];

/// Returns the peon directory.
///
/// `OPENCODE_PEON_DIR` wins over `CLAUDE_PEON_DIR`; without either the
/// directory is `~/.config/opencode/peon-ping/`. The directory is not created.
pub fn data_dir() -> PathBuf {
    DIR_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .find(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("opencode")
                .join("peon-ping")
        })
}

/// File layout under the peon directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeonPaths {
    root: PathBuf,
}

impl PeonPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at [`data_dir`].
    pub fn from_env() -> Self {
        Self::new(data_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn state(&self) -> PathBuf {
        self.root.join(".state.json")
    }

    /// Marker file whose presence mutes sounds and notifications.
    pub fn pause_marker(&self) -> PathBuf {
        self.root.join(".paused")
    }

    pub fn pack_dir(&self, pack: &str) -> PathBuf {
        self.root.join("packs").join(pack)
    }

    pub fn manifest(&self, pack: &str) -> PathBuf {
        self.pack_dir(pack).join("manifest.json")
    }

    /// Path of a manifest `file` under the pack's `sounds/` directory.
    ///
    /// `None` for absolute paths or any `..` component, which would leave the pack.
    pub fn sound(&self, pack: &str, file: &str) -> Option<PathBuf> {
        let file = Path::new(file);
        if file.as_os_str().is_empty()
            || !file.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.pack_dir(pack).join("sounds").join(file))
    }
}
