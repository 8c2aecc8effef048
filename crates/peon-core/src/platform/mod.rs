//! OS adapters for the effect ports.
//!
//! Every external program is launched detached with null stdio and never
//! awaited, so an invocation returns without waiting on audio or banners.

mod action_log;
mod notify;
mod playback;
mod title;

pub use action_log::{ActionLog, ACTION_LOG_FILE};
pub use notify::{SystemFocus, SystemNotifier, TERMINAL_APPS};
pub use playback::SystemPlayback;
pub use title::{osc_title, TerminalTitle};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::effects::PauseFlag;
use crate::error::EffectError;

/// Host platform, as far as effects are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Wsl,
    Linux,
    Unknown,
}

impl Platform {
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "macos" => Self::Mac,
            "linux" => match std::fs::read_to_string("/proc/version") {
                Ok(version) => Self::from_proc_version(&version),
                Err(_) => Self::Linux,
            },
            _ => Self::Unknown,
        }
    }

    /// Classify a Linux kernel by its `/proc/version` line.
    pub fn from_proc_version(version: &str) -> Self {
        if version.to_lowercase().contains("microsoft") {
            Self::Wsl
        } else {
            Self::Linux
        }
    }
}

/// Pause switch backed by the presence of a marker file.
#[derive(Debug, Clone)]
pub struct MarkerPause {
    path: PathBuf,
}

impl MarkerPause {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PauseFlag for MarkerPause {
    fn is_pause_active(&self) -> bool {
        self.path.exists()
    }
}

/// Launch `program` and forget about it.
pub(crate) fn spawn_detached(program: &str, args: &[String]) -> Result<(), EffectError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Own process group, so the helper outlives a Ctrl-C aimed at the host.
        command.process_group(0);
    }

    command
        .spawn()
        .map(|_child| ())
        .map_err(|source| EffectError::SpawnFailed {
            program: program.to_string(),
            source,
        })
}

/// Run `program` to completion and return its trimmed stdout.
pub(crate) fn capture(program: &str, args: &[&str]) -> Result<String, EffectError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| EffectError::SpawnFailed {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(EffectError::BadOutput {
            program: program.to_string(),
            message: format!("exited with {}", output.status),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Quote a string as a double-quoted literal for AppleScript or PowerShell.
pub(crate) fn quoted(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text.replace('"', "")))
}
