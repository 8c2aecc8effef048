//! Ports for the side effects an event can trigger.
//!
//! The dispatcher only talks to these traits. Real implementations live in
//! [`crate::platform`]; tests and the action-log mode swap in recorders.

use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::classifier::NotifyColor;
use crate::error::EffectError;
use crate::platform::{
    ActionLog, MarkerPause, Platform, SystemFocus, SystemNotifier, SystemPlayback, TerminalTitle,
};

/// Plays a sound file without waiting for it to finish.
pub trait Playback {
    fn play(&self, file: &Path, volume: f64, category: Category) -> Result<(), EffectError>;
}

/// Shows a desktop notification without waiting for it to close.
pub trait Notifier {
    fn send(&self, message: &str, title: &str, color: NotifyColor) -> Result<(), EffectError>;
}

/// Reports whether the user is already looking at the terminal.
pub trait FocusProbe {
    fn is_terminal_focused(&self) -> bool;
}

/// Sets the title of the invoking terminal.
pub trait TitleSink {
    fn set_title(&self, title: &str) -> Result<(), EffectError>;
}

/// Global mute switch.
pub trait PauseFlag {
    fn is_pause_active(&self) -> bool;
}

/// The full set of collaborators used by one dispatch.
pub struct Effects {
    pub playback: Box<dyn Playback>,
    pub notifier: Box<dyn Notifier>,
    pub focus: Box<dyn FocusProbe>,
    pub title: Box<dyn TitleSink>,
    pub pause: Box<dyn PauseFlag>,
}

impl Effects {
    /// Real OS effects for the detected platform.
    pub fn system(pause_marker: impl Into<PathBuf>) -> Self {
        let platform = Platform::detect();
        tracing::debug!(?platform, "using system effects");
        Self {
            playback: Box::new(SystemPlayback::new(platform)),
            notifier: Box::new(SystemNotifier::new(platform)),
            focus: Box::new(SystemFocus::new(platform)),
            title: Box::new(TerminalTitle),
            pause: Box::new(MarkerPause::new(pause_marker)),
        }
    }

    /// Effects that append JSON lines to `<dir>/actions.log` instead of
    /// touching the OS. The terminal is always reported as unfocused.
    pub fn action_log(dir: impl Into<PathBuf>, pause_marker: impl Into<PathBuf>) -> Self {
        let log = ActionLog::new(dir);
        Self {
            playback: Box::new(log.clone()),
            notifier: Box::new(log.clone()),
            focus: Box::new(log.clone()),
            title: Box::new(log),
            pause: Box::new(MarkerPause::new(pause_marker)),
        }
    }
}
