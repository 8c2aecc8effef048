//! # peon-ping Core Library
//!
//! Turns coding-agent lifecycle events into ambient feedback: a sound from the
//! active pack, a desktop notification and a terminal title. The host runs one
//! short-lived invocation per event; nothing here owns an event loop.
//!
//! ## Architecture
//!
//! - **Classifier**: pure mapping from event type to a [`Decision`]
//! - **Annoyance**: per-session sliding window over prompt timestamps
//! - **Picker**: random sound choice that never repeats back to back
//! - **Storage**: JSON config, state and pack manifests, all fail-open
//! - **Dispatch**: sequences the above and drives the effect ports
//! - **Platform**: detached OS helpers (afplay, PowerShell, paplay, osascript)
//!
//! ## Key Components
//!
//! - [`Dispatcher`]: one event in, effects out
//! - [`StateStore`]: load/save capability for [`PersistentState`]
//! - [`Effects`]: bundle of playback, notification, focus, title and pause ports

pub mod annoyance;
pub mod category;
pub mod classifier;
pub mod dispatch;
pub mod effects;
pub mod error;
pub mod events;
pub mod picker;
pub mod platform;
pub mod project;
pub mod storage;

pub use annoyance::{record_and_check, AnnoyanceDetector, AnnoyanceWindow, SlidingWindow};
pub use category::Category;
pub use classifier::{classify, Decision, NotifyColor};
pub use dispatch::{Clock, Dispatcher, Outcome, Report, SystemClock};
pub use effects::{Effects, FocusProbe, Notifier, PauseFlag, Playback, TitleSink};
pub use error::{CoreError, EffectError, StateError};
pub use events::{EventType, HookEvent, DEFAULT_SESSION_ID};
pub use picker::pick_sound;
pub use project::{sanitize_project_name, ProjectContext};
pub use storage::{
    CategoryToggles, Config, JsonStateStore, PeonPaths, PersistentState, SoundPack, StateStore,
};
