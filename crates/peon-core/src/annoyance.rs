//! Sliding-window detection of rapid repeated prompts.
//!
//! Each prompt-like event appends its timestamp to the session's list after
//! pruning everything that has aged out of the window. The session counts as
//! annoyed while the pruned list, including the new entry, reaches the
//! threshold.
//!
//! Session keys are never evicted: a session that stops sending prompts keeps
//! its last window's worth of timestamps in the state file.

use crate::storage::PersistentState;

/// Window parameters, taken from config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnoyanceWindow {
    pub threshold: u32,
    pub window_secs: f64,
}

impl AnnoyanceWindow {
    pub fn new(threshold: u32, window_secs: f64) -> Self {
        Self {
            threshold,
            window_secs,
        }
    }
}

/// Record a prompt at `now` for `session_id` and report whether the session
/// has crossed the threshold.
///
/// Entries with `now - t >= window` are dropped, as are entries from the
/// future (a clock step backwards would otherwise keep them forever).
pub fn record_and_check(
    session_id: &str,
    now: f64,
    window: AnnoyanceWindow,
    state: &mut PersistentState,
) -> bool {
    let timestamps = state
        .prompt_timestamps
        .entry(session_id.to_string())
        .or_default();
    timestamps.retain(|t| *t <= now && now - t < window.window_secs);
    timestamps.push(now);

    let annoyed = timestamps.len() >= window.threshold as usize;
    tracing::debug!(
        session = session_id,
        in_window = timestamps.len(),
        threshold = window.threshold,
        annoyed,
        "recorded prompt"
    );
    annoyed
}

/// Capability the classifier consults for prompt-like events.
pub trait AnnoyanceDetector {
    /// Record one prompt for `session_id`; `true` if the session is now annoyed.
    fn record_prompt(&mut self, session_id: &str) -> bool;
}

/// [`AnnoyanceDetector`] over the persisted timestamp lists.
pub struct SlidingWindow<'a> {
    state: &'a mut PersistentState,
    now: f64,
    window: AnnoyanceWindow,
    recorded: bool,
}

impl<'a> SlidingWindow<'a> {
    pub fn new(state: &'a mut PersistentState, now: f64, window: AnnoyanceWindow) -> Self {
        Self {
            state,
            now,
            window,
            recorded: false,
        }
    }

    /// Whether any prompt was recorded, i.e. the state needs saving.
    pub fn recorded(&self) -> bool {
        self.recorded
    }
}

impl AnnoyanceDetector for SlidingWindow<'_> {
    fn record_prompt(&mut self, session_id: &str) -> bool {
        self.recorded = true;
        record_and_check(session_id, self.now, self.window, self.state)
    }
}
