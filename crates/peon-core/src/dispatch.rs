//! Per-invocation orchestration.
//!
//! [`Dispatcher::handle`] processes exactly one event:
//!
//! 1. load config and stop if the hook is disabled
//! 2. drop unknown event types
//! 3. read the pause flag and load state
//! 4. classify (prompt events may record a timestamp)
//! 5. pick a sound unless paused or the category is empty
//! 6. save state once, only if something changed
//! 7. set the title, play the sound, send the notification
//!
//! Effects in step 7 are independent: one failing is logged and the rest still
//! run. Only a failed state write is returned as an error.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;

use crate::annoyance::{AnnoyanceWindow, SlidingWindow};
use crate::classifier::{classify, Decision};
use crate::effects::Effects;
use crate::error::Result;
use crate::events::HookEvent;
use crate::picker::pick_sound;
use crate::storage::{Config, JsonStateStore, PeonPaths, SoundPack, StateStore};

/// Source of "now" in epoch seconds.
pub trait Clock {
    fn now_secs(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// `enabled` is false; nothing was read beyond config.
    Disabled,
    /// Unknown event type; nothing was touched.
    Ignored { kind: String },
    Handled(Report),
}

/// Details of a handled event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub decision: Decision,
    pub paused: bool,
    /// Resolved sound path, whether or not the file existed.
    pub sound: Option<PathBuf>,
    pub state_saved: bool,
    pub title_set: bool,
    pub played: bool,
    pub notified: bool,
}

/// Runs events through classification, state and effects.
pub struct Dispatcher<S = JsonStateStore> {
    paths: PeonPaths,
    project: String,
    store: S,
    effects: Effects,
    clock: Box<dyn Clock>,
    rng: Box<dyn RngCore>,
}

impl Dispatcher<JsonStateStore> {
    /// Dispatcher over the state file in `paths`, using the system clock.
    pub fn new(paths: PeonPaths, project: impl Into<String>, effects: Effects) -> Self {
        let store = JsonStateStore::new(paths.state());
        Self {
            paths,
            project: project.into(),
            store,
            effects,
            clock: Box::new(SystemClock),
            rng: Box::new(StdRng::from_entropy()),
        }
    }
}

impl<S: StateStore> Dispatcher<S> {
    /// Replace the state store.
    pub fn with_store<T: StateStore>(self, store: T) -> Dispatcher<T> {
        Dispatcher {
            paths: self.paths,
            project: self.project,
            store,
            effects: self.effects,
            clock: self.clock,
            rng: self.rng,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Process one event.
    ///
    /// # Errors
    ///
    /// Returns an error only if the state needed saving and could not be written.
    pub fn handle(&mut self, event: &HookEvent) -> Result<Outcome> {
        let config = Config::load(&self.paths.config());
        if !config.enabled {
            tracing::debug!("hook disabled");
            return Ok(Outcome::Disabled);
        }

        let Some(event_type) = event.event_type() else {
            tracing::debug!(kind = %event.kind, "ignoring unknown event");
            return Ok(Outcome::Ignored {
                kind: event.kind.clone(),
            });
        };

        let paused = self.effects.pause.is_pause_active();
        let mut state = self.store.load();

        let window = AnnoyanceWindow::new(config.annoyed_threshold, config.annoyed_window_seconds);
        let mut detector = SlidingWindow::new(&mut state, self.clock.now_secs(), window);
        let decision = classify(
            event_type,
            &event.session_id,
            &self.project,
            &config.categories,
            &mut detector,
        );
        let mut dirty = detector.recorded();

        let mut sound = None;
        if let Some(category) = decision.category.filter(|_| !paused) {
            let pack = SoundPack::load(&self.paths.manifest(&config.active_pack));
            if let Some(file) = pick_sound(category, &mut state, &pack, &mut *self.rng) {
                sound = self.paths.sound(&config.active_pack, &file);
                if sound.is_none() {
                    tracing::warn!(file = %file, "sound path leaves the pack, skipping playback");
                }
                dirty = true;
            }
        }

        if dirty {
            self.store.save(&state)?;
        }

        let title = decision.title(&self.project);
        let mut title_set = false;
        if !decision.status.is_empty() {
            match self.effects.title.set_title(&title) {
                Ok(()) => title_set = true,
                Err(err) => tracing::warn!(error = %err, "failed to set terminal title"),
            }
        }

        let mut played = false;
        if let (Some(path), Some(category)) = (&sound, decision.category) {
            if path.exists() {
                match self.effects.playback.play(path, config.volume, category) {
                    Ok(()) => played = true,
                    Err(err) => {
                        tracing::warn!(error = %err, path = %path.display(), "failed to play sound")
                    }
                }
            } else {
                tracing::debug!(path = %path.display(), "sound file missing, skipping playback");
            }
        }

        let mut notified = false;
        if decision.notify && !paused && !self.effects.focus.is_terminal_focused() {
            match self
                .effects
                .notifier
                .send(&decision.message, &title, decision.notify_color)
            {
                Ok(()) => notified = true,
                Err(err) => tracing::warn!(error = %err, "failed to send notification"),
            }
        }

        tracing::debug!(
            event = event_type.as_str(),
            session = %event.session_id,
            category = ?decision.category,
            paused,
            saved = dirty,
            "event handled"
        );

        Ok(Outcome::Handled(Report {
            decision,
            paused,
            sound,
            state_saved: dirty,
            title_set,
            played,
            notified,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::classifier::NotifyColor;
    use crate::error::{CoreError, StateError};
    use crate::platform::ActionLog;
    use crate::storage::PersistentState;
    use rand_pcg::Mcg128Xsl64;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone)]
    struct TestClock(Rc<Cell<f64>>);

    impl Clock for TestClock {
        fn now_secs(&self) -> f64 {
            self.0.get()
        }
    }

    /// Wraps the JSON store and counts writes.
    struct CountingStore {
        inner: JsonStateStore,
        saves: Rc<Cell<usize>>,
    }

    impl StateStore for CountingStore {
        fn load(&self) -> PersistentState {
            self.inner.load()
        }

        fn save(&self, state: &PersistentState) -> std::result::Result<(), StateError> {
            self.saves.set(self.saves.get() + 1);
            self.inner.save(state)
        }
    }

    struct Harness {
        _dir: TempDir,
        paths: PeonPaths,
        log: ActionLog,
        clock: Rc<Cell<f64>>,
        saves: Rc<Cell<usize>>,
        dispatcher: Dispatcher<CountingStore>,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let paths = PeonPaths::new(dir.path().join("peon"));
            let log_dir = dir.path().join("test-log");
            let clock = Rc::new(Cell::new(1_000.0));
            let saves = Rc::new(Cell::new(0));
            let store = CountingStore {
                inner: JsonStateStore::new(paths.state()),
                saves: saves.clone(),
            };
            let dispatcher = Dispatcher::new(
                paths.clone(),
                "myproj",
                Effects::action_log(&log_dir, paths.pause_marker()),
            )
            .with_store(store)
            .with_clock(TestClock(clock.clone()))
            .with_rng(Mcg128Xsl64::seed_from_u64(7));
            Self {
                _dir: dir,
                paths,
                log: ActionLog::new(log_dir),
                clock,
                saves,
                dispatcher,
            }
        }

        fn write_config(&self, json: &str) {
            std::fs::create_dir_all(self.paths.root()).unwrap();
            std::fs::write(self.paths.config(), json).unwrap();
        }

        /// Install a one-category pack where every listed file exists on disk.
        fn install_pack(&self, category: Category, files: &[&str]) {
            for file in files {
                let path = self.paths.sound("peon", file).unwrap();
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(path, b"RIFF").unwrap();
            }
            let sounds: Vec<_> = files
                .iter()
                .map(|f| serde_json::json!({ "file": f }))
                .collect();
            let manifest = serde_json::json!({
                "categories": { category.as_str(): { "sounds": sounds } }
            });
            std::fs::create_dir_all(self.paths.pack_dir("peon")).unwrap();
            std::fs::write(self.paths.manifest("peon"), manifest.to_string()).unwrap();
        }

        fn handle(&mut self, kind: &str) -> Outcome {
            self.dispatcher.handle(&HookEvent::new(kind, "s1")).unwrap()
        }

        fn report(&mut self, kind: &str) -> Report {
            match self.handle(kind) {
                Outcome::Handled(report) => report,
                other => panic!("expected handled outcome, got {other:?}"),
            }
        }

        fn action_types(&self) -> Vec<String> {
            self.log
                .entries()
                .iter()
                .map(|e| e["type"].as_str().unwrap().to_string())
                .collect()
        }
    }

    #[test]
    fn unknown_event_touches_nothing() {
        let mut h = Harness::new();
        h.install_pack(Category::Complete, &["a.wav"]);
        let outcome = h.handle("session.compacted");
        assert_eq!(
            outcome,
            Outcome::Ignored {
                kind: "session.compacted".into()
            }
        );
        assert_eq!(h.saves.get(), 0);
        assert!(!h.paths.state().exists());
        assert!(h.log.entries().is_empty());
    }

    #[test]
    fn disabled_hook_does_nothing() {
        let mut h = Harness::new();
        h.install_pack(Category::Complete, &["a.wav"]);
        h.write_config(r#"{"enabled": "False"}"#);
        for kind in ["session.idle", "tui.prompt.append", "session.created"] {
            assert_eq!(h.handle(kind), Outcome::Disabled);
        }
        assert_eq!(h.saves.get(), 0);
        assert!(!h.paths.state().exists());
        assert!(h.log.entries().is_empty());
    }

    #[test]
    fn session_idle_plays_titles_and_notifies() {
        let mut h = Harness::new();
        h.install_pack(Category::Complete, &["done.wav"]);
        let report = h.report("session.idle");

        assert_eq!(report.decision.category, Some(Category::Complete));
        assert_eq!(report.sound, h.paths.sound("peon", "done.wav"));
        assert!(report.state_saved && report.title_set && report.played && report.notified);
        assert_eq!(h.saves.get(), 1);
        assert_eq!(h.action_types(), vec!["title", "sound", "notify"]);

        let entries = h.log.entries();
        assert_eq!(entries[0]["title"], "* myproj: done");
        assert_eq!(entries[1]["category"], "complete");
        assert_eq!(entries[1]["volume"], 0.5);
        assert_eq!(entries[2]["message"], "myproj - Task complete");
        assert_eq!(entries[2]["title"], "* myproj: done");
        assert_eq!(entries[2]["color"], NotifyColor::Blue.as_str());

        let state = JsonStateStore::new(h.paths.state()).load();
        assert_eq!(state.last_played(Category::Complete), Some("done.wav"));
    }

    #[test]
    fn permission_replied_leaves_state_file_untouched() {
        let mut h = Harness::new();
        std::fs::create_dir_all(h.paths.root()).unwrap();
        let original = "{\n  \"last_played\": {\n    \"greeting\": \"x.wav\"\n  }\n}\n";
        std::fs::write(h.paths.state(), original).unwrap();
        let modified = std::fs::metadata(h.paths.state()).unwrap().modified().unwrap();

        let report = h.report("permission.replied");
        assert_eq!(report.decision.status, "working");
        assert!(!report.state_saved);
        assert_eq!(h.saves.get(), 0);
        assert_eq!(std::fs::read_to_string(h.paths.state()).unwrap(), original);
        assert_eq!(
            std::fs::metadata(h.paths.state()).unwrap().modified().unwrap(),
            modified
        );
        assert_eq!(h.action_types(), vec!["title"]);
        assert_eq!(h.log.entries()[0]["title"], "myproj: working");
    }

    #[test]
    fn disabled_category_still_updates_title_and_notifies() {
        let mut h = Harness::new();
        h.install_pack(Category::Complete, &["done.wav"]);
        h.write_config(r#"{"categories": {"complete": false}}"#);
        let report = h.report("session.idle");
        assert_eq!(report.decision.category, None);
        assert_eq!(report.sound, None);
        assert!(!report.state_saved);
        assert_eq!(h.action_types(), vec!["title", "notify"]);
    }

    #[test]
    fn pause_mutes_sound_and_notification_only() {
        let mut h = Harness::new();
        h.install_pack(Category::Permission, &["ask.wav"]);
        std::fs::write(h.paths.pause_marker(), "").unwrap();
        let report = h.report("permission.asked");
        assert!(report.paused);
        assert_eq!(report.decision.category, Some(Category::Permission));
        assert_eq!(report.sound, None);
        assert!(!report.notified);
        assert!(!report.state_saved);
        assert_eq!(h.action_types(), vec!["title"]);
        assert_eq!(h.log.entries()[0]["title"], "* myproj: needs approval");
    }

    #[test]
    fn rapid_prompts_become_annoyed() {
        let mut h = Harness::new();
        h.install_pack(Category::Annoyed, &["grr.wav"]);

        for (i, expected) in [None, None, Some(Category::Annoyed)].into_iter().enumerate() {
            h.clock.set(1_000.0 + i as f64);
            let report = h.report("tui.prompt.append");
            assert_eq!(report.decision.category, expected);
            assert!(report.state_saved);
        }
        assert_eq!(h.saves.get(), 3);
        assert_eq!(h.action_types(), vec!["title", "title", "title", "sound"]);

        let state = JsonStateStore::new(h.paths.state()).load();
        assert_eq!(state.prompt_timestamps("s1"), &[1_000.0, 1_001.0, 1_002.0]);
        assert_eq!(state.last_played(Category::Annoyed), Some("grr.wav"));
    }

    #[test]
    fn spaced_prompts_are_not_annoyed() {
        let mut h = Harness::new();
        h.write_config(r#"{"annoyed_threshold": 2, "annoyed_window_seconds": 10}"#);
        h.clock.set(0.0);
        assert_eq!(h.report("tui.command.execute").decision.category, None);
        h.clock.set(15.0);
        assert_eq!(h.report("tui.command.execute").decision.category, None);
        let state = JsonStateStore::new(h.paths.state()).load();
        assert_eq!(state.prompt_timestamps("s1"), &[15.0]);
    }

    #[test]
    fn prompts_with_annoyed_disabled_do_not_write_state() {
        let mut h = Harness::new();
        h.write_config(r#"{"categories": {"annoyed": "false"}}"#);
        let report = h.report("tui.prompt.append");
        assert!(!report.state_saved);
        assert!(!h.paths.state().exists());
    }

    #[test]
    fn missing_sound_file_is_skipped_but_choice_is_saved() {
        let mut h = Harness::new();
        h.install_pack(Category::Greeting, &["hello.wav"]);
        std::fs::remove_file(h.paths.sound("peon", "hello.wav").unwrap()).unwrap();
        let report = h.report("session.created");
        assert!(report.sound.is_some());
        assert!(!report.played);
        assert!(report.state_saved);
        assert!(!report.notified);
        assert_eq!(h.action_types(), vec!["title"]);
    }

    #[test]
    fn manifest_paths_outside_the_pack_are_not_played() {
        let mut h = Harness::new();
        let outside = h._dir.path().join("outside.wav");
        std::fs::write(&outside, b"RIFF").unwrap();
        let manifest = serde_json::json!({
            "categories": { "greeting": { "sounds": [ { "file": outside.to_string_lossy() } ] } }
        });
        std::fs::create_dir_all(h.paths.pack_dir("peon")).unwrap();
        std::fs::write(h.paths.manifest("peon"), manifest.to_string()).unwrap();

        let report = h.report("session.created");
        assert_eq!(report.sound, None);
        assert!(!report.played);
        assert_eq!(h.action_types(), vec!["title"]);
    }

    #[test]
    fn greeting_without_pack_is_silent() {
        let mut h = Harness::new();
        let report = h.report("session.created");
        assert_eq!(report.decision.category, Some(Category::Greeting));
        assert_eq!(report.sound, None);
        assert!(!report.state_saved);
        assert_eq!(h.action_types(), vec!["title"]);
    }

    #[test]
    fn consecutive_events_do_not_repeat_sounds() {
        let mut h = Harness::new();
        h.install_pack(Category::Error, &["e1.wav", "e2.wav", "e3.wav"]);
        let mut previous: Option<PathBuf> = None;
        for _ in 0..10 {
            let sound = h.report("session.error").sound;
            assert!(sound.is_some());
            assert_ne!(sound, previous);
            previous = sound;
        }
    }

    #[test]
    fn active_pack_selects_directory() {
        let mut h = Harness::new();
        h.write_config(r#"{"active_pack": "glados", "volume": 0.25}"#);
        let path = h.paths.sound("glados", "hi.wav").unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"RIFF").unwrap();
        std::fs::write(
            h.paths.manifest("glados"),
            r#"{"categories": {"greeting": {"sounds": [{"file": "hi.wav"}]}}}"#,
        )
        .unwrap();

        let report = h.report("session.created");
        assert_eq!(report.sound, Some(path));
        assert!(report.played);
        assert_eq!(h.log.entries()[1]["volume"], 0.25);
    }

    #[test]
    fn unwritable_state_propagates() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let paths = PeonPaths::new(&blocker);
        let mut dispatcher = Dispatcher::new(
            paths.clone(),
            "p",
            Effects::action_log(dir.path().join("log"), paths.pause_marker()),
        );
        let err = dispatcher
            .handle(&HookEvent::new("tui.prompt.append", "s"))
            .unwrap_err();
        assert!(matches!(err, CoreError::State(StateError::WriteFailed { .. })));
    }
}
