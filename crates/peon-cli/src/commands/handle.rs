use clap::Args;
use peon_core::{Dispatcher, Effects, HookEvent, PeonPaths, ProjectContext, DEFAULT_SESSION_ID};
use std::io::Read;
use std::path::PathBuf;

/// Set to a directory to record effects in `actions.log` instead of running them.
pub const TEST_DIR_ENV: &str = "OPENCODE_PEON_TEST_DIR";

#[derive(Args)]
pub struct HandleArgs {
    /// Event type, e.g. "session.idle". Omit to read the event object from stdin
    #[arg(long = "event-type")]
    pub event_type: Option<String>,
    /// Session id (overrides the one in the event)
    #[arg(long)]
    pub session: Option<String>,
    /// Project directory used for the title (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Print what happened as JSON
    #[arg(long)]
    pub report: bool,
}

/// Parse the stdin payload. Anything unreadable becomes an event with no type,
/// which the dispatcher ignores.
fn event_from_stdin() -> HookEvent {
    let mut input = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut input) {
        tracing::warn!(error = %err, "failed to read event from stdin");
        return HookEvent::new("", DEFAULT_SESSION_ID);
    }
    match serde_json::from_str::<serde_json::Value>(&input) {
        Ok(value) => HookEvent::from_value(&value),
        Err(err) => {
            tracing::warn!(error = %err, "event is not valid JSON");
            HookEvent::new("", DEFAULT_SESSION_ID)
        }
    }
}

fn project_name(dir: Option<PathBuf>) -> String {
    let dir = dir.or_else(|| std::env::current_dir().ok());
    match dir {
        Some(dir) => ProjectContext::from_dir(dir.to_string_lossy()).name(),
        None => ProjectContext::default().name(),
    }
}

pub fn run(args: HandleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut event = match args.event_type {
        Some(kind) => HookEvent::new(kind, DEFAULT_SESSION_ID),
        None => event_from_stdin(),
    };
    if let Some(session) = args.session.filter(|s| !s.is_empty()) {
        event.session_id = session;
    }

    let paths = PeonPaths::from_env();
    let effects = match std::env::var_os(TEST_DIR_ENV).filter(|v| !v.is_empty()) {
        Some(dir) => Effects::action_log(PathBuf::from(dir), paths.pause_marker()),
        None => Effects::system(paths.pause_marker()),
    };

    let mut dispatcher = Dispatcher::new(paths, project_name(args.dir), effects);
    let outcome = dispatcher.handle(&event)?;

    if args.report {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    Ok(())
}
