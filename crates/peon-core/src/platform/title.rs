use std::io::{IsTerminal, Write};

use crate::effects::TitleSink;
use crate::error::EffectError;

/// OSC 0 sequence that sets the window and tab title.
pub fn osc_title(title: &str) -> String {
    format!("\u{1b}]0;{title}\u{7}")
}

/// Writes the title escape to stdout, but only when stdout is a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalTitle;

impl TitleSink for TerminalTitle {
    fn set_title(&self, title: &str) -> Result<(), EffectError> {
        let stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Ok(());
        }
        let mut lock = stdout.lock();
        lock.write_all(osc_title(title).as_bytes())?;
        lock.flush()?;
        Ok(())
    }
}
