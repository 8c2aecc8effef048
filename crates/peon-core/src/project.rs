//! Project naming for titles and notifications.

use std::path::Path;

/// Name used when no usable directory is known.
pub const FALLBACK_PROJECT: &str = "opencode";

/// Directories the host reports for the session.
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    pub worktree: Option<String>,
    pub directory: Option<String>,
}

impl ProjectContext {
    pub fn from_dir(dir: impl Into<String>) -> Self {
        let dir = dir.into();
        Self {
            worktree: Some(dir.clone()),
            directory: Some(dir),
        }
    }

    /// Basename of the worktree (or directory), sanitized.
    pub fn name(&self) -> String {
        let base = [&self.worktree, &self.directory]
            .into_iter()
            .flatten()
            .find(|d| !d.is_empty())
            .map(String::as_str)
            .unwrap_or(FALLBACK_PROJECT);

        let name = Path::new(base)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_PROJECT);
        sanitize_project_name(name)
    }
}

/// Strip everything outside `[A-Za-z0-9 ._-]`.
pub fn sanitize_project_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect()
}
