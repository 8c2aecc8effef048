//! Feedback categories.
//!
//! The set is closed. `Acknowledge` and `ResourceLimit` can be configured and
//! can carry sounds in a pack, but no event currently classifies into them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A class of feedback, selecting which sounds a pack plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Greeting,
    Acknowledge,
    Complete,
    Error,
    Permission,
    ResourceLimit,
    Annoyed,
}

impl Category {
    /// All categories in their canonical order.
    pub fn all() -> &'static [Category] {
        &[
            Self::Greeting,
            Self::Acknowledge,
            Self::Complete,
            Self::Error,
            Self::Permission,
            Self::ResourceLimit,
            Self::Annoyed,
        ]
    }

    /// Key used in config, state and manifest files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Acknowledge => "acknowledge",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Permission => "permission",
            Self::ResourceLimit => "resource_limit",
            Self::Annoyed => "annoyed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
