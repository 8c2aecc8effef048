//! Event classification.
//!
//! Maps one lifecycle event to the feedback it should produce. The mapping is
//! a fixed table; the only stateful branch is the annoyance check for
//! prompt-like events, which goes through an [`AnnoyanceDetector`].

use serde::{Deserialize, Serialize};

use crate::annoyance::AnnoyanceDetector;
use crate::category::Category;
use crate::events::EventType;
use crate::storage::CategoryToggles;

/// Marker prepended to the title for events that want attention.
pub const ATTENTION_MARKER: &str = "* ";

/// Banner colour for desktop notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyColor {
    #[default]
    Red,
    Blue,
    Yellow,
}

impl NotifyColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
        }
    }

    /// Banner background as RGB.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Red => (180, 0, 0),
            Self::Blue => (30, 80, 180),
            Self::Yellow => (200, 160, 0),
        }
    }
}

/// What an event should produce.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Decision {
    /// Sound category, `None` when no sound should play.
    pub category: Option<Category>,
    pub status: String,
    pub marker: &'static str,
    pub notify: bool,
    pub notify_color: NotifyColor,
    pub message: String,
}

impl Decision {
    fn status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            ..Self::default()
        }
    }

    fn alert(category: Category, status: &str, color: NotifyColor, message: String) -> Self {
        Self {
            category: Some(category),
            status: status.to_string(),
            marker: ATTENTION_MARKER,
            notify: true,
            notify_color: color,
            message,
        }
    }

    /// Terminal title (also used as the notification title).
    pub fn title(&self, project: &str) -> String {
        format!("{}{}: {}", self.marker, project, self.status)
    }
}

/// Classify an event.
///
/// The detector is consulted only for prompt-like events and only when the
/// `annoyed` category is enabled. A category that is disabled in `toggles` is
/// cleared from the result; the status is kept so the title still updates.
pub fn classify(
    event_type: EventType,
    session_id: &str,
    project: &str,
    toggles: &CategoryToggles,
    detector: &mut dyn AnnoyanceDetector,
) -> Decision {
    let mut decision = match event_type {
        EventType::SessionCreated => Decision {
            category: Some(Category::Greeting),
            ..Decision::status("ready")
        },
        EventType::SessionIdle => Decision::alert(
            Category::Complete,
            "done",
            NotifyColor::Blue,
            format!("{project} - Task complete"),
        ),
        EventType::PermissionAsked => Decision::alert(
            Category::Permission,
            "needs approval",
            NotifyColor::Red,
            format!("{project} - Permission needed"),
        ),
        EventType::SessionError => Decision::alert(
            Category::Error,
            "error",
            NotifyColor::Red,
            format!("{project} - Session error"),
        ),
        EventType::PermissionReplied => Decision::status("working"),
        EventType::TuiCommandExecute | EventType::TuiPromptAppend => {
            let mut decision = Decision::status("working");
            if toggles.is_enabled(Category::Annoyed) && detector.record_prompt(session_id) {
                decision.category = Some(Category::Annoyed);
            }
            decision
        }
    };

    if let Some(category) = decision.category {
        if !toggles.is_enabled(category) {
            tracing::debug!(%category, "category disabled, no sound");
            decision.category = None;
        }
    }

    decision
}
