//! Window semantics: whether the window enables or suppresses replies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// How the configured time window gates replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Replies are sent only while inside the window.
    #[default]
    Active,

    /// Replies are suppressed while inside the window.
    Inactive,
}

impl WindowMode {
    /// The window in effect before any command has been received.
    ///
    /// Both defaults leave replies enabled: the active mode covers the whole
    /// current day, the inactive mode uses an empty window.
    #[must_use]
    pub fn default_window(self, now: DateTime<Utc>) -> TimeWindow {
        match self {
            Self::Active => TimeWindow::full_day(now),
            Self::Inactive => TimeWindow::empty(),
        }
    }

    /// Decides whether a reply may be sent at `now`.
    #[must_use]
    pub fn permits(self, window: &TimeWindow, now: DateTime<Utc>) -> bool {
        match self {
            Self::Active => window.contains(now),
            Self::Inactive => !window.contains(now),
        }
    }

    /// Short label used in confirmations and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!(
                "unknown window mode '{other}' (expected 'active' or 'inactive')"
            )),
        }
    }
}
