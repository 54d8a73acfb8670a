//! Shared bot state.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::config::{BotSettings, ClockFormat, PhrasePool};
use crate::window::{TimeWindow, WindowMode};

/// State shared by the message and command handlers.
///
/// Everything except the window is fixed at startup. The window is replaced
/// as a whole under its write lock, so readers always see a consistent pair.
#[derive(Debug)]
pub struct BotConfig {
    monitored_user_id: u64,
    mode: WindowMode,
    restrict_commands: bool,
    clock_format: ClockFormat,
    phrases: PhrasePool,
    window: RwLock<TimeWindow>,
}

impl BotConfig {
    /// Creates the shared state, starting with the mode's default window.
    #[must_use]
    pub fn new(settings: &BotSettings, phrases: PhrasePool, now: DateTime<Utc>) -> Self {
        Self {
            monitored_user_id: settings.monitored_user_id,
            mode: settings.window_mode,
            restrict_commands: settings.restrict_commands,
            clock_format: settings.clock_format,
            phrases,
            window: RwLock::new(settings.window_mode.default_window(now)),
        }
    }

    /// Returns a copy of the current window.
    pub async fn window(&self) -> TimeWindow {
        *self.window.read().await
    }

    /// Replaces the current window, returning the previous one.
    pub async fn replace_window(&self, window: TimeWindow) -> TimeWindow {
        let mut current = self.window.write().await;
        std::mem::replace(&mut *current, window)
    }

    /// Checks the window policy at `now`.
    pub async fn permits_reply_at(&self, now: DateTime<Utc>) -> bool {
        let window = self.window.read().await;
        self.mode.permits(&window, now)
    }

    #[must_use]
    pub const fn monitored_user_id(&self) -> u64 {
        self.monitored_user_id
    }

    #[must_use]
    pub const fn mode(&self) -> WindowMode {
        self.mode
    }

    #[must_use]
    pub const fn restrict_commands(&self) -> bool {
        self.restrict_commands
    }

    #[must_use]
    pub const fn clock_format(&self) -> ClockFormat {
        self.clock_format
    }

    #[must_use]
    pub const fn phrases(&self) -> &PhrasePool {
        &self.phrases
    }
}
