//! Command handler implementation.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};

use super::types::{CommandResult, SlashCommand};
use crate::bot::BotConfig;
use crate::window::{TimeWindow, WindowError, WindowMode};

/// Handles slash commands and updates the shared window.
#[derive(Debug)]
pub struct CommandHandler {
    /// Shared bot state.
    config: Arc<BotConfig>,
}

impl CommandHandler {
    /// Creates a new command handler.
    #[must_use]
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self { config }
    }

    /// Executes a command invoked by `invoker_id`.
    ///
    /// Returns `None` when the invocation is ignored and no response should
    /// be sent.
    pub async fn try_handle(
        &self,
        invoker_id: u64,
        command: SlashCommand,
        now: DateTime<Utc>,
    ) -> Option<CommandResult> {
        if self.config.restrict_commands() && invoker_id != self.config.monitored_user_id() {
            debug!(invoker_id, %command, "Ignoring command from other user");
            return None;
        }

        debug!("Handling command: {}", command);
        let result = self.execute(command, now).await;
        info!(invoker_id, success = result.success, "Command {} handled", command.name());

        Some(result)
    }

    /// Executes a parsed command.
    async fn execute(&self, command: SlashCommand, now: DateTime<Utc>) -> CommandResult {
        match command {
            SlashCommand::SetDuration { minutes } => self.handle_set_duration(minutes, now).await,
        }
    }

    async fn handle_set_duration(&self, minutes: i64, now: DateTime<Utc>) -> CommandResult {
        let window = match TimeWindow::starting_at(now, minutes) {
            Ok(window) => window,
            Err(WindowError::NegativeDuration { .. }) => {
                return CommandResult::error("Duration must be zero or more minutes.");
            }
            Err(e) => return CommandResult::error(format!("Cannot set window: {e}")),
        };

        self.config.replace_window(window).await;
        info!(
            mode = %self.config.mode(),
            start = %window.start(),
            end = %window.end(),
            "Window updated"
        );

        CommandResult::success(self.confirmation(&window))
    }

    fn confirmation(&self, window: &TimeWindow) -> String {
        let clock = self.config.clock_format();
        let start = clock.format(&window.start().with_timezone(&Local));
        let end = clock.format(&window.end().with_timezone(&Local));

        match self.config.mode() {
            WindowMode::Active => format!("✓ Replies enabled from {start} until {end}."),
            WindowMode::Inactive => format!("⏸ Replies paused from {start} until {end}."),
        }
    }
}
