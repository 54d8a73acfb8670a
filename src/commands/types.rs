//! Command types and definitions.

use std::fmt;

/// Name of the slash command that opens a new window.
pub const SET_DURATION: &str = "set_duration";

/// Name of the integer option of [`SET_DURATION`].
pub const MINUTES_OPTION: &str = "minutes";

/// Available slash commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    /// Start a new window of the given length, beginning now.
    SetDuration { minutes: i64 },
}

impl SlashCommand {
    /// Parses a command from its name and integer options.
    ///
    /// Returns `None` for unknown commands or missing options.
    #[must_use]
    pub fn parse(name: &str, options: &[(&str, i64)]) -> Option<Self> {
        match name {
            SET_DURATION => options
                .iter()
                .find(|(option, _)| *option == MINUTES_OPTION)
                .map(|&(_, minutes)| Self::SetDuration { minutes }),
            _ => None,
        }
    }

    /// Returns the command name as registered with Discord.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetDuration { .. } => SET_DURATION,
        }
    }

    /// Returns all commands as (name, description, option, option description).
    #[must_use]
    pub fn all_commands() -> Vec<(&'static str, &'static str, &'static str, &'static str)> {
        vec![(
            SET_DURATION,
            "Start a reply window beginning now",
            MINUTES_OPTION,
            "Length of the window in minutes",
        )]
    }
}

impl fmt::Display for SlashCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetDuration { minutes } => write!(f, "/{} {minutes}", self.name()),
        }
    }
}

/// Result of command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command was successful.
    pub success: bool,

    /// Response message to show the user.
    pub message: String,
}

impl CommandResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates an error result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_duration() {
        assert_eq!(
            SlashCommand::parse("set_duration", &[("minutes", 45)]),
            Some(SlashCommand::SetDuration { minutes: 45 })
        );
    }

    #[test]
    fn test_parse_keeps_negative_minutes() {
        assert_eq!(
            SlashCommand::parse("set_duration", &[("minutes", -3)]),
            Some(SlashCommand::SetDuration { minutes: -3 })
        );
    }

    #[test]
    fn test_parse_missing_option() {
        assert_eq!(SlashCommand::parse("set_duration", &[]), None);
        assert_eq!(SlashCommand::parse("set_duration", &[("hours", 2)]), None);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(SlashCommand::parse("skip", &[("minutes", 5)]), None);
    }

    #[test]
    fn test_display() {
        let command = SlashCommand::SetDuration { minutes: 10 };
        assert_eq!(command.to_string(), "/set_duration 10");
    }
}
