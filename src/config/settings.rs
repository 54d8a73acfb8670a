//! Application settings and Discord configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_RATE_LIMIT_BURST, DEFAULT_RATE_LIMIT_REFILL_PER_SEC};
use crate::window::WindowMode;

/// Discord API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal.
    pub bot_token: String,
}

impl DiscordConfig {
    /// Uses the command-line token if given, otherwise looks up `BOT_TOKEN`.
    pub fn resolve(
        cli_token: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bot_token = cli_token
            .or_else(|| lookup("BOT_TOKEN"))
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingEnvVar("BOT_TOKEN"))?;

        Ok(Self { bot_token })
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

/// Clock style used when echoing window times back to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockFormat {
    /// `15:04`
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,

    /// `3:04 PM`
    #[serde(rename = "12h")]
    TwelveHour,
}

impl ClockFormat {
    /// Formats the hour and minute of `time`.
    pub fn format<Tz: TimeZone>(self, time: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let pattern = match self {
            Self::TwentyFourHour => "%H:%M",
            Self::TwelveHour => "%-I:%M %p",
        };
        time.format(pattern).to_string()
    }
}

impl FromStr for ClockFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24h" | "24" => Ok(Self::TwentyFourHour),
            "12h" | "12" => Ok(Self::TwelveHour),
            other => Err(format!("unknown clock format '{other}' (expected '24h' or '12h')")),
        }
    }
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Discord id of the user whose messages trigger replies.
    pub monitored_user_id: u64,

    /// Whether the window enables or suppresses replies.
    #[serde(default)]
    pub window_mode: WindowMode,

    /// Only the monitored user may run `set_duration`.
    #[serde(default = "default_restrict_commands")]
    pub restrict_commands: bool,

    /// Burst size of the reply rate limiter.
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: u32,

    /// Tokens added to the rate limiter per second.
    #[serde(default = "default_rate_limit_refill")]
    pub rate_limit_refill_per_sec: f64,

    /// Clock style for command confirmations.
    #[serde(default)]
    pub clock_format: ClockFormat,

    /// JSON file with reply phrases; built-in phrases when unset.
    #[serde(default)]
    pub phrases_path: Option<PathBuf>,
}

fn default_restrict_commands() -> bool {
    true
}

fn default_rate_limit_burst() -> u32 {
    DEFAULT_RATE_LIMIT_BURST
}

fn default_rate_limit_refill() -> f64 {
    DEFAULT_RATE_LIMIT_REFILL_PER_SEC
}

impl BotSettings {
    /// Creates settings for the given user with default policies.
    #[must_use]
    pub fn new(monitored_user_id: u64) -> Self {
        Self {
            monitored_user_id,
            window_mode: WindowMode::default(),
            restrict_commands: default_restrict_commands(),
            rate_limit_burst: default_rate_limit_burst(),
            rate_limit_refill_per_sec: default_rate_limit_refill(),
            clock_format: ClockFormat::default(),
            phrases_path: None,
        }
    }

    /// Creates bot settings from environment variables with defaults.
    ///
    /// `user_id` takes precedence over `USER_ID`.
    pub fn from_env(user_id: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_lookup(user_id, env_lookup)
    }

    /// Creates bot settings from an arbitrary variable source.
    pub fn from_lookup(
        user_id: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw_user_id = user_id
            .map(str::to_owned)
            .or_else(|| lookup("USER_ID"))
            .ok_or(ConfigError::MissingEnvVar("USER_ID"))?;
        let monitored_user_id = parse_user_id(&raw_user_id)?;

        let mut settings = Self::new(monitored_user_id);

        if let Some(value) = lookup("WINDOW_MODE") {
            settings.window_mode = parse_value("WINDOW_MODE", &value)?;
        }
        if let Some(value) = lookup("RESTRICT_COMMANDS") {
            settings.restrict_commands = parse_bool("RESTRICT_COMMANDS", &value)?;
        }
        if let Some(value) = lookup("RATE_LIMIT_BURST") {
            settings.rate_limit_burst = parse_value("RATE_LIMIT_BURST", &value)?;
        }
        if let Some(value) = lookup("RATE_LIMIT_REFILL_PER_SEC") {
            settings.rate_limit_refill_per_sec = parse_value("RATE_LIMIT_REFILL_PER_SEC", &value)?;
        }
        if let Some(value) = lookup("CLOCK_FORMAT") {
            settings.clock_format = parse_value("CLOCK_FORMAT", &value)?;
        }
        settings.phrases_path = lookup("PHRASES_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        settings.validate()?;
        Ok(settings)
    }

    /// Checks the rate limiter parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit_burst == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RATE_LIMIT_BURST",
                value: self.rate_limit_burst.to_string(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if !self.rate_limit_refill_per_sec.is_finite() || self.rate_limit_refill_per_sec <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "RATE_LIMIT_REFILL_PER_SEC",
                value: self.rate_limit_refill_per_sec.to_string(),
                reason: "must be a positive number".to_owned(),
            });
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid user ID '{0}' (must be a Discord snowflake)")]
    InvalidUserId(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_user_id(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .ok_or_else(|| ConfigError::InvalidUserId(raw.to_owned()))
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_owned(),
            reason: "expected true or false".to_owned(),
        }),
    }
}
