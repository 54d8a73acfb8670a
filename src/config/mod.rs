//! Configuration module for the nudge bot.
//!
//! Handles loading, validation, and management of bot configuration
//! including the phrase pool, reply policies, and Discord credentials.

mod phrases;
mod settings;

pub use phrases::{PhraseError, PhrasePool};
pub use settings::{BotSettings, ClockFormat, ConfigError, DiscordConfig};

/// Maximum length of a Discord message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Default burst size of the reply rate limiter.
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 5;

/// Default refill rate of the reply rate limiter (one token every ~33 minutes).
pub const DEFAULT_RATE_LIMIT_REFILL_PER_SEC: f64 = 0.0005;
