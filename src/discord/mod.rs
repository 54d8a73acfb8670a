//! Discord client wrapper module.
//!
//! Connects the reply and command logic to the Discord gateway,
//! and rate limits the automatic replies.

mod client;
mod rate_limiter;

pub use client::{DiscordBot, DiscordError, Handler, command_definitions};
pub use rate_limiter::{RateLimitError, RateLimiter};
