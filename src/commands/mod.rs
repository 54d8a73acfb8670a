//! Command handling module.
//!
//! Processes slash commands sent to the bot through Discord interactions.

mod handler;
mod types;

pub use handler::CommandHandler;
pub use types::{CommandResult, MINUTES_OPTION, SET_DURATION, SlashCommand};
