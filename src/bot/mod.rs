//! Reply logic module.
//!
//! Holds the state shared between event handlers and the gate that
//! decides whether a message from the monitored user gets a reply.

mod responder;
mod state;

pub use responder::{IncomingMessage, MessageHandler, Skip};
pub use state::BotConfig;
