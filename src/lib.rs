//! Nudge Bot Library
//!
//! A Discord bot that answers one monitored user with canned phrases.
//!
//! This crate provides the core functionality for:
//! - Loading and validating the phrase pool and settings
//! - Deciding when a reply is allowed (time window and rate limit)
//! - Handling the `set_duration` slash command
//! - Connecting to Discord via `serenity`

pub mod bot;
pub mod commands;
pub mod config;
pub mod discord;
pub mod window;
