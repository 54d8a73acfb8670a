//! Discord client wrapper and gateway event handler.

use std::sync::Arc;

use chrono::Utc;
use serenity::all::{
    Client, Command, CommandInteraction, CommandOptionType, Context, CreateCommand,
    CreateCommandOption, CreateInteractionResponse, CreateInteractionResponseMessage,
    EventHandler, GatewayIntents, Interaction, Message, Ready, ShardManager,
};
use serenity::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::bot::{IncomingMessage, MessageHandler};
use crate::commands::{CommandHandler, SlashCommand};
use crate::config::DiscordConfig;

/// Errors that can occur during Discord operations.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Failed to create Discord client: {0}")]
    ClientBuild(#[source] Box<serenity::Error>),

    #[error("Discord connection error: {0}")]
    Connection(#[source] Box<serenity::Error>),
}

/// Gateway event handler routing messages and interactions.
pub struct Handler {
    messages: MessageHandler,
    commands: CommandHandler,
}

impl Handler {
    /// Creates a new event handler.
    #[must_use]
    pub const fn new(messages: MessageHandler, commands: CommandHandler) -> Self {
        Self { messages, commands }
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        let options: Vec<(&str, i64)> = command
            .data
            .options
            .iter()
            .filter_map(|option| option.value.as_i64().map(|value| (option.name.as_str(), value)))
            .collect();

        let Some(parsed) = parse_command(&command.data.name, &options) else {
            return;
        };

        let Some(result) = self
            .commands
            .try_handle(command.user.id.get(), parsed, Utc::now())
            .await
        else {
            return;
        };

        let response = CreateInteractionResponseMessage::new()
            .content(result.message)
            .ephemeral(!result.success);

        if let Err(e) = command
            .create_response(&ctx.http, CreateInteractionResponse::Message(response))
            .await
        {
            error!("Failed to respond to /{}: {}", command.data.name, e);
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Registers the slash commands once the gateway session is up.
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected to Discord", ready.user.name);

        match Command::set_global_commands(&ctx.http, command_definitions()).await {
            Ok(commands) => info!("Registered {} slash command(s)", commands.len()),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let incoming = IncomingMessage {
            author_id: msg.author.id.get(),
            author_is_bot: msg.author.bot,
            channel_id: msg.channel_id.get(),
        };

        let Some(phrase) = self.messages.evaluate(&incoming, Utc::now()).await else {
            return;
        };

        info!(
            author_id = incoming.author_id,
            channel_id = incoming.channel_id,
            phrase = %phrase,
            "Replying to monitored user"
        );

        if let Err(e) = msg.channel_id.say(&ctx.http, &phrase).await {
            error!("Failed to send message to channel {}: {}", incoming.channel_id, e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(&ctx, &command).await;
        } else {
            debug!("Ignoring non-command interaction");
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("messages", &self.messages)
            .field("commands", &self.commands)
            .finish()
    }
}

/// Parses an interaction's command name and integer options.
fn parse_command(name: &str, options: &[(&str, i64)]) -> Option<SlashCommand> {
    let parsed = SlashCommand::parse(name, options);
    if parsed.is_none() {
        debug!("Ignoring unknown or malformed command: {}", name);
    }
    parsed
}

/// Builds the slash command registrations.
#[must_use]
pub fn command_definitions() -> Vec<CreateCommand> {
    SlashCommand::all_commands()
        .into_iter()
        .map(|(name, description, option, option_description)| {
            CreateCommand::new(name).description(description).add_option(
                CreateCommandOption::new(CommandOptionType::Integer, option, option_description)
                    .required(true),
            )
        })
        .collect()
}

/// High-level Discord client wrapper.
pub struct DiscordBot {
    client: Client,
}

impl DiscordBot {
    /// Gateway intents needed to see messages in guilds and DMs.
    #[must_use]
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES
    }

    /// Creates the client session. Does not open the connection yet.
    pub async fn connect(config: &DiscordConfig, handler: Handler) -> Result<Self, DiscordError> {
        let client = Client::builder(&config.bot_token, Self::intents())
            .event_handler(handler)
            .await
            .map_err(|e| DiscordError::ClientBuild(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Handle used to close the connection from another task.
    #[must_use]
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        Arc::clone(&self.client.shard_manager)
    }

    /// Opens the gateway connection and processes events until shut down.
    pub async fn run(&mut self) -> Result<(), DiscordError> {
        self.client
            .start()
            .await
            .map_err(|e| DiscordError::Connection(Box::new(e)))
    }
}

impl std::fmt::Debug for DiscordBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordBot").finish_non_exhaustive()
    }
}
