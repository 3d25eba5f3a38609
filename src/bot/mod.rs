//! Bot layer - Discord-specific interface
//!
//! Slash commands post panels whose buttons carry encoded custom ids; the
//! event handler turns every button press and modal submission into a
//! [`crate::core::interaction::Interaction`] and hands it to the
//! [`Dispatcher`].

/// Discord command implementations (settings, ticket, clan, general)
pub mod commands;
/// Gateway event handling and response rendering
pub mod events;
/// Component handlers registered with the dispatcher
pub mod handlers;

use crate::{
    config::AppConfig,
    core::dispatch::Dispatcher,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands and event handlers.
pub struct BotData {
    /// Database connection for settings and clan lookups
    pub database: DatabaseConnection,
    /// Routes component interactions to their handlers
    pub dispatcher: Arc<Dispatcher>,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        dispatcher: Arc<Dispatcher>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            database,
            dispatcher,
            config,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let message = match error {
                Error::GuildOnly => "This command can only be used in a server.".to_string(),
                _ => "An error occurred while running that command.".to_string(),
            };
            if let Err(e) = ctx.say(message).await {
                error!("Failed to send error message: {}", e);
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error handling {}: {:?}", event.snake_case_name(), error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and runs until the client stops.
#[instrument(skip_all)]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
    dispatcher: Arc<Dispatcher>,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                match (config.dev_mode, config.dev_guild_id) {
                    (true, Some(guild_id)) => {
                        let guild_id = serenity::GuildId::new(guild_id);
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            guild_id,
                        )
                        .await?;
                        info!("Registered commands in guild {}", guild_id);
                    }
                    _ => {
                        info!("Registering commands globally...");
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                    }
                }
                Ok(BotData::new(database, dispatcher, config))
            })
        })
        .build();

    // Guild create/delete drive the settings lifecycle; interactions need no intent
    let intents = serenity::GatewayIntents::GUILDS;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
