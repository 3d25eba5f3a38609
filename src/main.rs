#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use guild_warden::{
    bot,
    config::{self, database},
    core::{
        broker, cooldown::CooldownGuard, dispatch::Dispatcher, handler::HandlerContext,
        interaction::InteractionKind, registry::HandlerRegistry,
    },
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = Arc::new(config::load_app_configuration()?);

    // 4. Connect to the store and make sure the tables exist
    let db = database::create_connection(&app_config.database.url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Job broker, shared by every handler
    let jobs = broker::connect_job_queue(&app_config.broker, app_config.dev_mode)
        .await
        .inspect_err(|e| error!("Failed to set up job broker: {}", e))?;

    // 6. Handler registry and cooldowns
    let mut registry = HandlerRegistry::new();
    bot::handlers::register_all(&mut registry)?;
    info!(
        buttons = registry.len(InteractionKind::Button),
        modals = registry.len(InteractionKind::Modal),
        "Component handlers registered"
    );

    let cooldowns = Arc::new(CooldownGuard::new(app_config.cooldown.max_entries));
    let _sweeper = cooldowns.spawn_sweeper(app_config.cooldown.sweep_interval());

    let dispatcher = Arc::new(Dispatcher::new(
        registry.into_holder(),
        cooldowns,
        HandlerContext::new(db.clone(), jobs),
        app_config.dispatch.handler_timeout(),
    ));

    // 7. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, app_config, db, dispatcher).await
}
