use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::prelude::*;
use std::time::Duration;

use actionbot::core::Config;
use actionbot::gateway::{classify_login_error, gateway_intents, Handler};
use actionbot::{ActionRegistry, DispatchSettings, DispatchTables, Dispatcher};

/// How long a failed login stays on screen before the process exits
const LOGIN_FAILURE_PAUSE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting action bot...");

    // A bad table is a startup error, never a runtime one
    let tables = DispatchTables::load(&config.actions_config_path).map_err(|e| {
        error!(
            "❌ Failed to load actions from {}: {e:#}",
            config.actions_config_path
        );
        e
    })?;
    info!(
        "📄 Loaded {} command(s) and {} event(s) from {}",
        tables.commands.len(),
        tables.events.len(),
        config.actions_config_path
    );

    let registry = ActionRegistry::with_builtin_actions();
    info!("🔌 {} actions registered", registry.len());

    let intents = gateway_intents(&tables.events);
    let dispatcher = Dispatcher::new(registry, tables, DispatchSettings::from(&config));
    let handler = Handler::new(dispatcher, config.print_gateway_log);

    let client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await;

    info!("Establishing WebSocket connection to Discord gateway...");
    if config.print_gateway_log {
        info!("Gateway intents: {intents:?}");
    }

    let result = match client {
        Ok(mut client) => client.start().await,
        Err(e) => Err(e),
    };

    // Login problems are reported, then the process exits without serving
    if let Err(why) = result {
        let failure = classify_login_error(&why);
        error!("❌ {}: {why}", failure.describe());
        tokio::time::sleep(LOGIN_FAILURE_PAUSE).await;
    }

    Ok(())
}
