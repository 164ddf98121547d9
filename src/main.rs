mod app_context;
mod commands;
mod config;
mod jobs;
mod monitor;
mod notifier;

use teloxide::prelude::*;
use tokio::net::lookup_host;
use tracing_subscriber::EnvFilter;

use crate::app_context::AppContext;
use crate::commands::{MyCommands, answer};
use crate::config::{Config, load_config};
use crate::jobs::start_background_jobs;
use crate::notifier::TelegramDispatcher;

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

const CONFIG_PATH: &str = "config.toml";

async fn log_dns_probe() {
    match lookup_host(("api.telegram.org", 443)).await {
        Ok(mut addresses) => {
            if let Some(address) = addresses.next() {
                log::info!("dns_probe_ok host=api.telegram.org address={}", address);
            } else {
                log::warn!("dns_probe_degraded host=api.telegram.org reason=no_records");
            }
        }
        Err(error) => {
            log::warn!(
                "dns_probe_degraded host=api.telegram.org reason=lookup_failed error={}",
                error
            );
        }
    }
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let config: Config = match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    log::info!("sysmon-bot is starting...");
    log_dns_probe().await;

    let bot = Bot::new(&config.bot_token);

    let owner_chat_id = match config.owner_chat_id() {
        Ok(chat_id) => chat_id,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    let app_context = match AppContext::new(config, CONFIG_PATH) {
        Ok(app_context) => app_context,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    let dispatcher = TelegramDispatcher::new(bot.clone(), owner_chat_id);
    start_background_jobs(dispatcher, app_context.clone());

    MyCommands::repl(bot, move |bot, msg, cmd| {
        let app_context = app_context.clone();
        async move { answer(bot, msg, cmd, &app_context).await }
    })
    .await;
}
