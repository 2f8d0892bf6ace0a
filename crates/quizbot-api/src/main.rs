//! Quiz bot server entry point.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use quizbot_api::admin_log::{self, AdminChat};
use quizbot_api::config::{Cli, Config};
use quizbot_api::error::AppError;
use quizbot_api::platform::telegram::TelegramClient;
use quizbot_api::platform::vk::VkClient;
use quizbot_api::platform::{MessageSender, PlatformError};
use quizbot_api::routes;
use quizbot_api::state::{AppState, TelegramEndpoint, VkEndpoint};
use quizbot_catalog::load_catalog;
use quizbot_core::clock::SystemClock;
use quizbot_core::rng::{DeterministicRng, SystemRng};
use quizbot_redis_store::RedisSessionStore;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Upper bound for every outbound platform API call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let dotenv = dotenvy::dotenv();
    let config = Config::from_cli(Cli::parse())?;

    // Platform clients.
    let http = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(PlatformError::from)?;
    let telegram = config
        .telegram
        .as_ref()
        .map(|tg| Arc::new(TelegramClient::new(http.clone(), &tg.api_url, &tg.token)));
    let vk = config
        .vk
        .as_ref()
        .map(|vk_config| Arc::new(VkClient::new(http.clone(), &vk_config.api_url, &vk_config.token)));

    // Initialize tracing: JSON to stdout plus forwarding to admin chats.
    let (admin_layer, admin_records) =
        admin_log::channel(Arc::new(SystemClock), admin_log::QUEUE_CAPACITY);
    let admin_filter = EnvFilter::try_new(&config.admin_log_filter)
        .map_err(|e| AppError::Config(format!("invalid ADMIN_LOG_FILTER: {e}")))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().json().with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            ),
        )
        .with(admin_layer.with_filter(admin_filter))
        .init();
    tokio::spawn(admin_log::forward(
        admin_records,
        admin_chats(&config, telegram.as_ref(), vk.as_ref()),
    ));

    if let Err(err) = dotenv {
        debug!(%err, "no .env file loaded");
    }

    info!("Starting quiz bot");

    let catalog = match load_catalog(&config.questions_path, &config.questions_encoding) {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => {
            error!(path = %config.questions_path.display(), %err, "failed to load quiz catalog");
            return Err(err.into());
        }
    };

    let store = Arc::new(RedisSessionStore::connect(&config.redis).await?);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::from_entropy()));

    // Build application state.
    let mut app_state = AppState::new(catalog, store, rng, config.retry);
    if let (Some(client), Some(tg)) = (&telegram, &config.telegram) {
        if let Some(url) = tg.webhook_url.as_deref() {
            client
                .set_webhook(url, tg.webhook_secret.as_deref())
                .await?;
            info!(url, "telegram webhook registered");
        }
        app_state = app_state.with_telegram(TelegramEndpoint {
            sender: client.clone(),
            webhook_secret: tg.webhook_secret.clone(),
        });
    }
    if let (Some(client), Some(vk_config)) = (&vk, &config.vk) {
        app_state = app_state.with_vk(VkEndpoint {
            sender: client.clone(),
            confirmation_code: vk_config.confirmation_code.clone(),
            secret: vk_config.secret.clone(),
        });
    }
    info!(platforms = ?app_state.platforms(), "platform adapters enabled");

    let app = routes::app(app_state).layer(TraceLayer::new_for_http());

    // Start server.
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Quiz bot stopped");
    Ok(())
}

fn admin_chats(
    config: &Config,
    telegram: Option<&Arc<TelegramClient>>,
    vk: Option<&Arc<VkClient>>,
) -> Vec<AdminChat> {
    let mut chats = Vec::new();
    let telegram_chat = config.telegram.as_ref().and_then(|tg| tg.admin_chat_id.clone());
    if let (Some(client), Some(chat_id)) = (telegram, telegram_chat) {
        let sender: Arc<dyn MessageSender> = client.clone();
        chats.push(AdminChat { sender, chat_id });
    }
    let vk_chat = config.vk.as_ref().and_then(|vk_config| vk_config.admin_chat_id.clone());
    if let (Some(client), Some(chat_id)) = (vk, vk_chat) {
        let sender: Arc<dyn MessageSender> = client.clone();
        chats.push(AdminChat { sender, chat_id });
    }
    chats
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
