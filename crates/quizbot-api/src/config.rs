//! Command-line flags, environment and validated runtime configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use quizbot_catalog::DEFAULT_ENCODING;
use quizbot_redis_store::RedisSettings;

use crate::dispatch::{DEFAULT_BASE_DELAY, RetryPolicy};
use crate::error::AppError;
use crate::platform::{telegram, vk};

/// Default filter for records forwarded to admin chats.
pub const DEFAULT_ADMIN_LOG_FILTER: &str = "warn,quizbot_api=info";

/// Quiz bot for Telegram and VK.
///
/// Every flag can also be set through the environment or a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "quizbot", version, about)]
pub struct Cli {
    /// Path to the quiz questions file.
    #[arg(long = "questions_path", env = "QUESTIONS_PATH")]
    pub questions_path: PathBuf,

    /// Text encoding of the questions file.
    #[arg(long, env = "QUESTIONS_ENCODING", default_value = DEFAULT_ENCODING)]
    pub questions_encoding: String,

    /// Address the webhook server binds to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the webhook server binds to.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Redis host.
    #[arg(long, env = "REDIS_HOST", default_value = "127.0.0.1")]
    pub redis_host: String,

    /// Redis port.
    #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
    pub redis_port: u16,

    /// Redis password.
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    /// Telegram bot token. Enables the Telegram adapter.
    #[arg(long, env = "TG_BOT_TOKEN", hide_env_values = true)]
    pub tg_bot_token: Option<String>,

    /// Telegram chat that receives log records.
    #[arg(long, env = "TG_ADMIN_CHAT_ID")]
    pub tg_admin_chat_id: Option<String>,

    /// Public URL registered with `setWebhook` at startup.
    #[arg(long, env = "TG_WEBHOOK_URL")]
    pub tg_webhook_url: Option<String>,

    /// Secret token Telegram echoes on every webhook call.
    #[arg(long, env = "TG_WEBHOOK_SECRET", hide_env_values = true)]
    pub tg_webhook_secret: Option<String>,

    /// Bot API base URL.
    #[arg(long, env = "TG_API_URL", default_value = telegram::DEFAULT_API_URL)]
    pub tg_api_url: String,

    /// VK community token. Enables the VK adapter.
    #[arg(long, env = "VK_TOKEN", hide_env_values = true)]
    pub vk_token: Option<String>,

    /// VK peer that receives log records.
    #[arg(long, env = "VK_ADMIN_CHAT_ID")]
    pub vk_admin_chat_id: Option<String>,

    /// String returned to VK `confirmation` events.
    #[arg(long, env = "VK_CONFIRMATION_CODE")]
    pub vk_confirmation_code: Option<String>,

    /// Secret key configured for the VK callback server.
    #[arg(long, env = "VK_SECRET", hide_env_values = true)]
    pub vk_secret: Option<String>,

    /// VK API base URL.
    #[arg(long, env = "VK_API_URL", default_value = vk::DEFAULT_API_URL)]
    pub vk_api_url: String,

    /// Filter for log records forwarded to admin chats.
    #[arg(long, env = "ADMIN_LOG_FILTER", default_value = DEFAULT_ADMIN_LOG_FILTER)]
    pub admin_log_filter: String,

    /// Attempts made when the session store is unavailable.
    #[arg(long, env = "STORE_RETRY_ATTEMPTS", default_value_t = 3)]
    pub store_retry_attempts: u32,
}

/// Telegram adapter settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token.
    pub token: String,
    /// Chat that receives log records.
    pub admin_chat_id: Option<String>,
    /// URL registered with `setWebhook` at startup.
    pub webhook_url: Option<String>,
    /// Webhook secret token.
    pub webhook_secret: Option<String>,
    /// Bot API base URL.
    pub api_url: String,
}

/// VK adapter settings.
#[derive(Debug, Clone)]
pub struct VkConfig {
    /// Community token.
    pub token: String,
    /// Peer that receives log records.
    pub admin_chat_id: Option<String>,
    /// Confirmation code for the callback server.
    pub confirmation_code: String,
    /// Callback secret key.
    pub secret: Option<String>,
    /// VK API base URL.
    pub api_url: String,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Quiz questions file.
    pub questions_path: PathBuf,
    /// Encoding label of the questions file.
    pub questions_encoding: String,
    /// Listener address.
    pub bind_addr: SocketAddr,
    /// Session store connection.
    pub redis: RedisSettings,
    /// Telegram adapter, if enabled.
    pub telegram: Option<TelegramConfig>,
    /// VK adapter, if enabled.
    pub vk: Option<VkConfig>,
    /// Admin log filter directives.
    pub admin_log_filter: String,
    /// Store retry policy.
    pub retry: RetryPolicy,
}

impl Config {
    /// Validates parsed flags.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when no platform is enabled, when VK is
    /// enabled without a confirmation code, when the bind address is invalid
    /// or when the retry attempt count is zero.
    pub fn from_cli(cli: Cli) -> Result<Self, AppError> {
        let bind_addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

        if cli.store_retry_attempts == 0 {
            return Err(AppError::Config(
                "STORE_RETRY_ATTEMPTS must be at least 1".to_owned(),
            ));
        }

        let telegram = cli.tg_bot_token.filter(|t| !t.is_empty()).map(|token| TelegramConfig {
            token,
            admin_chat_id: cli.tg_admin_chat_id,
            webhook_url: cli.tg_webhook_url,
            webhook_secret: cli.tg_webhook_secret,
            api_url: cli.tg_api_url,
        });

        let vk = match cli.vk_token.filter(|t| !t.is_empty()) {
            None => None,
            Some(token) => {
                let confirmation_code = cli.vk_confirmation_code.ok_or_else(|| {
                    AppError::Config("VK_CONFIRMATION_CODE must be set when VK_TOKEN is".to_owned())
                })?;
                Some(VkConfig {
                    token,
                    admin_chat_id: cli.vk_admin_chat_id,
                    confirmation_code,
                    secret: cli.vk_secret,
                    api_url: cli.vk_api_url,
                })
            }
        };

        if telegram.is_none() && vk.is_none() {
            return Err(AppError::Config(
                "at least one of TG_BOT_TOKEN or VK_TOKEN must be set".to_owned(),
            ));
        }

        Ok(Self {
            questions_path: cli.questions_path,
            questions_encoding: cli.questions_encoding,
            bind_addr,
            redis: RedisSettings::new(cli.redis_host, cli.redis_port, cli.redis_password),
            telegram,
            vk,
            admin_log_filter: cli.admin_log_filter,
            retry: RetryPolicy {
                attempts: cli.store_retry_attempts,
                base_delay: DEFAULT_BASE_DELAY,
            },
        })
    }
}
