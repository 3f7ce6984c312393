//! Bot config: Telegram connection, logging, database, export sessions. Loaded from env.

use anyhow::Result;
use dbot_core::DbotError;
use std::env;
use std::time::Duration;

pub const DEFAULT_LOG_FILE: &str = "logs/archive-bot.log";
pub const DEFAULT_DB_QUERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EXPORT_SESSION_TTL_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// SQLite database location: file path or `sqlite:` URL
    pub database_url: String,
    /// Upper bound on each database call
    pub db_query_timeout: Duration,
    /// Idle time after which an unfinished export dialogue is dropped
    pub export_session_ttl: Duration,
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DbotError::Config(format!("{} not set", name)).into()),
    }
}

fn secs_or(name: &str, default: u64) -> Duration {
    Duration::from_secs(
        env::var(name)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default),
    )
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => required("BOT_TOKEN")?,
        };
        let database_url = required("DATABASE_URL")?;
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
            db_query_timeout: secs_or("DB_QUERY_TIMEOUT_SECS", DEFAULT_DB_QUERY_TIMEOUT_SECS),
            export_session_ttl: secs_or(
                "EXPORT_SESSION_TTL_SECS",
                DEFAULT_EXPORT_SESSION_TTL_SECS,
            ),
        })
    }

    /// Validate config (telegram_api_url must be a valid URL if set; durations must be positive).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.db_query_timeout.is_zero() {
            anyhow::bail!("DB_QUERY_TIMEOUT_SECS must be greater than zero");
        }
        if self.export_session_ttl.is_zero() {
            anyhow::bail!("EXPORT_SESSION_TTL_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn database_config(&self) -> storage::DatabaseConfig {
        storage::DatabaseConfig::new(self.database_url.clone())
            .with_query_timeout(self.db_query_timeout)
    }
}
