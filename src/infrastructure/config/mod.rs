use crate::domain::quota::DEFAULT_FORGE_LIMIT;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Durable client store
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    // Gemini
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_text_model: String,
    pub gemini_image_model: String,
    // Features
    pub forge_usage_limit: u32,
    pub chat_session_idle: Duration,
    pub weather_refresh_on_start: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            _ => StoreBackend::Memory,
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err("STORE_BACKEND=postgres requires DATABASE_URL".into());
        }

        let forge_usage_limit: u32 = env::var("FORGE_USAGE_LIMIT")
            .unwrap_or_else(|_| DEFAULT_FORGE_LIMIT.to_string())
            .parse()?;
        if forge_usage_limit == 0 {
            return Err("FORGE_USAGE_LIMIT must be a positive integer".into());
        }

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            store_backend,
            database_url,
            gemini_api_key: env::var("GEMINI_API_KEY")?,
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_text_model: env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
            gemini_image_model: env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| "imagen-4.0-generate-001".to_string()),
            forge_usage_limit,
            chat_session_idle: session_idle_from_minutes(
                env::var("CHAT_SESSION_IDLE_MINUTES")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            )?,
            weather_refresh_on_start: env::var("WEATHER_REFRESH_ON_START")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Chat session idle timeout; rejects values whose seconds overflow `u64`
pub fn session_idle_from_minutes(minutes: u64) -> Result<Duration, String> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("CHAT_SESSION_IDLE_MINUTES is too large: {}", minutes))
}
