mod file_config;

pub use file_config::{FileConfig, GeminiConfig, YouTubeConfig};

use crate::llm::GEMINI_API_BASE;
use crate::recommend::models::DEFAULT_THUMBNAIL_PATH;
use crate::server::RequestsLoggingLevel;
use crate::video::YOUTUBE_API_BASE;
use anyhow::Result;
use clap::ValueEnum;
use std::time::Duration;
use thiserror::Error;

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_TEMPERATURE: f32 = 0.9;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingCredential(&'static str),
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub bind_address: Option<String>,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub model: Option<String>,
    pub completion_timeout_sec: u64,
    pub search_timeout_sec: u64,
}

/// API keys, read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub gemini_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            gemini_api_key: read(GEMINI_API_KEY_VAR),
            youtube_api_key: read(YOUTUBE_API_KEY_VAR),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct YouTubeSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub placeholder_thumbnail: String,
    pub max_upload_bytes: usize,

    pub gemini: GeminiSettings,
    /// `None` when no key is configured or lookups are disabled.
    pub youtube: Option<YouTubeSettings>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        credentials: Credentials,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let gemini_api_key = credentials
            .gemini_api_key
            .ok_or(ConfigError::MissingCredential(GEMINI_API_KEY_VAR))?;

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        let bind_address = file
            .bind_address
            .or_else(|| cli.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let placeholder_thumbnail = file
            .placeholder_thumbnail
            .unwrap_or_else(|| DEFAULT_THUMBNAIL_PATH.to_string());
        let max_upload_bytes = file.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB) * 1024 * 1024;

        let gemini_file = file.gemini.unwrap_or_default();
        let gemini = GeminiSettings {
            api_key: gemini_api_key,
            model: gemini_file
                .model
                .or_else(|| cli.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: gemini_file
                .base_url
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            temperature: gemini_file.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_output_tokens: gemini_file.max_output_tokens,
            timeout: Duration::from_secs(
                gemini_file.timeout_sec.unwrap_or(cli.completion_timeout_sec),
            ),
        };

        let youtube_file = file.youtube.unwrap_or_default();
        let youtube_enabled = youtube_file.enabled.unwrap_or(true);
        let youtube = match (youtube_enabled, credentials.youtube_api_key) {
            (true, Some(api_key)) => Some(YouTubeSettings {
                api_key,
                base_url: youtube_file
                    .base_url
                    .unwrap_or_else(|| YOUTUBE_API_BASE.to_string()),
                timeout: Duration::from_secs(
                    youtube_file.timeout_sec.unwrap_or(cli.search_timeout_sec),
                ),
            }),
            _ => None,
        };

        Ok(Self {
            port,
            metrics_port,
            bind_address,
            logging_level,
            frontend_dir_path,
            placeholder_thumbnail,
            max_upload_bytes,
            gemini,
            youtube,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
