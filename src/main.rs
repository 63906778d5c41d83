use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodtune_server::config::{self, AppConfig, Credentials};
use moodtune_server::llm::{CompletionOptions, GeminiProvider};
use moodtune_server::recommend::{RecommendationPipeline, RecommendationRequester};
use moodtune_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};
use moodtune_server::video::{VideoEnricher, VideoSearch, YouTubeSearchClient};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The address to bind both servers to.
    #[clap(long)]
    pub bind_address: Option<String>,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Gemini model used for recommendations.
    #[clap(long)]
    pub model: Option<String>,

    /// Timeout in seconds for a completion request.
    #[clap(long, default_value_t = 60)]
    pub completion_timeout_sec: u64,

    /// Timeout in seconds for each video search call.
    #[clap(long, default_value_t = 10)]
    pub search_timeout_sec: u64,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            bind_address: args.bind_address.clone(),
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            model: args.model.clone(),
            completion_timeout_sec: args.completion_timeout_sec,
            search_timeout_sec: args.search_timeout_sec,
        }
    }
}

fn build_pipeline(app_config: &AppConfig) -> Result<RecommendationPipeline> {
    let gemini = &app_config.gemini;
    let provider = GeminiProvider::with_base_url(&gemini.base_url, &gemini.api_key, &gemini.model);
    let options = CompletionOptions {
        temperature: gemini.temperature,
        max_tokens: gemini.max_output_tokens,
        timeout: gemini.timeout,
    };
    let requester = RecommendationRequester::new(Arc::new(provider), options);

    let enricher = match &app_config.youtube {
        Some(youtube) => {
            let client =
                YouTubeSearchClient::with_base_url(&youtube.base_url, &youtube.api_key, youtube.timeout)
                    .context("Failed to create YouTube client")?;
            let search: Arc<dyn VideoSearch> = Arc::new(client);
            VideoEnricher::new(Some(search)).with_call_timeout(youtube.timeout)
        }
        None => {
            info!("YOUTUBE_API_KEY not set, songs will not be linked to videos");
            VideoEnricher::disabled()
        }
    }
    .with_placeholder_thumbnail(app_config.placeholder_thumbnail.clone());

    Ok(RecommendationPipeline::new(requester, enricher))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config, Credentials::from_env())?;

    info!("Configuration loaded:");
    info!("  port: {}", app_config.port);
    info!("  model: {}", app_config.gemini.model);
    info!("  video search: {}", app_config.youtube.is_some());
    info!("  frontend: {:?}", app_config.frontend_dir_path);

    info!("Initializing metrics...");
    metrics::init_metrics();

    let pipeline = build_pipeline(&app_config)?;

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
        bind_address: app_config.bind_address.clone(),
        frontend_dir_path: app_config.frontend_dir_path.clone(),
        max_upload_bytes: app_config.max_upload_bytes,
    };

    run_server(server_config, pipeline).await
}
