//! Test server lifecycle management
//!
//! Each test gets an isolated server wired to in-process fakes for the
//! completion service and the video index.

use super::constants::*;
use super::fakes::{FakeVideoSearch, ScriptedProvider};
use moodtune_server::llm::CompletionOptions;
use moodtune_server::recommend::{RecommendationPipeline, RecommendationRequester};
use moodtune_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use moodtune_server::video::{VideoEnricher, VideoSearch};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The completion fake, for prompt assertions
    pub provider: Arc<ScriptedProvider>,

    /// The search fake, when video search is enabled
    pub search: Option<Arc<FakeVideoSearch>>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server whose model always answers `reply`, without video search
    pub async fn spawn(reply: &str) -> Self {
        Self::spawn_with(ScriptedProvider::replying(reply), None, Duration::from_secs(10)).await
    }

    /// Spawns a server with video search backed by `search`
    pub async fn spawn_with_search(reply: &str, search: FakeVideoSearch) -> Self {
        Self::spawn_with(
            ScriptedProvider::replying(reply),
            Some(search),
            Duration::from_secs(10),
        )
        .await
    }

    /// Spawns a server on a random port
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready within timeout.
    pub async fn spawn_with(
        provider: ScriptedProvider,
        search: Option<FakeVideoSearch>,
        search_timeout: Duration,
    ) -> Self {
        let provider = Arc::new(provider);
        let search = search.map(Arc::new);

        let requester = RecommendationRequester::new(provider.clone(), CompletionOptions::default());
        let enricher = match &search {
            Some(search) => {
                let search: Arc<dyn VideoSearch> = search.clone();
                VideoEnricher::new(Some(search)).with_call_timeout(search_timeout)
            }
            None => VideoEnricher::disabled(),
        };
        let pipeline = RecommendationPipeline::new(requester, enricher);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            max_upload_bytes: 1024 * 1024,
            ..ServerConfig::default()
        };
        let app = make_app(config, Arc::new(pipeline));

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            provider,
            search,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
