use anyhow::{Context, Result};
use std::future::IntoFuture;
use std::time::Duration;

use tracing::info;

use tower_http::{cors::CorsLayer, services::ServeDir};

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::chat_routes::chat_routes;
use super::metrics::metrics_handler;
use super::{log_requests, state::*, ServerConfig};
use crate::recommend::RecommendationPipeline;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub model: String,
    pub video_search_enabled: bool,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        model: state.pipeline.model().to_string(),
        video_search_enabled: state.pipeline.video_search_enabled(),
    };
    Json(stats)
}

pub fn make_app(config: ServerConfig, pipeline: GuardedPipeline) -> Router {
    let state = ServerState::new(config.clone(), pipeline);

    let api_routes: Router = Router::new()
        .route("/status", get(home))
        .nest("/chat", chat_routes(config.max_upload_bytes))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state, log_requests))
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(config: ServerConfig, pipeline: RecommendationPipeline) -> Result<()> {
    let address = format!("{}:{}", config.bind_address, config.port);
    let metrics_address = format!("{}:{}", config.bind_address, config.metrics_port);
    let app = make_app(config, std::sync::Arc::new(pipeline));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_address)
        .await
        .with_context(|| format!("Failed to bind metrics server on {}", metrics_address))?;

    info!("Ready to serve at {}!", address);
    info!("Metrics available at {}!", metrics_address);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            info!("HTTP server stopped: {:?}", result);
            result?;
        }
        result = axum::serve(metrics_listener, make_metrics_app()).into_future() => {
            info!("Metrics server stopped: {:?}", result);
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionOptions, CompletionProvider, LlmError, Prompt};
    use crate::recommend::RecommendationRequester;
    use crate::video::VideoEnricher;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    struct FixedProvider(&'static str);

    #[async_trait]
    impl CompletionProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-model"
        }

        async fn complete(&self, _: &Prompt, _: &CompletionOptions) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn app(reply: &'static str) -> Router {
        let requester = RecommendationRequester::new(
            Arc::new(FixedProvider(reply)),
            CompletionOptions::default(),
        );
        let pipeline = RecommendationPipeline::new(requester, VideoEnricher::disabled());
        make_app(ServerConfig::default(), Arc::new(pipeline))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 01:01:01");
    }

    #[tokio::test]
    async fn home_reports_status_without_frontend() {
        let response = app("{}")
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["model"], "fixed-model");
        assert_eq!(body["video_search_enabled"], false);
        assert!(body["uptime"].is_string());
    }

    #[tokio::test]
    async fn text_route_returns_recommendation() {
        let app = app(r#"{"emotion": "calm", "recommended_songs": [{"title": "A", "artist": "B"}]}"#);
        let response = app
            .oneshot(json_post(
                "/api/chat/text",
                serde_json::json!({"message": "quiet night"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "emotion": "calm",
                "recommended_songs": [{
                    "title": "A",
                    "artist": "B",
                    "youtube_link": "#",
                    "thumbnail": "/static/default_cover.jpg"
                }]
            })
        );
    }

    #[tokio::test]
    async fn color_route_hides_failure_detail() {
        let app = app("I would rather not answer in JSON.");
        let response = app
            .oneshot(json_post("/api/chat/color", serde_json::json!({"color": "blue"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({"error": "Could not generate a recommendation."})
        );
    }

    #[tokio::test]
    async fn combined_route_rejects_truncated_text_field() {
        let app = app(r#"{"emotion": "calm", "recommended_songs": [{"title": "A", "artist": "B"}]}"#);
        // The closing boundary never arrives, so reading the field fails
        let body = "--XYZ\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\nquiet ni";
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat/combined")
            .header("content-type", "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Could not generate a recommendation."})
        );
    }

    #[tokio::test]
    async fn bundled_placeholder_cover_is_a_jpeg() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/frontend/static/default_cover.jpg");
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xff, 0xd9]);
        assert_eq!(infer::get(&bytes).map(|k| k.mime_type()), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/chat/text")
            .header("origin", "http://elsewhere.example")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app("{}").oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn frontend_dir_is_served() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>moodtune</h1>").unwrap();

        let requester = RecommendationRequester::new(
            Arc::new(FixedProvider("{}")),
            CompletionOptions::default(),
        );
        let pipeline = RecommendationPipeline::new(requester, VideoEnricher::disabled());
        let config = ServerConfig {
            frontend_dir_path: Some(dir.path().to_string_lossy().to_string()),
            ..ServerConfig::default()
        };
        let app = make_app(config, Arc::new(pipeline));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<h1>moodtune</h1>");
    }
}
