//! Chat HTTP routes.
//!
//! - POST /text - `{message}` JSON body
//! - POST /color - `{color}` JSON body
//! - POST /image - multipart upload with one image file
//! - POST /combined - multipart with optional `text`, `color` and `image` fields
//!
//! Every route answers with an [`EnrichedRecommendation`] or a `{error}` body.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::recommend::{
    mood_phrase_for_color, EnrichedRecommendation, ImagePayload, RecommendError,
    RecommendationRequest,
};
use crate::server::state::{GuardedPipeline, ServerState};

const RECOMMENDATION_FAILED: &str = "Could not generate a recommendation.";
const IMAGE_RECOMMENDATION_FAILED: &str = "Could not generate a recommendation from the image.";
const IMAGE_UNREADABLE: &str = "Could not process the image file.";
const NO_IMAGE: &str = "No image file provided.";
const NO_INPUT: &str = "Provide a message, a color or an image.";

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ColorBody {
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Internal failure detail is logged by the pipeline and never leaves the server.
fn recommendation_response(
    result: Result<EnrichedRecommendation, RecommendError>,
    failure_message: &str,
) -> Response {
    match result {
        Ok(recommendation) => Json(recommendation).into_response(),
        Err(e) => {
            debug!("Recommendation failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /text
async fn chat_text(
    State(pipeline): State<GuardedPipeline>,
    Json(body): Json<TextBody>,
) -> Response {
    let result = pipeline
        .recommend(RecommendationRequest::text(body.message))
        .await;
    recommendation_response(result, RECOMMENDATION_FAILED)
}

/// POST /color
async fn chat_color(
    State(pipeline): State<GuardedPipeline>,
    Json(body): Json<ColorBody>,
) -> Response {
    let result = pipeline
        .recommend(RecommendationRequest::color(body.color))
        .await;
    recommendation_response(result, RECOMMENDATION_FAILED)
}

/// POST /image
async fn chat_image(State(pipeline): State<GuardedPipeline>, mut multipart: Multipart) -> Response {
    let mut data: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart upload: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, IMAGE_UNREADABLE);
            }
        };
        let is_file = field.name() == Some("image") || field.file_name().is_some();
        if !is_file || data.is_some() {
            continue;
        }
        match field.bytes().await {
            Ok(bytes) => data = Some(bytes.to_vec()),
            Err(e) => {
                warn!("Failed to read uploaded image: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, IMAGE_UNREADABLE);
            }
        }
    }

    let data = match data {
        Some(d) => d,
        None => return error_response(StatusCode::BAD_REQUEST, NO_IMAGE),
    };

    let image = match ImagePayload::sniff(data) {
        Some(image) => image,
        None => {
            warn!("Uploaded file is not a recognizable image");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, IMAGE_UNREADABLE);
        }
    };

    let result = pipeline.recommend(RecommendationRequest::image(image)).await;
    recommendation_response(result, IMAGE_RECOMMENDATION_FAILED)
}

#[derive(Debug, Default)]
struct CombinedInput {
    text: Option<String>,
    color: Option<String>,
    image: Option<Vec<u8>>,
}

impl CombinedInput {
    /// Image first, then color, then text. The lower priority inputs become the note.
    fn into_request(self) -> Result<Option<RecommendationRequest>, &'static str> {
        let CombinedInput { text, color, image } = self;

        if let Some(data) = image {
            let image = ImagePayload::sniff(data).ok_or(IMAGE_UNREADABLE)?;
            let note = [
                text,
                color.map(|c| format!("Chosen color mood: {}", mood_phrase_for_color(&c))),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n");
            return Ok(Some(RecommendationRequest::image(image).with_note(note)));
        }

        if let Some(color) = color {
            let request = RecommendationRequest::color(color);
            return Ok(Some(match text {
                Some(text) => request.with_note(text),
                None => request,
            }));
        }

        Ok(text.map(RecommendationRequest::text))
    }
}

/// POST /combined
async fn chat_combined(
    State(pipeline): State<GuardedPipeline>,
    mut multipart: Multipart,
) -> Response {
    let mut input = CombinedInput::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart request: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, RECOMMENDATION_FAILED);
            }
        };
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "text" | "color" => {
                let value = match field.text().await {
                    Ok(value) => non_blank(Some(value)),
                    Err(e) => {
                        warn!("Failed to read multipart field {:?}: {}", field_name, e);
                        return error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            RECOMMENDATION_FAILED,
                        );
                    }
                };
                if field_name == "text" {
                    input.text = value;
                } else {
                    input.color = value;
                }
            }
            "image" => match field.bytes().await {
                Ok(bytes) if !bytes.is_empty() => input.image = Some(bytes.to_vec()),
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read uploaded image: {}", e);
                    return error_response(StatusCode::INTERNAL_SERVER_ERROR, IMAGE_UNREADABLE);
                }
            },
            _ => {}
        }
    }

    let has_image = input.image.is_some();
    let request = match input.into_request() {
        Ok(Some(request)) => request,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, NO_INPUT),
        Err(message) => {
            warn!("Uploaded file is not a recognizable image");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, message);
        }
    };

    let failure_message = if has_image {
        IMAGE_RECOMMENDATION_FAILED
    } else {
        RECOMMENDATION_FAILED
    };
    let result = pipeline.recommend(request).await;
    recommendation_response(result, failure_message)
}

pub fn chat_routes(max_upload_bytes: usize) -> Router<ServerState> {
    let upload_routes = Router::new()
        .route("/image", post(chat_image))
        .route("/combined", post(chat_combined))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/text", post(chat_text))
        .route("/color", post(chat_color))
        .merge(upload_routes)
}
