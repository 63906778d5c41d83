//! Prompt templates for the completion service.

use super::models::{MoodInput, RecommendationRequest};
use crate::llm::Prompt;

/// Fixed color token to mood phrase table.
const COLOR_MOODS: &[(&str, &str)] = &[
    ("red", "a passionate and intense feeling, like the color red"),
    ("blue", "a calm and peaceful feeling, like the color blue"),
    ("yellow", "a bright and lively feeling, like the color yellow"),
    ("green", "a mysterious and creative feeling, like the color green"),
    ("pink", "a romantic and soft feeling, like the color pink"),
    ("orange", "a warm and energetic feeling, like the color orange"),
];

const UNKNOWN_COLOR_MOOD: &str = "a feeling that matches the chosen color";

const TEXT_INSTRUCTIONS: &str = r#"You are an empathetic chatbot that recommends songs matching the user's mood.

Analyze the request above and:
1. Summarize the user's feeling, or the core of the request, in one short phrase (for example: "an upbeat feeling, perfect for a drive"). Write it in the same language as the request.
2. Recommend the 3 songs that fit the situation best.
   - If the user mentions a specific genre, region, language or artist (for example "pop songs" or "J-POP"), the recommendations MUST honor that constraint.
   - Otherwise, freely pick songs from whichever country's music fits the request best."#;

const IMAGE_INSTRUCTIONS: &str = r#"Analyze the attached image as a whole: its atmosphere, color palette, subject, composition and situation. Then:
1. Summarize the mood of the image in one short phrase.
2. Recommend 3 songs that match it.
   - Also honor the user's additional request, if there is one. Any genre, region, language or artist mentioned there MUST be respected."#;

const RESPONSE_FORMAT: &str = r#"Your answer must be a single JSON object with exactly this shape:
{
    "emotion": "summary of the analyzed feeling or image mood",
    "recommended_songs": [
        {"title": "song title", "artist": "artist name"},
        {"title": "song title", "artist": "artist name"},
        {"title": "song title", "artist": "artist name"}
    ]
}"#;

/// Resolves a color token to its mood phrase. Unknown tokens get a generic phrase.
pub fn mood_phrase_for_color(color: &str) -> &'static str {
    let color = color.trim();
    COLOR_MOODS
        .iter()
        .find(|(token, _)| token.eq_ignore_ascii_case(color))
        .map(|(_, phrase)| *phrase)
        .unwrap_or(UNKNOWN_COLOR_MOOD)
}

/// Builds the completion prompt for a request.
///
/// Text and color inputs produce a text-only prompt. Image inputs produce the
/// image instructions, the optional note, the image itself and the response
/// format, in that order.
pub fn build_prompt(request: &RecommendationRequest) -> Prompt {
    match &request.input {
        MoodInput::Image(image) => {
            let mut prompt = Prompt::new().text(IMAGE_INSTRUCTIONS);
            if let Some(note) = &request.note {
                prompt = prompt.text(format!("Additional user request: {}", note));
            }
            prompt
                .image(image.mime_type.clone(), image.data.clone())
                .text(RESPONSE_FORMAT)
        }
        MoodInput::Text(message) => text_prompt(message, request.note.as_deref()),
        MoodInput::Color(color) => text_prompt(mood_phrase_for_color(color), request.note.as_deref()),
    }
}

fn text_prompt(message: &str, note: Option<&str>) -> Prompt {
    let mut request_block = format!("User request: \"{}\"", message.trim());
    if let Some(note) = note {
        request_block.push_str(&format!("\nAdditional user request: \"{}\"", note));
    }
    Prompt::new()
        .text(format!("{}\n\n{}", request_block, TEXT_INSTRUCTIONS))
        .text(RESPONSE_FORMAT)
}
