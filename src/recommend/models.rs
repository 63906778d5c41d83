//! Request-scoped data model of a recommendation.

use serde::Serialize;

/// Link used when no video could be found for a song.
pub const NO_LINK_SENTINEL: &str = "#";

/// Thumbnail used when no video thumbnail could be found for a song.
pub const DEFAULT_THUMBNAIL_PATH: &str = "/static/default_cover.jpg";

/// An uploaded image, already sniffed to be an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePayload {
    /// Detects the image type from its magic bytes. Returns `None` for anything
    /// that is not recognizably an image.
    pub fn sniff(data: Vec<u8>) -> Option<Self> {
        let kind = infer::get(&data)?;
        if !kind.mime_type().starts_with("image/") {
            return None;
        }
        Some(Self {
            mime_type: kind.mime_type().to_string(),
            data,
        })
    }
}

/// The primary mood signal of a request. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodInput {
    Text(String),
    /// A color token such as "blue"; resolved to a mood phrase before prompting.
    Color(String),
    Image(ImagePayload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub input: MoodInput,
    /// Optional free text accompanying the primary input.
    pub note: Option<String>,
}

impl RecommendationRequest {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            input: MoodInput::Text(message.into()),
            note: None,
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            input: MoodInput::Color(color.into()),
            note: None,
        }
    }

    pub fn image(image: ImagePayload) -> Self {
        Self {
            input: MoodInput::Image(image),
            note: None,
        }
    }

    /// Attach a note. Blank notes are ignored.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        let note = note.trim();
        self.note = if note.is_empty() {
            None
        } else {
            Some(note.to_string())
        };
        self
    }

    /// Short description of the request for log lines. Never includes image bytes.
    pub fn summary(&self) -> String {
        let primary = match &self.input {
            MoodInput::Text(message) => format!("text {:?}", truncate(message, 80)),
            MoodInput::Color(color) => format!("color {:?}", color),
            MoodInput::Image(image) => {
                format!("image {} ({} bytes)", image.mime_type, image.data.len())
            }
        };
        match &self.note {
            Some(note) => format!("{} + note {:?}", primary, truncate(note, 80)),
            None => primary,
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongCandidate {
    pub title: String,
    pub artist: String,
}

impl SongCandidate {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// A validated model answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub emotion: String,
    pub songs: Vec<SongCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedSong {
    pub title: String,
    pub artist: String,
    pub youtube_link: String,
    pub thumbnail: String,
}

/// The response body of every chat route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecommendation {
    pub emotion: String,
    pub recommended_songs: Vec<EnrichedSong>,
}
