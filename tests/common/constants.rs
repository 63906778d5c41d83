//! Shared constants for end-to-end tests
//!
//! Canned model replies and upload payloads live here. When the reply format
//! used by the tests changes, update only this file.

#![allow(dead_code)]

// ============================================================================
// Canned Model Replies
// ============================================================================

/// Clean reply with three complete songs
pub const REPLY_THREE_SONGS: &str = r#"{
    "emotion": "a calm and peaceful evening",
    "recommended_songs": [
        {"title": "Blueming", "artist": "IU"},
        {"title": "Yellow", "artist": "Coldplay"},
        {"title": "Plastic Love", "artist": "Mariya Takeuchi"}
    ]
}"#;

/// Reply with prose, a fence, single quotes and a trailing comma
pub const REPLY_MESSY: &str = "Of course! Here is what I picked for you:\n```json\n{'emotion': 'excited', 'recommended_songs': [{'title': 'Dynamite', 'artist': 'BTS'}, {'title': 'Hype Boy', 'artist': 'NewJeans'},]}\n```\nHave fun!";

/// Reply whose prose contains braces before the JSON object
pub const REPLY_PROSE_BRACES: &str = "Your mood sounds {calm}. Here you go:\n{\"emotion\": \"calm\", \"recommended_songs\": [{\"title\": \"Blueming\", \"artist\": \"IU\"}, {\"title\": \"Yellow\", \"artist\": \"Coldplay\"}]}";

/// Single-quoted reply with a closing brace inside a value
pub const REPLY_QUOTED_BRACE: &str =
    "{'emotion': 'a } mood', 'recommended_songs': [{'title': 'Rain', 'artist': 'Taeyeon'}]}";

/// Reply where the second song has no artist
pub const REPLY_INCOMPLETE_SONG: &str =
    r#"{"emotion":"calm","recommended_songs":[{"title":"A","artist":"B"},{"title":"C"}]}"#;

/// Reply with no JSON at all
pub const REPLY_NO_JSON: &str = "I'm sorry, I can't recommend songs right now.";

/// Reply with braces that can't be repaired into JSON
pub const REPLY_BROKEN_JSON: &str = "{emotion: happy; songs => none}";

// ============================================================================
// Error Messages
// ============================================================================

pub const ERROR_RECOMMENDATION: &str = "Could not generate a recommendation.";
pub const ERROR_IMAGE_RECOMMENDATION: &str = "Could not generate a recommendation from the image.";
pub const ERROR_IMAGE_UNREADABLE: &str = "Could not process the image file.";

// ============================================================================
// Enrichment Defaults
// ============================================================================

pub const NO_LINK: &str = "#";
pub const PLACEHOLDER_THUMBNAIL: &str = "/static/default_cover.jpg";

// ============================================================================
// Upload Payloads
// ============================================================================

/// Smallest valid PNG header, enough for type detection
pub const PNG_BYTES: [u8; 16] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
];

pub const NOT_AN_IMAGE: &[u8] = b"this is a text file pretending to be a photo";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
