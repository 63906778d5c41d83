//! Tolerant parsing of the extracted model JSON.
//!
//! A strict parse is tried first. If it fails, the candidate is repaired once
//! (single quotes normalized, trailing commas removed) and parsed again. The
//! parsed structure is then validated entry by entry: songs without a usable
//! title and artist are dropped instead of failing the whole answer.

use super::models::{Recommendation, SongCandidate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

lazy_static! {
    static ref TRAILING_COMMA: Regex = Regex::new(r",\s*([}\]])").unwrap();
}

#[derive(Debug, Error)]
#[error("Could not parse model reply (strict: {strict}; repaired: {repaired})")]
pub struct ParseFailed {
    pub strict: String,
    pub repaired: String,
}

/// Loose shape of the model answer. Every field is optional so that shape
/// problems are handled by validation rather than by the deserializer.
#[derive(Debug, Deserialize)]
struct RawRecommendation {
    #[serde(default)]
    emotion: Option<serde_json::Value>,
    #[serde(default)]
    recommended_songs: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawSong {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
}

impl RawSong {
    fn validate(self) -> Option<SongCandidate> {
        let title = non_blank(self.title)?;
        let artist = non_blank(self.artist)?;
        Some(SongCandidate { title, artist })
    }
}

impl RawRecommendation {
    fn validate(self) -> Recommendation {
        let emotion = self
            .emotion
            .as_ref()
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let entries = match self.recommended_songs {
            Some(serde_json::Value::Array(entries)) => entries,
            Some(other) => {
                debug!("recommended_songs is not a list: {}", other);
                Vec::new()
            }
            None => Vec::new(),
        };

        let songs = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<RawSong>(entry) {
                Ok(raw) => raw.validate(),
                Err(e) => {
                    debug!("Dropping malformed song entry: {}", e);
                    None
                }
            })
            .collect();

        Recommendation { emotion, songs }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_object(text: &str) -> Result<RawRecommendation, String> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value(value).map_err(|e| e.to_string())
        }
        Ok(_) => Err("top-level value is not an object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Parses an extracted JSON candidate into a validated [`Recommendation`].
pub fn parse(candidate: &str) -> Result<Recommendation, ParseFailed> {
    let strict = match parse_object(candidate) {
        Ok(raw) => return Ok(raw.validate()),
        Err(e) => e,
    };

    debug!("Strict parse failed ({}), retrying with repaired text", strict);
    let repaired = repair(candidate);

    parse_object(&repaired)
        .map(RawRecommendation::validate)
        .map_err(|repaired| ParseFailed { strict, repaired })
}

/// Parses candidates in order.
///
/// The first candidate yielding at least one song wins. Failing that, the
/// first candidate that parses at all is used. When none parses, the error of
/// the first candidate is returned.
pub fn parse_first(candidates: &[&str]) -> Result<Recommendation, ParseFailed> {
    let mut fallback = None;
    let mut first_error = None;
    for candidate in candidates {
        match parse(candidate) {
            Ok(recommendation) if !recommendation.songs.is_empty() => return Ok(recommendation),
            Ok(recommendation) => {
                fallback.get_or_insert(recommendation);
            }
            Err(e) => {
                debug!("Candidate rejected: {}", e);
                first_error.get_or_insert(e);
            }
        }
    }
    match (fallback, first_error) {
        (Some(recommendation), _) => Ok(recommendation),
        (None, Some(e)) => Err(e),
        (None, None) => Err(ParseFailed {
            strict: "no candidates".to_string(),
            repaired: "no candidates".to_string(),
        }),
    }
}

/// Applies the textual repairs, in order.
pub fn repair(candidate: &str) -> String {
    let normalized = normalize_quotes(candidate);
    strip_trailing_commas(&normalized)
}

/// Removes commas directly (whitespace aside) before a closing `}` or `]`.
pub fn strip_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}

/// Rewrites single-quoted strings as double-quoted ones.
///
/// Content of double-quoted strings is copied untouched, so apostrophes in
/// titles like "Don't Stop" survive. Double quotes found inside a single-quoted
/// string are escaped.
pub fn normalize_quotes(text: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Normal,
        InDouble,
        InSingle,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Normal;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '"' => {
                    state = State::InDouble;
                    out.push(c);
                }
                '\'' => {
                    state = State::InSingle;
                    out.push('"');
                }
                _ => out.push(c),
            },
            State::InDouble => {
                out.push(c);
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if c == '"' {
                    state = State::Normal;
                }
            }
            State::InSingle => match c {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(next) => {
                        out.push('\\');
                        out.push(next);
                    }
                    None => out.push('\\'),
                },
                '"' => out.push_str("\\\""),
                '\'' => {
                    state = State::Normal;
                    out.push('"');
                }
                _ => out.push(c),
            },
        }
    }
    out
}
