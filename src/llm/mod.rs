//! Completion provider abstraction layer.
//!
//! The recommendation pipeline talks to the generative model only through the
//! [`CompletionProvider`] trait, so the production Gemini client can be swapped
//! for a test double.

mod gemini;
mod provider;
mod types;

pub use gemini::{GeminiProvider, GEMINI_API_BASE};
pub use provider::{CompletionOptions, CompletionProvider, LlmError};
pub use types::{Prompt, PromptPart};
