//! Prompt types shared by all completion providers.

/// One piece of a multimodal prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// Raw image bytes; providers take care of the wire encoding.
    Image { mime_type: String, data: Vec<u8> },
}

/// An ordered list of prompt parts sent as a single user turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub parts: Vec<PromptPart>,
}

impl Prompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text part.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(PromptPart::Text(content.into()));
        self
    }

    /// Append an image part.
    pub fn image(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.parts.push(PromptPart::Image {
            mime_type: mime_type.into(),
            data,
        });
        self
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, PromptPart::Image { .. }))
    }

    /// All text parts joined with blank lines. Mostly useful for logging and tests.
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                PromptPart::Text(t) => Some(t.as_str()),
                PromptPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
