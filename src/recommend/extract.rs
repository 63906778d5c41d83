//! Locating the JSON object inside a free-form model reply.
//!
//! Models wrap their JSON in prose, in markdown code fences, or both, and the
//! prose itself may contain braces. The extractor therefore produces an
//! ordered list of candidate spans rather than a single guess: each
//! [`ExtractionStrategy`] is run over the content of the first fenced block
//! (if any), then over the whole reply. Callers try candidates in order.

/// One way of finding JSON object spans in text.
pub trait ExtractionStrategy: Send + Sync + std::fmt::Debug {
    /// Name for log lines.
    fn name(&self) -> &'static str;

    /// Candidate spans borrowed from `text`, most likely first.
    fn candidates<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// The span from `text[0]` (which must be `{`) to its matching `}`.
///
/// Nesting-aware. Braces inside double- or single-quoted strings (with `\`
/// escapes) are ignored. Yields nothing when the object is never closed.
fn balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// A balanced span starting at each successive `{`, in order of position.
#[derive(Debug, Default)]
pub struct BalancedBraceSpan;

impl ExtractionStrategy for BalancedBraceSpan {
    fn name(&self) -> &'static str {
        "balanced_brace_span"
    }

    fn candidates<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.match_indices('{')
            .filter_map(|(start, _)| balanced_span(&text[start..]))
            .collect()
    }
}

/// First `{` to last `}`, no questions asked.
#[derive(Debug, Default)]
pub struct GreedyBraceSpan;

impl ExtractionStrategy for GreedyBraceSpan {
    fn name(&self) -> &'static str {
        "greedy_brace_span"
    }

    fn candidates<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
            return Vec::new();
        };
        if end <= start {
            return Vec::new();
        }
        vec![&text[start..=end]]
    }
}

const FENCE: &str = "```";

/// Content of the first fenced block, without the language tag.
///
/// An unterminated fence yields everything after the opening marker.
pub fn fenced_content(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let rest = &text[open + FENCE.len()..];
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let body = &rest[tag_len..];
    let inner = match body.find(FENCE) {
        Some(close) => &body[..close],
        None => body,
    };
    Some(inner.trim())
}

fn is_json_object(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(serde_json::Value::Object(_))
    )
}

#[derive(Debug)]
pub struct ResponseExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::with_strategies(vec![Box::new(BalancedBraceSpan), Box::new(GreedyBraceSpan)])
    }
}

impl ResponseExtractor {
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Every distinct candidate span: fenced content before whole text, and
    /// within each scope strategies in order. Empty means the model gave no
    /// structured answer at all.
    pub fn candidates<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut found: Vec<&'a str> = Vec::new();
        let scopes = [fenced_content(text), Some(text)];
        for scope in scopes.into_iter().flatten() {
            for strategy in &self.strategies {
                for span in strategy.candidates(scope) {
                    if !found.contains(&span) {
                        tracing::trace!(strategy = strategy.name(), "JSON candidate located");
                        found.push(span);
                    }
                }
            }
        }
        found
    }

    /// The substring most likely to be the reply's JSON object: the first
    /// candidate that is already a valid JSON object, otherwise the first
    /// candidate.
    pub fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        let candidates = self.candidates(text);
        candidates
            .iter()
            .copied()
            .find(|c| is_json_object(c))
            .or_else(|| candidates.first().copied())
    }
}

/// [`ResponseExtractor::extract`] with the default strategies.
pub fn extract(text: &str) -> Option<&str> {
    ResponseExtractor::default().extract(text)
}
