//! Run-level types: styled text fragments and embedded math spans.

use crate::math::{DisplayMode, MathRepresentation};
use serde::{Deserialize, Serialize};

/// Inline content within a block: a styled text run or a math span.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Run {
    /// A text run with styling
    Text(TextRun),

    /// An embedded math expression with its transcoded representation
    Math(MathSpan),
}

impl Run {
    /// Create a plain text run.
    pub fn text(text: impl Into<String>) -> Self {
        Run::Text(TextRun::new(text))
    }

    /// Plain text content of this run (math spans yield their source).
    pub fn plain_text(&self) -> &str {
        match self {
            Run::Text(run) => &run.text,
            Run::Math(span) => &span.source,
        }
    }

    /// Check whether this run is a math span.
    pub fn is_math(&self) -> bool {
        matches!(self, Run::Math(_))
    }
}

/// A contiguous text span sharing one formatting state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Strikethrough text
    pub strike: bool,

    /// Monospace (code) text
    pub monospace: bool,

    /// Explicit text color (hex RGB, e.g. "0000FF"); `None` inherits the
    /// style color
    pub color: Option<String>,

    /// Hyperlink target URL
    pub hyperlink: Option<String>,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::new(text)
        }
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::new(text)
        }
    }

    /// Create a monospace (inline code) run.
    pub fn code(text: impl Into<String>) -> Self {
        Self {
            monospace: true,
            ..Self::new(text)
        }
    }

    /// Create a hyperlink run: underlined, colored, clickable.
    pub fn link(text: impl Into<String>, url: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            hyperlink: Some(url.into()),
            color: Some(color.into()),
            ..Self::new(text)
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if any character styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.strike || self.monospace
    }
}

/// A math occurrence embedded in a run sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathSpan {
    /// Original math source with delimiters stripped
    pub source: String,

    /// Inline or block display
    pub display_mode: DisplayMode,

    /// Transcoded representation (always one of the three tiers)
    pub representation: MathRepresentation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_constructors() {
        let run = TextRun::bold("hello");
        assert!(run.bold);
        assert!(!run.italic);
        assert!(run.has_styling());

        let plain = TextRun::new("plain");
        assert!(!plain.has_styling());
    }

    #[test]
    fn test_link_run() {
        let run = TextRun::link("docs", "https://example.com", "0000FF");
        assert_eq!(run.hyperlink.as_deref(), Some("https://example.com"));
        assert_eq!(run.color.as_deref(), Some("0000FF"));
    }

    #[test]
    fn test_plain_text_of_math_run() {
        let run = Run::Math(MathSpan {
            source: "x^2".to_string(),
            display_mode: DisplayMode::Inline,
            representation: MathRepresentation::FallbackText("x^2".to_string()),
        });
        assert_eq!(run.plain_text(), "x^2");
        assert!(run.is_math());
    }
}
