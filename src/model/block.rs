//! Block-level types of the document model.

use super::Run;
use serde::{Deserialize, Serialize};

/// Kind of list a list item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Bulleted list
    Bullet,
    /// Numbered list
    Ordered,
}

/// One cell of a table row, holding its own run sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub runs: Vec<Run>,
}

impl TableCell {
    /// Create a cell from runs.
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Create an empty cell (used to right-pad short rows).
    pub fn empty() -> Self {
        Self { runs: Vec::new() }
    }

    /// Plain text content of the cell.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.plain_text()).collect()
    }
}

/// A formatted block of the output document.
///
/// Blocks are appended in render order; the finished sequence is the output
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentBlock {
    /// A heading with its level and content
    Heading {
        /// Heading level, clamped to `1..=MAX_HEADING`
        level: u8,
        /// Heading content
        runs: Vec<Run>,
    },

    /// A paragraph of runs
    Paragraph {
        /// Paragraph content
        runs: Vec<Run>,
        /// Left-indent steps inherited from enclosing blockquotes
        indent_level: u8,
        /// Centered (used for block-mode math paragraphs)
        centered: bool,
    },

    /// One item of a bulleted or numbered list
    ListItem {
        /// List kind taken from the innermost open list
        kind: ListKind,
        /// Nesting depth, 1 for a top-level list
        depth: u8,
        /// Item content
        runs: Vec<Run>,
    },

    /// One row of a table
    TableRow {
        /// Cells, right-padded so every row of a table has equal width
        cells: Vec<TableCell>,
    },

    /// One line of a fenced code block, fixed monospace
    CodeLine(String),

    /// Thematic break, rendered as a bottom-border separator
    Rule,

    /// Explicit page break
    PageBreak,

    /// A resolved image scaled to its display size
    Image {
        /// Encoded image bytes as supplied by the resolver
        #[serde(skip_serializing, default)]
        data: Vec<u8>,
        /// Display width in pixels
        width: u32,
        /// Display height in pixels
        height: u32,
    },
}

impl DocumentBlock {
    /// Create a plain paragraph block.
    pub fn paragraph(runs: Vec<Run>) -> Self {
        DocumentBlock::Paragraph {
            runs,
            indent_level: 0,
            centered: false,
        }
    }

    /// Plain text content of the block, for inspection and tests.
    pub fn plain_text(&self) -> String {
        match self {
            DocumentBlock::Heading { runs, .. }
            | DocumentBlock::Paragraph { runs, .. }
            | DocumentBlock::ListItem { runs, .. } => {
                runs.iter().map(|r| r.plain_text()).collect()
            }
            DocumentBlock::TableRow { cells } => cells
                .iter()
                .map(|c| c.plain_text())
                .collect::<Vec<_>>()
                .join("\t"),
            DocumentBlock::CodeLine(text) => text.clone(),
            DocumentBlock::Rule | DocumentBlock::PageBreak | DocumentBlock::Image { .. } => {
                String::new()
            }
        }
    }

    /// Check whether the block carries no visible content.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentBlock::Heading { runs, .. }
            | DocumentBlock::Paragraph { runs, .. }
            | DocumentBlock::ListItem { runs, .. } => runs.is_empty(),
            DocumentBlock::TableRow { cells } => cells.is_empty(),
            DocumentBlock::CodeLine(_)
            | DocumentBlock::Rule
            | DocumentBlock::PageBreak
            | DocumentBlock::Image { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    #[test]
    fn test_plain_text() {
        let block = DocumentBlock::paragraph(vec![
            Run::text("Hello "),
            Run::Text(TextRun::bold("world")),
        ]);
        assert_eq!(block.plain_text(), "Hello world");
    }

    #[test]
    fn test_table_row_plain_text() {
        let row = DocumentBlock::TableRow {
            cells: vec![
                TableCell::new(vec![Run::text("a")]),
                TableCell::empty(),
                TableCell::new(vec![Run::text("c")]),
            ],
        };
        assert_eq!(row.plain_text(), "a\t\tc");
    }

    #[test]
    fn test_is_empty() {
        assert!(DocumentBlock::paragraph(vec![]).is_empty());
        assert!(!DocumentBlock::Rule.is_empty());
    }
}
