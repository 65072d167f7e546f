//! Document-level types.

use super::{DocumentBlock, ListKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The built document: an ordered, append-only block sequence plus the
/// stylesheet its blocks reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Blocks in render order
    pub blocks: Vec<DocumentBlock>,

    /// Built-in styles used by the blocks
    pub styles: StyleSheet,
}

impl DocumentModel {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            styles: StyleSheet::new(),
        }
    }

    /// Append a block, registering the built-in style it uses.
    pub fn push(&mut self, block: DocumentBlock) {
        self.styles.register(style_name(&block));
        if matches!(block, DocumentBlock::TableRow { .. }) {
            self.styles.has_tables = true;
        }
        self.blocks.push(block);
    }

    /// Number of blocks in the document.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain text content of the whole document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Normalize styles: force the canonical text color onto every built-in
    /// style in use and enable visible table grid borders.
    ///
    /// Word processors inherit theme colors through styles; pinning the
    /// color here defeats that inheritance. Run-level explicit colors
    /// (hyperlinks, math fallbacks) are left alone. Idempotent.
    pub fn normalize_styles(&mut self, canonical_color: &str) {
        for def in self.styles.definitions.values_mut() {
            def.color = Some(canonical_color.to_string());
        }
        if self.styles.has_tables {
            self.styles.table_borders = true;
        }
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in style name used by a block, following word-processor naming.
fn style_name(block: &DocumentBlock) -> &'static str {
    match block {
        DocumentBlock::Heading { level, .. } => heading_style_name(*level),
        DocumentBlock::Paragraph { indent_level, .. } if *indent_level > 0 => "Quote",
        DocumentBlock::Paragraph { .. } | DocumentBlock::Rule | DocumentBlock::PageBreak => {
            "Normal"
        }
        DocumentBlock::ListItem {
            kind: ListKind::Bullet,
            ..
        } => "List Bullet",
        DocumentBlock::ListItem {
            kind: ListKind::Ordered,
            ..
        } => "List Number",
        DocumentBlock::CodeLine(_) => "Code",
        DocumentBlock::TableRow { .. } | DocumentBlock::Image { .. } => "Normal",
    }
}

fn heading_style_name(level: u8) -> &'static str {
    match level {
        1 => "Heading 1",
        2 => "Heading 2",
        3 => "Heading 3",
        4 => "Heading 4",
        5 => "Heading 5",
        6 => "Heading 6",
        7 => "Heading 7",
        8 => "Heading 8",
        _ => "Heading 9",
    }
}

/// The set of built-in styles a document uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleSheet {
    /// Style definitions keyed by built-in style name
    pub definitions: BTreeMap<String, StyleDefinition>,

    /// Whether table rows carry a visible grid border
    pub table_borders: bool,

    /// Whether any table rows exist in the document
    pub has_tables: bool,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style name, creating a default definition on first use.
    pub fn register(&mut self, name: &str) {
        self.definitions
            .entry(name.to_string())
            .or_insert_with(StyleDefinition::default);
    }

    /// Look up a style definition.
    pub fn get(&self, name: &str) -> Option<&StyleDefinition> {
        self.definitions.get(name)
    }
}

/// Overrides applied to one built-in style.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Text color (hex RGB); set by the normalization pass
    pub color: Option<String>,
}
