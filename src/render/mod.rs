//! Rendering: one forward pass over the token stream into document blocks.
//!
//! The block renderer walks the token stream through a [`TokenCursor`] with
//! bounded one-token lookahead, maintaining per-call [`RenderState`] for
//! lists, tables, and blockquotes. Inline content is handed to the
//! [`InlineRenderer`]; everything lands as ordered [`DocumentBlock`]s.
//! Malformed nesting is tolerated with best-effort continuation — nothing
//! here aborts a render.

mod inline;
mod options;
mod state;

pub use inline::{InlinePiece, InlineRenderer};
pub use options::RenderOptions;
pub use state::{ListScope, RenderState, TableBuilder};

use crate::error::{Error, Result};
use crate::math::DisplayMode;
use crate::model::{DocumentBlock, DocumentModel, ImageMap, ListKind, Run};
use crate::token::{tokenize, Token, TokenCursor, TokenKind};

/// Render markup text into a document model.
///
/// Empty or whitespace-only markup is rejected upfront; everything else
/// renders, degrading gracefully around malformed input.
pub fn render(markup: &str, options: &RenderOptions, images: &ImageMap) -> Result<DocumentModel> {
    if markup.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    let tokens = tokenize(markup);
    Ok(BlockRenderer::new(options, images).render_tokens(&tokens))
}

/// Renders a token stream into ordered document blocks.
pub struct BlockRenderer<'a> {
    options: &'a RenderOptions,
    inline: InlineRenderer<'a>,
}

impl<'a> BlockRenderer<'a> {
    /// Create a block renderer over the given options and image map.
    pub fn new(options: &'a RenderOptions, images: &'a ImageMap) -> Self {
        Self {
            options,
            inline: InlineRenderer::new(options, images),
        }
    }

    /// Render a token stream. Single pass, O(n) in token count.
    pub fn render_tokens(&self, tokens: &[Token]) -> DocumentModel {
        let mut doc = DocumentModel::new();
        let mut state = RenderState::new();
        let mut cursor = TokenCursor::new(tokens);

        while let Some(token) = cursor.advance() {
            match token.kind {
                TokenKind::HeadingOpen => {
                    let raw = take_inline(&mut cursor);
                    let level = token
                        .heading_level()
                        .unwrap_or(1)
                        .clamp(1, self.options.max_heading_level);
                    let (runs, images) = self.runs_and_images(&raw);
                    if !runs.is_empty() {
                        doc.push(DocumentBlock::Heading { level, runs });
                    }
                    for image in images {
                        doc.push(image);
                    }
                }

                TokenKind::ParagraphOpen => {
                    let raw = take_inline(&mut cursor);
                    if raw.trim() == self.options.page_break_marker {
                        doc.push(DocumentBlock::PageBreak);
                    } else {
                        self.emit_paragraph(&mut doc, &raw, state.quote_depth);
                    }
                }

                TokenKind::BulletListOpen => state.push_list(ListKind::Bullet),
                TokenKind::OrderedListOpen => state.push_list(ListKind::Ordered),
                TokenKind::BulletListClose | TokenKind::OrderedListClose => state.pop_list(),

                TokenKind::ListItemOpen => {
                    let raw = take_inline(&mut cursor);
                    let raw = self.rewrite_checklist(&raw);
                    let (kind, depth) = state.current_list();
                    let (runs, images) = self.runs_and_images(&raw);
                    doc.push(DocumentBlock::ListItem { kind, depth, runs });
                    for image in images {
                        doc.push(image);
                    }
                }

                TokenKind::BlockquoteOpen => {
                    state.quote_depth = state.quote_depth.saturating_add(1);
                }
                TokenKind::BlockquoteClose => {
                    state.quote_depth = state.quote_depth.saturating_sub(1);
                }

                TokenKind::TableOpen => state.table.start(),
                TokenKind::RowOpen => state.table.start_row(),
                TokenKind::CellOpen => {
                    let raw = take_inline(&mut cursor);
                    // Images make no sense inside a cell; keep the runs.
                    let (runs, _) = self.runs_and_images(&raw);
                    state.table.push_cell(runs);
                }
                TokenKind::RowClose => state.table.end_row(),
                TokenKind::TableClose => {
                    for block in state.table.finish() {
                        doc.push(block);
                    }
                }

                TokenKind::CodeFence => {
                    for line in token.raw_content.lines() {
                        doc.push(DocumentBlock::CodeLine(line.to_string()));
                    }
                }

                TokenKind::Rule => doc.push(DocumentBlock::Rule),

                TokenKind::Inline => {
                    // Stray inline content outside any open block; keep it.
                    log::debug!("inline token outside an open block");
                    self.emit_paragraph(&mut doc, &token.raw_content, state.quote_depth);
                }

                TokenKind::HeadingClose
                | TokenKind::ParagraphClose
                | TokenKind::ListItemClose
                | TokenKind::CellClose => {}
            }
        }

        if !state.list_stack.is_empty() {
            log::debug!("token stream left {} lists unclosed", state.list_stack.len());
        }
        doc.normalize_styles(&self.options.text_color);
        doc
    }

    /// Render inline content and emit it as one or more paragraphs,
    /// splitting at inline images and (configurably) at block-mode math.
    fn emit_paragraph(&self, doc: &mut DocumentModel, raw: &str, indent_level: u8) {
        let mut runs: Vec<Run> = Vec::new();

        for piece in self.inline.render(raw) {
            match piece {
                InlinePiece::Run(run) => {
                    let block_math = matches!(
                        &run,
                        Run::Math(span) if span.display_mode == DisplayMode::Block
                    );
                    if block_math && self.options.split_paragraph_on_block_math {
                        flush_paragraph(doc, &mut runs, indent_level);
                        doc.push(DocumentBlock::Paragraph {
                            runs: vec![run],
                            indent_level,
                            centered: true,
                        });
                    } else {
                        runs.push(run);
                    }
                }
                InlinePiece::Image(image) => {
                    flush_paragraph(doc, &mut runs, indent_level);
                    doc.push(DocumentBlock::Image {
                        data: image.data,
                        width: image.width,
                        height: image.height,
                    });
                }
            }
        }
        flush_paragraph(doc, &mut runs, indent_level);
    }

    /// Render inline content into runs, collecting interrupting images as
    /// blocks to emit after the enclosing one.
    fn runs_and_images(&self, raw: &str) -> (Vec<Run>, Vec<DocumentBlock>) {
        let mut runs = Vec::new();
        let mut images = Vec::new();
        for piece in self.inline.render(raw) {
            match piece {
                InlinePiece::Run(run) => runs.push(run),
                InlinePiece::Image(image) => images.push(DocumentBlock::Image {
                    data: image.data,
                    width: image.width,
                    height: image.height,
                }),
            }
        }
        (runs, images)
    }

    /// Rewrite a leading checklist prefix to its glyph before inline
    /// rendering.
    fn rewrite_checklist(&self, raw: &str) -> String {
        if let Some(rest) = raw.strip_prefix("[ ]") {
            format!("{}{}", self.options.unchecked_glyph, rest)
        } else if let Some(rest) = raw.strip_prefix("[x]").or_else(|| raw.strip_prefix("[X]")) {
            format!("{}{}", self.options.checked_glyph, rest)
        } else {
            raw.to_string()
        }
    }
}

/// Consume the inline token of an open block, if present. Bounded
/// lookahead: only the immediately next token is inspected.
fn take_inline(cursor: &mut TokenCursor<'_>) -> String {
    match cursor.peek(0) {
        Some(token) if token.kind == TokenKind::Inline => {
            let raw = token.raw_content.clone();
            cursor.advance();
            raw
        }
        _ => String::new(),
    }
}

fn flush_paragraph(doc: &mut DocumentModel, runs: &mut Vec<Run>, indent_level: u8) {
    if runs.is_empty() {
        return;
    }
    doc.push(DocumentBlock::Paragraph {
        runs: std::mem::take(runs),
        indent_level,
        centered: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_doc(markup: &str) -> DocumentModel {
        let options = RenderOptions::default();
        let images = ImageMap::new();
        render(markup, &options, &images).unwrap()
    }

    #[test]
    fn test_empty_input_rejected() {
        let options = RenderOptions::default();
        let images = ImageMap::new();
        assert!(matches!(
            render("", &options, &images),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            render("   \n\t\n", &options, &images),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_heading_and_paragraph() {
        let doc = render_doc("# Title\n\nBody text here.\n");
        assert_eq!(doc.block_count(), 2);
        assert!(matches!(
            doc.blocks[0],
            DocumentBlock::Heading { level: 1, .. }
        ));
        assert_eq!(doc.blocks[1].plain_text(), "Body text here.");
    }

    #[test]
    fn test_heading_level_clamped() {
        let options = RenderOptions::default().with_max_heading(6);
        let images = ImageMap::new();
        let doc = render("####### Deep\n", &options, &images).unwrap();
        assert!(matches!(
            doc.blocks[0],
            DocumentBlock::Heading { level: 6, .. }
        ));
    }

    #[test]
    fn test_page_break_marker() {
        let doc = render_doc("before\n\n\\newpage\n\nafter\n");
        assert_eq!(doc.block_count(), 3);
        assert!(matches!(doc.blocks[1], DocumentBlock::PageBreak));
    }

    #[test]
    fn test_list_items_styled_by_innermost_list() {
        let doc = render_doc("- a\n  1. b\n    - c\n");
        let items: Vec<(&ListKind, &u8)> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                DocumentBlock::ListItem { kind, depth, .. } => Some((kind, depth)),
                _ => None,
            })
            .collect();
        assert_eq!(
            items,
            vec![
                (&ListKind::Bullet, &1),
                (&ListKind::Ordered, &2),
                (&ListKind::Bullet, &3),
            ]
        );
    }

    #[test]
    fn test_checklist_glyph_rewrite() {
        let doc = render_doc("- [ ] open task\n- [x] done task\n");
        assert_eq!(doc.blocks[0].plain_text(), "☐ open task");
        assert_eq!(doc.blocks[1].plain_text(), "☑ done task");
    }

    #[test]
    fn test_blockquote_indents_paragraph() {
        let doc = render_doc("> quoted\n\nplain\n");
        assert!(matches!(
            doc.blocks[0],
            DocumentBlock::Paragraph { indent_level: 1, .. }
        ));
        assert!(matches!(
            doc.blocks[1],
            DocumentBlock::Paragraph { indent_level: 0, .. }
        ));
    }

    #[test]
    fn test_code_fence_lines() {
        let doc = render_doc("```\nfirst\nsecond\n```\n");
        let lines: Vec<&str> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                DocumentBlock::CodeLine(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_rule_block() {
        let doc = render_doc("above\n\n---\n\nbelow\n");
        assert!(matches!(doc.blocks[1], DocumentBlock::Rule));
    }

    #[test]
    fn test_block_math_splits_paragraph_by_default() {
        let doc = render_doc("intro $$x^2$$ outro\n");
        assert_eq!(doc.block_count(), 3);
        assert!(matches!(
            doc.blocks[1],
            DocumentBlock::Paragraph { centered: true, .. }
        ));
    }

    #[test]
    fn test_block_math_embedded_when_split_disabled() {
        let options = RenderOptions::default().with_block_math_split(false);
        let images = ImageMap::new();
        let doc = render("intro $$x^2$$ outro\n", &options, &images).unwrap();
        assert_eq!(doc.block_count(), 1);
    }

    #[test]
    fn test_table_close_with_zero_rows_emits_nothing() {
        // Only a delimiter row: the table opens and closes without content.
        let doc = render_doc("|---|---|\n\ntext\n");
        assert!(doc
            .blocks
            .iter()
            .all(|b| !matches!(b, DocumentBlock::TableRow { .. })));
    }
}
