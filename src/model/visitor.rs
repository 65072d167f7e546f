//! Visitor seam for walking a finished document model.
//!
//! Serializers for concrete file formats live outside this crate; they
//! attach here. The walk preserves block order exactly.

use super::{DocumentBlock, DocumentModel, ListKind, Run, TableCell};

/// Action returned by visitor methods to control the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Continue with the next element.
    #[default]
    Continue,

    /// Skip this element (its runs are not visited).
    Skip,
}

/// Trait for visiting document blocks in order.
///
/// All methods default to `VisitorAction::Continue`.
pub trait DocumentVisitor {
    /// Called for each heading block.
    fn visit_heading(&mut self, level: u8, runs: &[Run]) -> VisitorAction {
        let _ = (level, runs);
        VisitorAction::Continue
    }

    /// Called for each paragraph block.
    fn visit_paragraph(&mut self, runs: &[Run], indent_level: u8, centered: bool) -> VisitorAction {
        let _ = (runs, indent_level, centered);
        VisitorAction::Continue
    }

    /// Called for each list item block.
    fn visit_list_item(&mut self, kind: ListKind, depth: u8, runs: &[Run]) -> VisitorAction {
        let _ = (kind, depth, runs);
        VisitorAction::Continue
    }

    /// Called for each table row block.
    fn visit_table_row(&mut self, cells: &[TableCell]) -> VisitorAction {
        let _ = cells;
        VisitorAction::Continue
    }

    /// Called for each code line block.
    fn visit_code_line(&mut self, text: &str) -> VisitorAction {
        let _ = text;
        VisitorAction::Continue
    }

    /// Called for each thematic break.
    fn visit_rule(&mut self) -> VisitorAction {
        VisitorAction::Continue
    }

    /// Called for each explicit page break.
    fn visit_page_break(&mut self) -> VisitorAction {
        VisitorAction::Continue
    }

    /// Called for each image block.
    fn visit_image(&mut self, data: &[u8], width: u32, height: u32) -> VisitorAction {
        let _ = (data, width, height);
        VisitorAction::Continue
    }

    /// Called for each run inside a visited block.
    fn visit_run(&mut self, run: &Run) {
        let _ = run;
    }
}

/// Walk every block of a document through a visitor, in order.
pub fn walk_document(doc: &DocumentModel, visitor: &mut dyn DocumentVisitor) {
    for block in &doc.blocks {
        let action = match block {
            DocumentBlock::Heading { level, runs } => visitor.visit_heading(*level, runs),
            DocumentBlock::Paragraph {
                runs,
                indent_level,
                centered,
            } => visitor.visit_paragraph(runs, *indent_level, *centered),
            DocumentBlock::ListItem { kind, depth, runs } => {
                visitor.visit_list_item(*kind, *depth, runs)
            }
            DocumentBlock::TableRow { cells } => visitor.visit_table_row(cells),
            DocumentBlock::CodeLine(text) => visitor.visit_code_line(text),
            DocumentBlock::Rule => visitor.visit_rule(),
            DocumentBlock::PageBreak => visitor.visit_page_break(),
            DocumentBlock::Image {
                data,
                width,
                height,
            } => visitor.visit_image(data, *width, *height),
        };

        if action == VisitorAction::Skip {
            continue;
        }

        match block {
            DocumentBlock::Heading { runs, .. }
            | DocumentBlock::Paragraph { runs, .. }
            | DocumentBlock::ListItem { runs, .. } => {
                for run in runs {
                    visitor.visit_run(run);
                }
            }
            DocumentBlock::TableRow { cells } => {
                for cell in cells {
                    for run in &cell.runs {
                        visitor.visit_run(run);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        headings: usize,
        runs: usize,
    }

    impl DocumentVisitor for Counter {
        fn visit_heading(&mut self, _level: u8, _runs: &[Run]) -> VisitorAction {
            self.headings += 1;
            VisitorAction::Skip
        }

        fn visit_run(&mut self, _run: &Run) {
            self.runs += 1;
        }
    }

    #[test]
    fn test_skip_suppresses_run_visits() {
        let mut doc = DocumentModel::new();
        doc.push(DocumentBlock::Heading {
            level: 1,
            runs: vec![Run::text("skipped")],
        });
        doc.push(DocumentBlock::paragraph(vec![
            Run::text("a"),
            Run::text("b"),
        ]));

        let mut counter = Counter::default();
        walk_document(&doc, &mut counter);

        assert_eq!(counter.headings, 1);
        assert_eq!(counter.runs, 2);
    }
}
