//! Per-conversion render state.

use crate::model::{DocumentBlock, ListKind, Run, TableCell};

/// Mutable bookkeeping for one conversion pass. Created per call and
/// discarded after; nothing here is shared across conversions.
#[derive(Debug, Default)]
pub struct RenderState {
    /// Stack of open lists, innermost last
    pub list_stack: Vec<ListScope>,

    /// Table under construction
    pub table: TableBuilder,

    /// Open blockquote depth, applied as left indent to nested paragraphs
    pub quote_depth: u8,
}

impl RenderState {
    /// Create fresh state for one conversion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a newly opened list.
    pub fn push_list(&mut self, kind: ListKind) {
        let depth = self.list_stack.len() as u8 + 1;
        self.list_stack.push(ListScope { kind, depth });
    }

    /// Pop the innermost list; tolerates a close without a matching open.
    pub fn pop_list(&mut self) {
        if self.list_stack.pop().is_none() {
            log::debug!("list close without matching open");
        }
    }

    /// Kind and depth of the innermost open list. A stray item outside any
    /// list is treated as a top-level bullet.
    pub fn current_list(&self) -> (ListKind, u8) {
        self.list_stack
            .last()
            .map(|scope| (scope.kind, scope.depth))
            .unwrap_or((ListKind::Bullet, 1))
    }
}

/// One open list on the stack.
#[derive(Debug, Clone, Copy)]
pub struct ListScope {
    /// Bullet or ordered
    pub kind: ListKind,

    /// 1-based nesting depth
    pub depth: u8,
}

/// Accumulates rows and cells of the table under construction.
///
/// Flushed to `TableRow` blocks exactly once, on table close.
#[derive(Debug, Default)]
pub struct TableBuilder {
    rows: Vec<Vec<TableCell>>,
    current_row: Option<Vec<TableCell>>,
}

impl TableBuilder {
    /// Reset for a new table.
    pub fn start(&mut self) {
        self.rows.clear();
        self.current_row = None;
    }

    /// Begin a new row.
    pub fn start_row(&mut self) {
        self.current_row = Some(Vec::new());
    }

    /// Append a finished cell to the current row.
    pub fn push_cell(&mut self, runs: Vec<Run>) {
        match self.current_row.as_mut() {
            Some(row) => row.push(TableCell::new(runs)),
            None => log::debug!("table cell outside a row"),
        }
    }

    /// Finish the current row.
    pub fn end_row(&mut self) {
        if let Some(row) = self.current_row.take() {
            self.rows.push(row);
        }
    }

    /// Flush the accumulated rows into `TableRow` blocks and clear state.
    ///
    /// Column count is the maximum row width; shorter rows are right-padded
    /// with empty cells. A table with zero rows produces nothing.
    pub fn finish(&mut self) -> Vec<DocumentBlock> {
        // An unterminated row still counts.
        self.end_row();

        let width = self.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let rows = std::mem::take(&mut self.rows);
        rows.into_iter()
            .map(|mut cells| {
                cells.resize_with(width, TableCell::empty);
                DocumentBlock::TableRow { cells }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_stack_depth() {
        let mut state = RenderState::new();
        state.push_list(ListKind::Bullet);
        state.push_list(ListKind::Ordered);
        assert_eq!(state.current_list(), (ListKind::Ordered, 2));

        state.pop_list();
        state.pop_list();
        assert!(state.list_stack.is_empty());
        // Tolerated, not a panic.
        state.pop_list();
    }

    #[test]
    fn test_ragged_rows_padded_to_max_width() {
        let mut table = TableBuilder::default();
        table.start();
        for width in [3, 2, 4] {
            table.start_row();
            for i in 0..width {
                table.push_cell(vec![Run::text(format!("c{}", i))]);
            }
            table.end_row();
        }

        let blocks = table.finish();
        assert_eq!(blocks.len(), 3);
        for block in &blocks {
            match block {
                DocumentBlock::TableRow { cells } => assert_eq!(cells.len(), 4),
                other => panic!("expected table row, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_empty_table_produces_nothing() {
        let mut table = TableBuilder::default();
        table.start();
        assert!(table.finish().is_empty());
    }

    #[test]
    fn test_finish_clears_state() {
        let mut table = TableBuilder::default();
        table.start();
        table.start_row();
        table.push_cell(vec![Run::text("x")]);
        table.end_row();

        assert_eq!(table.finish().len(), 1);
        assert!(table.finish().is_empty());
    }
}
