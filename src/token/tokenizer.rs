//! Line-based block tokenizer.
//!
//! Produces the well-nested token stream the renderer consumes. Only block
//! structure is recognized here; emphasis, math, links, and images stay raw
//! inside `Inline` tokens. The tokenizer is tolerant: unclosed fences and
//! ragged indentation produce a best-effort stream, never an error.

use super::{Token, TokenKind};

/// Tokenize markup text into a well-nested token stream.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    for line in input.lines() {
        tokenizer.feed_line(line);
    }
    tokenizer.finish()
}

struct Fence {
    marker: char,
    len: usize,
    lines: Vec<String>,
}

struct Tokenizer {
    tokens: Vec<Token>,
    depth: i32,
    paragraph: Vec<String>,
    pending_item: Option<String>,
    list_stack: Vec<bool>, // true = ordered
    quote_depth: usize,
    in_table: bool,
    fence: Option<Fence>,
}

impl Tokenizer {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            depth: 0,
            paragraph: Vec::new(),
            pending_item: None,
            list_stack: Vec::new(),
            quote_depth: 0,
            in_table: false,
            fence: None,
        }
    }

    fn finish(mut self) -> Vec<Token> {
        if let Some(fence) = self.fence.take() {
            // Unclosed fence at end of input; keep what was collected.
            log::debug!("unclosed code fence at end of input");
            self.emit_fence(fence);
        }
        self.flush_paragraph();
        self.flush_item();
        self.close_lists_to(0);
        self.end_table();
        self.set_quote_depth(0);
        self.tokens
    }

    fn feed_line(&mut self, line: &str) {
        if self.fence.is_some() {
            let content = if self.quote_depth > 0 {
                strip_quote_markers(line).0
            } else {
                line.to_string()
            };
            let fence = self.fence.as_mut().expect("fence checked above");
            if is_fence_close(&content, fence.marker, fence.len) {
                let fence = self.fence.take().expect("fence checked above");
                self.emit_fence(fence);
            } else {
                fence.lines.push(content);
            }
            return;
        }

        let (content, marker_count) = strip_quote_markers(line);

        if content.trim().is_empty() {
            self.flush_paragraph();
            self.flush_item();
            self.close_lists_to(0);
            self.end_table();
            // A blank line without quote markers ends the blockquote.
            if marker_count == 0 {
                self.set_quote_depth(0);
            }
            return;
        }

        // Lazy continuation: an unmarked line directly under an open quoted
        // paragraph stays at the current quote depth.
        let quote_depth = if marker_count == 0 && self.quote_depth > 0 && !self.paragraph.is_empty()
        {
            self.quote_depth
        } else {
            marker_count
        };
        self.set_quote_depth(quote_depth);

        let indent = content.len() - content.trim_start().len();
        let rest = content.trim_start();

        if let Some((marker, len)) = fence_open(rest) {
            self.flush_paragraph();
            self.flush_item();
            self.close_lists_to(0);
            self.end_table();
            self.fence = Some(Fence {
                marker,
                len,
                lines: Vec::new(),
            });
            return;
        }

        if self.in_table && !is_table_line(rest) {
            self.end_table();
        }

        if is_table_line(rest) {
            self.flush_paragraph();
            self.flush_item();
            self.close_lists_to(0);
            if !self.in_table {
                self.open(TokenKind::TableOpen, "table");
                self.in_table = true;
            }
            if !is_table_delimiter(rest) {
                self.emit_row(rest);
            }
            return;
        }

        if let Some((level, text)) = heading(rest) {
            self.flush_paragraph();
            self.flush_item();
            self.close_lists_to(0);
            self.open(TokenKind::HeadingOpen, format!("h{}", level));
            self.tokens.push(Token::inline(text, self.depth));
            self.close(TokenKind::HeadingClose, format!("h{}", level));
            return;
        }

        if is_thematic_break(rest) {
            self.flush_paragraph();
            self.flush_item();
            self.close_lists_to(0);
            self.tokens
                .push(Token::structural(TokenKind::Rule, "hr", self.depth));
            return;
        }

        if let Some((ordered, text)) = list_marker(rest) {
            self.flush_paragraph();
            self.flush_item();

            let target = (indent / 2 + 1).min(self.list_stack.len() + 1);
            if self.list_stack.len() > target {
                self.close_lists_to(target);
            }
            if self.list_stack.len() == target && self.list_stack[target - 1] != ordered {
                // Same depth, different kind: reopen.
                self.close_lists_to(target - 1);
            }
            while self.list_stack.len() < target {
                self.open_list(ordered);
            }
            self.pending_item = Some(text.to_string());
            return;
        }

        // Plain text: continuation of an open item, or paragraph content.
        if self.pending_item.is_some() && indent >= 2 {
            let item = self.pending_item.as_mut().expect("item checked above");
            item.push('\n');
            item.push_str(rest);
            return;
        }
        if !self.list_stack.is_empty() {
            self.flush_item();
            self.close_lists_to(0);
        }
        self.paragraph.push(rest.to_string());
    }

    // -- token emission ----------------------------------------------------

    fn open(&mut self, kind: TokenKind, tag: impl Into<String>) {
        self.tokens.push(Token::structural(kind, tag, self.depth));
        self.depth += 1;
    }

    fn close(&mut self, kind: TokenKind, tag: impl Into<String>) {
        self.depth -= 1;
        self.tokens.push(Token::structural(kind, tag, self.depth));
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let content = self.paragraph.join("\n");
        self.paragraph.clear();
        self.open(TokenKind::ParagraphOpen, "p");
        self.tokens.push(Token::inline(content, self.depth));
        self.close(TokenKind::ParagraphClose, "p");
    }

    fn flush_item(&mut self) {
        if let Some(content) = self.pending_item.take() {
            self.open(TokenKind::ListItemOpen, "li");
            self.tokens.push(Token::inline(content, self.depth));
            self.close(TokenKind::ListItemClose, "li");
        }
    }

    fn open_list(&mut self, ordered: bool) {
        if ordered {
            self.open(TokenKind::OrderedListOpen, "ol");
        } else {
            self.open(TokenKind::BulletListOpen, "ul");
        }
        self.list_stack.push(ordered);
    }

    fn close_lists_to(&mut self, target: usize) {
        self.flush_item();
        while self.list_stack.len() > target {
            let ordered = self.list_stack.pop().expect("stack checked above");
            if ordered {
                self.close(TokenKind::OrderedListClose, "ol");
            } else {
                self.close(TokenKind::BulletListClose, "ul");
            }
        }
    }

    fn set_quote_depth(&mut self, target: usize) {
        if target == self.quote_depth {
            return;
        }
        self.flush_paragraph();
        self.flush_item();
        self.close_lists_to(0);
        self.end_table();
        while self.quote_depth < target {
            self.open(TokenKind::BlockquoteOpen, "blockquote");
            self.quote_depth += 1;
        }
        while self.quote_depth > target {
            self.close(TokenKind::BlockquoteClose, "blockquote");
            self.quote_depth -= 1;
        }
    }

    fn end_table(&mut self) {
        if self.in_table {
            self.close(TokenKind::TableClose, "table");
            self.in_table = false;
        }
    }

    fn emit_row(&mut self, line: &str) {
        self.open(TokenKind::RowOpen, "tr");
        for cell in split_cells(line) {
            self.open(TokenKind::CellOpen, "td");
            self.tokens.push(Token::inline(cell, self.depth));
            self.close(TokenKind::CellClose, "td");
        }
        self.close(TokenKind::RowClose, "tr");
    }

    fn emit_fence(&mut self, fence: Fence) {
        let mut token = Token::structural(TokenKind::CodeFence, "pre", self.depth);
        token.raw_content = fence.lines.join("\n");
        self.tokens.push(token);
    }
}

// -- line classification ---------------------------------------------------

/// Strip leading `>` markers, returning the remaining content and the
/// number of markers found.
fn strip_quote_markers(line: &str) -> (String, usize) {
    let mut rest = line;
    let mut count = 0;
    loop {
        let trimmed = rest.trim_start_matches(' ');
        // More than 3 leading spaces keeps the marker out of quote position.
        if rest.len() - trimmed.len() > 3 {
            break;
        }
        if let Some(after) = trimmed.strip_prefix('>') {
            count += 1;
            rest = after.strip_prefix(' ').unwrap_or(after);
        } else {
            break;
        }
    }
    (rest.to_string(), count)
}

fn fence_open(rest: &str) -> Option<(char, usize)> {
    for marker in ['`', '~'] {
        let len = rest.chars().take_while(|&c| c == marker).count();
        if len >= 3 {
            return Some((marker, len));
        }
    }
    None
}

fn is_fence_close(content: &str, marker: char, len: usize) -> bool {
    let rest = content.trim();
    !rest.is_empty()
        && rest.chars().all(|c| c == marker)
        && rest.chars().count() >= len
}

fn heading(rest: &str) -> Option<(usize, &str)> {
    let level = rest.chars().take_while(|&c| c == '#').count();
    if level == 0 {
        return None;
    }
    let after = &rest[level..];
    if after.is_empty() {
        return Some((level, ""));
    }
    let text = after.strip_prefix(' ')?;
    Some((level, text.trim().trim_end_matches('#').trim_end()))
}

fn is_thematic_break(rest: &str) -> bool {
    let significant: Vec<char> = rest.chars().filter(|c| !c.is_whitespace()).collect();
    significant.len() >= 3
        && significant.iter().all(|&c| c == significant[0])
        && matches!(significant[0], '-' | '*' | '_')
}

fn is_table_line(rest: &str) -> bool {
    rest.starts_with('|')
}

fn is_table_delimiter(rest: &str) -> bool {
    let cells = split_cells(rest);
    !cells.is_empty()
        && cells.iter().all(|c| {
            let c = c.trim();
            !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':'))
        })
}

/// Split a table line into cell contents, honoring `\|` escapes.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => {
                cells.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());

    // The line starts with '|'; drop the empty lead cell, and the trail one
    // when the line also ends with '|'.
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

fn list_marker(rest: &str) -> Option<(bool, &str)> {
    if let Some(after) = rest
        .strip_prefix("- ")
        .or_else(|| rest.strip_prefix("* "))
        .or_else(|| rest.strip_prefix("+ "))
    {
        return Some((false, after.trim_start()));
    }
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && digits <= 9 {
        let after = &rest[digits..];
        if let Some(text) = after
            .strip_prefix(". ")
            .or_else(|| after.strip_prefix(") "))
        {
            return Some((true, text.trim_start()));
        }
    }
    None
}
