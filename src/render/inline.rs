//! Inline rendering: math isolation, then emphasis grammar.
//!
//! Raw inline text is split into math spans and styled text runs. Math
//! delimiters are honored first so emphasis markers inside formulas are
//! never misread; the remaining text segments get the longest-match
//! emphasis grammar. Malformed or overlapping markers degrade to literal
//! text — inline rendering has no failure mode.

use crate::math::{self, DisplayMode, MathExpression};
use crate::model::{ImageMap, MathSpan, ResolvedImage, Run, TextRun};
use crate::render::RenderOptions;
use regex::Regex;

/// One piece of rendered inline content, in source order.
#[derive(Debug)]
pub enum InlinePiece {
    /// A styled run (text or math span)
    Run(Run),

    /// A resolved inline image, which interrupts the enclosing paragraph
    Image(ResolvedImage),
}

/// Renders raw inline text into runs, math spans, and image references.
pub struct InlineRenderer<'a> {
    options: &'a RenderOptions,
    images: &'a ImageMap,
    image_pattern: Regex,
}

impl<'a> InlineRenderer<'a> {
    /// Create an inline renderer over the given options and image map.
    pub fn new(options: &'a RenderOptions, images: &'a ImageMap) -> Self {
        Self {
            options,
            images,
            image_pattern: Regex::new(r"!\[([^\]]*)\]\(([^()\s]+)\)").unwrap(),
        }
    }

    /// Render raw inline content into ordered pieces.
    pub fn render(&self, raw: &str) -> Vec<InlinePiece> {
        // Soft line breaks inside a block collapse to spaces.
        let text = raw.replace('\n', " ");

        let mut pieces = Vec::new();
        for segment in isolate_math(&text) {
            match segment {
                Segment::Math(expr) => {
                    let representation = math::transcode(&expr, self.options.rasterizer_ref());
                    pieces.push(InlinePiece::Run(Run::Math(MathSpan {
                        source: expr.source,
                        display_mode: expr.display_mode,
                        representation,
                    })));
                }
                Segment::Text(body) => self.render_text(&body, &mut pieces),
            }
        }
        pieces
    }

    /// Split a math-free text segment at image references, applying the
    /// emphasis grammar to the stretches between them.
    fn render_text(&self, text: &str, pieces: &mut Vec<InlinePiece>) {
        let mut last = 0;
        for caps in self.image_pattern.captures_iter(text) {
            let whole = caps.get(0).expect("group 0 always present");
            self.render_emphasis(&text[last..whole.start()], pieces);
            last = whole.end();

            let id = &caps[2];
            match self.images.resolve(id, self.options.image_max_width) {
                Some(resolved) => pieces.push(InlinePiece::Image(resolved)),
                None => log::debug!("skipping unresolvable image id {:?}", id),
            }
        }
        self.render_emphasis(&text[last..], pieces);
    }

    /// Longest-match emphasis grammar over one stretch of plain text.
    fn render_emphasis(&self, text: &str, pieces: &mut Vec<InlinePiece>) {
        let chars: Vec<char> = text.chars().collect();
        let mut plain = String::new();
        let mut i = 0;

        while i < chars.len() {
            if starts_with(&chars, i, &['*', '*', '*']) {
                if let Some(j) = find_marker(&chars, i + 3, &['*', '*', '*']) {
                    if j > i + 3 {
                        flush_plain(&mut plain, pieces);
                        let inner: String = chars[i + 3..j].iter().collect();
                        pieces.push(InlinePiece::Run(Run::Text(TextRun {
                            bold: true,
                            italic: true,
                            ..TextRun::new(inner)
                        })));
                        i = j + 3;
                        continue;
                    }
                }
            }
            if starts_with(&chars, i, &['*', '*']) {
                if let Some(j) = find_marker(&chars, i + 2, &['*', '*']) {
                    if j > i + 2 {
                        flush_plain(&mut plain, pieces);
                        let inner: String = chars[i + 2..j].iter().collect();
                        pieces.push(InlinePiece::Run(Run::Text(TextRun::bold(inner))));
                        i = j + 2;
                        continue;
                    }
                }
            }
            if starts_with(&chars, i, &['~', '~']) {
                if let Some(j) = find_marker(&chars, i + 2, &['~', '~']) {
                    if j > i + 2 {
                        flush_plain(&mut plain, pieces);
                        let inner: String = chars[i + 2..j].iter().collect();
                        pieces.push(InlinePiece::Run(Run::Text(TextRun {
                            strike: true,
                            ..TextRun::new(inner)
                        })));
                        i = j + 2;
                        continue;
                    }
                }
            }
            if chars[i] == '`' {
                if let Some(j) = find_char(&chars, i + 1, '`') {
                    if j > i + 1 {
                        flush_plain(&mut plain, pieces);
                        let inner: String = chars[i + 1..j].iter().collect();
                        pieces.push(InlinePiece::Run(Run::Text(TextRun::code(inner))));
                        i = j + 1;
                        continue;
                    }
                }
            }
            if chars[i] == '*' {
                // A lone closing star: one that is not half of a `**` pair.
                if let Some(j) = find_lone_star(&chars, i + 1) {
                    if j > i + 1 {
                        flush_plain(&mut plain, pieces);
                        let inner: String = chars[i + 1..j].iter().collect();
                        pieces.push(InlinePiece::Run(Run::Text(TextRun::italic(inner))));
                        i = j + 1;
                        continue;
                    }
                }
            }
            if chars[i] == '[' {
                if let Some((text_end, url_end)) = link_bounds(&chars, i) {
                    flush_plain(&mut plain, pieces);
                    let label: String = chars[i + 1..text_end].iter().collect();
                    let url: String = chars[text_end + 2..url_end].iter().collect();
                    pieces.push(InlinePiece::Run(Run::Text(TextRun::link(
                        label,
                        url,
                        self.options.link_color.clone(),
                    ))));
                    i = url_end + 1;
                    continue;
                }
            }

            plain.push(chars[i]);
            i += 1;
        }
        flush_plain(&mut plain, pieces);
    }
}

fn flush_plain(plain: &mut String, pieces: &mut Vec<InlinePiece>) {
    if !plain.is_empty() {
        pieces.push(InlinePiece::Run(Run::text(std::mem::take(plain))));
    }
}

fn starts_with(chars: &[char], at: usize, pat: &[char]) -> bool {
    chars.len() >= at + pat.len() && chars[at..at + pat.len()] == *pat
}

fn find_marker(chars: &[char], from: usize, pat: &[char]) -> Option<usize> {
    (from..chars.len().checked_sub(pat.len() - 1)?).find(|&k| starts_with(chars, k, pat))
}

fn find_char(chars: &[char], from: usize, ch: char) -> Option<usize> {
    (from..chars.len()).find(|&k| chars[k] == ch)
}

/// Find a `*` that is not adjacent to another `*`, so an italic close never
/// consumes half of a `**` pair.
fn find_lone_star(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len()).find(|&k| {
        chars[k] == '*' && chars.get(k + 1) != Some(&'*') && (k == 0 || chars[k - 1] != '*')
    })
}

/// Bounds of a `[text](url)` link at position `i`: the indices of `]` and
/// `)`. The url may not contain whitespace.
fn link_bounds(chars: &[char], i: usize) -> Option<(usize, usize)> {
    let text_end = find_char(chars, i + 1, ']')?;
    if chars.get(text_end + 1) != Some(&'(') {
        return None;
    }
    let url_end = find_char(chars, text_end + 2, ')')?;
    if chars[text_end + 2..url_end]
        .iter()
        .any(|c| c.is_whitespace())
    {
        return None;
    }
    Some((text_end, url_end))
}

// -- math isolation --------------------------------------------------------

enum Segment {
    Text(String),
    Math(MathExpression),
}

/// Split raw text into math expressions and literal stretches.
///
/// `$$…$$` (first non-greedy close) is block math, `$…$` is inline math,
/// `\$` is a literal dollar sign, and an unterminated delimiter stays
/// literal text.
fn isolate_math(text: &str) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    let flush = |literal: &mut String, segments: &mut Vec<Segment>| {
        if !literal.is_empty() {
            segments.push(Segment::Text(std::mem::take(literal)));
        }
    };

    while i < chars.len() {
        if chars[i] == '\\' && chars.get(i + 1) == Some(&'$') {
            literal.push('$');
            i += 2;
            continue;
        }
        if chars[i] == '$' {
            if chars.get(i + 1) == Some(&'$') {
                if let Some(j) = find_marker(&chars, i + 2, &['$', '$']) {
                    flush(&mut literal, &mut segments);
                    let source: String = chars[i + 2..j].iter().collect();
                    segments.push(Segment::Math(MathExpression::new(
                        source.trim(),
                        DisplayMode::Block,
                    )));
                    i = j + 2;
                    continue;
                }
                literal.push_str("$$");
                i += 2;
                continue;
            }
            if let Some(j) = find_closing_dollar(&chars, i + 1) {
                flush(&mut literal, &mut segments);
                let source: String = chars[i + 1..j].iter().collect();
                segments.push(Segment::Math(MathExpression::new(
                    source.trim(),
                    DisplayMode::Inline,
                )));
                i = j + 1;
                continue;
            }
            literal.push('$');
            i += 1;
            continue;
        }
        literal.push(chars[i]);
        i += 1;
    }
    flush(&mut literal, &mut segments);
    segments
}

/// Find the closing `$` of an inline span, skipping escaped `\$`.
fn find_closing_dollar(chars: &[char], from: usize) -> Option<usize> {
    let mut k = from;
    while k < chars.len() {
        if chars[k] == '\\' && chars.get(k + 1) == Some(&'$') {
            k += 2;
            continue;
        }
        if chars[k] == '$' {
            return Some(k);
        }
        k += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::MathRepresentation;

    fn render(raw: &str) -> Vec<InlinePiece> {
        let options = RenderOptions::default();
        let images = ImageMap::new();
        InlineRenderer::new(&options, &images).render(raw)
    }

    fn text_runs(pieces: &[InlinePiece]) -> Vec<&TextRun> {
        pieces
            .iter()
            .filter_map(|p| match p {
                InlinePiece::Run(Run::Text(run)) => Some(run),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_four_styled_runs_left_to_right() {
        let pieces = render("**bold** and *italic* and ~~gone~~ and `code`");
        let runs = text_runs(&pieces);
        let styled: Vec<&&TextRun> = runs.iter().filter(|r| r.has_styling()).collect();
        assert_eq!(styled.len(), 4);
        assert!(styled[0].bold);
        assert!(styled[1].italic);
        assert!(styled[2].strike);
        assert!(styled[3].monospace);

        let joined: String = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "bold and italic and gone and code");
    }

    #[test]
    fn test_triple_star_is_bold_italic() {
        let pieces = render("***both***");
        let runs = text_runs(&pieces);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].bold && runs[0].italic);
        assert_eq!(runs[0].text, "both");
    }

    #[test]
    fn test_escaped_dollars_produce_no_math() {
        let pieces = render(r"\$5 is not math\$");
        assert!(pieces.iter().all(|p| match p {
            InlinePiece::Run(run) => !run.is_math(),
            _ => false,
        }));
        let joined: String = text_runs(&pieces).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "$5 is not math$");
    }

    #[test]
    fn test_unterminated_dollar_is_literal() {
        let pieces = render("price is $5 today");
        let joined: String = text_runs(&pieces).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "price is $5 today");
    }

    #[test]
    fn test_inline_and_block_math_modes() {
        let pieces = render("before $x$ and $$y$$ after");
        let modes: Vec<DisplayMode> = pieces
            .iter()
            .filter_map(|p| match p {
                InlinePiece::Run(Run::Math(span)) => Some(span.display_mode),
                _ => None,
            })
            .collect();
        assert_eq!(modes, vec![DisplayMode::Inline, DisplayMode::Block]);
    }

    #[test]
    fn test_emphasis_inside_math_untouched() {
        let pieces = render("$a ** b$");
        assert_eq!(pieces.len(), 1);
        match &pieces[0] {
            InlinePiece::Run(Run::Math(span)) => assert_eq!(span.source, "a ** b"),
            other => panic!("expected math span, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_markers_degrade_to_literal() {
        let pieces = render("**unclosed and ~~also");
        let joined: String = text_runs(&pieces).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "**unclosed and ~~also");
    }

    #[test]
    fn test_link_run() {
        let pieces = render("see [the docs](https://example.com) here");
        let runs = text_runs(&pieces);
        let link = runs.iter().find(|r| r.hyperlink.is_some()).unwrap();
        assert_eq!(link.text, "the docs");
        assert_eq!(link.hyperlink.as_deref(), Some("https://example.com"));
        assert_eq!(link.color.as_deref(), Some("0000FF"));
    }

    #[test]
    fn test_bracket_without_url_is_literal() {
        let pieces = render("just [brackets] here");
        let joined: String = text_runs(&pieces).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "just [brackets] here");
    }

    #[test]
    fn test_unresolvable_image_skipped_silently() {
        let pieces = render("before ![x](missing) after");
        assert!(pieces
            .iter()
            .all(|p| matches!(p, InlinePiece::Run(Run::Text(_)))));
        let joined: String = text_runs(&pieces).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "before  after");
    }

    #[test]
    fn test_math_fallback_for_malformed_source() {
        let pieces = render(r"$\frac{1}{$");
        match &pieces[0] {
            InlinePiece::Run(Run::Math(span)) => {
                assert!(matches!(
                    span.representation,
                    MathRepresentation::FallbackText(_)
                ));
            }
            other => panic!("expected math span, got {:?}", other),
        }
    }
}
