//! Integration tests for the rendering engine.

use mdocx::{
    convert_str, convert_with_images, DocumentBlock, ImageMap, ListKind, MathRepresentation,
    RenderOptions, Run,
};

// Smallest valid 1x1 PNG, used wherever a decodable image is needed.
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[test]
fn test_three_level_nested_lists_render_flat_and_ordered() {
    let markup = "\
- top bullet
  1. nested number
    - deep bullet
  2. second number
- another top
";
    let doc = convert_str(markup).unwrap();

    let items: Vec<(ListKind, u8, String)> = doc
        .blocks
        .iter()
        .filter_map(|b| match b {
            DocumentBlock::ListItem { kind, depth, .. } => {
                Some((*kind, *depth, b.plain_text()))
            }
            _ => None,
        })
        .collect();

    assert_eq!(items.len(), 5);
    assert_eq!(items[0], (ListKind::Bullet, 1, "top bullet".to_string()));
    assert_eq!(items[1], (ListKind::Ordered, 2, "nested number".to_string()));
    assert_eq!(items[2], (ListKind::Bullet, 3, "deep bullet".to_string()));
    assert_eq!(items[3], (ListKind::Ordered, 2, "second number".to_string()));
    assert_eq!(items[4], (ListKind::Bullet, 1, "another top".to_string()));
}

#[test]
fn test_emphasis_produces_four_styled_runs() {
    let doc = convert_str("**bold** and *italic* and ~~gone~~ and `code`").unwrap();

    let runs: Vec<&Run> = match &doc.blocks[0] {
        DocumentBlock::Paragraph { runs, .. } => runs.iter().collect(),
        other => panic!("expected paragraph, got {:?}", other),
    };

    let styled: Vec<&&Run> = runs
        .iter()
        .filter(|r| match r {
            Run::Text(t) => t.has_styling(),
            Run::Math(_) => false,
        })
        .collect();
    assert_eq!(styled.len(), 4);

    // Left-to-right order, never reordered.
    assert_eq!(doc.blocks[0].plain_text(), "bold and italic and gone and code");
}

#[test]
fn test_malformed_math_never_raises() {
    let doc = convert_str(r"Broken: $\frac{1}{$ still a document").unwrap();

    let math_reprs: Vec<&MathRepresentation> = doc
        .blocks
        .iter()
        .flat_map(|b| match b {
            DocumentBlock::Paragraph { runs, .. } => runs.iter().collect::<Vec<_>>(),
            _ => Vec::new(),
        })
        .filter_map(|r| match r {
            Run::Math(span) => Some(&span.representation),
            _ => None,
        })
        .collect();

    assert_eq!(math_reprs.len(), 1);
    assert!(matches!(
        math_reprs[0],
        MathRepresentation::FallbackImage { .. } | MathRepresentation::FallbackText(_)
    ));
}

#[test]
fn test_ragged_table_padded_to_four_columns() {
    let markup = "\
| a | b | c |
|---|---|---|
| d | e |
| f | g | h | i |
";
    let doc = convert_str(markup).unwrap();

    let rows: Vec<&Vec<mdocx::TableCell>> = doc
        .blocks
        .iter()
        .filter_map(|b| match b {
            DocumentBlock::TableRow { cells } => Some(cells),
            _ => None,
        })
        .collect();

    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.len(), 4);
    }
    // The short row's missing cells render as empty strings.
    assert_eq!(rows[1][2].plain_text(), "");
    assert_eq!(rows[1][3].plain_text(), "");
    assert!(doc.styles.table_borders);
}

#[test]
fn test_escaped_dollars_are_not_math() {
    let doc = convert_str(r"\$5 is not math\$").unwrap();

    let has_math = doc.blocks.iter().any(|b| match b {
        DocumentBlock::Paragraph { runs, .. } => runs.iter().any(|r| r.is_math()),
        _ => false,
    });
    assert!(!has_math);
    assert_eq!(doc.plain_text(), "$5 is not math$");
}

#[test]
fn test_inline_image_splits_paragraph() {
    let mut images = ImageMap::new();
    images.insert("imgid", TINY_PNG.to_vec());
    let options = RenderOptions::default();

    let doc = convert_with_images("before ![x](imgid) after", &options, &images).unwrap();

    assert_eq!(doc.block_count(), 3);
    assert_eq!(doc.blocks[0].plain_text().trim(), "before");
    assert!(matches!(doc.blocks[1], DocumentBlock::Image { .. }));
    assert_eq!(doc.blocks[2].plain_text().trim(), "after");
}

#[test]
fn test_missing_image_leaves_one_paragraph() {
    let images = ImageMap::new();
    let options = RenderOptions::default();

    let doc = convert_with_images("before ![x](imgid) after", &options, &images).unwrap();

    assert_eq!(doc.block_count(), 1);
    assert_eq!(doc.blocks[0].plain_text(), "before  after");
}

#[test]
fn test_style_normalization_is_idempotent() {
    let markup = "# H\n\n> quote\n\n- item\n\n| a |\n|---|\n| b |\n";
    let mut doc = convert_str(markup).unwrap();

    let once = serde_json::to_string(&doc).unwrap();
    doc.normalize_styles("000000");
    let twice = serde_json::to_string(&doc).unwrap();

    assert_eq!(once, twice);
    for name in ["Heading 1", "Quote", "List Bullet", "Normal"] {
        assert_eq!(
            doc.styles.get(name).unwrap().color.as_deref(),
            Some("000000"),
            "style {} missing canonical color",
            name
        );
    }
}

#[test]
fn test_mixed_document_end_to_end() {
    let markup = "\
# Report

Intro with **bold**, a [link](https://example.com), and $a^2 + b^2 = c^2$.

\\newpage

## Data

| x | y |
|---|---|
| 1 | 2 |

```
let x = 1;
```

---

> closing thought
";
    let doc = convert_str(markup).unwrap();

    let kinds: Vec<&str> = doc
        .blocks
        .iter()
        .map(|b| match b {
            DocumentBlock::Heading { .. } => "heading",
            DocumentBlock::Paragraph { .. } => "paragraph",
            DocumentBlock::ListItem { .. } => "list_item",
            DocumentBlock::TableRow { .. } => "table_row",
            DocumentBlock::CodeLine(_) => "code_line",
            DocumentBlock::Rule => "rule",
            DocumentBlock::PageBreak => "page_break",
            DocumentBlock::Image { .. } => "image",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "heading",
            "paragraph",
            "page_break",
            "heading",
            "table_row",
            "table_row",
            "code_line",
            "rule",
            "paragraph",
        ]
    );

    // The pythagorean identity transcoded natively.
    let native_math = doc.blocks.iter().any(|b| match b {
        DocumentBlock::Paragraph { runs, .. } => runs.iter().any(|r| match r {
            Run::Math(span) => span.representation.is_native(),
            _ => false,
        }),
        _ => false,
    });
    assert!(native_math);

    // The quote carries its indent.
    assert!(matches!(
        doc.blocks.last().unwrap(),
        DocumentBlock::Paragraph { indent_level: 1, .. }
    ));
}

#[test]
fn test_hyperlink_run_contract() {
    let doc = convert_str("see [docs](https://example.com)").unwrap();

    let link = match &doc.blocks[0] {
        DocumentBlock::Paragraph { runs, .. } => runs
            .iter()
            .find_map(|r| match r {
                Run::Text(t) if t.hyperlink.is_some() => Some(t),
                _ => None,
            })
            .unwrap(),
        other => panic!("expected paragraph, got {:?}", other),
    };

    assert_eq!(link.text, "docs");
    assert_eq!(link.hyperlink.as_deref(), Some("https://example.com"));
    assert_eq!(link.color.as_deref(), Some("0000FF"));
}
