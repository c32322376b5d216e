use serde_json::json;

use super::*;

// =============================================================
// Deserialization
// =============================================================

#[test]
fn heading_deserializes_from_tagged_json() {
    let block: ContentBlock = serde_json::from_value(json!({"type": "heading", "level": 2, "text": "Hi"})).unwrap();
    assert_eq!(block, ContentBlock::Heading { level: 2, text: "Hi".into() });
}

#[test]
fn table_uses_header_cells_field_name() {
    let block: ContentBlock = serde_json::from_value(json!({
        "type": "table",
        "headerCells": ["a", "b"],
        "rows": [["1", "2"]],
    }))
    .unwrap();
    assert_eq!(block.kind(), ElementKind::Table);
}

#[test]
fn missing_field_is_rejected() {
    let result = serde_json::from_value::<ContentBlock>(json!({"type": "heading", "text": "no level"}));
    assert!(result.is_err());
}

#[test]
fn unknown_type_is_rejected() {
    let result = serde_json::from_value::<ContentBlock>(json!({"type": "image", "src": "x.png"}));
    assert!(result.is_err());
}

// =============================================================
// Validation
// =============================================================

#[test]
fn valid_blocks_pass() {
    let blocks = [
        ContentBlock::Heading { level: 1, text: "A".into() },
        ContentBlock::Paragraph { text: String::new() },
        ContentBlock::List { items: vec![] },
        ContentBlock::Table { header_cells: vec!["h".into()], rows: vec![] },
    ];
    for (i, b) in blocks.iter().enumerate() {
        assert!(b.validate(i).is_ok());
    }
}

#[test]
fn heading_level_zero_is_rejected() {
    let b = ContentBlock::Heading { level: 0, text: "A".into() };
    assert_eq!(b.validate(3), Err(BlockError::InvalidHeadingLevel { index: 3, level: 0 }));
}

#[test]
fn heading_level_seven_is_rejected() {
    let b = ContentBlock::Heading { level: 7, text: "A".into() };
    assert!(matches!(b.validate(0), Err(BlockError::InvalidHeadingLevel { level: 7, .. })));
}

#[test]
fn table_without_header_is_rejected() {
    let b = ContentBlock::Table { header_cells: vec![], rows: vec![vec!["x".into()]] };
    assert_eq!(b.validate(1), Err(BlockError::EmptyTableHeader { index: 1 }));
}

// =============================================================
// Inline markup cleanup
// =============================================================

#[test]
fn clean_strips_bold_and_italic() {
    assert_eq!(clean_inline_markup("**bold** and *it*").unwrap(), "bold and it");
    assert_eq!(clean_inline_markup("__bold__ and _it_").unwrap(), "bold and it");
}

#[test]
fn clean_strips_code_and_links() {
    assert_eq!(clean_inline_markup("run `cargo` via [docs](https://x.y)").unwrap(), "run cargo via docs");
}

#[test]
fn clean_trims_whitespace() {
    assert_eq!(clean_inline_markup("  plain  ").unwrap(), "plain");
}

#[test]
fn bold_marker_detection() {
    assert!(has_bold_markers("a **b** c"));
    assert!(has_bold_markers("a __b__ c"));
    assert!(!has_bold_markers("a *b* c"));
}
