//! Integration tests for the highlight layers
//!
//! Tests search-layer rebuilds (including zero-width patterns), block
//! selection geometry, and layer precedence.

use kawauso::highlight::base_style;
use kawauso::{Document, HighlightSet};

fn spans(layer: &[kawauso::HighlightSpan]) -> Vec<(usize, usize)> {
    layer.iter().map(|s| (s.start, s.end)).collect()
}

#[test]
fn test_search_finds_all_matches_in_order() {
    let doc = Document::from_string("foo bar foo\nfoo");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "foo");

    assert_eq!(spans(&highlights.search), vec![(0, 3), (8, 11), (12, 15)]);
}

#[test]
fn test_search_spans_use_char_offsets() {
    let doc = Document::from_string("héllo héllo");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "héllo");

    assert_eq!(spans(&highlights.search), vec![(0, 5), (6, 11)]);
}

#[test]
fn test_empty_pattern_clears_search_layer() {
    let doc = Document::from_string("foo foo");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "foo");
    assert!(!highlights.search.is_empty());

    highlights.rebuild_search(&doc, "");
    assert!(highlights.search.is_empty());
}

#[test]
fn test_invalid_pattern_leaves_search_layer_empty() {
    let doc = Document::from_string("foo (foo");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "(");

    assert!(highlights.search.is_empty());
}

#[test]
fn test_no_matches_leaves_search_layer_empty() {
    let doc = Document::from_string("abc");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "zzz");

    assert!(highlights.search.is_empty());
}

#[test]
fn test_zero_width_pattern_terminates() {
    // "a*" matches empty at every position; the scan must still finish
    let doc = Document::from_string("baa b");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "a*");

    assert_eq!(spans(&highlights.search), vec![(1, 3)]);
}

#[test]
fn test_fully_zero_width_pattern_on_empty_document() {
    let doc = Document::new();
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "x*");

    assert!(highlights.search.is_empty());
}

#[test]
fn test_search_crosses_line_boundaries_by_offset() {
    let doc = Document::from_string("ab\ncd");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "cd");

    // "cd" starts after "ab" plus one newline char
    assert_eq!(spans(&highlights.search), vec![(3, 5)]);
}

#[test]
fn test_block_selection_geometry() {
    let mut doc = Document::from_string("alpha\nbeta\ngamma");
    doc.cursor_pos = (0, 1);
    doc.set_anchor_at_cursor();
    doc.cursor_pos = (2, 3);

    let mut highlights = HighlightSet::new();
    highlights.set_block_selection(&doc, true);

    // One span per line in the row range, columns 1..3 on each
    assert_eq!(spans(&highlights.block), vec![(1, 3), (7, 9), (12, 14)]);
    // The clear layer covers the whole linear range in base colors
    assert_eq!(spans(&highlights.clear), vec![(1, 14)]);
    assert_eq!(highlights.clear[0].style, base_style());
}

#[test]
fn test_block_selection_clips_to_short_lines() {
    let mut doc = Document::from_string("long line\nab\nlong line");
    doc.cursor_pos = (0, 4);
    doc.set_anchor_at_cursor();
    doc.cursor_pos = (2, 7);

    let mut highlights = HighlightSet::new();
    highlights.set_block_selection(&doc, true);

    // The middle line is shorter than the column range; its span collapses
    // to the clipped end of the line
    assert_eq!(spans(&highlights.block), vec![(4, 7), (12, 12), (17, 20)]);
}

#[test]
fn test_block_selection_column_order_is_normalized() {
    // Anchor to the right of the cursor
    let mut doc = Document::from_string("abcdef\nabcdef");
    doc.cursor_pos = (0, 5);
    doc.set_anchor_at_cursor();
    doc.cursor_pos = (1, 2);

    let mut highlights = HighlightSet::new();
    highlights.set_block_selection(&doc, true);

    assert_eq!(spans(&highlights.block), vec![(2, 5), (9, 12)]);
}

#[test]
fn test_block_selection_off_clears_both_layers() {
    let mut doc = Document::from_string("alpha\nbeta");
    doc.cursor_pos = (0, 0);
    doc.set_anchor_at_cursor();
    doc.cursor_pos = (1, 2);

    let mut highlights = HighlightSet::new();
    highlights.set_block_selection(&doc, true);
    assert!(!highlights.block.is_empty());

    highlights.set_block_selection(&doc, false);
    assert!(highlights.block.is_empty());
    assert!(highlights.clear.is_empty());
}

#[test]
fn test_block_selection_without_anchor_is_empty() {
    let doc = Document::from_string("alpha");
    let mut highlights = HighlightSet::new();
    highlights.set_block_selection(&doc, true);

    assert!(highlights.block.is_empty());
}

#[test]
fn test_later_layers_win_at_overlapping_offsets() {
    let mut doc = Document::from_string("foofoo\nfoofoo");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "foo");

    doc.cursor_pos = (0, 0);
    doc.set_anchor_at_cursor();
    doc.cursor_pos = (1, 2);
    highlights.set_block_selection(&doc, true);

    let search_style = highlights.search[0].style;
    let block_style = highlights.block[0].style;
    assert_ne!(search_style, block_style);

    // Offset 0 is covered by clear, search, and block; block is applied last
    assert_eq!(highlights.style_at(0), Some(block_style));
    // Offset 3 starts the second "foo": inside clear and search, outside
    // the 0..2 block columns
    assert_eq!(highlights.style_at(3), Some(search_style));
    // Offset far past every span has no override
    assert_eq!(highlights.style_at(100), None);
}
