//! Integration tests for the render widgets
//!
//! Renders the editor view, status bar, and notice modal into a test
//! backend and inspects the buffer contents.

use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, widgets::Widget, Terminal};

use kawauso::widgets::{EditorView, Notice, StatusBar};
use kawauso::{Document, HighlightSet};

fn render_to_buffer<W: Widget>(widget: W, width: u16, height: u16) -> Buffer {
    let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
    widget.render(buf.area, &mut buf);
    buf
}

fn row_text(buf: &Buffer, y: u16) -> String {
    (0..buf.area.width)
        .map(|x| buf[(x, y)].symbol().to_string())
        .collect()
}

#[test]
fn test_editor_view_renders_lines_with_numbers() {
    let doc = Document::from_string("alpha\nbeta");
    let highlights = HighlightSet::new();

    let buf = render_to_buffer(EditorView::new(&doc, &highlights), 20, 3);

    assert!(row_text(&buf, 0).starts_with("1 alpha"));
    assert!(row_text(&buf, 1).starts_with("2 beta"));
}

#[test]
fn test_editor_view_without_line_numbers() {
    let doc = Document::from_string("alpha");
    let highlights = HighlightSet::new();
    let mut view = EditorView::new(&doc, &highlights);
    view.show_line_numbers = false;

    assert_eq!(view.gutter_width(), 0);
    let buf = render_to_buffer(view, 20, 1);
    assert!(row_text(&buf, 0).starts_with("alpha"));
}

#[test]
fn test_editor_view_gutter_grows_with_line_count() {
    let text = vec!["x"; 120].join("\n");
    let doc = Document::from_string(&text);
    let highlights = HighlightSet::new();

    // Three digits plus the separator column
    assert_eq!(EditorView::new(&doc, &highlights).gutter_width(), 4);
}

#[test]
fn test_editor_view_scrolls_vertically() {
    let doc = Document::from_string("one\ntwo\nthree\nfour");
    let highlights = HighlightSet::new();
    let mut view = EditorView::new(&doc, &highlights);
    view.scroll_offset = (2, 0);

    let buf = render_to_buffer(view, 20, 2);
    assert!(row_text(&buf, 0).starts_with("3 three"));
    assert!(row_text(&buf, 1).starts_with("4 four"));
}

#[test]
fn test_editor_view_cursor_cell_is_styled() {
    let mut doc = Document::from_string("ab");
    doc.cursor_pos = (0, 1);
    let highlights = HighlightSet::new();
    let mut view = EditorView::new(&doc, &highlights);
    view.show_line_numbers = false;

    let buf = render_to_buffer(view, 10, 1);
    assert_ne!(buf[(1, 0)].style(), buf[(0, 0)].style());
}

#[test]
fn test_search_highlight_changes_cell_style() {
    let doc = Document::from_string("xx match xx");
    let mut highlights = HighlightSet::new();
    highlights.rebuild_search(&doc, "match");
    let mut view = EditorView::new(&doc, &highlights);
    view.show_line_numbers = false;

    let buf = render_to_buffer(view, 15, 1);
    assert_ne!(buf[(3, 0)].style(), buf[(0, 0)].style());
    assert_eq!(buf[(3, 0)].style(), buf[(7, 0)].style());
}

#[test]
fn test_status_bar_paints_published_line() {
    let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
    terminal
        .draw(|f| f.render_widget(StatusBar::new(":w file"), f.area()))
        .unwrap();

    let buf = terminal.backend().buffer();
    assert!(row_text(buf, 0).starts_with(":w file"));
}

#[test]
fn test_status_bar_tolerates_zero_height() {
    let mut buf = Buffer::empty(Rect::new(0, 0, 10, 0));
    StatusBar::new("line").render(buf.area, &mut buf);
}

#[test]
fn test_notice_modal_is_centered_with_text() {
    let buf = render_to_buffer(Notice::new("hello"), 80, 24);

    let all: String = (0..24).map(|y| row_text(&buf, y)).collect();
    assert!(all.contains("hello"));
    assert!(all.contains("Information"));
    // Centered: the corners stay untouched
    assert_eq!(buf[(0, 0)].symbol(), " ");
    assert_eq!(buf[(79, 23)].symbol(), " ");
}
