use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::document::Document;
use crate::highlight::{base_style, HighlightSet};

/// The editor surface: the visible slice of the document with the
/// highlight layers resolved per cell (clear, then search, then block;
/// later layers win) and a block cursor glyph drawn over the cursor cell.
pub struct EditorView<'a> {
    pub document: &'a Document,
    pub highlights: &'a HighlightSet,
    pub scroll_offset: (usize, usize), // (row, col) offset for viewport scrolling
    pub show_line_numbers: bool,
}

impl<'a> EditorView<'a> {
    pub fn new(document: &'a Document, highlights: &'a HighlightSet) -> Self {
        Self {
            document,
            highlights,
            scroll_offset: (0, 0),
            show_line_numbers: true,
        }
    }

    /// Gutter width in cells, including the separator column. Sized from
    /// the total line count so it does not shift while scrolling.
    pub fn gutter_width(&self) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        let mut digits = 1;
        let mut n = self.document.line_count().max(1);
        while n >= 10 {
            digits += 1;
            n /= 10;
        }
        digits + 1
    }

    fn cursor_style() -> Style {
        Style::default().bg(Color::White).fg(Color::Black)
    }

    /// Build the styled spans for one visible document row.
    fn line_spans(&self, row: usize, width: usize) -> Vec<Span<'static>> {
        let h_offset = self.scroll_offset.1;
        let line_start = self.document.line_start_offset(row);
        let chars: Vec<char> = self.document.content[row]
            .chars()
            .skip(h_offset)
            .take(width)
            .collect();
        let (cursor_row, cursor_col) = self.document.cursor_pos;

        let mut cells: Vec<(char, Style)> = Vec::with_capacity(chars.len() + 1);
        for (i, &c) in chars.iter().enumerate() {
            let col = h_offset + i;
            let offset = line_start + col;
            let mut style = self.highlights.style_at(offset).unwrap_or_else(base_style);
            if row == cursor_row && col == cursor_col {
                style = Self::cursor_style();
            }
            cells.push((c, style));
        }

        // Cursor past the last character gets its own cell
        let len = chars.len() + h_offset;
        if row == cursor_row && cursor_col >= len && cursor_col < h_offset + width {
            cells.push((' ', Self::cursor_style()));
        }

        // Merge consecutive cells with the same style into spans
        let mut spans = Vec::new();
        let mut cells = cells.into_iter();
        if let Some((c, style)) = cells.next() {
            let mut run = String::from(c);
            let mut current = style;
            for (c, style) in cells {
                if style == current {
                    run.push(c);
                } else {
                    spans.push(Span::styled(run, current));
                    run = String::from(c);
                    current = style;
                }
            }
            spans.push(Span::styled(run, current));
        }
        spans
    }
}

impl Widget for EditorView<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let start_row = self.scroll_offset.0;
        let end_row = (start_row + area.height as usize).min(self.document.line_count());
        let gutter = self.gutter_width();
        let text_width = (area.width as usize).saturating_sub(gutter);

        let mut lines = Vec::with_capacity(end_row - start_row);
        for row in start_row..end_row {
            let content_spans = self.line_spans(row, text_width);

            if self.show_line_numbers {
                let number = format!("{:>width$}", row + 1, width = gutter - 1);
                let mut line_spans = vec![
                    Span::styled(number, Style::default().fg(Color::Rgb(100, 100, 120))),
                    Span::raw(" "),
                ];
                line_spans.extend(content_spans);
                lines.push(Line::from(line_spans));
            } else {
                lines.push(Line::from(content_spans));
            }
        }

        let paragraph = Paragraph::new(lines).style(base_style());
        paragraph.render(area, buf);
    }
}
