use crate::widgets::{EditorView, Notice, StatusBar};
use crate::App;
use ratatui::prelude::*;

impl App {
    /// Main render function for the application UI
    pub fn render(&mut self, f: &mut Frame) {
        // Create layout
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Editor area
                Constraint::Length(1), // Status line
            ])
            .split(f.area());

        self.render_editor(f, chunks[0]);
        self.render_status_line(f, chunks[1]);

        // Render notice modal last so it sits on top
        if let Some(notice) = &self.notice {
            f.render_widget(Notice::new(notice), f.area());
        }
    }

    /// Render the main editor area
    fn render_editor(&mut self, f: &mut Frame, area: Rect) {
        self.ensure_cursor_visible(area);

        let editor = EditorView {
            document: &self.document,
            highlights: &self.highlights,
            scroll_offset: self.scroll_offset,
            show_line_numbers: self.show_line_numbers,
        };

        f.render_widget(editor, area);
    }

    /// Render the status line published by the status coordinator
    fn render_status_line(&mut self, f: &mut Frame, area: Rect) {
        f.render_widget(StatusBar::new(&self.status_line), area);
    }

    /// Keep the cursor inside the viewport, scrolling when it drifts out.
    pub fn ensure_cursor_visible(&mut self, area: Rect) {
        let (row, col) = self.document.cursor_pos;
        let (scroll_row, scroll_col) = self.scroll_offset;

        let visible_rows = (area.height as usize).max(1);
        if row < scroll_row {
            self.scroll_offset.0 = row;
        } else if row >= scroll_row + visible_rows {
            self.scroll_offset.0 = row + 1 - visible_rows;
        }

        let gutter = EditorView {
            document: &self.document,
            highlights: &self.highlights,
            scroll_offset: self.scroll_offset,
            show_line_numbers: self.show_line_numbers,
        }
        .gutter_width();
        let visible_cols = (area.width as usize).saturating_sub(gutter).max(1);

        if col < scroll_col {
            self.scroll_offset.1 = col;
        } else if col >= scroll_col + visible_cols {
            self.scroll_offset.1 = col + 1 - visible_cols;
        }
    }
}
