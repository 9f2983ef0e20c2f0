use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};

/// Host status bar: a one-line widget showing the composed status line
/// (command-buffer message, padding, mode/position data) exactly as the
/// coordinator published it. Composition already happened upstream; this
/// widget only paints.
pub struct StatusBar<'a> {
    line: &'a str,
    style: Style,
}

impl<'a> StatusBar<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            style: Style::default().fg(Color::White).bg(Color::DarkGray),
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        if area.height == 0 {
            return;
        }
        let paragraph = Paragraph::new(self.line).style(self.style);
        paragraph.render(area, buf);
    }
}
