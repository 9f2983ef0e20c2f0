use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// A centered modal notice. Shown for the engine's extra-information
/// events and for save/quit warnings; the next keypress dismisses it.
pub struct Notice<'a> {
    title: &'a str,
    text: &'a str,
    width: u16,
}

impl<'a> Notice<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            title: "Information",
            text,
            width: 60,
        }
    }

    /// Calculate the centered area for the modal
    fn centered_rect(&self, area: Rect) -> Rect {
        let width = self.width.min(area.width.saturating_sub(4));
        // Text height plus borders, roughly wrapped to the inner width
        let inner = width.saturating_sub(2).max(1) as usize;
        let text_rows: usize = self
            .text
            .lines()
            .map(|line| line.chars().count().div_ceil(inner).max(1))
            .sum();
        let height = (text_rows as u16 + 2).min(area.height);

        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((area.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length((area.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Widget for Notice<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let modal_area = self.centered_rect(area);

        // Clear the background
        Clear.render(modal_area, buf);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black));

        let inner_area = block.inner(modal_area);
        block.render(modal_area, buf);

        let lines: Vec<Line> = self.text.lines().map(Line::from).collect();
        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });

        paragraph.render(inner_area, buf);
    }
}
