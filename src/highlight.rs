//! # Highlight bookkeeping
//!
//! Three ordered layers of styled char ranges sit over the document:
//! the clear layer (paints base colors under a block selection so the
//! native linear selection disappears), the search layer, and the block
//! layer. They are applied in that fixed order; later layers win where
//! ranges overlap. Each layer is recomputed from scratch on its trigger
//! event, never updated incrementally.

use ratatui::style::{Color, Style};

use crate::document::Document;

/// A styled range of document char offsets, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

impl HighlightSpan {
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    pub clear: Vec<HighlightSpan>,
    pub search: Vec<HighlightSpan>,
    pub block: Vec<HighlightSpan>,
}

/// Base colors of the editor view; the clear layer paints these.
pub fn base_style() -> Style {
    Style::default().fg(Color::White).bg(Color::Black)
}

fn search_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Yellow)
}

fn block_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// All spans in application order: clear, then search, then block.
    pub fn layers(&self) -> impl Iterator<Item = &HighlightSpan> {
        self.clear.iter().chain(&self.search).chain(&self.block)
    }

    /// Style override for a char offset, if any layer covers it. Later
    /// layers win.
    pub fn style_at(&self, offset: usize) -> Option<Style> {
        self.layers()
            .filter(|span| span.contains(offset))
            .map(|span| span.style)
            .last()
    }

    /// Recompute the search layer for `pattern` from the document start.
    /// An empty or invalid pattern leaves the layer empty. Zero-width
    /// matches advance one char before retrying; the scan stops when no
    /// match remains or the position fails to advance twice in a row.
    pub fn rebuild_search(&mut self, doc: &Document, pattern: &str) {
        self.search.clear();
        if pattern.is_empty() {
            return;
        }

        let re = match regex::Regex::new(pattern) {
            Ok(re) => re,
            Err(err) => {
                tracing::warn!(pattern, %err, "rejecting search pattern");
                return;
            }
        };

        let text = doc.content_as_string();
        let mut from = 0usize; // byte position the next scan starts at
        let mut chars_before = 0usize; // char offset of `from`
        let mut last_from = usize::MAX;
        let mut stalls = 0u32;

        while from <= text.len() {
            let Some(m) = re.find_at(&text, from) else {
                break;
            };
            let start_char = chars_before + text[from..m.start()].chars().count();
            let end_char = start_char + m.as_str().chars().count();

            let (next, next_chars) = if m.is_empty() {
                // Zero-width match: step one char forward before retrying
                match text[m.end()..].chars().next() {
                    Some(c) => (m.end() + c.len_utf8(), end_char + 1),
                    None => break,
                }
            } else {
                self.search
                    .push(HighlightSpan::new(start_char, end_char, search_style()));
                (m.end(), end_char)
            };

            if next == last_from {
                stalls += 1;
                if stalls >= 2 {
                    break;
                }
            } else {
                stalls = 0;
            }
            last_from = from;
            from = next;
            chars_before = next_chars;
        }
    }

    /// Recompute the block and clear layers. With `on`, every line whose
    /// start offset falls inside the cursor/anchor offset range gets one
    /// span covering the selected column range clipped to that line; the
    /// clear layer covers the whole linear range in base colors. With
    /// `off`, both layers empty.
    pub fn set_block_selection(&mut self, doc: &Document, on: bool) {
        self.block.clear();
        self.clear.clear();
        if !on {
            return;
        }
        let Some((anchor_row, anchor_col)) = doc.anchor else {
            return;
        };

        let cursor_off = doc.cursor_offset();
        let anchor_off = doc.offset_at(anchor_row, anchor_col);
        let min = cursor_off.min(anchor_off);
        let max = cursor_off.max(anchor_off);

        self.clear.push(HighlightSpan::new(min, max, base_style()));

        let from = doc.cursor_pos.1;
        let to = anchor_col;
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };

        let (mut row, _) = doc.position_at(min);
        while row < doc.line_count() && doc.line_start_offset(row) < max {
            let line_start = doc.line_start_offset(row);
            let len = doc.line_char_len(row);
            self.block.push(HighlightSpan::new(
                line_start + lo.min(len),
                line_start + hi.min(len),
                block_style(),
            ));
            row += 1;
        }
    }
}
