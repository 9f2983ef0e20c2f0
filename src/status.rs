//! # Status line coordination
//!
//! The status line is one 80-column string assembled from two fragments
//! that change independently: the transient command-buffer message (with a
//! caret glyph marking the engine's cursor inside it) and the persistent
//! mode/position data. Every fragment change recomputes and republishes
//! the whole line; there is no batching.

/// Width the composed line is padded to. Fragments longer than this are
/// concatenated untruncated and simply overflow.
pub const STATUS_WIDTH: usize = 80;

/// Caret glyph inserted into the command-buffer fragment.
pub const CARET_GLYPH: char = '\u{2759}';

#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: String,
    data: String,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the transient fragment. A caret offset of `k` puts the glyph
    /// between the k-th and (k+1)-th character; `None` shows the raw text.
    pub fn set_message(&mut self, contents: &str, caret: Option<usize>) {
        self.message = match caret {
            None => contents.to_string(),
            Some(k) => {
                let mut marked = String::with_capacity(contents.len() + CARET_GLYPH.len_utf8());
                for (i, c) in contents.chars().enumerate() {
                    if i == k {
                        marked.push(CARET_GLYPH);
                    }
                    marked.push(c);
                }
                if k >= contents.chars().count() {
                    marked.push(CARET_GLYPH);
                }
                marked
            }
        };
    }

    /// Update the persistent fragment.
    pub fn set_data(&mut self, data: &str) {
        self.data = data.to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Compose the full line: message, padding, data. Padding fills the
    /// line to exactly [`STATUS_WIDTH`] chars; when the fragments already
    /// exceed it they are concatenated as-is.
    pub fn composed(&self) -> String {
        let used = self.message.chars().count() + self.data.chars().count();
        let slack = STATUS_WIDTH.saturating_sub(used);
        let mut line = String::with_capacity(self.message.len() + slack + self.data.len());
        line.push_str(&self.message);
        for _ in 0..slack {
            line.push(' ');
        }
        line.push_str(&self.data);
        line
    }
}
