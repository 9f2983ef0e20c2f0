//! # Document
//!
//! The single text document edited by the shell.
//!
//! ## What it does
//!
//! - Stores text as lines in memory
//! - Tracks the cursor and the block-selection anchor
//! - Maps `(row, col)` positions to flat char offsets and back
//! - Binds a file path at open time and dirty-checks against the disk
//! - Saves through a temporary file that replaces the bound path
//!
//! The vi-emulation engine mutates the document through the editing
//! primitives below; everything else in the shell only reads it.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tempfile::NamedTempFile;

#[derive(Clone)]
pub struct Document {
    pub content: Vec<String>,
    pub path: Option<PathBuf>,
    pub name: String,
    pub cursor_pos: (usize, usize), // (row, column), column in chars
    pub anchor: Option<(usize, usize)>, // block-selection anchor, if any
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            content: vec![String::new()],
            path: None,
            name: String::from("untitled"),
            cursor_pos: (0, 0),
            anchor: None,
        }
    }

    /// Build a document from raw text. A trailing newline becomes a final
    /// empty line so that `content_as_string` round-trips byte-identically.
    pub fn from_string(text: &str) -> Self {
        let content: Vec<String> = text.split('\n').map(str::to_owned).collect();
        Self {
            content,
            path: None,
            name: String::from("untitled"),
            cursor_pos: (0, 0),
            anchor: None,
        }
    }

    /// Associate the document with a file path. Called once per open; every
    /// later save and dirty check reads this binding.
    pub fn bind_path(&mut self, path: PathBuf) {
        self.name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("untitled")
            .to_string();
        self.path = Some(path);
    }

    /// Get document content as a single string without allocating
    /// intermediate strings.
    pub fn content_as_string(&self) -> String {
        let total: usize = self.content.iter().map(|line| line.len() + 1).sum();
        let mut result = String::with_capacity(total.saturating_sub(1));

        for (i, line) in self.content.iter().enumerate() {
            result.push_str(line);
            if i < self.content.len() - 1 {
                result.push('\n');
            }
        }

        result
    }

    /// True when the document holds nothing but a single empty line.
    pub fn is_empty(&self) -> bool {
        self.content.len() == 1 && self.content[0].is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.content.len()
    }

    /// Char length of a line (not bytes).
    pub fn line_char_len(&self, row: usize) -> usize {
        self.content.get(row).map_or(0, |line| line.chars().count())
    }

    /// Flat char offset of the first character of `row`. Newlines count as
    /// one char each.
    pub fn line_start_offset(&self, row: usize) -> usize {
        self.content
            .iter()
            .take(row)
            .map(|line| line.chars().count() + 1)
            .sum()
    }

    /// Flat char offset of `(row, col)`; the column is clipped to the line.
    pub fn offset_at(&self, row: usize, col: usize) -> usize {
        self.line_start_offset(row) + col.min(self.line_char_len(row))
    }

    /// Map a flat char offset back to `(row, col)`.
    pub fn position_at(&self, offset: usize) -> (usize, usize) {
        let mut remaining = offset;
        for (row, line) in self.content.iter().enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                return (row, remaining);
            }
            remaining -= len + 1;
        }
        let last = self.content.len().saturating_sub(1);
        (last, self.line_char_len(last))
    }

    pub fn cursor_offset(&self) -> usize {
        self.offset_at(self.cursor_pos.0, self.cursor_pos.1)
    }

    pub fn set_anchor_at_cursor(&mut self) {
        self.anchor = Some(self.cursor_pos);
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Byte index of char column `col` within `line`.
    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map_or(line.len(), |(idx, _)| idx)
    }

    pub fn insert_char(&mut self, c: char) {
        let (row, col) = self.cursor_pos;
        if row >= self.content.len() {
            self.content.push(String::new());
        }

        let line = &mut self.content[row];
        let idx = Self::byte_index(line, col);
        line.insert(idx, c);
        self.cursor_pos.1 += 1;
    }

    pub fn insert_newline(&mut self) {
        let (row, col) = self.cursor_pos;
        if row >= self.content.len() {
            self.content.push(String::new());
            self.cursor_pos = (row + 1, 0);
            return;
        }

        let idx = Self::byte_index(&self.content[row], col);
        let rest = self.content[row].split_off(idx);
        self.content.insert(row + 1, rest);
        self.cursor_pos = (row + 1, 0);
    }

    pub fn backspace(&mut self) {
        let (row, col) = self.cursor_pos;
        if col > 0 {
            let line = &mut self.content[row];
            let idx = Self::byte_index(line, col - 1);
            line.remove(idx);
            self.cursor_pos.1 -= 1;
        } else if row > 0 {
            // Join with the previous line
            let current = self.content.remove(row);
            let prev = &mut self.content[row - 1];
            let new_col = prev.chars().count();
            prev.push_str(&current);
            self.cursor_pos = (row - 1, new_col);
        }
    }

    pub fn delete(&mut self) {
        let (row, col) = self.cursor_pos;
        if row < self.content.len() {
            if col < self.line_char_len(row) {
                let line = &mut self.content[row];
                let idx = Self::byte_index(line, col);
                line.remove(idx);
            } else if row + 1 < self.content.len() {
                // Join with the next line
                let next = self.content.remove(row + 1);
                self.content[row].push_str(&next);
            }
        }
    }

    /// Insert lines below the cursor line, leaving the cursor on the first
    /// inserted line. This is what a synthesized `:r` read lands through.
    pub fn insert_lines_below(&mut self, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        let row = self.cursor_pos.0.min(self.content.len().saturating_sub(1));
        for (i, line) in lines.into_iter().enumerate() {
            self.content.insert(row + 1 + i, line);
        }
        self.cursor_pos = (row + 1, 0);
    }

    pub fn move_cursor(&mut self, direction: CursorMovement) {
        let (mut row, mut col) = self.cursor_pos;

        match direction {
            CursorMovement::Up => {
                if row > 0 {
                    row -= 1;
                    col = col.min(self.line_char_len(row));
                }
            }
            CursorMovement::Down => {
                if row + 1 < self.content.len() {
                    row += 1;
                    col = col.min(self.line_char_len(row));
                }
            }
            CursorMovement::Left => {
                if col > 0 {
                    col -= 1;
                }
            }
            CursorMovement::Right => {
                if col < self.line_char_len(row) {
                    col += 1;
                }
            }
            CursorMovement::LineStart => {
                col = 0;
            }
            CursorMovement::LineEnd => {
                col = self.line_char_len(row);
            }
        }

        self.cursor_pos = (row, col);
    }

    /// Compare the in-memory text with whatever is on disk at the bound
    /// path. No path and no content means nothing to persist; an unreadable
    /// file is treated as changed so a save is never skipped silently.
    pub fn has_changes(&self) -> bool {
        let Some(path) = &self.path else {
            return !self.is_empty();
        };
        match fs::read_to_string(path) {
            Ok(on_disk) => self.content_as_string() != on_disk,
            Err(_) => true,
        }
    }

    /// Write the document to its bound path: content goes to a fresh
    /// temporary file first, then the target is removed and the temporary
    /// copied over it. Nothing is written when there is nothing to save.
    pub fn save(&mut self) -> Result<()> {
        if !self.has_changes() {
            return Ok(());
        }
        let path = self
            .path
            .clone()
            .ok_or_else(|| anyhow!("no file bound to this document"))?;

        let mut tmp = NamedTempFile::new().context("cannot create temporary file")?;
        tmp.write_all(self.content_as_string().as_bytes())
            .context("cannot write temporary file")?;
        tmp.flush().context("cannot write temporary file")?;

        let _ = fs::remove_file(&path);
        fs::copy(tmp.path(), &path)
            .with_context(|| format!("cannot write to file \"{}\"", path.display()))?;
        Ok(())
    }
}

/// Cursor movements the minimal engine drives the document with.
pub enum CursorMovement {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
}
