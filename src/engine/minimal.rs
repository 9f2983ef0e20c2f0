//! A deliberately small vi engine behind the [`VimEngine`] trait.
//!
//! This is not a vi reimplementation. It covers just enough of the modal
//! surface for the shell to be usable on its own and fully exercised:
//! basic movement and editing, `:` command-line accumulation, `/` search
//! accumulation, `<C-v>` block selection, and the engine-internal commands
//! the shell relies on (`r`/`read`, `set`, `source`). Anything it does not
//! recognize on the `:` line is forwarded to the shell as an
//! [`EngineEvent::ExCommandRequest`].

use std::fs;

use crate::document::{CursorMovement, Document};
use crate::engine::{EngineEvent, ExCommand, VimEngine};

/// Editing modes of the minimal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Insert,
    Command,
    Search,
}

/// Options settable through `:set`. Unknown options are ignored.
#[derive(Debug, Clone)]
struct Options {
    expandtab: bool,
    shiftwidth: usize,
    tabstop: usize,
    autoindent: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            expandtab: false,
            shiftwidth: 8,
            tabstop: 8,
            autoindent: false,
        }
    }
}

/// One decoded unit of key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Delete,
    Up,
    Down,
    Left,
    Right,
}

pub struct MinimalVim {
    mode: Mode,
    /// Pending `:` or `/` line, without the prompt character.
    pending: String,
    options: Options,
    block_selection: bool,
}

impl Default for MinimalVim {
    fn default() -> Self {
        Self::new()
    }
}

impl MinimalVim {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            pending: String::new(),
            options: Options::default(),
            block_selection: false,
        }
    }

    /// Decode vi key notation into key tokens. `<...>` wraps specials, a
    /// literal `<` arrives as `<LT>`.
    fn tokenize(keys: &str) -> Vec<Key> {
        let mut tokens = Vec::new();
        let mut chars = keys.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '<' {
                tokens.push(Key::Char(c));
                continue;
            }

            let mut name = String::new();
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == '>' {
                    closed = true;
                    break;
                }
                name.push(inner);
            }
            if !closed {
                // Unterminated bracket, treat everything literally
                tokens.push(Key::Char('<'));
                tokens.extend(name.chars().map(Key::Char));
                continue;
            }

            match name.to_ascii_uppercase().as_str() {
                "CR" | "ENTER" | "RETURN" => tokens.push(Key::Enter),
                "ESC" => tokens.push(Key::Esc),
                "BS" => tokens.push(Key::Backspace),
                "TAB" => tokens.push(Key::Tab),
                "DEL" => tokens.push(Key::Delete),
                "UP" => tokens.push(Key::Up),
                "DOWN" => tokens.push(Key::Down),
                "LEFT" => tokens.push(Key::Left),
                "RIGHT" => tokens.push(Key::Right),
                "LT" => tokens.push(Key::Char('<')),
                "SPACE" => tokens.push(Key::Char(' ')),
                other => {
                    if let Some(rest) = other.strip_prefix("C-") {
                        if let Some(ctrl) = rest.chars().next() {
                            tokens.push(Key::Ctrl(ctrl.to_ascii_lowercase()));
                        }
                    }
                    // Unknown specials are dropped
                }
            }
        }

        tokens
    }

    fn status_data(&self, doc: &Document) -> EngineEvent {
        let (row, col) = doc.cursor_pos;
        let position = format!("{},{}", row + 1, col + 1);
        let data = match self.mode {
            Mode::Insert => format!("-- INSERT --  {}", position),
            _ if self.block_selection => format!("-- VISUAL BLOCK --  {}", position),
            _ => position,
        };
        EngineEvent::StatusDataChanged(data)
    }

    fn pending_line(&self) -> EngineEvent {
        let prompt = if self.mode == Mode::Command { ':' } else { '/' };
        let contents = format!("{}{}", prompt, self.pending);
        let caret = contents.chars().count();
        EngineEvent::CommandBufferChanged {
            contents,
            caret: Some(caret),
        }
    }

    fn clear_pending_line(&mut self, events: &mut Vec<EngineEvent>) {
        self.pending.clear();
        self.mode = Mode::Normal;
        events.push(EngineEvent::CommandBufferChanged {
            contents: String::new(),
            caret: None,
        });
    }

    fn move_cursor(&mut self, doc: &mut Document, movement: CursorMovement, events: &mut Vec<EngineEvent>) {
        doc.move_cursor(movement);
        if self.block_selection {
            // Geometry follows the cursor while block mode is on
            events.push(EngineEvent::SetBlockSelection(true));
        }
        events.push(self.status_data(doc));
    }

    fn toggle_block_selection(&mut self, doc: &mut Document, events: &mut Vec<EngineEvent>) {
        if self.block_selection {
            self.block_selection = false;
            doc.clear_anchor();
            events.push(EngineEvent::SetBlockSelection(false));
        } else {
            self.block_selection = true;
            doc.set_anchor_at_cursor();
            events.push(EngineEvent::SetBlockSelection(true));
        }
        events.push(self.status_data(doc));
    }

    fn drop_block_selection(&mut self, doc: &mut Document, events: &mut Vec<EngineEvent>) {
        if self.block_selection {
            self.block_selection = false;
            doc.clear_anchor();
            events.push(EngineEvent::SetBlockSelection(false));
        }
    }

    fn handle_normal_key(&mut self, doc: &mut Document, key: Key, events: &mut Vec<EngineEvent>) {
        match key {
            Key::Char('i') => {
                self.drop_block_selection(doc, events);
                self.mode = Mode::Insert;
                events.push(self.status_data(doc));
            }
            Key::Char('a') => {
                self.drop_block_selection(doc, events);
                doc.move_cursor(CursorMovement::Right);
                self.mode = Mode::Insert;
                events.push(self.status_data(doc));
            }
            Key::Char(':') => {
                self.mode = Mode::Command;
                self.pending.clear();
                events.push(self.pending_line());
            }
            Key::Char('/') => {
                self.mode = Mode::Search;
                self.pending.clear();
                events.push(self.pending_line());
            }
            Key::Char('h') | Key::Left => self.move_cursor(doc, CursorMovement::Left, events),
            Key::Char('j') | Key::Down => self.move_cursor(doc, CursorMovement::Down, events),
            Key::Char('k') | Key::Up => self.move_cursor(doc, CursorMovement::Up, events),
            Key::Char('l') | Key::Right => self.move_cursor(doc, CursorMovement::Right, events),
            Key::Char('0') => self.move_cursor(doc, CursorMovement::LineStart, events),
            Key::Char('$') => self.move_cursor(doc, CursorMovement::LineEnd, events),
            Key::Char('x') | Key::Delete => {
                doc.delete();
                events.push(self.status_data(doc));
            }
            Key::Ctrl('v') => self.toggle_block_selection(doc, events),
            Key::Esc => {
                self.drop_block_selection(doc, events);
                events.push(self.status_data(doc));
            }
            _ => {}
        }
    }

    fn handle_insert_key(&mut self, doc: &mut Document, key: Key, events: &mut Vec<EngineEvent>) {
        match key {
            Key::Esc => {
                self.mode = Mode::Normal;
                events.push(self.status_data(doc));
            }
            Key::Char(c) => {
                doc.insert_char(c);
                events.push(self.status_data(doc));
            }
            Key::Enter => {
                let indent = if self.options.autoindent {
                    let line = &doc.content[doc.cursor_pos.0];
                    line.chars().take_while(|c| c.is_whitespace()).collect()
                } else {
                    String::new()
                };
                doc.insert_newline();
                for c in indent.chars() {
                    doc.insert_char(c);
                }
                events.push(self.status_data(doc));
            }
            Key::Tab => {
                if self.options.expandtab {
                    let width = self.options.tabstop.max(1);
                    let col = doc.cursor_pos.1;
                    let spaces = width - (col % width);
                    for _ in 0..spaces {
                        doc.insert_char(' ');
                    }
                } else {
                    doc.insert_char('\t');
                }
                events.push(self.status_data(doc));
            }
            Key::Backspace => {
                doc.backspace();
                events.push(self.status_data(doc));
            }
            Key::Delete => {
                doc.delete();
                events.push(self.status_data(doc));
            }
            Key::Up => self.move_cursor(doc, CursorMovement::Up, events),
            Key::Down => self.move_cursor(doc, CursorMovement::Down, events),
            Key::Left => self.move_cursor(doc, CursorMovement::Left, events),
            Key::Right => self.move_cursor(doc, CursorMovement::Right, events),
            Key::Ctrl(_) => {}
        }
    }

    fn handle_line_key(&mut self, doc: &mut Document, key: Key, events: &mut Vec<EngineEvent>) {
        match key {
            Key::Esc => {
                self.clear_pending_line(events);
                events.push(self.status_data(doc));
            }
            Key::Backspace => {
                if self.pending.pop().is_none() {
                    self.clear_pending_line(events);
                } else {
                    events.push(self.pending_line());
                }
            }
            Key::Char(c) => {
                self.pending.push(c);
                events.push(self.pending_line());
            }
            Key::Tab => {
                self.pending.push('\t');
                events.push(self.pending_line());
            }
            Key::Enter => {
                let line = std::mem::take(&mut self.pending);
                let searching = self.mode == Mode::Search;
                self.mode = Mode::Normal;
                events.push(EngineEvent::CommandBufferChanged {
                    contents: String::new(),
                    caret: None,
                });
                if searching {
                    events.push(EngineEvent::HighlightMatches { pattern: line });
                } else {
                    self.run_command(doc, &line, events);
                }
                events.push(self.status_data(doc));
            }
            _ => {}
        }
    }

    fn parse_command(line: &str) -> ExCommand {
        let trimmed = line.trim();
        let name_end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
            .map_or(trimmed.len(), |(idx, _)| idx);
        let name = &trimmed[..name_end];
        let mut rest = &trimmed[name_end..];
        let has_bang = rest.starts_with('!');
        if has_bang {
            rest = &rest[1..];
        }
        ExCommand::new(name)
            .with_bang(has_bang)
            .with_args(rest.trim())
    }

    fn apply_set(&mut self, args: &str) {
        for option in args.split_whitespace() {
            match option {
                "expandtab" | "et" => self.options.expandtab = true,
                "noexpandtab" | "noet" => self.options.expandtab = false,
                "autoindent" | "ai" => self.options.autoindent = true,
                "noautoindent" | "noai" => self.options.autoindent = false,
                _ => {
                    if let Some(value) = option.strip_prefix("shiftwidth=") {
                        if let Ok(width) = value.parse() {
                            self.options.shiftwidth = width;
                        }
                    } else if let Some(value) = option.strip_prefix("tabstop=") {
                        if let Ok(width) = value.parse() {
                            self.options.tabstop = width;
                        }
                    } else {
                        tracing::debug!(option, "ignoring unknown option");
                    }
                }
            }
        }
    }

    fn read_into_document(doc: &mut Document, path: &str, events: &mut Vec<EngineEvent>) {
        match fs::read_to_string(path) {
            Ok(text) => {
                let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
                if lines.len() > 1 && lines.last().is_some_and(String::is_empty) {
                    lines.pop();
                }
                doc.insert_lines_below(lines);
            }
            Err(err) => {
                events.push(EngineEvent::ExtraInformation(format!(
                    "Cannot open file \"{}\": {}",
                    path, err
                )));
            }
        }
    }

    fn run_command(&mut self, doc: &mut Document, line: &str, events: &mut Vec<EngineEvent>) {
        let cmd = Self::parse_command(line);
        if cmd.name.is_empty() {
            return;
        }

        if cmd.matches("r", "read") {
            Self::read_into_document(doc, &cmd.args, events);
        } else if cmd.name == "set" {
            self.apply_set(&cmd.args);
        } else if cmd.matches("so", "source") {
            // Missing source files are not an error
            if let Ok(text) = fs::read_to_string(&cmd.args) {
                for line in text.lines() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('"') {
                        continue;
                    }
                    self.run_command(doc, line, events);
                }
            }
        } else if cmd.matches("noh", "nohlsearch") {
            events.push(EngineEvent::HighlightMatches {
                pattern: String::new(),
            });
        } else {
            events.push(EngineEvent::ExCommandRequest(cmd));
        }
    }
}

impl VimEngine for MinimalVim {
    fn handle_keys(&mut self, doc: &mut Document, keys: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        for key in Self::tokenize(keys) {
            match self.mode {
                Mode::Normal => self.handle_normal_key(doc, key, &mut events),
                Mode::Insert => self.handle_insert_key(doc, key, &mut events),
                Mode::Command | Mode::Search => self.handle_line_key(doc, key, &mut events),
            }
        }
        events
    }

    fn handle_command(&mut self, doc: &mut Document, command: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.run_command(doc, command, &mut events);
        events
    }

    fn on_unhandled_command(&mut self, _doc: &mut Document, cmd: &ExCommand) -> Vec<EngineEvent> {
        vec![EngineEvent::ExtraInformation(format!(
            "Not an editor command: {}",
            cmd.name
        ))]
    }

    fn has_block_selection(&self) -> bool {
        self.block_selection
    }
}
