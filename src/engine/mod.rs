//! # Vi-emulation engine interface
//!
//! The shell treats the vi engine as an opaque collaborator: it forwards
//! raw key input and textual commands, and the engine answers with typed
//! events that the shell folds into its own state. The engine owns the vi
//! command language; the shell owns the document surface, status line,
//! highlighting, and the save/quit flow.

use crate::document::Document;

pub mod minimal;

pub use minimal::MinimalVim;

/// A parsed ex command handed to the shell when the engine does not claim
/// it itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExCommand {
    pub name: String,
    pub has_bang: bool,
    /// Trailing argument text; engine-internal commands consume it, the
    /// save/quit dispatcher ignores it.
    pub args: String,
}

impl ExCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_bang: false,
            args: String::new(),
        }
    }

    pub fn with_bang(mut self, has_bang: bool) -> Self {
        self.has_bang = has_bang;
        self
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }

    /// True when the command name equals the short or the long alias.
    pub fn matches(&self, short: &str, long: &str) -> bool {
        self.name == short || self.name == long
    }
}

/// Events the engine emits toward the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The transient command-buffer fragment of the status line changed.
    /// `caret` is a char offset into `contents`; `None` shows the raw text.
    CommandBufferChanged {
        contents: String,
        caret: Option<usize>,
    },

    /// Informational text to show as a modal notice.
    ExtraInformation(String),

    /// The persistent mode/position fragment of the status line changed.
    StatusDataChanged(String),

    /// Recompute search highlighting for this pattern.
    HighlightMatches { pattern: String },

    /// An ex command the engine does not handle itself. The shell answers
    /// through the dispatcher; unrecognized commands come back through
    /// [`VimEngine::on_unhandled_command`].
    ExCommandRequest(ExCommand),

    /// Block (rectangular) selection was switched on or off, or its
    /// geometry changed while on.
    SetBlockSelection(bool),
}

/// The minimal capability set the shell requires from a vi emulation:
/// accept raw keystrokes and textual commands, report state through
/// [`EngineEvent`]s. Reproducing actual vi semantics is the implementor's
/// business, not part of this contract.
pub trait VimEngine {
    /// Feed raw key input in vi notation (`a`, `<CR>`, `<Esc>`, `<C-v>`,
    /// `<BS>`, `<Tab>`, `<LT>`, `<Up>`...). Every keystroke the editor
    /// surface receives is forwarded here unmodified.
    fn handle_keys(&mut self, doc: &mut Document, keys: &str) -> Vec<EngineEvent>;

    /// Run an ex command line without the leading `:` (used for startup
    /// commands such as `set expandtab`).
    fn handle_command(&mut self, doc: &mut Document, command: &str) -> Vec<EngineEvent>;

    /// Called back when the shell's dispatcher did not recognize a command
    /// the engine forwarded. Must not re-emit an `ExCommandRequest` for the
    /// same command.
    fn on_unhandled_command(&mut self, doc: &mut Document, cmd: &ExCommand) -> Vec<EngineEvent>;

    /// Whether a block selection is currently active.
    fn has_block_selection(&self) -> bool;
}
