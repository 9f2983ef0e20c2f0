//! # Ex-command dispatch
//!
//! The shell claims exactly five ex-command forms from the engine (the
//! save and quit family) and leaves everything else to the engine's own
//! fallback. The routing is a pure decision table; quitting is always an
//! explicit shutdown request on the app lifecycle, never a process exit.

use crate::app::App;
use crate::engine::ExCommand;

fn wants_save_and_quit(cmd: &ExCommand) -> bool {
    cmd.name == "wq"
}

fn wants_save(cmd: &ExCommand) -> bool {
    cmd.matches("w", "write") || cmd.matches("wa", "wall")
}

fn wants_quit(cmd: &ExCommand) -> bool {
    cmd.matches("q", "quit") || cmd.matches("qa", "qall")
}

impl App {
    /// Route an ex command from the engine. Returns true when the command
    /// was one of the recognized save/quit forms; false tells the caller
    /// to fall back to the engine's default behavior.
    pub fn dispatch_ex_command(&mut self, cmd: &ExCommand) -> bool {
        if wants_save_and_quit(cmd) {
            // :wq quits only when the save went through
            if self.attempt_save() {
                self.attempt_quit();
            }
        } else if wants_save(cmd) {
            self.attempt_save(); // :w
        } else if wants_quit(cmd) {
            if cmd.has_bang {
                self.force_quit(); // :q!
            } else {
                self.attempt_quit(); // :q
            }
        } else {
            return false;
        }
        true
    }

    /// Save the document, reporting failure as a notice. Returns true on
    /// a confirmed write (or when there was nothing to write).
    pub fn attempt_save(&mut self) -> bool {
        match self.document.save() {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%err, "save failed");
                self.notice = Some(format!("{:#}", err));
                false
            }
        }
    }

    /// Quit unless the document has unsaved changes; a dirty document
    /// produces a warning and the application keeps running.
    pub fn attempt_quit(&mut self) {
        if self.document.has_changes() {
            self.notice = Some(format!("File \"{}\" was changed", self.document.name));
        } else {
            self.request_shutdown();
        }
    }

    /// Quit unconditionally, discarding unsaved changes.
    pub fn force_quit(&mut self) {
        self.request_shutdown();
    }
}
