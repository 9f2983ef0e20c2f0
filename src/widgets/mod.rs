pub mod editor;
pub mod modal;
pub mod status_bar;

pub use editor::EditorView;
pub use modal::Notice;
pub use status_bar::StatusBar;
