//! Kawauso: a minimal vi-style terminal editor shell

pub mod app;
pub mod commands;
pub mod config;
pub mod document;
pub mod engine;
pub mod events;
pub mod handlers;
pub mod highlight;
pub mod input_system;
pub mod status;
pub mod ui;
pub mod widgets;

// Re-export main types for convenience
pub use app::App;
pub use document::Document;
pub use engine::{EngineEvent, ExCommand, MinimalVim, VimEngine};
pub use highlight::{HighlightSet, HighlightSpan};
pub use status::StatusLine;
