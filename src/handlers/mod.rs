pub mod app_state;
pub mod keyboard;

pub use app_state::AppStateHandler;
pub use keyboard::{key_notation, KeyboardHandler};
