use crate::events::{AppEvent, EventBus};
use crate::App;
use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keyboard handler: translates terminal key events into vi key notation
/// and forwards them to the embedded engine. The one thing it handles
/// itself is dismissing an open notice.
pub struct KeyboardHandler {
    app_state: Arc<RwLock<App>>,
}

impl KeyboardHandler {
    /// Create a new keyboard handler
    pub fn new(app_state: Arc<RwLock<App>>) -> Self {
        Self { app_state }
    }

    /// Subscribe to keyboard events
    pub async fn subscribe(&self, event_bus: &EventBus) -> Result<()> {
        let handler = KeyboardHandler::new(self.app_state.clone());

        event_bus
            .subscribe_async("key_input", move |event| {
                let handler = handler.clone();
                async move { handler.handle_key_event(event).await }
            })
            .await;

        Ok(())
    }

    /// Handle keyboard events
    async fn handle_key_event(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::KeyInput(key) = event {
            if key.kind == KeyEventKind::Release {
                return Ok(());
            }

            let mut app = self.app_state.write().await;

            // An open notice swallows the next keypress
            if app.dismiss_notice() {
                return Ok(());
            }

            if let Some(keys) = key_notation(key) {
                app.forward_keys(&keys);
            }
        }

        Ok(())
    }
}

/// Translate a crossterm key event into the vi key notation the engine
/// accepts. Returns `None` for keys that have no notation.
pub fn key_notation(key: KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                Some(format!("<C-{}>", c.to_ascii_lowercase()))
            } else if c == '<' {
                Some("<LT>".to_string())
            } else {
                Some(c.to_string())
            }
        }
        KeyCode::Enter => Some("<CR>".to_string()),
        KeyCode::Esc => Some("<Esc>".to_string()),
        KeyCode::Backspace => Some("<BS>".to_string()),
        KeyCode::Tab => Some("<Tab>".to_string()),
        KeyCode::Delete => Some("<Del>".to_string()),
        KeyCode::Up => Some("<Up>".to_string()),
        KeyCode::Down => Some("<Down>".to_string()),
        KeyCode::Left => Some("<Left>".to_string()),
        KeyCode::Right => Some("<Right>".to_string()),
        _ => None,
    }
}

impl Clone for KeyboardHandler {
    fn clone(&self) -> Self {
        Self {
            app_state: self.app_state.clone(),
        }
    }
}
