/// Application state handlers that respond to events
use crate::events::{AppEvent, EventBus};
use crate::App;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the application lifecycle reactions: shutdown requests and the
/// host-side mirror of the published status line.
pub struct AppStateHandler {
    app_state: Arc<RwLock<App>>,
}

impl AppStateHandler {
    /// Create a new app state handler
    pub fn new(app_state: Arc<RwLock<App>>) -> Self {
        Self { app_state }
    }

    /// Subscribe to all relevant events
    pub async fn subscribe(&self, event_bus: &EventBus) -> Result<()> {
        let handler = AppStateHandler::new(self.app_state.clone());

        event_bus
            .subscribe_async("quit", {
                let handler = handler.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_quit(event).await }
                }
            })
            .await;

        event_bus
            .subscribe_async("status_line_changed", {
                let handler = handler.clone();
                move |event| {
                    let handler = handler.clone();
                    async move { handler.handle_status_line(event).await }
                }
            })
            .await;

        Ok(())
    }

    /// Handle shutdown requests
    async fn handle_quit(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::Quit = event {
            let mut app = self.app_state.write().await;
            app.running = false;
        }

        Ok(())
    }

    /// Mirror the published status line into the host-owned copy
    async fn handle_status_line(&self, event: AppEvent) -> Result<()> {
        if let AppEvent::StatusLineChanged { line } = event {
            let mut app = self.app_state.write().await;
            app.status_line = line.to_string();
        }

        Ok(())
    }
}

impl Clone for AppStateHandler {
    fn clone(&self) -> Self {
        Self {
            app_state: self.app_state.clone(),
        }
    }
}
