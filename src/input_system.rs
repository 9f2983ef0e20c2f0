use crate::events::{AppEvent, EventBus};
use anyhow::{Context, Result};
use ratatui::crossterm::event::KeyEvent;

/// Input system that takes raw terminal input and publishes events
pub struct InputSystem {
    event_bus: EventBus,
}

impl InputSystem {
    /// Create a new input system
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Handle keyboard input by publishing a key event
    pub fn handle_key_input(&self, key: KeyEvent) -> Result<()> {
        self.event_bus
            .publish(AppEvent::KeyInput(key))
            .context("Failed to publish key input event")
    }
}
