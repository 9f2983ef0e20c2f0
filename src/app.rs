use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::event::{self, Event},
    Terminal,
};
use tokio::sync::{mpsc, RwLock};

use crate::config::ConfigManager;
use crate::document::Document;
use crate::engine::{EngineEvent, MinimalVim, VimEngine};
use crate::events::{AppEvent, EventBus};
use crate::handlers::{AppStateHandler, KeyboardHandler};
use crate::highlight::HighlightSet;
use crate::input_system::InputSystem;
use crate::status::StatusLine;

/// Contains global state that needs to be shared
pub struct App {
    /// Whether the application is running
    pub running: bool,

    /// The edited document
    pub document: Document,

    /// The embedded vi-emulation engine
    pub engine: Box<dyn VimEngine + Send + Sync>,

    /// Status line fragments (message + data)
    pub status: StatusLine,

    /// The composed status line as last published to the host status bar
    pub status_line: String,

    /// Highlight layers over the document
    pub highlights: HighlightSet,

    /// Modal notice text, shown until the next keypress
    pub notice: Option<String>,

    /// Scroll position of the editor viewport
    pub scroll_offset: (usize, usize),

    /// Directory where user config is stored
    pub user_dir: PathBuf,

    /// Whether the editor gutter shows line numbers
    pub show_line_numbers: bool,

    /// Outbound signal channel toward the host, when a bus is attached
    event_sender: Option<mpsc::UnboundedSender<AppEvent>>,
}

impl App {
    pub async fn new() -> Self {
        let user_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kawauso");
        Self::with_user_dir(user_dir).await
    }

    /// Build an app with an explicit user directory instead of the
    /// platform config location. Config is loaded from `config.json`
    /// inside it.
    pub async fn with_user_dir(user_dir: PathBuf) -> Self {
        if !user_dir.exists() {
            if let Err(e) = tokio::fs::create_dir_all(&user_dir).await {
                tracing::warn!(%e, "could not create user directory");
            }
        }

        let mut config_manager = ConfigManager::new(&user_dir);
        if let Err(e) = config_manager.load() {
            tracing::warn!(%e, "could not load config, using defaults");
        }
        let config = config_manager.get_config().clone();

        let mut app = Self {
            running: true,
            document: Document::new(),
            engine: Box::new(MinimalVim::new()),
            status: StatusLine::new(),
            status_line: String::new(),
            highlights: HighlightSet::new(),
            notice: None,
            scroll_offset: (0, 0),
            user_dir,
            show_line_numbers: config.editor.show_line_numbers,
            event_sender: None,
        };

        for command in &config.editor.startup_commands {
            let events = app.engine.handle_command(&mut app.document, command);
            app.apply_engine_events(events);
        }
        app.publish_status_line();
        app
    }

    pub async fn with_file(file_path: &str) -> Result<Self> {
        let mut app = Self::new().await;
        app.open_file(file_path);
        Ok(app)
    }

    /// Attach the bus sender so lifecycle and status signals reach the
    /// host instead of only mutating local state.
    pub fn attach_event_sender(&mut self, sender: mpsc::UnboundedSender<AppEvent>) {
        self.event_sender = Some(sender);
    }

    /// Open a file: the read itself is delegated to the engine through a
    /// synthesized `:r` command, then the path is bound for later saves.
    pub fn open_file(&mut self, file_path: &str) {
        let keys = format!(":r {}<CR>", file_path);
        self.forward_keys(&keys);
        self.document.bind_path(PathBuf::from(file_path));
    }

    /// Forward raw key input to the engine and fold the resulting events
    /// into shell state. Every keystroke the editor surface receives goes
    /// through here.
    pub fn forward_keys(&mut self, keys: &str) {
        let events = self.engine.handle_keys(&mut self.document, keys);
        self.apply_engine_events(events);
    }

    /// Fold a batch of engine events into shell state.
    pub fn apply_engine_events(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::CommandBufferChanged { contents, caret } => {
                    self.status.set_message(&contents, caret);
                    self.publish_status_line();
                }
                EngineEvent::StatusDataChanged(data) => {
                    self.status.set_data(&data);
                    self.publish_status_line();
                }
                EngineEvent::ExtraInformation(text) => {
                    self.notice = Some(text);
                }
                EngineEvent::HighlightMatches { pattern } => {
                    self.highlights.rebuild_search(&self.document, &pattern);
                }
                EngineEvent::SetBlockSelection(on) => {
                    self.highlights.set_block_selection(&self.document, on);
                }
                EngineEvent::ExCommandRequest(cmd) => {
                    if !self.dispatch_ex_command(&cmd) {
                        let fallback = self.engine.on_unhandled_command(&mut self.document, &cmd);
                        self.apply_engine_events(fallback);
                    }
                }
            }
        }
    }

    /// Recompute the combined status line and publish it: once into the
    /// local copy the renderer reads, and once over the bus for the host.
    pub fn publish_status_line(&mut self) {
        self.status_line = self.status.composed();
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(AppEvent::StatusLineChanged {
                line: Arc::from(self.status_line.as_str()),
            });
        }
    }

    /// Ask the host to shut the application down. Never exits the process
    /// directly; the run loop observes the running flag.
    pub fn request_shutdown(&mut self) {
        match &self.event_sender {
            Some(sender) => {
                if sender.send(AppEvent::Quit).is_err() {
                    self.running = false;
                }
            }
            None => self.running = false,
        }
    }

    /// Drop the current notice, if any. Returns true when one was shown.
    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    /// Run the application with the event-driven architecture
    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<bool> {
        // Create shared app state
        let app_state = Arc::new(RwLock::new(std::mem::take(self)));

        // Create event bus and input system
        let event_bus = EventBus::new();
        let input_system = InputSystem::new(event_bus.clone());

        {
            let mut app = app_state.write().await;
            app.attach_event_sender(event_bus.sender());
        }

        // Create and subscribe event handlers
        let keyboard_handler = KeyboardHandler::new(app_state.clone());
        let app_state_handler = AppStateHandler::new(app_state.clone());

        keyboard_handler.subscribe(&event_bus).await?;
        app_state_handler.subscribe(&event_bus).await?;

        // Start event processing in background
        let event_bus_clone = event_bus.clone();
        let processor = tokio::spawn(async move {
            if let Err(e) = event_bus_clone.start_processing().await {
                tracing::error!(%e, "event processing error");
            }
        });

        // Target frame rate
        let frame_duration = Duration::from_millis(16);
        let mut last_frame = Instant::now();

        // Main event loop
        loop {
            let frame_start = Instant::now();

            // Check if app should quit
            {
                let app = app_state.read().await;
                if !app.running {
                    break;
                }
            }

            // Draw the UI - limit to target frame rate
            if frame_start.duration_since(last_frame) >= frame_duration {
                let mut app = app_state.write().await;
                terminal.draw(|f| app.render(f))?;
                drop(app);
                last_frame = frame_start;
            }

            // Check for events without blocking to maintain frame rate
            if event::poll(Duration::from_millis(1))? {
                match event::read()? {
                    Event::Key(key) => {
                        if let Err(e) = input_system.handle_key_input(key) {
                            tracing::error!(%e, "error handling key input");
                        }
                    }
                    Event::Resize(_, _) => {
                        // Next draw picks up the new size
                    }
                    _ => {}
                }
            } else {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }

        // Drop every sender so the processor task drains and exits, then
        // wait for it; after that ours is the only reference left.
        {
            let mut app = app_state.write().await;
            app.event_sender = None;
        }
        drop(input_system);
        drop(event_bus);
        drop(keyboard_handler);
        drop(app_state_handler);
        if let Err(e) = processor.await {
            tracing::error!(%e, "event processor task failed");
        }

        match Arc::try_unwrap(app_state) {
            Ok(app_lock) => {
                *self = app_lock.into_inner();
                Ok(true)
            }
            Err(_) => Err(anyhow!("app state still shared at shutdown")),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            running: true,
            document: Document::new(),
            engine: Box::new(MinimalVim::new()),
            status: StatusLine::new(),
            status_line: String::new(),
            highlights: HighlightSet::new(),
            notice: None,
            scroll_offset: (0, 0),
            user_dir: PathBuf::from("."),
            show_line_numbers: true,
            event_sender: None,
        }
    }
}
