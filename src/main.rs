use anyhow::Result;
use kawauso::App;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io::stdout;
use std::path::Path;

/// Route tracing to a file; a TUI owns the terminal, so nothing may log
/// to stdout. The guard flushes the writer on drop.
fn configure_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "kawauso.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = configure_logging();

    // Get command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run the app
    let mut app = if args.len() > 1 {
        App::with_file(&args[1]).await?
    } else {
        App::new().await
    };
    let result = app.run(&mut terminal).await;

    // Restore the terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        ratatui::crossterm::cursor::Show
    )?;

    // Handle any final errors
    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}
