use anyhow::{Context, Result};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mdedit::App;
use mdedit::config::{Config, ConfigManager, default_config_dir};
use mdedit::fs::LocalFs;

fn load_config() -> Result<Config> {
    let Some(dir) = default_config_dir() else {
        return Ok(Config::default());
    };
    let mut manager = ConfigManager::new(&dir);
    manager
        .load()
        .with_context(|| format!("loading {}", manager.config_path().display()))?;
    Ok(manager.get_config().clone())
}

/// Route log records to `mdedit.log` in the config directory so they never
/// land on the alternate screen. `MDEDIT_LOG` overrides the `warn` filter.
fn configure_logging() -> Result<Option<WorkerGuard>> {
    let log_dir = default_config_dir().unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "mdedit.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env("MDEDIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // Already installed; dropping the guard shuts the writer down.
        Err(_) => Ok(None),
    }
}

/// Print the directory listing, directories first.
async fn list_dir(path: &Path) -> Result<()> {
    let entries = LocalFs::new().read_dir(path).await?;
    for entry in entries {
        if entry.is_dir {
            println!("{}/", entry.name);
        } else {
            println!("{}", entry.name);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Get command line arguments
    let args: Vec<String> = std::env::args().collect();
    let target = args.get(1).map(Path::new);

    if let Some(path) = target.filter(|p| p.is_dir()) {
        return list_dir(path).await;
    }

    // Held until exit so buffered records are flushed.
    let _log_guard = configure_logging()?;

    let config = load_config()?;
    let mut app = match target {
        Some(path) => App::open(path, config).await?,
        None => App::new(config),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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
