use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::info;

use reddash::app::App;
use reddash::config::Config;
use reddash::{input, telemetry, ui};

#[derive(Parser)]
#[command(name = "reddash", version, about = "Top Reddit posts for your communities, in the terminal")]
struct Args {
    /// Path to the config file (defaults to ~/.config/reddash/config.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Enters raw mode + alternate screen on construction and restores the
/// terminal on drop, including during unwinding.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message prints, so a panic inside
/// the event loop doesn't leave raw mode enabled.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Log to a file under the local data dir; the TUI owns the terminal.
fn init_logging() -> Result<()> {
    let Some(dir) = dirs::data_local_dir() else {
        return Ok(());
    };
    let dir = dir.join("reddash");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("reddash.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reddash=info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config = Config::load_or_default(args.config.as_deref())?;
    info!("loaded config with {} widgets", config.widgets.len());

    let sink = telemetry::default_sink();
    let mut app = App::new(&config, sink);
    let (tx, mut rx) = mpsc::unbounded_channel();

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;

    let refresh_interval = Duration::from_secs(config.refresh_interval_secs);
    let tick_rate = Duration::from_millis(100);
    let mut last_refresh = Instant::now();
    app.refresh_all(&tx);

    loop {
        // Settled fetch outcomes first, so this frame draws current data.
        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }

        if app.refresh_requested || last_refresh.elapsed() >= refresh_interval {
            app.refresh_requested = false;
            last_refresh = Instant::now();
            app.refresh_all(&tx);
        }

        guard.terminal.draw(|frame| ui::draw(&app, frame))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` drops here and restores the terminal.
    Ok(())
}
