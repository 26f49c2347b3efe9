//! Formsmith - terminal form builder
//!
//! Design forms by dragging field kinds onto a canvas, publish them behind a
//! share token, and collect submissions.

mod app;
mod builder;
mod config;
mod identity;
mod platform;
mod state;
mod store;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use config::FormsmithConfig;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use identity::{ConfigIdentity, IdentityProvider};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use store::JsonFileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "formsmith.log";

#[derive(Debug, Parser)]
#[command(name = "formsmith", version, about)]
struct Cli {
    /// Directory holding the form database and log file
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Act as this user
    #[arg(long, value_name = "ID")]
    actor: Option<String>,

    /// Grant the admin view
    #[arg(long)]
    admin: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fill in a published form
    Submit {
        /// Share token of the form
        token: String,
    },
}

impl Cli {
    /// Command line flags win over the config file
    fn apply(&self, config: &mut FormsmithConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(actor) = &self.actor {
            config.actor_id = Some(actor.clone());
        }
        if self.admin {
            config.is_admin = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = FormsmithConfig::load()?;
    cli.apply(&mut config);

    let data_dir = config.data_dir();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;

    // Initialize logging; the terminal belongs to the UI
    let log_file = File::options()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formsmith=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let store = JsonFileStore::open(&data_dir).await?;
    tracing::info!("Using store at {}", store.path().display());
    let actor = ConfigIdentity::new(&config).current_actor();

    let mut app = match &cli.command {
        Some(Command::Submit { token }) => {
            let mut app = App::with_store(Arc::new(store), actor, config);
            app.open_share(token).await;
            app
        }
        None => App::new(Arc::new(store), actor, config).await?,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!("Exited with error: {err:?}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Mouse hit-testing needs the same geometry the frame was drawn with
        let term_size = terminal.size()?;
        app.terminal_size = Some((term_size.height, term_size.width));

        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle crossterm events
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    // Global quit: Ctrl+C
                    if platform::is_quit_key(&key) {
                        break;
                    }
                    app.handle_key(key).await?;
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse).await?;
                }
                _ => {}
            }
        }

        // Pick up finished background saves
        app.drain_save_results();

        // Check if app wants to quit
        if app.should_quit() {
            break;
        }
    }

    // Unsaved edits are written before the runtime goes away
    app.shutdown().await;
    Ok(())
}
