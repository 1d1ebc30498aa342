use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::Backend as TerminalBackend, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vocab_quiz::api::{ApiClient, Backend};
use vocab_quiz::api_worker::ApiWorker;
use vocab_quiz::app::App;
use vocab_quiz::auth::AuthSession;
use vocab_quiz::config::{Overrides, Settings};
use vocab_quiz::error::{Error, Result};
use vocab_quiz::{db, logger, ui};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Vocabulary quizzes and reading practice in the terminal
#[derive(Parser, Debug)]
#[command(name = "vocab-quiz", version, about)]
struct Args {
    /// Base URL of the word-learning API
    #[arg(long)]
    api_url: Option<String>,

    /// Base URL of the PDF text extraction service
    #[arg(long)]
    pdf_url: Option<String>,

    /// Path to a config.toml (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init()?;

    let settings = Settings::load(&Overrides {
        config_path: args.config,
        api_base_url: args.api_url,
        pdf_service_url: args.pdf_url,
    })?;
    tracing::info!(
        "Using API {} and PDF service {}",
        settings.api_base_url,
        settings.pdf_service_url
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let backend: Arc<dyn Backend> = Arc::new(ApiClient::new(&settings)?);
    let auth = Arc::new(AuthSession::new(backend));
    let worker = ApiWorker::new(runtime.handle().clone(), auth);

    let cache = match db::init_db() {
        Ok(conn) => Some(conn),
        Err(e) => {
            tracing::warn!("Word-list mirror unavailable: {}", e);
            None
        }
    };

    let mut app = App::new(worker, cache, StdRng::from_entropy());

    enable_raw_mode().map_err(|e| Error::TerminalInit(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| Error::TerminalInit(e.to_string()))?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Exiting after error: {}", e);
    }
    tracing::info!("vocab-quiz stopped");
    result
}

fn run<B: TerminalBackend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|f| ui::draw(f, app, now))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now());
                }
            }
        }
    }
    Ok(())
}
