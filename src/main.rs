mod api;
mod cli;
mod config;
mod ledger;
mod models;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::info;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::ApiClient;
use crate::cli::Cli;
use crate::config::Config;
use crate::ledger::{Ledger, remote};
use crate::ui::ledger_form::{
    LedgerFormAction, LedgerFormState, handle_input, render_ledger_form,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init(&cli)?;
    init_tracing(&config, cli.verbose)?;
    println!("Initializing estimate ledger...");

    let client = ApiClient::new(&config).context("failed to build HTTP client")?;

    // Category codes are fetched once, before the form opens
    let mut ledger = Ledger::new();
    let load_notice = remote::load_catalog(&client, &mut ledger).await;
    let mut form_state = LedgerFormState::new(ledger);
    if let Some(notice) = load_notice {
        form_state.show_notice(notice);
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &client, &mut form_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        println!("Error: {}", err);
    }

    info!(items = form_state.ledger().items().len(), "session closed");
    Ok(())
}

fn init_tracing(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("LEDGER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing subscriber: {err}"))?;

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    client: &ApiClient,
    form_state: &mut LedgerFormState,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_ledger_form(f, form_state))?;

        match handle_input(form_state)? {
            Some(LedgerFormAction::Quit) => break,
            Some(LedgerFormAction::Save) => {
                let notice = remote::submit(client, form_state.ledger_mut()).await;
                form_state.after_submission(notice);
            }
            None => {}
        }
    }

    Ok(())
}
