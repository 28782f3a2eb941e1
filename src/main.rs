use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod domain;
mod filter;
mod inputter;
mod layout;
mod lead;
mod loader;
mod model;
mod ui;

use controller::Controller;
use domain::{LeadsConfig, LeadsError};
use model::{Model, Status};
use ui::LeadsUI;

/// Terminal dashboard for browsing and filtering leads.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Record file to load (csv, parquet, arrow). Sample leads are shown without it.
    #[arg(short, long)]
    data: Option<String>,

    /// Event poll timeout in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Result<LeadsConfig, LeadsError> {
        let data_path = self.data.as_deref().map(loader::expand_path).transpose()?;
        Ok(LeadsConfig {
            event_poll_time: self.poll_ms,
            data_path,
            log_file: self.log_file,
            log_level: self.log_level,
        })
    }
}

fn main() -> ExitCode {
    let result = Args::parse().into_config().and_then(|cfg| {
        init_logging(&cfg)?;
        run(&cfg)
    });
    match result {
        Err(e) => {
            error!("Exiting with error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_logging(cfg: &LeadsConfig) -> Result<(), LeadsError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .map_err(|e| LeadsError::InvalidConfig(format!("log filter: {e}")))?;
    let file_layer = match &cfg.log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run(cfg: &LeadsConfig) -> Result<(), LeadsError> {
    let leads = match &cfg.data_path {
        Some(path) => loader::load_leads(path)?,
        None => lead::seed_leads(),
    };
    info!("Starting with {} leads", leads.len());

    let mut terminal = ratatui::init();
    let result = event_loop(cfg, leads, &mut terminal);
    ratatui::restore();
    result
}

fn event_loop(
    cfg: &LeadsConfig,
    leads: Vec<lead::Lead>,
    terminal: &mut ratatui::DefaultTerminal,
) -> Result<(), LeadsError> {
    let size = terminal.size()?;
    let mut model = Model::init(cfg, leads, size.width, size.height);
    let ui = LeadsUI::default();
    let controller = Controller::new(cfg);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    Ok(())
}
