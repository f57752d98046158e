use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use nexapro::{
    storage::{config::Config, local_store::LocalStore},
    sync::{Session, sync_engine::SyncEngine},
};

mod cli;
use cli::{CliMode, USAGE, parse_cli_mode, run_agenda_mode, run_board_mode, run_logout, run_move_mode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let cli_mode = match parse_cli_mode(std::env::args().skip(1)) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    if cli_mode == CliMode::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load_or_create().context("Failed to load configuration")?;
    let store = Arc::new(
        LocalStore::open(&config.storage.path)
            .with_context(|| format!("Failed to open local store at {}", config.storage.path.display()))?,
    );
    let session = Session::new(store);

    if cli_mode == CliMode::Logout {
        return run_logout(&session);
    }

    let engine = match SyncEngine::new(config, &session) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Authentication error: {}", e);
            tracing::error!("Authentication failed: {}", e);
            return Ok(());
        }
    };

    let result = match &cli_mode {
        CliMode::Agenda(date) => run_agenda_mode(&engine, *date).await,
        CliMode::Board => run_board_mode(&engine).await,
        CliMode::Move { task_id, status } => run_move_mode(&engine, task_id, *status).await,
        CliMode::Logout | CliMode::Help => Ok(()),
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }
    result
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "nexapro.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("nexapro started");
}
