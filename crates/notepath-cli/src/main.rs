//! notepath terminal pad.
//!
//! Usage:
//!   # Edit /index in the default SQLite store
//!   notepath
//!
//!   # Edit a specific path, ephemeral store
//!   notepath /meeting/notes --memory
//!
//!   # Custom database and quiet period
//!   notepath /todo --db ~/pad.db --quiet-ms 500

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use notepath_kernel::config::default_config_path;
use notepath_kernel::{
    DocumentSession, MemoryStore, PadConfig, SharedStore, SqliteStore, StoreConfig, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

use commands::{Command, HELP, append_line, describe_status, exit_warning};

/// Path-addressed text pad with automatic saving.
#[derive(Parser, Debug)]
#[command(name = "notepath")]
#[command(about = "Edit the document at any path; it saves itself")]
struct Args {
    /// Location to open (e.g. /notes/today). Defaults to the index document.
    #[arg(default_value = "/")]
    location: String,

    /// Config file (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config)
    #[arg(long, conflicts_with = "memory")]
    db: Option<PathBuf>,

    /// Keep documents in memory only
    #[arg(long)]
    memory: bool,

    /// Quiet period before saving, in milliseconds (overrides config)
    #[arg(long)]
    quiet_ms: Option<u64>,

    /// Save a pending edit on exit instead of dropping it
    #[arg(long)]
    flush_on_exit: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<PadConfig> {
    let path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = PadConfig::load(&path)
        .with_context(|| format!("loading config {}", path.display()))?;

    if args.memory {
        config.store = StoreConfig::Memory;
    } else if let Some(db) = &args.db {
        config.store = StoreConfig::Sqlite(db.display().to_string());
    }
    if let Some(ms) = args.quiet_ms {
        anyhow::ensure!(ms > 0, "--quiet-ms must be greater than zero");
        config.quiet_period_ms = ms;
    }
    Ok(config)
}

fn open_store(config: &StoreConfig) -> Result<SharedStore> {
    match config.db_path() {
        None => {
            tracing::info!("Starting with in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            tracing::info!(path = %path.display(), "Opening SQLite store");
            let store = SqliteStore::open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            Ok(Arc::new(store))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let store = open_store(&config.store)?;

    let mut session = DocumentSession::new(
        &args.location,
        store,
        Arc::new(SystemClock),
        config.quiet_period(),
    );
    let mut status_rx = session.subscribe();
    session.load().await;
    print_header(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Command::Append(text) => session.edit(append_line(&session.content(), &text)),
                    Command::Set(text) => session.edit(text),
                    Command::Clear => session.edit(""),
                    Command::Go(path) => {
                        if session.navigate(&path).await.is_some() {
                            status_rx = session.subscribe();
                            print_header(&session);
                        } else {
                            println!("(no path given)");
                        }
                    }
                    Command::Show => println!("{}", session.content()),
                    Command::Status => println!("{}", describe_status(session.status())),
                    Command::Flush => {
                        if !session.flush().await {
                            println!("(nothing to save)");
                        }
                    }
                    Command::Retry => {
                        if !session.retry() {
                            println!("(no failed save to retry)");
                        }
                    }
                    Command::Help => print!("{HELP}"),
                    Command::Quit => break,
                    Command::Unknown(name) => println!("unknown command :{name} (try :help)"),
                }
            }
            changed = status_rx.changed() => {
                if changed.is_ok() {
                    let status = *status_rx.borrow_and_update();
                    println!("[{}] {}", session.location(), describe_status(status));
                }
            }
        }
    }

    if args.flush_on_exit {
        session.flush().await;
    }
    if let Some(warning) = exit_warning(session.status()) {
        eprintln!("{warning}");
    }
    session.teardown();
    Ok(())
}

fn print_header(session: &DocumentSession) {
    println!("Editing: {}", session.location());
    let content = session.content();
    if !content.is_empty() {
        println!("{content}");
    }
    println!("[{}] {}", session.location(), describe_status(session.status()));
}
