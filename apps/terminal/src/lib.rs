//! # Flow POS Terminal
//!
//! Composition root for the terminal application: reads configuration,
//! opens local storage, loads the catalog and runs the command loop.
//!
//! ## Module Organization
//! ```text
//! flow_terminal/
//! ├── lib.rs          ◄─── You are here (startup & loop)
//! ├── repl.rs         ◄─── Command grammar and dispatch
//! ├── render.rs       ◄─── Text output for responses
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── order.rs    ◄─── Order engine state
//! │   ├── catalog.rs  ◄─── Product catalog state
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── order.rs    ◄─── Order lifecycle and checkout
//! │   ├── product.rs  ◄─── Catalog commands
//! │   └── history.rs  ◄─── Stored history and summaries
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod render;
pub mod repl;
pub mod state;

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use flow_core::catalog::demo_products;
use flow_db::{Database, DbConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use repl::{Reply, Terminal};
use state::{CatalogState, ConfigState, DbState};

/// Process flags. Business settings come from `FLOW_*` variables, see
/// [`ConfigState::from_env`].
#[derive(Debug, Parser)]
#[command(name = "flow-pos", version, about = "Flow POS terminal")]
pub struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, env = "FLOW_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Keep everything in memory; nothing survives the session
    #[arg(long, conflicts_with = "db")]
    pub in_memory: bool,
}

/// Runs the terminal until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Terminal Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,flow=debug,sqlx=warn (override with RUST_LOG)       │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • FLOW_STORE_NAME, FLOW_CURRENCY, FLOW_STAFF_ID,                    │
/// │       FLOW_RECEIPT_BASE_URL                                             │
/// │                                                                         │
/// │  3. Open Database ────────────────────────────────────────────────────► │
/// │     • --db / FLOW_DB_PATH, else the platform data directory             │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Load Catalog ─────────────────────────────────────────────────────► │
/// │     • Stored products, or the demo catalog on first run                 │
/// │                                                                         │
/// │  5. Command Loop ─────────────────────────────────────────────────────► │
/// │     • one line in, rendered response out                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting Flow POS terminal");

    let config = ConfigState::from_env()?;

    let db_config = if cli.in_memory {
        DbConfig::in_memory()
    } else {
        let path = match cli.db {
            Some(path) => path,
            None => get_database_path()?,
        };
        info!(?path, "Database path determined");
        DbConfig::new(path)
    };
    let db = Database::new(db_config).await?;
    info!("Database connected and migrations applied");

    let products = db.products().load_or_init(demo_products()).await?;
    info!(products = products.len(), "Catalog loaded");

    let terminal = Terminal::new(CatalogState::new(products), DbState::new(db.clone()), config);
    let result = command_loop(&terminal).await;

    db.close().await;
    info!("Flow POS terminal stopped");
    result
}

async fn command_loop(terminal: &Terminal) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let banner = format!(
        "{} | staff {} | type `help` for commands\n",
        terminal.config.store_name, terminal.config.staff_id
    );
    stdout.write_all(banner.as_bytes()).await?;

    loop {
        stdout.write_all(b"flow> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            stdout.write_all(b"\n").await?;
            break;
        };

        match terminal.handle_line(&line).await {
            Reply::Print(output) => {
                for text in output {
                    stdout.write_all(text.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
            }
            Reply::Quit => break,
        }
    }

    stdout.flush().await?;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=flow_db=trace` - Trace the storage layer only
/// - Default: `info,flow=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flow=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.flow.pos/flow.db`
/// - **Windows**: `%APPDATA%\flow\pos\data\flow.db`
/// - **Linux**: `~/.local/share/pos/flow.db`
fn get_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let proj_dirs =
        ProjectDirs::from("com", "flow", "pos").ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("flow.db"))
}
