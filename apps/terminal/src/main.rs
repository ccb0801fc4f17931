//! # Flow POS Terminal Entry Point
//!
//! ## Startup Sequence
//! 1. Parse flags
//! 2. Initialize tracing (logging)
//! 3. Read configuration from the environment
//! 4. Open the database, run migrations, load the catalog
//! 5. Run the command loop until `quit` or end of input

#[tokio::main]
async fn main() {
    if let Err(e) = flow_terminal::run().await {
        tracing::error!("Terminal failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
