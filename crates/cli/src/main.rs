//! # pdfqa: Ask Questions About a PDF
//!
//! This binary is a thin entrypoint; all logic lives in the `pdfqa_cli` library crate.

use anyhow::Result;
use clap::Parser;
use pdfqa_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup logging on stderr so answers on stdout stay clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Call the library's run function and handle the final result
    if let Err(e) = run(cli).await {
        eprintln!("[pdfqa error] {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
