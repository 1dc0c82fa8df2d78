//! # `pdfqa` Library Crate
//!
//! This crate contains the command-line surface for asking questions about a
//! PDF: argument parsing, loading the upload, and wiring the extractor to the
//! answer service.

pub mod session;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use pdfqa::{AzureOpenAiConfig, DocumentQa};
use session::{write_table_list, Session};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask questions about a PDF with Azure OpenAI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask questions about the text of a PDF
    Text(TextArgs),
    /// Ask questions about one table detected in a PDF
    Table(TableArgs),
    /// List the tables detected in a PDF without contacting the answer service
    Tables(TablesArgs),
}

#[derive(Args, Debug)]
pub struct TextArgs {
    /// The PDF file to read.
    pub file: PathBuf,
    /// Ask a single question and exit instead of starting the interactive loop.
    #[arg(long, short)]
    pub question: Option<String>,
    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug)]
pub struct TableArgs {
    /// The PDF file to read.
    pub file: PathBuf,
    /// Index of the table to ask about. Prompted for when omitted.
    #[arg(long, short)]
    pub table: Option<usize>,
    /// Ask a single question and exit instead of starting the interactive loop.
    #[arg(long, short)]
    pub question: Option<String>,
    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug)]
pub struct TablesArgs {
    /// The PDF file to read.
    pub file: PathBuf,
    /// Print the tables as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Overrides for the answer-service settings otherwise read from the environment.
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Azure OpenAI endpoint URL (overrides AZURE_OPENAI_ENDPOINT).
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Deployment name (overrides AZURE_OPENAI_DEPLOYMENT).
    #[arg(long)]
    pub deployment: Option<String>,
    /// API version (overrides AZURE_OPENAI_API_VERSION).
    #[arg(long)]
    pub api_version: Option<String>,
}

impl ServiceArgs {
    fn overrides(&self) -> HashMap<String, String> {
        [
            ("AZURE_OPENAI_ENDPOINT", &self.endpoint),
            ("AZURE_OPENAI_DEPLOYMENT", &self.deployment),
            ("AZURE_OPENAI_API_VERSION", &self.api_version),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key.to_string(), v)))
        .collect()
    }

    fn load_config(&self) -> Result<AzureOpenAiConfig> {
        AzureOpenAiConfig::from_env_with_overrides(self.overrides())
            .context("Answer service is not configured")
    }
}

// --- Command Handlers ---

/// Reads an upload, accepting only files with a `.pdf` extension.
pub fn read_pdf(path: &Path) -> Result<Vec<u8>> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        bail!("Only PDF files are supported: '{}'", path.display());
    }
    std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

async fn handle_text(args: TextArgs) -> Result<()> {
    let pdf_data = read_pdf(&args.file)?;
    let config = args.service.load_config()?;
    info!("Extracting text from '{}'.", args.file.display());
    let document_text = pdfqa_pdf::extract_text(&pdf_data)?;

    let qa = DocumentQa::from_config(&config)?;
    let stdin = io::stdin();
    let mut session = Session::new(&qa, stdin.lock(), io::stdout());
    session
        .run_text(&document_text, args.question.as_deref())
        .await
}

async fn handle_table(args: TableArgs) -> Result<()> {
    let pdf_data = read_pdf(&args.file)?;
    let config = args.service.load_config()?;
    info!("Extracting tables from '{}'.", args.file.display());
    let tables = pdfqa_pdf::extract_tables(&pdf_data)?;

    let qa = DocumentQa::from_config(&config)?;
    let stdin = io::stdin();
    let mut session = Session::new(&qa, stdin.lock(), io::stdout());
    session
        .run_table(&tables, args.table, args.question.as_deref())
        .await
}

fn handle_tables(args: TablesArgs) -> Result<()> {
    let pdf_data = read_pdf(&args.file)?;
    let tables = pdfqa_pdf::extract_tables(&pdf_data)?;
    let mut stdout = io::stdout().lock();

    if args.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&tables)?)?;
        return Ok(());
    }
    if tables.is_empty() {
        writeln!(stdout, "{}", pdfqa::QaError::NoTablesFound)?;
        return Ok(());
    }
    writeln!(stdout, "Found {} table(s):", tables.len())?;
    write_table_list(&mut stdout, &tables)?;
    for (index, table) in tables.iter().enumerate() {
        writeln!(stdout, "\n--- Table {index} ---\n{}", table.render())?;
    }
    Ok(())
}

/// Runs the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Text(args) => handle_text(args).await,
        Commands::Table(args) => handle_table(args).await,
        Commands::Tables(args) => handle_tables(args),
    }
}
