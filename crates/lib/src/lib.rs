//! # Document Question Answering
//!
//! This crate turns content extracted from a PDF (plain text or a detected table)
//! and a user question into a single prompt, sends it to a chat-completion
//! service, and returns the answer text.
//!
//! Every request is independent: nothing is cached or carried between calls.

pub mod config;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod types;

pub use config::AzureOpenAiConfig;
pub use errors::{AnswerServiceError, ConfigError, ExtractionError, QaError};
pub use prompts::Prompt;
pub use types::{ExtractedContent, RawGrid, Record, Table};

use providers::ai::{azure::AzureOpenAiProvider, AiProvider};
use tracing::{debug, info, instrument};

/// Runs one question against extracted document content.
#[derive(Debug, Clone)]
pub struct DocumentQa {
    ai_provider: Box<dyn AiProvider>,
}

impl DocumentQa {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }

    /// Creates a `DocumentQa` backed by the Azure OpenAI deployment in `config`.
    pub fn from_config(config: &AzureOpenAiConfig) -> Result<Self, AnswerServiceError> {
        Ok(Self::new(Box::new(AzureOpenAiProvider::new(config)?)))
    }

    /// Answers a question about the document's text. Only the first
    /// `MAX_DOCUMENT_CHARS` characters of the text are sent.
    #[instrument(skip(self, document_text))]
    pub async fn ask_text(&self, document_text: &str, question: &str) -> Result<String, QaError> {
        let question = require_question(question)?;
        let prompt = prompts::build_text_prompt(document_text, question);
        info!("[ask_text] Querying answer service.");
        self.send(&prompt).await
    }

    /// Answers a question about the table at `index`. The whole table is sent.
    #[instrument(skip(self, tables))]
    pub async fn ask_table(
        &self,
        tables: &[Table],
        index: usize,
        question: &str,
    ) -> Result<String, QaError> {
        let question = require_question(question)?;
        let table = select_table(tables, index)?;
        let prompt = prompts::build_table_prompt(table, question);
        info!(
            "[ask_table] Querying answer service with table {index} ({} rows).",
            table.rows.len()
        );
        self.send(&prompt).await
    }

    async fn send(&self, prompt: &Prompt) -> Result<String, QaError> {
        debug!(system_prompt = %prompt.system, user_prompt = %prompt.user, "--> Sending prompts to AI Provider");
        let answer = self
            .ai_provider
            .generate(&prompt.system, &prompt.user)
            .await?;
        Ok(answer)
    }
}

/// Picks one table out of an extraction result.
///
/// An empty sequence is reported as `NoTablesFound`, which callers show as an
/// informational state rather than a failure.
pub fn select_table(tables: &[Table], index: usize) -> Result<&Table, QaError> {
    if tables.is_empty() {
        return Err(QaError::NoTablesFound);
    }
    tables.get(index).ok_or(QaError::TableIndexOutOfRange {
        index,
        count: tables.len(),
    })
}

fn require_question(question: &str) -> Result<&str, QaError> {
    if question.trim().is_empty() {
        return Err(QaError::EmptyQuestion);
    }
    Ok(question)
}
