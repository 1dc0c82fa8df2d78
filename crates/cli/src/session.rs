//! # Interactive Question Session
//!
//! The terminal counterpart of the upload-and-ask page: shows what was
//! extracted, then answers one question at a time. Input and output are
//! generic so the whole flow can be driven from tests.

use anyhow::Result;
use pdfqa::{prompts::truncate_chars, DocumentQa, QaError, Table};
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Number of characters shown in the text preview.
pub const PREVIEW_CHARS: usize = 1000;

const QUIT_COMMANDS: [&str; 3] = ["quit", "exit", ":q"];

/// What the questions are asked about.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Text(&'a str),
    Table { tables: &'a [Table], index: usize },
}

impl Subject<'_> {
    async fn ask(&self, qa: &DocumentQa, question: &str) -> Result<String, QaError> {
        match *self {
            Subject::Text(text) => qa.ask_text(text, question).await,
            Subject::Table { tables, index } => qa.ask_table(tables, index, question).await,
        }
    }
}

pub struct Session<'a, R, W> {
    qa: &'a DocumentQa,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(qa: &'a DocumentQa, input: R, output: W) -> Self {
        Self { qa, input, output }
    }

    /// Shows the text preview, then answers `question` or enters the question loop.
    pub async fn run_text(&mut self, document_text: &str, question: Option<&str>) -> Result<()> {
        writeln!(self.output, "Text extracted successfully!")?;
        writeln!(self.output, "--- Extracted Text (Preview) ---")?;
        writeln!(
            self.output,
            "{}",
            truncate_chars(document_text, PREVIEW_CHARS)
        )?;
        writeln!(self.output, "--------------------------------")?;

        self.answer(Subject::Text(document_text), question).await
    }

    /// Lists the detected tables, selects one, shows it, then answers questions about it.
    pub async fn run_table(
        &mut self,
        tables: &[Table],
        table_index: Option<usize>,
        question: Option<&str>,
    ) -> Result<()> {
        if tables.is_empty() {
            writeln!(self.output, "{}", QaError::NoTablesFound)?;
            return Ok(());
        }

        writeln!(self.output, "Found {} table(s):", tables.len())?;
        write_table_list(&mut self.output, tables)?;

        let index = match table_index {
            Some(index) => index,
            None => match self.read_table_index(tables.len())? {
                Some(index) => index,
                None => return Ok(()),
            },
        };
        let table = pdfqa::select_table(tables, index)?;

        writeln!(self.output, "--- Table {index} ---")?;
        writeln!(self.output, "{}", table.render())?;
        writeln!(self.output, "----------------")?;

        self.answer(Subject::Table { tables, index }, question).await
    }

    async fn answer(&mut self, subject: Subject<'_>, question: Option<&str>) -> Result<()> {
        if let Some(question) = question {
            return self.ask_once(subject, question).await;
        }

        loop {
            write!(
                self.output,
                "Ask a question about the document ('quit' to exit): "
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(());
            };
            if QUIT_COMMANDS.contains(&line.trim()) {
                return Ok(());
            }
            self.ask_once(subject, &line).await?;
        }
    }

    /// Runs one request and reports its outcome. A failed request is shown, not propagated.
    async fn ask_once(&mut self, subject: Subject<'_>, question: &str) -> Result<()> {
        if question.trim().is_empty() {
            writeln!(self.output, "{}", QaError::EmptyQuestion)?;
            return Ok(());
        }

        writeln!(self.output, "Querying Azure OpenAI...")?;
        self.output.flush()?;

        match subject.ask(self.qa, question).await {
            Ok(answer) => {
                info!("Answer received.");
                writeln!(self.output, "Response:")?;
                writeln!(self.output, "{answer}")?;
            }
            Err(e @ (QaError::EmptyQuestion | QaError::NoTablesFound)) => {
                writeln!(self.output, "{e}")?;
            }
            Err(e) => {
                warn!("Request failed: {e}");
                writeln!(self.output, "Error: {e}")?;
            }
        }
        Ok(())
    }

    fn read_table_index(&mut self, count: usize) -> Result<Option<usize>> {
        loop {
            write!(self.output, "Select a table [0-{}]: ", count - 1)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(None);
            };
            let line = line.trim();
            if QUIT_COMMANDS.contains(&line) {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(index) if index < count => return Ok(Some(index)),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 0 and {}.",
                    count - 1
                )?,
            }
        }
    }

    /// Reads one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Writes a one-line summary per table.
pub fn write_table_list(output: &mut impl Write, tables: &[Table]) -> Result<()> {
    for (index, table) in tables.iter().enumerate() {
        writeln!(
            output,
            "  [{index}] {} row(s); columns: {}",
            table.rows.len(),
            table.columns.join(", ")
        )?;
    }
    Ok(())
}
