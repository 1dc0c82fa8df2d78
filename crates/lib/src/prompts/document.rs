//! # Document Question-Answering Prompts
//!
//! Fixed per-mode instructions. They are not user-configurable.

/// The maximum number of characters of document text embedded in a text-mode prompt.
pub const MAX_DOCUMENT_CHARS: usize = 5000;

/// System instruction for questions about a document's plain text.
pub const TEXT_QA_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions based on the provided document.";

/// System instruction for questions about a single extracted table.
pub const TABLE_QA_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions based on tables.";

/// User prompt for text mode.
///
/// Placeholders: `{content}`, `{question}`
pub const TEXT_QA_USER_PROMPT: &str = "Document:\n{content}\n\nUser Question: {question}";

/// User prompt for table mode.
///
/// Placeholders: `{table}`, `{question}`
pub const TABLE_QA_USER_PROMPT: &str = "Here is a table:\n{table}\n\nUser Question: {question}";
