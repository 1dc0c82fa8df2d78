//! # Prompt Builder
//!
//! Combines extracted content with a user question into the system and user
//! prompts sent to the answer service.

use super::document::{
    MAX_DOCUMENT_CHARS, TABLE_QA_SYSTEM_PROMPT, TABLE_QA_USER_PROMPT, TEXT_QA_SYSTEM_PROMPT,
    TEXT_QA_USER_PROMPT,
};
use crate::types::Table;

/// A fully composed request: the fixed system instruction and the user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Returns the first `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Builds the text-mode prompt. The document is truncated to `MAX_DOCUMENT_CHARS`.
///
/// The question is embedded as given; rejecting an empty question is the caller's job.
pub fn build_text_prompt(document_text: &str, question: &str) -> Prompt {
    let content = truncate_chars(document_text, MAX_DOCUMENT_CHARS);
    let user = fill_template(
        TEXT_QA_USER_PROMPT,
        &[("{content}", content), ("{question}", question)],
    );
    Prompt {
        system: TEXT_QA_SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Builds the table-mode prompt from one selected table. No truncation is applied.
pub fn build_table_prompt(table: &Table, question: &str) -> Prompt {
    let rendered = table.render();
    let user = fill_template(
        TABLE_QA_USER_PROMPT,
        &[("{table}", rendered.as_str()), ("{question}", question)],
    );
    Prompt {
        system: TABLE_QA_SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Substitutes every placeholder in one pass over `template`.
///
/// Substituted values are copied verbatim and never scanned again, so a
/// placeholder typed inside the document or the question stays literal.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while !rest.is_empty() {
        match values
            .iter()
            .find(|(placeholder, _)| rest.starts_with(placeholder))
        {
            Some((placeholder, value)) => {
                filled.push_str(value);
                rest = &rest[placeholder.len()..];
            }
            None => {
                let next = match rest.find('{') {
                    Some(0) => 1,
                    Some(index) => index,
                    None => rest.len(),
                };
                filled.push_str(&rest[..next]);
                rest = &rest[next..];
            }
        }
    }

    filled
}
