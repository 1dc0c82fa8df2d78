//! # Prompt Template Modules
//!
//! This module organizes the prompt templates and the builders that fill them.
//! Templates live in `document`; the functions that combine extracted content
//! with a user question live in `core`.

pub mod core;
pub mod document;

pub use self::core::{
    build_table_prompt, build_text_prompt, fill_template, truncate_chars, Prompt,
};
