//! # pdfqa-pdf: PDF Content Extraction
//!
//! Turns an uploaded PDF byte stream into either its plain text or the tables
//! detected on its pages. Extraction is all-or-nothing: a page that fails to
//! parse fails the whole document.

pub mod fonts;
pub mod layout;
pub mod tables;

use pdf::{content::Op, file::FileOptions};
use pdfqa::{ExtractedContent, ExtractionError, Table};
use tracing::{debug, info, instrument};

pub use fonts::{FontDecoder, PageFonts, SimpleEncoding};
pub use layout::{collect_runs, group_lines, runs_to_text, Line, TextRun};
pub use tables::detect_tables;

/// Selects which form of content to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    #[default]
    Text,
    Tables,
}

/// A page's content-stream operators with the fonts they can select.
struct PageContent {
    operations: Vec<Op>,
    fonts: PageFonts,
}

impl PageContent {
    fn runs(&self) -> Vec<TextRun> {
        collect_runs(&self.operations, &self.fonts)
    }
}

// --- Core Pipeline Logic ---

/// Loads the document and returns the content of every page, in page order.
fn load_pages(pdf_data: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| ExtractionError::PdfParse(e.to_string()))?;
    let resolver = file.resolver();
    let page_count = file.num_pages();
    let mut pages = Vec::with_capacity(page_count as usize);

    for page_num in 0..page_count {
        let page_error = |e: pdf::error::PdfError| ExtractionError::Page {
            page: page_num + 1,
            message: e.to_string(),
        };
        let page = file.get_page(page_num).map_err(page_error)?;
        let operations = match &page.contents {
            Some(content) => content.operations(&resolver).map_err(page_error)?,
            None => Vec::new(),
        };
        let fonts = fonts::page_fonts(&page, &resolver);
        debug!(
            page = page_num + 1,
            operations = operations.len(),
            fonts = fonts.len(),
            "Loaded page"
        );
        pages.push(PageContent { operations, fonts });
    }

    Ok(pages)
}

/// Extracts the text of each page, in page order.
pub fn extract_page_texts(pdf_data: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let pages = load_pages(pdf_data)?;
    Ok(pages.iter().map(|page| runs_to_text(&page.runs())).collect())
}

/// Extracts the text of all pages, each page followed by a newline.
///
/// A document with no pages yields an empty string.
#[instrument(skip(pdf_data), fields(bytes = pdf_data.len()))]
pub fn extract_text(pdf_data: &[u8]) -> Result<String, ExtractionError> {
    let page_texts = extract_page_texts(pdf_data)?;
    let mut full_text = String::new();
    for page_text in &page_texts {
        full_text.push_str(page_text);
        full_text.push('\n');
    }
    info!(
        "Extracted {} characters from {} pages.",
        full_text.chars().count(),
        page_texts.len()
    );
    Ok(full_text)
}

/// Extracts every detected table, in page order and then detection order within a page.
///
/// An empty result means no tables were found; it is not an error.
#[instrument(skip(pdf_data), fields(bytes = pdf_data.len()))]
pub fn extract_tables(pdf_data: &[u8]) -> Result<Vec<Table>, ExtractionError> {
    let pages = load_pages(pdf_data)?;
    let mut tables = Vec::new();

    for (page_index, page) in pages.iter().enumerate() {
        let lines = group_lines(&page.runs());
        let page_tables = detect_tables(&lines);
        debug!(
            page = page_index + 1,
            tables = page_tables.len(),
            "Detected tables"
        );
        tables.extend(page_tables.into_iter().map(Table::from_grid));
    }

    info!("Detected {} tables across {} pages.", tables.len(), pages.len());
    Ok(tables)
}

/// Extracts content in the requested mode.
pub fn extract(pdf_data: &[u8], mode: ExtractionMode) -> Result<ExtractedContent, ExtractionError> {
    match mode {
        ExtractionMode::Text => extract_text(pdf_data).map(ExtractedContent::Text),
        ExtractionMode::Tables => extract_tables(pdf_data).map(ExtractedContent::Tables),
    }
}
