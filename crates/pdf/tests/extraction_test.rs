//! # PDF Extraction Integration Tests
//!
//! Builds small PDFs in memory and runs both extraction variants over them.

use anyhow::Result;
use pdfqa::{ExtractedContent, ExtractionError};
use pdfqa_pdf::{extract, extract_page_texts, extract_tables, extract_text, ExtractionMode};
use pdfqa_test_utils::helpers::{FixtureFont, PdfFixture, PlacedText};

// --- Text variant ---

#[test]
fn test_text_is_concatenated_in_page_order() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .text_page(&["First page"])
        .text_page(&["Second page"])
        .text_page(&["Third page"])
        .build()?;

    let text = extract_text(&pdf_data)?;

    assert_eq!(text, "First page\nSecond page\nThird page\n");
    let segments: Vec<&str> = text.split_terminator('\n').collect();
    assert_eq!(segments, vec!["First page", "Second page", "Third page"]);
    Ok(())
}

#[test]
fn test_lines_within_a_page_are_kept() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .text_page(&["Invoice 1024", "Total due: 18.50 (EUR)"])
        .build()?;

    let pages = extract_page_texts(&pdf_data)?;

    assert_eq!(pages, vec!["Invoice 1024\nTotal due: 18.50 (EUR)".to_string()]);
    Ok(())
}

#[test]
fn test_runs_on_one_baseline_are_joined_with_spaces() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .page(vec![
            PlacedText {
                x: 72.0,
                y: 700.0,
                text: "Left".to_string(),
            },
            PlacedText {
                x: 300.0,
                y: 700.0,
                text: "Right".to_string(),
            },
        ])
        .build()?;

    assert_eq!(extract_text(&pdf_data)?, "Left Right\n");
    Ok(())
}

#[test]
fn test_embedded_font_is_decoded_through_its_unicode_map() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .with_font(FixtureFont::Embedded)
        .text_page(&["Café", "Magic42."])
        .build()?;

    let text = extract_text(&pdf_data)?;

    assert_eq!(text, "Café\nMagic42.\n");
    assert!(!text.contains('\0'));
    Ok(())
}

#[test]
fn test_embedded_font_words_on_one_line() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .with_font(FixtureFont::Embedded)
        .page(vec![
            PlacedText {
                x: 72.0,
                y: 700.0,
                text: "Crème".to_string(),
            },
            PlacedText {
                x: 150.0,
                y: 700.0,
                text: "brûlée".to_string(),
            },
        ])
        .build()?;

    assert_eq!(extract_text(&pdf_data)?, "Crème brûlée\n");
    Ok(())
}

#[test]
fn test_tj_word_gaps_become_spaces() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .adjusted_line_page(&["Quarterly", "revenue", "grew"], -400.0)
        .adjusted_line_page(&["Ke", "rn", "ing"], -60.0)
        .build()?;

    let pages = extract_page_texts(&pdf_data)?;

    assert_eq!(pages, vec!["Quarterly revenue grew", "Kerning"]);
    Ok(())
}

#[test]
fn test_blank_page_contributes_an_empty_segment() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .text_page(&["Cover"])
        .text_page(&[])
        .text_page(&["Back"])
        .build()?;

    assert_eq!(extract_text(&pdf_data)?, "Cover\n\nBack\n");
    Ok(())
}

#[test]
fn test_document_without_pages_yields_empty_text() -> Result<()> {
    let pdf_data = PdfFixture::new().build()?;
    assert_eq!(extract_text(&pdf_data)?, "");
    Ok(())
}

#[test]
fn test_malformed_bytes_fail_with_extraction_error() {
    let result = extract_text(b"this is not a pdf");
    assert!(matches!(result, Err(ExtractionError::PdfParse(_))));

    let result = extract_tables(b"%PDF-1.4\ngarbage");
    assert!(result.is_err());
}

// --- Table variant ---

#[test]
fn test_table_header_row_becomes_columns() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .table_page(&[&["A", "B"], &["1", "2"], &["3", "4"]])
        .build()?;

    let tables = extract_tables(&pdf_data)?;

    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.columns, vec!["A", "B"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.cell(0, "A"), Some("1"));
    assert_eq!(table.cell(0, "B"), Some("2"));
    assert_eq!(table.cell(1, "A"), Some("3"));
    assert_eq!(table.cell(1, "B"), Some("4"));
    Ok(())
}

#[test]
fn test_tables_are_ordered_by_page_then_position() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .report_page(
            "Sales by region",
            &[&["Region", "Units"], &["North", "120"], &["South", "95"]],
            "Figures are provisional.",
        )
        .text_page(&["A page without any tables."])
        .table_page(&[&["Product", "Price", "Stock"], &["Lamp", "", "4"]])
        .build()?;

    let tables = extract_tables(&pdf_data)?;

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].columns, vec!["Region", "Units"]);
    assert_eq!(tables[0].cell(1, "Region"), Some("South"));
    assert_eq!(tables[1].columns, vec!["Product", "Price", "Stock"]);
    assert_eq!(tables[1].cell(0, "Price"), Some(""));
    assert_eq!(tables[1].cell(0, "Stock"), Some("4"));
    Ok(())
}

#[test]
fn test_embedded_font_table_cells_are_decoded() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .with_font(FixtureFont::Embedded)
        .table_page(&[&["Plat", "Prix"], &["Crêpe", "7€"], &["Soupe", "5€"]])
        .build()?;

    let tables = extract_tables(&pdf_data)?;

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].columns, vec!["Plat", "Prix"]);
    assert_eq!(tables[0].cell(0, "Plat"), Some("Crêpe"));
    assert_eq!(tables[0].cell(1, "Prix"), Some("5€"));
    Ok(())
}

#[test]
fn test_document_without_tables_yields_empty_sequence() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .text_page(&["Plain prose only.", "Nothing tabular here."])
        .build()?;

    let tables = extract_tables(&pdf_data)?;

    assert!(tables.is_empty());
    Ok(())
}

#[test]
fn test_extract_dispatches_on_mode() -> Result<()> {
    let pdf_data = PdfFixture::new()
        .table_page(&[&["A", "B"], &["1", "2"]])
        .build()?;

    match extract(&pdf_data, ExtractionMode::Text)? {
        ExtractedContent::Text(text) => assert_eq!(text, "A B\n1 2\n"),
        other => panic!("Expected text, got {other:?}"),
    }
    match extract(&pdf_data, ExtractionMode::Tables)? {
        ExtractedContent::Tables(tables) => assert_eq!(tables.len(), 1),
        other => panic!("Expected tables, got {other:?}"),
    }
    Ok(())
}
