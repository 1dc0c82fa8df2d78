use async_trait::async_trait;
use pdfqa::providers::ai::AiProvider;
use pdfqa::AnswerServiceError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
    failure_status: Arc<Mutex<Option<u16>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failure_status: Arc::new(Mutex::new(None)),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the user prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Makes every subsequent call fail as if the service answered with `status`.
    pub fn fail_with_status(&self, status: u16) {
        *self.failure_status.lock().unwrap() = Some(status);
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnswerServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(status) = *self.failure_status.lock().unwrap() {
            return Err(AnswerServiceError::Api {
                status,
                body: "MockAiProvider: programmed failure".to_string(),
            });
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if user_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(AnswerServiceError::Api {
            status: 500,
            body: format!("MockAiProvider: No response programmed for user prompt. Got: '{user_prompt}'"),
        })
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod helpers {
    use anyhow::{anyhow, Result};
    use printpdf::{
        BuiltinFont, FontId, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, Pt,
        TextItem, TextMatrix, TextRenderingMode,
    };

    /// One piece of text drawn at a fixed position (PDF user space, origin bottom-left).
    #[derive(Debug, Clone)]
    pub struct PlacedText {
        pub x: f32,
        pub y: f32,
        pub text: String,
    }

    /// How the fixture's text is encoded.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub enum FixtureFont {
        /// The standard Helvetica font, declared with `WinAnsiEncoding`.
        /// `printpdf` writes its strings as UTF-8, so keep the text ASCII.
        #[default]
        Builtin,
        /// Helvetica embedded as a Type0 font: two-byte glyph codes with a `ToUnicode` map.
        /// The embedded subset has no space glyph, so keep spaces out of the text.
        Embedded,
    }

    #[derive(Debug, Clone)]
    struct ShownText {
        x: f32,
        y: f32,
        items: Vec<TextItem>,
    }

    /// Builds multi-page test documents with `printpdf`.
    #[derive(Debug, Clone, Default)]
    pub struct PdfFixture {
        pages: Vec<Vec<ShownText>>,
        font: FixtureFont,
    }

    const PAGE_TOP: f32 = 720.0;
    const LEFT_MARGIN: f32 = 72.0;
    const LINE_HEIGHT: f32 = 14.0;
    const COLUMN_WIDTH: f32 = 120.0;
    const FONT_SIZE: f32 = 12.0;

    impl PdfFixture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_font(mut self, font: FixtureFont) -> Self {
            self.font = font;
            self
        }

        /// Adds a page with one line of text per entry, top to bottom.
        pub fn text_page(mut self, lines: &[&str]) -> Self {
            let items = lines
                .iter()
                .enumerate()
                .map(|(i, line)| shown(LEFT_MARGIN, PAGE_TOP - LINE_HEIGHT * i as f32, line))
                .collect();
            self.pages.push(items);
            self
        }

        /// Adds a page laying out `rows` as a grid. Empty strings leave the cell blank.
        pub fn table_page(mut self, rows: &[&[&str]]) -> Self {
            self.pages.push(grid_items(rows, PAGE_TOP));
            self
        }

        /// Adds a page with a heading line, a table, and a closing line under it.
        pub fn report_page(mut self, heading: &str, rows: &[&[&str]], footer: &str) -> Self {
            let table_top = PAGE_TOP - 3.0 * LINE_HEIGHT;
            let mut items = vec![shown(LEFT_MARGIN, PAGE_TOP, heading)];
            items.extend(grid_items(rows, table_top));
            items.push(shown(
                LEFT_MARGIN,
                table_top - LINE_HEIGHT * (rows.len() as f32 + 2.0),
                footer,
            ));
            self.pages.push(items);
            self
        }

        /// Adds a page with one `TJ` line: `parts` separated by the same spacing
        /// adjustment, in thousandths of an em.
        pub fn adjusted_line_page(mut self, parts: &[&str], adjustment: f32) -> Self {
            let mut items = Vec::with_capacity(parts.len() * 2);
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    items.push(TextItem::Offset(adjustment));
                }
                items.push(TextItem::Text(part.to_string()));
            }
            self.pages.push(vec![ShownText {
                x: LEFT_MARGIN,
                y: PAGE_TOP,
                items,
            }]);
            self
        }

        /// Adds a page with arbitrary positioned text.
        pub fn page(mut self, items: Vec<PlacedText>) -> Self {
            self.pages
                .push(items.iter().map(|t| shown(t.x, t.y, &t.text)).collect());
            self
        }

        /// Serializes the document.
        pub fn build(&self) -> Result<Vec<u8>> {
            let mut doc = PdfDocument::new("Test PDF");

            let embedded = match self.font {
                FixtureFont::Builtin => None,
                FixtureFont::Embedded => {
                    let font_bytes = BuiltinFont::Helvetica.get_subset_font().bytes;
                    let font = ParsedFont::from_bytes(&font_bytes, 0, &mut Vec::new())
                        .ok_or_else(|| anyhow!("Failed to parse built-in font"))?;
                    Some(doc.add_font(&font))
                }
            };

            for page in &self.pages {
                let ops = page
                    .iter()
                    .flat_map(|text| text_ops(text, embedded.as_ref()))
                    .collect();
                doc.pages.push(PdfPage::new(Mm(215.9), Mm(279.4), ops));
            }

            let mut warnings = Vec::new();
            let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
            if !warnings.is_empty() {
                // In a test context, it's fine to just print warnings.
                eprintln!("PDF generation warnings: {warnings:?}");
            }
            Ok(bytes)
        }
    }

    fn shown(x: f32, y: f32, text: &str) -> ShownText {
        ShownText {
            x,
            y,
            items: vec![TextItem::Text(text.to_string())],
        }
    }

    fn grid_items(rows: &[&[&str]], top: f32) -> Vec<ShownText> {
        rows.iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter().enumerate().filter_map(move |(c, cell)| {
                    (!cell.is_empty()).then(|| {
                        shown(
                            LEFT_MARGIN + COLUMN_WIDTH * c as f32,
                            top - LINE_HEIGHT * r as f32,
                            cell,
                        )
                    })
                })
            })
            .collect()
    }

    /// One `BT ... ET` block per shown text, positioned with `Tm`.
    fn text_ops(text: &ShownText, embedded: Option<&FontId>) -> Vec<Op> {
        let (set_font, write) = match embedded {
            Some(font) => (
                Op::SetFontSize {
                    size: Pt(FONT_SIZE),
                    font: font.clone(),
                },
                Op::WriteText {
                    items: text.items.clone(),
                    font: font.clone(),
                },
            ),
            None => (
                Op::SetFontSizeBuiltinFont {
                    size: Pt(FONT_SIZE),
                    font: BuiltinFont::Helvetica,
                },
                Op::WriteTextBuiltinFont {
                    items: text.items.clone(),
                    font: BuiltinFont::Helvetica,
                },
            ),
        };

        vec![
            Op::StartTextSection,
            set_font,
            Op::SetTextMatrix {
                matrix: TextMatrix::Translate(Pt(text.x), Pt(text.y)),
            },
            Op::SetTextRenderingMode {
                mode: TextRenderingMode::Fill,
            },
            write,
            Op::EndTextSection,
        ]
    }
}
