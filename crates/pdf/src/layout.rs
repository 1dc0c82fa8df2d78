//! # Positioned Text Runs
//!
//! Walks a page's content-stream operators, tracks the text state, and emits
//! each run of drawn text together with the position where it starts.

use crate::fonts::{FontDecoder, PageFonts};
use pdf::content::{Matrix, Op, TextDrawAdjusted};
use pdf::primitive::PdfString;

/// Runs whose baselines differ by no more than this belong to the same line.
pub const LINE_TOLERANCE: f32 = 3.0;

/// A `TJ` adjustment at or below this value (thousandths of text space) is read as a word gap.
const WORD_GAP_ADJUSTMENT: f32 = -250.0;

/// A run of text drawn without repositioning in between.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl TextRun {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// Runs sharing a baseline, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub y: f32,
    pub runs: Vec<TextRun>,
}

#[derive(Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl TextMatrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translated(self, tx: f32, ty: f32) -> Self {
        Self {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..self
        }
    }
}

impl From<&Matrix> for TextMatrix {
    fn from(m: &Matrix) -> Self {
        Self {
            a: m.a,
            b: m.b,
            c: m.c,
            d: m.d,
            e: m.e,
            f: m.f,
        }
    }
}

struct TextState<'a> {
    line_matrix: TextMatrix,
    font: Option<&'a FontDecoder>,
    leading: f32,
    /// Set after a draw; cleared by anything that moves the text position.
    continues_run: bool,
    runs: Vec<TextRun>,
}

impl<'a> TextState<'a> {
    fn new() -> Self {
        Self {
            line_matrix: TextMatrix::IDENTITY,
            font: None,
            leading: 0.0,
            continues_run: false,
            runs: Vec::new(),
        }
    }

    fn move_to(&mut self, matrix: TextMatrix) {
        self.line_matrix = matrix;
        self.continues_run = false;
    }

    /// Strings shown without a known font are read as UTF-8, lossily.
    fn decode(&self, text: &PdfString) -> String {
        match self.font {
            Some(font) => font.decode(text.as_bytes()),
            None => text.to_string_lossy(),
        }
    }

    fn draw_string(&mut self, text: &PdfString) {
        let decoded = self.decode(text);
        self.draw(&decoded);
    }

    fn draw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let continued = match self.runs.last_mut() {
            Some(run) if self.continues_run => {
                run.text.push_str(text);
                true
            }
            _ => false,
        };
        if !continued {
            let start = self.line_matrix;
            self.runs.push(TextRun::new(start.e, start.f, text));
        }
        self.continues_run = true;
    }
}

/// Collects the text runs drawn by a page's operators, in content-stream order.
///
/// `fonts` holds the decoders for the fonts `Tf` can select on this page.
/// The current transformation matrix is not applied; positions are in text space.
pub fn collect_runs(operations: &[Op], fonts: &PageFonts) -> Vec<TextRun> {
    let mut state = TextState::new();

    for op in operations {
        match op {
            Op::BeginText => state.move_to(TextMatrix::IDENTITY),
            Op::SetTextMatrix { matrix } => state.move_to(matrix.into()),
            Op::MoveTextPosition { translation } => {
                let next = state.line_matrix.translated(translation.x, translation.y);
                state.move_to(next);
            }
            Op::Leading { leading } => state.leading = *leading,
            Op::TextFont { name, .. } => state.font = fonts.get(name.as_str()),
            Op::TextNewline => {
                let next = state.line_matrix.translated(0.0, -state.leading);
                state.move_to(next);
            }
            Op::TextDraw { text } => state.draw_string(text),
            Op::TextDrawAdjusted { array } => {
                for item in array {
                    match item {
                        TextDrawAdjusted::Text(text) => state.draw_string(text),
                        TextDrawAdjusted::Spacing(adjustment)
                            if *adjustment <= WORD_GAP_ADJUSTMENT =>
                        {
                            state.draw(" ")
                        }
                        TextDrawAdjusted::Spacing(_) => {}
                    }
                }
            }
            _ => {}
        }
    }

    state.runs
}

/// Renders runs as page text in content-stream order.
///
/// Runs on the same baseline are separated by a space, a change of baseline
/// starts a new line.
pub fn runs_to_text(runs: &[TextRun]) -> String {
    let mut text = String::new();
    let mut previous_y: Option<f32> = None;

    for run in runs {
        match previous_y {
            Some(y) if (y - run.y).abs() <= LINE_TOLERANCE => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        text.push_str(run.text.trim_end());
        previous_y = Some(run.y);
    }

    text
}

/// Groups runs into lines, top of the page first, each line ordered left to right.
pub fn group_lines(runs: &[TextRun]) -> Vec<Line> {
    let mut sorted: Vec<&TextRun> = runs.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut lines: Vec<Line> = Vec::new();
    for run in sorted {
        let same_line = lines
            .last()
            .is_some_and(|line| (line.y - run.y).abs() <= LINE_TOLERANCE);
        if same_line {
            if let Some(line) = lines.last_mut() {
                line.runs.push(run.clone());
            }
        } else {
            lines.push(Line {
                y: run.y,
                runs: vec![run.clone()],
            });
        }
    }

    for line in &mut lines {
        line.runs.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}
