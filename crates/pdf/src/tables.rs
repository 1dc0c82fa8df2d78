//! # Table Detection
//!
//! Finds tables by text alignment: a table is a block of consecutive lines,
//! each with at least two runs, whose runs start under the column positions
//! set by the block's first line.

use crate::layout::Line;
use pdfqa::RawGrid;

/// How far a run may start from a column anchor and still belong to that column.
pub const COLUMN_TOLERANCE: f32 = 5.0;

/// The minimum number of lines (header included) for a block to count as a table.
const MIN_TABLE_LINES: usize = 2;

/// Detects tables among a page's lines, in top-to-bottom order.
///
/// Each table is returned as a raw grid. A cell with no run under its column
/// is `None`.
pub fn detect_tables(lines: &[Line]) -> Vec<RawGrid> {
    let mut tables = Vec::new();
    let mut start = 0;

    while start < lines.len() {
        let header = &lines[start];
        if header.runs.len() < 2 {
            start += 1;
            continue;
        }

        let anchors: Vec<f32> = header.runs.iter().map(|run| run.x).collect();
        let mut grid: RawGrid = vec![header
            .runs
            .iter()
            .map(|run| Some(run.text.trim().to_string()))
            .collect()];

        let mut end = start + 1;
        while let Some(row) = lines.get(end).and_then(|line| align_row(line, &anchors)) {
            grid.push(row);
            end += 1;
        }

        if grid.len() >= MIN_TABLE_LINES {
            tables.push(grid);
            start = end;
        } else {
            start += 1;
        }
    }

    tables
}

/// Maps a line's runs onto the column anchors, or `None` if the line does not fit.
fn align_row(line: &Line, anchors: &[f32]) -> Option<Vec<Option<String>>> {
    if line.runs.len() < 2 {
        return None;
    }

    let mut row: Vec<Option<String>> = vec![None; anchors.len()];
    for run in &line.runs {
        let column = nearest_anchor(run.x, anchors)?;
        if row[column].is_some() {
            return None;
        }
        row[column] = Some(run.text.trim().to_string());
    }
    Some(row)
}

fn nearest_anchor(x: f32, anchors: &[f32]) -> Option<usize> {
    anchors
        .iter()
        .enumerate()
        .map(|(index, anchor)| (index, (anchor - x).abs()))
        .filter(|(_, distance)| *distance <= COLUMN_TOLERANCE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
