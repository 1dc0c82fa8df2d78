//! # Extracted Content Types
//!
//! The data model shared by the extractor, the prompt builder and the CLI.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One data row of a table, keyed by column name in column order.
pub type Record = IndexMap<String, String>;

/// A raw detected table: rows of cells, where a cell may be absent.
pub type RawGrid = Vec<Vec<Option<String>>>;

/// Content pulled out of a PDF, either as one string or as a sequence of tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "data")]
pub enum ExtractedContent {
    Text(String),
    Tables(Vec<Table>),
}

/// A table with its first detected row promoted to column headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    /// Builds a table from a raw grid, treating row 0 as the header row.
    ///
    /// Blank header cells are named `column_{index}` and repeated names get a
    /// `.{n}` suffix. Absent cells and missing trailing cells become `""`.
    pub fn from_grid(grid: RawGrid) -> Self {
        let mut rows = grid.into_iter();
        let Some(header) = rows.next() else {
            return Self::default();
        };

        let columns = normalize_headers(header);
        let records = rows
            .map(|row| {
                let mut cells = row.into_iter();
                columns
                    .iter()
                    .map(|name| (name.clone(), cells.next().flatten().unwrap_or_default()))
                    .collect::<Record>()
            })
            .collect();

        Self {
            columns,
            rows: records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at `row` under `column`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Renders the table as a whitespace-aligned plain-text grid.
    ///
    /// The first column holds the row index; every other column is right-aligned
    /// under its header and columns are separated by two spaces.
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return format!("Empty table\nColumns: [{}]", self.columns.join(", "));
        }

        let index_labels: Vec<String> = (0..self.rows.len()).map(|i| i.to_string()).collect();
        let index_width = index_labels.iter().map(|s| s.len()).max().unwrap_or(0);

        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|name| {
                self.rows
                    .iter()
                    .map(|row| row.get(name).map_or(0, |v| v.chars().count()))
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let mut header = " ".repeat(index_width);
        for (name, width) in self.columns.iter().zip(&widths) {
            header.push_str("  ");
            header.push_str(&pad_left(name, *width));
        }
        lines.push(header.trim_end().to_string());

        for (label, row) in index_labels.iter().zip(&self.rows) {
            let mut line = format!("{label:<index_width$}");
            for (name, width) in self.columns.iter().zip(&widths) {
                line.push_str("  ");
                line.push_str(&pad_left(row.get(name).map_or("", String::as_str), *width));
            }
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

fn pad_left(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{}{value}", " ".repeat(width.saturating_sub(len)))
}

fn normalize_headers(header: Vec<Option<String>>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .into_iter()
        .enumerate()
        .map(|(index, cell)| {
            let base = match cell.map(|c| c.trim().to_string()) {
                Some(name) if !name.is_empty() => name,
                _ => format!("column_{index}"),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|row| row.iter().map(|c| Some(c.to_string())).collect())
            .collect()
    }

    #[test]
    fn test_header_promotion_preserves_row_order() {
        let table = Table::from_grid(grid(&[&["A", "B"], &["1", "2"], &["3", "4"]]));

        assert_eq!(table.columns, vec!["A", "B"]);
        let first: Record = [("A", "1"), ("B", "2")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let second: Record = [("A", "3"), ("B", "4")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(table.rows, vec![first, second]);
    }

    #[test]
    fn test_header_only_grid_is_an_empty_table() {
        let table = Table::from_grid(grid(&[&["A", "B"]]));
        assert_eq!(table.columns, vec!["A", "B"]);
        assert!(table.is_empty());
        assert_eq!(table.render(), "Empty table\nColumns: [A, B]");
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let table = Table::from_grid(vec![
            vec![Some("Name".into()), None, Some("Name".into()), Some(" ".into())],
            vec![Some("x".into())],
        ]);
        assert_eq!(table.columns, vec!["Name", "column_1", "Name.1", "column_3"]);
        assert_eq!(table.cell(0, "Name"), Some("x"));
        assert_eq!(table.cell(0, "Name.1"), Some(""));
        assert_eq!(table.cell(0, "column_3"), Some(""));
    }

    #[test]
    fn test_empty_grid() {
        let table = Table::from_grid(Vec::new());
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_render_aligns_columns() {
        let table = Table::from_grid(grid(&[
            &["Item", "Qty"],
            &["Apples", "3"],
            &["Kiwi", "12"],
        ]));
        let expected = "     Item  Qty\n0  Apples    3\n1    Kiwi   12";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_row_keys_serialize_in_column_order() {
        let table = Table::from_grid(grid(&[
            &["Zeta", "Alpha", "Mid"],
            &["1", "2", "3"],
        ]));

        let row: Vec<&String> = table.rows[0].keys().collect();
        assert_eq!(row, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"columns":["Zeta","Alpha","Mid"],"rows":[{"Zeta":"1","Alpha":"2","Mid":"3"}]}"#
        );
    }
}
