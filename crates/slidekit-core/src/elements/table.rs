//! Table element payload.

use super::SerializableColor;
use serde::{Deserialize, Serialize};

/// Per-cell style overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    pub fill: Option<SerializableColor>,
    pub text_color: Option<SerializableColor>,
    pub bold: Option<bool>,
}

/// A single table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    pub text: String,
    pub style: CellStyle,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::default(),
        }
    }
}

/// Element-level style overrides. Each `Some` wins over the theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStyle {
    pub header_fill: Option<SerializableColor>,
    pub header_text: Option<SerializableColor>,
    pub body_fill: Option<SerializableColor>,
    pub stripe_fill: Option<SerializableColor>,
    pub text_color: Option<SerializableColor>,
    pub border_color: Option<SerializableColor>,
    pub border_width: Option<f64>,
    pub font_size: Option<f64>,
    pub cell_padding: Option<f64>,
}

/// A fixed row/column grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableContent {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells. Missing cells render empty.
    pub cells: Vec<Vec<TableCell>>,
    /// First row is styled as a header.
    pub header_row: bool,
    /// Alternate body rows use the stripe fill.
    pub zebra: bool,
    /// Theme id looked up in the theme table.
    pub theme: Option<String>,
    pub style: TableStyle,
}

impl Default for TableContent {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

impl TableContent {
    /// Create an empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![TableCell::default(); cols]; rows],
            header_row: true,
            zebra: false,
            theme: None,
            style: TableStyle::default(),
        }
    }

    /// Get a cell, if present.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Set the text of a cell, growing the backing storage if needed.
    /// Writes outside the declared grid are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.cells[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, TableCell::default);
        }
        cells[col].text = text.into();
    }

    pub fn is_header(&self, row: usize) -> bool {
        self.header_row && row == 0
    }

    /// Striped body rows, counted from the first non-header row.
    pub fn is_striped(&self, row: usize) -> bool {
        if !self.zebra || self.is_header(row) {
            return false;
        }
        let body_index = if self.header_row { row - 1 } else { row };
        body_index % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cell_bounds() {
        let mut table = TableContent::new(2, 2);
        table.set_cell(1, 1, "x");
        table.set_cell(5, 0, "ignored");
        assert_eq!(table.cell(1, 1).map(|c| c.text.as_str()), Some("x"));
        assert!(table.cell(5, 0).is_none());
    }

    #[test]
    fn test_zebra_skips_header() {
        let mut table = TableContent::new(5, 1);
        table.zebra = true;
        let striped: Vec<bool> = (0..5).map(|r| table.is_striped(r)).collect();
        assert_eq!(striped, vec![false, false, true, false, true]);

        table.header_row = false;
        let striped: Vec<bool> = (0..5).map(|r| table.is_striped(r)).collect();
        assert_eq!(striped, vec![false, true, false, true, false]);
    }
}
