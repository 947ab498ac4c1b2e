//! In-memory table: ordered named columns over rows of cells.
//!
//! Every row holds exactly one cell per column. Mutating helpers keep that
//! shape; row order and column order are both significant on export.

use std::cmp::Ordering;

use crate::cell::Cell;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact header match first, then a match ignoring surrounding
    /// whitespace in the stored header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.trim() == name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a column, filling every existing row with `default`.
    /// Returns false if a column with that name already exists.
    pub fn add_column(&mut self, name: &str, default: Cell) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(default.clone());
        }
        true
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Overwrite one cell. Returns false if the row or column does not exist.
    pub fn set(&mut self, row: usize, column: &str, value: Cell) -> bool {
        let Some(col) = self.column_index(column) else {
            return false;
        };
        match self.rows.get_mut(row) {
            Some(r) => {
                r[col] = value;
                true
            }
            None => false,
        }
    }

    /// Index of the first row whose `key_column` displays as `key`.
    pub fn find_row(&self, key_column: &str, key: &str) -> Option<usize> {
        let col = self.column_index(key_column)?;
        self.rows
            .iter()
            .position(|r| !r[col].is_empty() && r[col].to_string() == key)
    }

    /// Distinct non-empty values of `column`, sorted case-insensitively.
    pub fn distinct_sorted(&self, column: &str) -> Vec<String> {
        let Some(col) = self.column_index(column) else {
            return Vec::new();
        };
        let mut values: Vec<String> = Vec::new();
        for row in &self.rows {
            if row[col].is_empty() {
                continue;
            }
            let value = row[col].to_string();
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values.sort_by_key(|v| v.to_lowercase());
        values
    }

    /// Move `name` to the rightmost position. No-op if absent.
    pub fn move_column_to_end(&mut self, name: &str) {
        let Some(col) = self.column_index(name) else {
            return;
        };
        if col + 1 == self.columns.len() {
            return;
        }
        let header = self.columns.remove(col);
        self.columns.push(header);
        for row in &mut self.rows {
            let cell = row.remove(col);
            row.push(cell);
        }
    }

    /// Stable sort of rows by `column`, comparing lowercased display text.
    /// Missing cells (`Empty`, NaN) sort after every value; blank text is
    /// an ordinary `""` and sorts first. No-op if absent.
    pub fn sort_rows_by_ci(&mut self, column: &str) {
        let Some(col) = self.column_index(column) else {
            return;
        };
        self.rows.sort_by(|a, b| compare_ci(&a[col], &b[col]));
    }
}

fn is_missing(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Float(f) => f.is_nan(),
        _ => false,
    }
}

fn compare_ci(a: &Cell, b: &Cell) -> Ordering {
    match (is_missing(a), is_missing(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.to_string().to_lowercase().cmp(&b.to_string().to_lowercase()),
    }
}
