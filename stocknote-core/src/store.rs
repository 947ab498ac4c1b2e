//! Tabular store: spreadsheet file I/O.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read with calamine and
//! written with rust_xlsxwriter; `.csv` goes through the csv crate. Only the
//! first worksheet is read, and its first row is the header.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveTime;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::cell::Cell;
use crate::error::TableError;
use crate::schema::{COMPANY_NAME, UPDATE_DATE};
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Workbook,
    Csv,
}

fn file_kind(path: &Path) -> Result<FileKind, TableError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(FileKind::Workbook),
        "csv" => Ok(FileKind::Csv),
        _ => Err(TableError::UnsupportedFormat(ext)),
    }
}

/// Load the first sheet of a spreadsheet file into a table.
pub fn load(path: &Path) -> Result<Table, TableError> {
    let table = match file_kind(path)? {
        FileKind::Workbook => load_workbook(path)?,
        FileKind::Csv => load_csv(path)?,
    };
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded spreadsheet"
    );
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<Table, TableError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TableError::parse(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::parse(path, "workbook has no worksheets"))?
        .map_err(|e| TableError::parse(path, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let columns = header_names(header.iter().map(|c| cell_from_data(c).to_string()));
    let body = rows.map(|r| r.iter().map(cell_from_data).collect()).collect();
    Ok(Table::new(columns, trim_trailing_blank(body)))
}

fn load_csv(path: &Path) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| TableError::parse(path, e))?;
    let header = reader.headers().map_err(|e| TableError::parse(path, e))?.clone();
    let columns = header_names(header.iter().map(str::to_string));

    let mut body = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TableError::parse(path, e))?;
        body.push(record.iter().map(Cell::infer).collect());
    }
    Ok(Table::new(columns, trim_trailing_blank(body)))
}

/// Blank header cells become `Unnamed: <index>`. Other headers are kept
/// verbatim so they round-trip on export.
fn header_names(raw: impl Iterator<Item = String>) -> Vec<String> {
    raw.enumerate()
        .map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            }
        })
        .collect()
}

fn trim_trailing_blank(mut rows: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    while rows.last().is_some_and(|r| r.iter().all(Cell::is_empty)) {
        rows.pop();
    }
    rows
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

/// Column and row order used for every saved file: `Update Date` last, rows
/// sorted case-insensitively by `Company Name`. The input is not modified.
pub fn prepare_for_export(table: &Table) -> Table {
    let mut out = table.clone();
    out.move_column_to_end(UPDATE_DATE);
    out.sort_rows_by_ci(COMPANY_NAME);
    out
}

/// Reorder per [`prepare_for_export`] and write to `destination`,
/// creating or overwriting it. The format follows the file extension.
pub fn save(table: &Table, destination: &Path) -> Result<(), TableError> {
    let kind = file_kind(destination)?;
    let ext = destination.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if kind == FileKind::Workbook && !ext.eq_ignore_ascii_case("xlsx") {
        return Err(TableError::UnsupportedFormat(ext.to_ascii_lowercase()));
    }
    let prepared = prepare_for_export(table);
    match kind {
        FileKind::Workbook => write_xlsx(&prepared, destination)
            .map_err(|e| TableError::io(destination, e))?,
        FileKind::Csv => write_csv(&prepared, destination)?,
    }
    tracing::info!(
        path = %destination.display(),
        rows = prepared.len(),
        "saved spreadsheet"
    );
    Ok(())
}

/// `Update Date` is stored as text; every other datetime stays an Excel
/// date, shown date-only when it has no time part.
fn write_xlsx(table: &Table, destination: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;

    let text_dates = table.column_index(UPDATE_DATE);
    for (c, name) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, name, &header_format)?;
    }
    for (r, row) in table.rows().iter().enumerate() {
        let r = r as u32 + 1;
        for (idx, cell) in row.iter().enumerate() {
            let c = idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    sheet.write_string(r, c, s)?;
                }
                Cell::Int(i) => {
                    sheet.write_number(r, c, *i as f64)?;
                }
                Cell::Float(f) if f.is_finite() => {
                    sheet.write_number(r, c, *f)?;
                }
                Cell::Float(_) => {}
                Cell::Bool(b) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                Cell::DateTime(_) if text_dates == Some(idx) => {
                    sheet.write_string(r, c, cell.to_string())?;
                }
                Cell::DateTime(dt) => {
                    let format = if dt.time() == NaiveTime::MIN {
                        &date_format
                    } else {
                        &datetime_format
                    };
                    sheet.write_datetime_with_format(r, c, dt, format)?;
                }
            }
        }
    }
    workbook.save(destination)
}

fn write_csv(table: &Table, destination: &Path) -> Result<(), TableError> {
    let mut writer =
        csv::Writer::from_path(destination).map_err(|e| TableError::io(destination, e))?;
    writer
        .write_record(table.columns())
        .map_err(|e| TableError::io(destination, e))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(Cell::to_string))
            .map_err(|e| TableError::io(destination, e))?;
    }
    writer.flush().map_err(|e| TableError::io(destination, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SYMBOL;

    fn table() -> Table {
        Table::new(
            vec![COMPANY_NAME.into(), UPDATE_DATE.into(), SYMBOL.into()],
            vec![
                vec![Cell::text("zeta"), Cell::text("2024-03-01 09:15:00"), Cell::text("ZTA")],
                vec![Cell::text("Acme"), Cell::Empty, Cell::text("ACM")],
            ],
        )
    }

    #[test]
    fn prepare_moves_update_date_and_sorts() {
        let original = table();
        let out = prepare_for_export(&original);
        assert_eq!(out.columns(), &[COMPANY_NAME, SYMBOL, UPDATE_DATE]);
        assert_eq!(out.rows()[0][0], Cell::text("Acme"));
        assert_eq!(out.rows()[1][2], Cell::text("2024-03-01 09:15:00"));
        // input untouched
        assert_eq!(original.rows()[0][0], Cell::text("zeta"));
    }

    #[test]
    fn prepare_without_company_column_keeps_row_order() {
        let t = Table::new(
            vec!["Ticker".into()],
            vec![vec![Cell::text("b")], vec![Cell::text("a")]],
        );
        assert_eq!(prepare_for_export(&t), t);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load(Path::new("data.json")).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat(ext) if ext == "json"));
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let err = load(Path::new("/nonexistent/input.xlsx")).unwrap_err();
        assert!(matches!(err, TableError::Parse { .. }));
    }

    #[test]
    fn header_names_fill_blanks() {
        let names = header_names(vec!["A".to_string(), " ".to_string(), "C ".to_string()].into_iter());
        assert_eq!(names, vec!["A", "Unnamed: 1", "C "]);
    }

    #[test]
    fn csv_roundtrip_sorts_and_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        save(&table(), &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.columns(), &[COMPANY_NAME, SYMBOL, UPDATE_DATE]);
        assert_eq!(loaded.get(0, COMPANY_NAME), Some(&Cell::text("Acme")));
        assert_eq!(loaded.get(0, UPDATE_DATE), Some(&Cell::Empty));
    }

    #[test]
    fn padded_headers_survive_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("padded.csv");
        std::fs::write(&path, "Company Name ,Symbol\nAcme,ACM\n").unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.columns(), &["Company Name ", "Symbol"]);
        assert_eq!(loaded.get(0, COMPANY_NAME), Some(&Cell::text("Acme")));

        let out = dir.path().join("out.csv");
        save(&loaded, &out).unwrap();
        assert_eq!(load(&out).unwrap().columns(), &["Company Name ", "Symbol"]);
    }

    #[test]
    fn xlsx_write_to_missing_directory_is_io_error() {
        let err = save(&table(), Path::new("/nonexistent/dir/out.xlsx")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }
}
