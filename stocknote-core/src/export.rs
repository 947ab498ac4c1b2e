//! Export action: timestamped output file for the annotated table.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::TableError;
use crate::store;
use crate::table::Table;

/// `Updated_data_YYYYMMDDHHMMSS.xlsx`
pub fn export_filename(at: NaiveDateTime) -> String {
    format!("Updated_data_{}.xlsx", at.format("%Y%m%d%H%M%S"))
}

/// Write `table` to a new timestamped workbook under `out_dir`, creating the
/// directory if needed. Returns the path written.
pub fn export_table(table: &Table, out_dir: &Path, at: NaiveDateTime) -> Result<PathBuf, TableError> {
    std::fs::create_dir_all(out_dir).map_err(|e| TableError::io(out_dir, e))?;
    let path = out_dir.join(export_filename(at));
    store::save(table, &path)?;
    tracing::info!(path = %path.display(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn filename_embeds_compact_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 9)
            .unwrap()
            .and_hms_opt(8, 5, 3)
            .unwrap();
        assert_eq!(export_filename(at), "Updated_data_20240109080503.xlsx");
    }
}
