//! Annotation schema: column names, closed choice sets, and normalization.

use crate::cell::Cell;
use crate::error::TableError;
use crate::table::Table;

pub const COMPANY_NAME: &str = "Company Name";
pub const SYMBOL: &str = "Symbol";
pub const DAILY_CORRECTION: &str = "Daily Correction";
pub const SMA_STATUS: &str = "55 SMA Status";
pub const RSI: &str = "RSI";
pub const UPDATE_DATE: &str = "Update Date";
pub const LOT_SIZE: &str = "Lot Size";
pub const TRADEABLE: &str = "Tradeable";
pub const COMMENT: &str = "Comment";

/// Shown in place of a lot size for instruments outside the F&O segment.
pub const LOT_SIZE_UNAVAILABLE: &str = "Not available for Futures and Options trading";

/// A closed set of labelled options for one form field.
pub trait Choice: Copy + Eq + Sized + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl Choice for YesNo {
    const ALL: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmaStatus {
    Below,
    #[default]
    On,
    Above,
}

impl Choice for SmaStatus {
    const ALL: &'static [Self] = &[SmaStatus::Below, SmaStatus::On, SmaStatus::Above];

    fn label(self) -> &'static str {
        match self {
            SmaStatus::Below => "Below 55 SMA",
            SmaStatus::On => "On 55 SMA",
            SmaStatus::Above => "Above 55 SMA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RsiBucket {
    #[default]
    Below60,
    Above60,
}

impl Choice for RsiBucket {
    const ALL: &'static [Self] = &[RsiBucket::Below60, RsiBucket::Above60];

    fn label(self) -> &'static str {
        match self {
            RsiBucket::Below60 => "Below 60",
            RsiBucket::Above60 => "Above 60",
        }
    }
}

/// Annotation columns in the order they are appended, with their defaults.
pub fn annotation_defaults() -> [(&'static str, Cell); 7] {
    [
        (DAILY_CORRECTION, Cell::text(YesNo::No.label())),
        (SMA_STATUS, Cell::text(SmaStatus::On.label())),
        (RSI, Cell::text(RsiBucket::Below60.label())),
        (UPDATE_DATE, Cell::Empty),
        (LOT_SIZE, Cell::Empty),
        (TRADEABLE, Cell::text(YesNo::No.label())),
        (COMMENT, Cell::text("")),
    ]
}

/// Add every missing annotation column with its default. Existing columns
/// and values are left alone, so a second call changes nothing.
pub fn normalize(table: &mut Table) -> Vec<&'static str> {
    let mut added = Vec::new();
    for (name, default) in annotation_defaults() {
        if table.add_column(name, default) {
            added.push(name);
        }
    }
    if !added.is_empty() {
        tracing::debug!(columns = ?added, "backfilled annotation columns");
    }
    added
}

/// `Company Name` and `Symbol` must exist for selection and display.
pub fn require_identity_columns(table: &Table) -> Result<(), TableError> {
    for name in [COMPANY_NAME, SYMBOL] {
        if !table.has_column(name) {
            return Err(TableError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// The five user-editable annotation values of one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
    pub daily_correction: YesNo,
    pub sma_status: SmaStatus,
    pub rsi: RsiBucket,
    pub tradeable: YesNo,
    pub comment: String,
}

impl Annotation {
    /// Read the row's current values; unrecognized or empty cells fall back
    /// to the field default.
    pub fn from_row(table: &Table, row: usize) -> Self {
        fn choice<C: Choice + Default>(table: &Table, row: usize, column: &str) -> C {
            table
                .get(row, column)
                .and_then(|c| C::from_label(&c.to_string()))
                .unwrap_or_default()
        }

        Self {
            daily_correction: choice(table, row, DAILY_CORRECTION),
            sma_status: choice(table, row, SMA_STATUS),
            rsi: choice(table, row, RSI),
            tradeable: choice(table, row, TRADEABLE),
            comment: table.get(row, COMMENT).map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    /// Write the five values into `row`, adding any missing column first.
    pub fn write_to_row(&self, table: &mut Table, row: usize) {
        let values = [
            (DAILY_CORRECTION, Cell::text(self.daily_correction.label())),
            (SMA_STATUS, Cell::text(self.sma_status.label())),
            (RSI, Cell::text(self.rsi.label())),
            (TRADEABLE, Cell::text(self.tradeable.label())),
            (COMMENT, Cell::text(self.comment.clone())),
        ];
        for (column, value) in values {
            if !table.has_column(column) {
                table.add_column(column, Cell::Empty);
            }
            table.set(row, column, value);
        }
    }
}

/// "Lot Size: N" when the cell holds a number, otherwise the F&O notice.
pub fn lot_size_display(cell: Option<&Cell>) -> String {
    match cell.filter(|c| !c.is_empty()).and_then(Cell::as_integer) {
        Some(n) => format!("Lot Size: {n}"),
        None => LOT_SIZE_UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> Table {
        Table::new(
            vec![COMPANY_NAME.into(), SYMBOL.into()],
            vec![
                vec![Cell::text("Acme"), Cell::text("ACM")],
                vec![Cell::text("zeta"), Cell::text("ZTA")],
            ],
        )
    }

    #[test]
    fn normalize_adds_all_seven_in_order() {
        let mut t = bare();
        let added = normalize(&mut t);
        assert_eq!(
            added,
            vec![DAILY_CORRECTION, SMA_STATUS, RSI, UPDATE_DATE, LOT_SIZE, TRADEABLE, COMMENT]
        );
        assert_eq!(t.columns().len(), 9);
        assert_eq!(t.get(0, DAILY_CORRECTION), Some(&Cell::text("No")));
        assert_eq!(t.get(1, SMA_STATUS), Some(&Cell::text("On 55 SMA")));
        assert_eq!(t.get(1, RSI), Some(&Cell::text("Below 60")));
        assert_eq!(t.get(0, TRADEABLE), Some(&Cell::text("No")));
        assert_eq!(t.get(0, COMMENT), Some(&Cell::text("")));
        assert_eq!(t.get(0, UPDATE_DATE), Some(&Cell::Empty));
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut once = bare();
        normalize(&mut once);
        let mut twice = once.clone();
        assert!(normalize(&mut twice).is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_preserves_existing_values() {
        let mut t = bare();
        t.add_column(TRADEABLE, Cell::text("Yes"));
        t.add_column(LOT_SIZE, Cell::Int(250));
        let added = normalize(&mut t);
        assert!(!added.contains(&TRADEABLE));
        assert!(!added.contains(&LOT_SIZE));
        assert_eq!(t.get(1, TRADEABLE), Some(&Cell::text("Yes")));
        assert_eq!(t.get(1, LOT_SIZE), Some(&Cell::Int(250)));
    }

    #[test]
    fn identity_columns_are_required() {
        let t = Table::new(vec![COMPANY_NAME.into()], vec![]);
        match require_identity_columns(&t) {
            Err(TableError::MissingColumn(name)) => assert_eq!(name, SYMBOL),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
        assert!(require_identity_columns(&bare()).is_ok());
    }

    #[test]
    fn choice_cycles_wrap() {
        assert_eq!(SmaStatus::Above.next(), SmaStatus::Below);
        assert_eq!(SmaStatus::Below.prev(), SmaStatus::Above);
        assert_eq!(YesNo::No.next(), YesNo::Yes);
        assert_eq!(RsiBucket::from_label(" Above 60 "), Some(RsiBucket::Above60));
        assert_eq!(RsiBucket::from_label("above 60"), None);
    }

    #[test]
    fn annotation_reads_defaults_for_unknown_labels() {
        let mut t = bare();
        normalize(&mut t);
        t.set(0, SMA_STATUS, Cell::text("sideways"));
        t.set(0, RSI, Cell::text("Above 60"));
        let a = Annotation::from_row(&t, 0);
        assert_eq!(a.sma_status, SmaStatus::On);
        assert_eq!(a.rsi, RsiBucket::Above60);
    }

    #[test]
    fn lot_size_display_variants() {
        assert_eq!(lot_size_display(Some(&Cell::Int(100))), "Lot Size: 100");
        assert_eq!(lot_size_display(Some(&Cell::Float(75.0))), "Lot Size: 75");
        assert_eq!(lot_size_display(Some(&Cell::text(""))), LOT_SIZE_UNAVAILABLE);
        assert_eq!(lot_size_display(Some(&Cell::Empty)), LOT_SIZE_UNAVAILABLE);
        assert_eq!(lot_size_display(None), LOT_SIZE_UNAVAILABLE);
    }
}
