//! Edit session: the one state machine in the program.
//!
//! A `Session` is owned by the front-end and fed one `SessionEvent` at a
//! time. Each call to [`Session::apply`] is a single transition; a rejected
//! event leaves the session exactly as it was.
//!
//! Selection rule: selecting a company different from the last-selected one
//! clears the draft comment and re-reads the choice fields from that row.
//! Re-selecting the same company keeps whatever the user has typed so far.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDateTime;

use crate::cell::{Cell, TIMESTAMP_FORMAT};
use crate::error::{SessionError, TableError};
use crate::schema::{self, Annotation, RsiBucket, SmaStatus, YesNo, COMPANY_NAME, UPDATE_DATE};
use crate::store;
use crate::table::Table;

/// Identity of a loaded file. Two loads with equal ids are the same upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceId {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceId {
    pub fn of(path: &Path) -> Result<Self, TableError> {
        let meta = std::fs::metadata(path).map_err(|e| TableError::parse(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Load { source: SourceId, table: Table },
    Select(String),
    SetCorrection(YesNo),
    SetSmaStatus(SmaStatus),
    SetRsi(RsiBucket),
    SetTradeable(YesNo),
    EditComment(String),
    Commit { at: NaiveDateTime },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub company: String,
    pub row: usize,
    pub stamped: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new table replaced the previous one.
    Loaded { rows: usize, added_columns: Vec<&'static str> },
    /// Same source as the current table; in-memory edits kept.
    Reused,
    Selected { company: String, draft_reset: bool },
    Edited,
    Committed(CommitReceipt),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    table: Option<Table>,
    source: Option<SourceId>,
    selected: Option<String>,
    last_selected: Option<String>,
    /// Live form values. `form.comment` is the draft comment.
    form: Annotation,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn source(&self) -> Option<&SourceId> {
        self.source.as_ref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn form(&self) -> &Annotation {
        &self.form
    }

    pub fn draft_comment(&self) -> &str {
        &self.form.comment
    }

    /// Companies offered for selection, sorted case-insensitively.
    pub fn companies(&self) -> Vec<String> {
        self.table
            .as_ref()
            .map(|t| t.distinct_sorted(COMPANY_NAME))
            .unwrap_or_default()
    }

    /// Row index of the current selection.
    pub fn selected_row(&self) -> Option<usize> {
        let table = self.table.as_ref()?;
        table.find_row(COMPANY_NAME, self.selected.as_deref()?)
    }

    /// Load `path` unless it is the file already loaded and unchanged.
    pub fn open_path(&mut self, path: &Path) -> Result<Outcome, SessionError> {
        let source = SourceId::of(path)?;
        if self.source.as_ref() == Some(&source) {
            tracing::debug!(path = %path.display(), "source unchanged, keeping table");
            return Ok(Outcome::Reused);
        }
        let table = store::load(path)?;
        self.apply(SessionEvent::Load { source, table })
    }

    /// Apply one event. On error nothing is modified.
    pub fn apply(&mut self, event: SessionEvent) -> Result<Outcome, SessionError> {
        let result = match event {
            SessionEvent::Load { source, table } => self.load(source, table),
            SessionEvent::Select(company) => self.select(company),
            SessionEvent::SetCorrection(v) => self.edit(|f| f.daily_correction = v),
            SessionEvent::SetSmaStatus(v) => self.edit(|f| f.sma_status = v),
            SessionEvent::SetRsi(v) => self.edit(|f| f.rsi = v),
            SessionEvent::SetTradeable(v) => self.edit(|f| f.tradeable = v),
            SessionEvent::EditComment(text) => self.edit(|f| f.comment = text),
            SessionEvent::Commit { at } => self.commit(at),
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "session event rejected");
        }
        result
    }

    fn load(&mut self, source: SourceId, mut table: Table) -> Result<Outcome, SessionError> {
        if self.source.as_ref() == Some(&source) {
            return Ok(Outcome::Reused);
        }
        schema::require_identity_columns(&table)?;
        let added_columns = schema::normalize(&mut table);
        let rows = table.len();

        self.table = Some(table);
        self.source = Some(source);
        self.selected = None;
        self.last_selected = None;
        self.form = Annotation::default();
        Ok(Outcome::Loaded { rows, added_columns })
    }

    fn select(&mut self, company: String) -> Result<Outcome, SessionError> {
        let table = self.table.as_ref().ok_or(SessionError::NoTable)?;
        let row = table
            .find_row(COMPANY_NAME, &company)
            .ok_or_else(|| SessionError::UnknownCompany(company.clone()))?;

        let draft_reset = self.last_selected.as_deref() != Some(company.as_str());
        if draft_reset {
            self.form = Annotation {
                comment: String::new(),
                ..Annotation::from_row(table, row)
            };
            self.last_selected = Some(company.clone());
        }
        self.selected = Some(company.clone());
        tracing::debug!(%company, draft_reset, "company selected");
        Ok(Outcome::Selected { company, draft_reset })
    }

    fn edit(&mut self, change: impl FnOnce(&mut Annotation)) -> Result<Outcome, SessionError> {
        if self.table.is_none() {
            return Err(SessionError::NoTable);
        }
        if self.selected.is_none() {
            return Err(SessionError::NoSelection);
        }
        change(&mut self.form);
        Ok(Outcome::Edited)
    }

    fn commit(&mut self, at: NaiveDateTime) -> Result<Outcome, SessionError> {
        let company = self.selected.clone().ok_or(SessionError::NoSelection)?;
        let table = self.table.as_mut().ok_or(SessionError::NoTable)?;
        let row = table
            .find_row(COMPANY_NAME, &company)
            .ok_or_else(|| SessionError::UnknownCompany(company.clone()))?;

        self.form.write_to_row(table, row);
        let stamped = at.format(TIMESTAMP_FORMAT).to_string();
        if !table.has_column(UPDATE_DATE) {
            table.add_column(UPDATE_DATE, Cell::Empty);
        }
        table.set(row, UPDATE_DATE, Cell::text(stamped.clone()));

        tracing::info!(%company, row, %stamped, "record updated");
        Ok(Outcome::Committed(CommitReceipt { company, row, stamped }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Choice, COMMENT, LOT_SIZE, SYMBOL, TRADEABLE};
    use chrono::NaiveDate;

    fn source(name: &str) -> SourceId {
        SourceId {
            path: PathBuf::from(name),
            len: 1,
            modified: None,
        }
    }

    fn bare_table() -> Table {
        Table::new(
            vec![COMPANY_NAME.into(), SYMBOL.into(), LOT_SIZE.into()],
            vec![
                vec![Cell::text("Acme"), Cell::text("ACM"), Cell::Int(100)],
                vec![Cell::text("zeta"), Cell::text("ZTA"), Cell::Empty],
            ],
        )
    }

    fn loaded() -> Session {
        let mut s = Session::new();
        s.apply(SessionEvent::Load {
            source: source("a.xlsx"),
            table: bare_table(),
        })
        .unwrap();
        s
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap()
    }

    #[test]
    fn load_normalizes_and_starts_unselected() {
        let s = loaded();
        assert!(s.selected().is_none());
        let t = s.table().unwrap();
        assert_eq!(t.get(0, TRADEABLE), Some(&Cell::text("No")));
        assert_eq!(s.companies(), vec!["Acme", "zeta"]);
    }

    #[test]
    fn load_rejects_missing_symbol_and_keeps_state() {
        let mut s = loaded();
        let table = Table::new(vec![COMPANY_NAME.into()], vec![vec![Cell::text("X")]]);
        let err = s
            .apply(SessionEvent::Load { source: source("b.xlsx"), table })
            .unwrap_err();
        assert!(matches!(err, SessionError::Table(TableError::MissingColumn(_))));
        assert_eq!(s.source(), Some(&source("a.xlsx")));
    }

    #[test]
    fn same_source_reuses_table() {
        let mut s = loaded();
        s.apply(SessionEvent::Select("zeta".into())).unwrap();
        s.apply(SessionEvent::Commit { at: at() }).unwrap();
        let outcome = s
            .apply(SessionEvent::Load { source: source("a.xlsx"), table: bare_table() })
            .unwrap();
        assert_eq!(outcome, Outcome::Reused);
        assert!(!s.table().unwrap().get(1, UPDATE_DATE).unwrap().is_empty());
    }

    #[test]
    fn changing_company_resets_draft_comment() {
        let mut s = loaded();
        s.apply(SessionEvent::Select("Acme".into())).unwrap();
        s.apply(SessionEvent::EditComment("breakout soon".into())).unwrap();
        assert_eq!(s.draft_comment(), "breakout soon");

        let outcome = s.apply(SessionEvent::Select("zeta".into())).unwrap();
        assert_eq!(
            outcome,
            Outcome::Selected { company: "zeta".into(), draft_reset: true }
        );
        assert_eq!(s.draft_comment(), "");
    }

    #[test]
    fn reselecting_same_company_keeps_draft() {
        let mut s = loaded();
        s.apply(SessionEvent::Select("Acme".into())).unwrap();
        s.apply(SessionEvent::EditComment("hold".into())).unwrap();
        s.apply(SessionEvent::SetTradeable(YesNo::Yes)).unwrap();
        let outcome = s.apply(SessionEvent::Select("Acme".into())).unwrap();
        assert!(matches!(outcome, Outcome::Selected { draft_reset: false, .. }));
        assert_eq!(s.draft_comment(), "hold");
        assert_eq!(s.form().tradeable, YesNo::Yes);
    }

    #[test]
    fn selection_prepopulates_choices_but_not_comment() {
        let mut s = loaded();
        s.apply(SessionEvent::Select("zeta".into())).unwrap();
        s.apply(SessionEvent::SetRsi(RsiBucket::Above60)).unwrap();
        s.apply(SessionEvent::EditComment("watch".into())).unwrap();
        s.apply(SessionEvent::Commit { at: at() }).unwrap();

        s.apply(SessionEvent::Select("Acme".into())).unwrap();
        s.apply(SessionEvent::Select("zeta".into())).unwrap();
        assert_eq!(s.form().rsi, RsiBucket::Above60);
        assert_eq!(s.draft_comment(), "");
    }

    #[test]
    fn commit_touches_only_selected_row() {
        let mut s = loaded();
        let before = s.table().unwrap().clone();
        s.apply(SessionEvent::Select("zeta".into())).unwrap();
        s.apply(SessionEvent::SetTradeable(YesNo::Yes)).unwrap();
        s.apply(SessionEvent::EditComment("watch".into())).unwrap();
        let outcome = s.apply(SessionEvent::Commit { at: at() }).unwrap();

        assert_eq!(
            outcome,
            Outcome::Committed(CommitReceipt {
                company: "zeta".into(),
                row: 1,
                stamped: "2024-05-06 14:30:05".into(),
            })
        );
        let after = s.table().unwrap();
        assert_eq!(after.row(0), before.row(0));
        assert_eq!(after.get(1, TRADEABLE), Some(&Cell::text(YesNo::Yes.label())));
        assert_eq!(after.get(1, COMMENT), Some(&Cell::text("watch")));
        assert_eq!(after.get(1, UPDATE_DATE), Some(&Cell::text("2024-05-06 14:30:05")));
        assert_eq!(after.get(1, SYMBOL), before.get(1, SYMBOL));
        assert_eq!(after.get(1, LOT_SIZE), before.get(1, LOT_SIZE));
    }

    #[test]
    fn events_without_selection_are_rejected() {
        let mut s = Session::new();
        assert!(matches!(
            s.apply(SessionEvent::Select("Acme".into())),
            Err(SessionError::NoTable)
        ));
        let mut s = loaded();
        assert!(matches!(
            s.apply(SessionEvent::Commit { at: at() }),
            Err(SessionError::NoSelection)
        ));
        assert!(matches!(
            s.apply(SessionEvent::EditComment("x".into())),
            Err(SessionError::NoSelection)
        ));
        assert!(matches!(
            s.apply(SessionEvent::Select("Nope".into())),
            Err(SessionError::UnknownCompany(_))
        ));
        assert!(s.selected().is_none());
    }
}
