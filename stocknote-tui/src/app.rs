//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The edit session is the only place the table is
//! touched; this struct adds focus, overlays, and status reporting around it.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use stocknote_core::{
    export_table, AppConfig, Field, Outcome, Session, SessionError, SessionEvent,
};

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Companies,
    Form,
}

impl Pane {
    pub fn label(self) -> &'static str {
        match self {
            Pane::Companies => "Companies",
            Pane::Form => "Annotation",
        }
    }

    pub fn toggle(self) -> Pane {
        match self {
            Pane::Companies => Pane::Form,
            Pane::Form => Pane::Companies,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    File,
    Edit,
    Export,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::File => "FILE",
            ErrorCategory::Edit => "EDIT",
            ErrorCategory::Export => "SAVE",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    OpenFile,
    ErrorHistory,
}

const ERROR_HISTORY_CAP: usize = 50;

/// Top-level application state.
pub struct AppState {
    pub session: Session,
    pub running: bool,

    // Navigation
    pub active_pane: Pane,
    pub companies: Vec<String>,
    pub company_cursor: usize,
    pub field: Field,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub path_input: String,

    pub output_dir: PathBuf,
    pub last_export: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            session: Session::new(),
            running: true,
            active_pane: Pane::Companies,
            companies: Vec::new(),
            company_cursor: 0,
            field: Field::default(),
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            path_input: String::new(),
            output_dir: config.output_dir.clone(),
            last_export: None,
        }
    }

    /// Load a spreadsheet and select its first company.
    pub fn open_file(&mut self, path: &Path) {
        match self.session.open_path(path) {
            Ok(Outcome::Loaded { rows, added_columns }) => {
                self.companies = self.session.companies();
                self.company_cursor = 0;
                self.active_pane = Pane::Companies;
                if !self.companies.is_empty() {
                    self.select_at_cursor();
                }
                let backfilled = if added_columns.is_empty() {
                    String::new()
                } else {
                    format!(", {} columns backfilled", added_columns.len())
                };
                self.set_status(format!(
                    "Loaded {} ({rows} rows{backfilled})",
                    path.display()
                ));
            }
            Ok(_) => self.set_status(format!("{} already loaded", path.display())),
            Err(e) => self.push_error(
                ErrorCategory::File,
                e.to_string(),
                path.display().to_string(),
            ),
        }
    }

    /// Select the company under the cursor.
    pub fn select_at_cursor(&mut self) {
        if let Some(company) = self.companies.get(self.company_cursor).cloned() {
            self.dispatch(SessionEvent::Select(company));
        }
    }

    /// Move the cursor to `company` and select it. Returns false if unknown.
    pub fn select_company(&mut self, company: &str) -> bool {
        match self.companies.iter().position(|c| c == company) {
            Some(idx) => {
                self.company_cursor = idx;
                self.select_at_cursor();
                true
            }
            None => false,
        }
    }

    /// Apply a session event, routing rejections to the error history.
    pub fn dispatch(&mut self, event: SessionEvent) -> Option<Outcome> {
        match self.session.apply(event) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                let category = match e {
                    SessionError::Table(_) => ErrorCategory::File,
                    _ => ErrorCategory::Edit,
                };
                self.push_error(category, e.to_string(), String::new());
                None
            }
        }
    }

    /// "Update Record".
    pub fn commit(&mut self, at: NaiveDateTime) {
        if let Some(Outcome::Committed(receipt)) = self.dispatch(SessionEvent::Commit { at }) {
            tracing::debug!(company = %receipt.company, "commit acknowledged");
            self.set_status("Record updated successfully!");
        }
    }

    /// "Save to Excel".
    pub fn export(&mut self, at: NaiveDateTime) {
        let Some(table) = self.session.table() else {
            self.set_warning("Open a spreadsheet first (press o)");
            return;
        };
        match export_table(table, &self.output_dir, at) {
            Ok(path) => {
                self.set_status(format!("Data saved successfully! Written to {}", path.display()));
                self.last_export = Some(path);
            }
            Err(e) => self.push_error(
                ErrorCategory::Export,
                e.to_string(),
                self.output_dir.display().to_string(),
            ),
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        tracing::warn!(category = category.label(), %message, %context, "error reported");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// True while typed characters belong to the comment field.
    pub fn editing_comment(&self) -> bool {
        self.overlay == Overlay::None
            && self.active_pane == Pane::Form
            && self.field.is_text()
            && self.session.selected().is_some()
    }
}
