//! stocknote core: the annotation table and the edit session around it.
//!
//! - Spreadsheet load/save with export ordering (`store`)
//! - Annotation columns, choice sets, normalization (`schema`)
//! - Per-session selection state machine and commit (`session`)
//! - Form read model (`form`) and timestamped export (`export`)

pub mod cell;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod schema;
pub mod session;
pub mod store;
pub mod table;

pub use cell::{Cell, TIMESTAMP_FORMAT};
pub use config::AppConfig;
pub use error::{ConfigError, SessionError, TableError};
pub use export::{export_filename, export_table};
pub use form::{Field, FormView};
pub use schema::{Annotation, Choice, RsiBucket, SmaStatus, YesNo};
pub use session::{CommitReceipt, Outcome, Session, SessionEvent, SourceId};
pub use table::Table;
