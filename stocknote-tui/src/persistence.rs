//! App state persistence: JSON save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_file: Option<PathBuf>,
    pub last_company: Option<String>,
    pub welcome_dismissed: bool,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_file: app.session.source().map(|s| s.path.clone()),
        last_company: app.session.selected().map(str::to_string),
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Reopen the last file (unless `open_override` names another) and restore
/// the last selection when that company still exists.
pub fn apply(app: &mut AppState, state: PersistedState, open_override: Option<PathBuf>) {
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
    let reopening_last = open_override.is_none();
    let Some(path) = open_override.or(state.last_file) else {
        return;
    };
    if reopening_last && !path.exists() {
        return;
    }
    app.open_file(&path);
    if reopening_last {
        if let Some(company) = state.last_company {
            app.select_company(&company);
        }
    }
}
