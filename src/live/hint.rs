use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::label::MacroLabel;

pub const PENDING_HINT_TEXT: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<MacroLabel>,
    pub hint: String,
    pub ts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_time: Option<i64>,
}

impl Hint {
    pub fn pending() -> Self {
        Self {
            label: None,
            hint: PENDING_HINT_TEXT.to_string(),
            ts: chrono::Utc::now().timestamp(),
            clock_time: None,
        }
    }

    pub fn for_label(label: MacroLabel, clock_time: Option<i64>) -> Self {
        Self {
            label: Some(label),
            hint: label.hint_text().to_string(),
            ts: chrono::Utc::now().timestamp(),
            clock_time,
        }
    }
}

impl Default for Hint {
    fn default() -> Self {
        Self::pending()
    }
}

pub type SharedHint = Arc<RwLock<Hint>>;

pub fn new_shared_hint() -> SharedHint {
    Arc::new(RwLock::new(Hint::pending()))
}

fn temporary_hint_path(hint_path: &Path) -> PathBuf {
    let mut file_name = hint_path
        .file_name()
        .map(|value| value.to_os_string())
        .unwrap_or_else(|| "hint.json".into());
    file_name.push(".tmp");
    hint_path.with_file_name(file_name)
}

// Temp file plus rename so a polling reader never sees a half-written document.
pub fn write_hint_file(hint_path: &Path, hint: &Hint) -> Result<()> {
    if let Some(parent_directory) = hint_path.parent() {
        if !parent_directory.as_os_str().is_empty() {
            std::fs::create_dir_all(parent_directory)?;
        }
    }

    let temp_path = temporary_hint_path(hint_path);
    let serialized = serde_json::to_string_pretty(hint)?;
    std::fs::write(&temp_path, serialized)?;

    if let Err(rename_error) = std::fs::rename(&temp_path, hint_path) {
        if hint_path.exists() {
            std::fs::remove_file(hint_path)?;
            std::fs::rename(&temp_path, hint_path)?;
        } else {
            let _ = std::fs::remove_file(&temp_path);
            return Err(rename_error.into());
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn read_hint_file(hint_path: &Path) -> Result<Hint> {
    let raw_json = std::fs::read_to_string(hint_path)?;
    Ok(serde_json::from_str(&raw_json)?)
}
