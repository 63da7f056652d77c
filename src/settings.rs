use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AegisError, Result};
use crate::live::death_tracker::DEFAULT_DEATH_BUFFER_CAPACITY;
use crate::live::extract::DEFAULT_RECENT_WINDOW_SECONDS;
use crate::offline::sequencer::DEFAULT_STEP_SECONDS;
use crate::Side;

pub const DEFAULT_MODEL_URL: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_TICK_MS: u64 = 500;
pub const DEFAULT_HINT_PATH: &str = "hint.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub live: LiveSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub raw_dir: PathBuf,
    pub out: PathBuf,
    pub step_seconds: u32,
    pub workers: usize,
    pub own_side: Side,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            out: PathBuf::from("data/snapshots/dataset_v3.csv"),
            step_seconds: DEFAULT_STEP_SECONDS,
            workers: 1,
            own_side: Side::Radiant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSettings {
    pub watch_dir: PathBuf,
    pub tick_ms: u64,
    pub recent_window_seconds: f64,
    pub death_buffer_capacity: usize,
    pub use_model: bool,
    pub model_url: String,
    pub model_timeout_ms: u64,
    pub write_hint_file: bool,
    pub hint_path: PathBuf,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("gsi_logs"),
            tick_ms: DEFAULT_TICK_MS,
            recent_window_seconds: DEFAULT_RECENT_WINDOW_SECONDS,
            death_buffer_capacity: DEFAULT_DEATH_BUFFER_CAPACITY,
            use_model: true,
            model_url: DEFAULT_MODEL_URL.to_string(),
            model_timeout_ms: DEFAULT_MODEL_TIMEOUT_MS,
            write_hint_file: true,
            hint_path: PathBuf::from(DEFAULT_HINT_PATH),
        }
    }
}

impl LiveSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_millis(self.model_timeout_ms)
    }

    pub fn model_endpoint(&self) -> Option<&str> {
        let url = self.model_url.trim();
        (self.use_model && !url.is_empty()).then_some(url)
    }

    pub fn hint_file(&self) -> Option<&Path> {
        (self.write_hint_file && !self.hint_path.as_os_str().is_empty())
            .then_some(self.hint_path.as_path())
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|error| {
            AegisError::Config(format!(
                "Failed to read config file '{}': {error}",
                path.display()
            ))
        })?;
        toml::from_str(&content)
            .map_err(|error| AegisError::Config(format!("Failed to parse config: {error}")))
    }

    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(config = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|error| AegisError::Config(format!("Failed to serialize config: {error}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
