// ⚙️ Configuration - Settings as data
// JSON file, every field defaulted; CLI flags override on top

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Nested [indicator][score_type][gender][age_range] -> identifier file
    pub catalog_path: PathBuf,

    /// Base directory for relative (local) dataset identifiers
    pub data_dir: Option<PathBuf>,

    /// Where downloaded reference files are kept
    pub cache_dir: PathBuf,

    /// Serve reference files from the cache when present
    pub use_cache: bool,

    /// Where the growth history CSV is written
    pub export_dir: PathBuf,

    /// Rows shown in the reference preview
    pub preview_window: usize,

    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            catalog_path: PathBuf::from("who_links.json"),
            data_dir: None,
            cache_dir: PathBuf::from("temp"),
            use_cache: false,
            export_dir: PathBuf::from("."),
            preview_window: crate::window::DEFAULT_WINDOW,
            http_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }
}
