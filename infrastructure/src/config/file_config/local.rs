//! Local tier configuration from TOML (`[local]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cache directory name, relative to the platform cache dir
const CACHE_DIR_NAME: &str = "consilium";

/// Local tier settings
///
/// ```toml
/// [local]
/// offline_mode = false
/// cache_dir = "./edge_cache"
/// ```
///
/// The local model itself is selected in `[models] local`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLocalConfig {
    pub offline_mode: bool,
    /// Directory for queued results (defaults to the platform cache dir)
    pub cache_dir: Option<String>,
}

impl FileLocalConfig {
    /// Resolve the sync queue directory.
    pub fn cache_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::cache_dir()
                .map(|d| d.join(CACHE_DIR_NAME).join("sync"))
                .unwrap_or_else(|| PathBuf::from(".consilium_cache")),
        }
    }
}
