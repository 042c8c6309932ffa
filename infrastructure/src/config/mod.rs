//! Configuration file loading for consilium
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `CONSILIUM_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./consilium.toml` or `./.consilium.toml`
//! 4. Global: `$XDG_CONFIG_HOME/consilium/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDiagnosisConfig, FileExecutionConfig,
    FileLocalConfig, FileLoggingConfig, FileModelsConfig, FileOutputConfig,
    FileProviderConfig, FileRoutingConfig, FileSyncConfig,
};
pub use loader::ConfigLoader;
