//! Infrastructure layer for consilium
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod extraction;
pub mod logging;
pub mod providers;
pub mod sync;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use extraction::PlainTextExtractor;
pub use logging::JsonlConversationLogger;
pub use providers::OpenAiCompatibleGateway;
pub use sync::{FileSyncStore, HttpUploader, UnconfiguredUploader};
