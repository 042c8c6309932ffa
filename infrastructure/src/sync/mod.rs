//! Sync queue adapters: file-backed [`SyncStore`] and HTTP [`RemoteUploader`].
//!
//! [`SyncStore`]: consilium_application::SyncStore
//! [`RemoteUploader`]: consilium_application::RemoteUploader

mod file_store;
mod http_uploader;

pub use file_store::FileSyncStore;
pub use http_uploader::{HttpUploader, UnconfiguredUploader};
