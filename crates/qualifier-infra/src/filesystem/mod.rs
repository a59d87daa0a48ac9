//! Filesystem adapter.
//!
//! Implements the `FileSystem` trait from `qualifier-core` for real disk I/O.

use std::path::Path;

use qualifier_core::service::fs::FileSystem;

/// Local filesystem implementation of the `FileSystem` trait.
///
/// All operations go through `tokio::fs` for async I/O.
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFileSystem {
    async fn write_file(&self, path: &Path, content: &str) -> Result<(), std::io::Error> {
        // Creates or truncates; a missing parent directory is an error.
        tokio::fs::write(path, content).await
    }

    async fn read_file(&self, path: &Path) -> Result<String, std::io::Error> {
        tokio::fs::read_to_string(path).await
    }
}
