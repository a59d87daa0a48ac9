//! FileSystem trait for abstracting file I/O.
//!
//! The flow reads the selected artifact and writes the output file through
//! this trait. The `LocalFileSystem` adapter lives in qualifier-infra.

use std::path::Path;

/// Abstraction over the two filesystem operations the flow performs.
pub trait FileSystem: Send + Sync {
    /// Write string content to a file, truncating any existing content.
    ///
    /// Implementations must not create missing parent directories.
    fn write_file(
        &self,
        path: &Path,
        content: &str,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Read a file's content as a string.
    fn read_file(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<String, std::io::Error>> + Send;
}
