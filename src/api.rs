use async_trait::async_trait;

use crate::{
    error::Result,
    types::{ApiResponse, FlatEntry, PutOptions, TypedEntry},
};

/// Remote data API backing a user's personal data directory
///
/// Listing calls fail on any unexpected status. Content calls hand the raw
/// response back so callers can apply their own success codes.
#[async_trait]
pub trait DataApi: Send + Sync {
    /// List entries directly under `directory`, paths relative to it
    async fn list_flat(&self, directory: &str) -> Result<Vec<FlatEntry>>;

    /// List entries under `path` with file/directory types, paths qualified
    async fn list_typed(&self, path: &str) -> Result<Vec<TypedEntry>>;

    /// Fetch file content (200 on success)
    async fn get(&self, path: &str) -> Result<ApiResponse>;

    /// Store file content (200 on success)
    async fn put(&self, path: &str, content: &str, options: PutOptions) -> Result<ApiResponse>;

    /// Delete a file (204 on success)
    async fn delete(&self, path: &str) -> Result<ApiResponse>;

    /// Move a file (200 on success)
    async fn move_file(&self, old_path: &str, new_path: &str) -> Result<ApiResponse>;

    /// Get a human-readable identifier for this backend (for logging/debugging)
    fn identifier(&self) -> String;
}
