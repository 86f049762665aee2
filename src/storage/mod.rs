mod in_memory;
mod local_fs;

pub use in_memory::InMemoryStorage;
pub use local_fs::LocalFileStorage;

use crate::errors::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use mime::Mime;
use uuid::Uuid;

#[derive(Debug)]
pub struct FileData {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

/// Flat-directory capability set: the filename is the identity and the
/// whole record, so every operation is keyed by it.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Stores the bytes under a generated unique name and returns it.
    async fn save(&self, file_data: FileData) -> Result<String, ApiError>;
    async fn get(&self, filename: &str) -> Result<(Vec<u8>, Option<Mime>), ApiError>;
    async fn list(&self) -> Result<Vec<String>, ApiError>;
    /// An existing file at the new name is silently overwritten.
    async fn rename(&self, old: &str, new: &str) -> Result<(), ApiError>;
    async fn delete(&self, filename: &str) -> Result<(), ApiError>;
}

/// Rejects names that would escape the upload directory.
pub fn checked_filename(name: &str) -> Result<&str, ApiError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ApiError::BadRequest("Invalid filename".to_string()));
    }
    Ok(name)
}

/// Millisecond-epoch prefix keeps repeated uploads of the same file from
/// colliding with each other or with the original name.
fn generated_name(original: Option<&str>) -> Result<String, ApiError> {
    let stem = match original {
        Some(name) => checked_filename(name)?.to_string(),
        None => Uuid::new_v4().to_string(),
    };
    Ok(format!("{}-{}", Utc::now().timestamp_millis(), stem))
}
