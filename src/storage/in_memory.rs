use super::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save(&self, file_data: FileData) -> Result<String, ApiError> {
        let stored = generated_name(file_data.filename.as_deref())?;
        self.files
            .write()
            .await
            .insert(stored.clone(), file_data.bytes);
        Ok(stored)
    }

    async fn get(&self, filename: &str) -> Result<(Vec<u8>, Option<Mime>), ApiError> {
        self.files
            .read()
            .await
            .get(filename)
            .map(|bytes| (bytes.clone(), mime_guess::from_path(filename).first()))
            .ok_or(ApiError::NotFound)
    }

    async fn list(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.files.read().await.keys().cloned().collect())
    }

    async fn rename(&self, old: &str, new: &str) -> Result<(), ApiError> {
        checked_filename(new)?;
        let mut files = self.files.write().await;
        let bytes = files.remove(old).ok_or(ApiError::NotFound)?;
        files.insert(new.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, filename: &str) -> Result<(), ApiError> {
        self.files
            .write()
            .await
            .remove(filename)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }
}
