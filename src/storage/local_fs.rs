use super::*;
use std::path::PathBuf;
use tokio::fs;

pub struct LocalFileStorage {
    storage_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(storage_path: PathBuf) -> Result<Self, ApiError> {
        if !storage_path.exists() {
            std::fs::create_dir_all(&storage_path)?;
        }
        Ok(Self { storage_path })
    }
}

#[async_trait]
impl Storage for LocalFileStorage {
    async fn save(&self, file_data: FileData) -> Result<String, ApiError> {
        let stored = generated_name(file_data.filename.as_deref())?;
        fs::write(self.storage_path.join(&stored), file_data.bytes).await?;
        Ok(stored)
    }

    async fn get(&self, filename: &str) -> Result<(Vec<u8>, Option<Mime>), ApiError> {
        let path = self.storage_path.join(checked_filename(filename)?);
        let bytes = fs::read(&path).await.map_err(|_| ApiError::NotFound)?;
        Ok((bytes, mime_guess::from_path(&path).first()))
    }

    async fn list(&self) -> Result<Vec<String>, ApiError> {
        let mut entries = fs::read_dir(&self.storage_path).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        Ok(files)
    }

    async fn rename(&self, old: &str, new: &str) -> Result<(), ApiError> {
        let old_path = self.storage_path.join(checked_filename(old)?);
        let new_path = self.storage_path.join(checked_filename(new)?);

        if !fs::try_exists(&old_path).await? {
            return Err(ApiError::NotFound);
        }

        fs::rename(old_path, new_path).await?;
        Ok(())
    }

    async fn delete(&self, filename: &str) -> Result<(), ApiError> {
        let path = self.storage_path.join(checked_filename(filename)?);
        fs::remove_file(path).await.map_err(|_| ApiError::NotFound)
    }
}
