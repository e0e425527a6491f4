use std::sync::Arc;

use async_trait::async_trait;

use crate::features::photos::{content_type_for, PhotoError, PhotoStore};
use crate::modules::storage::MinIOClient;

/// Uploads photos to the public prefix of a MinIO bucket; the reference is the public URL
pub struct MinioPhotoStore {
    client: Arc<MinIOClient>,
}

impl MinioPhotoStore {
    pub fn new(client: Arc<MinIOClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PhotoStore for MinioPhotoStore {
    async fn store(&self, data: &[u8], file_name: &str) -> Result<String, PhotoError> {
        let extension = file_name.rsplit('.').next().unwrap_or_default();
        let key = self.client.public_key(file_name);

        self.client
            .upload(&key, data, content_type_for(extension))
            .await
            .map_err(|e| PhotoError::Upload(e.to_string()))?;

        Ok(self.client.public_url(&key))
    }

    async fn delete(&self, reference: &str) -> bool {
        let Some(key) = self.client.key_from_url(reference) else {
            tracing::warn!("Photo reference is not in bucket {}", self.client.bucket_name());
            return false;
        };

        self.delete_key(&key).await
    }

    async fn discard(&self, file_name: &str) -> bool {
        self.delete_key(&self.client.public_key(file_name)).await
    }
}

impl MinioPhotoStore {
    async fn delete_key(&self, key: &str) -> bool {
        match self.client.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to delete photo {}: {}", key, e);
                false
            }
        }
    }
}
