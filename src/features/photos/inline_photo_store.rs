use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::features::photos::{content_type_for, PhotoError, PhotoStore};

/// Keeps the photo inside the report as a base64 `data:` URI
#[derive(Debug, Clone, Copy, Default)]
pub struct InlinePhotoStore;

#[async_trait]
impl PhotoStore for InlinePhotoStore {
    async fn store(&self, data: &[u8], file_name: &str) -> Result<String, PhotoError> {
        let extension = file_name.rsplit('.').next().unwrap_or_default();
        Ok(format!(
            "data:{};base64,{}",
            content_type_for(extension),
            STANDARD.encode(data)
        ))
    }

    /// Inline data disappears with the report; nothing to clean up
    async fn delete(&self, _reference: &str) -> bool {
        true
    }
}
