//! Photo storage collaborators for report attachments

mod inline_photo_store;
mod minio_photo_store;

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::constants::ALLOWED_PHOTO_EXTENSIONS;

pub use inline_photo_store::InlinePhotoStore;
pub use minio_photo_store::MinioPhotoStore;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Photo upload failed: {0}")]
    Upload(String),
}

/// Raw photo attached to a submission
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    /// Client-side file name, used only for its extension
    pub original_name: String,
    pub data: Vec<u8>,
}

impl PhotoUpload {
    /// Lowercased extension, if any
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.original_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

pub fn is_allowed_extension(extension: &str) -> bool {
    ALLOWED_PHOTO_EXTENSIONS.contains(&extension)
}

pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Stores photo bytes and hands back an opaque reference.
///
/// The reference is persisted with the report and passed back verbatim to
/// `delete`; the pipeline never interprets it.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// `file_name` is the final storage name (`{uuid}.{ext}`)
    async fn store(&self, data: &[u8], file_name: &str) -> Result<String, PhotoError>;

    /// Returns whether the photo is gone. Never fails loudly.
    async fn delete(&self, reference: &str) -> bool;

    /// Remove whatever an abandoned `store` of `file_name` may have left
    /// behind, e.g. an object that landed after the upload timed out
    async fn discard(&self, _file_name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> PhotoUpload {
        PhotoUpload {
            original_name: name.to_string(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(upload("Banjir.JPG").extension().as_deref(), Some("jpg"));
        assert_eq!(upload("a.b.png").extension().as_deref(), Some("png"));
    }

    #[test]
    fn test_missing_extension() {
        assert_eq!(upload("photo").extension(), None);
        assert_eq!(upload(".jpg").extension(), None);
        assert_eq!(upload("photo.").extension(), None);
    }

    #[test]
    fn test_allowed_extensions() {
        for ext in ["jpg", "jpeg", "png", "gif"] {
            assert!(is_allowed_extension(ext));
        }
        assert!(!is_allowed_extension("bmp"));
        assert!(!is_allowed_extension("exe"));
        assert_eq!(content_type_for("jpeg"), "image/jpeg");
    }
}
