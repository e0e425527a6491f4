//! Object storage for report photos
//!
//! MinIO/S3-compatible client. Photos live under a public-read prefix so the
//! stored reference is a plain URL.

mod minio_client;
mod sigv4;

pub use minio_client::{MinIOClient, StorageClientError};
