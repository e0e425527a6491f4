use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::core::config::PhotoConfig;
use crate::core::error::AppError;
use crate::features::flood_reports::models::{FloodDepth, FloodReport, NewFloodReport};
use crate::features::flood_reports::stores::{ReportStore, StorageError};
use crate::features::mirror::ReportMirror;
use crate::features::photos::{is_allowed_extension, PhotoStore, PhotoUpload};
use crate::features::rate_limits::QuotaService;
use crate::shared::retry::with_retry;
use crate::shared::validation::is_valid_phone;

const MAX_ADDRESS_LENGTH: usize = 500;
const MAX_NAME_LENGTH: usize = 100;

type LockMap = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// Raw submission as entered on the form
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    pub address: String,
    /// Form value: depth label or code
    pub severity: String,
    pub reporter_name: String,
    pub reporter_contact: Option<String>,
    pub photo: Option<PhotoUpload>,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Invalid submission: {}", .fields.join("; "))]
    Validation { fields: Vec<String> },

    #[error("Daily limit of {limit} reports reached")]
    QuotaExceeded { limit: i64 },

    #[error("Unsupported photo type: {extension}")]
    UnsupportedMedia { extension: String },

    #[error("Photo of {size} bytes exceeds {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Photo storage failed: {0}")]
    PhotoStorage(String),
}

impl SubmissionError {
    /// Message shown to the reporter
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Validation { fields } => {
                format!("Data laporan tidak valid: {}", fields.join(", "))
            }
            SubmissionError::QuotaExceeded { limit } => format!(
                "Anda telah mencapai batas maksimal {} laporan per hari.",
                limit
            ),
            SubmissionError::UnsupportedMedia { extension } => format!(
                "Format foto '{}' tidak didukung. Gunakan JPG, JPEG, PNG, atau GIF.",
                extension
            ),
            SubmissionError::PayloadTooLarge { max, .. } => {
                format!("Ukuran foto melebihi batas {}.", format_size(*max))
            }
            SubmissionError::Storage(_) => "Gagal menyimpan laporan, silakan coba lagi".to_string(),
            SubmissionError::PhotoStorage(_) => {
                "Gagal mengunggah foto, silakan coba lagi".to_string()
            }
        }
    }
}

/// `5 MB`, `1.5 MB`, `512 KB`
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        if bytes % MB == 0 {
            format!("{} MB", bytes / MB)
        } else {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        }
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} byte", bytes)
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        let message = err.user_message();
        match err {
            SubmissionError::Validation { fields } => AppError::Validation(fields),
            SubmissionError::QuotaExceeded { .. } => AppError::RateLimitExceeded(message),
            SubmissionError::UnsupportedMedia { .. } => AppError::UnsupportedMedia(message),
            SubmissionError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(message),
            SubmissionError::Storage(e) => AppError::Storage(e.to_string()),
            SubmissionError::PhotoStorage(e) => {
                tracing::error!("Photo storage failed: {}", e);
                AppError::ServiceUnavailable(message)
            }
        }
    }
}

/// What happened to the secondary copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    Mirrored,
    Failed,
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub report: FloodReport,
    pub mirror: MirrorOutcome,
}

impl SubmissionOutcome {
    /// Full and partial success differ only informationally
    pub fn message(&self) -> &'static str {
        match self.mirror {
            MirrorOutcome::Mirrored | MirrorOutcome::Disabled => {
                "Laporan berhasil dikirim. Terima kasih!"
            }
            MirrorOutcome::Failed => {
                "Laporan berhasil disimpan. Salinan cadangan belum tercatat, tim kami akan menindaklanjuti."
            }
        }
    }
}

/// Validated, normalised fields
struct ValidSubmission {
    address: String,
    severity: FloodDepth,
    reporter_name: String,
    reporter_contact: Option<String>,
    photo: Option<PhotoUpload>,
}

/// Report submission pipeline:
/// validate, check quota, store photo, write primary, mirror.
///
/// Quota check, photo and primary write run under a per-submitter lock so two
/// concurrent submissions from one submitter cannot both pass the quota.
pub struct SubmissionService {
    store: Arc<dyn ReportStore>,
    quota: Arc<QuotaService>,
    photos: Option<Arc<dyn PhotoStore>>,
    mirror: Arc<dyn ReportMirror>,
    locks: LockMap,
    max_photo_size: usize,
    upload_retries: u32,
    upload_timeout: Duration,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        quota: Arc<QuotaService>,
        photos: Option<Arc<dyn PhotoStore>>,
        mirror: Arc<dyn ReportMirror>,
    ) -> Self {
        let defaults = PhotoConfig::default();
        Self {
            store,
            quota,
            photos,
            mirror,
            locks: Mutex::new(HashMap::new()),
            max_photo_size: defaults.max_photo_size,
            upload_retries: defaults.upload_retries,
            upload_timeout: defaults.upload_timeout,
        }
    }

    pub fn with_photo_config(mut self, config: &PhotoConfig) -> Self {
        self.max_photo_size = config.max_photo_size;
        self.upload_retries = config.upload_retries;
        self.upload_timeout = config.upload_timeout;
        self
    }

    /// `(success, message)` form of [`SubmissionService::submit`]
    pub async fn submit_report(&self, submitter_identity: &str, request: SubmitReport) -> (bool, String) {
        match self.submit(submitter_identity, request).await {
            Ok(outcome) => (true, outcome.message().to_string()),
            Err(e) => (false, e.user_message()),
        }
    }

    pub async fn submit(
        &self,
        submitter_identity: &str,
        request: SubmitReport,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let valid = validate(request)?;

        let report = {
            let lock = SubmitterLock::acquire(&self.locks, submitter_identity);
            let _guard = lock.mutex.lock().await;
            self.store_report(submitter_identity, valid).await?
        };

        let mirror = if !self.mirror.is_enabled() {
            MirrorOutcome::Disabled
        } else if self.mirror.append_report(&report).await {
            MirrorOutcome::Mirrored
        } else {
            tracing::warn!("Report {} saved but not mirrored", report.id);
            MirrorOutcome::Failed
        };

        tracing::info!(
            "Accepted flood report {} ({}) from {}",
            report.id,
            report.severity.code(),
            submitter_identity
        );

        Ok(SubmissionOutcome { report, mirror })
    }

    /// Quota, photo and primary write. Runs under the submitter lock.
    async fn store_report(
        &self,
        submitter_identity: &str,
        valid: ValidSubmission,
    ) -> Result<FloodReport, SubmissionError> {
        if !self.quota.can_submit(submitter_identity).await? {
            return Err(SubmissionError::QuotaExceeded {
                limit: self.quota.daily_limit(),
            });
        }

        let photo_reference = match &valid.photo {
            Some(photo) => self.store_photo(photo).await?,
            None => None,
        };

        let new_report = NewFloodReport {
            address: valid.address,
            severity: valid.severity,
            reporter_name: valid.reporter_name,
            reporter_contact: valid.reporter_contact,
            photo_reference: photo_reference.clone(),
            submitter_identity: submitter_identity.to_string(),
        };

        match self.store.create(new_report).await {
            Ok(report) => Ok(report),
            Err(e) => {
                if let (Some(reference), Some(photos)) = (&photo_reference, &self.photos) {
                    if photos.delete(reference).await {
                        tracing::info!("Removed photo after failed report write");
                    } else {
                        tracing::error!("Orphaned photo after failed report write: {}", reference);
                    }
                }
                Err(SubmissionError::Storage(e))
            }
        }
    }

    /// Check and persist a photo. `None` when photo storage is disabled.
    async fn store_photo(&self, photo: &PhotoUpload) -> Result<Option<String>, SubmissionError> {
        let extension = photo.extension().unwrap_or_default();
        if !is_allowed_extension(&extension) {
            return Err(SubmissionError::UnsupportedMedia { extension });
        }
        if photo.data.len() > self.max_photo_size {
            return Err(SubmissionError::PayloadTooLarge {
                size: photo.data.len(),
                max: self.max_photo_size,
            });
        }

        let Some(photos) = &self.photos else {
            tracing::warn!("Photo storage disabled, dropping attached photo");
            return Ok(None);
        };

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let result = with_retry("photo upload", self.upload_retries, self.upload_timeout, || {
            photos.store(&photo.data, &file_name)
        })
        .await;

        match result {
            Ok(reference) => Ok(Some(reference)),
            Err(e) => {
                // A timed-out attempt may still have landed
                if !photos.discard(&file_name).await {
                    tracing::error!("Possibly orphaned photo after failed upload: {}", file_name);
                }
                Err(SubmissionError::PhotoStorage(e.to_string()))
            }
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A submitter's entry in the lock map. Dropping it, including when the
/// submission future is cancelled, removes the entry once nobody else shares it.
struct SubmitterLock<'a> {
    locks: &'a LockMap,
    identity: &'a str,
    mutex: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> SubmitterLock<'a> {
    fn acquire(locks: &'a LockMap, identity: &'a str) -> Self {
        let mutex = locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(identity.to_string())
            .or_default()
            .clone();
        Self {
            locks,
            identity,
            mutex,
        }
    }
}

impl Drop for SubmitterLock<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Held by the map and by us only
        if locks
            .get(self.identity)
            .is_some_and(|m| Arc::ptr_eq(m, &self.mutex) && Arc::strong_count(m) == 2)
        {
            locks.remove(self.identity);
        }
    }
}

fn validate(request: SubmitReport) -> Result<ValidSubmission, SubmissionError> {
    let mut fields = Vec::new();

    let address = request.address.trim().to_string();
    if address.is_empty() {
        fields.push("Alamat wajib diisi".to_string());
    } else if address.chars().count() > MAX_ADDRESS_LENGTH {
        fields.push(format!("Alamat maksimal {} karakter", MAX_ADDRESS_LENGTH));
    }

    let severity = match request.severity.parse::<FloodDepth>() {
        Ok(depth) => Some(depth),
        Err(e) => {
            fields.push(e);
            None
        }
    };

    let reporter_name = request.reporter_name.trim().to_string();
    if reporter_name.is_empty() {
        fields.push("Nama pelapor wajib diisi".to_string());
    } else if reporter_name.chars().count() > MAX_NAME_LENGTH {
        fields.push(format!("Nama pelapor maksimal {} karakter", MAX_NAME_LENGTH));
    }

    let reporter_contact = request
        .reporter_contact
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if let Some(contact) = &reporter_contact {
        if !is_valid_phone(contact) {
            fields.push("Nomor HP tidak valid".to_string());
        }
    }

    match severity {
        Some(severity) if fields.is_empty() => Ok(ValidSubmission {
            address,
            severity,
            reporter_name,
            reporter_contact,
            photo: request.photo,
        }),
        _ => Err(SubmissionError::Validation { fields }),
    }
}
