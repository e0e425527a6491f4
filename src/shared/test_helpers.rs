use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::name::en::Name;
use fake::Fake;

use crate::core::extractor::IdentityPolicy;
use crate::features::flood_reports::models::{
    FloodDepth, FloodReport, MonthlyStatistics, NewFloodReport,
};
use crate::features::flood_reports::services::SubmitReport;
use crate::features::flood_reports::stores::{ReportStore, StorageError};
use crate::features::mirror::ReportMirror;
use crate::features::photos::{PhotoError, PhotoStore};
use crate::features::risk::models::RiskAssessment;

/// A valid submission with generated values
pub fn fake_submission() -> SubmitReport {
    let depth = FloodDepth::ALL[(0..FloodDepth::ALL.len()).fake::<usize>()];
    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    let contact = if (0..2u8).fake::<u8>() == 0 {
        Some(format!("08{}", (1_000_000_000u64..9_999_999_999u64).fake::<u64>()))
    } else {
        None
    };

    SubmitReport {
        address: format!("Jl. {} No.{}, {}", street, (1..200u32).fake::<u32>(), city),
        severity: depth.label().to_string(),
        reporter_name: Name().fake(),
        reporter_contact: contact,
        photo: None,
    }
}

/// Store whose reads succeed empty and whose writes always fail
pub struct FailingReportStore;

#[async_trait]
impl ReportStore for FailingReportStore {
    async fn create(&self, _report: NewFloodReport) -> Result<FloodReport, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn count_today(&self, _submitter_identity: &str) -> Result<i64, StorageError> {
        Ok(0)
    }

    async fn list_today(&self) -> Result<Vec<FloodReport>, StorageError> {
        Ok(vec![])
    }

    async fn list_month(&self) -> Result<Vec<FloodReport>, StorageError> {
        Ok(vec![])
    }

    async fn list_all(&self) -> Result<Vec<FloodReport>, StorageError> {
        Ok(vec![])
    }

    async fn monthly_statistics(&self) -> Result<MonthlyStatistics, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

/// Photo store that remembers stored names and deleted references.
/// References are `memory://{file_name}`.
#[derive(Default)]
pub struct RecordingPhotoStore {
    fail: bool,
    delay: Option<Duration>,
    attempts: AtomicU32,
    stored: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    discarded: Mutex<Vec<String>>,
}

impl RecordingPhotoStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every upload takes `delay` before it lands
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn discarded(&self) -> Vec<String> {
        self.discarded.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoStore for RecordingPhotoStore {
    async fn store(&self, _data: &[u8], file_name: &str) -> Result<String, PhotoError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(PhotoError::Upload("bucket unreachable".to_string()));
        }
        self.stored.lock().unwrap().push(file_name.to_string());
        Ok(format!("memory://{}", file_name))
    }

    async fn delete(&self, reference: &str) -> bool {
        self.deleted.lock().unwrap().push(reference.to_string());
        true
    }

    async fn discard(&self, file_name: &str) -> bool {
        self.discarded.lock().unwrap().push(file_name.to_string());
        true
    }
}

/// Mirror that is configured but never succeeds
pub struct FailingMirror;

#[async_trait]
impl ReportMirror for FailingMirror {
    async fn append_report(&self, _report: &FloodReport) -> bool {
        false
    }

    async fn append_assessments(&self, _assessments: &[RiskAssessment]) -> bool {
        false
    }
}

/// Mirror that counts what it was given
#[derive(Default)]
pub struct RecordingMirror {
    reports: AtomicUsize,
    assessments: AtomicUsize,
}

impl RecordingMirror {
    pub fn reports(&self) -> usize {
        self.reports.load(Ordering::SeqCst)
    }

    pub fn assessments(&self) -> usize {
        self.assessments.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportMirror for RecordingMirror {
    async fn append_report(&self, _report: &FloodReport) -> bool {
        self.reports.fetch_add(1, Ordering::SeqCst);
        true
    }

    async fn append_assessments(&self, assessments: &[RiskAssessment]) -> bool {
        self.assessments
            .fetch_add(assessments.len(), Ordering::SeqCst);
        true
    }
}

async fn trust_forwarded_for_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(IdentityPolicy {
        trust_forwarded_for: true,
    });
    next.run(request).await
}

/// Take the submitter identity from `X-Forwarded-For`, since the test
/// transport carries no peer address
pub fn with_forwarded_identity(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(trust_forwarded_for_middleware))
}
