use std::sync::Arc;

use crate::features::flood_reports::dtos::ReportWindow;
use crate::features::flood_reports::models::FloodReport;
use crate::features::flood_reports::stores::{ReportStore, StorageError};

/// Read side of the report store
pub struct ReportService {
    store: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Reports in the window, newest first
    pub async fn list(&self, window: ReportWindow) -> Result<Vec<FloodReport>, StorageError> {
        match window {
            ReportWindow::Today => self.store.list_today().await,
            ReportWindow::Month => self.store.list_month().await,
            ReportWindow::All => self.store.list_all().await,
        }
    }
}
