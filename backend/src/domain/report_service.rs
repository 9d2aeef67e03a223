//! On-demand report computation for the staff dashboard.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::error::Error;
use crate::domain::ports::{DocumentRequestRepository, ResidentRepository};
use crate::domain::report::{DocumentReport, ResidentReport};

/// Computes reports from the live collections; nothing is cached or stored.
pub struct ReportService {
    residents: Arc<dyn ResidentRepository>,
    requests: Arc<dyn DocumentRequestRepository>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    /// Build a service over the given collections.
    pub fn new(
        residents: Arc<dyn ResidentRepository>,
        requests: Arc<dyn DocumentRequestRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            residents,
            requests,
            clock,
        }
    }

    /// Demographic summary of the resident collection.
    pub async fn resident_report(&self) -> Result<ResidentReport, Error> {
        let residents = self.residents.list_all().await?;
        Ok(ResidentReport::from_residents(&residents, self.clock.utc()))
    }

    /// Issuance and workload summary of the request collection.
    pub async fn document_report(&self) -> Result<DocumentReport, Error> {
        let requests = self.requests.list_all().await?;
        Ok(DocumentReport::from_requests(&requests, self.clock.utc()))
    }
}
