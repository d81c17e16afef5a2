pub mod advisor;
pub mod clients;
pub mod common;
pub mod contacts;
pub mod invoices;
pub mod labor;
pub mod parts;
pub mod planning;
pub mod reports;
pub mod suppliers;
pub mod technicians;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        advisor::AdvisorService,
        clients::ClientService,
        contacts::{ExpertService, InsurerService},
        invoices::InvoiceService,
        labor::LaborRateService,
        parts::PartService,
        planning::PlanningService,
        reports::ReportService,
        suppliers::SupplierService,
        technicians::TechnicianService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer shared by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub clients: Arc<ClientService>,
    pub suppliers: Arc<SupplierService>,
    pub insurers: Arc<InsurerService>,
    pub experts: Arc<ExpertService>,
    pub technicians: Arc<TechnicianService>,
    pub parts: Arc<PartService>,
    pub labor: Arc<LaborRateService>,
    pub planning: Arc<PlanningService>,
    pub invoices: Arc<InvoiceService>,
    pub reports: Arc<ReportService>,
    pub advisor: Arc<AdvisorService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            clients: Arc::new(ClientService::new(db_pool.clone())),
            suppliers: Arc::new(SupplierService::new(db_pool.clone())),
            insurers: Arc::new(InsurerService::new(db_pool.clone())),
            experts: Arc::new(ExpertService::new(db_pool.clone())),
            technicians: Arc::new(TechnicianService::new(db_pool.clone())),
            parts: Arc::new(PartService::new(db_pool.clone())),
            labor: Arc::new(LaborRateService::new(db_pool.clone())),
            planning: Arc::new(PlanningService::new(db_pool.clone())),
            invoices: Arc::new(InvoiceService::new(db_pool.clone())),
            reports: Arc::new(ReportService::new(db_pool.clone())),
            advisor: Arc::new(AdvisorService::new(db_pool, config)),
        }
    }
}
