//! Catalog loading and project submission against the backend.

use tracing::{error, info, warn};

use super::{Catalog, CatalogState, Ledger, Notice};
use crate::api::ApiError;
use crate::models::{CategoryKind, CategoryOption, SaveProjectRequest};

pub const CATALOG_LOAD_FAILED: &str = "Failed to load category codes.";
pub const PROJECT_SAVED: &str = "Project saved.";
pub const SAVE_ERROR: &str = "An error occurred while saving the project.";

/// The two endpoints the ledger talks to.
#[allow(async_fn_in_trait)]
pub trait LedgerBackend {
    async fn fetch_categories(&self, kind: CategoryKind) -> Result<Vec<CategoryOption>, ApiError>;

    async fn save_project(&self, request: &SaveProjectRequest) -> Result<(), ApiError>;
}

/// Loads both category sets. Runs once per ledger; later calls do nothing.
///
/// Both requests are in flight together. The catalog is applied only when
/// both succeed, otherwise the ledger stays empty and an error notice is
/// returned.
pub async fn load_catalog<B: LedgerBackend>(backend: &B, ledger: &mut Ledger) -> Option<Notice> {
    if ledger.catalog_state() != CatalogState::Pending {
        return None;
    }

    let (processes, products) = tokio::join!(
        backend.fetch_categories(CategoryKind::Process),
        backend.fetch_categories(CategoryKind::Product),
    );

    match (processes, products) {
        (Ok(processes), Ok(products)) => {
            info!(
                processes = processes.len(),
                products = products.len(),
                "category codes loaded"
            );
            ledger.apply_catalog(Catalog::new(processes, products));
            None
        }
        (Err(err), _) | (_, Err(err)) => {
            error!(%err, "failed to load category codes");
            ledger.mark_catalog_failed();
            Some(Notice::error(CATALOG_LOAD_FAILED))
        }
    }
}

/// Validates and sends the draft, returning the notice to show.
pub async fn submit<B: LedgerBackend>(backend: &B, ledger: &mut Ledger) -> Notice {
    let request = match ledger.prepare_submission() {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "project not submitted");
            return err.into();
        }
    };

    let result = backend.save_project(&request).await;
    ledger.finish_submission(result.is_ok());

    match result {
        Ok(()) => {
            info!(
                project = %request.project_name,
                items = request.materials.len(),
                "project saved"
            );
            Notice::info(PROJECT_SAVED)
        }
        Err(ApiError::Api { status, message }) => {
            warn!(status, ?message, "project save rejected");
            Notice::error(format!(
                "Failed to save project: {}",
                message.as_deref().unwrap_or("Unknown error")
            ))
        }
        Err(err) => {
            error!(%err, "project save failed");
            Notice::error(SAVE_ERROR)
        }
    }
}
