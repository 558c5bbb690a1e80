use axum::{extract::State, Json};

use crate::error::AppError;
use crate::use_cases::ReconSummary;
use crate::AppState;

/// Run one reconciliation pass against the latest report.
pub async fn run_recon(State(state): State<AppState>) -> Result<Json<ReconSummary>, AppError> {
    let summary = state.reconcile.run().await?;
    Ok(Json(summary))
}
