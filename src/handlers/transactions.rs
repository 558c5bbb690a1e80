use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Event, Transaction};
use crate::error::AppError;
use crate::ports::RepositoryError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub events: Vec<Event>,
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionDetail>, AppError> {
    let transaction = state.repository.get_by_id(id).await.map_err(|e| match e {
        RepositoryError::NotFound(_) => AppError::NotFound(format!("Transaction {} not found", id)),
        other => AppError::Persistence(other),
    })?;
    let events = state.repository.list_events(id).await?;

    Ok(Json(TransactionDetail {
        transaction,
        events,
    }))
}
