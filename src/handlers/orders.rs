use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::domain::OrderFields;
use crate::error::AppError;
use crate::AppState;

/// Accept an order and submit it in its own task.
pub async fn submit_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderFields>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(fields) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    if fields.tracking_key.trim().is_empty() {
        return Err(AppError::Validation("clave_rastreo must not be empty".to_string()));
    }

    let tracking_key = fields.tracking_key.clone();
    let send_order = state.send_order.clone();
    tokio::spawn(async move {
        let tracking_key = fields.tracking_key.clone();
        match send_order.execute(fields).await {
            Ok(outcome) => tracing::info!(
                transaction_id = %outcome.transaction_id(),
                tracking_key = %tracking_key,
                state = ?outcome.state(),
                "Order processed"
            ),
            Err(e) => tracing::error!(tracking_key = %tracking_key, error = %e, "Order failed"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "accepted", "clave_rastreo": tracking_key })),
    ))
}
