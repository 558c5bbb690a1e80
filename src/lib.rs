pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod recon;
pub mod startup;
pub mod use_cases;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::ports::TransactionRepository;
use crate::use_cases::{ReconcileReport, SendOrder};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TransactionRepository>,
    pub send_order: Arc<SendOrder>,
    pub reconcile: Arc<ReconcileReport>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/orders", post(handlers::orders::submit_order))
        .route("/recon", post(handlers::recon::run_recon))
        .route("/transactions/:id", get(handlers::transactions::get_transaction))
        .with_state(state)
}
