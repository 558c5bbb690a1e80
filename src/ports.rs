//! Ports the use cases depend on. Concrete adapters live in `crate::adapters`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Event, OrderRequest, OrderResponse, Transaction, TransactionUpdate};

/// Name of the queue consumed by the order re-submission worker.
pub const NEW_ORDER_QUEUE: &str = "new_order";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Duplicate transaction: {0}")]
    Duplicate(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Durable record of transactions and their event history.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert and commit a new transaction.
    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction>;

    async fn find_by_order_and_tracking_key(
        &self,
        order_id: i64,
        tracking_key: &str,
    ) -> RepositoryResult<Option<Transaction>>;

    /// Append and commit a single event.
    async fn append_event(&self, event: &Event) -> RepositoryResult<()>;

    /// Apply an update in one commit.
    async fn apply(&self, update: &TransactionUpdate) -> RepositoryResult<()>;

    /// Events of a transaction, oldest first.
    async fn list_events(&self, transaction_id: Uuid) -> RepositoryResult<Vec<Event>>;

    async fn health_check(&self) -> RepositoryResult<()>;
}

#[derive(Debug, Error)]
pub enum ClearingError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response from clearing network: {0}")]
    InvalidResponse(String),

    #[error("Circuit breaker open: {0}")]
    CircuitBreakerOpen(String),
}

/// Synchronous order registration against the clearing network.
#[async_trait]
pub trait ClearingClient: Send + Sync {
    async fn register_order(&self, order: &OrderRequest) -> Result<OrderResponse, ClearingError>;
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait RetryQueue: Send + Sync {
    async fn enqueue(&self, queue: &str, payload: &serde_json::Value) -> Result<(), QueueError>;
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid callback response: {0}")]
    InvalidResponse(String),
}

/// Structured reply of the downstream callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CallbackResponse {
    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }
}

/// Downstream consumer told about transactions discovered by reconciliation.
#[async_trait]
pub trait TransactionNotifier: Send + Sync {
    async fn send_transaction(&self, tx: &Transaction) -> Result<CallbackResponse, NotifyError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Object store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid object location: {0}")]
    InvalidLocation(String),

    #[error("Request signing failed: {0}")]
    Signing(String),
}

/// Read-only access to the bucket holding the daily report.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// Sink for errors that abort a unit of work.
pub trait ErrorReporter: Send + Sync {
    fn capture(&self, error: &(dyn std::error::Error + 'static));
}
