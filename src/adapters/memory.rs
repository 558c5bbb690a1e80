//! In-process adapters for local runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Event, Transaction, TransactionUpdate};
use crate::ports::{
    QueueError, RepositoryError, RepositoryResult, RetryQueue, TransactionRepository,
};

#[derive(Default)]
struct Store {
    transactions: Vec<Transaction>,
    events: Vec<Event>,
}

impl Store {
    fn position(&self, id: Uuid) -> RepositoryResult<usize> {
        self.transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn is_taken(&self, order_id: Option<i64>, tracking_key: &str, except: Uuid) -> bool {
        order_id.is_some()
            && self.transactions.iter().any(|t| {
                t.id != except && t.order_id == order_id && t.tracking_key == tracking_key
            })
    }
}

/// Transaction store kept in memory, with the same uniqueness rules as the
/// Postgres schema.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    store: RwLock<Store>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.store.read().await.transactions.clone()
    }

    pub async fn events(&self) -> Vec<Event> {
        self.store.read().await.events.clone()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        let mut store = self.store.write().await;
        if store.transactions.iter().any(|t| t.id == tx.id)
            || store.is_taken(tx.order_id, &tx.tracking_key, tx.id)
        {
            return Err(RepositoryError::Duplicate(format!(
                "order {:?} with tracking key {}",
                tx.order_id, tx.tracking_key
            )));
        }
        store.transactions.push(tx.clone());
        Ok(tx.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction> {
        let store = self.store.read().await;
        let idx = store.position(id)?;
        Ok(store.transactions[idx].clone())
    }

    async fn find_by_order_and_tracking_key(
        &self,
        order_id: i64,
        tracking_key: &str,
    ) -> RepositoryResult<Option<Transaction>> {
        let store = self.store.read().await;
        Ok(store
            .transactions
            .iter()
            .find(|t| t.order_id == Some(order_id) && t.tracking_key == tracking_key)
            .cloned())
    }

    async fn append_event(&self, event: &Event) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        store.position(event.transaction_id)?;
        store.events.push(event.clone());
        Ok(())
    }

    async fn apply(&self, update: &TransactionUpdate) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        let idx = store.position(update.transaction_id)?;

        let tracking_key = store.transactions[idx].tracking_key.clone();
        if update.order_id.is_some()
            && store.is_taken(update.order_id, &tracking_key, update.transaction_id)
        {
            return Err(RepositoryError::Duplicate(format!(
                "order {:?} with tracking key {}",
                update.order_id, tracking_key
            )));
        }

        let tx = &mut store.transactions[idx];
        if let Some(order_id) = update.order_id {
            tx.order_id = Some(order_id);
        }
        if let Some(status) = update.status {
            tx.status = status;
        }
        tx.updated_at = Utc::now();
        store.events.extend(update.events.iter().cloned());
        Ok(())
    }

    async fn list_events(&self, transaction_id: Uuid) -> RepositoryResult<Vec<Event>> {
        let store = self.store.read().await;
        Ok(store
            .events
            .iter()
            .filter(|e| e.transaction_id == transaction_id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Retry queue that records every message it is handed.
#[derive(Default)]
pub struct InMemoryRetryQueue {
    messages: RwLock<Vec<(String, Value)>>,
}

impl InMemoryRetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<(String, Value)> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl RetryQueue for InMemoryRetryQueue {
    async fn enqueue(&self, queue: &str, payload: &Value) -> Result<(), QueueError> {
        self.messages
            .write()
            .await
            .push((queue.to_string(), payload.clone()));
        Ok(())
    }
}
