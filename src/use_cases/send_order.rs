//! Send order use case.
//! Records an outgoing order, registers it with the clearing network and
//! queues it for re-submission when the network does not confirm it.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    Event, EventType, NewTransaction, OrderFields, OrderRequest, OrderState, Transaction,
    TransactionStatus, TransactionUpdate,
};
use crate::ports::{
    ClearingClient, QueueError, RepositoryError, RetryQueue, TransactionRepository,
    NEW_ORDER_QUEUE,
};
use crate::utils::sanitize::sanitize_json;

#[derive(Debug, Error)]
pub enum SendOrderError {
    #[error("Failed to persist order: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("Failed to queue order for retry: {0}")]
    Enqueue(#[from] QueueError),

    #[error("Failed to serialize order: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Output of the SendOrder use case.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    /// The network assigned an order id.
    Confirmed { transaction_id: Uuid, order_id: i64 },
    /// The network did not confirm; the order sits on the retry queue.
    Requeued { transaction_id: Uuid },
}

impl OrderOutcome {
    pub fn transaction_id(&self) -> Uuid {
        match self {
            OrderOutcome::Confirmed { transaction_id, .. }
            | OrderOutcome::Requeued { transaction_id } => *transaction_id,
        }
    }

    pub fn state(&self) -> OrderState {
        match self {
            OrderOutcome::Confirmed { .. } => OrderState::Confirmed,
            OrderOutcome::Requeued { .. } => OrderState::SubmissionFailed,
        }
    }
}

/// Use case for submitting one order. One invocation per order; callers
/// guarantee that the same order is not submitted concurrently.
pub struct SendOrder {
    transaction_repository: Arc<dyn TransactionRepository>,
    clearing_client: Arc<dyn ClearingClient>,
    retry_queue: Arc<dyn RetryQueue>,
}

impl SendOrder {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepository>,
        clearing_client: Arc<dyn ClearingClient>,
        retry_queue: Arc<dyn RetryQueue>,
    ) -> Self {
        Self {
            transaction_repository,
            clearing_client,
            retry_queue,
        }
    }

    pub async fn execute(&self, fields: OrderFields) -> Result<OrderOutcome, SendOrderError> {
        // Committed before anything reaches the network.
        let tx = Transaction::new(NewTransaction::from(&fields));
        let tx = self.transaction_repository.insert(&tx).await?;
        info!(
            transaction_id = %tx.id,
            tracking_key = %tx.tracking_key,
            state = ?OrderState::Received,
            "Order recorded"
        );

        let created = Event::new(tx.id, EventType::Create, serde_json::to_string(&fields)?);

        let request = OrderRequest::from(&fields);
        info!(transaction_id = %tx.id, state = ?OrderState::Submitted, "Registering order");

        let (outcome, order_id, metadata) = match self.clearing_client.register_order(&request).await {
            Ok(response) if response.is_success() => (
                EventType::Complete,
                Some(response.id),
                serde_json::to_string(&response)?,
            ),
            Ok(response) => {
                warn!(transaction_id = %tx.id, id = response.id, "Clearing network rejected order");
                (EventType::Error, None, serde_json::to_string(&response)?)
            }
            Err(e) => {
                warn!(transaction_id = %tx.id, error = %e, "Clearing network call failed");
                (EventType::Error, None, e.to_string())
            }
        };

        let update = TransactionUpdate {
            transaction_id: tx.id,
            order_id,
            status: order_id.map(|_| TransactionStatus::Submitted),
            events: vec![created, Event::new(tx.id, outcome, metadata)],
        };
        self.transaction_repository.apply(&update).await?;

        match order_id {
            Some(order_id) => {
                info!(transaction_id = %tx.id, order_id, state = ?OrderState::Confirmed, "Order confirmed");
                Ok(OrderOutcome::Confirmed {
                    transaction_id: tx.id,
                    order_id,
                })
            }
            None => {
                let payload = serde_json::to_value(&request)?;
                self.retry_queue.enqueue(NEW_ORDER_QUEUE, &payload).await?;
                info!(
                    transaction_id = %tx.id,
                    state = ?OrderState::SubmissionFailed,
                    payload = %sanitize_json(&payload),
                    "Order queued for re-submission"
                );
                Ok(OrderOutcome::Requeued {
                    transaction_id: tx.id,
                })
            }
        }
    }
}
