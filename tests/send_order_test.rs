mod common;

use std::sync::Arc;

use common::{
    order_fields, BrokenQueue, ClearingReply, FlakyRepository, OrderHarness, ScriptedClearingClient,
};
use speid_core::adapters::InMemoryRetryQueue;
use speid_core::domain::{EventType, OrderState, TransactionStatus};
use speid_core::ports::{RepositoryError, TransactionRepository, NEW_ORDER_QUEUE};
use speid_core::use_cases::{OrderOutcome, SendOrder, SendOrderError};

#[tokio::test]
async fn test_confirmed_order_gets_order_id_and_complete_event() {
    let harness = OrderHarness::new(vec![ClearingReply::Id(4242)]);

    let outcome = harness.use_case.execute(order_fields("CUENCA1")).await.unwrap();
    assert_eq!(outcome.state(), OrderState::Confirmed);
    let OrderOutcome::Confirmed { transaction_id, order_id } = outcome else {
        panic!("expected a confirmed order");
    };
    assert_eq!(order_id, 4242);

    let tx = harness.repository.get_by_id(transaction_id).await.unwrap();
    assert_eq!(tx.order_id, Some(4242));
    assert_eq!(tx.status, TransactionStatus::Submitted);
    assert_eq!(tx.tracking_key, "CUENCA1");

    let events = harness.repository.list_events(transaction_id).await.unwrap();
    let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(types, vec![EventType::Create, EventType::Complete]);
    assert!(events[0].metadata.contains("\"clave_rastreo\":\"CUENCA1\""));
    assert!(events[1].metadata.contains("4242"));

    assert!(harness.queue.messages().await.is_empty());
}

#[tokio::test]
async fn test_zero_id_commits_error_event_and_enqueues_once() {
    let harness = OrderHarness::new(vec![ClearingReply::Id(0)]);

    let outcome = harness.use_case.execute(order_fields("CUENCA2")).await.unwrap();
    assert_eq!(outcome.state(), OrderState::SubmissionFailed);

    let tx = harness.repository.get_by_id(outcome.transaction_id()).await.unwrap();
    assert_eq!(tx.order_id, None);
    assert_eq!(tx.status, TransactionStatus::Created);

    let events = harness.repository.list_events(tx.id).await.unwrap();
    let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(types, vec![EventType::Create, EventType::Error]);

    let messages = harness.queue.messages().await;
    assert_eq!(messages.len(), 1);
    let (queue, payload) = &messages[0];
    assert_eq!(queue, NEW_ORDER_QUEUE);
    assert_eq!(payload["claveRastreo"], "CUENCA2");
    assert_eq!(payload["cuentaBeneficiario"], "072691004495711499");
    assert!(payload.get("clave_rastreo").is_none());
}

#[tokio::test]
async fn test_negative_id_is_a_failure() {
    let harness = OrderHarness::new(vec![ClearingReply::Id(-1)]);

    let outcome = harness.use_case.execute(order_fields("CUENCA3")).await.unwrap();
    assert!(matches!(outcome, OrderOutcome::Requeued { .. }));
    assert_eq!(harness.queue.messages().await.len(), 1);
}

#[tokio::test]
async fn test_transport_failure_is_recorded_and_requeued() {
    let harness = OrderHarness::new(vec![ClearingReply::Transport]);

    let outcome = harness.use_case.execute(order_fields("CUENCA4")).await.unwrap();
    assert_eq!(outcome.state(), OrderState::SubmissionFailed);

    let events = harness.repository.list_events(outcome.transaction_id()).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].event_type, EventType::Error);
    assert!(events[1].metadata.contains("connection reset by peer"));
    assert_eq!(harness.queue.messages().await.len(), 1);
}

#[tokio::test]
async fn test_request_uses_network_field_names() {
    let harness = OrderHarness::new(vec![ClearingReply::Id(1)]);
    harness.use_case.execute(order_fields("CUENCA5")).await.unwrap();

    let requests = harness.clearing.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let body = serde_json::to_value(&requests[0]).unwrap();
    assert_eq!(body["claveRastreo"], "CUENCA5");
    assert_eq!(body["tipoCuentaBeneficiario"], "40");
    assert_eq!(body["referenciaNumerica"], 1234567);
}

#[tokio::test]
async fn test_persistence_failure_skips_network_call() {
    let repository = Arc::new(FlakyRepository::failing_after(0));
    let clearing = Arc::new(ScriptedClearingClient::new(vec![ClearingReply::Id(1)]));
    let queue = Arc::new(InMemoryRetryQueue::new());
    let use_case = SendOrder::new(repository.clone(), clearing.clone(), queue.clone());

    let err = use_case.execute(order_fields("CUENCA6")).await.unwrap_err();
    assert!(matches!(
        err,
        SendOrderError::Persistence(RepositoryError::Database(_))
    ));
    assert_eq!(clearing.calls(), 0);
    assert!(repository.transactions().await.is_empty());
    assert!(queue.messages().await.is_empty());
}

#[tokio::test]
async fn test_enqueue_failure_propagates_after_events_commit() {
    let harness = OrderHarness::new(vec![]);
    let use_case = SendOrder::new(
        harness.repository.clone(),
        harness.clearing.clone(),
        Arc::new(BrokenQueue),
    );

    let err = use_case.execute(order_fields("CUENCA7")).await.unwrap_err();
    assert!(matches!(err, SendOrderError::Enqueue(_)));

    // The audit trail is committed before the enqueue is attempted.
    let transactions = harness.repository.transactions().await;
    assert_eq!(transactions.len(), 1);
    let events = harness.repository.list_events(transactions[0].id).await.unwrap();
    let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(types, vec![EventType::Create, EventType::Error]);
}
