mod common;

use mockito::Matcher;
use serde_json::json;

use common::order_fields;
use speid_core::adapters::callback_client::{sign, SIGNATURE_HEADER};
use speid_core::adapters::{
    HttpClearingClient, HttpTransactionNotifier, S3Credentials, S3ReportStore,
};
use speid_core::domain::{NewTransaction, OrderRequest, Transaction};
use speid_core::ports::{
    ClearingClient, ClearingError, ReportStore, StorageError, TransactionNotifier,
};

#[tokio::test]
async fn test_register_order_puts_camel_case_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/speiws/rest/ordenPago/registra")
        .match_body(Matcher::PartialJson(json!({
            "claveRastreo": "CUENCA1",
            "cuentaBeneficiario": "072691004495711499",
            "tipoCuentaBeneficiario": "40"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 4242, "descripcion": ""}"#)
        .create_async()
        .await;

    let client = HttpClearingClient::new(format!("{}/speiws/rest/", server.url()));
    let request = OrderRequest::from(&order_fields("CUENCA1"));
    let response = client.register_order(&request).await.unwrap();

    assert_eq!(response.id, 4242);
    assert!(response.is_success());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_register_order_passes_rejections_through() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/ordenPago/registra")
        .with_status(200)
        .with_body(r#"{"id": -11, "descripcion": "El tipo de cuenta 40 es invalido"}"#)
        .create_async()
        .await;

    let client = HttpClearingClient::new(server.url());
    let response = client
        .register_order(&OrderRequest::from(&order_fields("CUENCA2")))
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.extra["descripcion"], "El tipo de cuenta 40 es invalido");
}

#[tokio::test]
async fn test_circuit_opens_after_server_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/ordenPago/registra")
        .with_status(500)
        .expect_at_least(2)
        .create_async()
        .await;

    let client = HttpClearingClient::with_circuit_breaker(server.url(), 2, 60);
    let request = OrderRequest::from(&order_fields("CUENCA3"));
    for _ in 0..2 {
        let result = client.register_order(&request).await;
        assert!(matches!(result, Err(ClearingError::InvalidResponse(_))));
    }

    let result = client.register_order(&request).await;
    assert!(matches!(result, Err(ClearingError::CircuitBreakerOpen(_))));
    assert_eq!(client.circuit_state(), "open");
}

fn transaction() -> Transaction {
    Transaction::new(NewTransaction::from(&order_fields("CUENCA4")))
}

#[tokio::test]
async fn test_callback_is_signed() {
    let tx = transaction();
    let body = serde_json::to_vec(&tx).unwrap();
    let expected_signature = sign("callback-secret", &body).unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/callback")
        .match_header(SIGNATURE_HEADER, expected_signature.as_str())
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"status": "succeeded"}"#)
        .create_async()
        .await;

    let notifier = HttpTransactionNotifier::new(
        format!("{}/callback", server.url()),
        "callback-secret".to_string(),
    );
    let response = notifier.send_transaction(&tx).await.unwrap();

    assert!(!response.is_failed());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_callback_failed_status_is_returned() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/callback")
        .with_status(200)
        .with_body(r#"{"status": "failed", "reason": "cuenta inexistente"}"#)
        .create_async()
        .await;

    let notifier = HttpTransactionNotifier::new(
        format!("{}/callback", server.url()),
        "callback-secret".to_string(),
    );
    let response = notifier.send_transaction(&transaction()).await.unwrap();
    assert!(response.is_failed());
}

fn report_store(endpoint: String) -> S3ReportStore {
    S3ReportStore::new(
        "speid-recon".to_string(),
        "us-east-1".to_string(),
        Some(endpoint),
        S3Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn test_report_store_fetches_signed_object() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/speid-recon/reports/report.txt")
        .match_header(
            "authorization",
            Matcher::Regex(
                r"^AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/\d{8}/us-east-1/s3/aws4_request, SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature=[0-9a-f]{64}$"
                    .to_string(),
            ),
        )
        .match_header("x-amz-date", Matcher::Regex(r"^\d{8}T\d{6}Z$".to_string()))
        .with_status(200)
        .with_body("Recibidas (0)\n\n")
        .create_async()
        .await;

    let store = report_store(server.url());
    let body = store.fetch("reports/report.txt").await.unwrap();

    assert_eq!(body, b"Recibidas (0)\n\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_report_store_surfaces_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/speid-recon/reports/report.txt")
        .with_status(403)
        .with_body("<Error><Code>AccessDenied</Code></Error>")
        .create_async()
        .await;

    let store = report_store(server.url());
    match store.fetch("reports/report.txt").await {
        Err(StorageError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("AccessDenied"));
        }
        other => panic!("unexpected result: {:?}", other.map(|b| b.len())),
    }
}
