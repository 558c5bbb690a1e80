#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use speid_core::adapters::{InMemoryRetryQueue, InMemoryTransactionRepository};
use speid_core::domain::{
    Event, OrderFields, OrderRequest, OrderResponse, Transaction, TransactionUpdate,
};
use speid_core::ports::{
    CallbackResponse, ClearingClient, ClearingError, ErrorReporter, NotifyError, QueueError,
    RepositoryError, RepositoryResult, ReportStore, RetryQueue, StorageError,
    TransactionNotifier, TransactionRepository,
};
use speid_core::use_cases::{ReconSettings, ReconcileReport, SendOrder};

pub const LOCAL_PREFIX: &str = "646180";

pub fn order_fields(tracking_key: &str) -> OrderFields {
    serde_json::from_value(json!({
        "clave_rastreo": tracking_key,
        "concepto_pago": "PRUEBA",
        "referencia_numerica": 1234567,
        "monto": "1500.00",
        "institucion_ordenante": "90646",
        "nombre_ordenante": "Cuenca",
        "cuenta_ordenante": "646180157000000004",
        "tipo_cuenta_ordenante": "40",
        "institucion_beneficiaria": "40072",
        "nombre_beneficiario": "Pablo Sanchez",
        "cuenta_beneficiario": "072691004495711499",
        "tipo_cuenta_beneficiario": "40",
        "rfc_curp_beneficiario": "ND",
        "empresa": "TAMIZI"
    }))
    .expect("valid order fields")
}

/// One report line of the received section, in the network's literal syntax.
pub fn report_line(order_id: &str, tracking_key: &str, beneficiary_account: &str, amount: i64) -> String {
    format!(
        "{{'id': '{}', 'rastreo': '{}', 'cuenta_ordenante': '072691004495711499', \
         'cuenta_beneficiario': '{}', 'ordenante': 'Pablo Sanchez', 'beneficiario': 'Cuenca', \
         'monto': {}, 'estado_orden': 'LQ', 'institucion': '90646', 'contraparte': 'BANORTE', \
         'rfc_curp_ordenante': 'None', 'rfc_curp_beneficiario': 'None', \
         'concepto_pago': 'Pago', 'referencia_numerica': 1234567, 'fecha_operacion': '20190510'}}",
        order_id, tracking_key, beneficiary_account, amount
    )
}

/// A full report whose received section holds `received`; the other
/// sections carry `filler` records each so the cursor has to skip them.
pub fn report(received: &[String], filler: usize) -> String {
    let mut out = format!("Recibidas STP ({}) registros\n", received.len());
    for line in received {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    for i in 1..14 {
        out.push_str(&format!("Seccion {} ({})\n", i + 1, filler));
        for n in 0..filler {
            out.push_str(&format!("{{'id': {}, 'rastreo': 'OTHER{}'}}\n", n, i));
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone)]
pub enum ClearingReply {
    Id(i64),
    Transport,
}

/// Clearing client answering from a script, one reply per call.
pub struct ScriptedClearingClient {
    replies: Mutex<VecDeque<ClearingReply>>,
    pub requests: Mutex<Vec<OrderRequest>>,
}

impl ScriptedClearingClient {
    pub fn new(replies: Vec<ClearingReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ClearingClient for ScriptedClearingClient {
    async fn register_order(&self, order: &OrderRequest) -> Result<OrderResponse, ClearingError> {
        self.requests.lock().unwrap().push(order.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ClearingReply::Id(0));
        match reply {
            ClearingReply::Id(id) => {
                let description = if id > 0 { "" } else { "Cuenta inválida" };
                Ok(serde_json::from_value(json!({ "id": id, "descripcion": description })).unwrap())
            }
            ClearingReply::Transport => Err(ClearingError::InvalidResponse(
                "connection reset by peer".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CallbackReply {
    Status(&'static str),
    Transport,
}

pub struct RecordingNotifier {
    reply: CallbackReply,
    pub sent: Mutex<Vec<Transaction>>,
}

impl RecordingNotifier {
    pub fn new(reply: CallbackReply) -> Self {
        Self {
            reply,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionNotifier for RecordingNotifier {
    async fn send_transaction(&self, tx: &Transaction) -> Result<CallbackResponse, NotifyError> {
        self.sent.lock().unwrap().push(tx.clone());
        match &self.reply {
            CallbackReply::Status(status) => Ok(serde_json::from_value(json!({
                "status": status,
                "reason": "cuenta inexistente"
            }))
            .unwrap()),
            CallbackReply::Transport => {
                Err(NotifyError::InvalidResponse("502 Bad Gateway".to_string()))
            }
        }
    }
}

pub struct StaticReportStore {
    body: Option<String>,
    pub fetched: Mutex<Vec<String>>,
}

impl StaticReportStore {
    pub fn new(body: String) -> Self {
        Self {
            body: Some(body),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn missing() -> Self {
        Self {
            body: None,
            fetched: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ReportStore for StaticReportStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.fetched.lock().unwrap().push(key.to_string());
        match &self.body {
            Some(body) => Ok(body.clone().into_bytes()),
            None => Err(StorageError::Status {
                status: 404,
                body: "NoSuchKey".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct CapturingReporter {
    pub captured: Mutex<Vec<String>>,
}

impl ErrorReporter for CapturingReporter {
    fn capture(&self, error: &(dyn std::error::Error + 'static)) {
        self.captured.lock().unwrap().push(error.to_string());
    }
}

/// Delegates to the in-memory store but fails inserts after `allowed` of them.
pub struct FlakyRepository {
    inner: InMemoryTransactionRepository,
    allowed: usize,
    inserts: AtomicUsize,
}

impl FlakyRepository {
    pub fn failing_after(allowed: usize) -> Self {
        Self {
            inner: InMemoryTransactionRepository::new(),
            allowed,
            inserts: AtomicUsize::new(0),
        }
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.inner.transactions().await
    }
}

#[async_trait]
impl TransactionRepository for FlakyRepository {
    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        if self.inserts.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.insert(tx).await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction> {
        self.inner.get_by_id(id).await
    }

    async fn find_by_order_and_tracking_key(
        &self,
        order_id: i64,
        tracking_key: &str,
    ) -> RepositoryResult<Option<Transaction>> {
        self.inner
            .find_by_order_and_tracking_key(order_id, tracking_key)
            .await
    }

    async fn append_event(&self, event: &Event) -> RepositoryResult<()> {
        self.inner.append_event(event).await
    }

    async fn apply(&self, update: &TransactionUpdate) -> RepositoryResult<()> {
        self.inner.apply(update).await
    }

    async fn list_events(&self, transaction_id: Uuid) -> RepositoryResult<Vec<Event>> {
        self.inner.list_events(transaction_id).await
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

pub struct BrokenQueue;

#[async_trait]
impl RetryQueue for BrokenQueue {
    async fn enqueue(&self, _queue: &str, _payload: &Value) -> Result<(), QueueError> {
        Err(QueueError::Redis(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        ))))
    }
}

/// Send-order wiring over in-memory adapters.
pub struct OrderHarness {
    pub repository: Arc<InMemoryTransactionRepository>,
    pub clearing: Arc<ScriptedClearingClient>,
    pub queue: Arc<InMemoryRetryQueue>,
    pub use_case: SendOrder,
}

impl OrderHarness {
    pub fn new(replies: Vec<ClearingReply>) -> Self {
        let repository = Arc::new(InMemoryTransactionRepository::new());
        let clearing = Arc::new(ScriptedClearingClient::new(replies));
        let queue = Arc::new(InMemoryRetryQueue::new());
        let use_case = SendOrder::new(repository.clone(), clearing.clone(), queue.clone());
        Self {
            repository,
            clearing,
            queue,
            use_case,
        }
    }
}

/// Reconciliation wiring over in-memory adapters.
pub struct ReconHarness {
    pub repository: Arc<InMemoryTransactionRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<StaticReportStore>,
    pub reporter: Arc<CapturingReporter>,
    pub use_case: ReconcileReport,
}

impl ReconHarness {
    pub fn new(store: StaticReportStore, reply: CallbackReply, report_path: std::path::PathBuf) -> Self {
        let repository = Arc::new(InMemoryTransactionRepository::new());
        let notifier = Arc::new(RecordingNotifier::new(reply));
        let store = Arc::new(store);
        let reporter = Arc::new(CapturingReporter::default());
        let use_case = ReconcileReport::new(
            repository.clone(),
            notifier.clone(),
            store.clone(),
            reporter.clone(),
            settings(report_path),
        );
        Self {
            repository,
            notifier,
            store,
            reporter,
            use_case,
        }
    }
}

pub fn settings(report_path: std::path::PathBuf) -> ReconSettings {
    ReconSettings {
        report_key: "reports/report.txt".to_string(),
        report_path,
        local_prefix: LOCAL_PREFIX.to_string(),
    }
}
