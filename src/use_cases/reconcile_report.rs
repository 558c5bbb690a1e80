//! Reconcile report use case.
//! Downloads the clearing network's daily report and creates local
//! transactions for records the clearing network has and we do not.

use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{Event, EventType, Transaction, TransactionStatus, TransactionUpdate};
use crate::ports::{
    ErrorReporter, RepositoryError, ReportStore, StorageError, TransactionNotifier,
    TransactionRepository,
};
use crate::recon::{ParseError, RawRecord, ReportReader, ReportRecord, ReportSection};

#[derive(Debug, Error)]
pub enum ReconError {
    #[error("Failed to download report: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to access staged report {}: {source}", path.display())]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed report: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to persist reconciled transaction: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("Failed to serialize event metadata: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ReconSettings {
    /// Object key of the report inside the bucket.
    pub report_key: String,
    /// Local path the report is staged to before parsing.
    pub report_path: PathBuf,
    /// Account prefix of the local institution.
    pub local_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyKnown,
    OtherInstitution,
}

/// What happened to one record of the received section.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Skipped(SkipReason),
    Created { transaction_id: Uuid },
    /// Created, but the downstream callback refused it.
    NotificationFailed { transaction_id: Uuid },
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionCount {
    pub section: ReportSection,
    pub records: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconSummary {
    pub created: usize,
    pub skipped: usize,
    pub notification_failures: usize,
    pub sections: Vec<SectionCount>,
}

pub struct ReconcileReport {
    transaction_repository: Arc<dyn TransactionRepository>,
    notifier: Arc<dyn TransactionNotifier>,
    report_store: Arc<dyn ReportStore>,
    error_reporter: Arc<dyn ErrorReporter>,
    settings: ReconSettings,
}

impl ReconcileReport {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepository>,
        notifier: Arc<dyn TransactionNotifier>,
        report_store: Arc<dyn ReportStore>,
        error_reporter: Arc<dyn ErrorReporter>,
        settings: ReconSettings,
    ) -> Self {
        Self {
            transaction_repository,
            notifier,
            report_store,
            error_reporter,
            settings,
        }
    }

    /// Download the latest report and reconcile it.
    pub async fn run(&self) -> Result<ReconSummary, ReconError> {
        let result = match self.download_report().await {
            Ok(path) => self.recon_file(&path).await,
            Err(e) => Err(e),
        };
        self.report(result)
    }

    /// Reconcile a report already on disk.
    pub async fn reconcile_file(&self, path: &Path) -> Result<ReconSummary, ReconError> {
        let result = self.recon_file(path).await;
        self.report(result)
    }

    /// Fetch the report from the object store and stage it locally.
    pub async fn download_report(&self) -> Result<PathBuf, ReconError> {
        let body = self.report_store.fetch(&self.settings.report_key).await?;
        let path = self.settings.report_path.clone();
        fs::write(&path, &body).await.map_err(|source| ReconError::Stage {
            path: path.clone(),
            source,
        })?;
        info!(key = %self.settings.report_key, path = %path.display(), bytes = body.len(), "Report staged");
        Ok(path)
    }

    /// Walk every section of the report, reconciling the received section.
    ///
    /// Stops at the first parse or persistence error; records committed
    /// before that stay committed.
    pub async fn reconcile_contents(&self, contents: &str) -> Result<ReconSummary, ReconError> {
        let mut reader = ReportReader::new(contents.as_bytes());
        let mut summary = ReconSummary::default();

        for section in ReportSection::ALL {
            let records = reader.next_section()?;
            debug!(section = section.as_str(), records = records.len(), "Section parsed");
            summary.sections.push(SectionCount {
                section,
                records: records.len(),
            });

            if section != ReportSection::ClearingReceived {
                continue;
            }
            for raw in records {
                match self.reconcile_record(raw).await? {
                    RecordOutcome::Skipped(_) => summary.skipped += 1,
                    RecordOutcome::Created { .. } => summary.created += 1,
                    RecordOutcome::NotificationFailed { .. } => {
                        summary.created += 1;
                        summary.notification_failures += 1;
                    }
                }
            }
        }

        info!(
            created = summary.created,
            skipped = summary.skipped,
            notification_failures = summary.notification_failures,
            "Reconciliation finished"
        );
        Ok(summary)
    }

    /// Reconcile one record received by the clearing network.
    pub async fn reconcile_record(&self, raw: RawRecord) -> Result<RecordOutcome, ReconError> {
        let record = ReportRecord::from_raw(&raw)?;

        if !record.is_for_institution(&self.settings.local_prefix) {
            return Ok(RecordOutcome::Skipped(SkipReason::OtherInstitution));
        }
        if self
            .transaction_repository
            .find_by_order_and_tracking_key(record.order_id, &record.tracking_key)
            .await?
            .is_some()
        {
            return Ok(RecordOutcome::Skipped(SkipReason::AlreadyKnown));
        }

        let order_id = record.order_id;
        let tx = Transaction::new(record.into_new_transaction());
        let tx = self.transaction_repository.insert(&tx).await?;
        let created = Event::new(
            tx.id,
            EventType::Reconciled,
            format!("Created by recon: {}", Value::Object(raw)),
        );
        self.transaction_repository.append_event(&created).await?;
        info!(transaction_id = %tx.id, order_id, tracking_key = %tx.tracking_key, "Transaction created by recon");

        let failure = match self.notifier.send_transaction(&tx).await {
            Ok(response) if !response.is_failed() => None,
            Ok(response) => Some(serde_json::to_string(&response)?),
            Err(e) => Some(e.to_string()),
        };
        match failure {
            None => Ok(RecordOutcome::Created {
                transaction_id: tx.id,
            }),
            Some(metadata) => {
                let transaction_id = self
                    .mark_failed(order_id, &tx.tracking_key, metadata)
                    .await?;
                Ok(RecordOutcome::NotificationFailed { transaction_id })
            }
        }
    }

    /// Order ids repeat across transactions, so the re-fetch is keyed on the
    /// (order id, tracking key) pair.
    async fn mark_failed(
        &self,
        order_id: i64,
        tracking_key: &str,
        metadata: String,
    ) -> Result<Uuid, ReconError> {
        let tx = self
            .transaction_repository
            .find_by_order_and_tracking_key(order_id, tracking_key)
            .await?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("order {} / {}", order_id, tracking_key))
            })?;
        warn!(transaction_id = %tx.id, order_id, response = %metadata, "Downstream callback failed");

        self.transaction_repository
            .apply(&TransactionUpdate {
                transaction_id: tx.id,
                order_id: None,
                status: Some(TransactionStatus::Failed),
                events: vec![Event::new(tx.id, EventType::NotificationFailed, metadata)],
            })
            .await?;
        Ok(tx.id)
    }

    async fn recon_file(&self, path: &Path) -> Result<ReconSummary, ReconError> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|source| ReconError::Stage {
                path: path.to_path_buf(),
                source,
            })?;
        self.reconcile_contents(&contents).await
    }

    fn report(&self, result: Result<ReconSummary, ReconError>) -> Result<ReconSummary, ReconError> {
        if let Err(e) = &result {
            self.error_reporter.capture(e);
        }
        result
    }
}
