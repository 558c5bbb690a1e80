//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::domain::{
    Event, EventType, Transaction, TransactionStatus, TransactionUpdate, UnknownVariant,
};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

const TRANSACTION_COLUMNS: &str = "id, order_id, tracking_key, payment_concept, numeric_reference, \
     amount, originator_institution, originator_name, originator_account, originator_account_type, \
     originator_tax_id, beneficiary_institution, beneficiary_name, beneficiary_account, \
     beneficiary_account_type, beneficiary_tax_id, status, raw, created_at, updated_at";

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        let sql = format!(
            r#"
            INSERT INTO transactions ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING {columns}
            "#,
            columns = TRANSACTION_COLUMNS
        );
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(tx.id)
            .bind(tx.order_id)
            .bind(&tx.tracking_key)
            .bind(&tx.payment_concept)
            .bind(tx.numeric_reference)
            .bind(&tx.amount)
            .bind(&tx.originator_institution)
            .bind(&tx.originator_name)
            .bind(&tx.originator_account)
            .bind(&tx.originator_account_type)
            .bind(&tx.originator_tax_id)
            .bind(&tx.beneficiary_institution)
            .bind(&tx.beneficiary_name)
            .bind(&tx.beneficiary_account)
            .bind(&tx.beneficiary_account_type)
            .bind(&tx.beneficiary_tax_id)
            .bind(tx.status.as_str())
            .bind(&tx.raw)
            .bind(tx.created_at)
            .bind(tx.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                duplicate_or(e, || {
                    format!("order {:?} with tracking key {}", tx.order_id, tx.tracking_key)
                })
            })?;

        row.into_domain()
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&select_where("id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_domain()
    }

    async fn find_by_order_and_tracking_key(
        &self,
        order_id: i64,
        tracking_key: &str,
    ) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&select_where(
            "order_id = $1 AND tracking_key = $2",
        ))
        .bind(order_id)
        .bind(tracking_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn append_event(&self, event: &Event) -> RepositoryResult<()> {
        insert_event(&self.pool, event).await
    }

    async fn apply(&self, update: &TransactionUpdate) -> RepositoryResult<()> {
        let mut db_tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET order_id = COALESCE($2, order_id),
                status = COALESCE($3, status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(update.transaction_id)
        .bind(update.order_id)
        .bind(update.status.map(|s| s.as_str()))
        .execute(&mut *db_tx)
        .await
        .map_err(|e| {
            duplicate_or(e, || {
                format!(
                    "order {:?} for transaction {}",
                    update.order_id, update.transaction_id
                )
            })
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(update.transaction_id.to_string()));
        }

        for event in &update.events {
            insert_event(&mut *db_tx, event).await?;
        }

        db_tx.commit().await?;
        Ok(())
    }

    async fn list_events(&self, transaction_id: Uuid) -> RepositoryResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, transaction_id, event_type, metadata, created_at
            FROM events
            WHERE transaction_id = $1
            ORDER BY created_at, seq
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EventRow::into_domain).collect()
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn select_where(clause: &str) -> String {
    format!(
        "SELECT {} FROM transactions WHERE {} ORDER BY created_at LIMIT 1",
        TRANSACTION_COLUMNS, clause
    )
}

async fn insert_event<'e>(executor: impl PgExecutor<'e>, event: &Event) -> RepositoryResult<()> {
    sqlx::query(
        r#"
        INSERT INTO events (id, transaction_id, event_type, metadata, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(event.id)
    .bind(event.transaction_id)
    .bind(event.event_type.as_str())
    .bind(event.metadata.clone())
    .bind(event.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Unique-index violations become `Duplicate`; anything else stays a database error.
fn duplicate_or(error: sqlx::Error, describe: impl FnOnce() -> String) -> RepositoryError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return RepositoryError::Duplicate(describe());
        }
    }
    RepositoryError::Database(error)
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    order_id: Option<i64>,
    tracking_key: String,
    payment_concept: Option<String>,
    numeric_reference: Option<i64>,
    amount: bigdecimal::BigDecimal,
    originator_institution: Option<String>,
    originator_name: Option<String>,
    originator_account: Option<String>,
    originator_account_type: Option<String>,
    originator_tax_id: Option<String>,
    beneficiary_institution: Option<String>,
    beneficiary_name: Option<String>,
    beneficiary_account: String,
    beneficiary_account_type: Option<String>,
    beneficiary_tax_id: Option<String>,
    status: String,
    raw: Option<serde_json::Value>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let status: TransactionStatus = self
            .status
            .parse()
            .map_err(|e: UnknownVariant| RepositoryError::Corrupt(e.to_string()))?;

        Ok(Transaction {
            id: self.id,
            order_id: self.order_id,
            tracking_key: self.tracking_key,
            payment_concept: self.payment_concept,
            numeric_reference: self.numeric_reference,
            amount: self.amount,
            originator_institution: self.originator_institution,
            originator_name: self.originator_name,
            originator_account: self.originator_account,
            originator_account_type: self.originator_account_type,
            originator_tax_id: self.originator_tax_id,
            beneficiary_institution: self.beneficiary_institution,
            beneficiary_name: self.beneficiary_name,
            beneficiary_account: self.beneficiary_account,
            beneficiary_account_type: self.beneficiary_account_type,
            beneficiary_tax_id: self.beneficiary_tax_id,
            status,
            raw: self.raw,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    transaction_id: Uuid,
    event_type: String,
    metadata: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl EventRow {
    fn into_domain(self) -> RepositoryResult<Event> {
        let event_type: EventType = self
            .event_type
            .parse()
            .map_err(|e: UnknownVariant| RepositoryError::Corrupt(e.to_string()))?;

        Ok(Event {
            id: self.id,
            transaction_id: self.transaction_id,
            event_type,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}
