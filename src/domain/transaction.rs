//! Transaction domain entity.
//! Framework-agnostic representation of a SPEI transfer as recorded locally.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Created,
    Submitted,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Created => "created",
            TransactionStatus::Submitted => "submitted",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(TransactionStatus::Created),
            "submitted" => Ok(TransactionStatus::Submitted),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(UnknownVariant {
                kind: "transaction status",
                value: other.to_string(),
            }),
        }
    }
}

/// Field set for a transaction that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub order_id: Option<i64>,
    pub tracking_key: String,
    pub payment_concept: Option<String>,
    pub numeric_reference: Option<i64>,
    pub amount: BigDecimal,
    pub originator_institution: Option<String>,
    pub originator_name: Option<String>,
    pub originator_account: Option<String>,
    pub originator_account_type: Option<String>,
    pub originator_tax_id: Option<String>,
    pub beneficiary_institution: Option<String>,
    pub beneficiary_name: Option<String>,
    pub beneficiary_account: String,
    pub beneficiary_account_type: Option<String>,
    pub beneficiary_tax_id: Option<String>,
    pub raw: Option<serde_json::Value>,
}

/// Domain entity representing a transaction.
///
/// `(order_id, tracking_key)` identifies a transfer known to the clearing
/// network. `order_id` stays empty until the network confirms the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub order_id: Option<i64>,
    pub tracking_key: String,
    pub payment_concept: Option<String>,
    pub numeric_reference: Option<i64>,
    pub amount: BigDecimal,
    pub originator_institution: Option<String>,
    pub originator_name: Option<String>,
    pub originator_account: Option<String>,
    pub originator_account_type: Option<String>,
    pub originator_tax_id: Option<String>,
    pub beneficiary_institution: Option<String>,
    pub beneficiary_name: Option<String>,
    pub beneficiary_account: String,
    pub beneficiary_account_type: Option<String>,
    pub beneficiary_tax_id: Option<String>,
    pub status: TransactionStatus,
    pub raw: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(draft: NewTransaction) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_id: draft.order_id,
            tracking_key: draft.tracking_key,
            payment_concept: draft.payment_concept,
            numeric_reference: draft.numeric_reference,
            amount: draft.amount,
            originator_institution: draft.originator_institution,
            originator_name: draft.originator_name,
            originator_account: draft.originator_account,
            originator_account_type: draft.originator_account_type,
            originator_tax_id: draft.originator_tax_id,
            beneficiary_institution: draft.beneficiary_institution,
            beneficiary_name: draft.beneficiary_name,
            beneficiary_account: draft.beneficiary_account,
            beneficiary_account_type: draft.beneficiary_account_type,
            beneficiary_tax_id: draft.beneficiary_tax_id,
            status: TransactionStatus::Created,
            raw: draft.raw,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Atomic mutation of an existing transaction: attach an order id, move
/// the status, append events. Stores apply all of it or nothing.
#[derive(Debug, Clone)]
pub struct TransactionUpdate {
    pub transaction_id: Uuid,
    pub order_id: Option<i64>,
    pub status: Option<TransactionStatus>,
    pub events: Vec<Event>,
}

impl TransactionUpdate {
    pub fn events(transaction_id: Uuid, events: Vec<Event>) -> Self {
        Self {
            transaction_id,
            order_id: None,
            status: None,
            events,
        }
    }
}
