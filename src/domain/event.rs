use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::transaction::UnknownVariant;

/// Lifecycle marker appended to a transaction's history.
///
/// Stored names match the existing event trail: submission markers are
/// uppercase, reconciliation markers lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "COMPLETE")]
    Complete,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "created")]
    Reconciled,
    #[serde(rename = "error")]
    NotificationFailed,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Create => "CREATE",
            EventType::Complete => "COMPLETE",
            EventType::Error => "ERROR",
            EventType::Reconciled => "created",
            EventType::NotificationFailed => "error",
        }
    }
}

impl FromStr for EventType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(EventType::Create),
            "COMPLETE" => Ok(EventType::Complete),
            "ERROR" => Ok(EventType::Error),
            "created" => Ok(EventType::Reconciled),
            "error" => Ok(EventType::NotificationFailed),
            other => Err(UnknownVariant {
                kind: "event type",
                value: other.to_string(),
            }),
        }
    }
}

/// Immutable history entry owned by a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub event_type: EventType,
    pub metadata: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(transaction_id: Uuid, event_type: EventType, metadata: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            event_type,
            metadata: metadata.into(),
            created_at: Utc::now(),
        }
    }
}
