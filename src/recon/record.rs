use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::ParseError;
use super::normalize::{account_type_for, amount_from_minor_units, institution_prefix, RawRecord};
use crate::domain::NewTransaction;

/// Fields that only make sense on the clearing-network side.
const DROPPED_FIELDS: [&str; 3] = ["estado_orden", "institucion", "contraparte"];

/// A clearing-network record from the report, in clearing-network naming.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "id", deserialize_with = "lenient_i64")]
    pub order_id: i64,
    #[serde(rename = "rastreo")]
    pub tracking_key: String,
    #[serde(rename = "cuenta_ordenante", default)]
    pub originator_account: Option<String>,
    #[serde(rename = "cuenta_beneficiario")]
    pub beneficiary_account: String,
    #[serde(rename = "ordenante", default)]
    pub originator_name: Option<String>,
    #[serde(rename = "beneficiario", default)]
    pub beneficiary_name: Option<String>,
    #[serde(rename = "monto", deserialize_with = "lenient_i64")]
    pub amount_minor_units: i64,
    #[serde(rename = "rfc_curp_ordenante", default)]
    pub originator_tax_id: Option<String>,
    #[serde(rename = "rfc_curp_beneficiario", default)]
    pub beneficiary_tax_id: Option<String>,
    #[serde(rename = "concepto_pago", default)]
    pub payment_concept: Option<String>,
    #[serde(rename = "referencia_numerica", default, deserialize_with = "lenient_opt_i64")]
    pub numeric_reference: Option<i64>,
    /// Everything not mapped above, kept for audit.
    #[serde(flatten)]
    pub extra: RawRecord,
}

impl ReportRecord {
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ParseError> {
        let mut record: ReportRecord = serde_json::from_value(Value::Object(raw.clone()))
            .map_err(ParseError::InvalidRecord)?;
        for field in DROPPED_FIELDS {
            record.extra.remove(field);
        }
        Ok(record)
    }

    /// Whether the beneficiary account belongs to the given institution.
    pub fn is_for_institution(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.beneficiary_account.starts_with(prefix)
    }

    pub fn into_new_transaction(self) -> NewTransaction {
        let originator_account = self.originator_account.filter(|a| !a.is_empty());
        NewTransaction {
            order_id: Some(self.order_id),
            tracking_key: self.tracking_key,
            payment_concept: self.payment_concept,
            numeric_reference: self.numeric_reference,
            amount: amount_from_minor_units(self.amount_minor_units),
            originator_institution: originator_account.as_deref().and_then(institution_prefix),
            originator_name: self.originator_name,
            originator_account_type: originator_account.as_deref().and_then(account_type_for),
            originator_account,
            originator_tax_id: self.originator_tax_id,
            beneficiary_institution: institution_prefix(&self.beneficiary_account),
            beneficiary_name: self.beneficiary_name,
            beneficiary_account_type: account_type_for(&self.beneficiary_account),
            beneficiary_account: self.beneficiary_account,
            beneficiary_tax_id: self.beneficiary_tax_id,
            raw: Some(Value::Object(self.extra)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

impl NumberOrString {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected an integer, found {:?}", s))),
        }
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_i64()
}

fn lenient_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_i64)
        .transpose()
}
