//! Outgoing transfer orders.
//!
//! Upstream producers send snake_case field names; the clearing network
//! expects camelCase. The mapping is spelled out field by field in the
//! serde attributes of [`OrderFields`] and [`OrderRequest`].

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::transaction::NewTransaction;

/// Order as received from the producer, snake_case keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFields {
    #[serde(rename = "clave_rastreo")]
    pub tracking_key: String,
    #[serde(rename = "concepto_pago")]
    pub payment_concept: String,
    #[serde(rename = "referencia_numerica")]
    pub numeric_reference: i64,
    #[serde(rename = "monto")]
    pub amount: BigDecimal,
    #[serde(rename = "institucion_ordenante")]
    pub originator_institution: String,
    #[serde(rename = "nombre_ordenante", default)]
    pub originator_name: Option<String>,
    #[serde(rename = "cuenta_ordenante", default)]
    pub originator_account: Option<String>,
    #[serde(rename = "tipo_cuenta_ordenante", default)]
    pub originator_account_type: Option<String>,
    #[serde(rename = "rfc_curp_ordenante", default)]
    pub originator_tax_id: Option<String>,
    #[serde(rename = "institucion_beneficiaria")]
    pub beneficiary_institution: String,
    #[serde(rename = "nombre_beneficiario")]
    pub beneficiary_name: String,
    #[serde(rename = "cuenta_beneficiario")]
    pub beneficiary_account: String,
    #[serde(rename = "tipo_cuenta_beneficiario")]
    pub beneficiary_account_type: String,
    #[serde(rename = "rfc_curp_beneficiario", default)]
    pub beneficiary_tax_id: Option<String>,
    #[serde(rename = "empresa", default)]
    pub company: Option<String>,
}

/// Order in the clearing network's naming convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(rename = "claveRastreo")]
    pub tracking_key: String,
    #[serde(rename = "conceptoPago")]
    pub payment_concept: String,
    #[serde(rename = "referenciaNumerica")]
    pub numeric_reference: i64,
    #[serde(rename = "monto")]
    pub amount: BigDecimal,
    #[serde(rename = "institucionOrdenante")]
    pub originator_institution: String,
    #[serde(rename = "nombreOrdenante", skip_serializing_if = "Option::is_none", default)]
    pub originator_name: Option<String>,
    #[serde(rename = "cuentaOrdenante", skip_serializing_if = "Option::is_none", default)]
    pub originator_account: Option<String>,
    #[serde(rename = "tipoCuentaOrdenante", skip_serializing_if = "Option::is_none", default)]
    pub originator_account_type: Option<String>,
    #[serde(rename = "rfcCurpOrdenante", skip_serializing_if = "Option::is_none", default)]
    pub originator_tax_id: Option<String>,
    #[serde(rename = "institucionBeneficiaria")]
    pub beneficiary_institution: String,
    #[serde(rename = "nombreBeneficiario")]
    pub beneficiary_name: String,
    #[serde(rename = "cuentaBeneficiario")]
    pub beneficiary_account: String,
    #[serde(rename = "tipoCuentaBeneficiario")]
    pub beneficiary_account_type: String,
    #[serde(rename = "rfcCurpBeneficiario", skip_serializing_if = "Option::is_none", default)]
    pub beneficiary_tax_id: Option<String>,
    #[serde(rename = "empresa", skip_serializing_if = "Option::is_none", default)]
    pub company: Option<String>,
}

impl From<&OrderFields> for OrderRequest {
    fn from(fields: &OrderFields) -> Self {
        let fields = fields.clone();
        Self {
            tracking_key: fields.tracking_key,
            payment_concept: fields.payment_concept,
            numeric_reference: fields.numeric_reference,
            amount: fields.amount,
            originator_institution: fields.originator_institution,
            originator_name: fields.originator_name,
            originator_account: fields.originator_account,
            originator_account_type: fields.originator_account_type,
            originator_tax_id: fields.originator_tax_id,
            beneficiary_institution: fields.beneficiary_institution,
            beneficiary_name: fields.beneficiary_name,
            beneficiary_account: fields.beneficiary_account,
            beneficiary_account_type: fields.beneficiary_account_type,
            beneficiary_tax_id: fields.beneficiary_tax_id,
            company: fields.company,
        }
    }
}

impl From<&OrderFields> for NewTransaction {
    fn from(fields: &OrderFields) -> Self {
        Self {
            order_id: None,
            tracking_key: fields.tracking_key.clone(),
            payment_concept: Some(fields.payment_concept.clone()),
            numeric_reference: Some(fields.numeric_reference),
            amount: fields.amount.clone(),
            originator_institution: Some(fields.originator_institution.clone()),
            originator_name: fields.originator_name.clone(),
            originator_account: fields.originator_account.clone(),
            originator_account_type: fields.originator_account_type.clone(),
            originator_tax_id: fields.originator_tax_id.clone(),
            beneficiary_institution: Some(fields.beneficiary_institution.clone()),
            beneficiary_name: Some(fields.beneficiary_name.clone()),
            beneficiary_account: fields.beneficiary_account.clone(),
            beneficiary_account_type: Some(fields.beneficiary_account_type.clone()),
            beneficiary_tax_id: fields.beneficiary_tax_id.clone(),
            raw: serde_json::to_value(fields).ok(),
        }
    }
}

/// Response of the clearing network's order registration call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OrderResponse {
    /// The network signals rejection with `0` or a negative id.
    pub fn is_success(&self) -> bool {
        self.id > 0
    }
}

/// Where an order stands in the submission flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Received,
    Submitted,
    Confirmed,
    SubmissionFailed,
}
