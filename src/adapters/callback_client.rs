use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use std::time::Duration;

use crate::domain::Transaction;
use crate::ports::{CallbackResponse, NotifyError, TransactionNotifier};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Speid-Signature";

/// Posts reconciled transactions to the downstream service, signing each
/// body with HMAC-SHA256.
#[derive(Clone)]
pub struct HttpTransactionNotifier {
    client: Client,
    callback_url: String,
    secret: String,
}

impl HttpTransactionNotifier {
    pub fn new(callback_url: String, secret: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            callback_url,
            secret,
        }
    }
}

/// Hex HMAC-SHA256 of `body`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, NotifyError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| NotifyError::InvalidResponse(format!("invalid signing key: {}", e)))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl TransactionNotifier for HttpTransactionNotifier {
    async fn send_transaction(&self, tx: &Transaction) -> Result<CallbackResponse, NotifyError> {
        let body = serde_json::to_vec(tx)
            .map_err(|e| NotifyError::InvalidResponse(format!("unencodable transaction: {}", e)))?;
        let signature = sign(&self.secret, &body)?;

        let response = self
            .client
            .post(&self.callback_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        serde_json::from_str::<CallbackResponse>(&text)
            .map_err(|e| NotifyError::InvalidResponse(format!("{} ({}): {}", status, e, text)))
    }
}
