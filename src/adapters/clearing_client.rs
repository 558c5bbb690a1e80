use async_trait::async_trait;
use failsafe::futures::CircuitBreaker as FuturesCircuitBreaker;
use failsafe::{backoff, failure_policy, Config, Error as FailsafeError, StateMachine};
use reqwest::Client;
use std::time::Duration;

use crate::domain::{OrderRequest, OrderResponse};
use crate::ports::{ClearingClient, ClearingError};

const REGISTER_PATH: &str = "ordenPago/registra";

/// HTTP client for the clearing network's order registration endpoint
#[derive(Clone)]
pub struct HttpClearingClient {
    client: Client,
    base_url: String,
    circuit_breaker: StateMachine<failure_policy::ConsecutiveFailures<backoff::EqualJittered>, ()>,
}

impl HttpClearingClient {
    pub fn new(base_url: String) -> Self {
        Self::with_circuit_breaker(base_url, 3, 60)
    }

    /// Creates a client that opens its circuit after `failure_threshold`
    /// consecutive transport failures
    pub fn with_circuit_breaker(
        base_url: String,
        failure_threshold: u32,
        reset_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        let backoff = backoff::equal_jittered(
            Duration::from_secs(reset_timeout_secs),
            Duration::from_secs(reset_timeout_secs * 2),
        );
        let policy = failure_policy::consecutive_failures(failure_threshold, backoff);
        let circuit_breaker = Config::new().failure_policy(policy).build();

        HttpClearingClient {
            client,
            base_url,
            circuit_breaker,
        }
    }

    pub fn circuit_state(&self) -> String {
        if self.circuit_breaker.is_call_permitted() {
            "closed".to_string()
        } else {
            "open".to_string()
        }
    }
}

#[async_trait]
impl ClearingClient for HttpClearingClient {
    async fn register_order(&self, order: &OrderRequest) -> Result<OrderResponse, ClearingError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), REGISTER_PATH);
        let client = self.client.clone();
        let body = serde_json::to_value(order)
            .map_err(|e| ClearingError::InvalidResponse(format!("unencodable order: {}", e)))?;

        let result = self
            .circuit_breaker
            .call(async move {
                let response = client.put(&url).json(&body).send().await?;
                let status = response.status();
                if status.is_server_error() {
                    return Err(ClearingError::InvalidResponse(format!(
                        "clearing network returned {}",
                        status
                    )));
                }

                let text = response.text().await?;
                serde_json::from_str::<OrderResponse>(&text).map_err(|e| {
                    ClearingError::InvalidResponse(format!("{} ({}): {}", status, e, text))
                })
            })
            .await;

        match result {
            Ok(response) => Ok(response),
            Err(FailsafeError::Rejected) => Err(ClearingError::CircuitBreakerOpen(
                "clearing network circuit breaker is open".to_string(),
            )),
            Err(FailsafeError::Inner(e)) => Err(e),
        }
    }
}
