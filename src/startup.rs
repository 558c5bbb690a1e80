use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;

use crate::adapters::{
    HttpClearingClient, HttpTransactionNotifier, PostgresTransactionRepository, RedisRetryQueue,
    S3Credentials, S3ReportStore, TracingErrorReporter,
};
use crate::config::Config;
use crate::ports::TransactionRepository;
use crate::use_cases::{ReconSettings, ReconcileReport, SendOrder};
use crate::AppState;

/// Wire the production adapters into the use cases.
pub fn build_state(config: &Config, pool: PgPool) -> Result<AppState> {
    let repository: Arc<dyn TransactionRepository> =
        Arc::new(PostgresTransactionRepository::new(pool));

    let retry_queue =
        RedisRetryQueue::new(&config.redis_url).context("Failed to create Redis client")?;
    let clearing_client = HttpClearingClient::new(config.clearing_api_url.clone());
    let send_order = SendOrder::new(
        repository.clone(),
        Arc::new(clearing_client),
        Arc::new(retry_queue),
    );

    let report_store = S3ReportStore::new(
        config.recon.bucket.clone(),
        config.recon.region.clone(),
        config.recon.endpoint.clone(),
        S3Credentials {
            access_key_id: config.recon.access_key_id.clone(),
            secret_access_key: config.recon.secret_access_key.clone(),
        },
    )
    .context("Invalid report store configuration")?;
    let notifier =
        HttpTransactionNotifier::new(config.callback_url.clone(), config.callback_secret.clone());
    let reconcile = ReconcileReport::new(
        repository.clone(),
        Arc::new(notifier),
        Arc::new(report_store),
        Arc::new(TracingErrorReporter),
        ReconSettings {
            report_key: config.recon.key.clone(),
            report_path: config.recon.report_path.clone(),
            local_prefix: config.stp_prefix.clone(),
        },
    );

    Ok(AppState {
        repository,
        send_order: Arc::new(send_order),
        reconcile: Arc::new(reconcile),
    })
}

pub fn validate_env_vars(config: &Config) -> Result<()> {
    if config.database_url.is_empty() {
        anyhow::bail!("DATABASE_URL is empty");
    }
    if config.redis_url.is_empty() {
        anyhow::bail!("REDIS_URL is empty");
    }
    if config.callback_secret.is_empty() {
        anyhow::bail!("CALLBACK_SECRET is empty");
    }
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }
    if config.stp_prefix.is_empty() || !config.stp_prefix.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("STP_PREFIX must be a non-empty run of digits");
    }
    if config.recon.bucket.is_empty() {
        anyhow::bail!("RECON_BUCKET is empty");
    }

    url::Url::parse(&config.clearing_api_url).context("CLEARING_API_URL is not a valid URL")?;
    url::Url::parse(&config.callback_url).context("CALLBACK_URL is not a valid URL")?;
    url::Url::parse(&config.redis_url).context("REDIS_URL is not a valid URL")?;
    if let Some(endpoint) = &config.recon.endpoint {
        url::Url::parse(endpoint).context("RECON_ENDPOINT is not a valid URL")?;
    }

    Ok(())
}

/// Log the reachability of the retry queue; the server starts either way.
pub async fn check_redis(redis_url: &str) {
    let result = match RedisRetryQueue::new(redis_url) {
        Ok(queue) => queue.ping().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => tracing::info!("Redis reachable"),
        Err(e) => tracing::warn!(error = %e, "Redis unreachable; failed orders cannot be re-queued"),
    }
}
