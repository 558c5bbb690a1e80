//! Concrete implementations of the ports in `crate::ports`.

pub mod callback_client;
pub mod clearing_client;
pub mod memory;
pub mod postgres_transaction_repository;
pub mod redis_retry_queue;
pub mod s3_report_store;
pub mod telemetry;

pub use callback_client::HttpTransactionNotifier;
pub use clearing_client::HttpClearingClient;
pub use memory::{InMemoryRetryQueue, InMemoryTransactionRepository};
pub use postgres_transaction_repository::PostgresTransactionRepository;
pub use redis_retry_queue::RedisRetryQueue;
pub use s3_report_store::{S3Credentials, S3ReportStore};
pub use telemetry::TracingErrorReporter;
