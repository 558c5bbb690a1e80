use anyhow::Context;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_RECON_KEY: &str = "reports/report.txt";
pub const DEFAULT_RECON_REGION: &str = "us-east-1";
pub const DEFAULT_RECON_REPORT_PATH: &str = "/tmp/report.txt";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub clearing_api_url: String,
    pub callback_url: String,
    pub callback_secret: String,
    /// Account prefix that marks a report record as ours.
    pub stp_prefix: String,
    pub recon: ReconConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReconConfig {
    pub bucket: String,
    pub key: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub report_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            clearing_api_url: required("CLEARING_API_URL")?,
            callback_url: required("CALLBACK_URL")?,
            callback_secret: required("CALLBACK_SECRET")?,
            stp_prefix: required("STP_PREFIX")?,
            recon: ReconConfig {
                bucket: required("RECON_BUCKET")?,
                key: optional("RECON_KEY").unwrap_or_else(|| DEFAULT_RECON_KEY.to_string()),
                region: optional("RECON_REGION")
                    .unwrap_or_else(|| DEFAULT_RECON_REGION.to_string()),
                endpoint: optional("RECON_ENDPOINT"),
                access_key_id: required("RECON_AWS_ACCESS_KEY_ID")?,
                secret_access_key: required("RECON_AWS_SECRET_ACCESS_KEY")?,
                report_path: optional("RECON_REPORT_PATH")
                    .unwrap_or_else(|| DEFAULT_RECON_REPORT_PATH.to_string())
                    .into(),
            },
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{} must be set", name))
}

/// Unset and blank are the same thing.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
