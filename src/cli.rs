use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::OrderFields;
use crate::recon::{ParseError, ReportReader, ReportSection};
use crate::use_cases::OrderOutcome;
use crate::AppState;

#[derive(Parser)]
#[command(name = "speid-core")]
#[command(about = "SPEI order submission and daily report reconciliation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Order submission commands
    #[command(subcommand)]
    Order(OrderCommands),

    /// Report reconciliation commands
    #[command(subcommand)]
    Recon(ReconCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// Submit one order read from a JSON file
    Send {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Reconcile the latest report, or a local copy of one
    Run {
        /// Skip the download and reconcile this file
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Parse a report and print per-section record counts without touching the store
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_order_send(state: &AppState, file: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let fields: OrderFields = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid order", file.display()))?;

    match state.send_order.execute(fields).await? {
        OrderOutcome::Confirmed {
            transaction_id,
            order_id,
        } => println!("✓ Order {} confirmed (transaction {})", order_id, transaction_id),
        OrderOutcome::Requeued { transaction_id } => {
            println!("⚠ Order not confirmed, queued for retry (transaction {})", transaction_id)
        }
    }
    Ok(())
}

pub async fn handle_recon_run(state: &AppState, file: Option<&Path>) -> anyhow::Result<()> {
    let summary = match file {
        Some(path) => state.reconcile.reconcile_file(path).await?,
        None => state.reconcile.run().await?,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!(
        "✓ Reconciliation finished: {} created, {} skipped, {} callback failures",
        summary.created, summary.skipped, summary.notification_failures
    );
    Ok(())
}

pub async fn handle_recon_parse(file: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    for (section, records) in section_counts(&contents)? {
        println!("  {:<40} {}", section.as_str(), records);
    }
    println!("✓ Report is well formed");
    Ok(())
}

fn section_counts(contents: &str) -> Result<Vec<(ReportSection, usize)>, ParseError> {
    let mut reader = ReportReader::new(contents.as_bytes());
    ReportSection::ALL
        .iter()
        .map(|section| Ok((*section, reader.next_section()?.len())))
        .collect()
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;
    println!("✓ Database migrations completed");

    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  Redis URL: {}", mask_password(&config.redis_url));
    println!("  Clearing API URL: {}", config.clearing_api_url);
    println!("  Callback URL: {}", config.callback_url);
    println!("  Callback Secret: {}", mask_secret(&config.callback_secret));
    println!("  STP Prefix: {}", config.stp_prefix);
    println!(
        "  Report: s3://{}/{} ({}) -> {}",
        config.recon.bucket,
        config.recon.key,
        config.recon.region,
        config.recon.report_path.display()
    );
    if let Some(endpoint) = &config.recon.endpoint {
        println!("  Report Endpoint: {}", endpoint);
    }
    println!(
        "  Report Access Key: {}",
        mask_secret(&config.recon.access_key_id)
    );

    crate::startup::validate_env_vars(config)?;

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}

fn mask_secret(secret: &str) -> String {
    match secret.get(..4) {
        Some(head) if secret.len() > 8 => format!("{}****", head),
        _ => "****".to_string(),
    }
}
