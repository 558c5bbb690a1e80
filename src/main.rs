use clap::Parser;
use speid_core::cli::{Cli, Commands, DbCommands, OrderCommands, ReconCommands};
use speid_core::config::Config;
use speid_core::{cli, create_app, db, startup};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Cli::parse();

    // `recon parse` only reads a local file and runs without configuration.
    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(Config::from_env()?).await,
        Commands::Order(OrderCommands::Send { file }) => {
            let state = connect(&Config::from_env()?).await?;
            cli::handle_order_send(&state, &file).await
        }
        Commands::Recon(ReconCommands::Run { file }) => {
            let state = connect(&Config::from_env()?).await?;
            cli::handle_recon_run(&state, file.as_deref()).await
        }
        Commands::Recon(ReconCommands::Parse { file }) => cli::handle_recon_parse(&file).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&Config::from_env()?).await,
        Commands::Config => cli::handle_config_validate(&Config::from_env()?),
    }
}

/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect(config: &Config) -> anyhow::Result<speid_core::AppState> {
    startup::validate_env_vars(config)?;
    let pool = db::create_pool(config).await?;
    startup::build_state(config, pool)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    startup::validate_env_vars(&config)?;

    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;
    startup::check_redis(&config.redis_url).await;

    let state = startup::build_state(&config, pool)?;
    tracing::info!(
        clearing_api_url = %config.clearing_api_url,
        stp_prefix = %config.stp_prefix,
        "Services initialized"
    );

    let app = create_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
