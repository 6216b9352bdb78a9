use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use storefront::config::Config;
use storefront::db::{self, AppState, DbPool, queries, seed};
use storefront::handlers;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Product lookup API and promotion catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Load products, vouchers and promotions from a JSON file
    Seed {
        file: PathBuf,
    },
    /// Enable or disable a promotion and record it in the action log
    SetPromotionEnabled {
        id: String,
        #[arg(long, action = ArgAction::Set)]
        enabled: bool,
        /// Partner program id recorded with the change
        #[arg(long)]
        pmm_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let pool = db::create_pool(&config.database_path, config.database_pool_size)
        .with_context(|| format!("failed to open database at {}", config.database_path))?;
    {
        let conn = pool.get()?;
        db::init_db(&conn).context("failed to initialize schema")?;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pool).await,
        Command::Seed { file } => seed_from_file(&pool, &file),
        Command::SetPromotionEnabled {
            id,
            enabled,
            pmm_id,
        } => {
            let conn = pool.get()?;
            let promotion = queries::set_promotion_enabled(&conn, &id, enabled, &pmm_id)?;
            tracing::info!(
                "Promotion {} is now {} (revision {})",
                promotion.id,
                if enabled { "enabled" } else { "disabled" },
                promotion.revision
            );
            Ok(())
        }
    }
}

fn seed_from_file(pool: &DbPool, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let data: seed::SeedData = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid seed document", file.display()))?;

    let mut conn = pool.get()?;
    let summary = seed::load_seed(&mut conn, &data)?;
    tracing::info!(
        "Seeded {} products, {} vouchers, {} voucher codes, {} promotions",
        summary.products,
        summary.vouchers,
        summary.voucher_codes,
        summary.promotions
    );
    Ok(())
}

async fn serve(config: Config, pool: DbPool) -> anyhow::Result<()> {
    let state = AppState::new(pool);

    let mut app = handlers::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.dev_mode {
        tracing::warn!("Running in dev mode: CORS is permissive");
        app = app.layer(CorsLayer::permissive());
    }

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
