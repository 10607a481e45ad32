use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use spendwise::cli::{Cli, Commands};
use spendwise::errors::Result;
use spendwise::scheduler::GenerationScheduler;
use spendwise::config::{self, database};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;

    // 4. Connect to the database
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    match cli.command {
        Commands::InitDb => {
            database::create_tables(&db)
                .await
                .inspect(|()| info!("Database schema created."))
                .inspect_err(|e| error!("Failed to create database schema: {}", e))?;
        }
        Commands::Generate => {
            let scheduler = GenerationScheduler::new(db);
            match scheduler.try_run_once(Utc::now().date_naive()).await? {
                Some(result) => info!(
                    "Manual generation run finished: {} occurrence(s) created across {} template(s).",
                    result.generated_count, result.templates_processed
                ),
                None => info!("A generation run is already in progress; nothing to do."),
            }
        }
        Commands::Serve => {
            // Schema creation is idempotent; run it so a fresh deployment
            // can start straight from `serve`.
            database::create_tables(&db).await?;

            let scheduler = GenerationScheduler::new(db);
            scheduler.run(app_config.generation_interval).await;
        }
    }

    Ok(())
}
