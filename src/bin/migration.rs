use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use wishlist_api::{config, db, migrator::Migrator};

#[derive(Parser)]
#[command(name = "migration", about = "Manage the wishlist database schema", version)]
struct Cli {
    /// Overrides the configured database URL
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations (default)
    Up {
        /// Apply at most this many migrations
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop every table and reapply all migrations
    Fresh,
    /// Show which migrations are applied
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    info!("Connecting to database for migrations");
    let pool = db::establish_connection_from_app_config(&cfg).await?;

    let result = match cli.command.unwrap_or(Commands::Up { steps: None }) {
        Commands::Up { steps } => Migrator::up(&pool, steps).await,
        Commands::Down { steps } => Migrator::down(&pool, Some(steps)).await,
        Commands::Fresh => Migrator::fresh(&pool).await,
        Commands::Status => Migrator::status(&pool).await,
    };

    match result {
        Ok(()) => info!("Migration command completed successfully"),
        Err(e) => {
            error!("Migration command failed: {}", e);
            return Err(e.into());
        }
    }

    db::close_pool(pool).await?;
    Ok(())
}
