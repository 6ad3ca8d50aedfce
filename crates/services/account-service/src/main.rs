//! Account Service - operator CLI for the account store.

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_service_lib::config::AccountServiceConfig;
use account_service_lib::infra::Database;
use account_service_lib::{CacheStatus, MigrateAction};
use domain::{DEFAULT_ACTIVITY_WINDOW_HOURS, DEFAULT_LEADERBOARD_SIZE};

#[derive(Parser)]
#[command(name = "account-service")]
#[command(about = "User account store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Check database and cache connectivity
    Check,
    /// Vacuum and analyze the account table
    Optimize,
    /// Print store-wide totals
    Stats {
        #[arg(long, default_value_t = DEFAULT_ACTIVITY_WINDOW_HOURS)]
        window_hours: i64,
    },
    /// Print the top earners
    Leaders {
        #[arg(long, default_value_t = DEFAULT_LEADERBOARD_SIZE)]
        limit: u64,
    },
    /// Print one account as JSON
    Show { user_id: String },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AccountServiceConfig::from_env();

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            account_service_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::Check => {
            let db = Database::connect_without_migrations(&config.database).await?;
            db.ping().await?;
            println!("database: ok");
            db.close().await?;

            match account_service_lib::check_cache(config.cache.as_ref()).await? {
                CacheStatus::Reachable(_) => println!("cache: ok"),
                CacheStatus::Disabled => println!("cache: disabled"),
            }
        }
        Commands::Optimize => {
            let db = Database::connect_without_migrations(&config.database).await?;
            db.optimize().await?;
            db.close().await?;
        }
        Commands::Stats { window_hours } => {
            let ctx = account_service_lib::connect(&config).await?;
            let stats = ctx.service.stats(Utc::now(), Some(window_hours)).await?;

            println!("Total accounts: {}", stats.total_accounts);
            println!("Active accounts ({}h): {}", window_hours, stats.active_accounts);
            println!("Total earned: {}", stats.total_earned);
        }
        Commands::Leaders { limit } => {
            let ctx = account_service_lib::connect(&config).await?;
            let leaders = ctx.service.leaderboard(limit).await?;

            for (rank, entry) in leaders.iter().enumerate() {
                println!("{}. {}: {}", rank + 1, entry.display_name(), entry.total_earned);
            }
        }
        Commands::Show { user_id } => {
            let ctx = account_service_lib::connect(&config).await?;
            let account = ctx.service.get_account(&user_id).await?;

            println!("{}", serde_json::to_string_pretty(&account)?);
        }
    }

    Ok(())
}
