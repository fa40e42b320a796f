use clap::{Parser, ValueEnum};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Action {
    /// Apply pending migrations.
    Up,
    /// Roll back the last migration.
    Down,
    /// Drop everything and re-apply all migrations.
    Fresh,
    /// Print applied and pending migrations.
    Status,
}

#[derive(Parser, Debug)]
#[command(name = "migration", about = "Manage the expenses schema")]
struct Cli {
    #[arg(value_enum, default_value = "up")]
    action: Action,

    /// Database connection string.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./expense_tracker.db?mode=rwc"
    )]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.action {
        Action::Up => migration::Migrator::up(&db, None).await?,
        Action::Down => migration::Migrator::down(&db, Some(1)).await?,
        Action::Fresh => migration::Migrator::fresh(&db).await?,
        Action::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
