//! Database maintenance commands.

use std::path::PathBuf;

use clap::Subcommand;
use creatordb_core::AppConfig;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database answers queries
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load a fixture file into the database
    Seed {
        /// Fixture path (defaults to `CREATORDB_FIXTURE_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Connect with the configured pool settings and run one `db` command.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the connection fails, or the
/// command itself fails.
pub(crate) async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = creatordb_db::connect_from_app_config(config).await?;

    match command {
        DbCommands::Ping => {
            creatordb_db::ping(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = creatordb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { path } => {
            let path = path.unwrap_or_else(|| config.fixture_path.clone());
            run_seed(&pool, &path).await?;
        }
    }

    pool.close().await;
    Ok(())
}

async fn run_seed(pool: &sqlx::PgPool, path: &std::path::Path) -> anyhow::Result<()> {
    let fixture = creatordb_core::load_fixture(path)?;
    creatordb_db::run_migrations(pool).await?;
    let summary = creatordb_db::seed_fixture(pool, &fixture).await?;

    println!(
        "seeded {} niche(s), {} creator(s), {} AI recommendation(s) from {}",
        summary.niches,
        summary.creators,
        summary.ai_recommended,
        path.display()
    );
    Ok(())
}
