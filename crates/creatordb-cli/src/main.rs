mod browse;
mod db;
mod fixture;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use creatordb_core::{Mode, SortField, ViewMode};
use tracing_subscriber::EnvFilter;

use crate::browse::FilterArgs;
use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "creatordb-cli")]
#[command(about = "Creator discovery command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse creators with the same filters as the dashboard
    Creators {
        /// Record set to browse: ai or all
        #[arg(long, default_value = "ai")]
        mode: Mode,
        #[command(flatten)]
        filters: FilterArgs,
        /// Sort column: `match_score`, followers, `avg_views`, engagement
        #[arg(long)]
        sort: Option<SortField>,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
        /// Output layout: cards or list
        #[arg(long, default_value = "cards")]
        view: ViewMode,
        /// Show the full profile of one displayed creator
        #[arg(long)]
        detail: Option<String>,
        /// Print the email address of one creator
        #[arg(long)]
        email: Option<String>,
    },
    /// Print header metrics for a filtered creator set
    Metrics {
        /// Record set to summarise: ai or all
        #[arg(long, default_value = "ai")]
        mode: Mode,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List the niche catalogue
    Niches,
    /// Fixture file commands
    Fixture {
        #[command(subcommand)]
        command: FixtureCommands,
    },
    /// Database commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum FixtureCommands {
    /// Load and validate a fixture file, then print a summary
    Check {
        /// Fixture path (defaults to `CREATORDB_FIXTURE_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("creatordb-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = creatordb_core::load_app_config()?;

    match command {
        Commands::Creators {
            mode,
            filters,
            sort,
            asc,
            view,
            detail,
            email,
        } => {
            let source = creatordb_db::DataSource::from_app_config(&config).await?;
            let options = browse::BrowseOptions {
                mode,
                sort,
                ascending: asc,
                view,
                detail,
                email,
            };
            browse::run_creators(&source, &filters, &options).await?;
        }
        Commands::Metrics { mode, filters } => {
            let source = creatordb_db::DataSource::from_app_config(&config).await?;
            browse::run_metrics(&source, mode, &filters).await?;
        }
        Commands::Niches => {
            let source = creatordb_db::DataSource::from_app_config(&config).await?;
            browse::run_niches(&source).await?;
        }
        Commands::Fixture {
            command: FixtureCommands::Check { path },
        } => {
            let path = path.unwrap_or_else(|| config.fixture_path.clone());
            fixture::run_fixture_check(&path)?;
        }
        Commands::Db { command } => db::run_db(&config, command).await?,
    }

    Ok(())
}
