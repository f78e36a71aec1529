//! The creator data source shared by the server and the CLI.

use std::sync::Arc;

use creatordb_core::{
    apply_filters, load_fixture, AppConfig, ConfigError, Creator, FilterCriteria, Fixture, Mode,
    Niche, SourceKind,
};
use sqlx::PgPool;
use thiserror::Error;

use crate::DbError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fixture(#[from] ConfigError),
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Where creator queries are answered from.
///
/// Both variants honour the same contract: empty criteria return the
/// mode's full list in source order and every present dimension narrows it.
#[derive(Debug, Clone)]
pub enum DataSource {
    Fixture(Arc<Fixture>),
    Postgres(PgPool),
}

impl DataSource {
    /// Open the source selected by `config.source`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Fixture`] if the fixture cannot be loaded, or
    /// [`SourceError::Db`] if the pool cannot connect.
    pub async fn from_app_config(config: &AppConfig) -> Result<Self, SourceError> {
        match config.source {
            SourceKind::Fixture => {
                let fixture = load_fixture(&config.fixture_path)?;
                tracing::info!(
                    path = %config.fixture_path.display(),
                    creators = fixture.creators.len(),
                    "serving creators from fixture"
                );
                Ok(Self::Fixture(Arc::new(fixture)))
            }
            SourceKind::Postgres => {
                let pool = crate::connect_from_app_config(config).await?;
                tracing::info!("serving creators from postgres");
                Ok(Self::Postgres(pool))
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Fixture(_) => SourceKind::Fixture,
            Self::Postgres(_) => SourceKind::Postgres,
        }
    }

    /// Creators for `mode` matching `criteria`, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the Postgres query fails.
    pub async fn list_creators(
        &self,
        mode: Mode,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Creator>, DbError> {
        match self {
            Self::Fixture(fixture) => Ok(apply_filters(&fixture.creators_for(mode), criteria)),
            Self::Postgres(pool) => crate::list_creators(pool, mode, criteria).await,
        }
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the Postgres query fails.
    pub async fn get_creator(&self, id: &str) -> Result<Option<Creator>, DbError> {
        match self {
            Self::Fixture(fixture) => Ok(fixture.find(id).cloned()),
            Self::Postgres(pool) => crate::get_creator(pool, id).await,
        }
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the Postgres query fails.
    pub async fn list_niches(&self) -> Result<Vec<Niche>, DbError> {
        match self {
            Self::Fixture(fixture) => Ok(fixture.niches.clone()),
            Self::Postgres(pool) => crate::list_niches(pool).await,
        }
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the database is unreachable. The fixture
    /// source is always healthy.
    pub async fn health_check(&self) -> Result<(), DbError> {
        match self {
            Self::Fixture(_) => Ok(()),
            Self::Postgres(pool) => crate::health_check(pool).await,
        }
    }
}
