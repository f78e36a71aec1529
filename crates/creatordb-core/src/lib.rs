use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod creators;
pub mod directory;
pub mod filters;
pub mod fixture;
pub mod format;
pub mod layout;
pub mod list_view;
pub mod metrics;
pub mod panel;
pub mod selection;
pub mod sort;

pub use app_config::{AppConfig, Environment, SourceKind};
pub use config::{load_app_config, load_app_config_from_env};
pub use creators::{ChangeType, Creator, Mode, Niche, Platform, SocialMedia};
pub use directory::{ApplyOutcome, ApplyTicket, CreatorDirectory, DirectoryStatus};
pub use filters::{apply_filters, BuzzBucket, FilterCriteria, BUZZ_BUCKETS};
pub use fixture::{load_fixture, Fixture};
pub use list_view::{ListView, ViewMode};
pub use metrics::{calculate_metrics, CreatorMetrics};
pub use panel::{DropdownOutcome, FilterDimension, FilterPanel};
pub use selection::{FilterSelection, RangeConfig, RangeDimension, RangeValue, SelectionSet};
pub use sort::{sort_creators, SortDirection, SortField, SortState};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read fixture file {path}: {source}")]
    FixtureIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture file: {0}")]
    FixtureParse(#[from] serde_yaml::Error),

    #[error("fixture validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown buzz score bucket: {0}")]
    UnknownBuzzBucket(String),

    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error("unknown view mode: {0}")]
    UnknownViewMode(String),

    #[error("unknown range dimension: {0}")]
    UnknownRangeDimension(String),

    #[error("unknown filter dimension: {0}")]
    UnknownFilterDimension(String),

    #[error("invalid {dimension} bound: {value} is not a finite number")]
    NonFiniteBound { dimension: &'static str, value: f64 },

    #[error("invalid {dimension} range: min {min} is greater than max {max}")]
    InvertedRange {
        dimension: &'static str,
        min: f64,
        max: f64,
    },
}

#[cfg(test)]
mod test_support;
