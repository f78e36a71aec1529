use axum::{extract::State, Extension, Json};
use creatordb_core::{
    panel::LOCATION_OPTIONS, Niche, Platform, RangeConfig, RangeDimension, BUZZ_BUCKETS,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct PlatformOption {
    value: Platform,
    label: &'static str,
    available: bool,
}

/// Everything a client needs to render the filter panel.
#[derive(Debug, Serialize)]
pub(super) struct FilterOptions {
    ranges: Vec<RangeConfig>,
    buzz_buckets: Vec<&'static str>,
    platforms: Vec<PlatformOption>,
    locations: Vec<&'static str>,
}

impl FilterOptions {
    fn current() -> Self {
        Self {
            ranges: RangeDimension::ALL.iter().map(|d| d.config()).collect(),
            buzz_buckets: BUZZ_BUCKETS.iter().map(|(label, _)| *label).collect(),
            platforms: Platform::ALL
                .iter()
                .map(|p| PlatformOption {
                    value: *p,
                    label: p.label(),
                    available: p.is_filterable(),
                })
                .collect(),
            locations: LOCATION_OPTIONS.to_vec(),
        }
    }
}

pub(super) async fn list_niches(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Niche>>>, ApiError> {
    let niches = state
        .source
        .list_niches()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(niches, req_id.0))
}

pub(super) async fn filter_options(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<FilterOptions>> {
    ApiResponse::new(FilterOptions::current(), req_id.0)
}
