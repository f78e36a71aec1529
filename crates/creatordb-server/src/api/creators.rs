use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use creatordb_core::{
    calculate_metrics, sort_creators, Creator, CreatorMetrics, FilterCriteria, Mode, SortState,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CreatorListData {
    mode: Mode,
    creators: Vec<Creator>,
    metrics: CreatorMetrics,
}

/// Query string shared by the list and metrics endpoints. List-valued
/// parameters are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub(super) struct CreatorQuery {
    pub mode: Option<String>,
    pub niches: Option<String>,
    pub locations: Option<String>,
    pub platforms: Option<String>,
    pub buzz_scores: Option<String>,
    pub followers_min: Option<f64>,
    pub followers_max: Option<f64>,
    pub engagement_min: Option<f64>,
    pub engagement_max: Option<f64>,
    pub avg_views_min: Option<f64>,
    pub avg_views_max: Option<f64>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, PartialEq)]
pub(super) struct ParsedQuery {
    pub mode: Mode,
    pub criteria: FilterCriteria,
    pub sort: SortState,
}

impl CreatorQuery {
    /// Validate the raw query into typed criteria.
    ///
    /// Returns a human-readable message on the first invalid parameter.
    pub(super) fn parse(&self) -> Result<ParsedQuery, String> {
        let mode = parse_opt::<Mode>(self.mode.as_deref())?.unwrap_or_default();

        let criteria = FilterCriteria {
            niches: split_list(self.niches.as_deref()),
            locations: split_list(self.locations.as_deref()),
            platforms: parse_list(self.platforms.as_deref())?,
            buzz_scores: parse_list(self.buzz_scores.as_deref())?,
            followers_min: self.followers_min,
            followers_max: self.followers_max,
            engagement_min: self.engagement_min,
            engagement_max: self.engagement_max,
            avg_views_min: self.avg_views_min,
            avg_views_max: self.avg_views_max,
        };
        criteria.validate().map_err(|e| e.to_string())?;

        let sort = SortState {
            field: parse_opt(self.sort.as_deref())?,
            direction: parse_opt(self.direction.as_deref())?.unwrap_or_default(),
        };

        Ok(ParsedQuery {
            mode,
            criteria,
            sort,
        })
    }
}

fn split_list(raw: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn parse_list<T>(raw: Option<&str>) -> Result<Option<Vec<T>>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    split_list(raw)
        .map(|values| {
            values
                .iter()
                .map(|v| v.parse::<T>().map_err(|e| e.to_string()))
                .collect::<Result<Vec<T>, String>>()
        })
        .transpose()
}

fn parse_opt<T>(raw: Option<&str>) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|v| v.parse::<T>().map_err(|e| e.to_string()))
        .transpose()
}

async fn fetch(
    state: &AppState,
    req_id: &RequestId,
    query: &CreatorQuery,
) -> Result<(ParsedQuery, Vec<Creator>), ApiError> {
    let parsed = query
        .parse()
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let creators = state
        .source
        .list_creators(parsed.mode, &parsed.criteria)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::debug!(
        mode = %parsed.mode,
        dimensions = parsed.criteria.dimension_count(),
        results = creators.len(),
        "served creator query"
    );

    Ok((parsed, creators))
}

pub(super) async fn list_creators(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CreatorQuery>,
) -> Result<Json<ApiResponse<CreatorListData>>, ApiError> {
    let (parsed, creators) = fetch(&state, &req_id, &query).await?;
    let metrics = calculate_metrics(&creators);

    Ok(ApiResponse::new(
        CreatorListData {
            mode: parsed.mode,
            creators: sort_creators(&creators, parsed.sort),
            metrics,
        },
        req_id.0,
    ))
}

pub(super) async fn get_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CreatorQuery>,
) -> Result<Json<ApiResponse<CreatorMetrics>>, ApiError> {
    let (_, creators) = fetch(&state, &req_id, &query).await?;
    Ok(ApiResponse::new(calculate_metrics(&creators), req_id.0))
}

pub(super) async fn get_creator(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Creator>>, ApiError> {
    let creator = state
        .source
        .get_creator(&id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("creator {id} not found"),
            )
        })?;

    Ok(ApiResponse::new(creator, req_id.0))
}
