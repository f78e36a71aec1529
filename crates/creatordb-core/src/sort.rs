//! Column sorting for the creator list.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::creators::Creator;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    MatchScore,
    Followers,
    AvgViews,
    Engagement,
}

impl SortField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::MatchScore => "match_score",
            SortField::Followers => "followers",
            SortField::AvgViews => "avg_views",
            SortField::Engagement => "engagement",
        }
    }

    /// Numeric sort key; a missing match score sorts as zero.
    #[allow(clippy::cast_precision_loss)]
    fn key(self, creator: &Creator) -> f64 {
        match self {
            SortField::MatchScore => creator.match_score.unwrap_or(0.0),
            SortField::Followers => creator.followers as f64,
            SortField::AvgViews => creator.avg_views as f64,
            SortField::Engagement => creator.engagement,
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "match_score" | "matchscore" | "match" => Ok(SortField::MatchScore),
            "followers" => Ok(SortField::Followers),
            "avg_views" | "avgviews" | "views" => Ok(SortField::AvgViews),
            "engagement" => Ok(SortField::Engagement),
            _ => Err(CoreError::UnknownSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(CoreError::UnknownSortDirection(s.to_string())),
        }
    }
}

/// Active sort column and direction. With no field the list keeps its
/// source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortState {
    #[must_use]
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// State after a column-header click on `field`.
    ///
    /// A new column starts descending; clicking the active column flips
    /// its direction.
    #[must_use]
    pub fn toggle(self, field: SortField) -> Self {
        let direction = match (self.field, self.direction) {
            (Some(active), SortDirection::Desc) if active == field => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        Self::by(field, direction)
    }
}

/// Ordered copy of `creators` under `sort`. The sort is stable, so ties
/// keep their source order.
#[must_use]
pub fn sort_creators(creators: &[Creator], sort: SortState) -> Vec<Creator> {
    let mut sorted = creators.to_vec();
    let Some(field) = sort.field else {
        return sorted;
    };

    sorted.sort_by(|a, b| {
        let ordering: Ordering = field.key(a).total_cmp(&field.key(b));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}
