//! Database operations for the `creators`, `niches` and `ai_recommendations`
//! tables.

use chrono::{DateTime, Utc};
use creatordb_core::{
    apply_filters, ChangeType, Creator, FilterCriteria, Mode, Niche, SocialMedia,
};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `creators` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorRow {
    pub id: String,
    pub profile_pic: Option<String>,
    pub match_score: Option<f64>,
    pub buzz_score: f64,
    pub username: String,
    pub username_tag: Option<String>,
    pub social_media: Json<Vec<SocialMedia>>,
    pub bio: String,
    pub followers: i64,
    pub followers_change: Option<f64>,
    pub followers_change_type: Option<String>,
    pub engagement: f64,
    pub engagement_change: Option<f64>,
    pub engagement_change_type: Option<String>,
    pub avg_views: i64,
    pub avg_views_change: Option<f64>,
    pub avg_views_change_type: Option<String>,
    pub avg_likes: Option<i64>,
    pub avg_likes_change: Option<f64>,
    pub avg_likes_change_type: Option<String>,
    pub avg_comments: Option<i64>,
    pub avg_comments_change: Option<f64>,
    pub avg_comments_change_type: Option<String>,
    pub niches: Vec<String>,
    pub hashtags: Option<Vec<String>>,
    pub thumbnails: Vec<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CreatorRow> for Creator {
    type Error = DbError;

    fn try_from(row: CreatorRow) -> Result<Self, Self::Error> {
        let count = |column: &str, value: i64| {
            u64::try_from(value)
                .map_err(|_| DbError::Decode(format!("creator {} has negative {column}", row.id)))
        };
        let optional_count =
            |column: &str, value: Option<i64>| value.map(|v| count(column, v)).transpose();

        Ok(Creator {
            followers: count("followers", row.followers)?,
            avg_views: count("avg_views", row.avg_views)?,
            avg_likes: optional_count("avg_likes", row.avg_likes)?,
            avg_comments: optional_count("avg_comments", row.avg_comments)?,
            followers_change_type: change_type(row.followers_change_type.as_deref())?,
            engagement_change_type: change_type(row.engagement_change_type.as_deref())?,
            avg_views_change_type: change_type(row.avg_views_change_type.as_deref())?,
            avg_likes_change_type: change_type(row.avg_likes_change_type.as_deref())?,
            avg_comments_change_type: change_type(row.avg_comments_change_type.as_deref())?,
            id: row.id.clone(),
            profile_pic: row.profile_pic,
            match_score: row.match_score,
            buzz_score: row.buzz_score,
            username: row.username,
            username_tag: row.username_tag,
            social_media: row.social_media.0,
            bio: row.bio,
            followers_change: row.followers_change,
            engagement: row.engagement,
            engagement_change: row.engagement_change,
            avg_views_change: row.avg_views_change,
            avg_likes_change: row.avg_likes_change,
            avg_comments_change: row.avg_comments_change,
            niches: row.niches,
            hashtags: row.hashtags,
            thumbnails: row.thumbnails,
            location: row.location,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `niches` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NicheRow {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<NicheRow> for Niche {
    fn from(row: NicheRow) -> Self {
        Niche {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

pub(crate) fn change_type(raw: Option<&str>) -> Result<Option<ChangeType>, DbError> {
    match raw {
        None => Ok(None),
        Some("positive") => Ok(Some(ChangeType::Positive)),
        Some("negative") => Ok(Some(ChangeType::Negative)),
        Some(other) => Err(DbError::Decode(format!("unknown change type '{other}'"))),
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const CREATOR_COLUMNS: &str = "c.id, c.profile_pic, c.match_score, c.buzz_score, c.username, \
     c.username_tag, c.social_media, c.bio, c.followers, c.followers_change, \
     c.followers_change_type, c.engagement, c.engagement_change, c.engagement_change_type, \
     c.avg_views, c.avg_views_change, c.avg_views_change_type, c.avg_likes, \
     c.avg_likes_change, c.avg_likes_change_type, c.avg_comments, c.avg_comments_change, \
     c.avg_comments_change_type, c.niches, c.hashtags, c.thumbnails, c.location, c.email, \
     c.created_at, c.updated_at";

/// Bind parameters for the filtered creator query. Empty selections bind
/// as `NULL` so the matching clause is skipped.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CreatorQueryParams {
    pub niches: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    pub buzz_lower: Option<Vec<f64>>,
    pub buzz_upper: Option<Vec<f64>>,
    pub followers: (Option<f64>, Option<f64>),
    pub engagement: (Option<f64>, Option<f64>),
    pub avg_views: (Option<f64>, Option<f64>),
}

impl CreatorQueryParams {
    pub(crate) fn from_criteria(criteria: &FilterCriteria) -> Self {
        let buckets = criteria.buzz_scores.as_ref().filter(|b| !b.is_empty());
        Self {
            niches: criteria.niches.clone().filter(|n| !n.is_empty()),
            platforms: criteria
                .platforms
                .as_ref()
                .filter(|p| !p.is_empty())
                .map(|p| p.iter().map(|p| p.as_str().to_string()).collect()),
            buzz_lower: buckets.map(|b| b.iter().map(|b| b.bounds().0).collect()),
            buzz_upper: buckets.map(|b| b.iter().map(|b| b.bounds().1).collect()),
            followers: (criteria.followers_min, criteria.followers_max),
            engagement: (criteria.engagement_min, criteria.engagement_max),
            avg_views: (criteria.avg_views_min, criteria.avg_views_max),
        }
    }
}

/// Returns the creators for `mode` that satisfy `criteria`, in the mode's
/// source order (recommendation rank for AI, directory position otherwise).
///
/// Niches, platforms, buzz buckets and numeric ranges narrow in SQL; the
/// location dimension is matched in process with the shared predicate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or [`DbError::Decode`] if a
/// row holds a value the domain type cannot represent.
pub async fn list_creators(
    pool: &PgPool,
    mode: Mode,
    criteria: &FilterCriteria,
) -> Result<Vec<Creator>, DbError> {
    let params = CreatorQueryParams::from_criteria(criteria);
    let sql = format!(
        "SELECT {CREATOR_COLUMNS} \
         FROM creators c \
         LEFT JOIN ai_recommendations r ON r.creator_id = c.id \
         WHERE ($1::TEXT <> 'ai' OR r.creator_id IS NOT NULL) \
           AND ($2::TEXT[] IS NULL OR c.niches && $2) \
           AND ($3::TEXT[] IS NULL OR EXISTS ( \
                SELECT 1 FROM jsonb_array_elements(c.social_media) s \
                WHERE s->>'platform' = ANY($3))) \
           AND ($4::FLOAT8[] IS NULL OR EXISTS ( \
                SELECT 1 FROM unnest($4::FLOAT8[], $5::FLOAT8[]) AS b(lower_bound, upper_bound) \
                WHERE c.buzz_score >= b.lower_bound AND c.buzz_score < b.upper_bound)) \
           AND c.followers >= COALESCE($6::FLOAT8, 0) \
           AND ($7::FLOAT8 IS NULL OR c.followers <= $7) \
           AND c.engagement >= COALESCE($8::FLOAT8, 0) \
           AND ($9::FLOAT8 IS NULL OR c.engagement <= $9) \
           AND c.avg_views >= COALESCE($10::FLOAT8, 0) \
           AND ($11::FLOAT8 IS NULL OR c.avg_views <= $11) \
         ORDER BY CASE WHEN $1::TEXT = 'ai' THEN r.rank ELSE c.position END, c.id"
    );

    let rows = sqlx::query_as::<_, CreatorRow>(&sql)
        .bind(mode.as_str())
        .bind(params.niches)
        .bind(params.platforms)
        .bind(params.buzz_lower)
        .bind(params.buzz_upper)
        .bind(params.followers.0)
        .bind(params.followers.1)
        .bind(params.engagement.0)
        .bind(params.engagement.1)
        .bind(params.avg_views.0)
        .bind(params.avg_views.1)
        .fetch_all(pool)
        .await?;

    let creators = rows
        .into_iter()
        .map(Creator::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let by_location = FilterCriteria {
        locations: criteria.locations.clone(),
        ..FilterCriteria::default()
    };
    Ok(apply_filters(&creators, &by_location))
}

/// Returns a single creator by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or [`DbError::Decode`] if the
/// row cannot be converted.
pub async fn get_creator(pool: &PgPool, id: &str) -> Result<Option<Creator>, DbError> {
    let sql = format!("SELECT {CREATOR_COLUMNS} FROM creators c WHERE c.id = $1");
    let row = sqlx::query_as::<_, CreatorRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Creator::try_from).transpose()
}

/// Returns the niche catalogue in catalogue order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_niches(pool: &PgPool) -> Result<Vec<Niche>, DbError> {
    let rows = sqlx::query_as::<_, NicheRow>(
        "SELECT id, name, created_at FROM niches ORDER BY position, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Niche::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatordb_core::{BuzzBucket, Platform};

    #[test]
    fn empty_criteria_binds_nulls() {
        assert_eq!(
            CreatorQueryParams::from_criteria(&FilterCriteria::default()),
            CreatorQueryParams::default()
        );
    }

    #[test]
    fn empty_lists_bind_as_null() {
        let criteria = FilterCriteria {
            niches: Some(Vec::new()),
            platforms: Some(Vec::new()),
            buzz_scores: Some(Vec::new()),
            ..FilterCriteria::default()
        };
        assert_eq!(
            CreatorQueryParams::from_criteria(&criteria),
            CreatorQueryParams::default()
        );
    }

    #[test]
    fn buckets_bind_as_parallel_bound_arrays() {
        let criteria = FilterCriteria {
            buzz_scores: Some(vec![BuzzBucket::NinetyPlus, BuzzBucket::SixtyToSeventy]),
            platforms: Some(vec![Platform::X]),
            followers_min: Some(50_000.0),
            ..FilterCriteria::default()
        };
        let params = CreatorQueryParams::from_criteria(&criteria);
        assert_eq!(params.buzz_lower, Some(vec![90.0, 60.0]));
        assert_eq!(params.buzz_upper, Some(vec![f64::INFINITY, 70.0]));
        assert_eq!(params.platforms, Some(vec!["x".to_string()]));
        assert_eq!(params.followers, (Some(50_000.0), None));
    }

    #[test]
    fn change_type_decodes_known_values() {
        assert_eq!(change_type(None).ok(), Some(None));
        assert_eq!(
            change_type(Some("negative")).ok(),
            Some(Some(ChangeType::Negative))
        );
        assert!(matches!(
            change_type(Some("sideways")),
            Err(DbError::Decode(_))
        ));
    }
}
