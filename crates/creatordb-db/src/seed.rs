use creatordb_core::{ChangeType, Creator, Fixture};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

/// Row counts written by [`seed_fixture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub niches: usize,
    pub creators: usize,
    pub ai_recommended: usize,
}

/// Upsert a fixture's niches and creators and replace the AI recommendation
/// list with the fixture's.
///
/// All writes run inside a single transaction; if any operation fails the
/// entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails, or
/// [`DbError::Encode`] if a count does not fit a `BIGINT` column.
pub async fn seed_fixture(pool: &PgPool, fixture: &Fixture) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for (position, niche) in fixture.niches.iter().enumerate() {
        sqlx::query(
            "INSERT INTO niches (id, position, name, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                 position = EXCLUDED.position, \
                 name = EXCLUDED.name, \
                 created_at = EXCLUDED.created_at",
        )
        .bind(&niche.id)
        .bind(to_i32(position, "position")?)
        .bind(&niche.name)
        .bind(niche.created_at)
        .execute(&mut *tx)
        .await?;
        summary.niches += 1;
    }

    for (position, creator) in fixture.creators.iter().enumerate() {
        let position = to_i32(position, "position")?;
        let counts = CreatorCounts::of(creator)?;

        sqlx::query(
            "INSERT INTO creators (id, position, profile_pic, match_score, buzz_score, username, \
                 username_tag, social_media, bio, followers, followers_change, followers_change_type, \
                 engagement, engagement_change, engagement_change_type, avg_views, avg_views_change, \
                 avg_views_change_type, avg_likes, avg_likes_change, avg_likes_change_type, \
                 avg_comments, avg_comments_change, avg_comments_change_type, niches, hashtags, \
                 thumbnails, location, email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                 $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31) \
             ON CONFLICT (id) DO UPDATE SET \
                 position = EXCLUDED.position, \
                 profile_pic = EXCLUDED.profile_pic, \
                 match_score = EXCLUDED.match_score, \
                 buzz_score = EXCLUDED.buzz_score, \
                 username = EXCLUDED.username, \
                 username_tag = EXCLUDED.username_tag, \
                 social_media = EXCLUDED.social_media, \
                 bio = EXCLUDED.bio, \
                 followers = EXCLUDED.followers, \
                 followers_change = EXCLUDED.followers_change, \
                 followers_change_type = EXCLUDED.followers_change_type, \
                 engagement = EXCLUDED.engagement, \
                 engagement_change = EXCLUDED.engagement_change, \
                 engagement_change_type = EXCLUDED.engagement_change_type, \
                 avg_views = EXCLUDED.avg_views, \
                 avg_views_change = EXCLUDED.avg_views_change, \
                 avg_views_change_type = EXCLUDED.avg_views_change_type, \
                 avg_likes = EXCLUDED.avg_likes, \
                 avg_likes_change = EXCLUDED.avg_likes_change, \
                 avg_likes_change_type = EXCLUDED.avg_likes_change_type, \
                 avg_comments = EXCLUDED.avg_comments, \
                 avg_comments_change = EXCLUDED.avg_comments_change, \
                 avg_comments_change_type = EXCLUDED.avg_comments_change_type, \
                 niches = EXCLUDED.niches, \
                 hashtags = EXCLUDED.hashtags, \
                 thumbnails = EXCLUDED.thumbnails, \
                 location = EXCLUDED.location, \
                 email = EXCLUDED.email, \
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(&creator.id)
        .bind(position)
        .bind(&creator.profile_pic)
        .bind(creator.match_score)
        .bind(creator.buzz_score)
        .bind(&creator.username)
        .bind(&creator.username_tag)
        .bind(Json(&creator.social_media))
        .bind(&creator.bio)
        .bind(counts.followers)
        .bind(creator.followers_change)
        .bind(change_label(creator.followers_change_type))
        .bind(creator.engagement)
        .bind(creator.engagement_change)
        .bind(change_label(creator.engagement_change_type))
        .bind(counts.avg_views)
        .bind(creator.avg_views_change)
        .bind(change_label(creator.avg_views_change_type))
        .bind(counts.avg_likes)
        .bind(creator.avg_likes_change)
        .bind(change_label(creator.avg_likes_change_type))
        .bind(counts.avg_comments)
        .bind(creator.avg_comments_change)
        .bind(change_label(creator.avg_comments_change_type))
        .bind(&creator.niches)
        .bind(&creator.hashtags)
        .bind(&creator.thumbnails)
        .bind(&creator.location)
        .bind(&creator.email)
        .bind(creator.created_at)
        .bind(creator.updated_at)
        .execute(&mut *tx)
        .await?;
        summary.creators += 1;
    }

    sqlx::query("DELETE FROM ai_recommendations")
        .execute(&mut *tx)
        .await?;

    for (rank, creator_id) in fixture.ai_recommended.iter().enumerate() {
        sqlx::query("INSERT INTO ai_recommendations (creator_id, rank) VALUES ($1, $2)")
            .bind(creator_id)
            .bind(to_i32(rank, "rank")?)
            .execute(&mut *tx)
            .await?;
        summary.ai_recommended += 1;
    }

    tx.commit().await?;

    tracing::info!(
        niches = summary.niches,
        creators = summary.creators,
        ai_recommended = summary.ai_recommended,
        "seeded creator fixture"
    );

    Ok(summary)
}

struct CreatorCounts {
    followers: i64,
    avg_views: i64,
    avg_likes: Option<i64>,
    avg_comments: Option<i64>,
}

impl CreatorCounts {
    fn of(creator: &Creator) -> Result<Self, DbError> {
        let convert = |column: &str, value: u64| {
            i64::try_from(value).map_err(|_| {
                DbError::Encode(format!("creator {} {column} {value} overflows BIGINT", creator.id))
            })
        };
        Ok(Self {
            followers: convert("followers", creator.followers)?,
            avg_views: convert("avg_views", creator.avg_views)?,
            avg_likes: creator
                .avg_likes
                .map(|v| convert("avg_likes", v))
                .transpose()?,
            avg_comments: creator
                .avg_comments
                .map(|v| convert("avg_comments", v))
                .transpose()?,
        })
    }
}

fn change_label(change: Option<ChangeType>) -> Option<&'static str> {
    change.map(ChangeType::as_str)
}

fn to_i32(value: usize, column: &str) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|_| DbError::Encode(format!("{column} {value} overflows INTEGER")))
}
