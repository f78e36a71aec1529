//! Creator directory records and the enums that classify them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Social platform a creator publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
    Youtube,
    /// Formerly Twitter; `twitter` is still accepted on input.
    #[serde(alias = "twitter")]
    X,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Youtube,
        Platform::X,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::X => "x",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Youtube => "YouTube",
            Platform::X => "X (Twitter)",
        }
    }

    /// Whether the filter panel offers this platform as a selectable option.
    #[must_use]
    pub fn is_filterable(self) -> bool {
        matches!(self, Platform::Instagram | Platform::Tiktok)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            "youtube" => Ok(Platform::Youtube),
            "x" | "twitter" => Ok(Platform::X),
            _ => Err(CoreError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    #[default]
    Positive,
    Negative,
}

impl ChangeType {
    /// Classify a signed change; zero counts as positive.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            ChangeType::Positive
        } else {
            ChangeType::Negative
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Positive => "positive",
            ChangeType::Negative => "negative",
        }
    }
}

/// Which record set the directory is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// AI-recommended subset, carrying match scores.
    #[default]
    Ai,
    /// Full creator directory.
    All,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ai => "ai",
            Mode::All => "all",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ai" => Ok(Mode::Ai),
            "all" => Ok(Mode::All),
            _ => Err(CoreError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    pub platform: Platform,
    pub username: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Niche {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A content-creator profile with social and engagement metrics.
///
/// Each headline metric optionally carries a period-over-period change
/// percentage and its direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    /// AI relevance score in `[0, 100]`; only meaningful in [`Mode::Ai`].
    #[serde(default)]
    pub match_score: Option<f64>,
    /// General performance score in `[0, 100]`.
    pub buzz_score: f64,
    pub username: String,
    #[serde(default)]
    pub username_tag: Option<String>,
    #[serde(default)]
    pub social_media: Vec<SocialMedia>,
    #[serde(default)]
    pub bio: String,
    pub followers: u64,
    #[serde(default)]
    pub followers_change: Option<f64>,
    #[serde(default)]
    pub followers_change_type: Option<ChangeType>,
    /// Engagement rate as a percentage.
    pub engagement: f64,
    #[serde(default)]
    pub engagement_change: Option<f64>,
    #[serde(default)]
    pub engagement_change_type: Option<ChangeType>,
    pub avg_views: u64,
    #[serde(default)]
    pub avg_views_change: Option<f64>,
    #[serde(default)]
    pub avg_views_change_type: Option<ChangeType>,
    #[serde(default)]
    pub avg_likes: Option<u64>,
    #[serde(default)]
    pub avg_likes_change: Option<f64>,
    #[serde(default)]
    pub avg_likes_change_type: Option<ChangeType>,
    #[serde(default)]
    pub avg_comments: Option<u64>,
    #[serde(default)]
    pub avg_comments_change: Option<f64>,
    #[serde(default)]
    pub avg_comments_change_type: Option<ChangeType>,
    #[serde(default)]
    pub niches: Vec<String>,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
    #[serde(default)]
    pub thumbnails: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Creator {
    /// Returns `true` if any of the creator's social accounts is on `platform`.
    #[must_use]
    pub fn is_on(&self, platform: Platform) -> bool {
        self.social_media.iter().any(|s| s.platform == platform)
    }

    /// Followers change with its sign applied from `followers_change_type`.
    #[must_use]
    pub fn signed_followers_change(&self) -> Option<f64> {
        let change = self.followers_change?;
        Some(match self.followers_change_type {
            Some(ChangeType::Negative) => -change.abs(),
            _ => change,
        })
    }

    /// Hashtags, or an empty slice when none were recorded.
    #[must_use]
    pub fn hashtags(&self) -> &[String] {
        self.hashtags.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_twitter_alias() {
        assert_eq!("twitter".parse::<Platform>(), Ok(Platform::X));
        assert_eq!(" TikTok ".parse::<Platform>(), Ok(Platform::Tiktok));
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(CoreError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn platform_deserializes_twitter_alias() {
        let social: SocialMedia = serde_json::from_str(
            r#"{"platform":"twitter","username":"peter","url":"https://x.com/peter"}"#,
        )
        .expect("deserialize");
        assert_eq!(social.platform, Platform::X);
        let json = serde_json::to_string(&social).expect("serialize");
        assert!(json.contains("\"platform\":\"x\""));
    }

    #[test]
    fn only_instagram_and_tiktok_are_filterable() {
        let filterable: Vec<Platform> = Platform::ALL
            .into_iter()
            .filter(|p| p.is_filterable())
            .collect();
        assert_eq!(filterable, vec![Platform::Instagram, Platform::Tiktok]);
    }

    #[test]
    fn change_type_of_zero_is_positive() {
        assert_eq!(ChangeType::of(0.0), ChangeType::Positive);
        assert_eq!(ChangeType::of(-0.01), ChangeType::Negative);
    }

    #[test]
    fn mode_round_trips_through_str() {
        assert_eq!("AI".parse::<Mode>(), Ok(Mode::Ai));
        assert_eq!(Mode::All.to_string(), "all");
        assert!("everything".parse::<Mode>().is_err());
    }

    #[test]
    fn creator_deserializes_with_optional_fields_missing() {
        let creator: Creator = serde_json::from_str(
            r#"{
                "id": "7",
                "buzz_score": 64,
                "username": "Ada",
                "followers": 1200,
                "engagement": 3.5,
                "avg_views": 800,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }"#,
        )
        .expect("deserialize minimal creator");
        assert!(creator.match_score.is_none());
        assert!(creator.social_media.is_empty());
        assert!(creator.hashtags().is_empty());
        assert!(creator.signed_followers_change().is_none());
    }
}
