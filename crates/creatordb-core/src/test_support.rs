//! Shared record builders for unit tests.

use chrono::{TimeZone, Utc};

use crate::creators::{ChangeType, Creator, Platform, SocialMedia};

pub(crate) fn creator(id: &str) -> Creator {
    let ts = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    Creator {
        id: id.to_string(),
        profile_pic: None,
        match_score: None,
        buzz_score: 50.0,
        username: format!("creator-{id}"),
        username_tag: None,
        social_media: Vec::new(),
        bio: String::new(),
        followers: 100_000,
        followers_change: None,
        followers_change_type: None,
        engagement: 5.0,
        engagement_change: None,
        engagement_change_type: None,
        avg_views: 10_000,
        avg_views_change: None,
        avg_views_change_type: None,
        avg_likes: None,
        avg_likes_change: None,
        avg_likes_change_type: None,
        avg_comments: None,
        avg_comments_change: None,
        avg_comments_change_type: None,
        niches: Vec::new(),
        hashtags: None,
        thumbnails: Vec::new(),
        location: None,
        email: None,
        created_at: ts,
        updated_at: ts,
    }
}

pub(crate) fn with_buzz(id: &str, buzz_score: f64) -> Creator {
    Creator {
        buzz_score,
        ..creator(id)
    }
}

pub(crate) fn with_followers(id: &str, followers: u64) -> Creator {
    Creator {
        followers,
        ..creator(id)
    }
}

pub(crate) fn with_niches(id: &str, niches: &[&str]) -> Creator {
    Creator {
        niches: niches.iter().map(|n| (*n).to_string()).collect(),
        ..creator(id)
    }
}

pub(crate) fn with_platforms(id: &str, platforms: &[Platform]) -> Creator {
    Creator {
        social_media: platforms
            .iter()
            .map(|p| SocialMedia {
                platform: *p,
                username: id.to_string(),
                url: format!("https://example.com/{p}/{id}"),
            })
            .collect(),
        ..creator(id)
    }
}

pub(crate) fn with_followers_change(id: &str, change: f64, kind: ChangeType) -> Creator {
    Creator {
        followers_change: Some(change),
        followers_change_type: Some(kind),
        ..creator(id)
    }
}

/// The six-creator AI set used throughout the dashboard examples.
pub(crate) fn buzz_scenario() -> Vec<Creator> {
    [82.0, 79.0, 83.0, 87.0, 91.0, 95.0]
        .into_iter()
        .enumerate()
        .map(|(i, buzz)| with_buzz(&(i + 1).to_string(), buzz))
        .collect()
}

pub(crate) fn ids(creators: &[Creator]) -> Vec<&str> {
    creators.iter().map(|c| c.id.as_str()).collect()
}
