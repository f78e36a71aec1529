use creatordb_core::{
    format::{
        format_engagement, format_number, format_percentage, social_icon, trend_icon, ScoreBand,
    },
    layout, Creator, CreatorMetrics,
};

const NAME_WIDTH: usize = 20;

// Approximate pixel metrics of a hashtag pill on a creator card.
const TAG_CHAR_WIDTH: f64 = 7.0;
const TAG_PADDING: f64 = 16.0;
const CARD_TAG_ROW: f64 = 260.0;

#[allow(clippy::cast_precision_loss)]
fn count(n: u64) -> String {
    format_number(n as f64)
}

fn band_label(score: f64) -> &'static str {
    match ScoreBand::from_score(score) {
        ScoreBand::Excellent => "excellent",
        ScoreBand::Good => "good",
        ScoreBand::Fair => "fair",
        ScoreBand::Weak => "weak",
        ScoreBand::Poor => "poor",
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

fn followers_with_change(creator: &Creator) -> String {
    match creator.signed_followers_change() {
        Some(change) => format!(
            "{} ({})",
            count(creator.followers),
            format_percentage(change)
        ),
        None => count(creator.followers),
    }
}

/// How many leading hashtags fit on one card row.
#[allow(clippy::cast_precision_loss)]
fn visible_hashtags(tags: &[String]) -> usize {
    let widths: Vec<f64> = tags
        .iter()
        .map(|tag| tag.chars().count() as f64 * TAG_CHAR_WIDTH + TAG_PADDING)
        .collect();
    layout::hashtag_row_count(&widths, CARD_TAG_ROW)
}

fn platforms(creator: &Creator) -> String {
    creator
        .social_media
        .iter()
        .map(|s| s.platform.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line header shown above the creator list.
pub(crate) fn render_metrics(metrics: &CreatorMetrics) -> String {
    format!(
        "{} creators | avg followers {} ({}) | avg views {} | avg engagement {:.1}%",
        metrics.total_creators,
        count(metrics.avg_followers),
        format_percentage(metrics.change_percentage),
        count(metrics.avg_views),
        metrics.avg_engagement,
    )
}

pub(crate) fn render_list(creators: &[Creator]) -> Vec<String> {
    let mut lines = Vec::with_capacity(creators.len() + 1);
    lines.push(format!(
        "{:<6}{:<22}{:<7}{:<6}{:<20}{:<11}{:<11}LOCATION",
        "ID", "CREATOR", "MATCH", "BUZZ", "FOLLOWERS", "AVG VIEWS", "ENGAGEMENT"
    ));
    for creator in creators {
        let match_score = creator
            .match_score
            .map_or_else(|| "-".to_string(), |m| format!("{m:.0}"));
        let buzz = format!("{:.0}", creator.buzz_score);
        lines.push(format!(
            "{:<6}{:<22}{:<7}{:<6}{:<20}{:<11}{:<11}{}",
            creator.id,
            truncate(&creator.username, NAME_WIDTH),
            match_score,
            buzz,
            followers_with_change(creator),
            count(creator.avg_views),
            format_engagement(creator.engagement),
            creator.location.as_deref().unwrap_or("-"),
        ));
    }
    lines
}

pub(crate) fn render_card(creator: &Creator) -> String {
    let mut title = format!("#{} {}", creator.id, creator.username);
    if let Some(tag) = creator.username_tag.as_deref() {
        title.push_str(&format!(" {tag}"));
    }
    if let Some(score) = creator.match_score {
        title.push_str(&format!("  match {score:.0} ({})", band_label(score)));
    }
    title.push_str(&format!(
        "  buzz {:.0} ({})",
        creator.buzz_score,
        band_label(creator.buzz_score)
    ));

    let mut lines = vec![
        title,
        format!(
            "   {} followers | {} avg views | {} engagement",
            followers_with_change(creator),
            count(creator.avg_views),
            format_engagement(creator.engagement)
        ),
    ];
    if !creator.niches.is_empty() {
        lines.push(format!("   niches: {}", creator.niches.join(", ")));
    }
    let tags = creator.hashtags();
    if !tags.is_empty() {
        let shown = visible_hashtags(tags);
        let mut row = format!("   tags: {}", tags[..shown].join(" "));
        if shown < tags.len() {
            row.push_str(&format!(" +{} more", tags.len() - shown));
        }
        lines.push(row);
    }
    lines.push(format!(
        "   on: {} | {}",
        platforms(creator),
        creator.location.as_deref().unwrap_or("location unknown")
    ));
    lines.join("\n")
}

/// Full profile for the detail view.
pub(crate) fn render_detail(creator: &Creator) -> String {
    let mut lines = vec![render_card(creator)];
    if !creator.bio.is_empty() {
        lines.push(format!("   bio: {}", creator.bio));
    }
    if let Some(likes) = creator.avg_likes {
        lines.push(format!("   avg likes: {}", count(likes)));
    }
    if let Some(comments) = creator.avg_comments {
        lines.push(format!("   avg comments: {}", count(comments)));
    }
    if let Some(change) = creator.followers_change_type {
        lines.push(format!("   followers trend: {}", trend_icon(change)));
    }
    let tags = creator.hashtags();
    if visible_hashtags(tags) < tags.len() {
        lines.push(format!("   all tags: {}", tags.join(" ")));
    }
    for account in &creator.social_media {
        lines.push(format!(
            "   {}: {} <{}> [{}]",
            account.platform.label(),
            account.username,
            account.url,
            social_icon(account.platform.as_str())
        ));
    }
    if let Some(email) = creator.email.as_deref() {
        lines.push(format!("   email: {email}"));
    }
    lines.join("\n")
}
