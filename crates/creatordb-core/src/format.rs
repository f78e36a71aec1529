//! Display formatting for creator metrics.

use crate::creators::{ChangeType, Platform};

/// Abbreviate a count: `1.2M`, `132K`, or the plain number below a thousand.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", round_to(n / 1_000_000.0, 1))
    } else if n >= 1_000.0 {
        format!("{:.0}K", round_to(n / 1_000.0, 0))
    } else {
        format!("{n}")
    }
}

/// Signed percentage with two decimals; zero is `+0.00%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{:.2}%", round_to(value, 2))
}

/// Engagement rate, always `+`-prefixed.
#[must_use]
pub fn format_engagement(value: f64) -> String {
    format!("+{:.2}%", round_to(value, 2))
}

// Half-away-from-zero, which `format!` precision alone does not guarantee.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Colour band for match and buzz scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Weak,
    Poor,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ScoreBand::Excellent
        } else if score >= 80.0 {
            ScoreBand::Good
        } else if score >= 70.0 {
            ScoreBand::Fair
        } else if score >= 60.0 {
            ScoreBand::Weak
        } else {
            ScoreBand::Poor
        }
    }

    #[must_use]
    pub fn color_class(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "text-green-600 bg-green-100",
            ScoreBand::Good => "text-blue-600 bg-blue-100",
            ScoreBand::Fair => "text-yellow-600 bg-yellow-100",
            ScoreBand::Weak => "text-orange-600 bg-orange-100",
            ScoreBand::Poor => "text-red-600 bg-red-100",
        }
    }
}

/// Icon asset for a platform name; unrecognised names fall back to Instagram.
#[must_use]
pub fn social_icon(platform: &str) -> &'static str {
    match platform.parse::<Platform>() {
        Ok(Platform::Tiktok) => "TikTokLogo.svg",
        Ok(Platform::Youtube) => "YouTubeLogo.svg",
        Ok(Platform::X) => "XLogo.svg",
        Ok(Platform::Instagram) | Err(_) => "InstagramLogo.svg",
    }
}

#[must_use]
pub fn trend_icon(change: ChangeType) -> &'static str {
    match change {
        ChangeType::Positive => "PositiveChangeIcon.svg",
        ChangeType::Negative => "NegativeChangeIcon.svg",
    }
}

#[must_use]
pub fn trend_color(change: ChangeType) -> &'static str {
    match change {
        ChangeType::Positive => "text-[#1ad598]",
        ChangeType::Negative => "text-[#ea3a3d]",
    }
}
