//! Filter-panel selection state and its translation into [`FilterCriteria`].
//!
//! Every edit returns a new value; nothing is mutated in place, so each
//! state transition can be compared and tested on its own.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::creators::Platform;
use crate::filters::{BuzzBucket, FilterCriteria};
use crate::format::format_number;
use crate::CoreError;

/// Ordered, duplicate-free selection. Insertion order is kept so derived
/// criteria list values in the order the user picked them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<T> {
    items: Vec<T>,
}

impl<T> Default for SelectionSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone + PartialEq> SelectionSet<T> {
    /// A copy with `value` added, or removed if it was already selected.
    #[must_use]
    pub fn toggled(&self, value: T) -> Self {
        let mut items = self.items.clone();
        if let Some(pos) = items.iter().position(|v| *v == value) {
            items.remove(pos);
        } else {
            items.push(value);
        }
        Self { items }
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// `Some(values)` when anything is selected, otherwise `None`.
    #[must_use]
    pub fn to_criterion(&self) -> Option<Vec<T>> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.clone())
        }
    }
}

impl<T: Clone + PartialEq> FromIterator<T> for SelectionSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |set, v| {
            if set.contains(&v) {
                set
            } else {
                set.toggled(v)
            }
        })
    }
}

/// Numeric filter dimensions backed by a range slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeDimension {
    Followers,
    AvgViews,
    Engagement,
}

impl RangeDimension {
    pub const ALL: [RangeDimension; 3] = [
        RangeDimension::Followers,
        RangeDimension::AvgViews,
        RangeDimension::Engagement,
    ];

    /// Slider bounds and step for the dimension.
    #[must_use]
    pub fn config(self) -> RangeConfig {
        match self {
            RangeDimension::Engagement => RangeConfig {
                dimension: self,
                min: 0.0,
                max: 500.0,
                step: 1.0,
                title: "Filter by Engagement",
                unit: "Engagement",
            },
            RangeDimension::Followers => RangeConfig {
                dimension: self,
                min: 30_000.0,
                max: 300_000.0,
                step: 1_000.0,
                title: "Filter by Followers",
                unit: "Followers",
            },
            RangeDimension::AvgViews => RangeConfig {
                dimension: self,
                min: 5_000.0,
                max: 5_000_000.0,
                step: 1_000.0,
                title: "Filter by Avg. Views",
                unit: "Views",
            },
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RangeDimension::Followers => "followers",
            RangeDimension::AvgViews => "avg_views",
            RangeDimension::Engagement => "engagement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeConfig {
    pub dimension: RangeDimension,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub title: &'static str,
    pub unit: &'static str,
}

impl RangeConfig {
    #[must_use]
    pub fn default_value(&self) -> RangeValue {
        RangeValue {
            min: self.min,
            max: self.max,
        }
    }

    /// Slider value at `percentage` of the track, snapped to the step.
    #[must_use]
    pub fn value_at(&self, percentage: f64) -> f64 {
        let pct = percentage.clamp(0.0, 100.0);
        let raw = self.min + (pct / 100.0) * (self.max - self.min);
        (raw / self.step).round() * self.step
    }

    /// Track position of `value` as a percentage.
    #[must_use]
    pub fn percentage_of(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)) * 100.0
    }

    /// Display text for a bound, e.g. `30K`, `5.0M`, `12%`.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        match self.dimension {
            RangeDimension::Engagement => format!("{value}%"),
            RangeDimension::Followers | RangeDimension::AvgViews => format_number(value),
        }
    }

    /// Parse text typed into a range field.
    ///
    /// Returns `None` for malformed input; callers keep the previous value.
    #[must_use]
    pub fn parse_value(&self, text: &str) -> Option<f64> {
        match self.dimension {
            RangeDimension::Engagement => parse_percentage(text),
            RangeDimension::Followers | RangeDimension::AvgViews => parse_abbreviated(text),
        }
    }
}

/// Current `[min, max]` of a range dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeValue {
    pub min: f64,
    pub max: f64,
}

static ABBREVIATED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9][0-9,]*(?:\.[0-9]+)?|\.[0-9]+)\s*([kKmM])?\s*$")
        .expect("valid abbreviated number regex")
});

static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?|\.[0-9]+)\s*%?\s*$").expect("valid percentage regex")
});

/// Parse `132043`, `132,043`, `30k`, `1.5M`.
fn parse_abbreviated(text: &str) -> Option<f64> {
    let caps = ABBREVIATED_NUMBER.captures(text)?;
    let number: f64 = caps[1].replace(',', "").parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("k" | "K") => 1_000.0,
        Some("m" | "M") => 1_000_000.0,
        _ => 1.0,
    };
    Some(number * multiplier)
}

/// Parse `12`, `12.5%`.
fn parse_percentage(text: &str) -> Option<f64> {
    let caps = PERCENTAGE.captures(text)?;
    caps[1].parse().ok()
}

/// Everything the user has picked in the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub niches: SelectionSet<String>,
    pub locations: SelectionSet<String>,
    pub buzz_scores: SelectionSet<BuzzBucket>,
    pub platforms: SelectionSet<Platform>,
    pub followers: RangeValue,
    pub avg_views: RangeValue,
    pub engagement: RangeValue,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            niches: SelectionSet::default(),
            locations: SelectionSet::default(),
            buzz_scores: SelectionSet::default(),
            platforms: SelectionSet::default(),
            followers: RangeDimension::Followers.config().default_value(),
            avg_views: RangeDimension::AvgViews.config().default_value(),
            engagement: RangeDimension::Engagement.config().default_value(),
        }
    }
}

impl FilterSelection {
    #[must_use]
    pub fn toggle_niche(&self, niche: &str) -> Self {
        Self {
            niches: self.niches.toggled(niche.to_string()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn clear_niches(&self) -> Self {
        Self {
            niches: SelectionSet::default(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_location(&self, location: &str) -> Self {
        Self {
            locations: self.locations.toggled(location.to_string()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_buzz_bucket(&self, bucket: BuzzBucket) -> Self {
        Self {
            buzz_scores: self.buzz_scores.toggled(bucket),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_platform(&self, platform: Platform) -> Self {
        Self {
            platforms: self.platforms.toggled(platform),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn range(&self, dimension: RangeDimension) -> RangeValue {
        match dimension {
            RangeDimension::Followers => self.followers,
            RangeDimension::AvgViews => self.avg_views,
            RangeDimension::Engagement => self.engagement,
        }
    }

    /// A copy with `dimension` set to `value`. An inverted pair is stored
    /// with its bounds swapped.
    #[must_use]
    pub fn with_range(&self, dimension: RangeDimension, value: RangeValue) -> Self {
        let value = if value.min > value.max {
            RangeValue {
                min: value.max,
                max: value.min,
            }
        } else {
            value
        };
        let mut next = self.clone();
        match dimension {
            RangeDimension::Followers => next.followers = value,
            RangeDimension::AvgViews => next.avg_views = value,
            RangeDimension::Engagement => next.engagement = value,
        }
        next
    }

    /// Move the lower slider handle; it never passes the upper handle.
    #[must_use]
    pub fn drag_min(&self, dimension: RangeDimension, percentage: f64) -> Self {
        let current = self.range(dimension);
        let min = dimension.config().value_at(percentage).min(current.max);
        self.with_range(dimension, RangeValue { min, ..current })
    }

    /// Move the upper slider handle; it never passes the lower handle.
    #[must_use]
    pub fn drag_max(&self, dimension: RangeDimension, percentage: f64) -> Self {
        let current = self.range(dimension);
        let max = dimension.config().value_at(percentage).max(current.min);
        self.with_range(dimension, RangeValue { max, ..current })
    }

    /// Apply text typed into the lower-bound field. Malformed text leaves
    /// the selection unchanged.
    #[must_use]
    pub fn type_min(&self, dimension: RangeDimension, text: &str) -> Self {
        match dimension.config().parse_value(text) {
            Some(min) => {
                let current = self.range(dimension);
                self.with_range(dimension, RangeValue { min, ..current })
            }
            None => self.clone(),
        }
    }

    /// Apply text typed into the upper-bound field. Malformed text leaves
    /// the selection unchanged.
    #[must_use]
    pub fn type_max(&self, dimension: RangeDimension, text: &str) -> Self {
        match dimension.config().parse_value(text) {
            Some(max) => {
                let current = self.range(dimension);
                self.with_range(dimension, RangeValue { max, ..current })
            }
            None => self.clone(),
        }
    }

    #[must_use]
    pub fn reset_range(&self, dimension: RangeDimension) -> Self {
        self.with_range(dimension, dimension.config().default_value())
    }

    #[must_use]
    pub fn is_range_modified(&self, dimension: RangeDimension) -> bool {
        self.range(dimension) != dimension.config().default_value()
    }

    /// Niche catalogue with the selected niches moved to the front.
    #[must_use]
    pub fn ordered_niches<'a>(&self, all: &'a [String]) -> Vec<&'a String> {
        let (selected, unselected): (Vec<&String>, Vec<&String>) =
            all.iter().partition(|n| self.niches.contains(n));
        selected.into_iter().chain(unselected).collect()
    }

    /// Build the criteria object, including only dimensions that deviate
    /// from their defaults. Range bounds are passed through unrounded.
    #[must_use]
    pub fn to_criteria(&self) -> FilterCriteria {
        let range = |dimension: RangeDimension| {
            if self.is_range_modified(dimension) {
                let value = self.range(dimension);
                (Some(value.min), Some(value.max))
            } else {
                (None, None)
            }
        };
        let (followers_min, followers_max) = range(RangeDimension::Followers);
        let (engagement_min, engagement_max) = range(RangeDimension::Engagement);
        let (avg_views_min, avg_views_max) = range(RangeDimension::AvgViews);

        FilterCriteria {
            niches: self.niches.to_criterion(),
            locations: self.locations.to_criterion(),
            buzz_scores: self.buzz_scores.to_criterion(),
            platforms: self.platforms.to_criterion(),
            followers_min,
            followers_max,
            engagement_min,
            engagement_max,
            avg_views_min,
            avg_views_max,
        }
    }
}

impl FromStr for RangeDimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "followers" => Ok(RangeDimension::Followers),
            "avg_views" | "avgViews" => Ok(RangeDimension::AvgViews),
            "engagement" => Ok(RangeDimension::Engagement),
            other => Err(CoreError::UnknownRangeDimension(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_derives_empty_criteria() {
        assert!(FilterSelection::default().to_criteria().is_empty());
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let base = FilterSelection::default();
        let once = base.toggle_niche("Tech");
        assert!(once.niches.contains(&"Tech".to_string()));
        assert_eq!(once.toggle_niche("Tech"), base);
    }

    #[test]
    fn toggle_returns_new_value_and_leaves_original() {
        let base = FilterSelection::default();
        let next = base.toggle_platform(Platform::Tiktok);
        assert!(base.platforms.is_empty());
        assert_eq!(next.platforms.len(), 1);
    }

    #[test]
    fn multi_select_dimensions_included_only_when_non_empty() {
        let selection = FilterSelection::default()
            .toggle_niche("Fitness")
            .toggle_niche("Tech")
            .toggle_buzz_bucket(BuzzBucket::NinetyPlus);
        let criteria = selection.to_criteria();
        assert_eq!(
            criteria.niches,
            Some(vec!["Fitness".to_string(), "Tech".to_string()])
        );
        assert_eq!(criteria.buzz_scores, Some(vec![BuzzBucket::NinetyPlus]));
        assert!(criteria.locations.is_none());
        assert!(criteria.platforms.is_none());
    }

    #[test]
    fn range_included_only_when_it_differs_from_default() {
        let selection = FilterSelection::default().with_range(
            RangeDimension::Followers,
            RangeValue {
                min: 45_500.5,
                max: 300_000.0,
            },
        );
        let criteria = selection.to_criteria();
        assert_eq!(criteria.followers_min, Some(45_500.5));
        assert_eq!(criteria.followers_max, Some(300_000.0));
        assert!(criteria.engagement_min.is_none());
        assert!(criteria.avg_views_max.is_none());
    }

    #[test]
    fn range_set_back_to_default_is_dropped() {
        let selection = FilterSelection::default()
            .with_range(
                RangeDimension::Engagement,
                RangeValue {
                    min: 10.0,
                    max: 20.0,
                },
            )
            .reset_range(RangeDimension::Engagement);
        assert!(selection.to_criteria().is_empty());
    }

    #[test]
    fn inverted_range_is_swapped() {
        let selection = FilterSelection::default().with_range(
            RangeDimension::AvgViews,
            RangeValue {
                min: 90_000.0,
                max: 10_000.0,
            },
        );
        assert_eq!(
            selection.avg_views,
            RangeValue {
                min: 10_000.0,
                max: 90_000.0
            }
        );
    }

    #[test]
    fn slider_snaps_to_step_and_handles_do_not_cross() {
        let config = RangeDimension::Followers.config();
        assert!((config.value_at(50.0) - 165_000.0).abs() < f64::EPSILON);
        assert!((config.value_at(-20.0) - 30_000.0).abs() < f64::EPSILON);
        assert!((config.percentage_of(165_000.0) - 50.0).abs() < 1e-9);

        let selection = FilterSelection::default()
            .drag_max(RangeDimension::Followers, 10.0)
            .drag_min(RangeDimension::Followers, 90.0);
        assert_eq!(selection.followers.min, selection.followers.max);
    }

    #[test]
    fn typed_values_parse_abbreviations() {
        let followers = RangeDimension::Followers.config();
        assert_eq!(followers.parse_value("30k"), Some(30_000.0));
        assert_eq!(followers.parse_value("1.5M"), Some(1_500_000.0));
        assert_eq!(followers.parse_value("132,043"), Some(132_043.0));
        assert_eq!(followers.parse_value("abc"), None);
        assert_eq!(followers.parse_value(""), None);

        let engagement = RangeDimension::Engagement.config();
        assert_eq!(engagement.parse_value("12.5%"), Some(12.5));
        assert_eq!(engagement.parse_value("7"), Some(7.0));
        assert_eq!(engagement.parse_value("%"), None);
    }

    #[test]
    fn malformed_typed_value_leaves_selection_unchanged() {
        let base = FilterSelection::default();
        assert_eq!(base.type_min(RangeDimension::Followers, "lots"), base);
        let typed = base.type_max(RangeDimension::Followers, "250k");
        assert!((typed.followers.max - 250_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn format_value_matches_dimension() {
        assert_eq!(RangeDimension::Followers.config().format_value(30_000.0), "30K");
        assert_eq!(
            RangeDimension::AvgViews.config().format_value(5_000_000.0),
            "5.0M"
        );
        assert_eq!(RangeDimension::Engagement.config().format_value(12.0), "12%");
    }

    #[test]
    fn range_dimension_parses_from_str() {
        assert_eq!(
            "avgViews".parse::<RangeDimension>(),
            Ok(RangeDimension::AvgViews)
        );
        assert_eq!(
            "engagement".parse::<RangeDimension>(),
            Ok(RangeDimension::Engagement)
        );
        assert_eq!(
            "likes".parse::<RangeDimension>(),
            Err(CoreError::UnknownRangeDimension("likes".to_string()))
        );
    }

    #[test]
    fn ordered_niches_puts_selected_first() {
        let all: Vec<String> = ["Productivity", "Trading", "Crypto", "AI"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let selection = FilterSelection::default()
            .toggle_niche("Crypto")
            .toggle_niche("AI");
        let ordered: Vec<&str> = selection
            .ordered_niches(&all)
            .into_iter()
            .map(String::as_str)
            .collect();
        assert_eq!(ordered, vec!["Crypto", "AI", "Productivity", "Trading"]);
    }

    #[test]
    fn selection_set_collects_without_duplicates() {
        let set: SelectionSet<&str> = ["a", "b", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
