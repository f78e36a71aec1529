//! Filter criteria and the predicate that narrows a creator list by them.
//!
//! Dimensions combine with AND; values inside a multi-select dimension
//! combine with OR. Filtering never reorders the source list.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::creators::{Creator, Platform};
use crate::CoreError;

/// Fixed buzz-score band offered by the buzz-score filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuzzBucket {
    NinetyPlus,
    EightyToNinety,
    SeventyToEighty,
    SixtyToSeventy,
    BelowSixty,
}

/// Every bucket with its display label, highest band first.
pub const BUZZ_BUCKETS: [(&str, BuzzBucket); 5] = [
    ("90%+", BuzzBucket::NinetyPlus),
    ("80-90%", BuzzBucket::EightyToNinety),
    ("70-80%", BuzzBucket::SeventyToEighty),
    ("60-70%", BuzzBucket::SixtyToSeventy),
    ("Less than 60%", BuzzBucket::BelowSixty),
];

impl BuzzBucket {
    /// Half-open `[lower, upper)` score range covered by the bucket.
    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            BuzzBucket::NinetyPlus => (90.0, f64::INFINITY),
            BuzzBucket::EightyToNinety => (80.0, 90.0),
            BuzzBucket::SeventyToEighty => (70.0, 80.0),
            BuzzBucket::SixtyToSeventy => (60.0, 70.0),
            BuzzBucket::BelowSixty => (f64::NEG_INFINITY, 60.0),
        }
    }

    #[must_use]
    pub fn contains(self, score: f64) -> bool {
        let (lower, upper) = self.bounds();
        score >= lower && score < upper
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        BUZZ_BUCKETS
            .iter()
            .find(|(_, bucket)| *bucket == self)
            .map_or("", |(label, _)| label)
    }
}

impl std::fmt::Display for BuzzBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BuzzBucket {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BUZZ_BUCKETS
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(wanted))
            .map(|(_, bucket)| *bucket)
            .ok_or_else(|| CoreError::UnknownBuzzBucket(s.to_string()))
    }
}

impl Serialize for BuzzBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BuzzBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Query object passed to a data source. A `None` dimension imposes no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niches: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buzz_scores: Option<Vec<BuzzBucket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Platform>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_views_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_views_max: Option<f64>,
}

impl FilterCriteria {
    /// Number of constrained dimensions; a numeric range counts once.
    #[must_use]
    pub fn dimension_count(&self) -> usize {
        [
            has_values(self.niches.as_ref()),
            has_values(self.locations.as_ref()),
            has_values(self.buzz_scores.as_ref()),
            has_values(self.platforms.as_ref()),
            self.followers_min.is_some() || self.followers_max.is_some(),
            self.engagement_min.is_some() || self.engagement_max.is_some(),
            self.avg_views_min.is_some() || self.avg_views_max.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimension_count() == 0
    }

    /// Reject non-finite bounds and ranges whose lower bound exceeds the
    /// upper bound.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NonFiniteBound`] or [`CoreError::InvertedRange`]
    /// naming the first offending dimension.
    pub fn validate(&self) -> Result<(), CoreError> {
        let ranges = [
            ("followers", self.followers_min, self.followers_max),
            ("engagement", self.engagement_min, self.engagement_max),
            ("avg_views", self.avg_views_min, self.avg_views_max),
        ];
        for (dimension, min, max) in ranges {
            if let Some(value) = [min, max].into_iter().flatten().find(|v| !v.is_finite()) {
                return Err(CoreError::NonFiniteBound { dimension, value });
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(CoreError::InvertedRange {
                        dimension,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether `creator` satisfies every constrained dimension.
    #[must_use]
    pub fn matches(&self, creator: &Creator) -> bool {
        self.matches_niches(creator)
            && self.matches_platforms(creator)
            && self.matches_buzz(creator)
            && self.matches_location(creator)
            && self.matches_ranges(creator)
    }

    fn matches_niches(&self, creator: &Creator) -> bool {
        match self.niches.as_deref() {
            Some(selected) if !selected.is_empty() => {
                creator.niches.iter().any(|n| selected.contains(n))
            }
            _ => true,
        }
    }

    fn matches_platforms(&self, creator: &Creator) -> bool {
        match self.platforms.as_deref() {
            Some(selected) if !selected.is_empty() => {
                selected.iter().any(|p| creator.is_on(*p))
            }
            _ => true,
        }
    }

    fn matches_buzz(&self, creator: &Creator) -> bool {
        match self.buzz_scores.as_deref() {
            Some(selected) if !selected.is_empty() => {
                selected.iter().any(|b| b.contains(creator.buzz_score))
            }
            _ => true,
        }
    }

    /// Location matching compares the creator's country (text after the
    /// last comma) against the selection, after alias normalisation.
    fn matches_location(&self, creator: &Creator) -> bool {
        match self.locations.as_deref() {
            Some(selected) if !selected.is_empty() => {
                let Some(location) = creator.location.as_deref() else {
                    return false;
                };
                let country = normalize_country(country_of(location));
                selected
                    .iter()
                    .any(|wanted| normalize_country(country_of(wanted)) == country)
            }
            _ => true,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn matches_ranges(&self, creator: &Creator) -> bool {
        within(
            creator.followers as f64,
            self.followers_min,
            self.followers_max,
        ) && within(
            creator.engagement,
            self.engagement_min,
            self.engagement_max,
        ) && within(
            creator.avg_views as f64,
            self.avg_views_min,
            self.avg_views_max,
        )
    }
}

fn has_values<T>(values: Option<&Vec<T>>) -> bool {
    values.is_some_and(|v| !v.is_empty())
}

/// Inclusive bound check; a missing lower bound is 0 and a missing upper
/// bound is unbounded.
fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    value >= min.unwrap_or(0.0) && value <= max.unwrap_or(f64::INFINITY)
}

fn country_of(location: &str) -> &str {
    location.rsplit(',').next().unwrap_or(location).trim()
}

fn normalize_country(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.as_str() {
        "usa" | "us" | "u.s." | "u.s.a." | "united states of america" => {
            "united states".to_string()
        }
        "uk" | "u.k." | "great britain" | "england" => "united kingdom".to_string(),
        _ => lowered,
    }
}

/// Return the records of `source` that satisfy `criteria`, in source order.
#[must_use]
pub fn apply_filters(source: &[Creator], criteria: &FilterCriteria) -> Vec<Creator> {
    let filtered: Vec<Creator> = source
        .iter()
        .filter(|c| criteria.matches(c))
        .cloned()
        .collect();

    tracing::debug!(
        dimensions = criteria.dimension_count(),
        source = source.len(),
        matched = filtered.len(),
        "applied creator filters"
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        buzz_scenario, creator, ids, with_buzz, with_followers, with_niches, with_platforms,
    };

    #[test]
    fn empty_criteria_returns_source_in_order() {
        let source = buzz_scenario();
        let filtered = apply_filters(&source, &FilterCriteria::default());
        assert_eq!(filtered, source);
    }

    #[test]
    fn ninety_plus_bucket_selects_top_two_in_order() {
        let criteria = FilterCriteria {
            buzz_scores: Some(vec![BuzzBucket::NinetyPlus]),
            ..FilterCriteria::default()
        };
        let filtered = apply_filters(&buzz_scenario(), &criteria);
        let scores: Vec<f64> = filtered.iter().map(|c| c.buzz_score).collect();
        assert_eq!(scores, vec![91.0, 95.0]);
        assert_eq!(ids(&filtered), vec!["5", "6"]);
    }

    #[test]
    fn bucket_boundaries_are_half_open() {
        assert!(BuzzBucket::NinetyPlus.contains(90.0));
        assert!(!BuzzBucket::EightyToNinety.contains(90.0));
        assert!(BuzzBucket::EightyToNinety.contains(80.0));
        assert!(!BuzzBucket::SeventyToEighty.contains(80.0));
        assert!(BuzzBucket::SixtyToSeventy.contains(69.99));
        assert!(BuzzBucket::BelowSixty.contains(59.99));
        assert!(!BuzzBucket::BelowSixty.contains(60.0));
        assert!(BuzzBucket::NinetyPlus.contains(100.0));
        assert!(BuzzBucket::BelowSixty.contains(0.0));
    }

    #[test]
    fn every_score_falls_in_exactly_one_bucket() {
        for score in 0..=100 {
            let score = f64::from(score);
            let hits = BUZZ_BUCKETS
                .iter()
                .filter(|(_, b)| b.contains(score))
                .count();
            assert_eq!(hits, 1, "score {score} matched {hits} buckets");
        }
    }

    #[test]
    fn multiple_buckets_are_ored() {
        let criteria = FilterCriteria {
            buzz_scores: Some(vec![BuzzBucket::SeventyToEighty, BuzzBucket::NinetyPlus]),
            ..FilterCriteria::default()
        };
        let filtered = apply_filters(&buzz_scenario(), &criteria);
        assert_eq!(ids(&filtered), vec!["2", "5", "6"]);
    }

    #[test]
    fn buzz_filter_ignores_match_score() {
        let mut c = with_buzz("1", 55.0);
        c.match_score = Some(95.0);
        let criteria = FilterCriteria {
            buzz_scores: Some(vec![BuzzBucket::NinetyPlus]),
            ..FilterCriteria::default()
        };
        assert!(!criteria.matches(&c));
    }

    #[test]
    fn bucket_labels_parse_and_serialize() {
        assert_eq!("90%+".parse::<BuzzBucket>(), Ok(BuzzBucket::NinetyPlus));
        assert_eq!(
            "less than 60%".parse::<BuzzBucket>(),
            Ok(BuzzBucket::BelowSixty)
        );
        assert!("50-60%".parse::<BuzzBucket>().is_err());
        let json = serde_json::to_string(&BuzzBucket::EightyToNinety).expect("serialize");
        assert_eq!(json, "\"80-90%\"");
        let parsed: BuzzBucket = serde_json::from_str("\"60-70%\"").expect("deserialize");
        assert_eq!(parsed, BuzzBucket::SixtyToSeventy);
    }

    #[test]
    fn niche_dimension_matches_any_overlap() {
        let source = vec![
            with_niches("1", &["Tech", "Productivity"]),
            with_niches("2", &["Fashion"]),
            with_niches("3", &["Gaming", "Tech"]),
            with_niches("4", &[]),
        ];
        let criteria = FilterCriteria {
            niches: Some(vec!["Tech".to_string(), "Travel".to_string()]),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["1", "3"]);
    }

    #[test]
    fn platform_dimension_matches_any_account() {
        let source = vec![
            with_platforms("1", &[Platform::Instagram, Platform::Tiktok]),
            with_platforms("2", &[Platform::Youtube]),
            with_platforms("3", &[]),
        ];
        let criteria = FilterCriteria {
            platforms: Some(vec![Platform::Tiktok, Platform::Youtube]),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["1", "2"]);
    }

    #[test]
    fn followers_range_is_inclusive() {
        let source = vec![
            with_followers("1", 29_999),
            with_followers("2", 30_000),
            with_followers("3", 300_000),
            with_followers("4", 300_001),
        ];
        let criteria = FilterCriteria {
            followers_min: Some(30_000.0),
            followers_max: Some(300_000.0),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["2", "3"]);
    }

    #[test]
    fn missing_upper_bound_is_unbounded() {
        let source = vec![with_followers("1", 5), with_followers("2", 2_000_000_000)];
        let criteria = FilterCriteria {
            followers_min: Some(10.0),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["2"]);
    }

    #[test]
    fn engagement_above_one_hundred_passes_without_upper_bound() {
        let mut c = creator("1");
        c.engagement = 240.0;
        let criteria = FilterCriteria {
            engagement_min: Some(100.0),
            ..FilterCriteria::default()
        };
        assert!(criteria.matches(&c));
    }

    #[test]
    fn avg_views_range_applies() {
        let mut low = creator("1");
        low.avg_views = 4_000;
        let mut high = creator("2");
        high.avg_views = 60_000;
        let criteria = FilterCriteria {
            avg_views_min: Some(5_000.0),
            avg_views_max: Some(50_000.0),
            ..FilterCriteria::default()
        };
        assert!(apply_filters(&[low, high], &criteria).is_empty());
    }

    #[test]
    fn location_matches_country_with_aliases() {
        let mut sf = creator("1");
        sf.location = Some("San Francisco, USA".to_string());
        let mut london = creator("2");
        london.location = Some("London, UK".to_string());
        let mut tokyo = creator("3");
        tokyo.location = Some("Japan".to_string());
        let nowhere = creator("4");

        let criteria = FilterCriteria {
            locations: Some(vec!["United States".to_string(), "Japan".to_string()]),
            ..FilterCriteria::default()
        };
        let source = vec![sf, london, tokyo, nowhere];
        assert_eq!(ids(&apply_filters(&source, &criteria)), vec!["1", "3"]);

        let uk = FilterCriteria {
            locations: Some(vec!["united kingdom".to_string()]),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&source, &uk)), vec!["2"]);
    }

    #[test]
    fn location_matches_full_location_strings() {
        let sf = Creator {
            location: Some("San Francisco, USA".to_string()),
            ..creator("1")
        };
        let tokyo = Creator {
            location: Some("Tokyo, Japan".to_string()),
            ..creator("2")
        };
        let austin = Creator {
            location: Some("Austin, United States".to_string()),
            ..creator("3")
        };
        let source = vec![sf, tokyo, austin];

        let same_city = FilterCriteria {
            locations: Some(vec!["San Francisco, USA".to_string()]),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&source, &same_city)), vec!["1", "3"]);

        let japan = FilterCriteria {
            locations: Some(vec!["Tokyo, Japan".to_string()]),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&source, &japan)), vec!["2"]);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let mut a = with_niches("1", &["Tech"]);
        a.buzz_score = 92.0;
        let mut b = with_niches("2", &["Tech"]);
        b.buzz_score = 70.0;
        let mut c = with_niches("3", &["Fashion"]);
        c.buzz_score = 93.0;
        let criteria = FilterCriteria {
            niches: Some(vec!["Tech".to_string()]),
            buzz_scores: Some(vec![BuzzBucket::NinetyPlus]),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_filters(&[a, b, c], &criteria)), vec!["1"]);
    }

    #[test]
    fn empty_selection_lists_impose_no_constraint() {
        let criteria = FilterCriteria {
            niches: Some(Vec::new()),
            platforms: Some(Vec::new()),
            ..FilterCriteria::default()
        };
        assert!(criteria.is_empty());
        assert!(criteria.matches(&creator("1")));
    }

    #[test]
    fn dimension_count_counts_ranges_once() {
        let criteria = FilterCriteria {
            niches: Some(vec!["Tech".to_string()]),
            followers_min: Some(1.0),
            followers_max: Some(2.0),
            engagement_max: Some(9.0),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.dimension_count(), 3);
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let criteria = FilterCriteria {
            avg_views_min: Some(10.0),
            avg_views_max: Some(1.0),
            ..FilterCriteria::default()
        };
        assert!(matches!(
            criteria.validate(),
            Err(CoreError::InvertedRange {
                dimension: "avg_views",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_non_finite_bounds() {
        let nan_min = FilterCriteria {
            followers_min: Some(f64::NAN),
            ..FilterCriteria::default()
        };
        assert!(matches!(
            nan_min.validate(),
            Err(CoreError::NonFiniteBound {
                dimension: "followers",
                ..
            })
        ));

        let infinite_max = FilterCriteria {
            engagement_min: Some(1.0),
            engagement_max: Some(f64::INFINITY),
            ..FilterCriteria::default()
        };
        assert!(matches!(
            infinite_max.validate(),
            Err(CoreError::NonFiniteBound {
                dimension: "engagement",
                ..
            })
        ));

        let finite = FilterCriteria {
            avg_views_min: Some(0.0),
            avg_views_max: Some(5_000_000.0),
            ..FilterCriteria::default()
        };
        assert!(finite.validate().is_ok());
    }

    #[test]
    fn criteria_serializes_only_present_dimensions() {
        let criteria = FilterCriteria {
            buzz_scores: Some(vec![BuzzBucket::NinetyPlus]),
            ..FilterCriteria::default()
        };
        let json = serde_json::to_value(&criteria).expect("serialize");
        assert_eq!(json, serde_json::json!({ "buzz_scores": ["90%+"] }));
    }
}
