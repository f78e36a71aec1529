//! Aggregate statistics shown in the directory header.

use serde::Serialize;

use crate::creators::{ChangeType, Creator};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CreatorMetrics {
    pub total_creators: usize,
    pub avg_followers: u64,
    pub avg_views: u64,
    /// Mean engagement rate, rounded to two decimals.
    pub avg_engagement: f64,
    /// Mean signed followers change across creators that report one.
    pub change_percentage: f64,
    pub change_type: ChangeType,
}

/// Compute header metrics over `creators`. An empty list yields zeros and
/// a positive change.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn calculate_metrics(creators: &[Creator]) -> CreatorMetrics {
    if creators.is_empty() {
        return CreatorMetrics::default();
    }

    let count = creators.len() as f64;
    let total_followers: f64 = creators.iter().map(|c| c.followers as f64).sum();
    let total_views: f64 = creators.iter().map(|c| c.avg_views as f64).sum();
    let total_engagement: f64 = creators.iter().map(|c| c.engagement).sum();

    let changes: Vec<f64> = creators
        .iter()
        .filter_map(Creator::signed_followers_change)
        .collect();
    let change_percentage = if changes.is_empty() {
        0.0
    } else {
        round2(changes.iter().sum::<f64>() / changes.len() as f64)
    };

    CreatorMetrics {
        total_creators: creators.len(),
        avg_followers: (total_followers / count).round() as u64,
        avg_views: (total_views / count).round() as u64,
        avg_engagement: round2(total_engagement / count),
        change_percentage,
        change_type: ChangeType::of(change_percentage),
    }
}

// Halves round toward positive infinity, so -2.625 becomes -2.62.
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{creator, with_followers, with_followers_change};

    #[test]
    fn empty_list_yields_zeros() {
        let metrics = calculate_metrics(&[]);
        assert_eq!(metrics.total_creators, 0);
        assert_eq!(metrics.avg_followers, 0);
        assert_eq!(metrics.avg_views, 0);
        assert!(metrics.avg_engagement.abs() < f64::EPSILON);
        assert!(metrics.change_percentage.abs() < f64::EPSILON);
        assert_eq!(metrics.change_type, ChangeType::Positive);
    }

    #[test]
    fn averages_are_rounded() {
        let creators = vec![
            Creator {
                engagement: 4.0,
                avg_views: 1_001,
                ..with_followers("a", 100)
            },
            Creator {
                engagement: 5.0111,
                avg_views: 2_000,
                ..with_followers("b", 201)
            },
        ];
        let metrics = calculate_metrics(&creators);
        assert_eq!(metrics.total_creators, 2);
        assert_eq!(metrics.avg_followers, 151);
        assert_eq!(metrics.avg_views, 1_501);
        assert!((metrics.avg_engagement - 4.51).abs() < 1e-9);
    }

    #[test]
    fn change_is_mean_of_signed_reported_changes() {
        let creators = vec![
            with_followers_change("a", 10.0, ChangeType::Positive),
            with_followers_change("b", 4.0, ChangeType::Negative),
            creator("c"),
        ];
        let metrics = calculate_metrics(&creators);
        assert!((metrics.change_percentage - 3.0).abs() < 1e-9);
        assert_eq!(metrics.change_type, ChangeType::Positive);
    }

    #[test]
    fn net_negative_change_is_negative() {
        let creators = vec![
            with_followers_change("a", 1.25, ChangeType::Positive),
            with_followers_change("b", 6.5, ChangeType::Negative),
        ];
        let metrics = calculate_metrics(&creators);
        assert!((metrics.change_percentage + 2.62).abs() < 1e-9);
        assert_eq!(metrics.change_type, ChangeType::Negative);
    }

    #[test]
    fn halves_round_toward_positive_infinity() {
        assert!((round2(2.375) - 2.38).abs() < 1e-9);
        assert!((round2(-0.125) + 0.12).abs() < 1e-9);
        assert!((round2(-1.006) + 1.01).abs() < 1e-9);
    }

    #[test]
    fn no_reported_changes_is_zero_positive() {
        let metrics = calculate_metrics(&[creator("a"), creator("b")]);
        assert!(metrics.change_percentage.abs() < f64::EPSILON);
        assert_eq!(metrics.change_type, ChangeType::Positive);
    }
}
