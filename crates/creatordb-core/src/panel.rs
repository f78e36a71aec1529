//! Filter panel controller: the selection being edited plus the state of
//! the per-dimension dropdowns.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use crate::filters::FilterCriteria;
use crate::selection::{FilterSelection, RangeDimension};
use crate::CoreError;

/// Countries offered by the location dropdown.
pub const LOCATION_OPTIONS: [&str; 30] = [
    "United States",
    "United Kingdom",
    "Canada",
    "Australia",
    "Germany",
    "France",
    "Spain",
    "Italy",
    "Netherlands",
    "Sweden",
    "Norway",
    "Denmark",
    "Finland",
    "Japan",
    "South Korea",
    "Singapore",
    "Brazil",
    "Mexico",
    "Argentina",
    "India",
    "China",
    "Russia",
    "Poland",
    "Czech Republic",
    "Austria",
    "Switzerland",
    "Belgium",
    "Portugal",
    "Ireland",
    "New Zealand",
];

/// A filter with its own dropdown. Niches are edited inline in the
/// category row and have no dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Followers,
    AvgViews,
    Engagement,
    Location,
    Platform,
    BuzzScore,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 6] = [
        FilterDimension::Followers,
        FilterDimension::AvgViews,
        FilterDimension::Engagement,
        FilterDimension::Location,
        FilterDimension::Platform,
        FilterDimension::BuzzScore,
    ];

    #[must_use]
    pub fn range(self) -> Option<RangeDimension> {
        match self {
            FilterDimension::Followers => Some(RangeDimension::Followers),
            FilterDimension::AvgViews => Some(RangeDimension::AvgViews),
            FilterDimension::Engagement => Some(RangeDimension::Engagement),
            FilterDimension::Location | FilterDimension::Platform | FilterDimension::BuzzScore => {
                None
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterDimension::Followers => "followers",
            FilterDimension::AvgViews => "avg_views",
            FilterDimension::Engagement => "engagement",
            FilterDimension::Location => "location",
            FilterDimension::Platform => "platform",
            FilterDimension::BuzzScore => "buzz_score",
        }
    }
}

impl FromStr for FilterDimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterDimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFilterDimension(s.to_string()))
    }
}

/// How a dropdown was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownOutcome {
    Applied(FilterDimension),
    Reset(FilterDimension),
    /// Outside click, escape, or another dropdown opening.
    Cancelled(FilterDimension),
}

#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    selection: FilterSelection,
    open: Option<FilterDimension>,
    applied: BTreeSet<FilterDimension>,
}

impl FilterPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    #[must_use]
    pub fn open_dropdown(&self) -> Option<FilterDimension> {
        self.open
    }

    /// Dimensions whose dropdown was last confirmed with a non-default value.
    #[must_use]
    pub fn is_applied(&self, dimension: FilterDimension) -> bool {
        self.applied.contains(&dimension)
    }

    /// Replace the selection with an edited copy.
    pub fn edit(&mut self, f: impl FnOnce(&FilterSelection) -> FilterSelection) {
        self.selection = f(&self.selection);
    }

    /// Open `dimension`'s dropdown. Any other open dropdown is closed first
    /// and reported as cancelled.
    pub fn open(&mut self, dimension: FilterDimension) -> Option<DropdownOutcome> {
        let previous = self.open.replace(dimension);
        match previous {
            Some(prev) if prev != dimension => Some(DropdownOutcome::Cancelled(prev)),
            _ => None,
        }
    }

    /// Trigger-button click: opens the dropdown, or cancels it if it is
    /// already open.
    pub fn toggle(&mut self, dimension: FilterDimension) -> Option<DropdownOutcome> {
        if self.open == Some(dimension) {
            self.cancel()
        } else {
            self.open(dimension)
        }
    }

    /// Close the open dropdown without touching its applied mark.
    pub fn cancel(&mut self) -> Option<DropdownOutcome> {
        self.open.take().map(DropdownOutcome::Cancelled)
    }

    /// Confirm the open dropdown. It is marked applied iff its value differs
    /// from the default.
    pub fn confirm(&mut self) -> Option<DropdownOutcome> {
        let dimension = self.open.take()?;
        if self.is_modified(dimension) {
            self.applied.insert(dimension);
        } else {
            self.applied.remove(&dimension);
        }
        Some(DropdownOutcome::Applied(dimension))
    }

    /// Restore the open dropdown's default value, clear its applied mark
    /// and close it.
    pub fn reset(&mut self) -> Option<DropdownOutcome> {
        let dimension = self.open.take()?;
        self.selection = match dimension.range() {
            Some(range) => self.selection.reset_range(range),
            None => {
                let mut next = self.selection.clone();
                match dimension {
                    FilterDimension::Location => next.locations = Default::default(),
                    FilterDimension::Platform => next.platforms = Default::default(),
                    FilterDimension::BuzzScore => next.buzz_scores = Default::default(),
                    _ => {}
                }
                next
            }
        };
        self.applied.remove(&dimension);
        Some(DropdownOutcome::Reset(dimension))
    }

    #[must_use]
    pub fn is_modified(&self, dimension: FilterDimension) -> bool {
        match dimension.range() {
            Some(range) => self.selection.is_range_modified(range),
            None => match dimension {
                FilterDimension::Location => !self.selection.locations.is_empty(),
                FilterDimension::Platform => !self.selection.platforms.is_empty(),
                FilterDimension::BuzzScore => !self.selection.buzz_scores.is_empty(),
                _ => false,
            },
        }
    }

    /// Criteria for the "Apply filters" button, built fresh from the current
    /// selection.
    #[must_use]
    pub fn apply(&self) -> FilterCriteria {
        self.selection.to_criteria()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creators::Platform;
    use crate::filters::BuzzBucket;
    use crate::selection::RangeValue;

    #[test]
    fn only_one_dropdown_open_at_a_time() {
        let mut panel = FilterPanel::new();
        assert_eq!(panel.open(FilterDimension::Location), None);
        assert_eq!(
            panel.open(FilterDimension::Platform),
            Some(DropdownOutcome::Cancelled(FilterDimension::Location))
        );
        assert_eq!(panel.open_dropdown(), Some(FilterDimension::Platform));
    }

    #[test]
    fn toggle_closes_the_open_dropdown() {
        let mut panel = FilterPanel::new();
        panel.toggle(FilterDimension::Engagement);
        assert_eq!(
            panel.toggle(FilterDimension::Engagement),
            Some(DropdownOutcome::Cancelled(FilterDimension::Engagement))
        );
        assert_eq!(panel.open_dropdown(), None);
    }

    #[test]
    fn confirm_marks_applied_only_when_modified() {
        let mut panel = FilterPanel::new();
        panel.open(FilterDimension::Platform);
        assert_eq!(
            panel.confirm(),
            Some(DropdownOutcome::Applied(FilterDimension::Platform))
        );
        assert!(!panel.is_applied(FilterDimension::Platform));

        panel.open(FilterDimension::Platform);
        panel.edit(|s| s.toggle_platform(Platform::Instagram));
        panel.confirm();
        assert!(panel.is_applied(FilterDimension::Platform));
        assert_eq!(panel.open_dropdown(), None);
    }

    #[test]
    fn reset_restores_default_and_clears_mark() {
        let mut panel = FilterPanel::new();
        panel.open(FilterDimension::Followers);
        panel.edit(|s| {
            s.with_range(
                RangeDimension::Followers,
                RangeValue {
                    min: 50_000.0,
                    max: 100_000.0,
                },
            )
        });
        panel.confirm();
        assert!(panel.is_applied(FilterDimension::Followers));

        panel.open(FilterDimension::Followers);
        assert_eq!(
            panel.reset(),
            Some(DropdownOutcome::Reset(FilterDimension::Followers))
        );
        assert!(!panel.is_applied(FilterDimension::Followers));
        assert!(!panel.is_modified(FilterDimension::Followers));
        assert!(panel.apply().is_empty());
    }

    #[test]
    fn reset_clears_multi_select_dimension() {
        let mut panel = FilterPanel::new();
        panel.open(FilterDimension::BuzzScore);
        panel.edit(|s| s.toggle_buzz_bucket(BuzzBucket::NinetyPlus));
        panel.reset();
        assert!(panel.selection().buzz_scores.is_empty());
    }

    #[test]
    fn cancel_keeps_applied_mark() {
        let mut panel = FilterPanel::new();
        panel.open(FilterDimension::Location);
        panel.edit(|s| s.toggle_location("Japan"));
        panel.confirm();
        panel.open(FilterDimension::Location);
        assert_eq!(
            panel.cancel(),
            Some(DropdownOutcome::Cancelled(FilterDimension::Location))
        );
        assert!(panel.is_applied(FilterDimension::Location));
    }

    #[test]
    fn confirm_and_reset_without_open_dropdown_do_nothing() {
        let mut panel = FilterPanel::new();
        assert_eq!(panel.confirm(), None);
        assert_eq!(panel.reset(), None);
        assert_eq!(panel.cancel(), None);
    }

    #[test]
    fn apply_builds_criteria_from_selection() {
        let mut panel = FilterPanel::new();
        panel.edit(|s| s.toggle_niche("Tech").toggle_location("Japan"));
        let criteria = panel.apply();
        assert_eq!(criteria.niches, Some(vec!["Tech".to_string()]));
        assert_eq!(criteria.locations, Some(vec!["Japan".to_string()]));
        assert_eq!(criteria.dimension_count(), 2);
    }

    #[test]
    fn location_options_are_unique() {
        let unique: BTreeSet<&str> = LOCATION_OPTIONS.into_iter().collect();
        assert_eq!(unique.len(), LOCATION_OPTIONS.len());
    }

    #[test]
    fn dimension_parses_from_str() {
        assert_eq!(
            "buzz_score".parse::<FilterDimension>(),
            Ok(FilterDimension::BuzzScore)
        );
        assert_eq!(
            "color".parse::<FilterDimension>(),
            Err(CoreError::UnknownFilterDimension("color".to_string()))
        );
    }
}
