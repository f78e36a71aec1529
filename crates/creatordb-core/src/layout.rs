//! Responsive truncation of label rows.
//!
//! Widths are measured by the caller; everything here is pure arithmetic
//! over those measurements.

/// Gap and safety margin used by the category row at a viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// `>= 1280px`
    ExtraLarge,
    /// `>= 1024px`
    Large,
    Small,
}

impl Breakpoint {
    #[must_use]
    pub fn from_viewport(width: f64) -> Self {
        if width >= 1280.0 {
            Breakpoint::ExtraLarge
        } else if width >= 1024.0 {
            Breakpoint::Large
        } else {
            Breakpoint::Small
        }
    }

    #[must_use]
    pub fn gap(self) -> f64 {
        match self {
            Breakpoint::ExtraLarge => 10.0,
            Breakpoint::Large => 8.0,
            Breakpoint::Small => 6.0,
        }
    }

    #[must_use]
    pub fn safety_margin(self) -> f64 {
        match self {
            Breakpoint::ExtraLarge => 25.0,
            Breakpoint::Large | Breakpoint::Small => 15.0,
        }
    }
}

const DIVIDER_WIDTH: f64 = 1.0;
const HASHTAG_GAP: f64 = 8.0;
const HASHTAG_MORE_WIDTH: f64 = 40.0;

/// Number of leading labels that fit in `available`.
///
/// Adjacent labels are separated by `gap`. When `more_control` is given and
/// not every label fits, room for that control plus one gap is reserved at
/// the end of the row.
#[must_use]
pub fn fit_labels(widths: &[f64], available: f64, gap: f64, more_control: Option<f64>) -> usize {
    let row_width = |count: usize| -> f64 {
        let labels: f64 = widths[..count].iter().sum();
        #[allow(clippy::cast_precision_loss)]
        let gaps = count.saturating_sub(1) as f64 * gap;
        labels + gaps
    };

    if row_width(widths.len()) <= available {
        return widths.len();
    }

    let reserve = more_control.map_or(0.0, |w| w + gap);
    (0..widths.len())
        .take_while(|&i| row_width(i + 1) + reserve <= available)
        .count()
}

/// Visible prefix of the niche category row.
///
/// The row shares its container with the "view all" and "clear all"
/// buttons and a divider, so those widths, four gaps and the breakpoint's
/// safety margin are subtracted before fitting labels.
#[must_use]
pub fn category_row_count(
    widths: &[f64],
    container: f64,
    view_all: f64,
    clear_all: f64,
    viewport: f64,
) -> usize {
    let breakpoint = Breakpoint::from_viewport(viewport);
    let reserved = view_all
        + clear_all
        + DIVIDER_WIDTH
        + breakpoint.gap() * 4.0
        + breakpoint.safety_margin();
    let available = (container - reserved).max(0.0);
    fit_labels(widths, available, breakpoint.gap(), None)
}

/// Visible prefix of a creator's hashtag row. Always shows at least one
/// hashtag when there are any; the rest go behind a dropdown.
#[must_use]
pub fn hashtag_row_count(widths: &[f64], container: f64) -> usize {
    if widths.is_empty() {
        return 0;
    }
    fit_labels(widths, container, HASHTAG_GAP, Some(HASHTAG_MORE_WIDTH)).max(1)
}
