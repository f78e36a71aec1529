//! Creator browsing commands.
//!
//! Flags are fed through the same filter panel, directory and list
//! controllers the dashboard uses, so a command line answers exactly what
//! the equivalent clicks would show.

mod render;

use clap::Args;
use creatordb_core::{
    BuzzBucket, CreatorDirectory, DirectoryStatus, FilterCriteria, FilterDimension, FilterPanel,
    ListView, Mode, Platform, RangeDimension, RangeValue, SortDirection, SortField, SortState,
    ViewMode,
};
use creatordb_db::DataSource;

pub(crate) use render::{render_card, render_detail, render_list, render_metrics};

/// Filter flags shared by `creators` and `metrics`.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Niche to include (repeatable)
    #[arg(long = "niche")]
    pub niches: Vec<String>,
    /// Location or country to include (repeatable)
    #[arg(long = "location")]
    pub locations: Vec<String>,
    /// Platform to include: instagram, tiktok, youtube or x (alias twitter) (repeatable)
    #[arg(long = "platform")]
    pub platforms: Vec<Platform>,
    /// Buzz score bucket, e.g. "90%+" or "60-70%" (repeatable)
    #[arg(long = "buzz")]
    pub buzz_scores: Vec<BuzzBucket>,
    /// Followers range as MIN:MAX, e.g. 30k:1.5M; either side may be empty
    #[arg(long, value_parser = parse_followers)]
    pub followers: Option<RangeValue>,
    /// Average views range as MIN:MAX
    #[arg(long, value_parser = parse_avg_views)]
    pub avg_views: Option<RangeValue>,
    /// Engagement range in percent as MIN:MAX, e.g. 2:10%
    #[arg(long, value_parser = parse_engagement)]
    pub engagement: Option<RangeValue>,
}

impl FilterArgs {
    /// Walk the panel through one confirmed dropdown per flag group.
    pub(crate) fn to_panel(&self) -> FilterPanel {
        let mut panel = FilterPanel::new();

        panel.edit(|s| {
            unique(&self.niches)
                .into_iter()
                .fold(s.clone(), |acc, niche| acc.toggle_niche(niche))
        });

        if !self.locations.is_empty() {
            panel.open(FilterDimension::Location);
            panel.edit(|s| {
                unique(&self.locations)
                    .into_iter()
                    .fold(s.clone(), |acc, location| acc.toggle_location(location))
            });
            panel.confirm();
        }

        if !self.platforms.is_empty() {
            panel.open(FilterDimension::Platform);
            panel.edit(|s| {
                unique(&self.platforms)
                    .into_iter()
                    .fold(s.clone(), |acc, platform| acc.toggle_platform(*platform))
            });
            panel.confirm();
        }

        if !self.buzz_scores.is_empty() {
            panel.open(FilterDimension::BuzzScore);
            panel.edit(|s| {
                unique(&self.buzz_scores)
                    .into_iter()
                    .fold(s.clone(), |acc, bucket| acc.toggle_buzz_bucket(*bucket))
            });
            panel.confirm();
        }

        let ranges = [
            (FilterDimension::Followers, RangeDimension::Followers, self.followers),
            (FilterDimension::AvgViews, RangeDimension::AvgViews, self.avg_views),
            (FilterDimension::Engagement, RangeDimension::Engagement, self.engagement),
        ];
        for (dimension, range, value) in ranges {
            if let Some(value) = value {
                panel.open(dimension);
                panel.edit(|s| s.with_range(range, value));
                panel.confirm();
            }
        }

        panel
    }
}

fn unique<T: PartialEq>(values: &[T]) -> Vec<&T> {
    let mut seen: Vec<&T> = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn parse_followers(raw: &str) -> Result<RangeValue, String> {
    parse_range(RangeDimension::Followers, raw)
}

fn parse_avg_views(raw: &str) -> Result<RangeValue, String> {
    parse_range(RangeDimension::AvgViews, raw)
}

fn parse_engagement(raw: &str) -> Result<RangeValue, String> {
    parse_range(RangeDimension::Engagement, raw)
}

/// Parse `MIN:MAX` with the dimension's text syntax. An empty side keeps
/// that bound at its default.
pub(crate) fn parse_range(dimension: RangeDimension, raw: &str) -> Result<RangeValue, String> {
    let config = dimension.config();
    let default = config.default_value();
    let (min, max) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX for {}, got '{raw}'", dimension.as_str()))?;

    let bound = |text: &str, fallback: f64| -> Result<f64, String> {
        if text.trim().is_empty() {
            return Ok(fallback);
        }
        config
            .parse_value(text)
            .ok_or_else(|| format!("invalid {} value '{}'", dimension.as_str(), text.trim()))
    };

    Ok(RangeValue {
        min: bound(min, default.min)?,
        max: bound(max, default.max)?,
    })
}

/// Display options for `creators`.
#[derive(Debug, Default)]
pub(crate) struct BrowseOptions {
    pub mode: Mode,
    pub sort: Option<SortField>,
    pub ascending: bool,
    pub view: ViewMode,
    pub detail: Option<String>,
    pub email: Option<String>,
}

impl BrowseOptions {
    fn sort_state(&self) -> SortState {
        SortState {
            field: self.sort,
            direction: if self.ascending {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        }
    }
}

/// Fetch both record sets and the niche catalogue into a ready directory.
async fn load_directory(source: &DataSource, mode: Mode) -> anyhow::Result<CreatorDirectory> {
    let mut directory = CreatorDirectory::new();
    let unfiltered = FilterCriteria::default();

    let fetched = tokio::try_join!(
        source.list_creators(Mode::Ai, &unfiltered),
        source.list_creators(Mode::All, &unfiltered),
        source.list_niches(),
    );
    match fetched {
        Ok((ai, all, niches)) => directory.load(ai, all, niches),
        Err(e) => {
            directory.fail(e.to_string());
            anyhow::bail!("failed to load creators: {e}");
        }
    }

    directory.switch_mode(mode);
    Ok(directory)
}

/// Run the panel's criteria against the source for the directory's mode.
async fn apply_criteria(
    source: &DataSource,
    directory: &mut CreatorDirectory,
    criteria: &FilterCriteria,
) -> anyhow::Result<()> {
    if criteria.is_empty() {
        return Ok(());
    }

    let ticket = directory.begin_apply();
    let result = source
        .list_creators(directory.mode(), criteria)
        .await
        .map_err(|e| e.to_string());
    directory.complete_apply(ticket, result);

    if let DirectoryStatus::Failed(message) = directory.status() {
        anyhow::bail!("filter request failed: {message}");
    }

    tracing::debug!(
        dimensions = criteria.dimension_count(),
        results = directory.filtered().len(),
        "applied filters"
    );
    Ok(())
}

pub(crate) async fn filtered_directory(
    source: &DataSource,
    mode: Mode,
    filters: &FilterArgs,
) -> anyhow::Result<CreatorDirectory> {
    let criteria = filters.to_panel().apply();
    criteria.validate()?;

    let mut directory = load_directory(source, mode).await?;
    apply_criteria(source, &mut directory, &criteria).await?;
    Ok(directory)
}

/// List creators matching `filters`.
///
/// # Errors
///
/// Returns an error if the source query fails or `--detail` names a creator
/// that is not displayed.
pub(crate) async fn run_creators(
    source: &DataSource,
    filters: &FilterArgs,
    options: &BrowseOptions,
) -> anyhow::Result<()> {
    let directory = filtered_directory(source, options.mode, filters).await?;

    if let Some(id) = options.email.as_deref() {
        let copied = directory.copy_email(id, |email| {
            use std::io::Write;
            writeln!(std::io::stdout(), "{email}")
        });
        if !copied {
            anyhow::bail!("creator '{id}' has no email address in {} mode", directory.mode());
        }
        return Ok(());
    }

    let mut view = ListView::new();
    view.set_sort(options.sort_state());
    view.set_view_mode(options.view);
    let displayed = view.displayed(directory.filtered());

    if let Some(id) = options.detail.as_deref() {
        view.open_detail(id);
        let creator = view
            .detail(&displayed)
            .ok_or_else(|| anyhow::anyhow!("creator '{id}' is not in the displayed list"))?;
        println!("{}", render_detail(creator));
        return Ok(());
    }

    println!("{}", render_metrics(directory.metrics()));
    println!();

    if displayed.is_empty() {
        println!("no creators match the selected filters");
        return Ok(());
    }

    match view.view_mode() {
        ViewMode::Cards => {
            for creator in &displayed {
                println!("{}", render_card(creator));
            }
        }
        ViewMode::List => {
            for line in render_list(&displayed) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// Print header metrics for creators matching `filters`.
///
/// # Errors
///
/// Returns an error if the source query fails.
pub(crate) async fn run_metrics(
    source: &DataSource,
    mode: Mode,
    filters: &FilterArgs,
) -> anyhow::Result<()> {
    let directory = filtered_directory(source, mode, filters).await?;
    println!("{}", render_metrics(directory.metrics()));
    Ok(())
}

/// Print the niche catalogue.
///
/// # Errors
///
/// Returns an error if the source query fails.
pub(crate) async fn run_niches(source: &DataSource) -> anyhow::Result<()> {
    let niches = source.list_niches().await?;
    if niches.is_empty() {
        println!("no niches found; run `db seed` first");
        return Ok(());
    }

    println!("{:<10}NAME", "ID");
    for niche in &niches {
        println!("{:<10}{}", niche.id, niche.name);
    }
    Ok(())
}
