use std::path::Path;

use creatordb_core::{calculate_metrics, format::format_number, Mode};

/// Validate a fixture file and summarise what it holds.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub(crate) fn run_fixture_check(path: &Path) -> anyhow::Result<()> {
    let fixture = creatordb_core::load_fixture(path)?;
    let all = fixture.creators_for(Mode::All);
    let metrics = calculate_metrics(&all);

    println!("fixture {} is valid", path.display());
    println!("{:<18}{}", "niches", fixture.niches.len());
    println!("{:<18}{}", "creators", fixture.creators.len());
    println!("{:<18}{}", "ai recommended", fixture.ai_recommended.len());
    println!("{:<18}{}", "locations", fixture.locations().len());
    #[allow(clippy::cast_precision_loss)]
    let avg_followers = format_number(metrics.avg_followers as f64);
    println!("{:<18}{avg_followers}", "avg followers");

    Ok(())
}
