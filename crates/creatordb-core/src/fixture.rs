//! YAML-backed creator dataset used as the in-memory data source.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::creators::{Creator, Mode, Niche};
use crate::ConfigError;

/// A complete directory dataset: the niche catalogue, every creator in
/// directory order, and the ids of the AI-recommended subset in
/// recommendation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub niches: Vec<Niche>,
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub ai_recommended: Vec<String>,
}

impl Fixture {
    /// The record set backing `mode`, in that mode's source order.
    #[must_use]
    pub fn creators_for(&self, mode: Mode) -> Vec<Creator> {
        match mode {
            Mode::All => self.creators.clone(),
            Mode::Ai => self
                .ai_recommended
                .iter()
                .filter_map(|id| self.find(id).cloned())
                .collect(),
        }
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Creator> {
        self.creators.iter().find(|c| c.id == id)
    }

    /// Distinct creator locations, in first-seen order.
    #[must_use]
    pub fn locations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.creators
            .iter()
            .filter_map(|c| c.location.clone())
            .filter(|loc| seen.insert(loc.clone()))
            .collect()
    }
}

/// Load and validate a creator fixture from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_fixture(path: &Path) -> Result<Fixture, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FixtureIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let fixture: Fixture = serde_yaml::from_str(&content).map_err(ConfigError::FixtureParse)?;

    validate_fixture(&fixture)?;

    tracing::debug!(
        path = %path.display(),
        creators = fixture.creators.len(),
        ai_recommended = fixture.ai_recommended.len(),
        niches = fixture.niches.len(),
        "loaded creator fixture"
    );

    Ok(fixture)
}

pub(crate) fn validate_fixture(fixture: &Fixture) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for creator in &fixture.creators {
        if creator.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "creator id must be non-empty".to_string(),
            ));
        }

        if !seen_ids.insert(creator.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate creator id: '{}'",
                creator.id
            )));
        }

        if !is_percentage(creator.buzz_score) {
            return Err(ConfigError::Validation(format!(
                "creator '{}' has buzz_score {} outside [0, 100]",
                creator.id, creator.buzz_score
            )));
        }

        if let Some(score) = creator.match_score {
            if !is_percentage(score) {
                return Err(ConfigError::Validation(format!(
                    "creator '{}' has match_score {score} outside [0, 100]",
                    creator.id
                )));
            }
        }

        if !creator.engagement.is_finite() || creator.engagement < 0.0 {
            return Err(ConfigError::Validation(format!(
                "creator '{}' has invalid engagement {}",
                creator.id, creator.engagement
            )));
        }
    }

    let mut seen_recommended = HashSet::new();
    for id in &fixture.ai_recommended {
        if !seen_ids.contains(id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "ai_recommended references unknown creator '{id}'"
            )));
        }
        if !seen_recommended.insert(id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "creator '{id}' is listed twice in ai_recommended"
            )));
        }
    }

    let mut seen_niches = HashSet::new();
    for niche in &fixture.niches {
        if niche.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "niche name must be non-empty".to_string(),
            ));
        }
        if !seen_niches.insert(niche.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate niche name: '{}'",
                niche.name
            )));
        }
    }

    Ok(())
}

fn is_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

#[cfg(test)]
#[path = "fixture_test.rs"]
mod tests;
