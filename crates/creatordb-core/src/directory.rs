//! Directory controller: the canonical creator lists, the filtered view and
//! its metrics.
//!
//! Filter requests are ticketed. Only the completion for the newest ticket
//! is accepted, so a slow earlier request can never overwrite a newer
//! result.

use std::fmt::Display;

use crate::creators::{Creator, Mode, Niche};
use crate::filters::{apply_filters, FilterCriteria};
use crate::fixture::Fixture;
use crate::metrics::{calculate_metrics, CreatorMetrics};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DirectoryStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Identifies one filter request. Tickets increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApplyTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request was issued; the result was discarded.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct CreatorDirectory {
    ai: Vec<Creator>,
    all: Vec<Creator>,
    niches: Vec<Niche>,
    mode: Mode,
    filtered: Vec<Creator>,
    metrics: CreatorMetrics,
    status: DirectoryStatus,
    latest_ticket: u64,
}

impl CreatorDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A ready directory over a fixture, showing the AI set unfiltered.
    #[must_use]
    pub fn from_fixture(fixture: &Fixture) -> Self {
        let mut directory = Self::new();
        directory.load(
            fixture.creators_for(Mode::Ai),
            fixture.creators_for(Mode::All),
            fixture.niches.clone(),
        );
        directory
    }

    /// Install freshly fetched source lists. The filtered view resets to the
    /// current mode's list and any in-flight request becomes stale.
    pub fn load(&mut self, ai: Vec<Creator>, all: Vec<Creator>, niches: Vec<Niche>) {
        self.ai = ai;
        self.all = all;
        self.niches = niches;
        self.latest_ticket += 1;
        self.set_filtered(self.source().to_vec());
        self.status = DirectoryStatus::Ready;
    }

    /// Record a failed fetch. Current lists are kept so a retry can replace
    /// them.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(error = %message, mode = %self.mode, "creator fetch failed");
        self.status = DirectoryStatus::Failed(message);
    }

    /// Swap to `mode`'s source list, unfiltered. Outstanding requests for
    /// the previous mode become stale.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.latest_ticket += 1;
        self.set_filtered(self.source().to_vec());
        if self.status == DirectoryStatus::Loading {
            self.status = DirectoryStatus::Ready;
        }
    }

    /// Start a filter request and mark the directory as loading.
    pub fn begin_apply(&mut self) -> ApplyTicket {
        self.latest_ticket += 1;
        self.status = DirectoryStatus::Loading;
        ApplyTicket(self.latest_ticket)
    }

    /// Finish the request identified by `ticket`.
    ///
    /// A successful result replaces the filtered list wholesale; a failure
    /// leaves it untouched and records the message.
    pub fn complete_apply(
        &mut self,
        ticket: ApplyTicket,
        result: Result<Vec<Creator>, String>,
    ) -> ApplyOutcome {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "dropping stale filter result"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(creators) => {
                self.set_filtered(creators);
                self.status = DirectoryStatus::Ready;
            }
            Err(message) => self.fail(message),
        }
        ApplyOutcome::Applied
    }

    /// Filter the current mode's source list in process.
    pub fn apply_local(&mut self, criteria: &FilterCriteria) -> ApplyOutcome {
        let ticket = self.begin_apply();
        let filtered = apply_filters(self.source(), criteria);
        self.complete_apply(ticket, Ok(filtered))
    }

    /// Copy a creator's email with `write`. A failed write is logged and
    /// otherwise ignored; returns whether anything was copied.
    pub fn copy_email<E: Display>(
        &self,
        creator_id: &str,
        write: impl FnOnce(&str) -> Result<(), E>,
    ) -> bool {
        let Some(email) = self.find(creator_id).and_then(|c| c.email.as_deref()) else {
            return false;
        };
        match write(email) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(creator_id, error = %e, "failed to copy email");
                false
            }
        }
    }

    #[must_use]
    pub fn source(&self) -> &[Creator] {
        match self.mode {
            Mode::Ai => &self.ai,
            Mode::All => &self.all,
        }
    }

    #[must_use]
    pub fn find(&self, creator_id: &str) -> Option<&Creator> {
        self.ai
            .iter()
            .chain(self.all.iter())
            .find(|c| c.id == creator_id)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn filtered(&self) -> &[Creator] {
        &self.filtered
    }

    #[must_use]
    pub fn metrics(&self) -> &CreatorMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn niches(&self) -> &[Niche] {
        &self.niches
    }

    #[must_use]
    pub fn status(&self) -> &DirectoryStatus {
        &self.status
    }

    fn set_filtered(&mut self, creators: Vec<Creator>) {
        self.metrics = calculate_metrics(&creators);
        self.filtered = creators;
    }
}
