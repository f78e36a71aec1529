//! List controller: sort, view mode, card selection and the detail overlay
//! for the creators currently displayed.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::creators::Creator;
use crate::sort::{sort_creators, SortField, SortState};
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    List,
}

impl FromStr for ViewMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" | "card" => Ok(ViewMode::Cards),
            "list" => Ok(ViewMode::List),
            _ => Err(CoreError::UnknownViewMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListView {
    sort: SortState,
    view_mode: ViewMode,
    selected: BTreeSet<String>,
    select_all: bool,
    detail: Option<String>,
}

impl ListView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Column-header click.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = self.sort.toggle(field);
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// `creators` in display order.
    #[must_use]
    pub fn displayed(&self, creators: &[Creator]) -> Vec<Creator> {
        sort_creators(creators, self.sort)
    }

    /// Toggle one card. `select_all` stays true only while every displayed
    /// creator is selected.
    pub fn toggle_card(&mut self, creator_id: &str, displayed: &[Creator]) {
        if !self.selected.remove(creator_id) {
            self.selected.insert(creator_id.to_string());
        }
        self.select_all =
            !displayed.is_empty() && displayed.iter().all(|c| self.selected.contains(&c.id));
    }

    /// Select every displayed creator, or clear the selection if all were
    /// already selected.
    pub fn toggle_select_all(&mut self, displayed: &[Creator]) {
        if self.select_all {
            self.selected.clear();
            self.select_all = false;
        } else {
            self.selected = displayed.iter().map(|c| c.id.clone()).collect();
            self.select_all = !displayed.is_empty();
        }
    }

    #[must_use]
    pub fn is_selected(&self, creator_id: &str) -> bool {
        self.selected.contains(creator_id)
    }

    #[must_use]
    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn open_detail(&mut self, creator_id: &str) {
        self.detail = Some(creator_id.to_string());
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// The creator shown in the detail overlay, if it is still displayed.
    #[must_use]
    pub fn detail<'a>(&self, displayed: &'a [Creator]) -> Option<&'a Creator> {
        let id = self.detail.as_deref()?;
        displayed.iter().find(|c| c.id == id)
    }
}
