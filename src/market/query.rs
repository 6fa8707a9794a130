//! Search, category filter and sort over a list of markets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::types::{Market, MarketStatus};

/// Sort order for market listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    /// Highest volume first.
    #[default]
    Volume,
    /// Most recently created first.
    Newest,
    /// Soonest resolution first.
    Ending,
    /// Largest total stake first.
    Stakes,
}

/// Listing filter.
#[derive(Debug, Clone, Default)]
pub struct MarketQuery {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Exact category; `None` or `"all"` matches everything.
    pub category: Option<String>,
    /// Sort order.
    pub sort: SortKey,
}

impl MarketQuery {
    /// Create a query with default sort and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Set the category filter.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the sort order.
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Whether any filter narrows the result.
    pub fn is_filtered(&self) -> bool {
        self.search_term().is_some() || self.category_filter().is_some()
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    /// Apply the query. The input is left untouched.
    pub fn apply<'a>(&self, markets: &'a [Market]) -> Vec<&'a Market> {
        let term = self.search_term();
        let category = self.category_filter();

        let mut result: Vec<&Market> = markets
            .iter()
            .filter(|m| match &term {
                Some(term) => {
                    m.title.to_lowercase().contains(term)
                        || m.description.to_lowercase().contains(term)
                }
                None => true,
            })
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect();

        // sort_by is stable, so ties keep catalog order.
        match self.sort {
            SortKey::Volume => result.sort_by(|a, b| b.volume.cmp(&a.volume)),
            SortKey::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Ending => result.sort_by(|a, b| a.resolution_date.cmp(&b.resolution_date)),
            SortKey::Stakes => result.sort_by(|a, b| b.total_staked.cmp(&a.total_staked)),
        }

        result
    }
}

/// Market counts per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Active markets.
    pub active: usize,
    /// Resolved markets.
    pub resolved: usize,
    /// Cancelled markets.
    pub cancelled: usize,
}

/// Count markets by status.
pub fn status_counts<'a>(markets: impl IntoIterator<Item = &'a Market>) -> StatusCounts {
    markets
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, m| {
            match m.status {
                MarketStatus::Active => counts.active += 1,
                MarketStatus::Resolved => counts.resolved += 1,
                MarketStatus::Cancelled => counts.cancelled += 1,
            }
            counts
        })
}
