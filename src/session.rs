//! Per-user browsing state owned by the transport layer.
//!
//! Holds what a client remembers between requests (favourite deals and the
//! last search it ran). Nothing here is shared or global; the host creates
//! one per user session and passes it where needed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::filter::FilterSpec;
use crate::models::Deal;
use crate::pagination::PageRequest;
use crate::sort::SortKey;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsingSession {
    favourites: BTreeSet<String>,
    pub filter: FilterSpec,
    pub sort: SortKey,
    pub page: PageRequest,
}

impl BrowsingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the favourite flag of a deal. Returns `true` if the deal is a
    /// favourite afterwards.
    pub fn toggle_favourite(&mut self, deal_id: &str) -> bool {
        if self.favourites.remove(deal_id) {
            false
        } else {
            self.favourites.insert(deal_id.to_string());
            true
        }
    }

    pub fn is_favourite(&self, deal_id: &str) -> bool {
        self.favourites.contains(deal_id)
    }

    /// Favourite deal ids in sorted order.
    pub fn favourites(&self) -> impl Iterator<Item = &str> {
        self.favourites.iter().map(String::as_str)
    }

    /// The favourite deals among `deals`, in their given order.
    pub fn filter_favourites<'d>(&self, deals: &'d [Deal]) -> Vec<&'d Deal> {
        deals.iter().filter(|d| self.is_favourite(&d.id)).collect()
    }

    /// Record the parameters of the search just served.
    ///
    /// A changed filter or sort sends the session back to page 1 of the
    /// given size.
    pub fn remember(&mut self, filter: FilterSpec, sort: SortKey, page: PageRequest) {
        let reset = filter != self.filter || sort != self.sort;
        self.filter = filter;
        self.sort = sort;
        self.page = if reset {
            PageRequest::first(page.page_size() as i64).unwrap_or(page)
        } else {
            page
        };
    }
}
