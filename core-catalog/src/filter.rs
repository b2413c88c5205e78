//! Query descriptor for media fetches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{MediaItem, MediaSortOption, MediaType};
use crate::provider::ProviderKind;

/// Inclusive date window; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant > end {
                return false;
            }
        }
        true
    }
}

/// Pure-value query descriptor.
///
/// Filters are never mutated in place; every change builds a new instance
/// (clone + update), so an in-flight fetch keyed to an old filter can be
/// recognized and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFilter {
    /// Media kinds to include. Non-empty; defaults to both.
    pub media_types: BTreeSet<MediaType>,
    /// Inclusive modification-date window.
    pub date_range: Option<DateRange>,
    /// Restrict to these albums. Album drill-down does not use this field -
    /// navigation scoping is expressed through `fetch_album_items`.
    pub album_ids: Option<Vec<String>>,
    /// Case-insensitive substring match on the item name.
    pub search_query: Option<String>,
    /// Minimum size in bytes.
    pub min_size: Option<u64>,
    /// Maximum size in bytes.
    pub max_size: Option<u64>,
    /// Whether cloud items should be included at all.
    pub include_cloud_items: bool,
    /// Restrict cloud results to these providers.
    pub cloud_providers: Option<BTreeSet<ProviderKind>>,
    pub sort_by: MediaSortOption,
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self {
            media_types: [MediaType::Image, MediaType::Video].into_iter().collect(),
            date_range: None,
            album_ids: None,
            search_query: None,
            min_size: None,
            max_size: None,
            include_cloud_items: false,
            cloud_providers: None,
            sort_by: MediaSortOption::default(),
        }
    }
}

impl MediaFilter {
    /// Client-side predicate applying the type, date, size, and search
    /// constraints.
    ///
    /// Sources whose backing store can push a constraint down still run the
    /// full predicate afterwards; it is cheap and keeps the post-filter
    /// guarantees independent of store behavior.
    pub fn matches(&self, item: &MediaItem) -> bool {
        if !self.media_types.contains(&item.media_type) {
            return false;
        }

        if let Some(range) = &self.date_range {
            if !range.contains(item.date_modified) {
                return false;
            }
        }

        if let Some(min) = self.min_size {
            if item.size < min {
                return false;
            }
        }

        if let Some(max) = self.max_size {
            if item.size > max {
                return false;
            }
        }

        if let Some(query) = &self.search_query {
            if !query.is_empty()
                && !item.name.to_lowercase().contains(&query.to_lowercase())
            {
                return false;
            }
        }

        true
    }

    /// Copy of this filter with the album restriction removed.
    ///
    /// Used when drilling into an album: scoping is expressed by the
    /// navigation target, and a lingering `album_ids` restriction would
    /// double-restrict the query.
    pub fn without_album_scope(&self) -> Self {
        let mut filter = self.clone();
        filter.album_ids = None;
        filter
    }

    /// Copy of this filter with a different sort order.
    pub fn with_sort(&self, sort_by: MediaSortOption) -> Self {
        let mut filter = self.clone();
        filter.sort_by = sort_by;
        filter
    }
}
