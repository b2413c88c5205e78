//! Media entities and sort options.
//!
//! Immutable value types with structural equality; equality over all fields
//! is what list diffing and selection membership rely on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::provider::ProviderKind;

/// Media kind tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Lowercase tag used as the local id prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Sort orders a fetch can request.
///
/// The comparator is a total order: ties on the sort key are broken by item
/// id so repeated identical queries produce identical output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub enum MediaSortOption {
    NameAsc,
    NameDesc,
    DateCreatedAsc,
    DateCreatedDesc,
    DateModifiedAsc,
    #[default]
    DateModifiedDesc,
    SizeAsc,
    SizeDesc,
}

impl MediaSortOption {
    /// Compare two items under this sort order.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_catalog::MediaSortOption;
    /// # use core_catalog::MediaItem;
    /// # fn item(id: &str, size: u64) -> MediaItem {
    /// #     let mut it = MediaItem::local_test_fixture(id);
    /// #     it.size = size;
    /// #     it
    /// # }
    ///
    /// let small = item("a", 10);
    /// let large = item("b", 20);
    /// assert!(MediaSortOption::SizeAsc.compare(&small, &large).is_lt());
    /// assert!(MediaSortOption::SizeDesc.compare(&small, &large).is_gt());
    /// ```
    pub fn compare(&self, a: &MediaItem, b: &MediaItem) -> Ordering {
        let primary = match self {
            MediaSortOption::NameAsc => a.name.cmp(&b.name),
            MediaSortOption::NameDesc => b.name.cmp(&a.name),
            MediaSortOption::DateCreatedAsc => a.date_created.cmp(&b.date_created),
            MediaSortOption::DateCreatedDesc => b.date_created.cmp(&a.date_created),
            MediaSortOption::DateModifiedAsc => a.date_modified.cmp(&b.date_modified),
            MediaSortOption::DateModifiedDesc => b.date_modified.cmp(&a.date_modified),
            MediaSortOption::SizeAsc => a.size.cmp(&b.size),
            MediaSortOption::SizeDesc => b.size.cmp(&a.size),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// A single media item, local or cloud.
///
/// Invariant: `is_local == false` exactly when `cloud_provider` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Namespaced id, unique within the composite space (see
    /// [`crate::cloud_id`]).
    pub id: String,
    /// Locator for the media bytes or a thumbnail.
    pub uri: String,
    /// Display name.
    pub name: String,
    /// Filesystem path; empty for cloud items.
    pub path: String,
    pub media_type: MediaType,
    /// Album/bucket this item belongs to (namespaced for cloud).
    pub album_id: String,
    pub album_name: String,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    /// Size in bytes, 0 if unknown.
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub is_local: bool,
    /// Video duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Video resolution string, e.g. "1920x1080".
    pub resolution: Option<String>,
    /// Origin provider for cloud items.
    pub cloud_provider: Option<ProviderKind>,
    /// Raw provider-native id for cloud items.
    pub cloud_id: Option<String>,
    /// Direct download URL, when the provider exposes one.
    pub download_url: Option<String>,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }

    /// Minimal local image fixture for tests and doc examples.
    #[doc(hidden)]
    pub fn local_test_fixture(id: &str) -> Self {
        Self {
            id: id.to_string(),
            uri: format!("content://media/{id}"),
            name: format!("{id}.jpg"),
            path: format!("/sdcard/DCIM/{id}.jpg"),
            media_type: MediaType::Image,
            album_id: "bucket".to_string(),
            album_name: "Bucket".to_string(),
            date_created: DateTime::<Utc>::UNIX_EPOCH,
            date_modified: DateTime::<Utc>::UNIX_EPOCH,
            size: 0,
            width: 0,
            height: 0,
            mime_type: "image/jpeg".to_string(),
            is_local: true,
            duration_ms: None,
            resolution: None,
            cloud_provider: None,
            cloud_id: None,
            download_url: None,
        }
    }
}

/// An album: a folder-like grouping of media items.
///
/// Albums from different sources are never merged implicitly; the
/// aggregator keys them by id at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAlbum {
    /// Namespaced id for cloud albums, raw bucket id for local ones.
    pub id: String,
    pub name: String,
    /// Representative cover image locator.
    pub cover_uri: String,
    pub item_count: usize,
    pub date_created: DateTime<Utc>,
    /// Filesystem path of the bucket, when known.
    pub path: Option<String>,
}
