//! Device Media Index Access
//!
//! Queries against the host's on-device media index (MediaStore,
//! Photos.framework, a filesystem walker - whatever the platform has). The
//! contract covers only the query's filter shape and the raw record shape;
//! how the host actually indexes media is its own business.
//!
//! Records cross this boundary raw: locators are opaque strings, timestamps
//! are unix seconds, and no domain-level filtering beyond the pushdown
//! constraints in [`StoreQuery`] is expected. The device source in
//! `core-sources` converts records into catalog items and applies the rest
//! of the filter client-side.

use async_trait::async_trait;

use crate::error::Result;

/// Which index a query targets.
///
/// Device indexes keep images and videos in separate tables/collections, so
/// queries are issued per kind and merged by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Image,
    Video,
}

/// Pushdown constraints for a media index query.
///
/// Only constraints every reasonable index can evaluate are pushed down;
/// everything else (size bounds, name search, sorting) is applied by the
/// caller after the raw fetch.
#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    /// Restrict to records whose modification time falls inside this
    /// inclusive unix-seconds window. Pushed down only when both bounds are
    /// known; half-open ranges are filtered by the caller.
    pub modified_between: Option<(i64, i64)>,

    /// Restrict to records belonging to these buckets (folders/albums).
    pub bucket_ids: Option<Vec<String>>,
}

impl StoreQuery {
    /// A query with no constraints (full index scan).
    pub fn unconstrained() -> Self {
        Self::default()
    }
}

/// Raw media index record.
///
/// One row of the device index, before conversion into a catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRecord {
    /// Opaque per-record locator, stable across queries. Combined with the
    /// kind tag it forms the local item id.
    pub locator: String,
    /// Displayable/loadable URI for the media bytes or thumbnail.
    pub uri: String,
    /// Display name (file name).
    pub name: String,
    /// Filesystem path, if the index exposes one.
    pub path: String,
    /// Bucket (folder/album) this record belongs to.
    pub bucket_id: String,
    /// Display name of the bucket.
    pub bucket_name: String,
    /// Creation time, unix seconds.
    pub date_created: i64,
    /// Last modification time, unix seconds.
    pub date_modified: i64,
    /// Size in bytes, 0 if the index does not track it.
    pub size: u64,
    pub width: u32,
    pub height: u32,
    /// MIME type as reported by the index.
    pub mime_type: String,
    /// Video duration in milliseconds; `None` for images.
    pub duration_ms: Option<u64>,
    /// Video resolution string (e.g. "1920x1080"); `None` for images.
    pub resolution: Option<String>,
}

/// Device media index query capability.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::media_store::{MediaStoreAccess, StoreKind, StoreQuery};
///
/// async fn count_images(store: &dyn MediaStoreAccess) -> Result<usize> {
///     let records = store
///         .query_media(StoreKind::Image, &StoreQuery::unconstrained())
///         .await?;
///     Ok(records.len())
/// }
/// ```
#[async_trait]
pub trait MediaStoreAccess: Send + Sync {
    /// Query the index for one media kind.
    ///
    /// Implementations apply the pushdown constraints from `query` and
    /// return matching records in any order; callers re-sort.
    async fn query_media(&self, kind: StoreKind, query: &StoreQuery) -> Result<Vec<StoreRecord>>;

    /// Point lookup by locator.
    ///
    /// Returns `Ok(None)` when the locator is well-formed but no longer
    /// present in the index; absence is not an error.
    async fn query_item(&self, kind: StoreKind, locator: &str) -> Result<Option<StoreRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconstrained_query() {
        let query = StoreQuery::unconstrained();
        assert!(query.modified_between.is_none());
        assert!(query.bucket_ids.is_none());
    }

    #[test]
    fn test_store_record_equality() {
        let record = StoreRecord {
            locator: "content://media/external/images/42".to_string(),
            uri: "content://media/external/images/42".to_string(),
            name: "IMG_0042.jpg".to_string(),
            path: "/sdcard/DCIM/Camera/IMG_0042.jpg".to_string(),
            bucket_id: "camera".to_string(),
            bucket_name: "Camera".to_string(),
            date_created: 1_700_000_000,
            date_modified: 1_700_000_100,
            size: 2048,
            width: 4000,
            height: 3000,
            mime_type: "image/jpeg".to_string(),
            duration_ms: None,
            resolution: None,
        };

        assert_eq!(record.clone(), record);
    }
}
