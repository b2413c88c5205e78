//! Local device media source.
//!
//! Wraps the host's media index and storage-permission bridges. Date and
//! bucket constraints are pushed into the index query; media-kind
//! selection, size bounds, and name search run client-side, followed by the
//! deterministic re-sort. Albums are derived by grouping raw records by
//! bucket.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use bridge_traits::media_store::{MediaStoreAccess, StoreKind, StoreQuery, StoreRecord};
use bridge_traits::permissions::StoragePermissions;
use core_catalog::{
    cloud_id, MediaAlbum, MediaFilter, MediaItem, MediaResult, MediaType,
};

use crate::source::MediaSource;

const PERMISSION_ERROR: &str = "Storage permission not granted";

/// Media source backed by the on-device media index.
pub struct DeviceMediaSource {
    store: Arc<dyn MediaStoreAccess>,
    permissions: Arc<dyn StoragePermissions>,
}

impl DeviceMediaSource {
    pub fn new(
        store: Arc<dyn MediaStoreAccess>,
        permissions: Arc<dyn StoragePermissions>,
    ) -> Self {
        Self { store, permissions }
    }

    fn store_kind(media_type: MediaType) -> StoreKind {
        match media_type {
            MediaType::Image => StoreKind::Image,
            MediaType::Video => StoreKind::Video,
        }
    }

    fn timestamp(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Pushdown constraints for the index query; the date window is pushed
    /// only when both bounds are present, matching what every index can
    /// evaluate. The full filter predicate runs afterwards regardless.
    fn store_query(filter: &MediaFilter, bucket_ids: Option<Vec<String>>) -> StoreQuery {
        let modified_between = filter.date_range.as_ref().and_then(|range| {
            match (range.start, range.end) {
                (Some(start), Some(end)) => Some((start.timestamp(), end.timestamp())),
                _ => None,
            }
        });

        StoreQuery {
            modified_between,
            bucket_ids,
        }
    }

    fn record_to_item(media_type: MediaType, record: StoreRecord) -> MediaItem {
        MediaItem {
            id: cloud_id::encode_local(media_type, &record.locator),
            uri: record.uri,
            name: record.name,
            path: record.path,
            media_type,
            album_id: record.bucket_id,
            album_name: record.bucket_name,
            date_created: Self::timestamp(record.date_created),
            date_modified: Self::timestamp(record.date_modified),
            size: record.size,
            width: record.width,
            height: record.height,
            mime_type: record.mime_type,
            is_local: true,
            duration_ms: record.duration_ms,
            resolution: record.resolution,
            cloud_provider: None,
            cloud_id: None,
            download_url: None,
        }
    }

    /// Query one kind, convert, and apply the client-side filter.
    async fn query_kind(
        &self,
        media_type: MediaType,
        filter: &MediaFilter,
        query: &StoreQuery,
    ) -> Result<Vec<MediaItem>, String> {
        let records = self
            .store
            .query_media(Self::store_kind(media_type), query)
            .await
            .map_err(|e| e.to_string())?;

        Ok(records
            .into_iter()
            .map(|record| Self::record_to_item(media_type, record))
            .filter(|item| filter.matches(item))
            .collect())
    }

    async fn query_items(
        &self,
        filter: &MediaFilter,
        bucket_ids: Option<Vec<String>>,
    ) -> MediaResult {
        let query = Self::store_query(filter, bucket_ids);
        let mut items = Vec::new();

        for media_type in [MediaType::Image, MediaType::Video] {
            if !filter.media_types.contains(&media_type) {
                continue;
            }
            match self.query_kind(media_type, filter, &query).await {
                Ok(mut kind_items) => items.append(&mut kind_items),
                Err(message) => {
                    warn!(%media_type, "device index query failed: {message}");
                    return MediaResult::Error(message);
                }
            }
        }

        items.sort_by(|a, b| filter.sort_by.compare(a, b));

        if items.is_empty() {
            MediaResult::Empty
        } else {
            MediaResult::Success(items)
        }
    }
}

#[async_trait]
impl MediaSource for DeviceMediaSource {
    #[instrument(skip(self, filter))]
    async fn fetch_items(&self, filter: &MediaFilter) -> MediaResult {
        if !self.has_permission() {
            return MediaResult::Error(PERMISSION_ERROR.to_string());
        }
        self.query_items(filter, filter.album_ids.clone()).await
    }

    #[instrument(skip(self))]
    async fn fetch_albums(&self) -> MediaResult {
        if !self.has_permission() {
            return MediaResult::Error(PERMISSION_ERROR.to_string());
        }

        let query = StoreQuery::unconstrained();
        let mut buckets: BTreeMap<String, Vec<StoreRecord>> = BTreeMap::new();

        for store_kind in [StoreKind::Image, StoreKind::Video] {
            let records = match self.store.query_media(store_kind, &query).await {
                Ok(records) => records,
                Err(e) => {
                    warn!("device index album scan failed: {e}");
                    return MediaResult::Error(e.to_string());
                }
            };
            for record in records {
                buckets
                    .entry(record.bucket_id.clone())
                    .or_default()
                    .push(record);
            }
        }

        let mut albums: Vec<MediaAlbum> = buckets
            .into_iter()
            .filter_map(|(bucket_id, entries)| {
                let cover = entries.first()?;
                Some(MediaAlbum {
                    id: bucket_id,
                    name: cover.bucket_name.clone(),
                    cover_uri: cover.uri.clone(),
                    item_count: entries.len(),
                    date_created: Self::timestamp(cover.date_created),
                    path: cover
                        .path
                        .rsplit_once('/')
                        .map(|(dir, _)| dir.to_string()),
                })
            })
            .collect();

        albums.sort_by(|a, b| b.item_count.cmp(&a.item_count).then_with(|| a.id.cmp(&b.id)));
        debug!(count = albums.len(), "derived device albums");

        if albums.is_empty() {
            MediaResult::Empty
        } else {
            MediaResult::AlbumsSuccess(albums)
        }
    }

    #[instrument(skip(self, filter), fields(album_id = %album_id))]
    async fn fetch_album_items(&self, album_id: &str, filter: &MediaFilter) -> MediaResult {
        if !self.has_permission() {
            return MediaResult::Error(PERMISSION_ERROR.to_string());
        }
        self.query_items(filter, Some(vec![album_id.to_string()]))
            .await
    }

    async fn fetch_item(&self, id: &str) -> Option<MediaItem> {
        if !self.has_permission() {
            return None;
        }

        let (media_type, locator) = cloud_id::decode_local(id)?;
        match self
            .store
            .query_item(Self::store_kind(media_type), locator)
            .await
        {
            Ok(record) => record.map(|r| Self::record_to_item(media_type, r)),
            Err(e) => {
                warn!(%id, "device index lookup failed: {e}");
                None
            }
        }
    }

    fn has_permission(&self) -> bool {
        self.permissions.has_storage_permission()
    }

    async fn request_permission(&self) -> bool {
        self.permissions.request_storage_permission().await
    }
}
