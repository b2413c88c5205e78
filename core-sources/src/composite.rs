//! Composite repository: one logical source fanning out to many.
//!
//! Holds the device source plus one source per configured cloud provider
//! and implements [`MediaSource`] itself, so callers cannot tell a single
//! source from the aggregate. Cloud sources without a usable session are
//! skipped, not errored - one unauthenticated provider never blocks results
//! from the rest.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use core_catalog::{
    cloud_id, MediaAlbum, MediaFilter, MediaItem, MediaResult, ProviderKind,
};

use crate::source::MediaSource;

const PROVIDER_UNAVAILABLE: &str = "Cloud provider not available or not authenticated";

/// Aggregate of the device source and zero or more cloud sources.
///
/// Source iteration order is fixed: the device source first, then cloud
/// sources in [`ProviderKind`] order. That order decides which error wins
/// when nothing was returned and makes merged output deterministic.
pub struct CompositeMediaSource {
    device: Arc<dyn MediaSource>,
    cloud: BTreeMap<ProviderKind, Arc<dyn MediaSource>>,
}

impl CompositeMediaSource {
    pub fn new(
        device: Arc<dyn MediaSource>,
        cloud: BTreeMap<ProviderKind, Arc<dyn MediaSource>>,
    ) -> Self {
        Self { device, cloud }
    }

    /// Providers currently mounted.
    pub fn providers(&self) -> Vec<ProviderKind> {
        self.cloud.keys().copied().collect()
    }

    /// Move a cloud item into the composite namespace.
    fn retag_item(provider: ProviderKind, mut item: MediaItem) -> MediaItem {
        item.id = cloud_id::encode(provider, &item.id);
        item.is_local = false;
        item.cloud_provider = Some(provider);
        item
    }

    /// Cloud sources that are ready to serve, in iteration order.
    fn ready_cloud_sources(&self) -> Vec<(ProviderKind, Arc<dyn MediaSource>)> {
        self.cloud
            .iter()
            .filter(|(provider, source)| {
                let ready = source.has_permission();
                if !ready {
                    debug!(%provider, "skipping cloud source without session");
                }
                ready
            })
            .map(|(provider, source)| (*provider, Arc::clone(source)))
            .collect()
    }
}

#[async_trait]
impl MediaSource for CompositeMediaSource {
    #[instrument(skip(self, filter))]
    async fn fetch_items(&self, filter: &MediaFilter) -> MediaResult {
        let ready = self.ready_cloud_sources();

        let cloud_fetches = ready.iter().map(|(provider, source)| {
            let provider = *provider;
            let source = Arc::clone(source);
            async move { (provider, source.fetch_items(filter).await) }
        });

        let (local_result, cloud_results) =
            tokio::join!(self.device.fetch_items(filter), join_all(cloud_fetches));

        let mut items = Vec::new();
        let mut first_error: Option<String> = None;
        let mut contributing_sources = 0usize;

        match local_result {
            MediaResult::Success(local_items) => {
                if !local_items.is_empty() {
                    contributing_sources += 1;
                }
                items.extend(local_items);
            }
            MediaResult::Error(message) => {
                warn!("device source failed: {message}");
                first_error.get_or_insert(message);
            }
            _ => {}
        }

        for (provider, result) in cloud_results {
            match result {
                MediaResult::Success(cloud_items) => {
                    if !cloud_items.is_empty() {
                        contributing_sources += 1;
                    }
                    items.extend(
                        cloud_items
                            .into_iter()
                            .map(|item| Self::retag_item(provider, item)),
                    );
                }
                MediaResult::Error(message) => {
                    warn!(%provider, "cloud source failed: {message}");
                    first_error.get_or_insert(message);
                }
                _ => {}
            }
        }

        match (items.is_empty(), first_error) {
            (true, Some(message)) => MediaResult::Error(message),
            (true, None) => MediaResult::Empty,
            (false, _) => {
                // Merging two or more sources loses any common per-source
                // order, so the aggregate imposes its own; a single
                // contributing source keeps the order the filter asked for.
                if contributing_sources >= 2 {
                    items.sort_by(|a, b| {
                        b.date_modified
                            .cmp(&a.date_modified)
                            .then_with(|| a.id.cmp(&b.id))
                    });
                }
                MediaResult::Success(items)
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_albums(&self) -> MediaResult {
        let ready = self.ready_cloud_sources();

        let cloud_fetches = ready.iter().map(|(provider, source)| {
            let provider = *provider;
            let source = Arc::clone(source);
            async move { (provider, source.fetch_albums().await) }
        });

        let (local_result, cloud_results) =
            tokio::join!(self.device.fetch_albums(), join_all(cloud_fetches));

        // Keyed by (possibly namespaced) id: a same-id collision overwrites
        // instead of duplicating.
        let mut albums: BTreeMap<String, MediaAlbum> = BTreeMap::new();
        let mut first_error: Option<String> = None;

        match local_result {
            MediaResult::AlbumsSuccess(local_albums) => {
                for album in local_albums {
                    albums.insert(album.id.clone(), album);
                }
            }
            MediaResult::Error(message) => {
                warn!("device source failed: {message}");
                first_error.get_or_insert(message);
            }
            _ => {}
        }

        for (provider, result) in cloud_results {
            match result {
                MediaResult::AlbumsSuccess(cloud_albums) => {
                    for mut album in cloud_albums {
                        album.id = cloud_id::encode(provider, &album.id);
                        album.name = format!("{} ({})", album.name, provider.display_name());
                        albums.insert(album.id.clone(), album);
                    }
                }
                MediaResult::Error(message) => {
                    warn!(%provider, "cloud source failed: {message}");
                    first_error.get_or_insert(message);
                }
                _ => {}
            }
        }

        match (albums.is_empty(), first_error) {
            (true, Some(message)) => MediaResult::Error(message),
            (true, None) => MediaResult::Empty,
            (false, _) => {
                let mut merged: Vec<MediaAlbum> = albums.into_values().collect();
                merged.sort_by(|a, b| {
                    b.item_count.cmp(&a.item_count).then_with(|| a.id.cmp(&b.id))
                });
                MediaResult::AlbumsSuccess(merged)
            }
        }
    }

    #[instrument(skip(self, filter), fields(album_id = %album_id))]
    async fn fetch_album_items(&self, album_id: &str, filter: &MediaFilter) -> MediaResult {
        match cloud_id::decode(album_id) {
            Some((provider, provider_album_id)) => {
                // Recognized provider namespace: this album belongs to that
                // provider exclusively.
                let source = match self.cloud.get(&provider) {
                    Some(source) if source.has_permission() => source,
                    _ => return MediaResult::Error(PROVIDER_UNAVAILABLE.to_string()),
                };

                match source.fetch_album_items(provider_album_id, filter).await {
                    MediaResult::Success(items) => MediaResult::Success(
                        items
                            .into_iter()
                            .map(|item| Self::retag_item(provider, item))
                            .collect(),
                    ),
                    other => other,
                }
            }
            // No recognized provider namespace: a local bucket id.
            None => self.device.fetch_album_items(album_id, filter).await,
        }
    }

    async fn fetch_item(&self, id: &str) -> Option<MediaItem> {
        if cloud_id::is_local_id(id) {
            return self.device.fetch_item(id).await;
        }

        match cloud_id::decode(id) {
            Some((provider, native_id)) => {
                // One namespace level is stripped here; the remainder is
                // passed through verbatim, so provider-native ids that are
                // themselves namespaced keep working.
                let source = self.cloud.get(&provider)?;
                if !source.has_permission() {
                    return None;
                }

                let item = source.fetch_item(native_id).await?;
                let mut item = Self::retag_item(provider, item);
                item.id = id.to_string();
                Some(item)
            }
            None => {
                if id.contains(':') {
                    // Namespaced but unrecognized: stale or foreign id.
                    None
                } else {
                    self.device.fetch_item(id).await
                }
            }
        }
    }

    fn has_permission(&self) -> bool {
        self.device.has_permission()
            && (self.cloud.is_empty()
                || self.cloud.values().any(|source| source.has_permission()))
    }

    async fn request_permission(&self) -> bool {
        let device_granted = self.device.request_permission().await;

        let cloud_grants = join_all(
            self.cloud
                .values()
                .map(|source| source.request_permission()),
        )
        .await;

        device_granted && (self.cloud.is_empty() || cloud_grants.into_iter().any(|granted| granted))
    }
}
