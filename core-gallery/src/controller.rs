//! Selection & view state controller.
//!
//! Single owner of the gallery's mutable state. Commands bump a load
//! generation, publish `Loading`, and await one terminal source result;
//! outcomes are applied only if the generation (and, for album fetches, the
//! requested album) is still current. That guard - not cancellation - is
//! what makes navigation last-wins: a stale fetch resolving late can never
//! overwrite the state of a newer one.
//!
//! State is published as whole values through a `watch` channel; the
//! rendering layer subscribes and redraws, and never mutates state
//! directly.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument};

use core_catalog::{MediaFilter, MediaItem, MediaResult};
use core_sources::MediaSource;

use crate::config::{GalleryCallbacks, GalleryConfig, SelectionMode, ViewMode};
use crate::state::{GalleryState, GalleryView};

/// Mutable interior, owned exclusively by the controller.
struct ControllerInner {
    view_mode: ViewMode,
    column_count: u16,
    selected: Vec<MediaItem>,
    current_album_id: Option<String>,
    /// Bumped by every state-invalidating command; fetch outcomes carrying
    /// an older generation are discarded at application time.
    generation: u64,
}

/// The gallery state machine.
///
/// Construct via [`crate::GalleryBuilder`], call [`start`](Self::start)
/// once, then drive with commands. All commands take `&self`; the
/// controller may be shared behind an `Arc`.
pub struct GalleryController {
    source: Arc<dyn MediaSource>,
    config: GalleryConfig,
    callbacks: GalleryCallbacks,
    state_tx: watch::Sender<GalleryState>,
    filter_tx: watch::Sender<MediaFilter>,
    inner: Mutex<ControllerInner>,
}

impl std::fmt::Debug for GalleryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GalleryController {
    pub fn new(
        source: Arc<dyn MediaSource>,
        config: GalleryConfig,
        callbacks: GalleryCallbacks,
    ) -> Self {
        let (state_tx, _) = watch::channel(GalleryState::Loading);
        let (filter_tx, _) = watch::channel(MediaFilter::default());

        let inner = ControllerInner {
            view_mode: config.default_view_mode,
            column_count: config.default_grid_columns,
            selected: Vec::new(),
            current_album_id: config.default_open_album.clone(),
            generation: 0,
        };

        Self {
            source,
            config,
            callbacks,
            state_tx,
            filter_tx,
            inner: Mutex::new(inner),
        }
    }

    /// Subscribe to state transitions.
    pub fn state_watch(&self) -> watch::Receiver<GalleryState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> GalleryState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to filter changes.
    pub fn filter_watch(&self) -> watch::Receiver<MediaFilter> {
        self.filter_tx.subscribe()
    }

    /// Snapshot of the current filter.
    pub fn current_filter(&self) -> MediaFilter {
        self.filter_tx.borrow().clone()
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Permission gate and initial load.
    ///
    /// When permission is missing, publishes `NoPermission` and makes one
    /// `request_permission` attempt; denial leaves the state at
    /// `NoPermission` until the host re-triggers after an external grant.
    #[instrument(skip(self))]
    pub async fn start(&self) {
        if !self.source.has_permission() {
            self.state_tx.send_replace(GalleryState::NoPermission);

            let granted = self.source.request_permission().await;
            if !granted {
                info!("permission denied, staying in NoPermission");
                return;
            }
        }
        self.refresh().await;
    }

    /// Re-run the initial load path.
    pub async fn refresh(&self) {
        let generation = self.begin_load().await;
        if self.config.group_by_album {
            self.load_albums(generation).await;
        } else {
            self.load_flat(generation).await;
        }
    }

    /// Report that the host's permission prompt was denied externally.
    pub async fn mark_permission_denied(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        self.state_tx.send_replace(GalleryState::NoPermission);
    }

    /// Navigate into an album (`Some`) or back to the top level (`None`).
    ///
    /// Clears the selection and strips any album restriction from the
    /// filter: album scoping is expressed by navigation, not the filter
    /// field.
    #[instrument(skip(self), fields(album_id = ?album_id))]
    pub async fn open_album(&self, album_id: Option<String>) {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.selected.clear();
            inner.current_album_id = album_id.clone();
            inner.generation
        };
        self.state_tx.send_replace(GalleryState::Loading);

        let stripped = self.filter_tx.borrow().without_album_scope();
        self.filter_tx.send_replace(stripped);

        match album_id {
            Some(id) => self.load_album_items(generation, &id).await,
            None => {
                if self.config.group_by_album {
                    self.load_albums(generation).await;
                } else {
                    self.load_flat(generation).await;
                }
            }
        }
    }

    /// Replace the filter and reload whatever is currently showing.
    ///
    /// While drilled into an album the filter's `album_ids` field is
    /// stripped again - navigation scoping always wins.
    #[instrument(skip(self, filter))]
    pub async fn update_filter(&self, filter: MediaFilter) {
        let (generation, current_album) = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            (inner.generation, inner.current_album_id.clone())
        };
        self.state_tx.send_replace(GalleryState::Loading);

        let effective = if current_album.is_some() {
            filter.without_album_scope()
        } else {
            filter
        };
        self.filter_tx.send_replace(effective);

        match current_album {
            Some(id) => self.load_album_items(generation, &id).await,
            None if self.config.group_by_album => self.load_albums(generation).await,
            None => self.load_flat(generation).await,
        }
    }

    /// Toggle an item in or out of the selection.
    ///
    /// Single mode: re-tapping the selected item deselects it, any other
    /// item replaces the whole set. Multiple mode: membership toggles, and
    /// adding past capacity is a silent no-op. Every successful toggle
    /// invokes the selection callback with the new full list.
    pub async fn toggle_selection(&self, item: MediaItem) {
        let mut inner = self.inner.lock().await;

        let changed = match self.config.selection_mode {
            SelectionMode::Single => {
                if inner.selected.contains(&item) {
                    inner.selected.clear();
                } else {
                    inner.selected.clear();
                    inner.selected.push(item);
                }
                true
            }
            SelectionMode::Multiple => {
                if let Some(position) = inner.selected.iter().position(|i| *i == item) {
                    inner.selected.remove(position);
                    true
                } else if inner.selected.len() < self.config.max_selection_count {
                    inner.selected.push(item);
                    true
                } else {
                    debug!("selection at capacity, toggle ignored");
                    false
                }
            }
        };

        if !changed {
            return;
        }

        let selected = inner.selected.clone();
        self.patch_view(&inner);
        drop(inner);

        self.callbacks.emit_selected(&selected);
    }

    /// Flip grid/list presentation; a no-op when the config disallows it.
    pub async fn toggle_view_mode(&self) {
        if !self.config.allow_view_mode_toggle {
            return;
        }

        let mut inner = self.inner.lock().await;
        inner.view_mode = match inner.view_mode {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        };
        self.patch_view(&inner);
    }

    /// Set the grid column count; values outside 1..=5 are ignored.
    pub async fn set_column_count(&self, count: u16) {
        if !(1..=5).contains(&count) {
            return;
        }

        let mut inner = self.inner.lock().await;
        inner.column_count = count;
        self.patch_view(&inner);
    }

    /// Hand the current selection to the host, even when it is empty -
    /// confirming zero items is a valid, distinguishable outcome.
    pub async fn confirm_selection(&self) {
        let selected = self.inner.lock().await.selected.clone();
        self.callbacks.emit_selected(&selected);
    }

    /// Forward an item activation to the host.
    pub fn media_clicked(&self, item: &MediaItem) {
        self.callbacks.emit_clicked(item);
    }

    /// Pop back to the album list when drilled in; otherwise hand back
    /// navigation to the host.
    pub async fn back_pressed(&self) {
        let drilled = self.inner.lock().await.current_album_id.is_some();

        if drilled && self.config.group_by_album {
            self.open_album(None).await;
        } else {
            self.callbacks.emit_back();
        }
    }

    /// Bump the generation and publish `Loading`.
    async fn begin_load(&self) -> u64 {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        let generation = inner.generation;
        drop(inner);

        self.state_tx.send_replace(GalleryState::Loading);
        generation
    }

    /// Patch presentation fields into the current `Success` state, if any.
    fn patch_view(&self, inner: &ControllerInner) {
        let current = self.state_tx.borrow().clone();
        if let GalleryState::Success(mut view) = current {
            view.selected_items = inner.selected.clone();
            view.view_mode = inner.view_mode;
            view.column_count = inner.column_count;
            self.state_tx.send_replace(GalleryState::Success(view));
        }
    }

    fn view_from(&self, inner: &ControllerInner, albums: Vec<core_catalog::MediaAlbum>, media_items: Vec<MediaItem>) -> GalleryView {
        GalleryView {
            albums,
            media_items,
            selected_items: inner.selected.clone(),
            view_mode: inner.view_mode,
            column_count: inner.column_count,
            current_album_id: inner.current_album_id.clone(),
        }
    }

    async fn load_albums(&self, generation: u64) {
        let result = self.source.fetch_albums().await;

        let inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!("discarding stale album list result");
            return;
        }

        match result {
            MediaResult::AlbumsSuccess(albums) => {
                if albums.is_empty() {
                    self.state_tx.send_replace(GalleryState::Empty);
                } else if let Some(album_id) = inner.current_album_id.clone() {
                    // Configured or restored drill target: go straight in.
                    drop(inner);
                    self.load_album_items(generation, &album_id).await;
                } else {
                    let view = self.view_from(&inner, albums, Vec::new());
                    self.state_tx.send_replace(GalleryState::Success(view));
                }
            }
            MediaResult::Error(message) => {
                self.state_tx.send_replace(GalleryState::Error { message });
            }
            MediaResult::Loading => {
                self.state_tx.send_replace(GalleryState::Loading);
            }
            _ => {
                self.state_tx.send_replace(GalleryState::Empty);
            }
        }
    }

    async fn load_album_items(&self, generation: u64, album_id: &str) {
        let filter = self.current_filter();
        let result = self.source.fetch_album_items(album_id, &filter).await;

        let inner = self.inner.lock().await;
        if inner.generation != generation
            || inner.current_album_id.as_deref() != Some(album_id)
        {
            debug!(%album_id, "discarding stale album items result");
            return;
        }

        match result {
            MediaResult::Success(items) if !items.is_empty() => {
                let current = self.state_tx.borrow().clone();
                match current {
                    GalleryState::Success(mut view) => {
                        // Album list already on screen: patch in place.
                        view.media_items = items;
                        view.current_album_id = Some(album_id.to_string());
                        view.selected_items = inner.selected.clone();
                        self.state_tx.send_replace(GalleryState::Success(view));
                    }
                    _ => {
                        // Drilling in from cold start: fetch the album list
                        // to give the view its context.
                        drop(inner);
                        let albums_result = self.source.fetch_albums().await;

                        let inner = self.inner.lock().await;
                        if inner.generation != generation
                            || inner.current_album_id.as_deref() != Some(album_id)
                        {
                            debug!(%album_id, "discarding stale album context result");
                            return;
                        }

                        let albums = match albums_result {
                            MediaResult::AlbumsSuccess(albums) => albums,
                            _ => Vec::new(),
                        };
                        let view = self.view_from(&inner, albums, items);
                        self.state_tx.send_replace(GalleryState::Success(view));
                    }
                }
            }
            MediaResult::Error(message) => {
                self.state_tx.send_replace(GalleryState::Error { message });
            }
            MediaResult::Loading => {
                self.state_tx.send_replace(GalleryState::Loading);
            }
            _ => {
                self.state_tx.send_replace(GalleryState::Empty);
            }
        }
    }

    async fn load_flat(&self, generation: u64) {
        let filter = self.current_filter();
        let result = self.source.fetch_items(&filter).await;

        let inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!("discarding stale item listing result");
            return;
        }

        match result {
            MediaResult::Success(items) if !items.is_empty() => {
                let view = self.view_from(&inner, Vec::new(), items);
                self.state_tx.send_replace(GalleryState::Success(view));
            }
            MediaResult::Error(message) => {
                self.state_tx.send_replace(GalleryState::Error { message });
            }
            _ => {
                self.state_tx.send_replace(GalleryState::Empty);
            }
        }
    }
}
