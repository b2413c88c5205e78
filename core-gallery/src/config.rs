//! Gallery configuration and host callbacks.
//!
//! [`GalleryConfig`] carries the data-only settings and stays
//! serializable; the three host callbacks live in the separate
//! [`GalleryCallbacks`] companion so transient closures never entangle
//! with copyable configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use core_catalog::{MediaItem, ProviderKind};

/// How many items the user may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionMode {
    /// At most one item; selecting another replaces it.
    Single,
    /// Up to `max_selection_count` items.
    #[default]
    Multiple,
}

/// How the item collection is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Immutable gallery configuration, fixed at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryConfig {
    pub selection_mode: SelectionMode,
    /// Selection capacity in `Multiple` mode.
    pub max_selection_count: usize,
    pub default_view_mode: ViewMode,
    /// Grid column count, 1-5.
    pub default_grid_columns: u16,
    /// Whether the view-mode toggle command has any effect.
    pub allow_view_mode_toggle: bool,
    /// Show an album list first instead of a flat item listing.
    pub group_by_album: bool,
    /// Album to drill into immediately on start.
    pub default_open_album: Option<String>,
    /// Master switch for cloud sources.
    pub enable_cloud_integration: bool,
    /// Cloud providers to mount when cloud integration is enabled.
    pub cloud_providers: Vec<ProviderKind>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            max_selection_count: usize::MAX,
            default_view_mode: ViewMode::default(),
            default_grid_columns: 3,
            allow_view_mode_toggle: true,
            group_by_album: true,
            default_open_album: None,
            enable_cloud_integration: false,
            cloud_providers: Vec::new(),
        }
    }
}

impl GalleryConfig {
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }
}

/// Consuming builder for [`GalleryConfig`].
#[derive(Debug, Default)]
pub struct GalleryConfigBuilder {
    config: GalleryConfig,
}

impl GalleryConfigBuilder {
    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.config.selection_mode = mode;
        self
    }

    pub fn max_selection_count(mut self, count: usize) -> Self {
        self.config.max_selection_count = count;
        self
    }

    pub fn default_view_mode(mut self, mode: ViewMode) -> Self {
        self.config.default_view_mode = mode;
        self
    }

    pub fn default_grid_columns(mut self, columns: u16) -> Self {
        self.config.default_grid_columns = columns;
        self
    }

    pub fn allow_view_mode_toggle(mut self, allow: bool) -> Self {
        self.config.allow_view_mode_toggle = allow;
        self
    }

    pub fn group_by_album(mut self, group: bool) -> Self {
        self.config.group_by_album = group;
        self
    }

    pub fn default_open_album(mut self, album_id: impl Into<String>) -> Self {
        self.config.default_open_album = Some(album_id.into());
        self
    }

    pub fn enable_cloud_integration(mut self, enable: bool) -> Self {
        self.config.enable_cloud_integration = enable;
        self
    }

    pub fn cloud_providers(mut self, providers: Vec<ProviderKind>) -> Self {
        self.config.cloud_providers = providers;
        self
    }

    pub fn build(self) -> GalleryConfig {
        self.config
    }
}

type SelectionCallback = Arc<dyn Fn(&[MediaItem]) + Send + Sync>;
type ItemCallback = Arc<dyn Fn(&MediaItem) + Send + Sync>;
type BackCallback = Arc<dyn Fn() + Send + Sync>;

/// Host callbacks, invoked synchronously from controller commands.
///
/// Kept apart from [`GalleryConfig`] so the config stays a plain
/// serializable value.
#[derive(Clone, Default)]
pub struct GalleryCallbacks {
    on_media_selected: Option<SelectionCallback>,
    on_media_clicked: Option<ItemCallback>,
    on_back_pressed: Option<BackCallback>,
}

impl GalleryCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the full selection list after every successful toggle
    /// and on selection confirmation (possibly with an empty list).
    pub fn on_media_selected(
        mut self,
        callback: impl Fn(&[MediaItem]) + Send + Sync + 'static,
    ) -> Self {
        self.on_media_selected = Some(Arc::new(callback));
        self
    }

    /// Called when an item is activated outside of selection.
    pub fn on_media_clicked(
        mut self,
        callback: impl Fn(&MediaItem) + Send + Sync + 'static,
    ) -> Self {
        self.on_media_clicked = Some(Arc::new(callback));
        self
    }

    /// Called when back is pressed with no album level left to pop.
    pub fn on_back_pressed(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_back_pressed = Some(Arc::new(callback));
        self
    }

    pub(crate) fn emit_selected(&self, items: &[MediaItem]) {
        if let Some(callback) = &self.on_media_selected {
            callback(items);
        }
    }

    pub(crate) fn emit_clicked(&self, item: &MediaItem) {
        if let Some(callback) = &self.on_media_clicked {
            callback(item);
        }
    }

    pub(crate) fn emit_back(&self) {
        if let Some(callback) = &self.on_back_pressed {
            callback();
        }
    }
}

impl fmt::Debug for GalleryCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryCallbacks")
            .field("on_media_selected", &self.on_media_selected.is_some())
            .field("on_media_clicked", &self.on_media_clicked.is_some())
            .field("on_back_pressed", &self.on_back_pressed.is_some())
            .finish()
    }
}
