//! Observable gallery UI state.

use core_catalog::{MediaAlbum, MediaItem};

use crate::config::ViewMode;

/// Everything the rendering layer needs to draw a populated gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    /// Album list (empty in flat mode).
    pub albums: Vec<MediaAlbum>,
    /// Items of the current album or flat listing (empty while the album
    /// list is showing).
    pub media_items: Vec<MediaItem>,
    /// Current selection, in selection order.
    pub selected_items: Vec<MediaItem>,
    pub view_mode: ViewMode,
    pub column_count: u16,
    /// Album currently drilled into, `None` at the top level.
    pub current_album_id: Option<String>,
}

/// The single current UI state, published as a whole value on every
/// transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryState {
    /// A load is in flight.
    #[default]
    Loading,
    /// Content is available.
    Success(GalleryView),
    /// A fetch failed; `message` is shown verbatim.
    Error { message: String },
    /// The query matched nothing.
    Empty,
    /// Storage permission (and cloud readiness) is missing; the host shows
    /// a grant-access affordance.
    NoPermission,
}

impl GalleryState {
    pub fn is_success(&self) -> bool {
        matches!(self, GalleryState::Success(_))
    }

    /// The populated view, when in `Success`.
    pub fn as_view(&self) -> Option<&GalleryView> {
        match self {
            GalleryState::Success(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        assert_eq!(GalleryState::default(), GalleryState::Loading);
    }

    #[test]
    fn test_as_view() {
        let view = GalleryView {
            albums: Vec::new(),
            media_items: Vec::new(),
            selected_items: Vec::new(),
            view_mode: ViewMode::Grid,
            column_count: 3,
            current_album_id: None,
        };
        let state = GalleryState::Success(view);
        assert!(state.is_success());
        assert!(state.as_view().is_some());
        assert!(GalleryState::Empty.as_view().is_none());
    }
}
