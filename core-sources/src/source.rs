//! The polymorphic source repository contract.

use async_trait::async_trait;
use core_catalog::{MediaFilter, MediaItem, MediaResult};

/// A backing media source: the device index, one cloud provider, or an
/// aggregate of several.
///
/// Implementations must uphold three rules:
///
/// 1. **No failures past the boundary.** Transport and query errors are
///    reported as [`MediaResult::Error`]; fetches never panic and never
///    return error types.
/// 2. **Readiness first.** Every fetch checks [`has_permission`] and
///    short-circuits to an `Error` naming the unmet precondition instead of
///    attempting the backing call. No fetch triggers permission prompts or
///    authentication implicitly.
/// 3. **Deterministic output.** Item listings are sorted by the filter's
///    sort option with ties broken by id, so identical queries yield
///    identical results.
///
/// [`has_permission`]: MediaSource::has_permission
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch all items matching `filter`.
    ///
    /// Constraints are pushed into the backing query where the store
    /// supports it and applied client-side otherwise. Resolves to `Empty`
    /// when the post-filter collection is empty, `Success` otherwise.
    async fn fetch_items(&self, filter: &MediaFilter) -> MediaResult;

    /// Enumerate albums containing at least one qualifying media item.
    ///
    /// Each album reports its item count and a representative cover
    /// locator (first child's thumbnail, or a placeholder when the store
    /// has none).
    async fn fetch_albums(&self) -> MediaResult;

    /// Fetch the items of one album, filtered.
    ///
    /// `album_id` must belong to this source: an unrecognized or
    /// foreign-namespaced id resolves to an immediate `Error`, never a
    /// silent `Empty`.
    async fn fetch_album_items(&self, album_id: &str, filter: &MediaFilter) -> MediaResult;

    /// Point lookup by id.
    ///
    /// `None` is a legitimate outcome - for ids that are well-formed but
    /// gone, for malformed ids, and for lookups attempted without
    /// readiness. Point lookups are lenient where album fetches are strict.
    async fn fetch_item(&self, id: &str) -> Option<MediaItem>;

    /// Whether the source is ready to serve fetches (storage permission
    /// for the device source, an authenticated session for cloud sources).
    fn has_permission(&self) -> bool;

    /// Attempt to become ready (prompt for storage permission, silent
    /// cloud authentication). Returns whether the source is usable
    /// afterwards.
    async fn request_permission(&self) -> bool;
}
