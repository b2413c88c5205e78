//! Fetch result envelope.

use serde::{Deserialize, Serialize};

use crate::models::{MediaAlbum, MediaItem};

/// Outcome of a media fetch.
///
/// Exactly one variant per emission. A source call resolves to exactly one
/// terminal variant (`Success`, `AlbumsSuccess`, `Error`, or `Empty`);
/// `Loading` is the in-flight marker the state controller publishes while a
/// fetch is pending.
///
/// Transport and query failures never cross the source boundary as panics
/// or error types - they arrive here as `Error` with a displayable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaResult {
    /// Item listing, post-filter, non-empty.
    Success(Vec<MediaItem>),
    /// Album listing, non-empty.
    AlbumsSuccess(Vec<MediaAlbum>),
    /// Displayable failure message.
    Error(String),
    /// The query matched nothing.
    Empty,
    /// A fetch is in flight.
    Loading,
}

impl MediaResult {
    /// Whether this is a final outcome (anything but `Loading`).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MediaResult::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminality() {
        assert!(MediaResult::Empty.is_terminal());
        assert!(MediaResult::Error("x".to_string()).is_terminal());
        assert!(MediaResult::Success(vec![]).is_terminal());
        assert!(!MediaResult::Loading.is_terminal());
    }
}
