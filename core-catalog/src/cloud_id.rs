//! Cloud ID Namespacing
//!
//! Cloud entity ids are re-encoded as `"<tag>:<native_id>"` before they
//! leave a source, so a flat merged collection stays unambiguous and every
//! id can be traced back to its origin provider. Local device ids use the
//! disjoint two-part `"image:"`/`"video:"` scheme.
//!
//! Decoding splits on the *first* colon only - native ids may themselves
//! contain colons (including a further namespace level, when an aggregated
//! source is itself mounted as a provider). Malformed input never panics;
//! it decodes to `None` and the caller reports an error or "not found" as
//! its contract demands.

use crate::models::MediaType;
use crate::provider::ProviderKind;

/// Encode a provider-native id into the composite namespace.
///
/// The output always begins with the provider's canonical lowercase tag
/// followed by a colon.
///
/// # Examples
///
/// ```
/// use core_catalog::{cloud_id, ProviderKind};
///
/// assert_eq!(cloud_id::encode(ProviderKind::GoogleDrive, "abc123"), "google_drive:abc123");
/// ```
pub fn encode(provider: ProviderKind, native_id: &str) -> String {
    format!("{}:{}", provider.tag(), native_id)
}

/// Decode a namespaced id into its provider and native part.
///
/// Returns `None` when there is no colon or the prefix is not a known
/// provider tag (prefix matching is case-insensitive).
///
/// # Examples
///
/// ```
/// use core_catalog::{cloud_id, ProviderKind};
///
/// assert_eq!(
///     cloud_id::decode("google_drive:abc:def"),
///     Some((ProviderKind::GoogleDrive, "abc:def"))
/// );
/// assert_eq!(cloud_id::decode("no-colon"), None);
/// assert_eq!(cloud_id::decode("image:content://media/1"), None);
/// ```
pub fn decode(id: &str) -> Option<(ProviderKind, &str)> {
    let (prefix, rest) = id.split_once(':')?;
    let provider = ProviderKind::parse(prefix)?;
    Some((provider, rest))
}

/// Decode a namespaced id, validating it belongs to `provider`.
///
/// Returns the native id, or `None` for malformed input or a foreign
/// namespace.
pub fn decode_for(provider: ProviderKind, id: &str) -> Option<&str> {
    match decode(id) {
        Some((kind, native)) if kind == provider => Some(native),
        _ => None,
    }
}

/// Encode a local device id: media kind tag + opaque locator.
pub fn encode_local(media_type: MediaType, locator: &str) -> String {
    format!("{}:{}", media_type.tag(), locator)
}

/// Decode a local device id into its kind and locator.
///
/// Returns `None` when there is no colon or the prefix is neither
/// `"image"` nor `"video"` (case-insensitive).
pub fn decode_local(id: &str) -> Option<(MediaType, &str)> {
    let (prefix, rest) = id.split_once(':')?;
    match prefix.to_ascii_lowercase().as_str() {
        "image" => Some((MediaType::Image, rest)),
        "video" => Some((MediaType::Video, rest)),
        _ => None,
    }
}

/// Whether an id carries the local `"image:"`/`"video:"` prefix.
pub fn is_local_id(id: &str) -> bool {
    decode_local(id).is_some()
}
