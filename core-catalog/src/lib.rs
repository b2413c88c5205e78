//! # Media Catalog Model
//!
//! Entity and value types shared by every media source: items, albums,
//! filters, sort options, result envelopes, provider identities, and the
//! cloud ID namespacing codec.
//!
//! ## Overview
//!
//! Everything in this crate is pure data with structural equality. Items
//! surfaced by different sources coexist in one flat collection because
//! their ids are namespaced ([`cloud_id`]) and each carries its origin
//! ([`MediaItem::cloud_provider`]); the aggregation and state logic lives in
//! the `core-sources` and `core-gallery` crates.
//!
//! ## Types
//!
//! - [`MediaItem`] / [`MediaAlbum`] - immutable media entities
//! - [`MediaType`] / [`MediaSortOption`] - type tags and the deterministic
//!   sort comparator
//! - [`MediaFilter`] - pure-value query descriptor with a client-side
//!   predicate
//! - [`MediaResult`] - the result envelope every fetch resolves to
//! - [`ProviderKind`] - the fixed set of cloud provider identities
//! - [`cloud_id`] - encode/decode for namespaced identifiers

pub mod cloud_id;
pub mod filter;
pub mod models;
pub mod provider;
pub mod result;

pub use filter::{DateRange, MediaFilter};
pub use models::{MediaAlbum, MediaItem, MediaSortOption, MediaType};
pub use provider::ProviderKind;
pub use result::MediaResult;
