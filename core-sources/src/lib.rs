//! # Media Source Repositories
//!
//! The polymorphic source contract and its two core implementations.
//!
//! ## Overview
//!
//! Every backing store - the device media index and each cloud provider -
//! is exposed through the single [`MediaSource`] contract, so callers never
//! distinguish one source from an aggregate of many:
//!
//! - [`DeviceMediaSource`] - the local device index, behind the
//!   `MediaStoreAccess` and `StoragePermissions` bridges
//! - [`CompositeMediaSource`] - fans out to the device source plus every
//!   configured cloud source and merges their results into one collection
//!
//! Cloud provider sources live in their own crates (`provider-google-drive`,
//! `provider-onedrive`) and plug into the composite through the same trait.
//!
//! ## Result discipline
//!
//! A fetch resolves to exactly one terminal
//! [`MediaResult`](core_catalog::MediaResult); transport failures are
//! converted to `MediaResult::Error` at this boundary and never propagate
//! as panics or error types. Every fetch checks readiness first and
//! short-circuits with an error describing the unmet precondition.

pub mod composite;
pub mod device;
pub mod source;

pub use composite::CompositeMediaSource;
pub use device::DeviceMediaSource;
pub use source::MediaSource;
