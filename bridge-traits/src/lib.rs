//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host
//! application embedding the gallery.
//!
//! ## Overview
//!
//! This crate defines the contract between the gallery core and
//! platform-specific plumbing. Each trait represents a capability the core
//! requires but that only the host can provide: permission prompts, the
//! on-device media index, cloud sign-in sessions, and HTTP transport.
//!
//! ## Traits
//!
//! - [`StoragePermissions`](permissions::StoragePermissions) - storage/media
//!   read permission state and prompting
//! - [`MediaStoreAccess`](media_store::MediaStoreAccess) - queries against
//!   the device media index
//! - [`CloudAuthenticator`](auth::CloudAuthenticator) - authenticated cloud
//!   sessions and the sign-in handoff
//! - [`HttpClient`](http::HttpClient) - async HTTP transport for cloud
//!   provider APIs
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Host
//! implementations should convert platform-specific failures into
//! `BridgeError` with actionable messages; the gallery core converts them
//! into user-facing error results at the source-repository boundary.
//!
//! Permission and authentication *denial* is not an error: those traits
//! report denial as a plain `false` so the core can treat unreadiness as a
//! first-class state rather than a fault.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so a single host adapter
//! instance can be shared across async tasks.

pub mod auth;
pub mod error;
pub mod http;
pub mod media_store;
pub mod permissions;

pub use error::BridgeError;

// Re-export commonly used types
pub use auth::{AuthChallenge, AuthResponse, CloudAuthenticator};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use media_store::{MediaStoreAccess, StoreKind, StoreQuery, StoreRecord};
pub use permissions::StoragePermissions;
