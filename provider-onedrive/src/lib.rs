//! # OneDrive Media Source
//!
//! Implements the `MediaSource` contract for Microsoft Graph (OneDrive).
//!
//! ## Overview
//!
//! This crate provides:
//! - Media listing via drive search with client-side facet filtering
//! - Folder enumeration as albums (folders with at least one media child)
//! - Point lookup via `/me/drive/items/{id}`
//! - Readiness gating through the host's `CloudAuthenticator`
//! - Throttling per Graph API guidelines (`Retry-After` aware backoff)

pub mod error;
pub mod source;
pub mod types;

pub use error::{OneDriveError, Result};
pub use source::OneDriveSource;
