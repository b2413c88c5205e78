//! # Google Drive Media Source
//!
//! Implements the `MediaSource` contract for Google Drive API v3.
//!
//! ## Overview
//!
//! This crate provides:
//! - Media listing via `files.list` with server-side MIME/search filtering
//! - Folder enumeration as albums (folders with at least one media child)
//! - Point lookup via `files.get`
//! - Readiness gating through the host's `CloudAuthenticator`
//! - Rate limiting and exponential backoff

pub mod error;
pub mod source;
pub mod types;

pub use error::{GoogleDriveError, Result};
pub use source::GoogleDriveSource;
