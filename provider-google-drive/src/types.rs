//! Google Drive API response types
//!
//! Data structures for deserializing Google Drive API v3 responses.

use serde::Deserialize;

/// Google Drive API file resource
///
/// See: https://developers.google.com/drive/api/v3/reference/files#resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID
    pub id: String,

    /// File name
    pub name: String,

    /// MIME type
    pub mime_type: String,

    /// File size in bytes, serialized as a string (omitted for folders)
    pub size: Option<String>,

    /// Creation time (RFC 3339)
    pub created_time: Option<String>,

    /// Modification time (RFC 3339)
    pub modified_time: Option<String>,

    /// Short-lived thumbnail URL
    pub thumbnail_link: Option<String>,

    /// Direct download URL for binary content
    pub web_content_link: Option<String>,

    /// Parent folder IDs
    #[serde(default)]
    pub parents: Vec<String>,

    /// Whether file is trashed
    #[serde(default)]
    pub trashed: bool,

    /// Image-specific metadata
    pub image_media_metadata: Option<ImageMediaMetadata>,

    /// Video-specific metadata
    pub video_media_metadata: Option<VideoMediaMetadata>,
}

/// Image metadata facet
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMediaMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Video metadata facet
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMediaMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Duration in milliseconds, serialized as a string
    pub duration_millis: Option<String>,
}

/// Google Drive API files.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    /// List of files
    #[serde(default)]
    pub files: Vec<DriveFile>,

    /// Token for next page
    pub next_page_token: Option<String>,
}
