//! Microsoft Graph API response types
//!
//! Data structures for deserializing drive item resources.
//! See: https://learn.microsoft.com/graph/api/resources/driveitem

use serde::Deserialize;

/// A drive item: file or folder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    /// Item ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Size in bytes
    pub size: Option<u64>,

    /// Creation time (RFC 3339)
    pub created_date_time: Option<String>,

    /// Last modification time (RFC 3339)
    pub last_modified_date_time: Option<String>,

    /// File facet; present for files only
    pub file: Option<FileFacet>,

    /// Folder facet; present for folders only
    pub folder: Option<FolderFacet>,

    /// Image facet; present for recognized images
    pub image: Option<ImageFacet>,

    /// Video facet; present for recognized videos
    pub video: Option<VideoFacet>,

    /// Thumbnail sets, populated when `$expand=thumbnails` is requested
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailSet>,

    /// Pre-authenticated download URL
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    pub download_url: Option<String>,

    /// Containing folder reference
    pub parent_reference: Option<ParentReference>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// MIME type from the file facet, empty for folders.
    pub fn mime_type(&self) -> &str {
        self.file
            .as_ref()
            .and_then(|f| f.mime_type.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    pub child_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFacet {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFacet {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Duration in milliseconds
    pub duration: Option<u64>,
}

/// One set of generated thumbnails for an item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailSet {
    pub small: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub large: Option<Thumbnail>,
}

impl ThumbnailSet {
    /// Best available thumbnail URL, preferring medium.
    pub fn best_url(&self) -> Option<&str> {
        self.medium
            .as_ref()
            .or(self.large.as_ref())
            .or(self.small.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub url: String,
}

/// Reference to an item's parent folder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Paged item collection.
#[derive(Debug, Deserialize)]
pub struct DriveItemListResponse {
    #[serde(default)]
    pub value: Vec<DriveItem>,

    /// Absolute URL of the next page, when more results exist
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_image_item() {
        let json = r#"{
            "id": "item1",
            "name": "beach.jpg",
            "size": 2048,
            "createdDateTime": "2024-01-01T00:00:00Z",
            "lastModifiedDateTime": "2024-01-02T00:00:00Z",
            "file": { "mimeType": "image/jpeg" },
            "image": { "width": 4000, "height": 3000 },
            "thumbnails": [ { "medium": { "url": "https://thumb/medium" } } ],
            "@microsoft.graph.downloadUrl": "https://download/item1",
            "parentReference": { "id": "folder1", "name": "Vacation" }
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert!(!item.is_folder());
        assert_eq!(item.mime_type(), "image/jpeg");
        assert_eq!(item.thumbnails[0].best_url(), Some("https://thumb/medium"));
        assert_eq!(item.download_url.as_deref(), Some("https://download/item1"));
    }

    #[test]
    fn test_deserialize_folder_item() {
        let json = r#"{
            "id": "folder1",
            "name": "Vacation",
            "folder": { "childCount": 12 }
        }"#;

        let item: DriveItem = serde_json::from_str(json).unwrap();
        assert!(item.is_folder());
        assert_eq!(item.mime_type(), "");
        assert_eq!(item.folder.unwrap().child_count, Some(12));
    }

    #[test]
    fn test_deserialize_paged_listing() {
        let json = r#"{
            "value": [ { "id": "a", "name": "a.jpg" } ],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/next"
        }"#;

        let page: DriveItemListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.value.len(), 1);
        assert!(page.next_link.is_some());
    }

    #[test]
    fn test_thumbnail_preference_order() {
        let set = ThumbnailSet {
            small: Some(Thumbnail { url: "s".to_string() }),
            medium: None,
            large: Some(Thumbnail { url: "l".to_string() }),
        };
        assert_eq!(set.best_url(), Some("l"));
    }
}
