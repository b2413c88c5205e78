//! Google Drive media source implementation
//!
//! Implements the `MediaSource` contract against Google Drive API v3,
//! speaking through the host's `HttpClient` and `CloudAuthenticator`
//! bridges. Listing pushes MIME-class and name-search constraints into the
//! `files.list` query; the remaining filter constraints run client-side.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use bridge_traits::auth::CloudAuthenticator;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_catalog::{
    cloud_id, MediaAlbum, MediaFilter, MediaItem, MediaResult, MediaType, ProviderKind,
};
use core_sources::MediaSource;

use crate::error::GoogleDriveError;
use crate::types::{DriveFile, FilesListResponse};

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Results per page for listing requests
const PAGE_SIZE: u32 = 100;

/// Retry attempts for throttled or failing requests
const MAX_RETRIES: u32 = 3;

/// Fields requested for media file resources
const MEDIA_FILE_FIELDS: &str = "id,name,mimeType,size,createdTime,modifiedTime,thumbnailLink,webContentLink,parents,imageMediaMetadata(width,height),videoMediaMetadata(width,height,durationMillis)";

/// Query clause matching any image or video that is not trashed
const MEDIA_QUERY_BASE: &str =
    "(mimeType contains 'image/' or mimeType contains 'video/') and trashed=false";

const NOT_AUTHENTICATED: &str = "Not authenticated with Google Drive";

/// Fallback locators for resources without a thumbnail
const IMAGE_PLACEHOLDER: &str = "media-gallery://placeholder/image";
const VIDEO_PLACEHOLDER: &str = "media-gallery://placeholder/video";
const FOLDER_PLACEHOLDER: &str = "media-gallery://placeholder/folder";

/// Media source backed by Google Drive.
///
/// Every fetch checks the authenticator first and reports an error result
/// when no session is available; authentication is never attempted
/// implicitly from a fetch path.
pub struct GoogleDriveSource {
    http: Arc<dyn HttpClient>,
    auth: Arc<dyn CloudAuthenticator>,
}

impl GoogleDriveSource {
    pub fn new(http: Arc<dyn HttpClient>, auth: Arc<dyn CloudAuthenticator>) -> Self {
        Self { http, auth }
    }

    async fn token(&self) -> Result<String, GoogleDriveError> {
        self.auth
            .access_token()
            .await
            .map_err(|e| GoogleDriveError::AuthenticationFailed(e.to_string()))
    }

    /// Escape a value for embedding in a Drive query string literal.
    fn escape_query_value(value: &str) -> String {
        value.replace('\\', "\\\\").replace('\'', "\\'")
    }

    /// Build the `files.list` query for a media listing.
    fn build_media_query(filter: &MediaFilter) -> String {
        let mut clauses = vec![MEDIA_QUERY_BASE.to_string()];

        if filter.media_types.len() == 1 {
            if filter.media_types.contains(&MediaType::Image) {
                clauses.push("mimeType contains 'image/'".to_string());
            } else {
                clauses.push("mimeType contains 'video/'".to_string());
            }
        }

        if let Some(search) = &filter.search_query {
            if !search.is_empty() {
                clauses.push(format!(
                    "name contains '{}'",
                    Self::escape_query_value(search)
                ));
            }
        }

        clauses.join(" and ")
    }

    fn parse_timestamp(rfc3339: Option<&String>) -> DateTime<Utc> {
        rfc3339
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Execute a GET with retry on rate limits and server errors.
    #[instrument(skip(self, token), fields(url = %url))]
    async fn get_with_retry(
        &self,
        url: String,
        token: &str,
    ) -> Result<HttpResponse, GoogleDriveError> {
        let mut attempt = 0;

        loop {
            let request = HttpRequest::get(url.clone())
                .bearer_token(token)
                .header("Accept", "application/json")
                .timeout(Duration::from_secs(30));

            match self.http.execute(request).await {
                Ok(response) => {
                    let status = response.status;

                    if status == 200 {
                        return Ok(response);
                    } else if status == 429 || (500..600).contains(&status) {
                        attempt += 1;
                        if attempt >= MAX_RETRIES {
                            warn!("request failed after {MAX_RETRIES} attempts: status={status}");
                            return Err(GoogleDriveError::ApiError {
                                status_code: status,
                                message: format!("Request failed after {MAX_RETRIES} retries"),
                            });
                        }

                        let backoff_ms = 100u64 * 2u64.pow(attempt);
                        warn!(
                            "request failed (attempt {attempt}/{MAX_RETRIES}): status={status}, retrying in {backoff_ms}ms"
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    } else {
                        return Err(GoogleDriveError::ApiError {
                            status_code: status,
                            message: String::from_utf8_lossy(&response.body).to_string(),
                        });
                    }
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= MAX_RETRIES {
                        warn!("request failed after {MAX_RETRIES} attempts: {e}");
                        return Err(e.into());
                    }

                    let backoff_ms = 100u64 * 2u64.pow(attempt);
                    warn!(
                        "request failed (attempt {attempt}/{MAX_RETRIES}): {e}, retrying in {backoff_ms}ms"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    /// List files matching `query`, draining pagination.
    async fn list_files(
        &self,
        token: &str,
        query: &str,
        fields: &str,
    ) -> Result<Vec<DriveFile>, GoogleDriveError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{DRIVE_API_BASE}/files?q={}&pageSize={PAGE_SIZE}&fields=nextPageToken,files({fields})",
                urlencoding::encode(query)
            );
            if let Some(cursor) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(cursor)));
            }

            let response = self.get_with_retry(url, token).await?;
            let page: FilesListResponse = serde_json::from_slice(&response.body)
                .map_err(|e| GoogleDriveError::ParseError(e.to_string()))?;

            files.extend(page.files);

            match page.next_page_token {
                Some(cursor) => page_token = Some(cursor),
                None => break,
            }
        }

        debug!(count = files.len(), "listed Drive files");
        Ok(files)
    }

    /// Fetch a single file's metadata.
    async fn get_file(
        &self,
        token: &str,
        file_id: &str,
        fields: &str,
    ) -> Result<DriveFile, GoogleDriveError> {
        let url = format!(
            "{DRIVE_API_BASE}/files/{}?fields={fields}",
            urlencoding::encode(file_id)
        );
        let response = self.get_with_retry(url, token).await?;
        serde_json::from_slice(&response.body)
            .map_err(|e| GoogleDriveError::ParseError(e.to_string()))
    }

    /// Convert a Drive file into a catalog item.
    ///
    /// Returns `None` for non-media resources. `album` supplies the
    /// (already namespaced) album id and display name when the file was
    /// fetched in folder context.
    fn convert_file(file: DriveFile, album: Option<(&str, &str)>) -> Option<MediaItem> {
        let media_type = if file.mime_type.contains("image/") {
            MediaType::Image
        } else if file.mime_type.contains("video/") {
            MediaType::Video
        } else {
            return None;
        };

        let (width, height) = match media_type {
            MediaType::Image => file
                .image_media_metadata
                .as_ref()
                .map(|m| (m.width.unwrap_or(0), m.height.unwrap_or(0)))
                .unwrap_or((0, 0)),
            MediaType::Video => file
                .video_media_metadata
                .as_ref()
                .map(|m| (m.width.unwrap_or(0), m.height.unwrap_or(0)))
                .unwrap_or((0, 0)),
        };

        let duration_ms = match media_type {
            MediaType::Video => file
                .video_media_metadata
                .as_ref()
                .and_then(|m| m.duration_millis.as_ref())
                .and_then(|d| d.parse().ok()),
            MediaType::Image => None,
        };

        let resolution = (media_type == MediaType::Video && width > 0 && height > 0)
            .then(|| format!("{width}x{height}"));

        let uri = file.thumbnail_link.clone().unwrap_or_else(|| {
            match media_type {
                MediaType::Image => IMAGE_PLACEHOLDER,
                MediaType::Video => VIDEO_PLACEHOLDER,
            }
            .to_string()
        });

        let (album_id, album_name) = match album {
            Some((id, name)) => (id.to_string(), name.to_string()),
            None => (
                file.parents
                    .first()
                    .map(|parent| cloud_id::encode(ProviderKind::GoogleDrive, parent))
                    .unwrap_or_default(),
                String::new(),
            ),
        };

        Some(MediaItem {
            id: cloud_id::encode(ProviderKind::GoogleDrive, &file.id),
            uri,
            name: file.name,
            path: String::new(),
            media_type,
            album_id,
            album_name,
            date_created: Self::parse_timestamp(file.created_time.as_ref()),
            date_modified: Self::parse_timestamp(file.modified_time.as_ref()),
            size: file.size.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0),
            width,
            height,
            mime_type: file.mime_type,
            is_local: false,
            duration_ms,
            resolution,
            cloud_provider: Some(ProviderKind::GoogleDrive),
            cloud_id: Some(file.id),
            download_url: file.web_content_link,
        })
    }

    async fn list_media(&self, filter: &MediaFilter) -> Result<Vec<MediaItem>, GoogleDriveError> {
        let token = self.token().await?;
        let query = Self::build_media_query(filter);
        let files = self.list_files(&token, &query, MEDIA_FILE_FIELDS).await?;

        let mut items: Vec<MediaItem> = files
            .into_iter()
            .filter_map(|file| Self::convert_file(file, None))
            .filter(|item| filter.matches(item))
            .collect();
        items.sort_by(|a, b| filter.sort_by.compare(a, b));
        Ok(items)
    }

    async fn list_albums(&self) -> Result<Vec<MediaAlbum>, GoogleDriveError> {
        let token = self.token().await?;
        let folders = self
            .list_files(
                &token,
                "mimeType='application/vnd.google-apps.folder' and trashed=false",
                "id,name,createdTime",
            )
            .await?;

        let mut albums = Vec::new();
        for folder in folders {
            let children_query = format!(
                "'{}' in parents and {MEDIA_QUERY_BASE}",
                Self::escape_query_value(&folder.id)
            );
            let children = self
                .list_files(&token, &children_query, "id,thumbnailLink")
                .await?;

            if children.is_empty() {
                continue;
            }

            let cover_uri = children
                .first()
                .and_then(|child| child.thumbnail_link.clone())
                .unwrap_or_else(|| FOLDER_PLACEHOLDER.to_string());

            albums.push(MediaAlbum {
                id: cloud_id::encode(ProviderKind::GoogleDrive, &folder.id),
                name: folder.name,
                cover_uri,
                item_count: children.len(),
                date_created: Self::parse_timestamp(folder.created_time.as_ref()),
                path: None,
            });
        }

        info!(count = albums.len(), "listed Drive albums");
        Ok(albums)
    }

    async fn list_album_media(
        &self,
        folder_id: &str,
        filter: &MediaFilter,
    ) -> Result<Vec<MediaItem>, GoogleDriveError> {
        let token = self.token().await?;

        // One name lookup per album; a missing name is not fatal.
        let album_name = match self.get_file(&token, folder_id, "id,name").await {
            Ok(folder) => folder.name,
            Err(e) => {
                warn!(%folder_id, "could not resolve folder name: {e}");
                String::new()
            }
        };

        let query = format!(
            "'{}' in parents and {MEDIA_QUERY_BASE}",
            Self::escape_query_value(folder_id)
        );
        let files = self.list_files(&token, &query, MEDIA_FILE_FIELDS).await?;

        let album_id = cloud_id::encode(ProviderKind::GoogleDrive, folder_id);
        let mut items: Vec<MediaItem> = files
            .into_iter()
            .filter_map(|file| Self::convert_file(file, Some((&album_id, &album_name))))
            .filter(|item| filter.matches(item))
            .collect();
        items.sort_by(|a, b| filter.sort_by.compare(a, b));
        Ok(items)
    }
}

#[async_trait]
impl MediaSource for GoogleDriveSource {
    #[instrument(skip(self, filter))]
    async fn fetch_items(&self, filter: &MediaFilter) -> MediaResult {
        if !self.auth.is_authenticated() {
            return MediaResult::Error(NOT_AUTHENTICATED.to_string());
        }

        match self.list_media(filter).await {
            Ok(items) if items.is_empty() => MediaResult::Empty,
            Ok(items) => MediaResult::Success(items),
            Err(e) => {
                warn!("media listing failed: {e}");
                MediaResult::Error(format!("Failed to fetch media from Google Drive: {e}"))
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_albums(&self) -> MediaResult {
        if !self.auth.is_authenticated() {
            return MediaResult::Error(NOT_AUTHENTICATED.to_string());
        }

        match self.list_albums().await {
            Ok(albums) if albums.is_empty() => MediaResult::Empty,
            Ok(albums) => MediaResult::AlbumsSuccess(albums),
            Err(e) => {
                warn!("album listing failed: {e}");
                MediaResult::Error(format!("Failed to fetch albums from Google Drive: {e}"))
            }
        }
    }

    #[instrument(skip(self, filter), fields(album_id = %album_id))]
    async fn fetch_album_items(&self, album_id: &str, filter: &MediaFilter) -> MediaResult {
        if !self.auth.is_authenticated() {
            return MediaResult::Error(NOT_AUTHENTICATED.to_string());
        }

        let folder_id = match cloud_id::decode_for(ProviderKind::GoogleDrive, album_id) {
            Some(folder_id) => folder_id,
            None => {
                return MediaResult::Error(format!("Invalid Google Drive album ID: {album_id}"))
            }
        };

        match self.list_album_media(folder_id, filter).await {
            Ok(items) if items.is_empty() => MediaResult::Empty,
            Ok(items) => MediaResult::Success(items),
            Err(e) => {
                warn!("album media listing failed: {e}");
                MediaResult::Error(format!(
                    "Failed to fetch media from Google Drive folder: {e}"
                ))
            }
        }
    }

    async fn fetch_item(&self, id: &str) -> Option<MediaItem> {
        if !self.auth.is_authenticated() {
            return None;
        }

        let file_id = cloud_id::decode_for(ProviderKind::GoogleDrive, id)?;
        let token = self.token().await.ok()?;

        match self.get_file(&token, file_id, MEDIA_FILE_FIELDS).await {
            Ok(file) => Self::convert_file(file, None),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(%id, "item lookup failed: {e}");
                None
            }
        }
    }

    fn has_permission(&self) -> bool {
        self.auth.is_authenticated()
    }

    async fn request_permission(&self) -> bool {
        if self.auth.is_authenticated() {
            return true;
        }
        self.auth.authenticate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::auth::{AuthChallenge, AuthResponse};
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    struct StubAuth {
        authed: bool,
    }

    #[async_trait]
    impl CloudAuthenticator for StubAuth {
        fn is_authenticated(&self) -> bool {
            self.authed
        }

        async fn authenticate(&self) -> bool {
            self.authed
        }

        async fn logout(&self) {}

        async fn access_token(&self) -> BridgeResult<String> {
            if self.authed {
                Ok("test_token".to_string())
            } else {
                Err(BridgeError::NotAvailable("signed out".to_string()))
            }
        }

        fn auth_challenge(&self) -> Option<AuthChallenge> {
            None
        }

        async fn handle_auth_response(&self, _response: AuthResponse) -> bool {
            false
        }
    }

    fn ok_json(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body.as_bytes().to_vec()),
        }
    }

    fn source(http: MockHttpClient, authed: bool) -> GoogleDriveSource {
        GoogleDriveSource::new(Arc::new(http), Arc::new(StubAuth { authed }))
    }

    const LISTING_PAGE: &str = r#"{
        "files": [
            {
                "id": "img1",
                "name": "beach.jpg",
                "mimeType": "image/jpeg",
                "size": "2048",
                "createdTime": "2024-01-01T00:00:00.000Z",
                "modifiedTime": "2024-01-02T00:00:00.000Z",
                "thumbnailLink": "https://lh3.googleusercontent.com/t1",
                "webContentLink": "https://drive.google.com/uc?id=img1",
                "parents": ["folder1"],
                "imageMediaMetadata": { "width": 4000, "height": 3000 }
            },
            {
                "id": "vid1",
                "name": "clip.mp4",
                "mimeType": "video/mp4",
                "size": "409600",
                "createdTime": "2024-01-03T00:00:00.000Z",
                "modifiedTime": "2024-01-04T00:00:00.000Z",
                "parents": ["folder1"],
                "videoMediaMetadata": { "width": 1920, "height": 1080, "durationMillis": "42000" }
            },
            {
                "id": "doc1",
                "name": "notes.txt",
                "mimeType": "text/plain"
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_fetch_items_requires_session() {
        // No expectations set: any HTTP call would panic the mock.
        let src = source(MockHttpClient::new(), false);

        match src.fetch_items(&MediaFilter::default()).await {
            MediaResult::Error(message) => assert_eq!(message, NOT_AUTHENTICATED),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(!src.has_permission());
    }

    #[tokio::test]
    async fn test_fetch_items_converts_and_namespaces() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|req| {
            assert!(req.headers.get("Authorization").unwrap().contains("test_token"));
            Ok(ok_json(LISTING_PAGE))
        });

        let src = source(http, true);
        match src.fetch_items(&MediaFilter::default()).await {
            MediaResult::Success(items) => {
                // The non-media file is dropped.
                assert_eq!(items.len(), 2);

                let image = items.iter().find(|i| i.is_image()).unwrap();
                assert_eq!(image.id, "google_drive:img1");
                assert_eq!(image.cloud_id.as_deref(), Some("img1"));
                assert_eq!(image.cloud_provider, Some(ProviderKind::GoogleDrive));
                assert!(!image.is_local);
                assert_eq!(image.size, 2048);
                assert_eq!(image.width, 4000);
                assert_eq!(image.uri, "https://lh3.googleusercontent.com/t1");
                assert_eq!(image.album_id, "google_drive:folder1");
                assert_eq!(
                    image.download_url.as_deref(),
                    Some("https://drive.google.com/uc?id=img1")
                );

                let video = items.iter().find(|i| i.is_video()).unwrap();
                assert_eq!(video.duration_ms, Some(42000));
                assert_eq!(video.resolution.as_deref(), Some("1920x1080"));
                // No thumbnail in the payload: placeholder locator.
                assert_eq!(video.uri, VIDEO_PLACEHOLDER);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_items_drains_pagination() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(2).returning(|req| {
            if req.url.contains("pageToken=") {
                assert!(req.url.contains("pageToken=page2"));
                Ok(ok_json(
                    r#"{ "files": [ { "id": "b", "name": "b.jpg", "mimeType": "image/jpeg" } ] }"#,
                ))
            } else {
                Ok(ok_json(
                    r#"{ "files": [ { "id": "a", "name": "a.jpg", "mimeType": "image/jpeg" } ], "nextPageToken": "page2" }"#,
                ))
            }
        });

        let src = source(http, true);
        match src.fetch_items(&MediaFilter::default()).await {
            MediaResult::Success(items) => assert_eq!(items.len(), 2),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_type_filter_narrows_query() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|req| {
            let decoded = urlencoding::decode(&req.url).unwrap().into_owned();
            assert!(decoded.contains("and mimeType contains 'image/'"));
            Ok(ok_json(r#"{ "files": [] }"#))
        });

        let src = source(http, true);
        let mut filter = MediaFilter::default();
        filter.media_types = [MediaType::Image].into_iter().collect();

        assert_eq!(src.fetch_items(&filter).await, MediaResult::Empty);
    }

    #[tokio::test]
    async fn test_search_query_is_escaped() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|req| {
            let decoded = urlencoding::decode(&req.url).unwrap().into_owned();
            assert!(decoded.contains(r"name contains 'o\'brien'"));
            Ok(ok_json(r#"{ "files": [] }"#))
        });

        let src = source(http, true);
        let mut filter = MediaFilter::default();
        filter.search_query = Some("o'brien".to_string());

        assert_eq!(src.fetch_items(&filter).await, MediaResult::Empty);
    }

    #[tokio::test]
    async fn test_client_side_size_filter_applies() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(ok_json(LISTING_PAGE)));

        let src = source(http, true);
        let mut filter = MediaFilter::default();
        filter.min_size = Some(100_000);

        match src.fetch_items(&filter).await {
            MediaResult::Success(items) => {
                assert_eq!(items.len(), 1);
                assert!(items[0].is_video());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_albums_skips_empty_folders() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|req| {
            let decoded = urlencoding::decode(&req.url).unwrap().into_owned();
            if decoded.contains("vnd.google-apps.folder") {
                Ok(ok_json(
                    r#"{ "files": [
                        { "id": "full", "name": "Vacation", "mimeType": "application/vnd.google-apps.folder", "createdTime": "2024-01-01T00:00:00.000Z" },
                        { "id": "empty", "name": "Docs", "mimeType": "application/vnd.google-apps.folder", "createdTime": "2024-01-01T00:00:00.000Z" }
                    ] }"#,
                ))
            } else if decoded.contains("'full' in parents") {
                Ok(ok_json(
                    r#"{ "files": [ { "id": "c1", "name": "c1", "mimeType": "image/jpeg", "thumbnailLink": "https://lh3/cover" } ] }"#,
                ))
            } else {
                Ok(ok_json(r#"{ "files": [] }"#))
            }
        });

        let src = source(http, true);
        match src.fetch_albums().await {
            MediaResult::AlbumsSuccess(albums) => {
                assert_eq!(albums.len(), 1);
                assert_eq!(albums[0].id, "google_drive:full");
                assert_eq!(albums[0].name, "Vacation");
                assert_eq!(albums[0].item_count, 1);
                assert_eq!(albums[0].cover_uri, "https://lh3/cover");
            }
            other => panic!("expected albums, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_album_items_validates_namespace() {
        let src = source(MockHttpClient::new(), true);

        match src
            .fetch_album_items("onedrive:folder1", &MediaFilter::default())
            .await
        {
            MediaResult::Error(message) => {
                assert_eq!(message, "Invalid Google Drive album ID: onedrive:folder1");
            }
            other => panic!("expected error, got {other:?}"),
        }

        assert!(matches!(
            src.fetch_album_items("raw-bucket", &MediaFilter::default()).await,
            MediaResult::Error(_)
        ));
    }

    #[tokio::test]
    async fn test_fetch_album_items_scopes_to_folder() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|req| {
            let decoded = urlencoding::decode(&req.url).unwrap().into_owned();
            if decoded.contains("/files/folder1") {
                Ok(ok_json(
                    r#"{ "id": "folder1", "name": "Vacation", "mimeType": "application/vnd.google-apps.folder" }"#,
                ))
            } else {
                assert!(decoded.contains("'folder1' in parents"));
                Ok(ok_json(
                    r#"{ "files": [ { "id": "img1", "name": "a.jpg", "mimeType": "image/jpeg" } ] }"#,
                ))
            }
        });

        let src = source(http, true);
        match src
            .fetch_album_items("google_drive:folder1", &MediaFilter::default())
            .await
        {
            MediaResult::Success(items) => {
                assert_eq!(items[0].album_id, "google_drive:folder1");
                assert_eq!(items[0].album_name, "Vacation");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_item_not_found_is_absence() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 404,
                headers: HashMap::new(),
                body: Bytes::from_static(b"File not found"),
            })
        });

        let src = source(http, true);
        assert!(src.fetch_item("google_drive:gone").await.is_none());

        // Foreign namespace never reaches the API.
        let quiet = source(MockHttpClient::new(), true);
        assert!(quiet.fetch_item("onedrive:abc").await.is_none());
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let mut http = MockHttpClient::new();
        let mut attempts = 0;
        http.expect_execute().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                Ok(HttpResponse {
                    status: 503,
                    headers: HashMap::new(),
                    body: Bytes::new(),
                })
            } else {
                Ok(ok_json(r#"{ "files": [] }"#))
            }
        });

        let src = source(http, true);
        assert_eq!(src.fetch_items(&MediaFilter::default()).await, MediaResult::Empty);
    }
}
