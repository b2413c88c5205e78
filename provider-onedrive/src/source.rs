//! OneDrive media source implementation
//!
//! Implements the `MediaSource` contract against Microsoft Graph, speaking
//! through the host's `HttpClient` and `CloudAuthenticator` bridges. Graph
//! offers no server-side MIME filtering for drive listings, so media
//! classification runs client-side over the file/image/video facets; only
//! the name search is pushed into the drive search call.

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

use crate::error::OneDriveError;
use crate::types::{DriveItem, DriveItemListResponse};

/// Microsoft Graph base URL
const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Results per page for listing requests
const PAGE_SIZE: u32 = 200;

/// Retry attempts for throttled or failing requests
const MAX_RETRIES: u32 = 3;

const NOT_AUTHENTICATED: &str = "Not authenticated with OneDrive";

/// Fallback locators for items without a generated thumbnail
const IMAGE_PLACEHOLDER: &str = "media-gallery://placeholder/image";
const VIDEO_PLACEHOLDER: &str = "media-gallery://placeholder/video";
const FOLDER_PLACEHOLDER: &str = "media-gallery://placeholder/folder";

/// Media source backed by OneDrive.
///
/// Every fetch checks the authenticator first and reports an error result
/// when no session is available; authentication is never attempted
/// implicitly from a fetch path.
pub struct OneDriveSource {
    http: Arc<dyn HttpClient>,
    auth: Arc<dyn CloudAuthenticator>,
}

impl OneDriveSource {
    pub fn new(http: Arc<dyn HttpClient>, auth: Arc<dyn CloudAuthenticator>) -> Self {
        Self { http, auth }
    }

    async fn token(&self) -> Result<String, OneDriveError> {
        self.auth
            .access_token()
            .await
            .map_err(|e| OneDriveError::AuthenticationFailed(e.to_string()))
    }

    /// Escape a value for an OData string literal (quotes are doubled).
    fn escape_literal(value: &str) -> String {
        value.replace('\'', "''")
    }

    fn parse_timestamp(rfc3339: Option<&String>) -> DateTime<Utc> {
        rfc3339
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Execute a GET with retry; honors `Retry-After` on throttling per
    /// Graph guidelines, falling back to exponential backoff.
    #[instrument(skip(self, token), fields(url = %url))]
    async fn get_with_retry(
        &self,
        url: String,
        token: &str,
    ) -> Result<HttpResponse, OneDriveError> {
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
                            return Err(OneDriveError::ApiError {
                                status_code: status,
                                message: format!("Request failed after {MAX_RETRIES} retries"),
                            });
                        }

                        let backoff_ms = response
                            .headers
                            .get("Retry-After")
                            .and_then(|s| s.parse::<u64>().ok())
                            .map(|secs| secs * 1000)
                            .unwrap_or(100 * 2u64.pow(attempt));
                        warn!(
                            "request throttled (attempt {attempt}/{MAX_RETRIES}): status={status}, retrying in {backoff_ms}ms"
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    } else {
                        return Err(OneDriveError::ApiError {
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

    /// Collect a paged item listing, following `@odata.nextLink`.
    async fn list_items(
        &self,
        token: &str,
        first_url: String,
    ) -> Result<Vec<DriveItem>, OneDriveError> {
        let mut items = Vec::new();
        let mut url = Some(first_url);

        while let Some(current) = url.take() {
            let response = self.get_with_retry(current, token).await?;
            let page: DriveItemListResponse = serde_json::from_slice(&response.body)
                .map_err(|e| OneDriveError::ParseError(e.to_string()))?;

            items.extend(page.value);
            url = page.next_link;
        }

        debug!(count = items.len(), "listed drive items");
        Ok(items)
    }

    fn search_url(search_query: Option<&str>) -> String {
        let needle = Self::escape_literal(search_query.unwrap_or(""));
        format!(
            "{GRAPH_API_BASE}/me/drive/root/search(q='{}')?$top={PAGE_SIZE}&$expand=thumbnails",
            urlencoding::encode(&needle)
        )
    }

    fn children_url(folder_id: &str) -> String {
        format!(
            "{GRAPH_API_BASE}/me/drive/items/{}/children?$top={PAGE_SIZE}&$expand=thumbnails",
            urlencoding::encode(folder_id)
        )
    }

    /// Convert a drive item into a catalog item.
    ///
    /// Returns `None` for folders and non-media files. `album` supplies the
    /// (already namespaced) album id and display name when the item was
    /// fetched in folder context.
    fn convert_item(item: DriveItem, album: Option<(&str, &str)>) -> Option<MediaItem> {
        if item.is_folder() {
            return None;
        }

        let mime_type = item.mime_type().to_string();
        let media_type = if mime_type.contains("image/") || item.image.is_some() {
            MediaType::Image
        } else if mime_type.contains("video/") || item.video.is_some() {
            MediaType::Video
        } else {
            return None;
        };

        let (width, height) = match media_type {
            MediaType::Image => item
                .image
                .as_ref()
                .map(|f| (f.width.unwrap_or(0), f.height.unwrap_or(0)))
                .unwrap_or((0, 0)),
            MediaType::Video => item
                .video
                .as_ref()
                .map(|f| (f.width.unwrap_or(0), f.height.unwrap_or(0)))
                .unwrap_or((0, 0)),
        };

        let duration_ms = match media_type {
            MediaType::Video => item.video.as_ref().and_then(|f| f.duration),
            MediaType::Image => None,
        };

        let resolution = (media_type == MediaType::Video && width > 0 && height > 0)
            .then(|| format!("{width}x{height}"));

        let uri = item
            .thumbnails
            .first()
            .and_then(|set| set.best_url())
            .map(str::to_string)
            .unwrap_or_else(|| {
                match media_type {
                    MediaType::Image => IMAGE_PLACEHOLDER,
                    MediaType::Video => VIDEO_PLACEHOLDER,
                }
                .to_string()
            });

        let (album_id, album_name) = match album {
            Some((id, name)) => (id.to_string(), name.to_string()),
            None => (
                item.parent_reference
                    .as_ref()
                    .and_then(|parent| parent.id.as_deref())
                    .map(|parent_id| cloud_id::encode(ProviderKind::OneDrive, parent_id))
                    .unwrap_or_default(),
                item.parent_reference
                    .as_ref()
                    .and_then(|parent| parent.name.clone())
                    .unwrap_or_default(),
            ),
        };

        Some(MediaItem {
            id: cloud_id::encode(ProviderKind::OneDrive, &item.id),
            uri,
            name: item.name,
            path: String::new(),
            media_type,
            album_id,
            album_name,
            date_created: Self::parse_timestamp(item.created_date_time.as_ref()),
            date_modified: Self::parse_timestamp(item.last_modified_date_time.as_ref()),
            size: item.size.unwrap_or(0),
            width,
            height,
            mime_type,
            is_local: false,
            duration_ms,
            resolution,
            cloud_provider: Some(ProviderKind::OneDrive),
            cloud_id: Some(item.id),
            download_url: item.download_url,
        })
    }

    async fn list_media(&self, filter: &MediaFilter) -> Result<Vec<MediaItem>, OneDriveError> {
        let token = self.token().await?;
        let url = Self::search_url(filter.search_query.as_deref());
        let raw = self.list_items(&token, url).await?;

        let mut items: Vec<MediaItem> = raw
            .into_iter()
            .filter_map(|item| Self::convert_item(item, None))
            .filter(|item| filter.matches(item))
            .collect();
        items.sort_by(|a, b| filter.sort_by.compare(a, b));
        Ok(items)
    }

    async fn list_albums(&self) -> Result<Vec<MediaAlbum>, OneDriveError> {
        let token = self.token().await?;
        let root_children = self
            .list_items(
                &token,
                format!("{GRAPH_API_BASE}/me/drive/root/children?$top={PAGE_SIZE}"),
            )
            .await?;

        let mut albums = Vec::new();
        for folder in root_children.into_iter().filter(DriveItem::is_folder) {
            let children = self
                .list_items(&token, Self::children_url(&folder.id))
                .await?;

            let media_children: Vec<&DriveItem> = children
                .iter()
                .filter(|child| {
                    !child.is_folder()
                        && (child.mime_type().contains("image/")
                            || child.mime_type().contains("video/")
                            || child.image.is_some()
                            || child.video.is_some())
                })
                .collect();

            if media_children.is_empty() {
                continue;
            }

            let cover_uri = media_children
                .first()
                .and_then(|child| child.thumbnails.first())
                .and_then(|set| set.best_url())
                .map(str::to_string)
                .unwrap_or_else(|| FOLDER_PLACEHOLDER.to_string());

            albums.push(MediaAlbum {
                id: cloud_id::encode(ProviderKind::OneDrive, &folder.id),
                name: folder.name.clone(),
                cover_uri,
                item_count: media_children.len(),
                date_created: Self::parse_timestamp(folder.created_date_time.as_ref()),
                path: None,
            });
        }

        info!(count = albums.len(), "listed OneDrive albums");
        Ok(albums)
    }

    async fn list_album_media(
        &self,
        folder_id: &str,
        filter: &MediaFilter,
    ) -> Result<Vec<MediaItem>, OneDriveError> {
        let token = self.token().await?;

        let album_name = match self
            .get_with_retry(
                format!(
                    "{GRAPH_API_BASE}/me/drive/items/{}",
                    urlencoding::encode(folder_id)
                ),
                &token,
            )
            .await
            .and_then(|response| {
                serde_json::from_slice::<DriveItem>(&response.body)
                    .map_err(|e| OneDriveError::ParseError(e.to_string()))
            }) {
            Ok(folder) => folder.name,
            Err(e) => {
                warn!(%folder_id, "could not resolve folder name: {e}");
                String::new()
            }
        };

        let children = self
            .list_items(&token, Self::children_url(folder_id))
            .await?;

        let album_id = cloud_id::encode(ProviderKind::OneDrive, folder_id);
        let mut items: Vec<MediaItem> = children
            .into_iter()
            .filter_map(|item| Self::convert_item(item, Some((&album_id, &album_name))))
            .filter(|item| filter.matches(item))
            .collect();
        items.sort_by(|a, b| filter.sort_by.compare(a, b));
        Ok(items)
    }
}

#[async_trait]
impl MediaSource for OneDriveSource {
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
                MediaResult::Error(format!("Failed to fetch media from OneDrive: {e}"))
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
                MediaResult::Error(format!("Failed to fetch albums from OneDrive: {e}"))
            }
        }
    }

    #[instrument(skip(self, filter), fields(album_id = %album_id))]
    async fn fetch_album_items(&self, album_id: &str, filter: &MediaFilter) -> MediaResult {
        if !self.auth.is_authenticated() {
            return MediaResult::Error(NOT_AUTHENTICATED.to_string());
        }

        let folder_id = match cloud_id::decode_for(ProviderKind::OneDrive, album_id) {
            Some(folder_id) => folder_id,
            None => return MediaResult::Error(format!("Invalid OneDrive album ID: {album_id}")),
        };

        match self.list_album_media(folder_id, filter).await {
            Ok(items) if items.is_empty() => MediaResult::Empty,
            Ok(items) => MediaResult::Success(items),
            Err(e) => {
                warn!("album media listing failed: {e}");
                MediaResult::Error(format!("Failed to fetch media from OneDrive folder: {e}"))
            }
        }
    }

    async fn fetch_item(&self, id: &str) -> Option<MediaItem> {
        if !self.auth.is_authenticated() {
            return None;
        }

        let item_id = cloud_id::decode_for(ProviderKind::OneDrive, id)?;
        let token = self.token().await.ok()?;

        let url = format!(
            "{GRAPH_API_BASE}/me/drive/items/{}?$expand=thumbnails",
            urlencoding::encode(item_id)
        );

        match self.get_with_retry(url, &token).await {
            Ok(response) => {
                let item: DriveItem = match serde_json::from_slice(&response.body) {
                    Ok(item) => item,
                    Err(e) => {
                        warn!(%id, "item parse failed: {e}");
                        return None;
                    }
                };
                Self::convert_item(item, None)
            }
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
                Ok("graph_token".to_string())
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

    fn source(http: MockHttpClient, authed: bool) -> OneDriveSource {
        OneDriveSource::new(Arc::new(http), Arc::new(StubAuth { authed }))
    }

    const SEARCH_PAGE: &str = r#"{
        "value": [
            {
                "id": "img1",
                "name": "beach.jpg",
                "size": 2048,
                "createdDateTime": "2024-01-01T00:00:00Z",
                "lastModifiedDateTime": "2024-01-02T00:00:00Z",
                "file": { "mimeType": "image/jpeg" },
                "image": { "width": 4000, "height": 3000 },
                "thumbnails": [ { "medium": { "url": "https://thumb/img1" } } ],
                "@microsoft.graph.downloadUrl": "https://download/img1",
                "parentReference": { "id": "folder1", "name": "Vacation" }
            },
            {
                "id": "vid1",
                "name": "clip.mp4",
                "size": 409600,
                "file": { "mimeType": "video/mp4" },
                "video": { "width": 1920, "height": 1080, "duration": 42000 }
            },
            {
                "id": "doc1",
                "name": "notes.docx",
                "file": { "mimeType": "application/vnd.openxmlformats-officedocument.wordprocessingml.document" }
            },
            {
                "id": "sub1",
                "name": "Subfolder",
                "folder": { "childCount": 3 }
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_fetch_items_requires_session() {
        let src = source(MockHttpClient::new(), false);

        match src.fetch_items(&MediaFilter::default()).await {
            MediaResult::Error(message) => assert_eq!(message, NOT_AUTHENTICATED),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(!src.has_permission());
    }

    #[tokio::test]
    async fn test_fetch_items_classifies_by_facets() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("/me/drive/root/search"));
            assert!(req.headers.get("Authorization").unwrap().contains("graph_token"));
            Ok(ok_json(SEARCH_PAGE))
        });

        let src = source(http, true);
        match src.fetch_items(&MediaFilter::default()).await {
            MediaResult::Success(items) => {
                // Document and folder are dropped.
                assert_eq!(items.len(), 2);

                let image = items.iter().find(|i| i.is_image()).unwrap();
                assert_eq!(image.id, "onedrive:img1");
                assert_eq!(image.cloud_provider, Some(ProviderKind::OneDrive));
                assert!(!image.is_local);
                assert_eq!(image.uri, "https://thumb/img1");
                assert_eq!(image.album_id, "onedrive:folder1");
                assert_eq!(image.album_name, "Vacation");
                assert_eq!(image.download_url.as_deref(), Some("https://download/img1"));

                let video = items.iter().find(|i| i.is_video()).unwrap();
                assert_eq!(video.duration_ms, Some(42000));
                assert_eq!(video.resolution.as_deref(), Some("1920x1080"));
                assert_eq!(video.uri, VIDEO_PLACEHOLDER);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_items_follows_next_link() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(2).returning(|req| {
            if req.url.contains("page=2") {
                Ok(ok_json(
                    r#"{ "value": [ { "id": "b", "name": "b.jpg", "file": { "mimeType": "image/jpeg" } } ] }"#,
                ))
            } else {
                Ok(ok_json(
                    r#"{
                        "value": [ { "id": "a", "name": "a.jpg", "file": { "mimeType": "image/jpeg" } } ],
                        "@odata.nextLink": "https://graph.microsoft.com/v1.0/me/drive/root/search?page=2"
                    }"#,
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
    async fn test_search_query_quotes_doubled() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|req| {
            let decoded = urlencoding::decode(&req.url).unwrap().into_owned();
            assert!(decoded.contains("search(q='o''brien')"));
            Ok(ok_json(r#"{ "value": [] }"#))
        });

        let src = source(http, true);
        let mut filter = MediaFilter::default();
        filter.search_query = Some("o'brien".to_string());

        assert_eq!(src.fetch_items(&filter).await, MediaResult::Empty);
    }

    #[tokio::test]
    async fn test_fetch_albums_counts_media_children_only() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|req| {
            if req.url.contains("/root/children") {
                Ok(ok_json(
                    r#"{ "value": [
                        { "id": "photos", "name": "Photos", "folder": { "childCount": 3 }, "createdDateTime": "2024-01-01T00:00:00Z" },
                        { "id": "docs", "name": "Documents", "folder": { "childCount": 5 } },
                        { "id": "loose", "name": "loose.jpg", "file": { "mimeType": "image/jpeg" } }
                    ] }"#,
                ))
            } else if req.url.contains("/items/photos/children") {
                Ok(ok_json(
                    r#"{ "value": [
                        { "id": "p1", "name": "p1.jpg", "file": { "mimeType": "image/jpeg" }, "thumbnails": [ { "small": { "url": "https://thumb/p1" } } ] },
                        { "id": "p2", "name": "p2.mp4", "file": { "mimeType": "video/mp4" } },
                        { "id": "p3", "name": "p3.txt", "file": { "mimeType": "text/plain" } }
                    ] }"#,
                ))
            } else {
                // Documents folder: no media children.
                Ok(ok_json(r#"{ "value": [ { "id": "d1", "name": "d1.pdf", "file": { "mimeType": "application/pdf" } } ] }"#))
            }
        });

        let src = source(http, true);
        match src.fetch_albums().await {
            MediaResult::AlbumsSuccess(albums) => {
                assert_eq!(albums.len(), 1);
                assert_eq!(albums[0].id, "onedrive:photos");
                assert_eq!(albums[0].item_count, 2);
                assert_eq!(albums[0].cover_uri, "https://thumb/p1");
            }
            other => panic!("expected albums, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_album_items_validates_namespace() {
        let src = source(MockHttpClient::new(), true);

        match src
            .fetch_album_items("google_drive:folder1", &MediaFilter::default())
            .await
        {
            MediaResult::Error(message) => {
                assert_eq!(message, "Invalid OneDrive album ID: google_drive:folder1");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_item_not_found_is_absence() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 404,
                headers: HashMap::new(),
                body: Bytes::from_static(b"itemNotFound"),
            })
        });

        let src = source(http, true);
        assert!(src.fetch_item("onedrive:gone").await.is_none());
    }

    #[tokio::test]
    async fn test_retry_honors_retry_after_header() {
        let mut http = MockHttpClient::new();
        let mut attempts = 0;
        http.expect_execute().times(2).returning(move |_| {
            attempts += 1;
            if attempts == 1 {
                let mut headers = HashMap::new();
                headers.insert("Retry-After".to_string(), "0".to_string());
                Ok(HttpResponse {
                    status: 429,
                    headers,
                    body: Bytes::new(),
                })
            } else {
                Ok(ok_json(r#"{ "value": [] }"#))
            }
        });

        let src = source(http, true);
        assert_eq!(src.fetch_items(&MediaFilter::default()).await, MediaResult::Empty);
    }
}
