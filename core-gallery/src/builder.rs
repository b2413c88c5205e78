//! Gallery construction: wiring host bridges into a controller.
//!
//! The builder assembles the device source and one cloud source per
//! configured provider, mounts them in a composite, and hands the result
//! to a [`GalleryController`]. Misconfiguration - a provider with no
//! implementation, a missing bridge - fails `build()` eagerly instead of
//! surfacing later as a runtime error result.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

use bridge_traits::auth::CloudAuthenticator;
use bridge_traits::http::HttpClient;
use bridge_traits::media_store::MediaStoreAccess;
use bridge_traits::permissions::StoragePermissions;
use core_catalog::ProviderKind;
use core_sources::{CompositeMediaSource, DeviceMediaSource, MediaSource};
use provider_google_drive::GoogleDriveSource;
use provider_onedrive::OneDriveSource;

use crate::config::{GalleryCallbacks, GalleryConfig};
use crate::controller::GalleryController;
use crate::error::{GalleryError, Result};

/// Builder for a wired [`GalleryController`].
pub struct GalleryBuilder {
    config: GalleryConfig,
    callbacks: GalleryCallbacks,
    permissions: Option<Arc<dyn StoragePermissions>>,
    media_store: Option<Arc<dyn MediaStoreAccess>>,
    http: Option<Arc<dyn HttpClient>>,
    authenticators: HashMap<ProviderKind, Arc<dyn CloudAuthenticator>>,
    source_overrides: BTreeMap<ProviderKind, Arc<dyn MediaSource>>,
}

impl GalleryBuilder {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            callbacks: GalleryCallbacks::new(),
            permissions: None,
            media_store: None,
            http: None,
            authenticators: HashMap::new(),
            source_overrides: BTreeMap::new(),
        }
    }

    pub fn callbacks(mut self, callbacks: GalleryCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Storage permission bridge (required).
    pub fn permissions(mut self, permissions: Arc<dyn StoragePermissions>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Device media index bridge (required).
    pub fn media_store(mut self, media_store: Arc<dyn MediaStoreAccess>) -> Self {
        self.media_store = Some(media_store);
        self
    }

    /// HTTP client bridge (required when cloud providers are configured).
    pub fn http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Authenticator for one provider (required per configured provider).
    pub fn authenticator(
        mut self,
        provider: ProviderKind,
        authenticator: Arc<dyn CloudAuthenticator>,
    ) -> Self {
        self.authenticators.insert(provider, authenticator);
        self
    }

    /// Mount a host-supplied source for a provider instead of the bundled
    /// implementation. This is how `ProviderKind::Custom` gets an
    /// implementation at all.
    pub fn source_override(
        mut self,
        provider: ProviderKind,
        source: Arc<dyn MediaSource>,
    ) -> Self {
        self.source_overrides.insert(provider, source);
        self
    }

    fn require_http(&self, provider: ProviderKind) -> Result<Arc<dyn HttpClient>> {
        self.http
            .clone()
            .ok_or_else(|| GalleryError::MissingCapability {
                capability: "HttpClient".to_string(),
                message: format!("{provider} is configured but no HTTP client was provided"),
            })
    }

    fn require_authenticator(
        &self,
        provider: ProviderKind,
    ) -> Result<Arc<dyn CloudAuthenticator>> {
        self.authenticators
            .get(&provider)
            .cloned()
            .ok_or_else(|| GalleryError::MissingCapability {
                capability: "CloudAuthenticator".to_string(),
                message: format!("{provider} is configured but no authenticator was provided"),
            })
    }

    /// Assemble the controller.
    ///
    /// # Errors
    ///
    /// - [`GalleryError::MissingCapability`] when a required bridge is
    ///   absent
    /// - [`GalleryError::UnsupportedProvider`] when a configured provider
    ///   has neither a bundled implementation nor a source override
    pub fn build(self) -> Result<GalleryController> {
        let permissions = self
            .permissions
            .clone()
            .ok_or_else(|| GalleryError::MissingCapability {
                capability: "StoragePermissions".to_string(),
                message: "a storage permission bridge is required".to_string(),
            })?;
        let media_store = self
            .media_store
            .clone()
            .ok_or_else(|| GalleryError::MissingCapability {
                capability: "MediaStoreAccess".to_string(),
                message: "a device media index bridge is required".to_string(),
            })?;

        let device: Arc<dyn MediaSource> =
            Arc::new(DeviceMediaSource::new(media_store, permissions));

        let mut cloud: BTreeMap<ProviderKind, Arc<dyn MediaSource>> = BTreeMap::new();
        if self.config.enable_cloud_integration {
            for provider in self.config.cloud_providers.clone() {
                if cloud.contains_key(&provider) {
                    continue;
                }

                let source: Arc<dyn MediaSource> =
                    if let Some(source) = self.source_overrides.get(&provider) {
                        Arc::clone(source)
                    } else {
                        match provider {
                            ProviderKind::GoogleDrive => Arc::new(GoogleDriveSource::new(
                                self.require_http(provider)?,
                                self.require_authenticator(provider)?,
                            )),
                            ProviderKind::OneDrive => Arc::new(OneDriveSource::new(
                                self.require_http(provider)?,
                                self.require_authenticator(provider)?,
                            )),
                            ProviderKind::Custom => {
                                return Err(GalleryError::UnsupportedProvider(provider))
                            }
                        }
                    };
                cloud.insert(provider, source);
            }
        }

        info!(
            cloud_sources = cloud.len(),
            group_by_album = self.config.group_by_album,
            "gallery assembled"
        );

        let composite = Arc::new(CompositeMediaSource::new(device, cloud));
        Ok(GalleryController::new(
            composite,
            self.config,
            self.callbacks,
        ))
    }
}
