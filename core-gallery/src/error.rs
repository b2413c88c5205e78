use core_catalog::ProviderKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    /// A configured cloud provider has no source implementation. Raised
    /// eagerly at build time: this is a host misconfiguration, not a
    /// runtime condition.
    #[error("No source implementation registered for cloud provider: {0}")]
    UnsupportedProvider(ProviderKind),

    /// A required host bridge was not supplied.
    #[error("Capability missing: {capability} - {message}")]
    MissingCapability { capability: String, message: String },

    #[error("Gallery initialization failed: {0}")]
    InitializationFailed(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
