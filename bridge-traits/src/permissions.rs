//! Storage Permission Capability
//!
//! Models the host platform's storage/media read permission. The gallery
//! never talks to the platform permission APIs itself; it asks this
//! capability whether it may read the device media index and, if not, asks
//! the host to prompt the user.

use async_trait::async_trait;

/// Storage permission state and prompting.
///
/// Denial is a value, not an error: both methods answer with plain booleans
/// so the core can model "no permission" as a first-class UI state.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::permissions::StoragePermissions;
///
/// async fn ensure_ready(perms: &dyn StoragePermissions) -> bool {
///     perms.has_storage_permission() || perms.request_storage_permission().await
/// }
/// ```
#[async_trait]
pub trait StoragePermissions: Send + Sync {
    /// Whether the app currently holds read access to the device media index.
    fn has_storage_permission(&self) -> bool;

    /// Prompt the user for read access.
    ///
    /// Resolves once the platform prompt completes. Returns whether access
    /// is granted afterwards; a denial is final from the core's point of
    /// view (the host re-triggers the flow after an external grant).
    async fn request_storage_permission(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GrantedPermissions;

    #[async_trait]
    impl StoragePermissions for GrantedPermissions {
        fn has_storage_permission(&self) -> bool {
            true
        }

        async fn request_storage_permission(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_granted_stub() {
        let perms = GrantedPermissions;
        assert!(perms.has_storage_permission());
        assert!(perms.request_storage_permission().await);
    }
}
