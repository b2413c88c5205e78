use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported cloud media providers.
///
/// The set is fixed and enumerable so provider tags can be told apart from
/// the local `"image"`/`"video"` id prefixes without a registry lookup.
/// Ordering follows declaration order and fixes the aggregator's source
/// iteration order.
///
/// # Examples
///
/// ```
/// use core_catalog::ProviderKind;
///
/// let provider = ProviderKind::GoogleDrive;
/// assert_eq!(provider.display_name(), "Google Drive");
/// assert_eq!(provider.tag(), "google_drive");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ProviderKind {
    /// Google Drive
    GoogleDrive,
    /// Microsoft OneDrive
    OneDrive,
    /// Host-supplied provider with its own source implementation
    Custom,
}

impl ProviderKind {
    /// Human-readable display name, used to disambiguate merged cloud
    /// albums ("Vacation (Google Drive)").
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::GoogleDrive => "Google Drive",
            ProviderKind::OneDrive => "OneDrive",
            ProviderKind::Custom => "Custom",
        }
    }

    /// Canonical lowercase tag used as the id namespace prefix.
    ///
    /// Tags are disjoint from the local `"image"`/`"video"` prefixes.
    pub fn tag(&self) -> &'static str {
        match self {
            ProviderKind::GoogleDrive => "google_drive",
            ProviderKind::OneDrive => "onedrive",
            ProviderKind::Custom => "custom",
        }
    }

    /// Parse a provider tag, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_catalog::ProviderKind;
    ///
    /// assert_eq!(ProviderKind::parse("google_drive"), Some(ProviderKind::GoogleDrive));
    /// assert_eq!(ProviderKind::parse("ONEDRIVE"), Some(ProviderKind::OneDrive));
    /// assert_eq!(ProviderKind::parse("image"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "google_drive" | "googledrive" => Some(ProviderKind::GoogleDrive),
            "onedrive" | "one_drive" => Some(ProviderKind::OneDrive),
            "custom" => Some(ProviderKind::Custom),
            _ => None,
        }
    }

    /// All providers, in iteration order.
    pub fn all() -> [ProviderKind; 3] {
        [
            ProviderKind::GoogleDrive,
            ProviderKind::OneDrive,
            ProviderKind::Custom,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_lowercase_and_stable() {
        for kind in ProviderKind::all() {
            let tag = kind.tag();
            assert_eq!(tag, tag.to_ascii_lowercase());
            assert_eq!(ProviderKind::parse(tag), Some(kind));
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(
            ProviderKind::parse("Google_Drive"),
            Some(ProviderKind::GoogleDrive)
        );
        assert_eq!(ProviderKind::parse("OneDrive"), Some(ProviderKind::OneDrive));
    }

    #[test]
    fn test_tags_disjoint_from_local_prefixes() {
        assert_eq!(ProviderKind::parse("image"), None);
        assert_eq!(ProviderKind::parse("video"), None);
    }

    #[test]
    fn test_ordering_fixes_iteration_order() {
        assert!(ProviderKind::GoogleDrive < ProviderKind::OneDrive);
        assert!(ProviderKind::OneDrive < ProviderKind::Custom);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ProviderKind::GoogleDrive), "Google Drive");
        assert_eq!(format!("{}", ProviderKind::OneDrive), "OneDrive");
    }
}
