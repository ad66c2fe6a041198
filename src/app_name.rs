//! Application identity used to locate on-disk storage

/// Application identifier used to determine storage location
///
/// Native backends resolve their directories from this through the platform
/// conventions (XDG on Linux, `Application Support` on macOS, `AppData` on
/// Windows).
///
/// # Example
///
/// ```
/// use cstudio_store::AppName;
///
/// let app_name = AppName::new("com", "cstudio", "cosmos-studio");
/// assert_eq!(app_name.application, "cosmos-studio");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppName {
    pub qualifier: String,
    pub organization: String,
    pub application: String,
}

impl AppName {
    /// Create a new application name
    ///
    /// # Arguments
    ///
    /// * `qualifier` - Typically a reverse domain name (e.g., "com", "org")
    /// * `organization` - Your organization or username
    /// * `application` - The application name
    pub fn new(
        qualifier: impl Into<String>,
        organization: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        Self {
            qualifier: qualifier.into(),
            organization: organization.into(),
            application: application.into(),
        }
    }
}

impl Default for AppName {
    fn default() -> Self {
        Self::new("com", "cstudio", "cosmos-studio")
    }
}
