//! Resolved cloud profile settings.

use serde::Deserialize;

/// Settings for one named cloud profile.
///
/// Populated by a [`ProfileResolver`](crate::resolver::ProfileResolver),
/// conventionally from a clouds.yaml-style document. The default value is
/// the empty profile used when no profile name resolves.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CloudProfile {
    /// Identity endpoint URL for the cloud.
    pub auth_url: Option<String>,
    /// Region to select service endpoints from.
    pub region_name: Option<String>,
    /// Path to a PEM CA bundle establishing a custom trust root for TLS.
    pub cacert: Option<String>,
}

impl CloudProfile {
    /// CA bundle path, treating an empty string as unset.
    #[must_use]
    pub fn cacert_path(&self) -> Option<&str> {
        self.cacert.as_deref().filter(|p| !p.is_empty())
    }
}
