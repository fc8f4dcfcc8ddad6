//! Client construction options.

use reqwest::Client;

/// Default prefix for the cloud-selection environment variable.
///
/// The variable consulted is `<prefix>CLOUD`, so with the default prefix a
/// profile named in `OS_CLOUD` is picked up. Override per call via
/// [`ClientOpts::env_prefix`].
pub const DEFAULT_ENV_PREFIX: &str = "OS_";

/// Caller-supplied options for service client construction.
///
/// All fields are optional. The builder fills `http_client` in when a CA
/// bundle is configured and the caller did not bring their own client; a
/// caller-supplied client is never replaced.
#[derive(Debug, Clone, Default)]
pub struct ClientOpts {
    /// Explicit cloud profile name. A non-empty `<prefix>CLOUD`
    /// environment variable overrides this field.
    pub cloud: Option<String>,
    /// Environment-variable prefix override. Empty or unset means
    /// [`DEFAULT_ENV_PREFIX`].
    pub env_prefix: Option<String>,
    /// Pre-built HTTP client to hand to the constructor.
    pub http_client: Option<Client>,
}

impl ClientOpts {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the explicit cloud profile name.
    #[must_use]
    pub fn with_cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = Some(cloud.into());
        self
    }

    /// Override the environment-variable prefix.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Supply a pre-built HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Effective environment-variable prefix.
    #[must_use]
    pub fn env_prefix(&self) -> &str {
        match self.env_prefix.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_ENV_PREFIX,
        }
    }

    /// Name of the environment variable that selects the cloud profile.
    #[must_use]
    pub fn cloud_env_var(&self) -> String {
        format!("{}CLOUD", self.env_prefix())
    }
}
