//! Error types for service client construction.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving a cloud profile and constructing a
/// service client.
///
/// All failures are terminal; nothing in this layer retries. The only
/// intentionally ignored failure is a malformed PEM block in a CA bundle,
/// which is skipped rather than surfaced.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The configured cloud profile could not be resolved.
    #[error("cloud profile lookup failed: {0}")]
    ProfileLookup(String),

    /// The CA bundle named by the profile could not be read.
    #[error("failed to read CA certificate from disk: {}", path.display())]
    CaCertRead {
        /// Path the profile pointed at.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The TLS-aware HTTP client could not be built.
    #[error("failed to create system certificate pool: {0}")]
    TrustStore(#[source] reqwest::Error),

    /// The delegated service client constructor failed.
    #[error("service client construction failed: {0}")]
    Construction(String),

    /// HTTP error from a collaborator implementation.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request path could not be joined onto the service endpoint.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Result type for service client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Create a profile lookup error.
    #[must_use]
    pub fn profile_lookup(msg: impl Into<String>) -> Self {
        Self::ProfileLookup(msg.into())
    }

    /// Create a construction error.
    #[must_use]
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub(crate) fn ca_cert_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::CaCertRead {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::profile_lookup("no such cloud: devstack");
        assert_eq!(
            err.to_string(),
            "cloud profile lookup failed: no such cloud: devstack"
        );
    }

    #[test]
    fn test_ca_cert_read_names_path() {
        let err = ClientError::ca_cert_read(
            "/etc/ssl/missing.pem",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(
            err.to_string(),
            "failed to read CA certificate from disk: /etc/ssl/missing.pem"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
