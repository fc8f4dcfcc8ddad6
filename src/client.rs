//! Service client construction with optional CA trust augmentation.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Certificate, Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientOpts;
use crate::error::{ClientError, ClientResult};
use crate::resolver::{ProfileResolver, resolve_profile};

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Handle bound to one cloud service's API endpoint.
///
/// Produced by a [`ConstructClient`] implementation; carries the endpoint,
/// an optional bearer token, and the HTTP client requests go through.
#[derive(Clone)]
pub struct ServiceClient {
    service: String,
    endpoint: Url,
    token: Option<SecretString>,
    http: Client,
}

impl ServiceClient {
    /// Create a client bound to `endpoint` for the named service.
    #[must_use]
    pub fn new(service: impl Into<String>, endpoint: Url, http: Client) -> Self {
        Self {
            service: service.into(),
            endpoint,
            token: None,
            http,
        }
    }

    /// Attach a bearer token used for subsequent requests.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Service name this client was constructed for.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Endpoint URL this client is bound to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &Client {
        &self.http
    }

    /// Build a request for a path relative to the service endpoint,
    /// attaching the bearer token when present.
    pub fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.endpoint.join(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// Build a GET request for a path relative to the service endpoint.
    pub fn get(&self, path: &str) -> ClientResult<RequestBuilder> {
        self.request(Method::GET, path)
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// Constructs an authenticated [`ServiceClient`].
///
/// Implementations own authentication and service-catalog lookup; they
/// receive the options after trust augmentation, so `opts.http_client`
/// carries the transport to use when it is set.
#[async_trait]
pub trait ConstructClient: Send + Sync {
    /// Construct a client for the named service.
    async fn construct(&self, service: &str, opts: &ClientOpts) -> ClientResult<ServiceClient>;
}

/// Entry point tying profile resolution, trust augmentation, and delegated
/// construction together.
pub struct ServiceClientBuilder<R, C> {
    resolver: R,
    constructor: C,
}

impl<R, C> ServiceClientBuilder<R, C>
where
    R: ProfileResolver,
    C: ConstructClient,
{
    /// Create a builder from its two collaborators.
    pub const fn new(resolver: R, constructor: C) -> Self {
        Self {
            resolver,
            constructor,
        }
    }

    /// Construct an authenticated client for `service`.
    ///
    /// Absent options behave exactly like empty options. When the resolved
    /// profile names a CA bundle, the file is read and, unless the caller
    /// supplied their own `http_client`, a client trusting the default
    /// roots plus the bundle's certificates is installed before
    /// delegation. A caller-supplied client is never replaced. Without a
    /// CA path the call is a pure pass-through.
    #[instrument(skip(self, opts), fields(service = %service))]
    pub async fn new_service_client(
        &self,
        service: &str,
        opts: Option<ClientOpts>,
    ) -> ClientResult<ServiceClient> {
        let mut opts = opts.unwrap_or_default();

        let profile = resolve_profile(&self.resolver, &opts).await?;

        // The bundle is read whenever a path is configured; only the
        // client installation is gated on the caller not supplying one.
        let cert = match profile.cacert_path() {
            Some(path) => load_ca_bundle(path).await?,
            None => Vec::new(),
        };

        if !cert.is_empty() && opts.http_client.is_none() {
            debug!("installing CA-augmented HTTP client");
            opts.http_client = Some(build_ca_client(&cert)?);
        }

        self.constructor.construct(service, &opts).await
    }
}

/// Read a CA bundle from disk, trimming surrounding whitespace.
async fn load_ca_bundle(path: &str) -> ClientResult<Vec<u8>> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::ca_cert_read(path, e))?;
    Ok(raw.trim_ascii().to_vec())
}

/// Build an HTTP client trusting the default roots plus every certificate
/// in `pem`.
fn build_ca_client(pem: &[u8]) -> ClientResult<Client> {
    let mut builder = Client::builder().tls_built_in_root_certs(true);
    for cert in pem_certificates(pem) {
        builder = builder.add_root_certificate(cert);
    }
    builder.build().map_err(ClientError::TrustStore)
}

/// Split `pem` into certificate blocks, dropping any that fail to parse.
///
/// Matches the permissive append semantics of the system trust store:
/// malformed blocks are a silent no-op, never an error.
fn pem_certificates(pem: &[u8]) -> Vec<Certificate> {
    let text = String::from_utf8_lossy(pem);
    let mut certs = Vec::new();
    let mut rest: &str = &text;
    while let Some(start) = rest.find(PEM_BEGIN) {
        let Some(len) = rest[start..].find(PEM_END) else {
            break;
        };
        let end = start + len + PEM_END.len();
        if let Ok(cert) = Certificate::from_pem(rest[start..end].as_bytes()) {
            certs.push(cert);
        }
        rest = &rest[end..];
    }
    certs
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const TEST_CA: &[u8] = include_bytes!("../tests/fixtures/test-ca.pem");

    const GARBAGE_BLOCK: &str = "-----BEGIN CERTIFICATE-----\n\
        this is not base64!!!\n\
        -----END CERTIFICATE-----\n";

    #[test]
    fn test_single_certificate_parses() {
        assert_eq!(pem_certificates(TEST_CA).len(), 1);
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        assert!(pem_certificates(GARBAGE_BLOCK.as_bytes()).is_empty());
    }

    #[test]
    fn test_malformed_block_between_valid_ones() {
        let mut bundle = Vec::new();
        bundle.extend_from_slice(TEST_CA);
        bundle.extend_from_slice(GARBAGE_BLOCK.as_bytes());
        bundle.extend_from_slice(TEST_CA);
        assert_eq!(pem_certificates(&bundle).len(), 2);
    }

    #[test]
    fn test_surrounding_noise_is_ignored() {
        let padded = format!(
            "# comment\n\n{}\n\ntrailing text\n",
            String::from_utf8_lossy(TEST_CA)
        );
        assert_eq!(pem_certificates(padded.as_bytes()).len(), 1);
    }

    #[test]
    fn test_client_builds_even_without_parseable_certs() {
        assert!(build_ca_client(GARBAGE_BLOCK.as_bytes()).is_ok());
    }

    #[test]
    fn test_client_builds_with_fixture_ca() {
        assert!(build_ca_client(TEST_CA).is_ok());
    }

    #[tokio::test]
    async fn test_load_ca_bundle_trims_whitespace() {
        let mut plain = tempfile::NamedTempFile::new().unwrap();
        plain.write_all(TEST_CA).unwrap();

        let mut padded = tempfile::NamedTempFile::new().unwrap();
        padded.write_all(b"\n\n  ").unwrap();
        padded.write_all(TEST_CA).unwrap();
        padded.write_all(b"\n\n").unwrap();

        let a = load_ca_bundle(plain.path().to_str().unwrap()).await.unwrap();
        let b = load_ca_bundle(padded.path().to_str().unwrap()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_load_ca_bundle_missing_file() {
        let err = load_ca_bundle("/nonexistent/ca.pem").await.unwrap_err();
        assert!(matches!(err, ClientError::CaCertRead { .. }));
        assert!(
            err.to_string()
                .contains("failed to read CA certificate from disk")
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = ServiceClient::new(
            "compute",
            Url::parse("https://compute.example.com/v2.1/").unwrap(),
            Client::new(),
        )
        .with_token(SecretString::from("gAAAAABh-secret-token"));

        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("compute"));
    }
}
