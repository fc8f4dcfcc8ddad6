//! Cloud profile name resolution.
//!
//! The profile name is chosen by a three-tier precedence chain: the
//! `<prefix>CLOUD` environment variable wins over the explicit
//! [`ClientOpts::cloud`] field, which wins over nothing at all. The
//! environment-over-explicit ordering mirrors the original call order and
//! is part of the contract.

use std::env;

use async_trait::async_trait;
use tracing::debug;

use crate::config::ClientOpts;
use crate::error::ClientResult;
use crate::profile::CloudProfile;

/// Loads the settings of a named cloud profile.
///
/// Implementations own the configuration source (conventionally a
/// clouds.yaml-style store) and re-derive the profile name from the options
/// they are handed. Lookup failures are propagated verbatim by this layer.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    /// Load the profile the given options select.
    async fn load_profile(&self, opts: &ClientOpts) -> ClientResult<CloudProfile>;
}

/// Resolver that always returns a fixed profile.
///
/// Useful for embedding and for substituting the configuration backend in
/// tests.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    profile: CloudProfile,
}

impl StaticResolver {
    /// Create a resolver returning `profile` for every lookup.
    #[must_use]
    pub fn new(profile: CloudProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl ProfileResolver for StaticResolver {
    async fn load_profile(&self, _opts: &ClientOpts) -> ClientResult<CloudProfile> {
        Ok(self.profile.clone())
    }
}

/// Precedence kernel: a non-empty environment value overrides a non-empty
/// explicit name. Empty strings count as absent.
#[must_use]
pub fn select_cloud_name(explicit: Option<&str>, env_value: Option<&str>) -> Option<String> {
    let explicit = explicit.filter(|s| !s.is_empty());
    let env_value = env_value.filter(|s| !s.is_empty());
    env_value.or(explicit).map(str::to_owned)
}

/// Resolve which named cloud profile the given options select, if any.
///
/// Consults the `<prefix>CLOUD` environment variable, where the prefix is
/// [`ClientOpts::env_prefix`] or the default.
#[must_use]
pub fn resolve_cloud_name(opts: &ClientOpts) -> Option<String> {
    let env_value = env::var(opts.cloud_env_var()).ok();
    select_cloud_name(opts.cloud.as_deref(), env_value.as_deref())
}

/// Fetch the selected profile's settings.
///
/// When no profile name resolves, returns the empty profile without
/// touching the resolver.
pub async fn resolve_profile<R>(resolver: &R, opts: &ClientOpts) -> ClientResult<CloudProfile>
where
    R: ProfileResolver + ?Sized,
{
    match resolve_cloud_name(opts) {
        Some(name) => {
            debug!(cloud = %name, "loading cloud profile");
            resolver.load_profile(opts).await
        }
        None => {
            debug!("no cloud profile selected, using empty settings");
            Ok(CloudProfile::default())
        }
    }
}
