//! Authenticated service client construction for named cloud profiles.
//!
//! Resolves which named cloud profile to use (explicit option field, then
//! the `<prefix>CLOUD` environment variable), loads the profile's settings
//! through a [`ProfileResolver`], optionally augments the HTTP transport
//! with a CA bundle taken from the profile, and hands the actual
//! authenticated-client construction off to a [`ConstructClient`]
//! implementation.
//!
//! The authentication flow, credential formats, and service catalog are the
//! collaborators' concern. This crate owns only profile selection, trust
//! augmentation, and delegation.

pub mod client;
pub mod config;
pub mod error;
pub mod profile;
pub mod resolver;

pub use client::{ConstructClient, ServiceClient, ServiceClientBuilder};
pub use config::{ClientOpts, DEFAULT_ENV_PREFIX};
pub use error::{ClientError, ClientResult};
pub use profile::CloudProfile;
pub use resolver::{ProfileResolver, StaticResolver, resolve_cloud_name, select_cloud_name};
