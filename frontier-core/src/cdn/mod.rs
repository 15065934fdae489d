//! CDN management API seam
//!
//! The rest of the crate talks to the CDN through two traits:
//! - [`CdnClient`] - the remote operations (listing, function management)
//! - [`ClientProvider`] - acquires a client, resolving config on demand
//!
//! [`http::HttpClientProvider`] is the production implementation; tests
//! inject an in-memory client through [`StaticProvider`].

pub mod config;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

pub use config::ApiConfig;
pub use http::{HttpCdnClient, HttpClientProvider};

/// Remote CDN operations used by frontier
#[async_trait]
pub trait CdnClient: Send + Sync {
    /// Fetch one page of distribution summaries starting at `marker`
    async fn list_distributions_page(&self, marker: Option<&str>) -> Result<DistributionPage>;

    /// Fetch the code of a function together with its current ETag
    async fn get_function(&self, name: &str) -> Result<FunctionCode>;

    /// Fetch the summary (config and metadata) of a function
    async fn describe_function(&self, name: &str) -> Result<FunctionDescription>;

    async fn create_function(&self, input: &FunctionWriteInput) -> Result<FunctionWriteOutput>;

    /// Replace code and config of an existing function guarded by `if_match`
    async fn update_function(
        &self,
        input: &FunctionWriteInput,
        if_match: Option<&str>,
    ) -> Result<FunctionWriteOutput>;

    async fn publish_function(&self, name: &str, if_match: &str) -> Result<()>;
}

/// Acquires a [`CdnClient`]
///
/// Acquisition may fail (e.g. unreadable config); callers propagate that
/// error unchanged.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    async fn provide_client(&self) -> Result<Arc<dyn CdnClient>>;
}

/// Provider that always hands out the same client
pub struct StaticProvider {
    client: Arc<dyn CdnClient>,
}

impl StaticProvider {
    pub fn new(client: Arc<dyn CdnClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClientProvider for StaticProvider {
    async fn provide_client(&self) -> Result<Arc<dyn CdnClient>> {
        Ok(Arc::clone(&self.client))
    }
}

/// One page of the distribution listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionPage {
    pub items: Vec<DistributionSummary>,
    /// Marker for the following page; `None` on the last page
    pub next_marker: Option<String>,
}

/// Distribution as returned by the listing endpoint
///
/// Every field is optional on the wire; consumers default missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionSummary {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "ARN", default)]
    pub arn: Option<String>,

    #[serde(default)]
    pub domain_name: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub staging: Option<bool>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub default_cache_behavior: Option<DefaultCacheBehavior>,

    #[serde(default)]
    pub cache_behaviors: Option<CacheBehaviors>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultCacheBehavior {
    #[serde(default)]
    pub target_origin_id: Option<String>,

    #[serde(default)]
    pub cache_policy_id: Option<String>,

    #[serde(default)]
    pub function_associations: Option<FunctionAssociations>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CacheBehaviors {
    #[serde(default)]
    pub items: Vec<CustomCacheBehavior>,
}

/// A non-default cache behavior, selected by path pattern
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomCacheBehavior {
    #[serde(default)]
    pub path_pattern: Option<String>,

    #[serde(default)]
    pub target_origin_id: Option<String>,

    #[serde(default)]
    pub cache_policy_id: Option<String>,

    #[serde(default)]
    pub function_associations: Option<FunctionAssociations>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionAssociations {
    #[serde(default)]
    pub items: Vec<FunctionAssociationEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionAssociationEntry {
    #[serde(rename = "FunctionARN")]
    pub function_arn: String,

    #[serde(rename = "EventType")]
    pub event_type: String,
}

/// JavaScript runtime a function is built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionRuntime {
    #[serde(rename = "cloudfront-js-1.0")]
    #[default]
    CloudfrontJs10,
    #[serde(rename = "cloudfront-js-2.0")]
    CloudfrontJs20,
}

impl FunctionRuntime {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionRuntime::CloudfrontJs10 => "cloudfront-js-1.0",
            FunctionRuntime::CloudfrontJs20 => "cloudfront-js-2.0",
        }
    }
}

impl std::fmt::Display for FunctionRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Function settings as the API stores them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteFunctionConfig {
    #[serde(default)]
    pub comment: Option<String>,

    pub runtime: FunctionRuntime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionMetadata {
    #[serde(rename = "FunctionARN", default)]
    pub function_arn: Option<String>,

    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionSummary {
    pub name: String,

    #[serde(default)]
    pub status: Option<String>,

    pub function_config: RemoteFunctionConfig,

    #[serde(default)]
    pub function_metadata: Option<FunctionMetadata>,
}

/// Code of a function plus the ETag of the version it was read from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionCode {
    pub code: Vec<u8>,
    pub etag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDescription {
    pub summary: FunctionSummary,
    pub etag: Option<String>,
}

/// Payload of create and update calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionWriteInput {
    pub name: String,
    pub code: Vec<u8>,
    pub config: RemoteFunctionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionWriteOutput {
    pub etag: Option<String>,
}
