//! Function association records produced by distribution listing
//!
//! Field names serialize in the shape the CDN API uses for the same
//! concepts so that JSON output can be fed back into other tooling.

use serde::{Deserialize, Serialize};

/// A function attached to one cache behavior of one distribution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionAssociation {
    #[serde(rename = "Distribution")]
    pub distribution: AssociatedDistribution,

    #[serde(rename = "CacheBehavior")]
    pub cache_behavior: CacheBehavior,

    /// When the function runs (e.g. "viewer-request")
    #[serde(rename = "EventType")]
    pub event_type: String,

    #[serde(rename = "Function")]
    pub function: AssociatedFunction,
}

/// Snapshot of the owning distribution at listing time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedDistribution {
    #[serde(rename = "DomainName")]
    pub domain_name: String,

    #[serde(rename = "ARN")]
    pub arn: String,

    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "IsEnabled")]
    pub is_enabled: bool,

    #[serde(rename = "IsStaging")]
    pub is_staging: bool,

    #[serde(rename = "Status")]
    pub status: String,
}

/// Identifies which behavior within the distribution carries the association
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheBehavior {
    #[serde(rename = "CachePolicyID")]
    pub cache_policy_id: String,

    #[serde(rename = "TargetOriginID")]
    pub target_origin_id: String,

    #[serde(rename = "IsDefault")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedFunction {
    #[serde(rename = "ARN")]
    pub arn: String,
}
