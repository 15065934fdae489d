//! Flattening of a distribution's cache behaviors into association records

use crate::association::{
    AssociatedDistribution, AssociatedFunction, CacheBehavior, FunctionAssociation,
};
use crate::cdn::{DistributionSummary, FunctionAssociationEntry, FunctionAssociations};

/// Every function association of `dist`, default behavior first
///
/// Custom behaviors follow in the order the API returned them. Missing
/// optional fields become empty strings / `false`.
pub fn associations(dist: &DistributionSummary) -> impl Iterator<Item = FunctionAssociation> + '_ {
    // One snapshot per distribution, cloned into each record
    let snapshot = snapshot(dist);

    let default = dist.default_cache_behavior.iter().flat_map({
        let snapshot = snapshot.clone();
        move |cb| {
            let behavior = CacheBehavior {
                is_default: true,
                cache_policy_id: cb.cache_policy_id.clone().unwrap_or_default(),
                target_origin_id: cb.target_origin_id.clone().unwrap_or_default(),
            };
            expand(&snapshot, behavior, cb.function_associations.as_ref())
        }
    });

    let custom = dist
        .cache_behaviors
        .iter()
        .flat_map(|cbs| cbs.items.iter())
        .flat_map(move |cb| {
            let behavior = CacheBehavior {
                is_default: false,
                cache_policy_id: cb.cache_policy_id.clone().unwrap_or_default(),
                target_origin_id: cb.target_origin_id.clone().unwrap_or_default(),
            };
            expand(&snapshot, behavior, cb.function_associations.as_ref())
        });

    // Default behavior always comes first
    default.chain(custom)
}

fn snapshot(dist: &DistributionSummary) -> AssociatedDistribution {
    AssociatedDistribution {
        arn: dist.arn.clone().unwrap_or_default(),
        domain_name: dist.domain_name.clone().unwrap_or_default(),
        id: dist.id.clone().unwrap_or_default(),
        is_enabled: dist.enabled.unwrap_or_default(),
        is_staging: dist.staging.unwrap_or_default(),
        status: dist.status.clone().unwrap_or_default(),
    }
}

/// One record per entry of a single behavior
fn expand<'a>(
    distribution: &AssociatedDistribution,
    behavior: CacheBehavior,
    entries: Option<&'a FunctionAssociations>,
) -> impl Iterator<Item = FunctionAssociation> + 'a {
    let distribution = distribution.clone();
    entries
        .into_iter()
        .flat_map(|fa| fa.items.iter())
        .map(move |entry: &FunctionAssociationEntry| FunctionAssociation {
            event_type: entry.event_type.clone(),
            distribution: distribution.clone(),
            cache_behavior: behavior.clone(),
            function: AssociatedFunction {
                arn: entry.function_arn.clone(),
            },
        })
}
