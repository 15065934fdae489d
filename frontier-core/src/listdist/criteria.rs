//! Filter criteria over function associations
//!
//! Each [`Criterion`] occupies one [`CriterionKey`] slot. Adding a criterion
//! whose key is already taken replaces the previous one, so an exact domain
//! name and a domain name pattern cannot both be active.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::association::FunctionAssociation;

/// The association field a criterion constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionKey {
    DistributionDomainName,
    DistributionIsEnabled,
    EventType,
    FunctionArn,
}

impl CriterionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionKey::DistributionDomainName => ".Distribution.DomainName",
            CriterionKey::DistributionIsEnabled => ".Distribution.IsEnabled",
            CriterionKey::EventType => ".EventType",
            CriterionKey::FunctionArn => ".Function.ARN",
        }
    }
}

impl fmt::Display for CriterionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single predicate over an association
#[derive(Debug, Clone)]
pub enum Criterion {
    EqualEventType(String),
    EqualDistributionIsEnabled(bool),
    EqualFunctionArn(String),
    EqualDistributionDomainName(String),
    MatchDistributionDomainName(Regex),
}

impl Criterion {
    pub fn key(&self) -> CriterionKey {
        match self {
            Criterion::EqualEventType(_) => CriterionKey::EventType,
            Criterion::EqualDistributionIsEnabled(_) => CriterionKey::DistributionIsEnabled,
            Criterion::EqualFunctionArn(_) => CriterionKey::FunctionArn,
            Criterion::EqualDistributionDomainName(_)
            | Criterion::MatchDistributionDomainName(_) => CriterionKey::DistributionDomainName,
        }
    }

    pub fn satisfy(&self, association: &FunctionAssociation) -> bool {
        match self {
            Criterion::EqualEventType(event_type) => association.event_type == *event_type,
            Criterion::EqualDistributionIsEnabled(enabled) => {
                association.distribution.is_enabled == *enabled
            }
            Criterion::EqualFunctionArn(arn) => association.function.arn == *arn,
            Criterion::EqualDistributionDomainName(domain_name) => {
                association.distribution.domain_name == *domain_name
            }
            Criterion::MatchDistributionDomainName(pattern) => {
                pattern.is_match(&association.distribution.domain_name)
            }
        }
    }
}

/// Conjunction of at most one [`Criterion`] per key
///
/// `add` takes `&self`; the map is guarded by a mutex so flags may be
/// translated into criteria from another thread than the one listing.
#[derive(Debug, Default)]
pub struct Criteria {
    criteria: Mutex<HashMap<CriterionKey, Criterion>>,
}

impl Criteria {
    pub fn new(initial: impl IntoIterator<Item = Criterion>) -> Self {
        let criteria = Self::default();
        for criterion in initial {
            criteria.add(criterion);
        }
        criteria
    }

    /// Insert `criterion`, replacing whatever occupied its key
    pub fn add(&self, criterion: Criterion) {
        self.lock().insert(criterion.key(), criterion);
    }

    /// True when every retained criterion accepts `association`
    pub fn satisfy(&self, association: &FunctionAssociation) -> bool {
        self.lock().values().all(|c| c.satisfy(association))
    }

    /// Lazily keep only the associations that satisfy these criteria
    pub fn filtered<'a, I>(&'a self, associations: I) -> impl Iterator<Item = FunctionAssociation> + 'a
    where
        I: IntoIterator<Item = FunctionAssociation>,
        I::IntoIter: 'a,
    {
        associations.into_iter().filter(move |a| self.satisfy(a))
    }

    pub fn get(&self, key: CriterionKey) -> Option<Criterion> {
        self.lock().get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<CriterionKey, Criterion>> {
        self.criteria
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
