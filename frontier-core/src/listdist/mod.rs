//! Distribution listing with function association filtering
//!
//! ```text
//! pages ─→ distributions ─→ flatten::associations ─→ Criteria::filtered ─→ Vec
//! ```
//!
//! Listing is all-or-nothing: the first failing step aborts and its error
//! is returned as is, with no partial results.

pub mod criteria;
pub mod flatten;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::association::FunctionAssociation;
use crate::cancel::run_until_cancelled;
use crate::cdn::{CdnClient, ClientProvider, DistributionPage};
use crate::error::Result;

pub use criteria::{Criteria, Criterion, CriterionKey};

/// Lists distributions and the functions associated with them
pub struct DistributionLister {
    client_provider: Arc<dyn ClientProvider>,
}

impl DistributionLister {
    pub fn new(client_provider: Arc<dyn ClientProvider>) -> Self {
        Self { client_provider }
    }

    /// Collect every association satisfying `criteria`, in API order
    pub async fn list_distributions(
        &self,
        cancel: &CancellationToken,
        criteria: &Criteria,
    ) -> Result<Vec<FunctionAssociation>> {
        // Provider errors are returned as is; callers match on them
        let client = run_until_cancelled(cancel, self.client_provider.provide_client()).await?;

        let mut associations = Vec::new();
        let mut paginator = DistributionPaginator::new(client.as_ref());
        while paginator.has_more_pages() {
            // Any failed page drops everything collected so far
            let page = run_until_cancelled(cancel, paginator.next_page()).await?;
            trace!("Fetched page with {} distributions", page.items.len());
            for dist in &page.items {
                associations.extend(criteria.filtered(flatten::associations(dist)));
            }
        }

        debug!(
            "Listed {} matching associations over {} pages",
            associations.len(),
            paginator.pages_fetched()
        );
        Ok(associations)
    }
}

/// Marker-driven pagination over the distribution listing
///
/// The first call fetches without a marker; each later call passes the
/// marker returned by the previous page. Pagination ends when the API
/// returns no (or an empty) marker, or returns the marker it was just given.
pub struct DistributionPaginator<'a> {
    client: &'a dyn CdnClient,
    next_marker: Option<String>,
    first_page: bool,
    pages_fetched: usize,
}

impl<'a> DistributionPaginator<'a> {
    pub fn new(client: &'a dyn CdnClient) -> Self {
        Self {
            client,
            next_marker: None,
            first_page: true,
            pages_fetched: 0,
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.first_page || self.next_marker.is_some()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page
    ///
    /// On error the paginator state is left untouched.
    pub async fn next_page(&mut self) -> Result<DistributionPage> {
        let requested = self.next_marker.take();
        let page = match self
            .client
            .list_distributions_page(requested.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                // Restore so a retry asks for the same page
                self.next_marker = requested;
                return Err(e);
            }
        };

        self.first_page = false;
        self.pages_fetched += 1;
        // An empty marker is the end of the listing, same as no marker.
        let next = page.next_marker.clone().filter(|m| !m.is_empty());
        self.next_marker = match (&requested, next) {
            (Some(prev), Some(next)) if *prev == next => {
                warn!("Listing returned duplicate marker {}, stopping pagination", next);
                None
            }
            (_, next) => next,
        };
        Ok(page)
    }
}
