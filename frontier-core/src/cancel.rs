//! Cancellation support for suspension points that talk to the CDN API.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{FrontierError, Result};

/// Await `fut` unless `cancel` fires first.
///
/// A token that is already cancelled wins over a ready future, so a
/// cancelled caller never observes a partially completed step.
pub async fn run_until_cancelled<F, T>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FrontierError::Cancelled),
        result = fut => result,
    }
}
