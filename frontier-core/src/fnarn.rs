//! Function name to ARN resolution

use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cancel::run_until_cancelled;
use crate::cdn::ClientProvider;
use crate::error::{FrontierError, Result};

/// How the user referred to a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionIdentifier {
    Name(String),
    Arn(String),
}

impl fmt::Display for FunctionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionIdentifier::Name(name) => write!(f, "name:{name}"),
            FunctionIdentifier::Arn(arn) => write!(f, "arn:{arn}"),
        }
    }
}

pub struct Resolver {
    client_provider: Arc<dyn ClientProvider>,
}

impl Resolver {
    pub fn new(client_provider: Arc<dyn ClientProvider>) -> Self {
        Self { client_provider }
    }

    /// ARNs pass through; names are looked up via the describe call
    pub async fn resolve_function_arn(
        &self,
        cancel: &CancellationToken,
        identifier: &FunctionIdentifier,
    ) -> Result<String> {
        let name = match identifier {
            FunctionIdentifier::Arn(arn) => return Ok(arn.clone()),
            FunctionIdentifier::Name(name) => name,
        };

        let client = run_until_cancelled(cancel, self.client_provider.provide_client()).await?;
        let description = run_until_cancelled(cancel, client.describe_function(name)).await?;
        let arn = description
            .summary
            .function_metadata
            .and_then(|m| m.function_arn)
            .ok_or_else(|| FrontierError::UnresolvedFunctionArn { name: name.clone() })?;
        debug!("Resolved function {} to {}", name, arn);
        Ok(arn)
    }
}
