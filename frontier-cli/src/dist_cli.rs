//! Distribution commands

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Subcommand};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use frontier_core::association::FunctionAssociation;
use frontier_core::cdn::ClientProvider;
use frontier_core::fnarn::{FunctionIdentifier, Resolver};
use frontier_core::function::Function;
use frontier_core::listdist::{Criteria, Criterion, DistributionLister};
use frontier_core::presenter::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum DistCommand {
    /// List function associations across distributions
    List(ListArgs),
}

#[derive(Args, Debug)]
#[clap(group(ArgGroup::new("function").args(["function_arn", "function_name", "current"])))]
pub struct ListArgs {
    /// Config file path, used by --current
    #[clap(long, default_value = "function.yml")]
    pub config: PathBuf,

    /// Output format (available values: json, json.pretty)
    #[clap(long, default_value = "json")]
    pub format: OutputFormat,

    /// List only associations that run functions against the given event type
    #[clap(long)]
    pub event_type: Option<String>,

    /// List associations of the function with this ARN
    #[clap(long)]
    pub function_arn: Option<String>,

    /// List associations of the function with this name
    #[clap(long)]
    pub function_name: Option<String>,

    /// List associations of the function defined in the config file
    #[clap(long)]
    pub current: bool,
}

impl ListArgs {
    /// The function selector given on the command line, if any
    fn function(&self) -> Result<Option<FunctionIdentifier>> {
        if let Some(arn) = &self.function_arn {
            return Ok(Some(FunctionIdentifier::Arn(arn.clone())));
        }
        if let Some(name) = &self.function_name {
            return Ok(Some(FunctionIdentifier::Name(name.clone())));
        }
        if self.current {
            let function = Function::from_path(&self.config)
                .with_context(|| format!("Failed to read {}", self.config.display()))?;
            return Ok(Some(FunctionIdentifier::Name(function.name)));
        }
        Ok(None)
    }

    /// Translate the flags into listing criteria
    ///
    /// A function selector is resolved to its ARN here; resolution errors
    /// abort before anything is listed.
    pub async fn criteria(
        &self,
        cancel: &CancellationToken,
        provider: &Arc<dyn ClientProvider>,
    ) -> Result<Criteria> {
        let criteria = Criteria::default();
        // `--event-type ""` means no event type filter, not "match the empty type"
        if let Some(event_type) = self.event_type.clone().filter(|s| !s.is_empty()) {
            criteria.add(Criterion::EqualEventType(event_type));
        }
        if let Some(function) = self.function()? {
            let arn = Resolver::new(Arc::clone(provider))
                .resolve_function_arn(cancel, &function)
                .await
                .with_context(|| format!("Failed to resolve function {function}"))?;
            criteria.add(Criterion::EqualFunctionArn(arn));
        }
        Ok(criteria)
    }

    /// Every association matching the flags
    pub async fn associations(
        &self,
        cancel: &CancellationToken,
        provider: Arc<dyn ClientProvider>,
    ) -> Result<Vec<FunctionAssociation>> {
        let criteria = self.criteria(cancel, &provider).await?;
        debug!("Listing with {} criteria", criteria.len());

        DistributionLister::new(provider)
            .list_distributions(cancel, &criteria)
            .await
            .context("Failed to list distributions")
    }
}

impl DistCommand {
    pub async fn execute(
        self,
        cancel: &CancellationToken,
        provider: Arc<dyn ClientProvider>,
    ) -> Result<()> {
        match self {
            DistCommand::List(args) => list(cancel, provider, args).await,
        }
    }
}

async fn list(
    cancel: &CancellationToken,
    provider: Arc<dyn ClientProvider>,
    args: ListArgs,
) -> Result<()> {
    let associations = args.associations(cancel, provider).await?;

    // Command output goes to stdout; logs stay on stderr
    args.format
        .presenter(io::stdout().lock())
        .present_associated_distributions(&associations)
        .context("Failed to write output")
}
