//! Create-or-update deployment of a local function config

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cancel::run_until_cancelled;
use crate::cdn::ClientProvider;
use crate::error::{FrontierError, Result};
use crate::function::Function;

pub struct Deployer {
    client_provider: Arc<dyn ClientProvider>,
}

impl Deployer {
    pub fn new(client_provider: Arc<dyn ClientProvider>) -> Self {
        Self { client_provider }
    }

    /// Push the function described at `config_path`
    ///
    /// An existing function is updated against its current ETag; a missing
    /// one is created. With `publish`, the resulting version is published
    /// when the API returned an ETag for it.
    pub async fn deploy(
        &self,
        cancel: &CancellationToken,
        config_path: &Path,
        publish: bool,
    ) -> Result<()> {
        let function = Function::from_path(config_path)?;
        let client = run_until_cancelled(cancel, self.client_provider.provide_client()).await?;

        // Lookup first; the code file is only read for the create/update call.
        let etag = match run_until_cancelled(cancel, client.get_function(&function.name)).await {
            Ok(existing) => {
                debug!(
                    "Function {} exists (etag: {:?}), updating",
                    function.name, existing.etag
                );
                let input = function.to_write_input()?;
                let out = run_until_cancelled(
                    cancel,
                    client.update_function(&input, existing.etag.as_deref()),
                )
                .await?;
                info!("Updated function {}", function.name);
                out.etag
            }
            Err(FrontierError::NoSuchFunction { .. }) => {
                debug!("Function {} does not exist, creating", function.name);
                let input = function.to_write_input()?;
                let out = run_until_cancelled(cancel, client.create_function(&input)).await?;
                info!("Created function {}", function.name);
                out.etag
            }
            Err(e) => return Err(e),
        };

        if !publish {
            return Ok(());
        }
        match etag {
            Some(etag) => {
                run_until_cancelled(cancel, client.publish_function(&function.name, &etag))
                    .await?;
                info!("Published function {}", function.name);
            }
            None => debug!(
                "No ETag returned for {}, skipping publish",
                function.name
            ),
        }
        Ok(())
    }
}
