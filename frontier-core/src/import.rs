//! Read-back of a remote function into local files

use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cancel::run_until_cancelled;
use crate::cdn::ClientProvider;
use crate::error::{FrontierError, Result};
use crate::function::{Function, FunctionCodeRef, FunctionConfig};

/// Destination for the function body, with the path recorded in the config
pub struct WritableFile<W> {
    pub writer: W,
    pub path: String,
}

pub struct Importer {
    client_provider: Arc<dyn ClientProvider>,
}

impl Importer {
    pub fn new(client_provider: Arc<dyn ClientProvider>) -> Self {
        Self { client_provider }
    }

    /// Write the code of `function_name` to `function_out` and a config
    /// pointing at it to `config_out`
    pub async fn import<C, F>(
        &self,
        cancel: &CancellationToken,
        function_name: &str,
        mut config_out: C,
        mut function_out: WritableFile<F>,
    ) -> Result<()>
    where
        C: Write,
        F: Write,
    {
        let client = run_until_cancelled(cancel, self.client_provider.provide_client()).await?;
        let code = run_until_cancelled(cancel, client.get_function(function_name)).await?;
        let description =
            run_until_cancelled(cancel, client.describe_function(function_name)).await?;

        function_out
            .writer
            .write_all(&code.code)
            .map_err(|e| FrontierError::io(&function_out.path, e))?;

        let summary = description.summary;
        let function = Function {
            name: summary.name,
            code: Some(FunctionCodeRef {
                path: function_out.path.clone(),
            }),
            config: Some(FunctionConfig {
                comment: summary.function_config.comment.unwrap_or_default(),
                runtime: summary.function_config.runtime,
            }),
        };
        function.write_to(&mut config_out)?;
        info!(
            "Imported function {} into {}",
            function.name, function_out.path
        );
        Ok(())
    }
}
