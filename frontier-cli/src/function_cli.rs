//! Function lifecycle commands: deploy, import and render

use anyhow::{Context, Result};
use clap::Args;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use frontier_core::cdn::ClientProvider;
use frontier_core::deploy::Deployer;
use frontier_core::import::{Importer, WritableFile};
use frontier_core::render::Renderer;

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Config file path
    #[clap(long, default_value = "function.yml")]
    pub config: PathBuf,

    /// Publish the function immediately (default)
    #[clap(long, overrides_with = "no_publish")]
    publish: bool,

    /// Leave the deployed function unpublished
    #[clap(long, overrides_with = "publish")]
    no_publish: bool,
}

impl DeployArgs {
    pub fn publish(&self) -> bool {
        self.publish || !self.no_publish
    }
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Function name
    #[clap(long)]
    pub name: String,

    /// Where to write the function code
    #[clap(long, default_value = "fn.js")]
    pub function_path: PathBuf,

    /// Where to write the config file
    #[clap(long, default_value = "function.yml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Config file path
    #[clap(long, default_value = "function.yml")]
    pub config: PathBuf,
}

pub async fn deploy(
    cancel: &CancellationToken,
    provider: Arc<dyn ClientProvider>,
    args: DeployArgs,
) -> Result<()> {
    Deployer::new(provider)
        .deploy(cancel, &args.config, args.publish())
        .await
        .with_context(|| format!("Failed to deploy {}", args.config.display()))
}

pub async fn import(
    cancel: &CancellationToken,
    provider: Arc<dyn ClientProvider>,
    args: ImportArgs,
) -> Result<()> {
    let function_file = open_for_write(&args.function_path)?;
    let config_file = open_for_write(&args.config)?;

    let function_out = WritableFile {
        writer: function_file,
        path: args.function_path.to_string_lossy().into_owned(),
    };
    Importer::new(provider)
        .import(cancel, &args.name, config_file, function_out)
        .await
        .with_context(|| format!("Failed to import function {}", args.name))
}

pub fn render(args: RenderArgs) -> Result<()> {
    Renderer::new()
        .render(&args.config, io::stdout().lock())
        .with_context(|| format!("Failed to render {}", args.config.display()))
}

/// Create or truncate `path`, readable only by the owner on unix
fn open_for_write(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_for_write_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fn.js");
        std::fs::write(&path, "previous contents that are long").unwrap();

        let mut file = open_for_write(&path).unwrap();
        file.write_all(b"new").unwrap();
        drop(file);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_open_for_write_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("function.yml");
        open_for_write(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_open_for_write_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("fn.js");
        assert!(open_for_write(&path).is_err());
    }
}
