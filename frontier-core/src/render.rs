//! Rendering of the resolved function config

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::function::Function;

#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Parse the config at `config_path` and write it back in canonical form
    pub fn render<W: Write>(&self, config_path: &Path, output: W) -> Result<()> {
        let function = Function::from_path(config_path)?;
        function.write_to(output)
    }
}
