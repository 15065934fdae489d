//! Local function configuration
//!
//! A function is described by a YAML document next to its code:
//!
//! ```yaml
//! name: my-fn
//! code:
//!   path: fn.js
//! config:
//!   comment: rewrites index.html
//!   runtime: cloudfront-js-2.0
//! ```

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::cdn::{FunctionRuntime, FunctionWriteInput, RemoteFunctionConfig};
use crate::error::{FrontierError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub code: Option<FunctionCodeRef>,

    #[serde(default)]
    pub config: Option<FunctionConfig>,
}

/// Where the function body lives on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCodeRef {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfig {
    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub runtime: FunctionRuntime,
}

impl Function {
    /// Parse and validate a config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FrontierError::io(path, e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let function: Function = serde_yaml_ng::from_str(content)?;
        if function.name.is_empty() {
            return Err(FrontierError::MissingFunctionName);
        }
        Ok(function)
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        let yaml = serde_yaml_ng::to_string(self)?;
        out.write_all(yaml.as_bytes())
            .map_err(|e| FrontierError::io("<output>", e))?;
        Ok(())
    }

    /// Read the function body referenced by `code.path`
    pub fn read_code(&self) -> Result<Vec<u8>> {
        let code = self.code.as_ref().ok_or_else(|| {
            FrontierError::Config(format!("function {} has no code.path", self.name))
        })?;
        std::fs::read(&code.path).map_err(|e| FrontierError::io(&code.path, e))
    }

    pub fn remote_config(&self) -> RemoteFunctionConfig {
        let config = self.config.clone().unwrap_or_default();
        RemoteFunctionConfig {
            comment: Some(config.comment),
            runtime: config.runtime,
        }
    }

    /// Build the create/update payload, reading the code from disk
    pub fn to_write_input(&self) -> Result<FunctionWriteInput> {
        Ok(FunctionWriteInput {
            name: self.name.clone(),
            code: self.read_code()?,
            config: self.remote_config(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "name: my-fn\ncode:\n  path: fn.js\nconfig:\n  comment: test function\n  runtime: cloudfront-js-2.0\n";

    #[test]
    fn test_parse_config() {
        let function = Function::from_yaml(CONFIG).unwrap();
        assert_eq!(function.name, "my-fn");
        assert_eq!(function.code.unwrap().path, "fn.js");
        let config = function.config.unwrap();
        assert_eq!(config.comment, "test function");
        assert_eq!(config.runtime, FunctionRuntime::CloudfrontJs20);
    }

    #[test]
    fn test_missing_name() {
        let result = Function::from_yaml("code:\n  path: fn.js\n");
        assert!(matches!(result, Err(FrontierError::MissingFunctionName)));
    }

    #[test]
    fn test_unknown_runtime_is_rejected() {
        let result = Function::from_yaml("name: x\nconfig:\n  runtime: python3.12\n");
        assert!(matches!(result, Err(FrontierError::Yaml(_))));
    }

    #[test]
    fn test_write_round_trips() {
        let function = Function::from_yaml(CONFIG).unwrap();
        let mut out = Vec::new();
        function.write_to(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("runtime: cloudfront-js-2.0"));
        assert_eq!(Function::from_yaml(&written).unwrap(), function);
    }

    #[test]
    fn test_read_code_without_code_path() {
        let function = Function {
            name: "my-fn".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            function.read_code(),
            Err(FrontierError::Config(_))
        ));
    }

    #[test]
    fn test_write_input_reads_code() {
        let dir = tempfile::tempdir().unwrap();
        let code_path = dir.path().join("fn.js");
        std::fs::write(&code_path, "function handler(event) { return event.request; }").unwrap();

        let function = Function {
            name: "my-fn".to_string(),
            code: Some(FunctionCodeRef {
                path: code_path.to_string_lossy().into_owned(),
            }),
            config: None,
        };
        let input = function.to_write_input().unwrap();
        assert_eq!(input.name, "my-fn");
        assert!(input.code.starts_with(b"function handler"));
        assert_eq!(input.config.runtime, FunctionRuntime::CloudfrontJs10);
        assert_eq!(input.config.comment.as_deref(), Some(""));
    }
}
