//! Output of association listings

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

use crate::association::FunctionAssociation;
use crate::error::{FrontierError, Result};

pub trait AssociatedDistributionsPresenter {
    fn present_associated_distributions(
        &mut self,
        associations: &[FunctionAssociation],
    ) -> Result<()>;
}

/// Writes one JSON document per association, each followed by a newline
pub struct JsonPresenter<W: Write> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: false }
    }

    /// Indent documents by two spaces
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AssociatedDistributionsPresenter for JsonPresenter<W> {
    fn present_associated_distributions(
        &mut self,
        associations: &[FunctionAssociation],
    ) -> Result<()> {
        for association in associations {
            if self.pretty {
                serde_json::to_writer_pretty(&mut self.out, association)?;
            } else {
                serde_json::to_writer(&mut self.out, association)?;
            }
            self.out
                .write_all(b"\n")
                .map_err(|e| FrontierError::io("<output>", e))?;
        }
        self.out
            .flush()
            .map_err(|e| FrontierError::io("<output>", e))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid output format: {0:?}")]
pub struct InvalidOutputFormat(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputFormat {
    #[default]
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn available() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::JsonPretty]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json.pretty",
        }
    }

    /// Build the presenter for this format over `out`
    pub fn presenter<'a, W: Write + 'a>(
        &self,
        out: W,
    ) -> Box<dyn AssociatedDistributionsPresenter + 'a> {
        match self {
            OutputFormat::Json => Box::new(JsonPresenter::new(out)),
            OutputFormat::JsonPretty => Box::new(JsonPresenter::new(out).pretty(true)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = InvalidOutputFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        OutputFormat::available()
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| InvalidOutputFormat(s.to_string()))
    }
}
