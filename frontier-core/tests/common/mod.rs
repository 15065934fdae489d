//! Shared fixtures for frontier-core integration tests
//!
//! [`FakeCdn`] is an in-memory [`CdnClient`] with scripted listing pages and
//! a small function store. Every call is recorded so tests can assert on the
//! exact sequence of remote operations.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

use frontier_core::cdn::{
    CdnClient, ClientProvider, DefaultCacheBehavior, DistributionPage, DistributionSummary,
    FunctionAssociationEntry, FunctionAssociations, FunctionCode, FunctionDescription,
    FunctionMetadata, FunctionRuntime, FunctionSummary, FunctionWriteInput, FunctionWriteOutput,
    RemoteFunctionConfig, StaticProvider,
};
use frontier_core::{FrontierError, Result};

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Scripted response to one listing call
pub enum PageStep {
    Page(DistributionPage),
    Fail { status: u16, body: String },
    /// Never completes; used to exercise cancellation
    Hang,
}

#[derive(Debug, Clone)]
pub struct StoredFunction {
    pub code: Vec<u8>,
    pub etag: String,
    pub arn: Option<String>,
    pub comment: Option<String>,
    pub runtime: FunctionRuntime,
}

#[derive(Default)]
pub struct FakeCdn {
    pages: Mutex<VecDeque<PageStep>>,
    functions: Mutex<HashMap<String, StoredFunction>>,
    calls: Mutex<Vec<String>>,
    revision: Mutex<u32>,
    omit_write_etag: bool,
}

impl FakeCdn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(steps: Vec<PageStep>) -> Self {
        Self {
            pages: Mutex::new(steps.into()),
            ..Self::default()
        }
    }

    /// Write calls return no ETag
    pub fn without_write_etags(mut self) -> Self {
        self.omit_write_etag = true;
        self
    }

    pub fn insert_function(&self, name: &str, function: StoredFunction) {
        self.functions
            .lock()
            .unwrap()
            .insert(name.to_string(), function);
    }

    pub fn function(&self, name: &str) -> Option<StoredFunction> {
        self.functions.lock().unwrap().get(name).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn provider(self: &Arc<Self>) -> Arc<dyn ClientProvider> {
        Arc::new(StaticProvider::new(Arc::clone(self) as Arc<dyn CdnClient>))
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_etag(&self) -> String {
        let mut revision = self.revision.lock().unwrap();
        *revision += 1;
        format!("E{}", *revision)
    }

    fn write_output(&self, etag: String) -> FunctionWriteOutput {
        FunctionWriteOutput {
            etag: (!self.omit_write_etag).then_some(etag),
        }
    }
}

#[async_trait]
impl CdnClient for FakeCdn {
    async fn list_distributions_page(&self, marker: Option<&str>) -> Result<DistributionPage> {
        self.record(format!("list:{}", marker.unwrap_or("-")));
        let step = self.pages.lock().unwrap().pop_front();
        match step {
            Some(PageStep::Page(page)) => Ok(page),
            Some(PageStep::Fail { status, body }) => Err(FrontierError::Api { status, body }),
            Some(PageStep::Hang) => std::future::pending().await,
            None => Ok(DistributionPage::default()),
        }
    }

    async fn get_function(&self, name: &str) -> Result<FunctionCode> {
        self.record(format!("get:{name}"));
        self.function(name)
            .map(|f| FunctionCode {
                code: f.code,
                etag: Some(f.etag),
            })
            .ok_or_else(|| FrontierError::NoSuchFunction {
                name: name.to_string(),
            })
    }

    async fn describe_function(&self, name: &str) -> Result<FunctionDescription> {
        self.record(format!("describe:{name}"));
        let f = self
            .function(name)
            .ok_or_else(|| FrontierError::NoSuchFunction {
                name: name.to_string(),
            })?;
        Ok(FunctionDescription {
            summary: FunctionSummary {
                name: name.to_string(),
                status: Some("UNPUBLISHED".to_string()),
                function_config: RemoteFunctionConfig {
                    comment: f.comment,
                    runtime: f.runtime,
                },
                function_metadata: f.arn.map(|arn| FunctionMetadata {
                    function_arn: Some(arn),
                    stage: Some("DEVELOPMENT".to_string()),
                }),
            },
            etag: Some(f.etag),
        })
    }

    async fn create_function(&self, input: &FunctionWriteInput) -> Result<FunctionWriteOutput> {
        self.record(format!("create:{}", input.name));
        let etag = self.next_etag();
        self.insert_function(
            &input.name,
            StoredFunction {
                code: input.code.clone(),
                etag: etag.clone(),
                arn: Some(function_arn(&input.name)),
                comment: input.config.comment.clone(),
                runtime: input.config.runtime,
            },
        );
        Ok(self.write_output(etag))
    }

    async fn update_function(
        &self,
        input: &FunctionWriteInput,
        if_match: Option<&str>,
    ) -> Result<FunctionWriteOutput> {
        self.record(format!("update:{}:{}", input.name, if_match.unwrap_or("-")));
        let mut functions = self.functions.lock().unwrap();
        let existing = functions
            .get_mut(&input.name)
            .ok_or_else(|| FrontierError::NoSuchFunction {
                name: input.name.clone(),
            })?;
        if if_match != Some(existing.etag.as_str()) {
            return Err(FrontierError::Api {
                status: 412,
                body: "PreconditionFailed".to_string(),
            });
        }
        let etag = self.next_etag();
        existing.code = input.code.clone();
        existing.comment = input.config.comment.clone();
        existing.runtime = input.config.runtime;
        existing.etag = etag.clone();
        drop(functions);
        Ok(self.write_output(etag))
    }

    async fn publish_function(&self, name: &str, if_match: &str) -> Result<()> {
        self.record(format!("publish:{name}:{if_match}"));
        Ok(())
    }
}

/// Provider whose acquisition always fails
pub struct FailingProvider;

#[async_trait]
impl ClientProvider for FailingProvider {
    async fn provide_client(&self) -> Result<Arc<dyn CdnClient>> {
        Err(FrontierError::Config("no credentials".to_string()))
    }
}

pub fn function_arn(name: &str) -> String {
    format!("arn:aws:cloudfront::123456789012:function/{name}")
}

pub fn entry(name: &str, event_type: &str) -> FunctionAssociationEntry {
    FunctionAssociationEntry {
        function_arn: function_arn(name),
        event_type: event_type.to_string(),
    }
}

/// Distribution whose default behavior carries `entries`
pub fn distribution(id: &str, entries: Vec<FunctionAssociationEntry>) -> DistributionSummary {
    DistributionSummary {
        id: Some(id.to_string()),
        arn: Some(format!(
            "arn:aws:cloudfront::123456789012:distribution/{id}"
        )),
        domain_name: Some(format!("{}.cloudfront.net", id.to_lowercase())),
        enabled: Some(true),
        staging: Some(false),
        status: Some("Deployed".to_string()),
        default_cache_behavior: Some(DefaultCacheBehavior {
            target_origin_id: Some("origin".to_string()),
            cache_policy_id: Some("policy".to_string()),
            function_associations: Some(FunctionAssociations { items: entries }),
        }),
        cache_behaviors: None,
    }
}

pub fn page(items: Vec<DistributionSummary>, next_marker: Option<&str>) -> PageStep {
    PageStep::Page(DistributionPage {
        items,
        next_marker: next_marker.map(str::to_string),
    })
}
