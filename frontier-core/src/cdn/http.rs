//! HTTP backend for the CDN management API
//!
//! JSON over HTTP with PascalCase bodies mirroring the API shapes. Function
//! code travels base64-encoded in request bodies and raw in responses.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION, ETAG, IF_MATCH};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::config::ApiConfig;
use super::{
    CdnClient, ClientProvider, DistributionPage, DistributionSummary, FunctionCode,
    FunctionDescription, FunctionSummary, FunctionWriteInput, FunctionWriteOutput,
    RemoteFunctionConfig,
};
use crate::error::{FrontierError, Result};

/// CDN API client over reqwest
pub struct HttpCdnClient {
    client: reqwest::Client,
    base: Url,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListDistributionsOutput {
    #[serde(default)]
    distribution_list: Option<DistributionList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionList {
    #[serde(default)]
    items: Vec<DistributionSummary>,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeFunctionOutput {
    function_summary: FunctionSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FunctionWriteBody<'a> {
    name: &'a str,
    function_code: String,
    function_config: &'a RemoteFunctionConfig,
}

impl<'a> From<&'a FunctionWriteInput> for FunctionWriteBody<'a> {
    fn from(input: &'a FunctionWriteInput) -> Self {
        Self {
            name: &input.name,
            function_code: general_purpose::STANDARD.encode(&input.code),
            function_config: &input.config,
        }
    }
}

impl HttpCdnClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = Url::parse(&config.endpoint).map_err(|e| {
            FrontierError::Config(format!("invalid endpoint {:?}: {e}", config.endpoint))
        })?;
        if base.cannot_be_a_base() {
            return Err(FrontierError::Config(format!(
                "endpoint cannot be used as a base URL: {}",
                config.endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let api_token = config.api_token();
        if api_token.is_none() {
            debug!(
                "{} is not set, sending unauthenticated requests",
                config.api_token_env
            );
        }

        Ok(Self {
            client,
            base,
            api_token,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.url(segments))
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
    }

    /// Map error statuses; 404 on a function route means the function is absent
    async fn check(response: Response, function_name: Option<&str>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(name) = function_name {
                return Err(FrontierError::NoSuchFunction {
                    name: name.to_string(),
                });
            }
        }
        let body = response.text().await.unwrap_or_default();
        warn!("CDN API error: {} - {}", status, body);
        Err(FrontierError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn etag(response: &Response) -> Option<String> {
        response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

#[async_trait]
impl CdnClient for HttpCdnClient {
    async fn list_distributions_page(&self, marker: Option<&str>) -> Result<DistributionPage> {
        let mut request = self.request(Method::GET, &["distributions"]);
        if let Some(marker) = marker {
            request = request.query(&[("Marker", marker)]);
        }
        debug!("Listing distributions (marker: {:?})", marker);

        let response = Self::check(request.send().await?, None).await?;
        let output: ListDistributionsOutput = response.json().await?;
        let list = output.distribution_list.unwrap_or(DistributionList {
            items: Vec::new(),
            next_marker: None,
        });
        Ok(DistributionPage {
            items: list.items,
            next_marker: list.next_marker.filter(|m| !m.is_empty()),
        })
    }

    async fn get_function(&self, name: &str) -> Result<FunctionCode> {
        let response = self
            .request(Method::GET, &["functions", name])
            .send()
            .await?;
        let response = Self::check(response, Some(name)).await?;
        let etag = Self::etag(&response);
        let code = response.bytes().await?.to_vec();
        Ok(FunctionCode { code, etag })
    }

    async fn describe_function(&self, name: &str) -> Result<FunctionDescription> {
        let response = self
            .request(Method::GET, &["functions", name, "describe"])
            .send()
            .await?;
        let response = Self::check(response, Some(name)).await?;
        let etag = Self::etag(&response);
        let output: DescribeFunctionOutput = response.json().await?;
        Ok(FunctionDescription {
            summary: output.function_summary,
            etag,
        })
    }

    async fn create_function(&self, input: &FunctionWriteInput) -> Result<FunctionWriteOutput> {
        let response = self
            .request(Method::POST, &["functions"])
            .json(&FunctionWriteBody::from(input))
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        Ok(FunctionWriteOutput {
            etag: Self::etag(&response),
        })
    }

    async fn update_function(
        &self,
        input: &FunctionWriteInput,
        if_match: Option<&str>,
    ) -> Result<FunctionWriteOutput> {
        let mut request = self
            .request(Method::PUT, &["functions", &input.name])
            .json(&FunctionWriteBody::from(input));
        if let Some(etag) = if_match {
            request = request.header(IF_MATCH, etag);
        }
        let response = Self::check(request.send().await?, Some(&input.name)).await?;
        Ok(FunctionWriteOutput {
            etag: Self::etag(&response),
        })
    }

    async fn publish_function(&self, name: &str, if_match: &str) -> Result<()> {
        let response = self
            .request(Method::POST, &["functions", name, "publish"])
            .header(IF_MATCH, if_match)
            .send()
            .await?;
        Self::check(response, Some(name)).await?;
        Ok(())
    }
}

/// Builds an [`HttpCdnClient`] from resolved [`ApiConfig`] on first use
pub struct HttpClientProvider {
    config_path: Option<PathBuf>,
    endpoint_override: Option<String>,
    client: OnceCell<Arc<dyn CdnClient>>,
}

impl HttpClientProvider {
    pub fn new(config_path: Option<PathBuf>, endpoint_override: Option<String>) -> Self {
        Self {
            config_path,
            endpoint_override,
            client: OnceCell::new(),
        }
    }
}

#[async_trait]
impl ClientProvider for HttpClientProvider {
    async fn provide_client(&self) -> Result<Arc<dyn CdnClient>> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let config = ApiConfig::resolve(self.config_path.as_deref())?
                    .with_endpoint(self.endpoint_override.clone());
                debug!("Using CDN API endpoint {}", config.endpoint);
                let client: Arc<dyn CdnClient> = Arc::new(HttpCdnClient::new(&config)?);
                Ok::<_, FrontierError>(client)
            })
            .await?;
        Ok(Arc::clone(client))
    }
}
