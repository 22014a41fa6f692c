use super::{types::*, FetchError, ReportService};
use crate::{config::Config, report::Report};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

pub struct HttpReportService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReportService {
    pub fn new(cfg: &Config) -> Result<Self> {
        Self::with_endpoint(cfg, &cfg.service.endpoint)
    }

    pub fn with_endpoint(cfg: &Config, endpoint: &str) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.service.user_agent.clone());
        if cfg.service.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(cfg.service.timeout_seconds));
        }
        let client = builder.build().with_context(|| "building HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl ReportService for HttpReportService {
    async fn fetch(&self, company: &str) -> Result<Report, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = RunRequest {
            input: company.to_string(),
        };

        debug!("POST {} input={company:?}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(FetchError::Http {
                status: status.as_u16(),
                status_text,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        debug!("response status={} bytes={}", status, text.len());

        let resp: RunResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
        Ok(resp.result)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
