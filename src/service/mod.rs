pub mod http;
pub mod types;

use crate::report::Report;
use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpReportService;
pub use types::{RunRequest, RunResponse};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no company selected")]
    NoSelection,
    #[error("{0}")]
    Transport(String),
    #[error("Error: {status_text}")]
    Http { status: u16, status_text: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait ReportService: Send + Sync {
    async fn fetch(&self, company: &str) -> Result<Report, FetchError>;
    fn endpoint(&self) -> &str;
}
