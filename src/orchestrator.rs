use crate::{
    report::Report,
    service::{FetchError, ReportService},
};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(Report),
    Failed(String),
}

/// Handle for one in-flight request. Only the most recently issued ticket can
/// land its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub company: String,
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    selected: Option<String>,
    state: RequestState,
    generation: u64,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, company: Option<&str>) {
        self.selected = company
            .filter(|c| !c.is_empty())
            .map(str::to_string);
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn report(&self) -> Option<&Report> {
        match &self.state {
            RequestState::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Whether the submit action is available.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_loading()
    }

    /// Start a request for the current selection. Any ticket issued earlier
    /// becomes stale.
    pub fn begin(&mut self) -> Option<Ticket> {
        let company = self.selected.clone()?;
        if self.is_loading() {
            debug!("superseding in-flight request generation={}", self.generation);
        }
        self.generation += 1;
        self.state = RequestState::Loading;
        info!("requesting report company={company:?} generation={}", self.generation);
        Some(Ticket {
            generation: self.generation,
            company,
        })
    }

    /// Land a result. Returns false when the ticket was superseded and the
    /// result was dropped.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Report, FetchError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "discarding stale result company={:?} generation={} current={}",
                ticket.company, ticket.generation, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(report) => {
                info!(
                    "report received company={:?} bytes={} total_tokens={}",
                    ticket.company,
                    report.raw.len(),
                    report.token_usage.total_tokens
                );
                RequestState::Succeeded(report)
            }
            Err(err) => {
                info!("report failed company={:?}: {err}", ticket.company);
                RequestState::Failed(err.to_string())
            }
        };
        true
    }

    /// Begin, fetch, and complete in one step. A no-op without a selection.
    pub async fn submit(&mut self, service: &dyn ReportService) -> &RequestState {
        let Some(ticket) = self.begin() else {
            debug!("submit ignored: {}", FetchError::NoSelection);
            return &self.state;
        };
        let result = service.fetch(&ticket.company).await;
        self.complete(ticket, result);
        &self.state
    }
}
