use crate::report::Report;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub result: Report,
}

impl RunResponse {
    /// Accepts a full `{"result": ...}` envelope or a bare report object.
    pub fn decode_lenient(raw: &str) -> serde_json::Result<Report> {
        match serde_json::from_str::<RunResponse>(raw) {
            Ok(resp) => Ok(resp.result),
            Err(envelope_err) => serde_json::from_str::<Report>(raw).map_err(|_| envelope_err),
        }
    }
}
