use serde::{Deserialize, Deserializer, Serialize};

/// Payload produced by the report service for one company.
///
/// Only `raw` and `token_usage` drive rendering; the remaining fields are kept
/// so a saved response round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub raw: String,
    #[serde(default)]
    pub pydantic: serde_json::Value,
    #[serde(default)]
    pub json_dict: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks_output: Vec<TaskOutput>,
    #[serde(default)]
    pub token_usage: TokenUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskOutput {
    pub description: Option<String>,
    pub name: Option<String>,
    pub expected_output: Option<String>,
    pub summary: Option<String>,
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub cached_prompt_tokens: u64,
    pub completion_tokens: u64,
    pub successful_requests: u64,
}

impl Report {
    /// Report with only a body; handy for offline rendering.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            pydantic: serde_json::Value::Null,
            json_dict: serde_json::Value::Null,
            tasks_output: Vec::new(),
            token_usage: TokenUsage::default(),
        }
    }
}

/// The service sends `null` for collections it did not fill in.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
