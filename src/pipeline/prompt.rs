use super::operator::Row;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fs;

/// The prompt, the SQL that ran for it, its result rows and timing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PromptData {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub table: Vec<Row>,
    #[serde(default)]
    pub execution_time: f64,
}

impl PromptData {
    /// Load prompt data from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| PipelineError::JsonParseError(e.to_string()))
    }
}
