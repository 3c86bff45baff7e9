use super::params::FunctionParams;
use crate::error::PipelineError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::sync::Arc;

/// Identifier of an operator, unique within one tree snapshot only.
pub type OperatorId = i64;

/// One result row. Key order is preserved so the first row can drive column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// The schema-less parameter bag of an operator.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Timing attached to terminal/results operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub execution_time: f64,
}

/// A node of the query-derivation tree.
///
/// Children are held behind `Arc` so that an edit can rebuild the path to the
/// touched node while every other subtree is shared with the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub id: OperatorId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_function: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Params,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Arc<Operator>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The operator tree as a whole, addressed through its root.
pub type Pipeline = Arc<Operator>;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Operator {
    /// Creates a structural operator with no params, children or data.
    pub fn new(id: OperatorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            is_function: false,
            params: Params::new(),
            children: Vec::new(),
            metrics: None,
            data: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the operator as an LLM-backed scalar function with the given params.
    pub fn function(mut self, params: Params) -> Self {
        self.is_function = true;
        self.params = params;
        self
    }

    pub fn with_child(mut self, child: Operator) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn with_data(mut self, rows: Vec<Row>) -> Self {
        self.data = Some(serde_json::Value::Array(
            rows.into_iter().map(serde_json::Value::Object).collect(),
        ));
        self
    }

    pub fn with_metrics(mut self, execution_time: f64) -> Self {
        self.metrics = Some(Metrics { execution_time });
        self
    }

    /// Parses a pipeline from its JSON representation.
    pub fn from_json(json: &str) -> Result<Pipeline, PipelineError> {
        serde_json::from_str::<Operator>(json)
            .map(Arc::new)
            .map_err(|e| PipelineError::JsonParseError(e.to_string()))
    }

    /// Loads a pipeline from a JSON file.
    pub fn from_file(path: &str) -> Result<Pipeline, PipelineError> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// The attached result rows, if `data` is an array of records.
    ///
    /// Any other payload shape yields no rows rather than an error.
    pub fn rows(&self) -> Vec<&Row> {
        match &self.data {
            Some(serde_json::Value::Array(items)) => {
                items.iter().filter_map(|item| item.as_object()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Typed view over the params of a function operator.
    pub fn function_params(&self) -> FunctionParams {
        FunctionParams::from_params(&self.params)
    }

    /// Depth-first pre-order search for the first operator with `id`.
    pub fn find(&self, id: OperatorId) -> Option<&Operator> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of operators in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
