use super::operator::Params;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialization format used to feed tuples to the language model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TupleFormat {
    Markdown,
    #[default]
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "JSON")]
    Json,
}

impl TupleFormat {
    pub const ALL: [TupleFormat; 3] = [TupleFormat::Markdown, TupleFormat::Xml, TupleFormat::Json];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Markdown" => Some(TupleFormat::Markdown),
            "XML" => Some(TupleFormat::Xml),
            "JSON" => Some(TupleFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TupleFormat::Markdown => "Markdown",
            TupleFormat::Xml => "XML",
            TupleFormat::Json => "JSON",
        }
    }
}

impl fmt::Display for TupleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column fed into a function, either a bare name or a `{name, data}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ColumnRef {
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(name) => Some(ColumnRef {
                name: name.clone(),
                data: None,
            }),
            serde_json::Value::Object(map) => {
                let name = map.get("name")?.as_str()?.to_string();
                let data = map.get("data").and_then(|d| d.as_str()).map(str::to_string);
                Some(ColumnRef { name, data })
            }
            _ => None,
        }
    }
}

/// Typed, read-only view of the recognized keys of a function operator's params.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FunctionParams {
    pub model_name: Option<String>,
    pub prompt: Option<String>,
    pub columns: Vec<ColumnRef>,
    /// `None` means the batch size is chosen automatically.
    pub batch_size: Option<u64>,
    pub tuple_format: TupleFormat,
}

impl FunctionParams {
    /// Extracts the recognized keys, ignoring anything malformed.
    ///
    /// `context_columns` takes precedence over the older `input_columns` key.
    pub fn from_params(params: &Params) -> Self {
        let str_param = |key: &str| params.get(key).and_then(|v| v.as_str()).map(str::to_string);

        let columns = params
            .get("context_columns")
            .or_else(|| params.get("input_columns"))
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(ColumnRef::from_value).collect())
            .unwrap_or_default();

        let batch_size = params
            .get("batch_size")
            .and_then(|v| v.as_f64())
            .filter(|n| *n >= 1.0)
            .map(|n| n as u64);

        let tuple_format = params
            .get("tuple_format")
            .and_then(|v| v.as_str())
            .and_then(TupleFormat::parse)
            .unwrap_or_default();

        Self {
            model_name: str_param("model_name"),
            prompt: str_param("prompt"),
            columns,
            batch_size,
            tuple_format,
        }
    }
}
