use crate::pipeline::{ColumnRef, Operator, OperatorId, Row, TupleFormat};
use serde::Serialize;

/// Operator name of the synthetic node carrying the natural-language prompt.
pub const USER_PROMPT_LABEL: &str = "User Prompt";
/// Operator name of the synthetic node carrying the executed SQL.
pub const QUERY_LABEL: &str = "Query";
/// Operator name of the synthetic node carrying the final result table.
pub const RESULTS_LABEL: &str = "Results";

/// How a graph node is presented, decided from the shape of its operator.
///
/// Precedence is fixed: function, then attached data, then reserved synthetic
/// label, then generic structural operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodePresentation {
    FunctionEditor(FunctionEditor),
    ResultsTable(ResultsTable),
    ReadOnlyField(ReadOnlyField),
    Structural(StructuralOperator),
}

/// Editable parameter form of an LLM-backed function operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionEditor {
    /// The operator edits from this form are addressed to.
    pub operator_id: OperatorId,
    pub name: String,
    pub model_name: String,
    pub prompt: String,
    pub columns: Vec<ColumnRef>,
    pub batch_size: Option<u64>,
    pub tuple_format: TupleFormat,
    pub tuple_formats: [TupleFormat; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub execution_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadOnlyField {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralOperator {
    pub name: String,
    pub description: String,
}

impl NodePresentation {
    pub fn dispatch(operator: &Operator) -> Self {
        if operator.is_function {
            let params = operator.function_params();
            return NodePresentation::FunctionEditor(FunctionEditor {
                operator_id: operator.id,
                name: operator.name.clone(),
                model_name: params.model_name.unwrap_or_default(),
                prompt: params.prompt.unwrap_or_default(),
                columns: params.columns,
                batch_size: params.batch_size,
                tuple_format: params.tuple_format,
                tuple_formats: TupleFormat::ALL,
            });
        }

        if operator.data.is_some() {
            let rows: Vec<Row> = operator.rows().into_iter().cloned().collect();
            let columns = rows
                .first()
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default();
            return NodePresentation::ResultsTable(ResultsTable {
                title: operator.name.clone(),
                columns,
                rows,
                execution_time: operator.metrics.map(|m| m.execution_time),
            });
        }

        if operator.name == USER_PROMPT_LABEL || operator.name == QUERY_LABEL {
            return NodePresentation::ReadOnlyField(ReadOnlyField {
                title: operator.name.clone(),
                value: operator.description.clone(),
            });
        }

        NodePresentation::Structural(StructuralOperator {
            name: operator.name.clone(),
            description: operator.description.clone(),
        })
    }

    /// Only function editors accept field edits.
    pub fn is_editable(&self) -> bool {
        matches!(self, NodePresentation::FunctionEditor(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NodePresentation::FunctionEditor(_) => "function_editor",
            NodePresentation::ResultsTable(_) => "results_table",
            NodePresentation::ReadOnlyField(_) => "read_only_field",
            NodePresentation::Structural(_) => "structural",
        }
    }
}
