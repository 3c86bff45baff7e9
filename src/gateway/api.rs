use super::endpoint::Endpoint;
use crate::pipeline::{Pipeline, PromptData, Row};
use crate::state::Action;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub selected_tables: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegenerateRequest {
    pub prompt: String,
    pub generated_query: String,
    #[serde(default)]
    pub selected_tables: Vec<String>,
}

/// Body shared by the direct query run and the query plan generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RefinementRequest {
    pub query: String,
    pub pipeline: Pipeline,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlotConfigRequest {
    pub prompt: String,
    pub query: String,
    pub table: Vec<Row>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryRunResponse {
    #[serde(default)]
    pub table: Vec<Row>,
    #[serde(default)]
    pub execution_time: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryPlanResponse {
    pub pipeline: Pipeline,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RefinementResponse {
    #[serde(default)]
    pub table: Vec<Row>,
    #[serde(default)]
    pub execution_time: f64,
    pub query: String,
    pub pipeline: Pipeline,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub table_name: String,
    #[serde(default)]
    pub row_count: i64,
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TableList {
    pub tables: Vec<TableInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TablePreview {
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default)]
    pub showing: u64,
}

/// Plain acknowledgement returned by uploads and deletions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

/// A file handed to one of the upload endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A state-changing backend request issued by the view state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListTables,
    Generate(GenerateRequest),
    Regenerate(RegenerateRequest),
    RunQuery(QueryRequest),
    InspectPlan(QueryRequest),
    Rerun(RefinementRequest),
    PlotConfig(PlotConfigRequest),
}

impl Request {
    pub fn action(&self) -> Action {
        match self {
            Request::ListTables => Action::RefreshTables,
            Request::Generate(_) => Action::Generate,
            Request::Regenerate(_) => Action::Regenerate,
            Request::RunQuery(_) => Action::RunQuery,
            Request::InspectPlan(_) => Action::InspectPlan,
            Request::Rerun(_) => Action::Rerun,
            Request::PlotConfig(_) => Action::PlotConfig,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Request::ListTables => Endpoint::ListTables,
            Request::Generate(_) => Endpoint::GenerateResponseTable,
            Request::Regenerate(_) => Endpoint::RegenerateResponseTable,
            Request::RunQuery(_) => Endpoint::RunInputQuery,
            Request::InspectPlan(_) => Endpoint::GenerateQueryPlan,
            Request::Rerun(_) => Endpoint::RunWithRefinement,
            Request::PlotConfig(_) => Endpoint::GeneratePlotConfig,
        }
    }
}

/// The decoded answer to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Tables(Vec<TableInfo>),
    Generated(PromptData),
    Regenerated(PromptData),
    QueryRan(QueryRunResponse),
    PlanFetched(QueryPlanResponse),
    Reran(RefinementResponse),
    PlotConfig(serde_json::Value),
}

impl Response {
    pub fn action(&self) -> Action {
        match self {
            Response::Tables(_) => Action::RefreshTables,
            Response::Generated(_) => Action::Generate,
            Response::Regenerated(_) => Action::Regenerate,
            Response::QueryRan(_) => Action::RunQuery,
            Response::PlanFetched(_) => Action::InspectPlan,
            Response::Reran(_) => Action::Rerun,
            Response::PlotConfig(_) => Action::PlotConfig,
        }
    }
}
