use super::api::*;
use super::endpoint::Endpoint;
use super::normalize;
use super::transport::{Body, HttpTransport, Target};
use super::Backend;
use crate::error::GatewayError;
use crate::pipeline::PromptData;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Rows returned by a preview when the caller does not ask for a limit.
pub const DEFAULT_PREVIEW_LIMIT: u32 = 10;

/// Calls the proxy's `/api/...` routes on behalf of the UI.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    transport: HttpTransport,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            transport: HttpTransport::new(base_url, Target::Proxy)?,
        })
    }

    pub fn with_timeout_override(mut self, timeout: Option<Duration>) -> Self {
        self.transport = self.transport.with_timeout_override(timeout);
        self
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        name: Option<&str>,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<T, GatewayError> {
        let value = self.transport.call(endpoint, name, query, body).await?;
        serde_json::from_value(value).map_err(|e| normalize::malformed(endpoint, &e))
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<T, GatewayError> {
        let json = serde_json::to_value(body).map_err(|e| normalize::malformed(endpoint, &e))?;
        self.call(endpoint, None, &[], Body::Json(json)).await
    }

    pub async fn list_tables(&self) -> Result<Vec<TableInfo>, GatewayError> {
        let list: TableList = self.call(Endpoint::ListTables, None, &[], Body::Empty).await?;
        Ok(list.tables)
    }

    pub async fn preview_table(&self, name: &str, limit: u32) -> Result<TablePreview, GatewayError> {
        self.call(
            Endpoint::PreviewTable,
            Some(name),
            &[("limit", limit.to_string())],
            Body::Empty,
        )
        .await
    }

    pub async fn table_schema(&self, name: &str) -> Result<Value, GatewayError> {
        self.call(Endpoint::TableSchema, Some(name), &[], Body::Empty)
            .await
    }

    pub async fn delete_table(&self, name: &str) -> Result<Ack, GatewayError> {
        self.call(Endpoint::DeleteTable, Some(name), &[], Body::Empty)
            .await
    }

    pub async fn data_status(&self) -> Result<Value, GatewayError> {
        self.call(Endpoint::DataStatus, None, &[], Body::Empty).await
    }

    /// Uploads one or more CSV files as the multipart field `files`.
    pub async fn upload_csv(&self, files: Vec<UploadFile>) -> Result<Ack, GatewayError> {
        let form = files.into_iter().fold(Form::new(), |form, file| {
            form.part("files", Part::bytes(file.bytes).file_name(file.file_name))
        });
        self.call(Endpoint::UploadCsv, None, &[], Body::Multipart(form))
            .await
    }

    /// Uploads a database file as the multipart field `file`.
    pub async fn upload_duckdb(&self, file: UploadFile) -> Result<Ack, GatewayError> {
        let form = Form::new().part("file", Part::bytes(file.bytes).file_name(file.file_name));
        self.call(Endpoint::UploadDuckdb, None, &[], Body::Multipart(form))
            .await
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<PromptData, GatewayError> {
        self.post(Endpoint::GenerateResponseTable, request).await
    }

    pub async fn regenerate(&self, request: &RegenerateRequest) -> Result<PromptData, GatewayError> {
        self.post(Endpoint::RegenerateResponseTable, request).await
    }

    pub async fn run_query(&self, request: &QueryRequest) -> Result<QueryRunResponse, GatewayError> {
        self.post(Endpoint::RunInputQuery, request).await
    }

    pub async fn query_plan(&self, request: &QueryRequest) -> Result<QueryPlanResponse, GatewayError> {
        self.post(Endpoint::GenerateQueryPlan, request).await
    }

    pub async fn run_with_refinement(
        &self,
        request: &RefinementRequest,
    ) -> Result<RefinementResponse, GatewayError> {
        self.post(Endpoint::RunWithRefinement, request).await
    }

    pub async fn plot_config(&self, request: &PlotConfigRequest) -> Result<Value, GatewayError> {
        self.post(Endpoint::GeneratePlotConfig, request).await
    }
}

impl Backend for GatewayClient {
    async fn send(&self, request: Request) -> Result<Response, GatewayError> {
        match request {
            Request::ListTables => self.list_tables().await.map(Response::Tables),
            Request::Generate(body) => self.generate(&body).await.map(Response::Generated),
            Request::Regenerate(body) => self.regenerate(&body).await.map(Response::Regenerated),
            Request::RunQuery(body) => self.run_query(&body).await.map(Response::QueryRan),
            Request::InspectPlan(body) => self.query_plan(&body).await.map(Response::PlanFetched),
            Request::Rerun(body) => self.run_with_refinement(&body).await.map(Response::Reran),
            Request::PlotConfig(body) => self.plot_config(&body).await.map(Response::PlotConfig),
        }
    }
}
