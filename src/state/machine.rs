use super::{Action, View};
use crate::error::{GatewayError, TransitionError};
use crate::gateway::{
    GenerateRequest, PlotConfigRequest, QueryRequest, RefinementRequest, RegenerateRequest,
    Request, Response, TableInfo,
};
use crate::layout::{GraphLayout, LayoutConfig, LayoutEngine};
use crate::pipeline::{OperatorId, Pipeline, PromptData, ValueKind, apply_field_edit};
use crate::render::NodePresentation;
use ahash::{AHashMap, AHashSet};
use serde_json::Value;
use std::sync::Arc;

/// An issued request together with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub seq: u64,
    pub request: Request,
}

impl Ticket {
    pub fn action(&self) -> Action {
        self.request.action()
    }
}

/// What [`AppState::complete`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was applied to the state.
    Applied,
    /// The request failed; its error slot now holds the failure.
    Failed,
    /// A newer request of the same action, or a reset, superseded this one.
    Stale,
}

#[derive(Debug, Default)]
struct ActionTrack {
    latest_applied: u64,
    pending: u32,
    last_request: Option<Request>,
    error: Option<GatewayError>,
}

/// All client state: current view, loaded data, in-flight bookkeeping and error slots.
#[derive(Debug, Default)]
pub struct AppState {
    view: View,
    selected_tables: Vec<String>,
    tables: Vec<TableInfo>,
    prompt_data: Option<PromptData>,
    pipeline: Option<Pipeline>,
    edited: AHashSet<OperatorId>,
    chart: Option<Value>,
    tracks: AHashMap<Action, ActionTrack>,
    next_seq: u64,
    /// Tickets numbered below this were issued before the last reset.
    reset_floor: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn prompt_data(&self) -> Option<&PromptData> {
        self.prompt_data.as_ref()
    }

    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    pub fn tables(&self) -> &[TableInfo] {
        &self.tables
    }

    pub fn selected_tables(&self) -> &[String] {
        &self.selected_tables
    }

    pub fn chart(&self) -> Option<&Value> {
        self.chart.as_ref()
    }

    pub fn select_tables(&mut self, tables: Vec<String>) {
        self.selected_tables = tables;
    }

    pub fn is_edited(&self, id: OperatorId) -> bool {
        self.edited.contains(&id)
    }

    pub fn has_edits(&self) -> bool {
        !self.edited.is_empty()
    }

    pub fn error(&self, action: Action) -> Option<&GatewayError> {
        self.tracks.get(&action).and_then(|t| t.error.as_ref())
    }

    pub fn is_loading(&self, action: Action) -> bool {
        self.tracks.get(&action).is_some_and(|t| t.pending > 0)
    }

    /// Whether the control triggering `action` should be enabled.
    pub fn can_trigger(&self, action: Action) -> bool {
        action.allowed_in(self.view) && !self.is_loading(action)
    }

    fn require(&self, action: Action) -> Result<(), TransitionError> {
        if action.allowed_in(self.view) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                view: self.view,
                action,
            })
        }
    }

    fn loaded_prompt_data(&self) -> Result<&PromptData, TransitionError> {
        self.prompt_data.as_ref().ok_or(TransitionError::NoResults)
    }

    fn issue(&mut self, request: Request) -> Ticket {
        self.next_seq += 1;
        let track = self.tracks.entry(request.action()).or_default();
        track.pending += 1;
        track.error = None;
        track.last_request = Some(request.clone());
        tracing::debug!(seq = self.next_seq, action = %request.action(), "request issued");
        Ticket {
            seq: self.next_seq,
            request,
        }
    }

    pub fn begin_refresh_tables(&mut self) -> Ticket {
        self.issue(Request::ListTables)
    }

    pub fn begin_generate(&mut self, prompt: &str) -> Result<Ticket, TransitionError> {
        self.require(Action::Generate)?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(TransitionError::EmptyPrompt);
        }
        self.view = View::Generating;
        Ok(self.issue(Request::Generate(GenerateRequest {
            prompt: prompt.to_string(),
            selected_tables: self.selected_tables.clone(),
        })))
    }

    pub fn begin_regenerate(&mut self, prompt: &str, query: &str) -> Result<Ticket, TransitionError> {
        self.require(Action::Regenerate)?;
        self.loaded_prompt_data()?;
        if prompt.trim().is_empty() {
            return Err(TransitionError::EmptyPrompt);
        }
        Ok(self.issue(Request::Regenerate(RegenerateRequest {
            prompt: prompt.to_string(),
            generated_query: query.to_string(),
            selected_tables: self.selected_tables.clone(),
        })))
    }

    /// Runs an edited SQL query directly, bypassing generation.
    pub fn begin_run_query(&mut self, query: &str) -> Result<Ticket, TransitionError> {
        self.require(Action::RunQuery)?;
        self.loaded_prompt_data()?;
        Ok(self.issue(Request::RunQuery(QueryRequest {
            query: query.to_string(),
        })))
    }

    /// Fetches the plan for the displayed query. Always re-fetches.
    pub fn begin_inspect_plan(&mut self) -> Result<Ticket, TransitionError> {
        self.require(Action::InspectPlan)?;
        let query = self.loaded_prompt_data()?.query.clone();
        Ok(self.issue(Request::InspectPlan(QueryRequest { query })))
    }

    pub fn begin_rerun(&mut self) -> Result<Ticket, TransitionError> {
        self.require(Action::Rerun)?;
        let query = self.loaded_prompt_data()?.query.clone();
        let pipeline = self.pipeline.clone().ok_or(TransitionError::NoPipeline)?;
        Ok(self.issue(Request::Rerun(RefinementRequest { query, pipeline })))
    }

    pub fn begin_plot_config(&mut self) -> Result<Ticket, TransitionError> {
        self.require(Action::PlotConfig)?;
        let data = self.loaded_prompt_data()?;
        let request = PlotConfigRequest {
            prompt: data.prompt.clone(),
            query: data.query.clone(),
            table: data.table.clone(),
        };
        Ok(self.issue(Request::PlotConfig(request)))
    }

    /// Re-issues the last request of `action` with the same inputs.
    pub fn retry(&mut self, action: Action) -> Result<Ticket, TransitionError> {
        self.require(action)?;
        let request = self
            .tracks
            .get(&action)
            .and_then(|t| t.last_request.clone())
            .ok_or(TransitionError::NothingToRetry(action))?;
        if action == Action::Generate {
            self.view = View::Generating;
        }
        Ok(self.issue(request))
    }

    /// Clears the error slot of `action`, leaving loaded data alone.
    pub fn dismiss(&mut self, action: Action) {
        if let Some(track) = self.tracks.get_mut(&action) {
            track.error = None;
        }
    }

    /// Returns from the plan graph to the results view. The plan stays in memory.
    pub fn back_to_results(&mut self) -> Result<(), TransitionError> {
        if self.view != View::PlanShown {
            return Err(TransitionError::InvalidTransition {
                view: self.view,
                action: Action::InspectPlan,
            });
        }
        self.view = View::ResultsReady;
        Ok(())
    }

    /// Applies a local parameter edit to the displayed plan.
    ///
    /// Returns whether any operator matched `id`.
    pub fn edit_operator_field(
        &mut self,
        id: OperatorId,
        field: &str,
        raw: Value,
        kind: ValueKind,
    ) -> Result<bool, TransitionError> {
        if self.view != View::PlanShown {
            return Err(TransitionError::InvalidTransition {
                view: self.view,
                action: Action::Rerun,
            });
        }
        let current = self.pipeline.as_ref().ok_or(TransitionError::NoPipeline)?;
        let updated = apply_field_edit(current, id, field, raw, kind);
        if Arc::ptr_eq(current, &updated) {
            return Ok(false);
        }
        self.pipeline = Some(updated);
        self.edited.insert(id);
        Ok(true)
    }

    /// Discards all client state and returns to the idle view.
    ///
    /// Responses to requests issued before the reset are ignored.
    pub fn reset(&mut self) {
        let next_seq = self.next_seq;
        *self = Self {
            next_seq,
            reset_floor: next_seq + 1,
            ..Self::default()
        };
    }

    /// Applies the outcome of the request behind `ticket`.
    pub fn complete(
        &mut self,
        ticket: &Ticket,
        result: Result<Response, GatewayError>,
    ) -> Result<Outcome, TransitionError> {
        let action = ticket.action();
        if ticket.seq < self.reset_floor {
            tracing::debug!(seq = ticket.seq, %action, "dropping response issued before reset");
            return Ok(Outcome::Stale);
        }

        let track = self.tracks.entry(action).or_default();
        track.pending = track.pending.saturating_sub(1);
        if let Ok(response) = &result {
            if response.action() != action {
                return Err(TransitionError::MismatchedResponse {
                    request: action,
                    response: response.action(),
                });
            }
        }
        if ticket.seq < track.latest_applied {
            tracing::info!(
                seq = ticket.seq,
                latest = track.latest_applied,
                %action,
                "dropping superseded response"
            );
            return Ok(Outcome::Stale);
        }
        track.latest_applied = ticket.seq;

        match result {
            Ok(response) => {
                self.apply(&ticket.request, response);
                Ok(Outcome::Applied)
            }
            Err(err) => {
                tracing::warn!(%action, status = err.status, detail = %err.detail, "request failed");
                if action == Action::Generate && self.view == View::Generating {
                    self.view = View::Idle;
                }
                track.error = Some(err);
                Ok(Outcome::Failed)
            }
        }
    }

    fn apply(&mut self, request: &Request, response: Response) {
        match response {
            Response::Tables(tables) => self.tables = tables,
            Response::Generated(data) => {
                self.prompt_data = Some(data);
                self.pipeline = None;
                self.edited.clear();
                self.chart = None;
                self.view = View::ResultsReady;
            }
            Response::Regenerated(data) => {
                self.prompt_data = Some(data);
                self.chart = None;
            }
            Response::QueryRan(ran) => {
                if let (Some(data), Request::RunQuery(sent)) = (self.prompt_data.as_mut(), request) {
                    data.query = sent.query.clone();
                    data.table = ran.table;
                    data.execution_time = ran.execution_time;
                }
            }
            Response::PlanFetched(plan) => {
                self.pipeline = Some(plan.pipeline);
                self.edited.clear();
                if self.view == View::ResultsReady {
                    self.view = View::PlanShown;
                }
            }
            Response::Reran(rerun) => {
                if let Some(data) = self.prompt_data.as_mut() {
                    data.query = rerun.query;
                    data.table = rerun.table;
                    data.execution_time = rerun.execution_time;
                }
                self.pipeline = Some(rerun.pipeline);
                self.edited.clear();
            }
            Response::PlotConfig(mut chart) => {
                if let (Some(spec), Some(data)) = (chart.as_object_mut(), self.prompt_data.as_ref()) {
                    let rows = data.table.iter().cloned().map(Value::Object).collect();
                    spec.insert("data".to_string(), Value::Array(rows));
                }
                self.chart = Some(chart);
            }
        }
    }

    /// Lays out the displayed plan wrapped in the prompt/query/results chain.
    pub fn plan_graph(&self, config: LayoutConfig) -> Option<GraphLayout> {
        let pipeline = self.pipeline.as_ref()?;
        let prompt_data = self.prompt_data.as_ref()?;
        let mut layout = LayoutEngine::builder(config)
            .with_prompt_chain(prompt_data)
            .build()
            .layout(pipeline);
        for node in &mut layout.nodes {
            if matches!(node.data, NodePresentation::ReadOnlyField(_)) {
                continue;
            }
            node.edited = node
                .id
                .parse::<OperatorId>()
                .is_ok_and(|id| self.edited.contains(&id));
        }
        Some(layout)
    }
}
