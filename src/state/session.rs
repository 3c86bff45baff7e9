use super::{Action, AppState, Outcome, Ticket};
use crate::error::TransitionError;
use crate::gateway::Backend;

/// Drives an [`AppState`] against a [`Backend`], one awaited request at a time.
///
/// Concurrent callers should use the `begin_*`/`complete` pair on [`AppState`]
/// directly; this wrapper is the sequential convenience.
#[derive(Debug)]
pub struct Session<B> {
    state: AppState,
    backend: B,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: AppState::new(),
            backend,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn run(&mut self, ticket: Ticket) -> Result<Outcome, TransitionError> {
        let result = self.backend.send(ticket.request.clone()).await;
        self.state.complete(&ticket, result)
    }

    pub async fn refresh_tables(&mut self) -> Result<Outcome, TransitionError> {
        let ticket = self.state.begin_refresh_tables();
        self.run(ticket).await
    }

    pub async fn submit_prompt(&mut self, prompt: &str) -> Result<Outcome, TransitionError> {
        let ticket = self.state.begin_generate(prompt)?;
        self.run(ticket).await
    }

    pub async fn regenerate(&mut self, prompt: &str, query: &str) -> Result<Outcome, TransitionError> {
        let ticket = self.state.begin_regenerate(prompt, query)?;
        self.run(ticket).await
    }

    pub async fn run_query(&mut self, query: &str) -> Result<Outcome, TransitionError> {
        let ticket = self.state.begin_run_query(query)?;
        self.run(ticket).await
    }

    pub async fn inspect_plan(&mut self) -> Result<Outcome, TransitionError> {
        let ticket = self.state.begin_inspect_plan()?;
        self.run(ticket).await
    }

    pub async fn rerun(&mut self) -> Result<Outcome, TransitionError> {
        let ticket = self.state.begin_rerun()?;
        self.run(ticket).await
    }

    pub async fn generate_plot_config(&mut self) -> Result<Outcome, TransitionError> {
        let ticket = self.state.begin_plot_config()?;
        self.run(ticket).await
    }

    pub async fn retry(&mut self, action: Action) -> Result<Outcome, TransitionError> {
        let ticket = self.state.retry(action)?;
        self.run(ticket).await
    }
}
