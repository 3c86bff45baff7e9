//! # FlockFlow - Query Plan Inspection and Refinement
//!
//! **FlockFlow** drives a natural-language-to-SQL workflow: a prompt is turned
//! into a query and a result table by a backend service, the query's physical
//! plan can be fetched as an operator tree, LLM-function operators in that tree
//! can be edited locally, and the edited plan can be re-run.
//!
//! ## Core Workflow
//!
//! 1.  **Load or fetch a plan**: An [`Operator`](pipeline::Operator) tree comes from the backend's
//!     query-plan endpoint or from a JSON file.
//! 2.  **Lay it out**: [`LayoutEngine`](layout::LayoutEngine) places every operator on a grid and
//!     optionally wraps the tree in the prompt / query / results chain.
//! 3.  **Edit**: [`apply_field_edit`](pipeline::apply_field_edit) produces a new tree that shares
//!     every untouched subtree with the old one.
//! 4.  **Drive the views**: [`AppState`](state::AppState) owns the view transitions, per-action
//!     error slots and stale-response fencing; [`Session`](state::Session) runs it against a
//!     [`Backend`](gateway::Backend) such as [`GatewayClient`](gateway::GatewayClient).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flockflow::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let client = GatewayClient::new("http://127.0.0.1:3000")?;
//! let mut session = Session::new(client);
//!
//! session.submit_prompt("Summarize reviews per product").await?;
//! session.inspect_plan().await?;
//!
//! // Change the model of operator 3 and re-run the refined plan.
//! session
//!     .state_mut()
//!     .edit_operator_field(3, "model_name", "gpt-4o".into(), ValueKind::Raw)?;
//! session.rerun().await?;
//!
//! if let Some(graph) = session.state().plan_graph(LayoutConfig::default()) {
//!     println!("{}", NodeFormatter::format_layout(&graph));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod layout;
pub mod pipeline;
pub mod prelude;
pub mod render;
pub mod state;
