//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to load a plan, lay it out, edit it
//! and drive the views against a backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use flockflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let tree = Operator::from_file("path/to/pipeline.json")?;
//! let edited = apply_field_edit(&tree, 2, "batch_size", "16".into(), ValueKind::Number);
//!
//! let layout = LayoutEngine::builder(LayoutConfig::default()).build().layout(&edited);
//! println!("{}", NodeFormatter::format_layout(&layout));
//! # Ok(())
//! # }
//! ```

// Tree model and editing
pub use crate::pipeline::{
    FunctionParams, Operator, OperatorId, Pipeline, PromptData, Row, TupleFormat, ValueKind,
    apply_field_edit,
};

// Layout and presentation
pub use crate::layout::{GraphEdge, GraphLayout, GraphNode, LayoutConfig, LayoutEngine};
pub use crate::render::{NodeFormatter, NodePresentation};

// Views and backend
pub use crate::config::GatewayConfig;
pub use crate::gateway::{Backend, GatewayClient, Request, Response};
pub use crate::state::{Action, AppState, Outcome, Session, View};

// Error types
pub use crate::error::{ExportError, GatewayError, PipelineError, TransitionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
