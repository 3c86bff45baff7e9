//! Turns an operator tree into positioned graph nodes and edges.
//!
//! The layout is a pure function of its inputs: a depth-first pre-order walk
//! places each operator one column right of its parent and fans siblings out
//! symmetrically around the parent's row.
//!
//! ```rust
//! use flockflow::prelude::*;
//!
//! let tree = Operator::from_json(r#"{"id": 0, "name": "Sink", "children": [
//!     {"id": 1, "name": "Scan", "children": []}
//! ]}"#).unwrap();
//!
//! let layout = LayoutEngine::builder(LayoutConfig::default()).build().layout(&tree);
//! assert_eq!(layout.nodes.len(), 2);
//! assert_eq!(layout.edge_ids(), vec!["e0-1"]);
//! ```

mod graph;

pub use graph::*;

use crate::pipeline::{Operator, OperatorId, PromptData};
use crate::render::{NodePresentation, QUERY_LABEL, RESULTS_LABEL, USER_PROMPT_LABEL};

/// Horizontal distance between two tree depths.
pub const COLUMN_WIDTH: f64 = 300.0;
/// Vertical distance between two adjacent siblings.
pub const ROW_HEIGHT: f64 = 250.0;

/// Id of the synthetic prompt node heading the inspection chain.
pub const USER_PROMPT_ID: OperatorId = -1;
/// Id of the synthetic query node between the prompt and the real root.
pub const QUERY_ID: OperatorId = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub column_width: f64,
    pub row_height: f64,
    pub origin: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: COLUMN_WIDTH,
            row_height: ROW_HEIGHT,
            origin: Position { x: 0.0, y: 0.0 },
        }
    }
}

pub struct LayoutEngine<'a> {
    config: LayoutConfig,
    prompt_chain: Option<&'a PromptData>,
}

pub struct LayoutEngineBuilder<'a> {
    config: LayoutConfig,
    prompt_chain: Option<&'a PromptData>,
}

impl<'a> LayoutEngineBuilder<'a> {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            prompt_chain: None,
        }
    }

    /// Wraps the tree in the inspection chain: a "User Prompt" node feeding a
    /// "Query" node feeding the root, and a "Results" node after the deepest operator.
    pub fn with_prompt_chain(mut self, prompt_data: &'a PromptData) -> Self {
        self.prompt_chain = Some(prompt_data);
        self
    }

    pub fn build(self) -> LayoutEngine<'a> {
        LayoutEngine {
            config: self.config,
            prompt_chain: self.prompt_chain,
        }
    }
}

impl<'a> LayoutEngine<'a> {
    pub fn builder(config: LayoutConfig) -> LayoutEngineBuilder<'a> {
        LayoutEngineBuilder::new(config)
    }

    /// Lays out `tree`, wrapped in the inspection chain when one was configured.
    ///
    /// The chain reserves ids -1 and 0. A real operator carrying either id is
    /// still emitted under it, so the graph then holds two nodes with that id
    /// (and, for a root with id 0, an `e0-0` edge); a warning is logged.
    pub fn layout(&self, tree: &Operator) -> GraphLayout {
        let mut walker = Walker::new(self.config);
        let origin_y = self.config.origin.y;

        let Some(prompt_data) = self.prompt_chain else {
            walker.visit(tree, 0, origin_y, None);
            return walker.finish();
        };

        for reserved in [USER_PROMPT_ID, QUERY_ID] {
            if tree.find(reserved).is_some() {
                tracing::warn!(
                    id = reserved,
                    "operator id collides with a synthetic inspection node"
                );
            }
        }

        let prompt = Operator::new(USER_PROMPT_ID, USER_PROMPT_LABEL)
            .with_description(prompt_data.prompt.clone());
        let query =
            Operator::new(QUERY_ID, QUERY_LABEL).with_description(prompt_data.query.clone());

        let prompt_id = walker.place(&prompt, 0, origin_y, None);
        walker.nodes[0].node_type = Some("input");
        let query_id = walker.place(&query, 1, origin_y, Some(&prompt_id));
        walker.visit(tree, 2, origin_y, Some(&query_id));

        // The walk always produced at least the root, so `deepest` is set.
        if let Some((deepest_id, deepest_y)) = walker.deepest.clone() {
            let results = Operator::new(walker.max_id.max(QUERY_ID) + 1, RESULTS_LABEL)
                .with_data(prompt_data.table.clone())
                .with_metrics(prompt_data.execution_time);
            let depth = walker.max_depth + 1;
            let results_id = walker.place(&results, depth, deepest_y, Some(&deepest_id));
            if let Some(node) = walker.nodes.last_mut() {
                node.node_type = Some("output");
                node.source_position = None;
            }
            tracing::debug!(results = %results_id, after = %deepest_id, "appended results node");
        }

        walker.finish()
    }
}

/// Accumulates nodes and edges during one traversal.
struct Walker {
    config: LayoutConfig,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    max_depth: usize,
    /// First node reached at `max_depth`, with its vertical position.
    deepest: Option<(String, f64)>,
    max_id: OperatorId,
}

impl Walker {
    fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            max_depth: 0,
            deepest: None,
            max_id: OperatorId::MIN,
        }
    }

    /// Places `operator` and, recursively, its children.
    fn visit(&mut self, operator: &Operator, depth: usize, y: f64, parent: Option<&str>) {
        let id = self.place(operator, depth, y, parent);
        self.max_id = self.max_id.max(operator.id);
        if self.deepest.is_none() || depth > self.max_depth {
            self.max_depth = depth;
            self.deepest = Some((id.clone(), y));
        }

        let k = operator.children.len();
        if k == 0 {
            return;
        }
        let offset = (k as f64 - 1.0) / 2.0;
        for (i, child) in operator.children.iter().enumerate() {
            let child_y = y + (offset - i as f64) * self.config.row_height;
            self.visit(child, depth + 1, child_y, Some(&id));
        }
    }

    /// Emits the node record for `operator` and the edge from its parent.
    fn place(&mut self, operator: &Operator, depth: usize, y: f64, parent: Option<&str>) -> String {
        let id = operator.id.to_string();
        let x = self.config.origin.x + depth as f64 * self.config.column_width;
        self.nodes.push(GraphNode {
            id: id.clone(),
            position: Position { x, y },
            data: NodePresentation::dispatch(operator),
            node_type: None,
            source_position: Some(Handle::Right),
            target_position: parent.map(|_| Handle::Left),
            edited: false,
        });
        if let Some(parent_id) = parent {
            self.edges.push(GraphEdge::between(parent_id, &id));
        }
        id
    }

    fn finish(self) -> GraphLayout {
        GraphLayout {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
