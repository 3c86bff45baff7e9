use crate::render::NodePresentation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Left,
    Right,
}

/// A positioned node, serialized in the shape a flow-diagram renderer expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub position: Position,
    pub data: NodePresentation,
    /// `"input"` for the chain head, `"output"` for the results sink.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_position: Option<Handle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_position: Option<Handle>,
    /// Set when the operator carries local edits not yet rerun.
    pub edited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub animated: bool,
}

impl GraphEdge {
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            id: format!("e{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            animated: true,
        }
    }
}

/// The complete output of one layout run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphLayout {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphLayout {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }
}
