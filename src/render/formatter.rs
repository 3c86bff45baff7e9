use super::presentation::NodePresentation;
use crate::layout::GraphLayout;
use itertools::Itertools;

/// Formats laid-out graphs into human-readable text.
pub struct NodeFormatter;

impl NodeFormatter {
    /// One block per node in layout order, followed by the edge list.
    pub fn format_layout(layout: &GraphLayout) -> String {
        let mut out = String::new();
        for node in &layout.nodes {
            let marker = if node.edited { " *edited*" } else { "" };
            out.push_str(&format!(
                "[{}] @ ({}, {}){}\n",
                node.id,
                Self::format_coord(node.position.x),
                Self::format_coord(node.position.y),
                marker
            ));
            for line in Self::format_presentation(&node.data).lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        if !layout.edges.is_empty() {
            let edges = layout
                .edges
                .iter()
                .map(|e| format!("{} -> {}", e.source, e.target))
                .join(", ");
            out.push_str(&format!("edges: {}\n", edges));
        }
        out
    }

    /// Format a single presentation.
    pub fn format_presentation(presentation: &NodePresentation) -> String {
        match presentation {
            NodePresentation::FunctionEditor(editor) => {
                let batch = editor
                    .batch_size
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "Auto".to_string());
                let columns = editor.columns.iter().map(|c| c.name.as_str()).join(", ");
                format!(
                    "{} (function)\nmodel: {}\nprompt: {}\ncolumns: [{}]\nbatch size: {}\ntuple format: {}",
                    editor.name,
                    editor.model_name,
                    editor.prompt,
                    columns,
                    batch,
                    editor.tuple_format
                )
            }
            NodePresentation::ResultsTable(table) => {
                let timing = table
                    .execution_time
                    .map(|t| format!("{} s", t))
                    .unwrap_or_else(|| "n/a".to_string());
                format!(
                    "{}\nexecution time: {}\n{} rows [{}]",
                    table.title,
                    timing,
                    table.rows.len(),
                    table.columns.join(", ")
                )
            }
            NodePresentation::ReadOnlyField(field) => format!("{}: {}", field.title, field.value),
            NodePresentation::Structural(op) => {
                if op.description.is_empty() {
                    op.name.clone()
                } else {
                    format!("{}\n{}", op.name, op.description)
                }
            }
        }
    }

    fn format_coord(n: f64) -> String {
        if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        }
    }
}
