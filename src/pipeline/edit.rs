//! Field-level edits on an immutable operator tree.
//!
//! An edit produces a new root. The matched operator and every ancestor on the
//! path to it are fresh allocations; all other subtrees are the same `Arc`s as
//! in the input, so `Arc::ptr_eq` tells a renderer exactly what changed.

use super::operator::{Operator, OperatorId, Pipeline};
use serde_json::Value;
use std::sync::Arc;

/// How a raw edited value is coerced before it is stored in `params`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Store the value unchanged.
    #[default]
    Raw,
    /// Coerce to a JSON number; unusable input becomes `null` (unset).
    Number,
}

impl ValueKind {
    pub fn coerce(self, raw: Value) -> Value {
        match self {
            ValueKind::Raw => raw,
            ValueKind::Number => coerce_number(raw),
        }
    }
}

fn coerce_number(raw: Value) -> Value {
    match raw {
        Value::Number(_) => raw,
        Value::Bool(b) => Value::from(u8::from(b)),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                Value::from(int)
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        _ => Value::Null,
    }
}

/// Sets `params[field]` on the first operator (depth-first pre-order) whose id is `id`.
///
/// Returns the input root itself when nothing matches.
pub fn apply_field_edit(
    tree: &Pipeline,
    id: OperatorId,
    field: &str,
    raw: Value,
    kind: ValueKind,
) -> Pipeline {
    let value = kind.coerce(raw);
    rebuild_path(tree, id, field, &value).unwrap_or_else(|| Arc::clone(tree))
}

/// Returns the replacement for `node` if the edit landed inside its subtree.
fn rebuild_path(node: &Arc<Operator>, id: OperatorId, field: &str, value: &Value) -> Option<Arc<Operator>> {
    if node.id == id {
        let mut edited = Operator::clone(node);
        edited.params.insert(field.to_string(), value.clone());
        return Some(Arc::new(edited));
    }

    node.children.iter().enumerate().find_map(|(index, child)| {
        rebuild_path(child, id, field, value).map(|replacement| {
            let mut parent = Operator::clone(node);
            parent.children[index] = replacement;
            Arc::new(parent)
        })
    })
}
