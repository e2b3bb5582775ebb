use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Edge, GraphState, Node};

/// Format version written into every snapshot file.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// The canonical JSON backup of a working graph.
///
/// Older files call the timestamp `lastSaved`; both spellings are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub version: String,
    #[serde(alias = "lastSaved")]
    pub exported_at: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new(graph: &GraphState) -> Self {
        Self::at(graph, Utc::now())
    }

    pub fn at(graph: &GraphState, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            nodes: graph.nodes.clone(),
            edges: graph.edges.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn into_graph(self) -> GraphState {
        GraphState::new(self.nodes, self.edges)
    }
}

/// Which fields an imported file must carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Full backup: both `nodes` and `edges` arrays are required.
    #[default]
    Backup,
    /// Quick snapshot: `nodes` is required, a missing `edges` means no edges.
    Snapshot,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

fn invalid(msg: impl Into<String>) -> ImportError {
    ImportError::InvalidFormat(msg.into())
}

/// Parses and validates an imported file without touching any live state.
///
/// Edges that point at nodes missing from the file are dropped.
pub fn parse_graph(text: &str, policy: ImportPolicy) -> Result<GraphState, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| invalid(format!("not valid JSON: {e}")))?;
    let Value::Object(mut root) = value else {
        return Err(invalid("expected a JSON object"));
    };

    let nodes = match root.remove("nodes") {
        Some(v @ Value::Array(_)) => v,
        _ => return Err(invalid("missing `nodes` array")),
    };
    let edges = match (root.remove("edges"), policy) {
        (Some(v @ Value::Array(_)), _) => v,
        (None | Some(Value::Null), ImportPolicy::Snapshot) => Value::Array(Vec::new()),
        _ => return Err(invalid("missing `edges` array")),
    };

    let nodes: Vec<Node> =
        serde_json::from_value(nodes).map_err(|e| invalid(format!("malformed node: {e}")))?;
    let edges: Vec<Edge> =
        serde_json::from_value(edges).map_err(|e| invalid(format!("malformed edge: {e}")))?;

    let mut graph = GraphState::new(nodes, edges);
    let before = graph.edges.len();
    let known: std::collections::HashSet<_> = graph.nodes.iter().map(|n| n.id.clone()).collect();
    graph
        .edges
        .retain(|e| known.contains(&e.source) && known.contains(&e.target));
    if graph.edges.len() != before {
        tracing::warn!(
            dropped = before - graph.edges.len(),
            "Dropped imported edges with unknown endpoints"
        );
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_policy_defaults_edges() {
        let g = parse_graph(r#"{"nodes": []}"#, ImportPolicy::Snapshot).unwrap();
        assert!(g.is_empty());
        assert!(parse_graph(r#"{"nodes": []}"#, ImportPolicy::Backup).is_err());
    }

    #[test]
    fn rejects_non_array_nodes() {
        for text in [r#"{"nodes": {}, "edges": []}"#, r#"[1,2]"#, "nope", r#"{"edges": []}"#] {
            let err = parse_graph(text, ImportPolicy::Backup).unwrap_err();
            assert!(matches!(err, ImportError::InvalidFormat(_)), "{text}");
        }
    }

    #[test]
    fn accepts_last_saved_alias() {
        let text = r#"{"version":"1.0","lastSaved":"2024-01-01T00:00:00.000Z","nodes":[],"edges":[]}"#;
        let snap: GraphSnapshot = serde_json::from_str(text).unwrap();
        assert_eq!(snap.exported_at, "2024-01-01T00:00:00.000Z");
    }
}
