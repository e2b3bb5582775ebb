use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::model::{EdgeId, Edge, GraphState, Node, NodeId};

/// Deep copy of the selected nodes and the edges running between them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipboardData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ClipboardData {
    /// Captures the currently selected nodes. Returns `None` when nothing is selected.
    pub fn capture(graph: &GraphState) -> Option<Self> {
        let nodes: Vec<Node> = graph.selected_nodes().cloned().collect();
        if nodes.is_empty() {
            return None;
        }

        let ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        let edges = graph
            .edges
            .iter()
            .filter(|e| ids.contains(&e.source) && ids.contains(&e.target))
            .cloned()
            .collect();

        Some(Self { nodes, edges })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends fresh copies of the captured nodes to `graph`.
    ///
    /// Every copy gets a new id and is shifted by `(offset, offset)`. The
    /// copies become the only selected nodes. Captured edges are re-pointed at
    /// the copies. Returns the ids of the new nodes in capture order.
    pub fn paste_into(&self, graph: &mut GraphState, offset: f64) -> Vec<NodeId> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        graph.deselect_all();

        let mut id_map: HashMap<&NodeId, NodeId> = HashMap::new();
        let mut pasted = Vec::with_capacity(self.nodes.len());

        for original in &self.nodes {
            let mut node = original.clone();
            node.id = unique_node_id(graph);
            node.position = original.position.offset(offset, offset);
            node.selected = true;

            id_map.insert(&original.id, node.id.clone());
            pasted.push(node.id.clone());
            graph.nodes.push(node);
        }

        for edge in &self.edges {
            if let (Some(source), Some(target)) = (id_map.get(&edge.source), id_map.get(&edge.target)) {
                let mut copy = edge.clone();
                copy.id = EdgeId::generate();
                copy.source = source.clone();
                copy.target = target.clone();
                graph.edges.push(copy);
            }
        }

        pasted
    }
}

fn unique_node_id(graph: &GraphState) -> NodeId {
    loop {
        let id = NodeId::generate();
        if !graph.contains_node(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    #[test]
    fn capture_skips_edges_leaving_selection() {
        let mut g = GraphState::default();
        for (id, x) in [("a", 0.0), ("b", 100.0), ("c", 200.0)] {
            g.nodes.push(Node::new(id, id, Position::new(x, 0.0)));
        }
        g.edges.push(Edge::new("ab", "a", "b"));
        g.edges.push(Edge::new("bc", "b", "c"));
        g.nodes[0].selected = true;
        g.nodes[1].selected = true;

        let clip = ClipboardData::capture(&g).unwrap();
        assert_eq!(clip.nodes.len(), 2);
        assert_eq!(clip.edges.len(), 1);
        assert_eq!(clip.edges[0].id, EdgeId::from("ab"));
    }

    #[test]
    fn nothing_selected_captures_nothing() {
        let mut g = GraphState::default();
        g.nodes.push(Node::new("a", "A", Position::default()));
        assert!(ClipboardData::capture(&g).is_none());
    }
}
