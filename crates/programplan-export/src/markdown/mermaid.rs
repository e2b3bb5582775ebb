//! Mermaid `graph TD` output and the plain connection list.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use plan_canvas::model::{ArrowType, Edge, LineStyle, Node};

const RESERVED: &[&str] = &[
    "end", "graph", "flowchart", "subgraph", "style", "class", "classdef", "click", "linkstyle",
    "direction",
];

/// Maps node ids to identifiers Mermaid accepts, keeping them unique.
pub struct MermaidIds<'a> {
    ids: HashMap<&'a str, String>,
}

impl<'a> MermaidIds<'a> {
    pub fn new(nodes: &[&'a Node]) -> Self {
        let mut taken = HashSet::new();
        let mut ids = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let base = sanitize(node.id.as_str());
            let mut candidate = base.clone();
            let mut n = 1;
            while !taken.insert(candidate.clone()) {
                n += 1;
                candidate = format!("{base}_{n}");
            }
            ids.insert(node.id.as_str(), candidate);
        }
        Self { ids }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.ids.get(id).map(String::as_str)
    }
}

fn sanitize(id: &str) -> String {
    let mut out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || RESERVED.contains(&out.to_ascii_lowercase().as_str()) {
        out.insert_str(0, "n_");
    }
    out
}

fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;")
        .replace('|', "#124;")
        .replace(['\n', '\r'], " ")
}

fn arrow(edge: &Edge) -> &'static str {
    let dashed = edge.line_style() != LineStyle::Solid;
    match (edge.arrow_type(), dashed) {
        (ArrowType::None, false) => "---",
        (ArrowType::None, true) => "-.-",
        (ArrowType::Bidirectional, false) => "<-->",
        (ArrowType::Bidirectional, true) => "<-.->",
        (ArrowType::Forward | ArrowType::Backward, false) => "-->",
        (ArrowType::Forward | ArrowType::Backward, true) => "-.->",
    }
}

/// Body of the fenced `mermaid` block, or `None` when there are no drawable edges.
pub fn flow_diagram(ordered: &[&Node], edges: &[Edge]) -> Option<String> {
    let ids = MermaidIds::new(ordered);
    let mut lines = Vec::new();

    for edge in edges {
        let (Some(source), Some(target)) = (ids.get(edge.source.as_str()), ids.get(edge.target.as_str()))
        else {
            continue;
        };
        // Backward edges point from target to source.
        let (from, to) = match edge.arrow_type() {
            ArrowType::Backward => (target, source),
            _ => (source, target),
        };
        let line = match edge.label() {
            Some(label) => format!("    {from} {}|{}| {to}", arrow(edge), escape_label(label)),
            None => format!("    {from} {} {to}", arrow(edge)),
        };
        lines.push(line);
    }

    if lines.is_empty() {
        return None;
    }

    let mut out = String::from("graph TD\n");
    for node in ordered {
        if let Some(id) = ids.get(node.id.as_str()) {
            let _ = writeln!(out, "    {id}[\"{}\"]", escape_label(node.display_label()));
        }
    }
    out.push_str(&lines.join("\n"));
    out.push('\n');
    Some(out)
}

/// `- Source → Target (label)` for every edge, using labels for readability.
pub fn connection_list(nodes: &[&Node], edges: &[Edge]) -> Vec<String> {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), *n)).collect();
    let name = |id: &str| -> String {
        by_id
            .get(id)
            .map(|n| n.label_or_id().to_string())
            .unwrap_or_else(|| id.to_string())
    };

    edges
        .iter()
        .map(|edge| {
            let mut line = format!("- {} → {}", name(edge.source.as_str()), name(edge.target.as_str()));
            if let Some(label) = edge.label() {
                let _ = write!(line, " ({label})");
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_canvas::model::Position;

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("1", "Login", Position::new(0.0, 0.0)),
            Node::new("end", "", Position::new(0.0, 100.0)),
            Node::new("a-b", "Pay \"now\"", Position::new(0.0, 200.0)),
        ]
    }

    #[test]
    fn ids_are_sanitized_and_unique() {
        let owned = vec![
            Node::new("a-b", "x", Position::default()),
            Node::new("a_b", "y", Position::default()),
            Node::new("End", "z", Position::default()),
        ];
        let refs: Vec<&Node> = owned.iter().collect();
        let ids = MermaidIds::new(&refs);
        assert_eq!(ids.get("a-b"), Some("a_b"));
        assert_eq!(ids.get("a_b"), Some("a_b_2"));
        assert_eq!(ids.get("End"), Some("n_End"));
    }

    #[test]
    fn arrows_follow_edge_style() {
        let owned = nodes();
        let refs: Vec<&Node> = owned.iter().collect();

        let mut back = Edge::new("e1", "1", "end");
        back.set_arrow_type(ArrowType::Backward);
        let mut dashed = Edge::new("e2", "end", "a-b").with_label("a|b");
        dashed.data.line_style = Some(LineStyle::Dashed);

        let out = flow_diagram(&refs, &[back, dashed]).unwrap();
        assert!(out.starts_with("graph TD\n"));
        assert!(out.contains("    1[\"Login\"]"));
        assert!(out.contains("    n_end[\"Node\"]"));
        assert!(out.contains("    a_b[\"Pay #quot;now#quot;\"]"));
        assert!(out.contains("    n_end --> 1"));
        assert!(out.contains("    n_end -.->|a#124;b| a_b"));
    }

    #[test]
    fn no_edges_no_diagram() {
        let owned = nodes();
        let refs: Vec<&Node> = owned.iter().collect();
        assert!(flow_diagram(&refs, &[]).is_none());
    }

    #[test]
    fn connection_list_falls_back_to_id() {
        let owned = nodes();
        let refs: Vec<&Node> = owned.iter().collect();
        let edges = vec![Edge::new("e", "1", "end").with_label("Yes")];
        assert_eq!(connection_list(&refs, &edges), vec!["- Login → end (Yes)"]);
    }
}
