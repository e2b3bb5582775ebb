//! Starter diagrams offered by the new-project wizard.

use serde_json::Value;

use crate::model::{Edge, GraphState, Node, Position};

/// A node row: id, x, y, label, role tag.
type NodeRow = (&'static str, f64, f64, &'static str, &'static str);
/// An edge row: source, target, label, animated.
type EdgeRow = (&'static str, &'static str, Option<&'static str>, bool);

#[derive(Clone, Copy, Debug)]
pub struct ProjectTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    nodes: &'static [NodeRow],
    edges: &'static [EdgeRow],
}

impl ProjectTemplate {
    /// Builds a fresh graph from the template.
    pub fn build(&self) -> GraphState {
        let nodes = self
            .nodes
            .iter()
            .map(|&(id, x, y, label, role)| {
                let mut node = Node::new(id, label, Position::new(x, y));
                node.data
                    .extra
                    .insert("type".to_string(), Value::from(role));
                node
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|&(source, target, label, animated)| {
                let mut edge = Edge::new(format!("e{source}-{target}"), source, target);
                if let Some(label) = label {
                    edge = edge.with_label(label);
                }
                if animated {
                    edge.extra.insert("animated".to_string(), Value::Bool(true));
                }
                edge
            })
            .collect();

        GraphState::new(nodes, edges)
    }
}

pub fn find(key: &str) -> Option<&'static ProjectTemplate> {
    TEMPLATES.iter().find(|t| t.key == key)
}

pub static TEMPLATES: &[ProjectTemplate] = &[
    ProjectTemplate {
        key: "landing",
        name: "Landing Page",
        description: "Marketing site with high conversion focus",
        nodes: &[
            ("1", 250.0, 0.0, "Visitor arrives", "Trigger"),
            ("2", 250.0, 100.0, "Hero Section", "View"),
            ("3", 250.0, 200.0, "Features", "View"),
            ("4", 250.0, 300.0, "Pricing", "View"),
            ("5", 250.0, 400.0, "Contact Form", "View"),
            ("6", 450.0, 400.0, "API: Submit Lead", "Backend"),
        ],
        edges: &[
            ("1", "2", None, true),
            ("2", "3", None, false),
            ("3", "4", None, false),
            ("4", "5", None, false),
            ("5", "6", None, true),
        ],
    },
    ProjectTemplate {
        key: "crm",
        name: "CRM System",
        description: "Admin dashboard for customer management",
        nodes: &[
            ("1", 250.0, 0.0, "Admin Login", "Trigger"),
            ("2", 250.0, 100.0, "Dashboard", "View"),
            ("3", 100.0, 200.0, "Customer List", "View"),
            ("4", 400.0, 200.0, "Settings", "View"),
            ("5", 100.0, 300.0, "DB: Users", "Database"),
        ],
        edges: &[
            ("1", "2", None, true),
            ("2", "3", None, false),
            ("2", "4", None, false),
            ("3", "5", None, true),
        ],
    },
    ProjectTemplate {
        key: "game",
        name: "Mini Game",
        description: "Web-based game logic loop",
        nodes: &[
            ("1", 250.0, 0.0, "Game Start", "Trigger"),
            ("2", 250.0, 100.0, "Main Menu", "View"),
            ("3", 250.0, 200.0, "Game Loop", "Logic"),
            ("4", 450.0, 300.0, "Save Score", "Backend"),
        ],
        edges: &[
            ("1", "2", None, false),
            ("2", "3", None, true),
            ("3", "4", None, true),
        ],
    },
    ProjectTemplate {
        key: "mindmap",
        name: "Mind Map",
        description: "Central idea with radiating branches",
        nodes: &[
            ("1", 250.0, 150.0, "Central Idea", "Core"),
            ("2", 50.0, 50.0, "Branch 1", "Topic"),
            ("3", 450.0, 50.0, "Branch 2", "Topic"),
            ("4", 50.0, 300.0, "Branch 3", "Topic"),
            ("5", 450.0, 300.0, "Branch 4", "Topic"),
        ],
        edges: &[
            ("1", "2", None, false),
            ("1", "3", None, false),
            ("1", "4", None, false),
            ("1", "5", None, false),
        ],
    },
    ProjectTemplate {
        key: "flowchart",
        name: "Flowchart",
        description: "Process logic with decision points",
        nodes: &[
            ("1", 250.0, 0.0, "Start", "Trigger"),
            ("2", 250.0, 100.0, "Process A", "Action"),
            ("3", 250.0, 200.0, "Decision?", "Logic"),
            ("4", 100.0, 300.0, "Option Yes", "Action"),
            ("5", 400.0, 300.0, "Option No", "Action"),
            ("6", 250.0, 400.0, "End", "Trigger"),
        ],
        edges: &[
            ("1", "2", None, true),
            ("2", "3", None, true),
            ("3", "4", Some("Yes"), false),
            ("3", "5", Some("No"), false),
            ("4", "6", None, true),
            ("5", "6", None, true),
        ],
    },
    ProjectTemplate {
        key: "sitemap",
        name: "Sitemap",
        description: "Hierarchical website structure",
        nodes: &[
            ("1", 300.0, 0.0, "Home Page", "Root"),
            ("2", 100.0, 150.0, "About", "Page"),
            ("3", 300.0, 150.0, "Products", "Page"),
            ("4", 500.0, 150.0, "Contact", "Page"),
            ("5", 200.0, 300.0, "Product A", "Subpage"),
            ("6", 400.0, 300.0, "Product B", "Subpage"),
        ],
        edges: &[
            ("1", "2", None, false),
            ("1", "3", None, false),
            ("1", "4", None, false),
            ("3", "5", None, false),
            ("3", "6", None, false),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_have_no_dangling_edges() {
        for template in TEMPLATES {
            let graph = template.build();
            assert!(graph.dangling_edges().is_empty(), "{}", template.key);
            assert!(!graph.nodes.is_empty());
        }
    }

    #[test]
    fn flowchart_keeps_decision_labels() {
        let graph = find("flowchart").unwrap().build();
        let labels: Vec<_> = graph.edges.iter().filter_map(|e| e.label()).collect();
        assert_eq!(labels, vec!["Yes", "No"]);
    }
}
