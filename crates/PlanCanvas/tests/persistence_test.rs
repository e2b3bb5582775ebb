use plan_canvas::model::{ArrowType, Edge, LineStyle, NodeAttribute};
use plan_canvas::palette;
use plan_canvas::persistence::{GraphSnapshot, ImportError, ImportPolicy, parse_graph};
use plan_canvas::{GraphState, Node, Position};

#[test]
fn test_save_and_load() {
    // 1. Setup Graph
    let mut graph = GraphState::default();
    let item = palette::find("navbar").unwrap();
    let mut nav = Node::from_palette("dndnode_0", item, Position::new(10.0, 20.0), -10);
    nav.data.attribute = Some(NodeAttribute::MainPage);
    nav.data.description = Some("Top bar".into());
    graph.nodes.push(nav);
    graph.nodes.push(Node::new("dndnode_1", "Sign in", Position::new(10.0, 120.0)));

    let mut edge = Edge::new("e0-1", "dndnode_0", "dndnode_1").with_label("opens");
    edge.set_arrow_type(ArrowType::Bidirectional);
    edge.data.line_style = Some(LineStyle::Dashed);
    graph.edges.push(edge);

    // 2. Export
    let json = GraphSnapshot::new(&graph).to_json_pretty().unwrap();
    assert!(json.contains("\"version\": \"1.0\""));
    assert!(json.contains("\"exportedAt\""));

    // 3. Import
    let loaded = parse_graph(&json, ImportPolicy::Backup).unwrap();

    // 4. Verify
    assert_eq!(loaded, graph);
    assert_eq!(loaded.nodes[0].z_index, -10);
}

#[test]
fn test_import_without_nodes_is_invalid() {
    let err = parse_graph(r#"{"version":"1.0","edges":[]}"#, ImportPolicy::Snapshot).unwrap_err();
    let ImportError::InvalidFormat(msg) = err;
    assert!(msg.contains("nodes"));
}

#[test]
fn test_import_drops_dangling_edges() {
    let text = r#"{
        "nodes": [{"id": "a", "position": {"x": 0, "y": 0}, "data": {"label": "A"}}],
        "edges": [{"id": "x", "source": "a", "target": "ghost"}]
    }"#;
    let graph = parse_graph(text, ImportPolicy::Backup).unwrap();
    assert_eq!(graph.nodes.len(), 1);
    assert!(graph.edges.is_empty());
}
