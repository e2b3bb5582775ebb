//! # Graph Model
//!
//! Nodes, edges and the project record that owns them. Everything here is
//! plain serde data so the same types flow through history snapshots, the
//! project store and the JSON export without conversion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::palette::{PaletteItem, UiType};

/// Label shown for nodes whose `label` is empty.
pub const DEFAULT_LABEL: &str = "Node";
/// The single node renderer variant.
pub const NODE_TYPE: &str = "custom";
/// The edge renderer variant that understands arrow types.
pub const EDGE_TYPE: &str = "directional";
/// Stacking order of a node brought to the front.
pub const FRONT_Z_INDEX: i32 = 1000;
/// Stacking order of a node sent to the back.
pub const BACK_Z_INDEX: i32 = -100;
/// Stroke color used for derived arrow markers.
pub const MARKER_COLOR: &str = "#64748b";
/// Current `Project::version`.
pub const PROJECT_SCHEMA_VERSION: u32 = 1;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a node, unique within a project and never reused.
    NodeId
);
string_id!(
    /// Identifier of an edge.
    EdgeId
);
string_id!(
    /// Identifier of a stored project (uuid v4 for projects created here).
    ProjectId
);

/// Canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Semantic role of a node inside an architecture diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeAttribute {
    MainPage,
    SubPage,
    Modal,
    Alert,
    Component,
    Trigger,
    Logic,
    Backend,
    Database,
}

impl NodeAttribute {
    pub const ALL: [NodeAttribute; 9] = [
        NodeAttribute::MainPage,
        NodeAttribute::SubPage,
        NodeAttribute::Modal,
        NodeAttribute::Alert,
        NodeAttribute::Component,
        NodeAttribute::Trigger,
        NodeAttribute::Logic,
        NodeAttribute::Backend,
        NodeAttribute::Database,
    ];

    /// The camelCase key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            NodeAttribute::MainPage => "mainPage",
            NodeAttribute::SubPage => "subPage",
            NodeAttribute::Modal => "modal",
            NodeAttribute::Alert => "alert",
            NodeAttribute::Component => "component",
            NodeAttribute::Trigger => "trigger",
            NodeAttribute::Logic => "logic",
            NodeAttribute::Backend => "backend",
            NodeAttribute::Database => "database",
        }
    }
}

/// Semantic and presentation data carried by a node.
///
/// Unknown keys are kept in `extra` so a document written by a newer editor
/// survives a load/save cycle untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_type: Option<UiType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbox_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<NodeAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

/// Field-level update for [`NodeData`]. `None` leaves a field alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub attribute: Option<NodeAttribute>,
    pub variant: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub node_width: Option<f64>,
    pub node_height: Option<f64>,
    pub text_align: Option<String>,
    pub font_weight: Option<String>,
    pub style_preset: Option<String>,
}

impl NodeDataPatch {
    pub fn apply(self, data: &mut NodeData) {
        if let Some(label) = self.label {
            data.label = label;
        }
        if self.description.is_some() {
            data.description = self.description;
        }
        if self.attribute.is_some() {
            data.attribute = self.attribute;
        }
        if self.variant.is_some() {
            data.variant = self.variant;
        }
        if self.color.is_some() {
            data.color = self.color;
        }
        if self.size.is_some() {
            data.size = self.size;
        }
        if self.node_width.is_some() {
            data.node_width = self.node_width;
        }
        if self.node_height.is_some() {
            data.node_height = self.node_height;
        }
        if self.text_align.is_some() {
            data.text_align = self.text_align;
        }
        if self.font_weight.is_some() {
            data.font_weight = self.font_weight;
        }
        if self.style_preset.is_some() {
            data.style_preset = self.style_preset;
        }
    }
}

fn default_node_type() -> String {
    NODE_TYPE.to_string()
}

fn default_edge_type() -> String {
    EDGE_TYPE.to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A placed diagram element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type", default = "default_node_type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            kind: default_node_type(),
            position,
            z_index: 0,
            data: NodeData::labeled(label),
            selected: false,
            extra: Map::new(),
        }
    }

    /// Creates a node for a palette drop. Containers stack beneath other nodes.
    pub fn from_palette(
        id: impl Into<NodeId>,
        item: &PaletteItem,
        position: Position,
        container_z_index: i32,
    ) -> Self {
        let mut node = Self::new(id, item.name_en, position);
        node.data.ui_type = item.ui_type;
        node.data.toolbox_id = Some(item.id.to_string());
        if item.ui_type == Some(UiType::Container) {
            node.z_index = container_z_index;
        }
        node
    }

    /// The label to render; never empty.
    pub fn display_label(&self) -> &str {
        let label = self.data.label.trim();
        if label.is_empty() {
            DEFAULT_LABEL
        } else {
            label
        }
    }

    /// Label for connection lists, falling back to the id.
    pub fn label_or_id(&self) -> &str {
        let label = self.data.label.trim();
        if label.is_empty() {
            self.id.as_str()
        } else {
            label
        }
    }

    pub fn toolbox_id(&self) -> Option<&str> {
        self.data.toolbox_id.as_deref()
    }
}

/// Arrow decoration of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    None,
    #[default]
    Forward,
    Backward,
    Bidirectional,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Arrow,
    #[default]
    ArrowClosed,
}

/// Rendering hint derived from [`ArrowType`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub color: String,
}

impl EdgeMarker {
    pub fn closed() -> Self {
        Self {
            kind: MarkerKind::ArrowClosed,
            color: MARKER_COLOR.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_type: Option<ArrowType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A directed connection between two nodes of the same project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type", default = "default_edge_type")]
    pub kind: String,
    /// Plain edge label as written by older documents and templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: EdgeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_start: Option<EdgeMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<EdgeMarker>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// A forward directional edge with its end marker already derived.
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        let mut edge = Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: default_edge_type(),
            label: None,
            data: EdgeData::default(),
            marker_start: None,
            marker_end: None,
            extra: Map::new(),
        };
        edge.set_arrow_type(ArrowType::Forward);
        edge
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = Some(label.into());
        self
    }

    pub fn arrow_type(&self) -> ArrowType {
        self.data.arrow_type.unwrap_or_default()
    }

    pub fn line_style(&self) -> LineStyle {
        self.data.line_style.unwrap_or_default()
    }

    /// Edge label, preferring `data.label` over the plain field.
    pub fn label(&self) -> Option<&str> {
        self.data
            .label
            .as_deref()
            .or(self.label.as_deref())
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Changes the arrow type and rederives both markers.
    pub fn set_arrow_type(&mut self, arrow: ArrowType) {
        self.data.arrow_type = Some(arrow);
        let (start, end) = match arrow {
            ArrowType::None => (false, false),
            ArrowType::Forward => (false, true),
            ArrowType::Backward => (true, false),
            ArrowType::Bidirectional => (true, true),
        };
        self.marker_start = start.then(EdgeMarker::closed);
        self.marker_end = end.then(EdgeMarker::closed);
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// The working `{nodes, edges}` pair. Also the history snapshot type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphState {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphState {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    /// Removes a node together with every edge that references it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        self.edges.retain(|e| !e.touches(id));
        Some(self.nodes.remove(index))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let index = self.edges.iter().position(|e| &e.id == id)?;
        Some(self.edges.remove(index))
    }

    /// Adds a forward edge between two existing nodes.
    ///
    /// Returns `None` when either endpoint is missing so no dangling edge is
    /// ever introduced.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Option<EdgeId> {
        if !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }
        let edge = Edge::new(EdgeId::generate(), source.clone(), target.clone());
        let id = edge.id.clone();
        self.edges.push(edge);
        Some(id)
    }

    pub fn bring_to_front(&mut self, id: &NodeId) -> bool {
        self.set_z_index(id, FRONT_Z_INDEX)
    }

    pub fn send_to_back(&mut self, id: &NodeId) -> bool {
        self.set_z_index(id, BACK_Z_INDEX)
    }

    fn set_z_index(&mut self, id: &NodeId, z_index: i32) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.z_index = z_index;
                true
            }
            None => false,
        }
    }

    pub fn selected_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.selected)
    }

    pub fn deselect_all(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
        }
    }

    /// Edges whose source or target is not a node of this graph.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| !self.contains_node(&e.source) || !self.contains_node(&e.target))
            .collect()
    }

    /// Number of nodes created from the given palette key.
    ///
    /// Nodes are keyed by `toolboxId`, then `uiType`, then label.
    pub fn usage_count(&self, key: &str) -> usize {
        self.nodes
            .iter()
            .filter(|n| {
                let node_key = n
                    .data
                    .toolbox_id
                    .as_deref()
                    .or(n.data.ui_type.map(UiType::key))
                    .unwrap_or(n.data.label.as_str());
                node_key == key
            })
            .count()
    }
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The persisted project record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    PROJECT_SCHEMA_VERSION
}

impl Project {
    /// A fresh, empty project.
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: ProjectId::generate(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            thumbnail: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            version: PROJECT_SCHEMA_VERSION,
        }
    }

    pub fn graph(&self) -> GraphState {
        GraphState::new(self.nodes.clone(), self.edges.clone())
    }

    pub fn set_graph(&mut self, graph: GraphState) {
        self.nodes = graph.nodes;
        self.edges = graph.edges;
    }

    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            thumbnail: self.thumbnail.clone(),
        }
    }
}

/// Listing entry for a stored project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> GraphState {
        let mut g = GraphState::default();
        g.nodes.push(Node::new("a", "A", Position::new(0.0, 0.0)));
        g.nodes.push(Node::new("b", "B", Position::new(10.0, 0.0)));
        g.nodes.push(Node::new("c", "C", Position::new(20.0, 0.0)));
        g.edges.push(Edge::new("e1", "a", "b"));
        g.edges.push(Edge::new("e2", "b", "c"));
        g
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut g = graph();
        let removed = g.remove_node(&NodeId::from("b"));
        assert_eq!(removed.map(|n| n.id), Some(NodeId::from("b")));
        assert!(g.edges.is_empty());
        assert!(g.dangling_edges().is_empty());
    }

    #[test]
    fn connect_refuses_missing_endpoint() {
        let mut g = graph();
        assert!(g.connect(&NodeId::from("a"), &NodeId::from("zzz")).is_none());
        assert_eq!(g.edges.len(), 2);
        assert!(g.connect(&NodeId::from("a"), &NodeId::from("c")).is_some());
        assert_eq!(g.edges.len(), 3);
    }

    #[test]
    fn layer_moves_set_fixed_z_index() {
        let mut g = graph();
        assert!(g.bring_to_front(&NodeId::from("a")));
        assert!(g.send_to_back(&NodeId::from("c")));
        assert!(!g.bring_to_front(&NodeId::from("zzz")));
        let z: Vec<i32> = g.nodes.iter().map(|n| n.z_index).collect();
        assert_eq!(z, [FRONT_Z_INDEX, 0, BACK_Z_INDEX]);
    }

    #[test]
    fn arrow_type_rederives_markers() {
        let mut edge = Edge::new("e", "a", "b");
        assert!(edge.marker_start.is_none());
        assert_eq!(edge.marker_end, Some(EdgeMarker::closed()));

        edge.set_arrow_type(ArrowType::Bidirectional);
        assert!(edge.marker_start.is_some() && edge.marker_end.is_some());

        edge.set_arrow_type(ArrowType::Backward);
        assert!(edge.marker_start.is_some());
        assert!(edge.marker_end.is_none());

        edge.set_arrow_type(ArrowType::None);
        assert!(edge.marker_start.is_none() && edge.marker_end.is_none());
    }

    #[test]
    fn node_reads_loose_document() {
        let raw = r#"{
            "id": "7",
            "position": {"x": 1.5, "y": 2},
            "data": {"label": "", "toolboxId": "navbar", "uiType": "Container", "custom": 3},
            "width": 120
        }"#;
        let node: Node = serde_json::from_str(raw).unwrap();
        assert_eq!(node.kind, NODE_TYPE);
        assert_eq!(node.display_label(), DEFAULT_LABEL);
        assert_eq!(node.label_or_id(), "7");
        assert_eq!(node.data.extra.get("custom"), Some(&Value::from(3)));
        assert_eq!(node.extra.get("width"), Some(&Value::from(120)));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["data"]["toolboxId"], "navbar");
        assert_eq!(back["width"], 120);
        assert_eq!(back["zIndex"], 0);
    }

    #[test]
    fn edge_label_prefers_data() {
        let raw = r#"{"id": "e1-2", "source": "1", "target": "2", "label": "Yes"}"#;
        let mut edge: Edge = serde_json::from_str(raw).unwrap();
        assert_eq!(edge.label(), Some("Yes"));
        assert_eq!(edge.arrow_type(), ArrowType::Forward);
        edge.data.label = Some("No".into());
        assert_eq!(edge.label(), Some("No"));
    }

    #[test]
    fn patch_merges_fields() {
        let mut data = NodeData::labeled("Old");
        data.color = Some("blue".into());
        NodeDataPatch {
            label: Some("New".into()),
            description: Some("text".into()),
            ..Default::default()
        }
        .apply(&mut data);
        assert_eq!(data.label, "New");
        assert_eq!(data.description.as_deref(), Some("text"));
        assert_eq!(data.color.as_deref(), Some("blue"));
    }
}
