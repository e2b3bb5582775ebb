//! Reading order and edge-derived hierarchy.

use std::collections::{HashMap, HashSet};

use plan_canvas::model::{Edge, Node};

/// Sorts nodes top-to-bottom, then left-to-right within a row.
///
/// A row starts at the topmost remaining node; every node whose `y` lies
/// less than `row_threshold` below that anchor joins the row.
pub fn reading_order(nodes: &[Node], row_threshold: f64) -> Vec<&Node> {
    let mut by_y: Vec<(usize, &Node)> = nodes.iter().enumerate().collect();
    by_y.sort_by(|(ia, a), (ib, b)| {
        a.position
            .y
            .total_cmp(&b.position.y)
            .then_with(|| a.position.x.total_cmp(&b.position.x))
            .then_with(|| ia.cmp(ib))
    });

    let mut ordered = Vec::with_capacity(nodes.len());
    let mut row: Vec<(usize, &Node)> = Vec::new();
    let mut anchor = f64::NEG_INFINITY;

    for entry in by_y {
        if row.is_empty() || entry.1.position.y - anchor >= row_threshold {
            flush_row(&mut row, &mut ordered);
            anchor = entry.1.position.y;
        }
        row.push(entry);
    }
    flush_row(&mut row, &mut ordered);
    ordered
}

fn flush_row<'a>(row: &mut Vec<(usize, &'a Node)>, out: &mut Vec<&'a Node>) {
    row.sort_by(|(ia, a), (ib, b)| {
        a.position
            .x
            .total_cmp(&b.position.x)
            .then_with(|| ia.cmp(ib))
    });
    out.extend(row.drain(..).map(|(_, node)| node));
}

/// A child reached over one edge.
#[derive(Clone, Copy, Debug)]
pub struct Child<'a> {
    pub node: &'a Node,
    pub label: Option<&'a str>,
}

/// Parent/child structure implied by the edges.
///
/// Roots have outgoing edges but no incoming one. Orphans have no edges at
/// all. Nodes that only sit on cycles are neither and are picked up by
/// [`Hierarchy::unreached`] after the roots have been walked.
#[derive(Debug)]
pub struct Hierarchy<'a> {
    children: HashMap<&'a str, Vec<Child<'a>>>,
    parents: HashMap<&'a str, &'a str>,
    pub roots: Vec<&'a Node>,
    pub orphans: Vec<&'a Node>,
    connected: Vec<&'a Node>,
}

impl<'a> Hierarchy<'a> {
    /// `ordered` must already be in reading order; children inherit it.
    pub fn build(ordered: &[&'a Node], edges: &'a [Edge]) -> Self {
        let rank: HashMap<&str, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let by_id: HashMap<&str, &'a Node> =
            ordered.iter().map(|n| (n.id.as_str(), *n)).collect();

        let mut children: HashMap<&'a str, Vec<Child<'a>>> = HashMap::new();
        let mut parents: HashMap<&'a str, &'a str> = HashMap::new();
        let mut touched: HashSet<&str> = HashSet::new();

        for edge in edges {
            let (source, target) = (edge.source.as_str(), edge.target.as_str());
            let (Some(&src_node), Some(&dst_node)) = (by_id.get(source), by_id.get(target)) else {
                continue;
            };
            touched.insert(source);
            touched.insert(target);
            if source == target {
                continue;
            }

            let siblings = children.entry(src_node.id.as_str()).or_default();
            if siblings.iter().any(|c| c.node.id == dst_node.id) {
                continue;
            }
            siblings.push(Child {
                node: dst_node,
                label: edge.label(),
            });
            parents.entry(dst_node.id.as_str()).or_insert(src_node.id.as_str());
        }

        for list in children.values_mut() {
            list.sort_by_key(|c| rank.get(c.node.id.as_str()).copied().unwrap_or(usize::MAX));
        }

        let mut roots = Vec::new();
        let mut orphans = Vec::new();
        let mut connected = Vec::new();
        for node in ordered {
            let id = node.id.as_str();
            if !touched.contains(id) {
                orphans.push(*node);
                continue;
            }
            connected.push(*node);
            if !parents.contains_key(id) {
                roots.push(*node);
            }
        }

        Self {
            children,
            parents,
            roots,
            orphans,
            connected,
        }
    }

    pub fn children(&self, node: &Node) -> &[Child<'a>] {
        self.children
            .get(node.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First parent recorded for a node, if any.
    pub fn parent_of(&self, node: &Node) -> Option<&'a str> {
        self.parents.get(node.id.as_str()).copied()
    }

    /// Connected nodes not in `visited`, in reading order.
    pub fn unreached<'s>(
        &'s self,
        visited: &'s HashSet<&str>,
    ) -> impl Iterator<Item = &'a Node> + 's {
        self.connected
            .iter()
            .copied()
            .filter(move |n| !visited.contains(n.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_canvas::model::Position;

    fn node(id: &str, x: f64, y: f64) -> Node {
        Node::new(id, id, Position::new(x, y))
    }

    fn ids(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|n| n.id.to_string()).collect()
    }

    #[test]
    fn same_row_sorts_left_to_right() {
        let nodes = vec![node("right", 100.0, 0.0), node("left", 0.0, 0.0)];
        assert_eq!(ids(&reading_order(&nodes, 30.0)), vec!["left", "right"]);
    }

    #[test]
    fn row_threshold_is_measured_from_anchor() {
        let nodes = vec![
            node("c", 0.0, 50.0),
            node("b", 200.0, 29.0),
            node("a", 100.0, 0.0),
            node("d", 50.0, 58.0),
        ];
        // Row 1: a, b (y within 30 of 0). Row 2: c, d (anchored at 50).
        assert_eq!(ids(&reading_order(&nodes, 30.0)), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn roots_and_orphans() {
        let nodes = vec![
            node("1", 0.0, 0.0),
            node("2", 0.0, 100.0),
            node("3", 100.0, 100.0),
            node("lonely", 0.0, 300.0),
        ];
        let edges = vec![Edge::new("a", "1", "3"), Edge::new("b", "1", "2").with_label("go")];
        let ordered = reading_order(&nodes, 30.0);
        let h = Hierarchy::build(&ordered, &edges);

        assert_eq!(ids(&h.roots), vec!["1"]);
        assert_eq!(ids(&h.orphans), vec!["lonely"]);
        let kids: Vec<_> = h.children(&nodes[0]).iter().map(|c| c.node.id.as_str()).collect();
        assert_eq!(kids, vec!["2", "3"]);
        assert_eq!(h.children(&nodes[0])[0].label, Some("go"));
        assert_eq!(h.parent_of(&nodes[2]), Some("1"));
    }

    #[test]
    fn cycle_members_are_unreached() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 0.0, 100.0)];
        let edges = vec![Edge::new("1", "a", "b"), Edge::new("2", "b", "a")];
        let ordered = reading_order(&nodes, 30.0);
        let h = Hierarchy::build(&ordered, &edges);
        assert!(h.roots.is_empty());
        assert!(h.orphans.is_empty());
        let visited = HashSet::new();
        assert_eq!(h.unreached(&visited).count(), 2);
    }
}
