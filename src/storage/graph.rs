//! Attributed undirected graph handle
//!
//! Nodes are addressed by their string label (a concept identifier in a
//! colexification network) and internally by a dense [`NodeId`]. Insertion
//! order is preserved for nodes and edges, which both persistence formats
//! rely on to reproduce the graph exactly.
//!
//! ```text
//! add_edge("HAND", "ARM"), add_edge("ARM", "HAND")
//!
//!   labels:    ["HAND", "ARM"]
//!   edges:     [(0, 1)]          // second call merges into the first
//!   adjacency: [[(1, e0)], [(0, e0)]]
//! ```

use super::attrs::Attributes;
use std::collections::HashMap;

/// Node identifier (zero-indexed, insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Edge identifier (zero-indexed, insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

/// An undirected edge with its attributes
///
/// `source`/`target` keep the orientation the edge was first added with so
/// that writers reproduce it, but carry no meaning for traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// First endpoint
    pub source: NodeId,
    /// Second endpoint
    pub target: NodeId,
    /// Edge attributes
    pub attrs: Attributes,
}

/// Undirected simple graph with attribute bags on graph, nodes and edges
///
/// # Example
///
/// ```
/// use colex_network::AttrGraph;
///
/// let mut graph = AttrGraph::new();
/// graph.add_edge("HAND", "ARM");
/// graph.add_edge("ARM", "HAND"); // same pair, no parallel edge
///
/// assert_eq!(graph.num_nodes(), 2);
/// assert_eq!(graph.num_edges(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrGraph {
    attrs: Attributes,
    labels: Vec<String>,
    node_attrs: Vec<Attributes>,
    index: HashMap<String, NodeId>,
    edges: Vec<Edge>,
    /// Per node: (neighbor, edge) pairs; a self-loop appears once
    adjacency: Vec<Vec<(u32, EdgeId)>>,
}

impl AttrGraph {
    /// Create new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or return the existing one with this label
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        let label = label.into();
        if let Some(&id) = self.index.get(&label) {
            return id;
        }

        #[allow(clippy::cast_possible_truncation)] // Graphs >4B nodes not supported
        let id = NodeId(self.labels.len() as u32);
        self.index.insert(label.clone(), id);
        self.labels.push(label);
        self.node_attrs.push(Attributes::new());
        self.adjacency.push(Vec::new());
        id
    }

    /// Add a node and merge `attrs` into its attribute bag
    pub fn add_node_with(&mut self, label: impl Into<String>, attrs: Attributes) -> NodeId {
        let id = self.add_node(label);
        self.node_attrs[id.0 as usize].merge(attrs);
        id
    }

    /// Add an undirected edge, creating missing endpoints
    ///
    /// If the pair is already connected the existing edge is returned.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>) -> EdgeId {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.connect(a, b)
    }

    /// Add an undirected edge and merge `attrs` into its attribute bag
    pub fn add_edge_with(
        &mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        attrs: Attributes,
    ) -> EdgeId {
        let id = self.add_edge(a, b);
        self.edges[id.0 as usize].attrs.merge(attrs);
        id
    }

    /// Connect two existing nodes
    ///
    /// Returns `None` when either id is out of bounds.
    pub fn connect_ids(&mut self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let n = self.labels.len();
        if (a.0 as usize) >= n || (b.0 as usize) >= n {
            return None;
        }
        Some(self.connect(a, b))
    }

    fn connect(&mut self, a: NodeId, b: NodeId) -> EdgeId {
        if let Some(existing) = self.edge_between(a, b) {
            return existing;
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            source: a,
            target: b,
            attrs: Attributes::new(),
        });
        self.adjacency[a.0 as usize].push((b.0, id));
        if a != b {
            self.adjacency[b.0 as usize].push((a.0, id));
        }
        id
    }

    /// Edge connecting `a` and `b`, in either orientation
    #[must_use]
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.adjacency
            .get(a.0 as usize)?
            .iter()
            .find(|(neighbor, _)| *neighbor == b.0)
            .map(|(_, edge)| *edge)
    }

    /// Look up a node by label
    #[must_use]
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Label of a node
    #[must_use]
    pub fn node_label(&self, node: NodeId) -> Option<&str> {
        self.labels.get(node.0 as usize).map(String::as_str)
    }

    /// Attributes of a node
    #[must_use]
    pub fn node_attrs(&self, node: NodeId) -> Option<&Attributes> {
        self.node_attrs.get(node.0 as usize)
    }

    /// Mutable attributes of a node
    pub fn node_attrs_mut(&mut self, node: NodeId) -> Option<&mut Attributes> {
        self.node_attrs.get_mut(node.0 as usize)
    }

    /// Edge by id
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(edge.0 as usize)
    }

    /// Mutable attributes of an edge
    pub fn edge_attrs_mut(&mut self, edge: EdgeId) -> Option<&mut Attributes> {
        self.edges.get_mut(edge.0 as usize).map(|e| &mut e.attrs)
    }

    /// Neighbors of a node (each once, self-loops included)
    ///
    /// Unknown nodes have no neighbors.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(node.0 as usize)
            .into_iter()
            .flatten()
            .map(|(neighbor, _)| NodeId(*neighbor))
    }

    /// Iterate nodes in insertion order as (id, label, attributes)
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str, &Attributes)> + '_ {
        self.labels
            .iter()
            .zip(&self.node_attrs)
            .enumerate()
            .map(|(i, (label, attrs))| {
                #[allow(clippy::cast_possible_truncation)]
                let id = NodeId(i as u32);
                (id, label.as_str(), attrs)
            })
    }

    /// Edges in insertion order
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Graph-level attributes
    #[must_use]
    pub const fn graph_attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Mutable graph-level attributes
    pub fn graph_attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// Get number of nodes
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Get number of edges
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AttrValue;

    #[test]
    fn test_empty_graph() {
        let graph = AttrGraph::new();
        assert_eq!(graph.num_nodes(), 0);
        assert_eq!(graph.num_edges(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = AttrGraph::new();
        let a = graph.add_node("1277");
        let b = graph.add_node("1277");
        assert_eq!(a, b);
        assert_eq!(graph.num_nodes(), 1);
        assert_eq!(graph.node_label(a), Some("1277"));
        assert_eq!(graph.node_id("1277"), Some(a));
    }

    #[test]
    fn test_add_edge_creates_endpoints() {
        let mut graph = AttrGraph::new();
        graph.add_edge("HAND", "ARM");

        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.num_edges(), 1);

        let hand = graph.node_id("HAND").unwrap();
        let arm = graph.node_id("ARM").unwrap();
        assert_eq!(graph.neighbors(hand).collect::<Vec<_>>(), vec![arm]);
        assert_eq!(graph.neighbors(arm).collect::<Vec<_>>(), vec![hand]);
    }

    #[test]
    fn test_reverse_edge_merges() {
        let mut graph = AttrGraph::new();
        let first = graph.add_edge_with("a", "b", Attributes::new().with("weight", 2_i64));
        let second = graph.add_edge_with("b", "a", Attributes::new().with("families", 5_i64));

        assert_eq!(first, second);
        assert_eq!(graph.num_edges(), 1);

        let edge = graph.edge(first).unwrap();
        assert_eq!(edge.source, NodeId(0));
        assert_eq!(edge.target, NodeId(1));
        assert_eq!(edge.attrs.get("weight"), Some(&AttrValue::Int(2)));
        assert_eq!(edge.attrs.get("families"), Some(&AttrValue::Int(5)));
    }

    #[test]
    fn test_self_loop_listed_once() {
        let mut graph = AttrGraph::new();
        graph.add_edge("a", "a");
        let a = graph.node_id("a").unwrap();
        assert_eq!(graph.neighbors(a).count(), 1);
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_node_attrs() {
        let mut graph = AttrGraph::new();
        let id = graph.add_node_with("1277", Attributes::new().with("Gloss", "HAND"));
        graph
            .node_attrs_mut(id)
            .unwrap()
            .insert("infomap", 4_i64);

        let attrs = graph.node_attrs(id).unwrap();
        assert_eq!(attrs.get("Gloss").and_then(AttrValue::as_str), Some("HAND"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_connect_ids_bounds() {
        let mut graph = AttrGraph::new();
        let a = graph.add_node("a");
        assert!(graph.connect_ids(a, NodeId(9)).is_none());
        assert!(graph.connect_ids(a, a).is_some());
    }

    #[test]
    fn test_nodes_iterate_in_insertion_order() {
        let mut graph = AttrGraph::new();
        graph.add_node("z");
        graph.add_edge("m", "a");

        let labels: Vec<_> = graph.nodes().map(|(_, label, _)| label).collect();
        assert_eq!(labels, vec!["z", "m", "a"]);
    }

    #[test]
    fn test_unknown_node_has_no_neighbors() {
        let graph = AttrGraph::new();
        assert_eq!(graph.neighbors(NodeId(3)).count(), 0);
    }
}
