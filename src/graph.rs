//! The reference graph (§3, §4.4): `node_id -> ReferenceNode`, a flat edge
//! vector, and an outgoing adjacency index keyed by `node_id`.
//!
//! Kept as a hand-rolled structure rather than reaching for `petgraph`: the
//! spec is prescriptive about the exact shape ("map node_id -> node; vector
//! of edges; outgoing adjacency index"), BFS only ever needs outgoing
//! edges, and the adjacency index is exactly the `Vec<Vec<usize>>` a
//! from-scratch implementation gives for free. See DESIGN.md for the
//! dependency this replaces.

use crate::models::RefType;
use rustc_hash::FxHashMap;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ReferenceNode {
    pub id: u32,
    pub name: String,
    pub file: PathBuf,
    pub line: u32,
    pub end_line: u32,
    pub kind: crate::models::DefinitionKind,
    pub is_exported: bool,
    pub is_entry: bool,
}

#[derive(Debug, Clone)]
pub struct ReferenceEdge {
    pub from_id: u32,
    pub to_id: u32,
    pub ref_type: RefType,
    pub confidence: f64,
}

#[derive(Debug, Default)]
pub struct ReferenceGraph {
    nodes: FxHashMap<u32, ReferenceNode>,
    edges: Vec<ReferenceEdge>,
    /// node_id -> indices into `edges` for edges whose `from_id == node_id`.
    adjacency: FxHashMap<u32, Vec<usize>>,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: ReferenceNode) {
        self.nodes.insert(node.id, node);
    }

    pub fn node(&self, id: u32) -> Option<&ReferenceNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: u32) -> Option<&mut ReferenceNode> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ReferenceNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Panics if either endpoint isn't a known node id — the invariant in
    /// §3 is that callers only add edges once both endpoints resolve
    /// (Phase 1 drops unresolved references before calling this).
    pub fn add_edge(&mut self, edge: ReferenceEdge) {
        assert!(self.nodes.contains_key(&edge.from_id), "unknown from_id {}", edge.from_id);
        assert!(self.nodes.contains_key(&edge.to_id), "unknown to_id {}", edge.to_id);
        let idx = self.edges.len();
        self.adjacency.entry(edge.from_id).or_default().push(idx);
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[ReferenceEdge] {
        &self.edges
    }

    /// Deterministic iteration order: the order edges were added for this
    /// node (insertion order, per §4.6 "deterministic iteration order over
    /// outgoing edges").
    pub fn outgoing(&self, id: u32) -> impl Iterator<Item = &ReferenceEdge> {
        self.adjacency
            .get(&id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }
}
