//! Full graph construction (`spec.md` §4.C) — turns loader output into
//! `G_full`, a directed multigraph over [`crate::graph::Graph`].
//!
//! Construction loop grounded on the teacher's `PlowSolver` node/edge
//! ingestion in `plow.rs` (`GraphAdapter::add_node` / `add_edge` per raw
//! record), minus the annealing-specific node/edge wrapper types.

use std::collections::HashMap;

use crate::graph::{Edge, Graph};
use crate::ids::RawNodeId;
use crate::types::{RawEdge, RawNode};

impl Edge<RawNodeId> for RawEdge {
    fn p1(&self) -> RawNodeId {
        self.p1
    }
    fn p2(&self) -> RawNodeId {
        self.p2
    }
    fn directed(&self) -> bool {
        true
    }
}

// Identity is (p1, p2) alone, not the length/bearing/polyline payload —
// this lets `Graph::replace_edge` overwrite an edge's attributes in place
// while `HashSet` still recognises it as "the same edge".
impl PartialEq for RawEdge {
    fn eq(&self, other: &Self) -> bool {
        self.p1 == other.p1 && self.p2 == other.p2
    }
}
impl Eq for RawEdge {}
impl std::hash::Hash for RawEdge {
    fn hash<H: std::hash::Hasher>(&self, h: &mut H) {
        self.p1.hash(h);
        self.p2.hash(h);
    }
}

pub type FullGraph = Graph<RawNodeId, RawNode, RawEdge>;

/// Builds `G_full` from loader output.
///
/// Deduplicates nodes by id, drops zero-length edges (already filtered by
/// [`crate::loader::StaticNetworkLoader`] but re-checked here for any other
/// `NetworkLoader`), and drops edges whose endpoints are missing.
pub fn build(nodes: Vec<RawNode>, edges: Vec<RawEdge>) -> FullGraph {
    let mut g: FullGraph = Graph::default();
    let mut seen: HashMap<RawNodeId, ()> = HashMap::new();
    for n in nodes {
        if seen.insert(n.id, ()).is_none() {
            g.add_node(n.id, n);
        }
    }
    for e in edges {
        if e.length_m > 0.0 {
            g.add_edge(e);
        }
    }
    g
}
