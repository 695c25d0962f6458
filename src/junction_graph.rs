//! Junction graph construction (`spec.md` §4.D) — condenses `G_full` into
//! `G_jct`, whose edges carry the shortest junction-free path between two
//! junctions and its straight-line bearing.
//!
//! The halt-at-junction single-source search below is a bespoke Dijkstra:
//! `crate::graph::Graph::pathfind` stops at one fixed target, but this
//! needs to stop expansion at *every* junction it meets. Built the same
//! way `pathfind` is (a `priority_queue::PriorityQueue` plus a `HashMap`
//! distance/backpointer table), just with a different termination rule.

use std::collections::HashMap;

use noisy_float::prelude::{n64, N64};
use priority_queue::PriorityQueue;

use crate::error::PlanError;
use crate::full_graph::FullGraph;
use crate::geodesy;
use crate::graph::{Edge, Graph};
use crate::ids::{JunctionId, RawNodeId};
use crate::types::{Junction, JunctionEdge, RawNode};

impl Edge<JunctionId> for JunctionEdge {
    fn p1(&self) -> JunctionId {
        self.u
    }
    fn p2(&self) -> JunctionId {
        self.v
    }
    fn directed(&self) -> bool {
        false
    }
}

// Identity is (u, v) alone, not the length/bearing/effort payload — this
// is what lets `Graph::replace_edge` (used by `crate::wind::annotate`)
// overwrite an edge's effort in place.
impl PartialEq for JunctionEdge {
    fn eq(&self, other: &Self) -> bool {
        self.u == other.u && self.v == other.v
    }
}
impl Eq for JunctionEdge {}
impl std::hash::Hash for JunctionEdge {
    fn hash<H: std::hash::Hasher>(&self, h: &mut H) {
        self.u.hash(h);
        self.v.hash(h);
    }
}

pub type JunctionGraph = Graph<JunctionId, Junction, JunctionEdge>;

/// Backpointer path from a single-source Dijkstra run, halted at the first
/// junction reached on each branch.
struct Reach {
    dist: N64,
    raw_path: Vec<RawNodeId>,
}

/// Runs a single-source shortest-path search from junction `j`'s raw node,
/// halting expansion at any other junction encountered.
fn reachable_junctions(full: &FullGraph, from: RawNodeId) -> HashMap<RawNodeId, Reach> {
    let mut dist: HashMap<RawNodeId, (N64, Option<RawNodeId>)> = HashMap::new();
    let mut q = PriorityQueue::new();
    dist.insert(from, (n64(0.0), None));
    q.push(from, n64(0.0));

    let mut found: HashMap<RawNodeId, Reach> = HashMap::new();

    while let Some((u, _)) = q.pop() {
        let d = dist.get(&u).unwrap().0;
        let is_junction = full.get_node(u).map(|n| n.is_junction).unwrap_or(false);
        if u != from && is_junction {
            let mut path = vec![u];
            let mut v = u;
            while let Some((_, Some(prev))) = dist.get(&v) {
                v = *prev;
                path.push(v);
            }
            path.reverse();
            found.insert(u, Reach { dist: d, raw_path: path });
            continue; // don't expand past a junction
        }
        for e in full.get_edges(u) {
            if e.p1() != u {
                continue; // directed: only traverse p1 -> p2
            }
            let v = e.p2();
            let nd = d + n64(e.length_m);
            if dist.get(&v).map_or(true, |(vd, _)| *vd > nd) {
                dist.insert(v, (nd, Some(u)));
                q.push(v, -nd);
            }
        }
    }
    found
}

/// Builds `G_jct` from `G_full` (`spec.md` §4.D).
///
/// For every unordered pair of junctions reachable from one another
/// without passing through a third junction, keeps the shorter of the two
/// directed halt-at-junction searches. The representative bearing is the
/// straight-line bearing `u -> v`, not the path-integrated one (design
/// note in `spec.md` §9, reproduced deliberately).
pub fn build(full: &FullGraph) -> Result<JunctionGraph, PlanError> {
    let junction_raws: Vec<RawNodeId> = full
        .nodes()
        .filter(|(_, n)| n.is_junction)
        .map(|(id, _)| id)
        .collect();

    let mut raw_to_junction: HashMap<RawNodeId, JunctionId> = HashMap::new();
    let mut junctions: Vec<Junction> = Vec::with_capacity(junction_raws.len());
    for (i, raw) in junction_raws.iter().enumerate() {
        let node: &RawNode = full.get_node(*raw).ok_or_else(|| {
            PlanError::Internal(format!("junction raw node {} missing from G_full", raw))
        })?;
        let jid = JunctionId(i as u32);
        raw_to_junction.insert(*raw, jid);
        junctions.push(Junction { id: jid, raw: *raw, coord: node.coord });
    }

    let mut g: JunctionGraph = Graph::default();
    for j in &junctions {
        g.add_node(j.id, *j);
    }

    let mut best: HashMap<(JunctionId, JunctionId), JunctionEdge> = HashMap::new();
    for j in &junctions {
        let reach = reachable_junctions(full, j.raw);
        for (other_raw, r) in reach {
            let Some(&other) = raw_to_junction.get(&other_raw) else {
                continue;
            };
            if other == j.id {
                continue;
            }
            let key = if j.id.index() < other.index() {
                (j.id, other)
            } else {
                (other, j.id)
            };
            let (u, v) = key;
            let (u_coord, v_coord) = (
                junctions[u.index()].coord,
                junctions[v.index()].coord,
            );
            let bearing = geodesy::bearing(&u_coord, &v_coord)?;
            let candidate = if u == j.id {
                JunctionEdge { u, v, length_m: r.dist.raw(), bearing, raw_path: r.raw_path, effort: None }
            } else {
                let mut rev = r.raw_path.clone();
                rev.reverse();
                JunctionEdge { u, v, length_m: r.dist.raw(), bearing, raw_path: rev, effort: None }
            };
            match best.get(&key) {
                Some(existing) if existing.length_m <= candidate.length_m => {}
                _ => {
                    best.insert(key, candidate);
                }
            }
        }
    }

    for ((u, v), e) in best {
        if e.bearing < 0.0 || e.bearing >= 360.0 {
            return Err(PlanError::Internal(format!(
                "junction edge {}-{} bearing {} out of [0, 360)",
                u, v, e.bearing
            )));
        }
        g.add_edge(e);
    }

    Ok(g)
}
