//! Loop enumerator (`spec.md` §4.F) — the heart of the planner.
//!
//! Depth-bounded recursive DFS over a shared mutable visited-set and path,
//! exactly the re-architecture spec.md §9 calls for: candidates are
//! recorded by cloning the path only at acceptance, everything else is
//! mutated in place and popped on return. No direct teacher counterpart —
//! `graph.rs`'s `pathfind`/`pathfind_regions` stop at one target and never
//! backtrack past it, so this is new code, shaped like the teacher's own
//! Dijkstra loops (explicit adjacency pre-pass, `HashMap` state, manual
//! stack discipline) but doing depth-first cycle search instead.

use std::collections::HashMap;
use std::time::Instant;

use crate::config::Config;
use crate::graph::Edge;
use crate::ids::JunctionId;
use crate::junction_graph::JunctionGraph;

/// An accepted loop: the junction sequence (starting and ending at `s`) and
/// its total length.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub path: Vec<JunctionId>,
    pub length_m: f64,
}

/// Every 10 000 recursive entries the search checks wall-clock time against
/// `time_budget_s` (`spec.md` §9's cooperative-cancellation granularity).
const TIME_CHECK_INTERVAL: u64 = 10_000;

struct Search<'a> {
    adjacency: &'a HashMap<JunctionId, Vec<(JunctionId, f64)>>,
    d_home: &'a HashMap<JunctionId, f64>,
    s: JunctionId,
    target_m: f64,
    tau: f64,
    max_depth: u32,
    candidate_cap: usize,
    min_loop_edges: u32,
    return_prune_factor: f64,
    time_budget_s: f64,
    started: Instant,
    entries: u64,
    visited: std::collections::HashSet<JunctionId>,
    path: Vec<JunctionId>,
    candidates: Vec<Candidate>,
    stop: bool,
}

impl<'a> Search<'a> {
    fn lower(&self) -> f64 {
        self.target_m * (1.0 - self.tau)
    }
    fn upper(&self) -> f64 {
        self.target_m * (1.0 + self.tau)
    }

    /// Explores every edge leaving `node` at accumulated distance `d`,
    /// mutating `self.visited`/`self.path` in place and restoring them
    /// before returning (spec.md §9's "bounded allocation per step").
    fn step(&mut self, node: JunctionId, d: f64, depth: u32) {
        if self.stop {
            return;
        }
        self.entries += 1;
        if self.entries % TIME_CHECK_INTERVAL == 0 {
            log::trace!("{} recursive entries, {} candidates so far", self.entries, self.candidates.len());
            if self.started.elapsed().as_secs_f64() > self.time_budget_s {
                self.stop = true;
                return;
            }
        }

        let Some(neighbours) = self.adjacency.get(&node) else {
            return;
        };
        for &(m, length) in neighbours {
            if self.stop {
                return;
            }
            let d_new = d + length;
            if m == self.s {
                if depth + 1 >= self.min_loop_edges
                    && d_new >= self.lower()
                    && d_new <= self.upper()
                {
                    let mut path = self.path.clone();
                    path.push(m);
                    self.candidates.push(Candidate { path, length_m: d_new });
                    if self.candidates.len() >= self.candidate_cap {
                        self.stop = true;
                        return;
                    }
                }
                continue;
            }
            if self.visited.contains(&m) {
                continue;
            }
            if d_new > self.upper() {
                continue;
            }
            if depth >= self.max_depth {
                continue;
            }
            let home = self.d_home.get(&m).copied().unwrap_or(0.0);
            if d_new + self.return_prune_factor * home > self.upper() {
                continue;
            }
            self.visited.insert(m);
            self.path.push(m);
            self.step(m, d_new, depth + 1);
            self.path.pop();
            self.visited.remove(&m);
        }
    }
}

/// Builds the neighbour listing for every junction from `G_jct` (spec.md
/// §4.F, pre-computation step 1).
fn build_adjacency(jct: &JunctionGraph) -> HashMap<JunctionId, Vec<(JunctionId, f64)>> {
    let mut adjacency: HashMap<JunctionId, Vec<(JunctionId, f64)>> = HashMap::new();
    for (n, _) in jct.nodes() {
        let neighbours = jct
            .get_edges(n)
            .iter()
            .map(|e| (e.other(n), e.length_m))
            .collect();
        adjacency.insert(n, neighbours);
    }
    adjacency
}

/// Lowers `max_depth` when the graph is dense (spec.md §4.F, step 2):
/// average degree > 10 caps depth at 10, > 6 caps it at 12.
fn adjusted_max_depth(adjacency: &HashMap<JunctionId, Vec<(JunctionId, f64)>>, max_depth: u32) -> u32 {
    if adjacency.is_empty() {
        return max_depth;
    }
    let total_degree: usize = adjacency.values().map(|v| v.len()).sum();
    let avg_degree = total_degree as f64 / adjacency.len() as f64;
    if avg_degree > 10.0 {
        max_depth.min(10)
    } else if avg_degree > 6.0 {
        max_depth.min(12)
    } else {
        max_depth
    }
}

/// Enumerates candidate loops rooted at `s` (spec.md §4.F). `target_m` and
/// `tau` are taken as explicit arguments rather than from `cfg` because the
/// orchestrator contract (§4.J) exposes them per-call, distinct from the
/// configuration defaults for the other tunables.
pub fn enumerate(
    jct: &JunctionGraph,
    s: JunctionId,
    target_m: f64,
    tau: f64,
    cfg: &Config,
) -> Vec<Candidate> {
    let adjacency = build_adjacency(jct);
    let max_depth = adjusted_max_depth(&adjacency, cfg.max_depth);

    let s_coord = jct.get_node(s).map(|j| j.coord);
    let mut d_home: HashMap<JunctionId, f64> = HashMap::new();
    if let Some(s_coord) = s_coord {
        for (n, j) in jct.nodes() {
            let d = crate::geodesy::distance(&j.coord, &s_coord).unwrap_or(0.0);
            d_home.insert(n, d);
        }
    }

    let mut search = Search {
        adjacency: &adjacency,
        d_home: &d_home,
        s,
        target_m,
        tau,
        max_depth,
        candidate_cap: cfg.candidate_cap,
        min_loop_edges: cfg.min_loop_edges,
        return_prune_factor: cfg.return_prune_factor,
        time_budget_s: cfg.time_budget_s,
        started: Instant::now(),
        entries: 0,
        visited: std::collections::HashSet::new(),
        path: vec![s],
        candidates: Vec::new(),
        stop: false,
    };
    search.visited.insert(s);
    search.step(s, 0.0, 0);
    search.candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::ids::RawNodeId;
    use crate::types::{Coordinate, Junction, JunctionEdge};

    fn square_grid() -> (JunctionGraph, JunctionId) {
        // 3x3 grid, 1 km spacing, centre at (1,1).
        let mut g: JunctionGraph = Graph::default();
        let mut ids = HashMap::new();
        let mut i = 0u32;
        for r in 0..3 {
            for c in 0..3 {
                let id = JunctionId(i);
                ids.insert((r, c), id);
                let coord = Coordinate::new(r as f64 * 0.009, c as f64 * 0.009);
                g.add_node(id, Junction { id, raw: RawNodeId(i), coord });
                i += 1;
            }
        }
        for r in 0..3 {
            for c in 0..3 {
                let here = ids[&(r, c)];
                if c + 1 < 3 {
                    let right = ids[&(r, c + 1)];
                    let (hc, rc) = (g.get_node(here).unwrap().coord, g.get_node(right).unwrap().coord);
                    g.add_edge(JunctionEdge {
                        u: here,
                        v: right,
                        length_m: crate::geodesy::distance(&hc, &rc).unwrap(),
                        bearing: crate::geodesy::bearing(&hc, &rc).unwrap(),
                        raw_path: vec![],
                        effort: Some(crate::geodesy::distance(&hc, &rc).unwrap()),
                    });
                }
                if r + 1 < 3 {
                    let down = ids[&(r + 1, c)];
                    let (hc, dc) = (g.get_node(here).unwrap().coord, g.get_node(down).unwrap().coord);
                    g.add_edge(JunctionEdge {
                        u: here,
                        v: down,
                        length_m: crate::geodesy::distance(&hc, &dc).unwrap(),
                        bearing: crate::geodesy::bearing(&hc, &dc).unwrap(),
                        raw_path: vec![],
                        effort: Some(crate::geodesy::distance(&hc, &dc).unwrap()),
                    });
                }
            }
        }
        (g, ids[&(1, 1)])
    }

    #[test]
    fn finds_the_four_unit_squares_around_the_centre() {
        let (g, centre) = square_grid();
        let cfg = Config::default();
        let candidates = enumerate(&g, centre, 4_000.0, 0.1, &cfg);
        assert!(candidates.len() >= 4, "expected at least 4, got {}", candidates.len());
        for c in &candidates {
            assert!(c.length_m >= 3_600.0 && c.length_m <= 4_400.0);
            assert_eq!(c.path.first(), c.path.last());
            let interior = &c.path[1..c.path.len() - 1];
            let mut seen = std::collections::HashSet::new();
            for j in interior {
                assert!(seen.insert(j), "interior repeat in {:?}", c.path);
            }
        }
    }

    #[test]
    fn insufficient_budget_yields_no_candidates() {
        let (g, centre) = square_grid();
        let cfg = Config::default();
        let candidates = enumerate(&g, centre, 100.0, 0.1, &cfg);
        assert!(candidates.is_empty());
    }

    #[test]
    fn max_depth_of_two_yields_no_candidates() {
        let (g, centre) = square_grid();
        let mut cfg = Config::default();
        cfg.max_depth = 2;
        let candidates = enumerate(&g, centre, 4_000.0, 0.2, &cfg);
        assert!(candidates.is_empty());
    }

    #[test]
    fn single_junction_graph_yields_no_candidates() {
        let mut g: JunctionGraph = Graph::default();
        let id = JunctionId(0);
        g.add_node(id, Junction { id, raw: RawNodeId(0), coord: Coordinate::new(0.0, 0.0) });
        let cfg = Config::default();
        let candidates = enumerate(&g, id, 1_000.0, 0.1, &cfg);
        assert!(candidates.is_empty());
    }
}
