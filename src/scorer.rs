//! Candidate scorer and selector (`spec.md` §4.G).
//!
//! Pure function over the enumerator's output: no graph mutation, no
//! collaborator. Grounded on the teacher's own selection step in
//! `plow.rs` (best-of-N comparison by a scalar cost), generalised from
//! "keep the minimum" to "keep the minimum, tie-break on distance fit then
//! discovery order".

use crate::enumerator::Candidate;
use crate::graph::Edge;
use crate::junction_graph::JunctionGraph;

pub struct Scored {
    pub candidate: Candidate,
    pub total_effort: f64,
    pub dist_penalty: f64,
}

/// Total wind effort of a candidate's path, by summing the `effort` of
/// each consecutive junction-edge. Edges are undirected in `G_jct`, so the
/// edge between consecutive junctions is found irrespective of traversal
/// order.
fn total_effort(jct: &JunctionGraph, path: &[crate::ids::JunctionId]) -> f64 {
    path.windows(2)
        .map(|pair| {
            jct.get_edges_between(pair[0], pair[1])
                .first()
                .and_then(|e| e.effort)
                .unwrap_or(0.0)
        })
        .sum()
}

/// Scores and selects the best candidate (`spec.md` §4.G). Returns `None`
/// if `candidates` is empty; the orchestrator turns that into
/// [`crate::error::PlanError::NoLoopFound`].
pub fn select(jct: &JunctionGraph, candidates: Vec<Candidate>, target_m: f64, alpha: f64) -> Option<Scored> {
    let mut best: Option<Scored> = None;
    for candidate in candidates {
        let total_effort = total_effort(jct, &candidate.path);
        let dist_penalty = (candidate.length_m - target_m).abs() / target_m;
        let score = total_effort * (1.0 + alpha * dist_penalty);
        let scored = Scored { candidate, total_effort, dist_penalty };
        let keep = match &best {
            None => true,
            Some(b) => {
                let b_score = b.total_effort * (1.0 + alpha * b.dist_penalty);
                score < b_score || (score == b_score && scored.dist_penalty < b.dist_penalty)
            }
        };
        if keep {
            best = Some(scored);
        }
    }
    best
}
