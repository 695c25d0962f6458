//! Geometry expander (`spec.md` §4.I).
//!
//! Expands a winning junction cycle back into a single coordinate polyline
//! by concatenating each `G_jct` edge's stored `raw_path`, splicing at
//! shared endpoints. Grounded on the teacher's `Graph::path_to_nodes`
//! (`graph.rs`), which performs the analogous edge-to-node expansion for a
//! generic path.

use crate::error::PlanError;
use crate::full_graph::FullGraph;
use crate::graph::Edge;
use crate::ids::JunctionId;
use crate::junction_graph::JunctionGraph;
use crate::types::Coordinate;

/// Expands `path` (a closed cycle of junctions, first == last) into a
/// single polyline of coordinates, without a duplicated joint coordinate
/// between consecutive edges.
pub fn expand(
    jct: &JunctionGraph,
    full: &FullGraph,
    path: &[JunctionId],
) -> Result<Vec<Coordinate>, PlanError> {
    let mut polyline: Vec<Coordinate> = Vec::new();
    for pair in path.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let edge = jct
            .get_edges_between(u, v)
            .into_iter()
            .next()
            .ok_or_else(|| PlanError::Internal(format!("no G_jct edge between {u} and {v}")))?;

        let raw_path: Vec<_> = if edge.u == u {
            edge.raw_path.clone()
        } else {
            let mut rev = edge.raw_path.clone();
            rev.reverse();
            rev
        };

        for (i, raw) in raw_path.iter().enumerate() {
            if i == 0 && !polyline.is_empty() {
                continue; // shared joint with the previous edge's last point
            }
            let node = full
                .get_node(*raw)
                .ok_or_else(|| PlanError::Internal(format!("raw node {raw} missing from G_full")))?;
            polyline.push(node.coord);
        }
    }
    Ok(polyline)
}
