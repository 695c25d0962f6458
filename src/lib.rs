//! Wind-optimised closed-loop route planner over a signed cycling-junction
//! network.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`geodesy`] | Great-circle distance, bearing, angle arithmetic. |
//! | [`loader`] | Abstract + static network source for a bounding region. |
//! | [`full_graph`] | Directed multigraph of raw street nodes. |
//! | [`junction_graph`] | Condensed undirected graph of junctions. |
//! | [`wind`] | Per-edge wind-effort annotation. |
//! | [`enumerator`] | Depth-bounded DFS loop enumeration. |
//! | [`scorer`] | Candidate scoring and selection. |
//! | [`approach`] | Nearest-junction approach path. |
//! | [`geometry`] | Expands a junction cycle into a coordinate polyline. |
//!
//! [`plan_loop`] sequences all of the above, in the fixed order the
//! dependency chain requires (condensing needs the full graph, wind
//! annotation needs the condensed graph, enumeration needs annotated
//! edges). Doc-table layout follows the teacher's own module index in its
//! crate root.

pub mod approach;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod full_graph;
pub mod geodesy;
pub mod geometry;
pub mod graph;
pub mod ids;
pub mod junction_graph;
pub mod loader;
pub mod scorer;
pub mod types;
pub mod wind;

#[cfg(test)]
mod tests;

use config::Config;
use error::{PlanError, PlanResult};
use loader::NetworkLoader;
use types::{Coordinate, Plan, WindVector};

/// Sequences B→C→D→E→F→G→H→I into the single exposed operation (`spec.md`
/// §4.J). `tolerance` and `time_budget` are taken per-call per the
/// orchestrator contract; every other tunable comes from `cfg`.
pub fn plan_loop(
    loader: &dyn NetworkLoader,
    start: Coordinate,
    target_m: f64,
    wind: WindVector,
    tolerance: f64,
    time_budget: f64,
    cfg: &Config,
) -> PlanResult<Plan> {
    if target_m <= 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "target_m must be positive, got {target_m}"
        )));
    }
    if !(0.0..1.0).contains(&tolerance) {
        return Err(PlanError::InvalidInput(format!(
            "tolerance must be in [0, 1), got {tolerance}"
        )));
    }
    if wind.speed < 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "wind speed must be non-negative, got {}",
            wind.speed
        )));
    }
    geodesy::distance(&start, &start)?; // validates start's latitude

    let mut cfg = cfg.clone();
    cfg.time_budget_s = time_budget;

    // H first locates the approach, bounding the search radius; B then
    // fetches the network around the start coordinate at that radius.
    let search_radius_m = (target_m * (1.0 + tolerance) / 2.0).max(cfg.approach_max_m);
    let (nodes, edges) = loader.fetch(&start, search_radius_m)?;

    let full = full_graph::build(nodes, edges); // C
    log::debug!("G_full: {} nodes, {} edges", full.node_count(), full.edge_count());
    let mut jct = junction_graph::build(&full)?; // D
    log::debug!("G_jct: {} junctions, {} edges", jct.node_count(), jct.edge_count());
    if jct.node_count() == 0 {
        return Err(PlanError::NetworkEmpty(format!(
            "no junctions within {search_radius_m} m of ({}, {})",
            start.lat, start.lon
        )));
    }
    let regions = jct.strongly_connected_components::<false, true>();
    if regions.len() > 1 {
        log::warn!("G_jct has {} disconnected regions; the search only covers the one containing the start", regions.len());
    }
    wind::annotate(&mut jct, &wind, &cfg); // E

    let approach = approach::find(&full, &start, &cfg)?; // H
    let s = jct
        .nodes()
        .find(|(_, j)| j.raw == approach.start_raw)
        .map(|(id, _)| id)
        .ok_or_else(|| {
            PlanError::Internal("approach's start_raw has no corresponding junction".into())
        })?;

    log::info!("search started from junction {s}, target {target_m} m");
    let candidates = enumerator::enumerate(&jct, s, target_m, tolerance, &cfg); // F
    log::debug!("enumerator produced {} candidates", candidates.len());
    let scored = scorer::select(&jct, candidates, target_m, cfg.alpha).ok_or_else(|| {
        PlanError::NoLoopFound(format!(
            "no candidate loop near {target_m} m (tolerance {tolerance}) within {time_budget}s"
        ))
    })?; // G

    log::info!("winner: {:.0} m, effort {:.0}, dist_penalty {:.3}", scored.candidate.length_m, scored.total_effort, scored.dist_penalty);
    let loop_polyline = geometry::expand(&jct, &full, &scored.candidate.path)?; // I

    let junction_labels: Vec<String> = scored
        .candidate
        .path
        .iter()
        .map(|jid| {
            let j = jct.get_node(*jid).expect("candidate junction must exist in G_jct");
            full.get_node(j.raw)
                .and_then(|n| n.label.clone())
                .unwrap_or_else(|| jid.to_string())
        })
        .collect();
    let junction_coords: Vec<Coordinate> = scored
        .candidate
        .path
        .iter()
        .map(|jid| jct.get_node(*jid).expect("candidate junction must exist in G_jct").coord)
        .collect();

    Ok(Plan {
        actual_length_m: scored.candidate.length_m,
        junction_labels,
        junction_coords,
        approach_polyline: approach.polyline,
        loop_polyline,
        wind_used: wind,
        search_radius_m,
    })
}
