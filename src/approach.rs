//! Approach path finder (`spec.md` §4.H).
//!
//! Two great-circle searches: the raw node nearest the user's coordinate,
//! then the nearest junction reachable from it by shortest path in
//! `G_full`. Grounded on the teacher's `data::RoadGraphNodes::locate`
//! (linear scan, nearest by squared-coordinate distance), extended with a
//! bounding-box prefilter and a second shortest-path stage per the spec.

use noisy_float::prelude::n64;

use crate::config::Config;
use crate::error::PlanError;
use crate::full_graph::FullGraph;
use crate::geodesy;
use crate::graph::Edge;
use crate::ids::RawNodeId;
use crate::types::Coordinate;

pub struct Approach {
    pub start_raw: RawNodeId,
    pub polyline: Vec<Coordinate>,
    pub distance_m: f64,
}

/// A cheap bounding-box prefilter in degrees, derived from `radius_m` so it
/// scales with `cfg.approach_max_m` instead of the whole Earth; avoids
/// paying for a haversine call on points that are obviously too far away.
/// Sized at 4x the network-distance cap passed in, since this prefilter
/// bounds straight-line distance to the nearest *raw node*, a looser
/// quantity than the network-distance cap `approach_max_m` itself enforces
/// between that raw node and the nearest junction.
fn bbox_degrees(radius_m: f64) -> f64 {
    (radius_m / geodesy::EARTH_RADIUS_M).to_degrees() * 1.5
}

/// Finds the raw node nearest `coord`, by linear scan with a bounding-box
/// prefilter (`spec.md` §4.H, search i).
fn nearest_raw_node(full: &FullGraph, coord: &Coordinate, max_radius_m: f64) -> Option<(RawNodeId, f64)> {
    let half = bbox_degrees(max_radius_m * 4.0);
    full.nodes()
        .filter(|(_, n)| {
            (n.coord.lat - coord.lat).abs() <= half && (n.coord.lon - coord.lon).abs() <= half
        })
        .filter_map(|(id, n)| geodesy::distance(&n.coord, coord).ok().map(|d| (id, d)))
        .min_by_key(|(_, d)| n64(*d))
}

/// Finds the start junction reachable from `from` and the shortest path to
/// it (`spec.md` §4.H, search ii). Fails with [`PlanError::StartUnreachable`]
/// if nothing is within `cfg.approach_max_m`.
pub fn find(full: &FullGraph, coord: &Coordinate, cfg: &Config) -> Result<Approach, PlanError> {
    let (nearest, _) = nearest_raw_node(full, coord, cfg.approach_max_m).ok_or_else(|| {
        PlanError::StartUnreachable(format!(
            "no raw node found near ({}, {})",
            coord.lat, coord.lon
        ))
    })?;

    if full.get_node(nearest).map(|n| n.is_junction).unwrap_or(false) {
        return Ok(Approach { start_raw: nearest, polyline: vec![coord_of(full, nearest)?], distance_m: 0.0 });
    }

    let junctions: std::collections::HashSet<RawNodeId> = full
        .nodes()
        .filter(|(_, n)| n.is_junction)
        .map(|(id, _)| id)
        .collect();
    if junctions.is_empty() {
        return Err(PlanError::StartUnreachable(
            "network has no junctions".into(),
        ));
    }

    let mut from = std::collections::HashSet::new();
    from.insert(nearest);
    let path = full
        .pathfind_regions::<_, _, true>(&from, &junctions, |e| Some(n64(e.length_m)))
        .ok_or_else(|| PlanError::StartUnreachable(format!("no junction reachable from ({}, {})", coord.lat, coord.lon)))?;

    let (_, junction_raw, edges) = path;
    let distance_m: f64 = edges.iter().map(|e| e.length_m).sum();
    if distance_m > cfg.approach_max_m {
        return Err(PlanError::StartUnreachable(format!(
            "nearest junction is {distance_m:.0} m away, exceeding approach_max_m={}",
            cfg.approach_max_m
        )));
    }

    let mut polyline = vec![coord_of(full, nearest)?];
    for e in &edges {
        polyline.push(coord_of(full, e.p2())?);
    }

    Ok(Approach { start_raw: junction_raw, polyline, distance_m })
}

fn coord_of(full: &FullGraph, id: RawNodeId) -> Result<Coordinate, PlanError> {
    full.get_node(id)
        .map(|n| n.coord)
        .ok_or_else(|| PlanError::Internal(format!("raw node {id} missing from G_full")))
}
