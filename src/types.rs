//! Core data model: coordinates, wind, raw network records, junction
//! records, and the planner's output.
//!
//! Shapes are grounded on the teacher's `data.rs` (`Node`, `RoadSegment`,
//! `Location`), re-fielded to the specification's data model (§3) and
//! re-keyed onto the typed ids in [`crate::ids`] instead of the teacher's
//! `Cow<'static, str>` node ids — the hot path (graph search) never touches
//! a string, only the loader boundary and the CLI do.

use serde::{Deserialize, Serialize};

use crate::ids::{JunctionId, RawNodeId};

/// A WGS-84 coordinate, in decimal degrees. Immutable.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Wind speed and meteorological bearing (the direction the wind blows
/// *from*), immutable for the duration of one request.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct WindVector {
    /// Non-negative magnitude, in metres per second.
    pub speed: f64,
    /// Direction the wind blows from, degrees clockwise from true north,
    /// in `[0, 360)`.
    pub bearing: f64,
}

/// A node of the full street-level graph.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct RawNode {
    pub id: RawNodeId,
    /// The id a [`crate::loader::NetworkLoader`] used to identify this
    /// node; carried through so results can be related back to the
    /// source network.
    pub source_id: String,
    pub coord: Coordinate,
    pub is_junction: bool,
    /// Short public label (e.g. "32"), present only for junctions.
    pub label: Option<String>,
}

/// A directed edge of the full street-level graph.
///
/// Edges are undirected in routing semantics but stored directionally:
/// every logical connection between `p1` and `p2` is represented by two
/// `RawEdge` values, `(p1, p2)` and `(p2, p1)`, of identical length and
/// reversed bearing, so that "the bearing of this edge" is always
/// well defined (`spec.md` §3).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RawEdge {
    pub p1: RawNodeId,
    pub p2: RawNodeId,
    /// Length in metres (great-circle over the polyline this edge
    /// represents).
    pub length_m: f64,
    /// Initial bearing `p1 -> p2`, degrees in `[0, 360)`.
    pub bearing: f64,
    /// Ordered raw-node ids this edge traverses, `p1` first and `p2` last,
    /// used to reconstruct a polyline at geometry-expansion time.
    pub polyline: Vec<RawNodeId>,
}

/// A junction: a raw node with `is_junction == true`, addressed by its own
/// typed id inside the condensed graph.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Junction {
    pub id: JunctionId,
    pub raw: RawNodeId,
    pub coord: Coordinate,
}

/// An edge of the condensed junction graph (`G_jct`).
#[derive(Clone, Debug)]
pub struct JunctionEdge {
    pub u: JunctionId,
    pub v: JunctionId,
    /// Sum of lengths along the concatenated raw edges forming the
    /// shortest junction-free path between `u` and `v`.
    pub length_m: f64,
    /// Straight-line great-circle initial bearing from `u` to `v` (not the
    /// path-integrated bearing — see the design notes).
    pub bearing: f64,
    /// Ordered raw nodes forming the shortest junction-free path `u -> v`
    /// in `G_full` (`u.raw` first, `v.raw` last).
    pub raw_path: Vec<RawNodeId>,
    /// Wind effort for this edge, populated by [`crate::wind`] once a wind
    /// vector is known. `None` before annotation.
    pub effort: Option<f64>,
}

/// The final, materialised result of [`crate::plan_loop`].
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Plan {
    pub actual_length_m: f64,
    pub junction_labels: Vec<String>,
    pub junction_coords: Vec<Coordinate>,
    pub approach_polyline: Vec<Coordinate>,
    pub loop_polyline: Vec<Coordinate>,
    pub wind_used: WindVector,
    pub search_radius_m: f64,
}
