//! Network loader interface (`spec.md` §4.B) and a static, in-memory
//! implementation suitable for tests and for the CLI.
//!
//! Production deployments supply a tiled, cached loader — downloading,
//! parsing and caching raw network tiles is explicitly out of scope
//! (`spec.md` §1). `StaticNetworkLoader` is the simplest collaborator that
//! satisfies the trait: it reads one JSON document up front and answers
//! every query with a bounding-box-filtered scan, the same shape as the
//! teacher's `data::RoadGraph` (loaded whole via `serde_json::from_reader`).

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::LoaderError;
use crate::geodesy;
use crate::ids::RawNodeId;
use crate::types::{Coordinate, RawEdge, RawNode};

/// Abstract source of raw streets and junctions for a bounding region.
pub trait NetworkLoader {
    /// Returns every raw node and edge within `radius_m` of `centre`.
    fn fetch(&self, centre: &Coordinate, radius_m: f64) -> Result<(Vec<RawNode>, Vec<RawEdge>), LoaderError>;
}

/// On-disk shape of a statically loaded network, mirroring the teacher's
/// `data::RoadGraph` / `data::Node` / `data::RoadSegment`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NetworkDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NodeRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub is_junction: bool,
    #[serde(default)]
    pub label: Option<String>,
}

/// One raw street segment. `directed` matches `spec.md`'s "stored
/// directionally"; a non-directed record is expanded into both directions
/// at load time, a directed one only into `p1 -> p2`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EdgeRecord {
    pub p1: String,
    pub p2: String,
    #[serde(default)]
    pub directed: bool,
    /// Interior polyline coordinates between `p1` and `p2`, exclusive of
    /// both endpoints, in traversal order. Each one is materialised as a
    /// non-junction raw node and spliced into the chain between `p1` and
    /// `p2`, so a curved segment routes (and later expands) hop by hop
    /// through every shape point instead of being flattened to a straight
    /// line. May be empty for a direct segment.
    #[serde(default)]
    pub polyline: Vec<(f64, f64)>,
}

/// A loader that holds the entire network in memory, loaded once from a
/// JSON document.
pub struct StaticNetworkLoader {
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
}

impl StaticNetworkLoader {
    pub fn from_document(doc: NetworkDocument) -> Result<Self, LoaderError> {
        if doc.nodes.is_empty() {
            return Err(LoaderError::Empty("network document has no nodes".into()));
        }
        let mut id_of = std::collections::HashMap::new();
        let mut nodes = Vec::with_capacity(doc.nodes.len());
        for (i, n) in doc.nodes.iter().enumerate() {
            let id = RawNodeId(i as u32);
            id_of.insert(n.id.clone(), id);
            nodes.push(RawNode {
                id,
                source_id: n.id.clone(),
                coord: Coordinate::new(n.lat, n.lon),
                is_junction: n.is_junction,
                label: n.label.clone(),
            });
        }

        let mut edges = Vec::new();
        for e in &doc.edges {
            let (Some(&p1), Some(&p2)) = (id_of.get(&e.p1), id_of.get(&e.p2)) else {
                continue;
            };
            if e.polyline.is_empty() {
                push_edge_both_ways(&nodes, &mut edges, p1, p2, e.directed)
                    .map_err(LoaderError::Unavailable)?;
                continue;
            }
            // Synthesize one interior raw node per shape point so the
            // halt-at-junction search in `junction_graph` walks the curve
            // hop by hop and geometry expansion reproduces every vertex,
            // instead of collapsing the segment to its two named endpoints.
            let mut chain = vec![p1];
            for (k, &(lat, lon)) in e.polyline.iter().enumerate() {
                let id = RawNodeId(nodes.len() as u32);
                nodes.push(RawNode {
                    id,
                    source_id: format!("{}~{}#{}", e.p1, e.p2, k),
                    coord: Coordinate::new(lat, lon),
                    is_junction: false,
                    label: None,
                });
                chain.push(id);
            }
            chain.push(p2);
            for pair in chain.windows(2) {
                push_edge_both_ways(&nodes, &mut edges, pair[0], pair[1], e.directed)
                    .map_err(LoaderError::Unavailable)?;
            }
        }

        Ok(Self { nodes, edges })
    }

    pub fn from_reader<R: Read>(r: R) -> Result<Self, LoaderError> {
        let doc: NetworkDocument =
            serde_json::from_reader(r).map_err(|e| LoaderError::Unavailable(e.to_string()))?;
        Self::from_document(doc)
    }
}

fn push_edge_both_ways(
    nodes: &[RawNode],
    edges: &mut Vec<RawEdge>,
    p1: RawNodeId,
    p2: RawNodeId,
    directed: bool,
) -> Result<(), String> {
    let c1 = nodes[p1.index()].coord;
    let c2 = nodes[p2.index()].coord;
    let fwd_polyline = vec![p1, p2];

    let length = geodesy::distance(&c1, &c2).map_err(|e| e.to_string())?;
    if length <= 0.0 {
        return Ok(()); // zero-length edges are dropped, per spec.md §4.C
    }
    let bearing_fwd = geodesy::bearing(&c1, &c2).map_err(|e| e.to_string())?;
    edges.push(RawEdge {
        p1,
        p2,
        length_m: length,
        bearing: bearing_fwd,
        polyline: fwd_polyline,
    });
    if !directed {
        let bearing_rev = geodesy::bearing(&c2, &c1).map_err(|e| e.to_string())?;
        edges.push(RawEdge {
            p1: p2,
            p2: p1,
            length_m: length,
            bearing: bearing_rev,
            polyline: vec![p2, p1],
        });
    }
    Ok(())
}

impl NetworkLoader for StaticNetworkLoader {
    fn fetch(&self, centre: &Coordinate, radius_m: f64) -> Result<(Vec<RawNode>, Vec<RawEdge>), LoaderError> {
        let in_range: std::collections::HashSet<RawNodeId> = self
            .nodes
            .iter()
            .filter(|n| {
                geodesy::distance(&n.coord, centre)
                    .map(|d| d <= radius_m)
                    .unwrap_or(false)
            })
            .map(|n| n.id)
            .collect();

        if in_range.is_empty() {
            return Err(LoaderError::Empty(format!(
                "no nodes within {radius_m} m of ({}, {})",
                centre.lat, centre.lon
            )));
        }

        let nodes: Vec<_> = self
            .nodes
            .iter()
            .filter(|n| in_range.contains(&n.id))
            .cloned()
            .collect();
        let edges: Vec<_> = self
            .edges
            .iter()
            .filter(|e| in_range.contains(&e.p1) && in_range.contains(&e.p2))
            .cloned()
            .collect();
        Ok((nodes, edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> NetworkDocument {
        NetworkDocument {
            nodes: vec![
                NodeRecord { id: "a".into(), lat: 0.0, lon: 0.0, is_junction: true, label: Some("A".into()) },
                NodeRecord { id: "b".into(), lat: 0.01, lon: 0.0, is_junction: true, label: Some("B".into()) },
            ],
            edges: vec![EdgeRecord { p1: "a".into(), p2: "b".into(), directed: false, polyline: vec![] }],
        }
    }

    #[test]
    fn loads_and_expands_undirected_edge_both_ways() {
        let loader = StaticNetworkLoader::from_document(doc()).unwrap();
        let (nodes, edges) = loader.fetch(&Coordinate::new(0.0, 0.0), 5_000.0).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(edges.len(), 2);
        let fwd = edges.iter().find(|e| e.p1 == nodes[0].id).unwrap();
        let rev = edges.iter().find(|e| e.p1 == nodes[1].id).unwrap();
        assert!((fwd.length_m - rev.length_m).abs() < 1e-6);
        assert!((geodesy::angle_diff(fwd.bearing, (rev.bearing + 180.0) % 360.0)) < 1e-6);
    }

    #[test]
    fn empty_region_is_fatal() {
        let loader = StaticNetworkLoader::from_document(doc()).unwrap();
        let err = loader.fetch(&Coordinate::new(45.0, 45.0), 100.0).unwrap_err();
        assert!(matches!(err, LoaderError::Empty(_)));
    }

    #[test]
    fn edge_polyline_is_synthesized_into_interior_raw_nodes() {
        let mut with_shape = doc();
        with_shape.edges = vec![EdgeRecord {
            p1: "a".into(),
            p2: "b".into(),
            directed: false,
            polyline: vec![(0.003, 0.002), (0.006, -0.002)], // zigzag, strictly longer than the straight line a-b
        }];
        let loader = StaticNetworkLoader::from_document(with_shape).unwrap();
        let (nodes, edges) = loader.fetch(&Coordinate::new(0.0, 0.0), 5_000.0).unwrap();
        // a, b, plus two synthesized interior shape points.
        assert_eq!(nodes.len(), 4);
        assert!(nodes.iter().filter(|n| !n.is_junction).count() == 2);
        // Four hops total (a-p1, p1-p2, p2-b), each stored both ways.
        assert_eq!(edges.len(), 6);

        let a = nodes.iter().find(|n| n.source_id == "a").unwrap();
        let b = nodes.iter().find(|n| n.source_id == "b").unwrap();
        let shape_points: Vec<_> = nodes.iter().filter(|n| !n.is_junction).collect();
        let mut chain = vec![a.coord];
        chain.extend(shape_points.iter().map(|n| n.coord));
        chain.push(b.coord);
        let summed: f64 = chain
            .windows(2)
            .map(|pair| geodesy::distance(&pair[0], &pair[1]).unwrap())
            .sum();
        let direct = geodesy::distance(&a.coord, &b.coord).unwrap();
        // The shaped path is longer than the straight line between endpoints.
        assert!(summed > direct);
    }
}
