//! Solver configuration.
//!
//! One `serde`-deserialisable struct holding every tunable named in the
//! Configuration table of the specification, loaded from YAML the same way
//! the teacher loads its `meta::Parameters` (`serde_yaml::from_reader`).
//! Every field carries the documented default so a caller can override a
//! single knob with `Config { tolerance: 0.2, ..Config::default() }`.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(default)]
pub struct Config {
    /// Distance band: candidates must fall in `[T*(1-tau), T*(1+tau)]`.
    pub tolerance: f64,
    /// Maximum number of intermediate junctions in a candidate loop.
    pub max_depth: u32,
    /// Wall-clock cap on enumeration, in seconds.
    pub time_budget_s: f64,
    /// Hard limit on stored candidates.
    pub candidate_cap: usize,
    /// Strength of the wind effect in the effort formula.
    pub kappa: f64,
    /// Reference wind speed (m/s) used in effort clipping.
    pub v_ref: f64,
    /// Multiplier on distance fit in candidate scoring.
    pub alpha: f64,
    /// Under-approximation factor for straight-line-to-network distance
    /// ratio, used by the return-feasibility prune. Deliberately not
    /// admissible; see the design notes.
    pub return_prune_factor: f64,
    /// Smallest acceptable loop, in junction edges.
    pub min_loop_edges: u32,
    /// Maximum network distance (m) from the user's coordinate to the
    /// start junction.
    pub approach_max_m: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: 0.15,
            max_depth: 15,
            time_budget_s: 30.0,
            candidate_cap: 500,
            kappa: 0.6,
            v_ref: 10.0,
            alpha: 2.0,
            return_prune_factor: 0.7,
            min_loop_edges: 3,
            approach_max_m: 5_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let c = Config::default();
        assert_eq!(c.tolerance, 0.15);
        assert_eq!(c.max_depth, 15);
        assert_eq!(c.time_budget_s, 30.0);
        assert_eq!(c.candidate_cap, 500);
        assert_eq!(c.kappa, 0.6);
        assert_eq!(c.v_ref, 10.0);
        assert_eq!(c.alpha, 2.0);
        assert_eq!(c.return_prune_factor, 0.7);
        assert_eq!(c.min_loop_edges, 3);
        assert_eq!(c.approach_max_m, 5_000.0);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let c: Config = serde_yaml::from_str("tolerance: 0.2\n").unwrap();
        assert_eq!(c.tolerance, 0.2);
        assert_eq!(c.max_depth, 15);
    }
}
