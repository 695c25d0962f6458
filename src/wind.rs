//! Wind-effort annotation (`spec.md` §4.E).
//!
//! A pure rewrite of every `G_jct` edge's `effort` field given a wind
//! vector. No collaborator dependency — reshaped from the teacher's
//! `plow.rs` cost-weighting macro (`cycle_cost_compute!`) into a plain
//! function, since the simulated-annealing machinery that macro served is
//! not part of this spec.

use crate::config::Config;
use crate::geodesy::angle_diff;
use crate::junction_graph::JunctionGraph;
use crate::types::WindVector;

/// Signed wind component along the direction of travel `bearing`: positive
/// is tailwind, negative is headwind.
///
/// `spec.md` §4.E gives `c = speed * cos((180 - delta) * pi/180)` with
/// `delta = angle_diff(bearing, wind.bearing)`; this is algebraically
/// `-speed * cos(delta_radians)`, used here because it avoids a second
/// degrees-to-radians conversion. See `spec.md` §9's Open Questions for the
/// equivalence.
pub fn wind_component(bearing: f64, wind: &WindVector) -> f64 {
    let delta = angle_diff(bearing, wind.bearing).to_radians();
    -wind.speed * delta.cos()
}

/// Wind effort for one edge of length `length_m` travelled along
/// `bearing`, per `spec.md` §4.E: `L * (1 + kappa * clip(-c / v_ref, -1, 1))`.
pub fn effort(length_m: f64, bearing: f64, wind: &WindVector, cfg: &Config) -> f64 {
    let c = wind_component(bearing, wind);
    let clipped = (-c / cfg.v_ref).clamp(-1.0, 1.0);
    length_m * (1.0 + cfg.kappa * clipped)
}

/// Rewrites every edge of `jct` with its wind effort under `wind`.
pub fn annotate(jct: &mut JunctionGraph, wind: &WindVector, cfg: &Config) {
    let updates: Vec<_> = jct
        .edges()
        .map(|e| {
            let mut e = e.clone();
            e.effort = Some(effort(e.length_m, e.bearing, wind, cfg));
            e
        })
        .collect();
    for e in updates {
        jct.replace_edge(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wind(speed: f64, bearing: f64) -> WindVector {
        WindVector { speed, bearing }
    }

    #[test]
    fn no_wind_leaves_effort_equal_to_length() {
        let cfg = Config::default();
        let e = effort(1000.0, 90.0, &wind(0.0, 0.0), &cfg);
        assert_eq!(e, 1000.0);
    }

    #[test]
    fn pure_tailwind_at_reference_speed_is_zero_point_four_l() {
        let cfg = Config::default();
        // Travelling east (90) with wind from the west (270) is a pure
        // tailwind.
        let e = effort(1000.0, 90.0, &wind(10.0, 270.0), &cfg);
        assert!((e - 400.0).abs() < 1e-6);
    }

    #[test]
    fn pure_headwind_at_reference_speed_is_one_point_six_l() {
        let cfg = Config::default();
        // Travelling east (90) with wind from the east (90) is a pure
        // headwind.
        let e = effort(1000.0, 90.0, &wind(10.0, 90.0), &cfg);
        assert!((e - 1600.0).abs() < 1e-6);
    }

    #[test]
    fn effort_is_bounded_at_reference_speed() {
        let cfg = Config::default();
        for bearing in (0..360).step_by(15) {
            for wind_bearing in (0..360).step_by(15) {
                let e = effort(1000.0, bearing as f64, &wind(10.0, wind_bearing as f64), &cfg);
                assert!(e >= 400.0 - 1e-9 && e <= 1600.0 + 1e-9);
            }
        }
    }

    #[test]
    fn clips_beyond_reference_speed() {
        let cfg = Config::default();
        let e_at_ref = effort(1000.0, 90.0, &wind(10.0, 90.0), &cfg);
        let e_beyond_ref = effort(1000.0, 90.0, &wind(25.0, 90.0), &cfg);
        assert_eq!(e_at_ref, e_beyond_ref);
    }
}
