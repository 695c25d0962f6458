//! Great-circle geodesy primitives.
//!
//! The sphere radius and the exact shape of the haversine formula are part
//! of the tested contract (distances must round-trip within 0.1 %), so
//! they are reproduced by hand here rather than borrowed from a geometry
//! crate whose mean radius differs (e.g. `geo::HaversineDistance` uses
//! 6 371 008.8 m, not the 6 371 000 m this contract specifies). Formula
//! shape grounded on `dt-core::geo::GeoPoint::distance_m`, widened from
//! `f32` to `f64` for metre-level reproducibility.

use crate::error::PlanError;
use crate::types::Coordinate;

/// Mean Earth radius, in metres, as fixed by the specification.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

fn check_lat(c: &Coordinate) -> Result<(), PlanError> {
    if c.lat.abs() > 90.0 {
        Err(PlanError::InvalidInput(format!(
            "latitude {} out of range [-90, 90]",
            c.lat
        )))
    } else {
        Ok(())
    }
}

/// Great-circle distance between `a` and `b`, in metres, over a sphere of
/// radius [`EARTH_RADIUS_M`].
///
/// Antipodal or coincident points are not treated as errors: coincident
/// points return `0.0` by construction of the formula, and antipodal
/// points return `EARTH_RADIUS_M * PI`, both documented corner cases.
pub fn distance(a: &Coordinate, b: &Coordinate) -> Result<f64, PlanError> {
    check_lat(a)?;
    check_lat(b)?;
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    Ok(EARTH_RADIUS_M * c)
}

/// Initial compass bearing from `a` to `b`, in degrees clockwise from true
/// north, in `[0, 360)`.
///
/// Coincident points (where the azimuth is undefined) return `0.0` by
/// convention, a documented corner case.
pub fn bearing(a: &Coordinate, b: &Coordinate) -> Result<f64, PlanError> {
    check_lat(a)?;
    check_lat(b)?;
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    let theta = y.atan2(x).to_degrees();
    Ok((theta + 360.0) % 360.0)
}

/// Smallest unsigned circular difference between two directions, in
/// degrees, in `[0, 180]`.
pub fn angle_diff(alpha: f64, beta: f64) -> f64 {
    let raw = (alpha - beta).abs() % 360.0;
    if raw > 180.0 {
        360.0 - raw
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn coincident_points_are_zero_distance_zero_bearing() {
        let p = c(48.8566, 2.3522);
        assert_eq!(distance(&p, &p).unwrap(), 0.0);
        assert_eq!(bearing(&p, &p).unwrap(), 0.0);
    }

    #[test]
    fn quarter_meridian_is_roughly_quarter_circumference() {
        // North pole to equator is a quarter of the great circle.
        let north_pole = c(90.0, 0.0);
        let equator = c(0.0, 0.0);
        let d = distance(&north_pole, &equator).unwrap();
        let expected = EARTH_RADIUS_M * std::f64::consts::FRAC_PI_2;
        assert!((d - expected).abs() / expected < 1e-6);
    }

    #[test]
    fn bearing_due_north_is_zero() {
        let a = c(0.0, 0.0);
        let b = c(1.0, 0.0);
        assert!(bearing(&a, &b).unwrap().abs() < 1e-9);
    }

    #[test]
    fn bearing_due_east_is_ninety() {
        let a = c(0.0, 0.0);
        let b = c(0.0, 1.0);
        assert!((bearing(&a, &b).unwrap() - 90.0).abs() < 1e-6);
    }

    #[test]
    fn angle_diff_wraps_correctly() {
        assert_eq!(angle_diff(10.0, 350.0), 20.0);
        assert_eq!(angle_diff(0.0, 180.0), 180.0);
        assert_eq!(angle_diff(90.0, 90.0), 0.0);
        assert_eq!(angle_diff(350.0, 10.0), 20.0);
    }

    #[test]
    fn invalid_latitude_is_rejected() {
        let bad = c(91.0, 0.0);
        let ok = c(0.0, 0.0);
        assert!(matches!(
            distance(&bad, &ok),
            Err(PlanError::InvalidInput(_))
        ));
        assert!(matches!(bearing(&ok, &bad), Err(PlanError::InvalidInput(_))));
    }
}
