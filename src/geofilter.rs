//! Geographic visibility filter over prediction records.
//!
//! A prediction's `path` field is the occultation shadow track: an ordered
//! sequence of `[lat, lon]` points across the Earth's surface. A record is
//! visible from a location when the track passes within the location's
//! radius at any point along its segments, not just at the vertices.
//!
//! Distances are great-circle on a spherical Earth. Point-to-segment
//! distance uses the cross-track formula, with the perpendicular foot
//! clamped to the segment: when the foot falls outside, the nearer endpoint
//! distance applies.

use std::f64::consts::FRAC_PI_2;

use serde_json::Value;

use crate::errors::{Error, Result};
use crate::transport::Record;

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A target location and visibility radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180].
    pub longitude: f64,
    /// Visibility radius in kilometers, >= 0.
    pub radius_km: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
        }
    }

    /// Check coordinate and radius ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidArgument(format!(
                "latitude {} out of range [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidArgument(format!(
                "longitude {} out of range [-180, 180]",
                self.longitude
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "radius {} must be a non-negative number of kilometers",
                self.radius_km
            )));
        }
        Ok(())
    }
}

/// Keep the records whose shadow track passes within `location.radius_km`
/// of the target. Stable: survivors keep their relative order.
///
/// Records with an empty, single-point, missing, or malformed `path` are
/// never visible. Fails with [`Error::InvalidArgument`] before looking at
/// any record when the location itself is out of range.
pub fn geofilter(records: Vec<Record>, location: &GeoLocation) -> Result<Vec<Record>> {
    location.validate()?;

    let target = (location.latitude, location.longitude);
    Ok(records
        .into_iter()
        .filter(|record| match record_path(record) {
            Some(path) => path_within_radius(&path, target, location.radius_km),
            None => false,
        })
        .collect())
}

/// Extract a record's shadow track as (lat, lon) degree pairs.
///
/// Returns `None` when the `path` field is absent or not an array of
/// two-number arrays.
pub(crate) fn record_path(record: &Record) -> Option<Vec<(f64, f64)>> {
    let points = record.get("path")?.as_array()?;
    let mut path = Vec::with_capacity(points.len());
    for point in points {
        let pair = point.as_array()?;
        if pair.len() != 2 {
            return None;
        }
        path.push((value_f64(&pair[0])?, value_f64(&pair[1])?));
    }
    Some(path)
}

fn value_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Minimum distance from `target` to any segment of `path`, compared
/// against `radius_km`. A path without a segment is never within radius.
fn path_within_radius(path: &[(f64, f64)], target: (f64, f64), radius_km: f64) -> bool {
    path.windows(2)
        .any(|seg| segment_distance_km(target, seg[0], seg[1]) <= radius_km)
}

/// Great-circle central angle between two (lat, lon) degree points, in
/// radians (haversine form, stable for small separations).
fn central_angle(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (lon2 - lon1) / 2.0;
    let h = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Great-circle distance between two (lat, lon) degree points, in km.
pub(crate) fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_KM
}

/// Initial bearing from `a` to `b`, in radians.
fn initial_bearing(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlon = lon2 - lon1;
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x)
}

/// Minimum great-circle distance in km from point `p` to the segment `a`-`b`.
pub(crate) fn segment_distance_km(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let angle_ap = central_angle(a, p);
    let angle_ab = central_angle(a, b);

    // Degenerate segment: both endpoints coincide.
    if angle_ab < 1e-12 {
        return angle_ap * EARTH_RADIUS_KM;
    }
    if angle_ap < 1e-12 {
        return 0.0;
    }

    let relative_bearing = normalize_angle(initial_bearing(a, p) - initial_bearing(a, b));

    // Perpendicular foot lies behind `a`.
    if relative_bearing.abs() > FRAC_PI_2 {
        return angle_ap * EARTH_RADIUS_KM;
    }

    // Cross-track angle from the great circle through a-b, and the
    // along-track angle of the foot measured from `a`.
    let cross_track = (angle_ap.sin() * relative_bearing.sin()).asin();
    let along_track = (angle_ap.cos() / cross_track.cos()).clamp(-1.0, 1.0).acos();

    // Foot lies past `b`.
    if along_track > angle_ab {
        return central_angle(b, p) * EARTH_RADIUS_KM;
    }

    cross_track.abs() * EARTH_RADIUS_KM
}

/// Wrap an angle to (-pi, pi].
fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % std::f64::consts::TAU;
    if a <= -std::f64::consts::PI {
        a += std::f64::consts::TAU;
    } else if a > std::f64::consts::PI {
        a -= std::f64::consts::TAU;
    }
    a
}
