use crate::utils::error::{GridError, Result};

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle surface distance in meters between two `(lat, lon)` points
/// given in degrees.
///
/// Uses the spherical haversine formula on the mean Earth radius. The atan2
/// form keeps the result finite and well-defined for coincident and
/// antipodal points. This model feeds division counts, so it is the one
/// precision choice that matters; the spherical approximation is within
/// ~0.5% of an ellipsoidal geodesic, which the sizing arithmetic absorbs.
pub fn geodesic_meters(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat_a, lon_a) = (a.0.to_radians(), a.1.to_radians());
    let (lat_b, lon_b) = (b.0.to_radians(), b.1.to_radians());

    let half_dlat = (lat_b - lat_a) / 2.0;
    let half_dlon = (lon_b - lon_a) / 2.0;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * central_angle
}

/// One axis split into equally sized divisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDivision {
    pub count: usize,
    pub size_meters: f64,
}

/// Splits an axis of `distance_meters` into `floor(distance / min)` divisions.
///
/// When the distance is not an exact multiple of the minimum size, the
/// remainder is redistributed evenly so every division has the same,
/// slightly-larger-than-minimum size. Invariant:
/// `count * size_meters == distance_meters` up to float rounding.
pub fn divide_axis(distance_meters: f64, min_division_meters: f64) -> Result<AxisDivision> {
    if min_division_meters <= 0.0 {
        return Err(GridError::input(format!(
            "minimum division size must be positive, got {}",
            min_division_meters
        )));
    }

    let raw_count = distance_meters / min_division_meters;
    let count = raw_count.floor() as usize;
    if count == 0 {
        return Err(GridError::input(format!(
            "axis of {:.2}m is shorter than the minimum division size {:.2}m",
            distance_meters, min_division_meters
        )));
    }

    let fraction = raw_count.fract();
    let size_meters = if fraction == 0.0 {
        min_division_meters
    } else {
        min_division_meters + fraction * min_division_meters / count as f64
    };

    Ok(AxisDivision { count, size_meters })
}
