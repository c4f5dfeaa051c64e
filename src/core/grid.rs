use crate::core::geo;
use crate::domain::model::{BoundingBox, DivisionSpec, Feature, FeatureCollection, Polygon};
use crate::utils::error::{GridError, Result};

/// Grid sizing modes, mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Divide each axis into as many equal divisions of at least this many
    /// meters as fit, redistributing the remainder.
    MinDivisionMeters(f64),
    /// Explicit division counts per axis; degree spans divided evenly.
    Explicit { lat: usize, lon: usize },
}

/// Partitions the bounds into a row-major grid of rectangular cells.
///
/// Axis distances are measured along the box edges: width from the SW to SE
/// corner, height from SW to NW. Returns the collection together with the
/// per-axis division specs as `[latitude axis, longitude axis]`. Emission
/// walks latitude in the outer loop and longitude in the inner loop, so the
/// cell count is exactly `specs[0].count * specs[1].count`.
pub fn build_grid(
    bounds: &BoundingBox,
    sizing: &Sizing,
) -> Result<(FeatureCollection, [DivisionSpec; 2])> {
    let height_meters = geo::geodesic_meters(bounds.sw(), bounds.nw());
    let width_meters = geo::geodesic_meters(bounds.sw(), bounds.se());

    let specs = match *sizing {
        Sizing::MinDivisionMeters(min_division) => {
            let lat_axis = geo::divide_axis(height_meters, min_division)?;
            let lon_axis = geo::divide_axis(width_meters, min_division)?;
            [
                DivisionSpec {
                    count: lat_axis.count,
                    step_degrees: bounds.lat_span() / lat_axis.count as f64,
                    step_meters: lat_axis.size_meters,
                },
                DivisionSpec {
                    count: lon_axis.count,
                    step_degrees: bounds.lon_span() / lon_axis.count as f64,
                    step_meters: lon_axis.size_meters,
                },
            ]
        }
        Sizing::Explicit { lat, lon } => {
            if lat == 0 || lon == 0 {
                return Err(GridError::input(format!(
                    "division counts must be positive, got {}x{}",
                    lat, lon
                )));
            }
            [
                DivisionSpec {
                    count: lat,
                    step_degrees: bounds.lat_span() / lat as f64,
                    step_meters: height_meters / lat as f64,
                },
                DivisionSpec {
                    count: lon,
                    step_degrees: bounds.lon_span() / lon as f64,
                    step_meters: width_meters / lon as f64,
                },
            ]
        }
    };

    let lat_step = specs[0].step_degrees;
    let lon_step = specs[1].step_degrees;

    let mut features = Vec::with_capacity(specs[0].count * specs[1].count);
    let mut lat = bounds.min_lat;
    for _ in 0..specs[0].count {
        let mut lon = bounds.min_lon;
        for _ in 0..specs[1].count {
            features.push(Feature::new(Polygon::rectangle(
                lon,
                lat,
                lon + lon_step,
                lat + lat_step,
            )));
            lon += lon_step;
        }
        lat += lat_step;
    }

    Ok((FeatureCollection::new(features), specs))
}
