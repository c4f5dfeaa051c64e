use crate::utils::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Property key carrying a cell's annotated population count.
pub const POPULATION_KEY: &str = "population";

/// Axis-aligned rectangular bounds, normalized to min/max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Builds normalized bounds from 2 diagonally opposite corners or all
    /// 4 corners, given as `(lat, lon)` pairs. Any other point count is an
    /// input error, as is a box with zero width or height.
    pub fn from_corners(corners: &[(f64, f64)]) -> Result<Self> {
        if corners.len() != 2 && corners.len() != 4 {
            return Err(GridError::Input {
                message: format!(
                    "bounds must be 2 or 4 corner points, got {}",
                    corners.len()
                ),
            });
        }

        let mut bounds = Self {
            min_lat: f64::INFINITY,
            min_lon: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for &(lat, lon) in corners {
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.max_lat = bounds.max_lat.max(lat);
            bounds.min_lon = bounds.min_lon.min(lon);
            bounds.max_lon = bounds.max_lon.max(lon);
        }

        if bounds.lat_span() <= 0.0 || bounds.lon_span() <= 0.0 {
            return Err(GridError::Input {
                message: "bounds are degenerate (zero width or height)".to_string(),
            });
        }

        Ok(bounds)
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// South-west corner as `(lat, lon)`.
    pub fn sw(&self) -> (f64, f64) {
        (self.min_lat, self.min_lon)
    }

    /// South-east corner as `(lat, lon)`.
    pub fn se(&self) -> (f64, f64) {
        (self.min_lat, self.max_lon)
    }

    /// North-west corner as `(lat, lon)`.
    pub fn nw(&self) -> (f64, f64) {
        (self.max_lat, self.min_lon)
    }
}

/// Per-axis division geometry produced by the grid builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivisionSpec {
    pub count: usize,
    pub step_degrees: f64,
    /// Informational division size along the axis, in meters.
    pub step_meters: f64,
}

/// GeoJSON Polygon geometry. Grid cells are single 4-vertex `(lon, lat)`
/// rings, closed implicitly by the first vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl Polygon {
    /// Rectangle ring in counter-clockwise order, starting at the min corner.
    pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            geometry_type: "Polygon".to_string(),
            coordinates: vec![vec![
                [min_lon, min_lat],
                [max_lon, min_lat],
                [max_lon, max_lat],
                [min_lon, max_lat],
            ]],
        }
    }
}

/// GeoJSON Feature: one grid cell plus its mutable property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub properties: HashMap<String, serde_json::Value>,
    pub geometry: Polygon,
}

impl Feature {
    pub fn new(geometry: Polygon) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            properties: HashMap::new(),
            geometry,
        }
    }

    pub fn population(&self) -> Option<f64> {
        self.properties.get(POPULATION_KEY).and_then(|v| v.as_f64())
    }

    pub fn set_population(&mut self, population: f64) {
        self.properties.insert(
            POPULATION_KEY.to_string(),
            serde_json::Value::from(population),
        );
    }
}

/// GeoJSON FeatureCollection. Cell order is row-major and significant:
/// downstream summaries reconstruct divisions from the same traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Wraps one feature for a single-feature stats request.
    pub fn single(feature: Feature) -> Self {
        Self::new(vec![feature])
    }
}

/// Response envelope shared by the stats query and task-status endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub data: Option<StatsData>,
    #[serde(default)]
    pub taskid: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl StatsResponse {
    pub fn is_error(&self) -> bool {
        self.error.unwrap_or(false)
    }

    /// True when the service escalated the request to a long-running task.
    pub fn is_task_status(&self) -> bool {
        matches!(
            self.status.as_deref(),
            Some("created") | Some("started") | Some("finished")
        )
    }

    pub fn is_finished(&self) -> bool {
        self.status.as_deref() == Some("finished")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsData {
    pub total_population: f64,
}

/// Transient per-cell fetch state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskState {
    Pending,
    InFlight,
    Polling,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct PopulationTask {
    pub cell: usize,
    pub state: TaskState,
    pub task_id: Option<String>,
    pub backoff_seconds: u64,
}

impl PopulationTask {
    pub fn new(cell: usize, initial_backoff_seconds: u64) -> Self {
        Self {
            cell,
            state: TaskState::Pending,
            task_id: None,
            backoff_seconds: initial_backoff_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_normalized_from_two_corners() {
        let bounds =
            BoundingBox::from_corners(&[(50.737069, -3.559872), (50.704257, -3.491951)]).unwrap();

        assert_eq!(bounds.min_lat, 50.704257);
        assert_eq!(bounds.max_lat, 50.737069);
        assert_eq!(bounds.min_lon, -3.559872);
        assert_eq!(bounds.max_lon, -3.491951);
        assert!(bounds.lat_span() > 0.0);
        assert!(bounds.lon_span() > 0.0);
    }

    #[test]
    fn test_bounds_from_four_corners() {
        let bounds = BoundingBox::from_corners(&[
            (50.7, -3.5),
            (50.7, -3.4),
            (50.8, -3.5),
            (50.8, -3.4),
        ])
        .unwrap();

        assert_eq!(bounds.sw(), (50.7, -3.5));
        assert_eq!(bounds.se(), (50.7, -3.4));
        assert_eq!(bounds.nw(), (50.8, -3.5));
    }

    #[test]
    fn test_bounds_reject_wrong_point_count() {
        assert!(BoundingBox::from_corners(&[(50.7, -3.5)]).is_err());
        assert!(BoundingBox::from_corners(&[(50.7, -3.5), (50.8, -3.4), (50.9, -3.3)]).is_err());
        assert!(BoundingBox::from_corners(&[]).is_err());
    }

    #[test]
    fn test_bounds_reject_degenerate_box() {
        assert!(BoundingBox::from_corners(&[(50.7, -3.5), (50.7, -3.4)]).is_err());
        assert!(BoundingBox::from_corners(&[(50.7, -3.5), (50.8, -3.5)]).is_err());
    }

    #[test]
    fn test_feature_population_roundtrip() {
        let mut feature = Feature::new(Polygon::rectangle(-3.5, 50.7, -3.4, 50.8));
        assert_eq!(feature.population(), None);

        feature.set_population(1234.5);
        assert_eq!(feature.population(), Some(1234.5));
    }

    #[test]
    fn test_geojson_serialization_shape() {
        let feature = Feature::new(Polygon::rectangle(-3.5, 50.7, -3.4, 50.8));
        let doc = serde_json::to_value(FeatureCollection::single(feature)).unwrap();

        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["features"][0]["type"], "Feature");
        assert_eq!(doc["features"][0]["geometry"]["type"], "Polygon");

        // One implicitly closed 4-vertex ring, counter-clockwise from min corner
        let ring = &doc["features"][0]["geometry"]["coordinates"][0];
        assert_eq!(ring.as_array().unwrap().len(), 4);
        assert_eq!(ring[0][0], -3.5);
        assert_eq!(ring[0][1], 50.7);
        assert_eq!(ring[1][0], -3.4);
        assert_eq!(ring[2][1], 50.8);
    }

    #[test]
    fn test_stats_response_classification() {
        let envelope: StatsResponse = serde_json::from_value(serde_json::json!({
            "status": "started", "error": false, "taskid": "abc"
        }))
        .unwrap();
        assert!(!envelope.is_error());
        assert!(envelope.is_task_status());
        assert!(!envelope.is_finished());

        let failed: StatsResponse = serde_json::from_value(serde_json::json!({
            "status": "failed", "error": true, "error_message": "boom"
        }))
        .unwrap();
        assert!(failed.is_error());
        assert!(!failed.is_task_status());
    }
}
