use crate::domain::model::BoundingBox;

/// Overpass QL selecting named, highway-tagged ways (and their nodes)
/// strictly inside the box, skipping ways mapped as areas (plazas etc).
/// The bbox filter order is south, west, north, east.
pub fn overpass_query(bounds: &BoundingBox) -> String {
    format!(
        "[out:xml];way({},{},{},{})['name']['highway']['area'!~'yes'];(._;>;);out;",
        bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon
    )
}
