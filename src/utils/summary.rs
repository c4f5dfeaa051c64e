use crate::domain::model::{BoundingBox, DivisionSpec};

/// Human-readable report of bounds and division geometry. The division
/// specs are `[latitude axis, longitude axis]` as produced by the grid
/// builder; region counts are shown as columns x rows.
pub fn summary_markdown(bounds: &BoundingBox, divisions: &[DivisionSpec; 2]) -> String {
    let lat_axis = &divisions[0];
    let lon_axis = &divisions[1];

    let mut report = String::from("# Data Summary");

    report.push_str(&format!(
        "\n\n## Bounds:\n - Latitude: {} -> {}\n - Longitude: {} -> {}",
        bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
    ));
    report.push_str(&format!(
        "\n - Height: {:.2}m\n - Width: {:.2}m",
        lat_axis.step_meters * lat_axis.count as f64,
        lon_axis.step_meters * lon_axis.count as f64
    ));

    report.push_str(&format!(
        "\n\n## Divisions:\n - {} regions ({}x{})",
        lat_axis.count * lon_axis.count,
        lon_axis.count,
        lat_axis.count
    ));
    report.push_str(&format!(
        "\n - Height: {:.2}m\n - Width: {:.2}m",
        lat_axis.step_meters, lon_axis.step_meters
    ));

    report
}

/// Aggregate population section appended after a successful fetch run.
pub fn population_section(total_population: f64, cell_count: usize) -> String {
    let average = if cell_count == 0 {
        0.0
    } else {
        total_population / cell_count as f64
    };

    format!(
        "\n\n## Population Statistics:\n - Total: {:.2}\n - Average: {:.2}",
        total_population, average
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BoundingBox;

    fn exeter_bounds() -> BoundingBox {
        BoundingBox::from_corners(&[(50.737069, -3.559872), (50.704257, -3.491951)]).unwrap()
    }

    #[test]
    fn test_summary_sections() {
        let divisions = [
            DivisionSpec {
                count: 18,
                step_degrees: 0.0018,
                step_meters: 202.7,
            },
            DivisionSpec {
                count: 23,
                step_degrees: 0.0029,
                step_meters: 207.9,
            },
        ];

        let report = summary_markdown(&exeter_bounds(), &divisions);

        assert!(report.starts_with("# Data Summary"));
        assert!(report.contains("Latitude: 50.704257 -> 50.737069"));
        assert!(report.contains("Longitude: -3.559872 -> -3.491951"));
        assert!(report.contains("414 regions (23x18)"));
        assert!(report.contains(" - Height: 202.70m"));
        assert!(report.contains(" - Width: 207.90m"));
    }

    #[test]
    fn test_population_section() {
        let section = population_section(1000.5, 4);

        assert!(section.contains("## Population Statistics:"));
        assert!(section.contains(" - Total: 1000.50"));
        assert!(section.contains(" - Average: 250.13"));
    }

    #[test]
    fn test_population_section_empty_grid() {
        assert!(population_section(0.0, 0).contains(" - Average: 0.00"));
    }
}
