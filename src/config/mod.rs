pub mod cli;

use crate::core::grid::Sizing;
use crate::domain::model::BoundingBox;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GridError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_float, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "gridpop")]
#[command(about = "Builds a population-annotated GeoJSON grid for a bounding box")]
pub struct CliConfig {
    /// Bounding box corners as comma-separated "lat,lon" values:
    /// 2 diagonally opposite corners (4 numbers) or all 4 corners (8 numbers)
    #[arg(long)]
    pub bounds: String,

    /// Minimum division size in meters
    #[arg(long, default_value = "100")]
    pub min_division: f64,

    /// Explicit division counts as "LAT,LON", overrides --min-division
    #[arg(long)]
    pub divisions: Option<String>,

    /// Year for population statistics (WorldPop covers 2000-2020)
    #[arg(long, default_value = "2010")]
    pub year: u16,

    /// WorldPop dataset identifier
    #[arg(long, default_value = "wpgppop")]
    pub dataset: String,

    #[arg(long, default_value = "./results")]
    pub output_path: String,

    #[arg(long, default_value = "https://api.worldpop.org/v1/services/stats")]
    pub stats_url: String,

    #[arg(long, default_value = "https://api.worldpop.org/v1/tasks")]
    pub tasks_url: String,

    #[arg(long, default_value = "http://overpass-api.de/api/interpreter")]
    pub overpass_url: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn parse_bounds(&self) -> Result<BoundingBox> {
        let values = parse_floats("bounds", &self.bounds)?;
        if values.len() % 2 != 0 {
            return Err(GridError::input(format!(
                "bounds must be lat,lon pairs, got {} values",
                values.len()
            )));
        }
        let corners: Vec<(f64, f64)> = values.chunks(2).map(|pair| (pair[0], pair[1])).collect();
        BoundingBox::from_corners(&corners)
    }

    pub fn sizing(&self) -> Result<Sizing> {
        match &self.divisions {
            Some(spec) => {
                let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
                if parts.len() != 2 {
                    return Err(GridError::InvalidConfigValue {
                        field: "divisions".to_string(),
                        value: spec.clone(),
                        reason: "Expected two counts as LAT,LON".to_string(),
                    });
                }
                let lat = parse_count("divisions", spec, parts[0])?;
                let lon = parse_count("divisions", spec, parts[1])?;
                Ok(Sizing::Explicit { lat, lon })
            }
            None => Ok(Sizing::MinDivisionMeters(self.min_division)),
        }
    }
}

fn parse_floats(field: &str, raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .map(|token| {
            token.parse::<f64>().map_err(|e| GridError::InvalidConfigValue {
                field: field.to_string(),
                value: raw.to_string(),
                reason: format!("'{}' is not a number: {}", token, e),
            })
        })
        .collect()
}

fn parse_count(field: &str, raw: &str, token: &str) -> Result<usize> {
    let count = token
        .parse::<usize>()
        .map_err(|e| GridError::InvalidConfigValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: format!("'{}' is not a valid count: {}", token, e),
        })?;
    if count == 0 {
        return Err(GridError::InvalidConfigValue {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Division counts must be positive".to_string(),
        });
    }
    Ok(count)
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("stats_url", &self.stats_url)?;
        validate_url("tasks_url", &self.tasks_url)?;
        validate_url("overpass_url", &self.overpass_url)?;
        validate_non_empty_string("output_path", &self.output_path)?;
        validate_non_empty_string("dataset", &self.dataset)?;
        if self.divisions.is_none() {
            validate_positive_float("min_division", self.min_division)?;
        }
        self.parse_bounds()?;
        self.sizing()?;
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn stats_endpoint(&self) -> &str {
        &self.stats_url
    }

    fn tasks_endpoint(&self) -> &str {
        &self.tasks_url
    }

    fn overpass_endpoint(&self) -> &str {
        &self.overpass_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn dataset(&self) -> &str {
        &self.dataset
    }

    fn year(&self) -> u16 {
        self.year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            bounds: "50.737069,-3.559872,50.704257,-3.491951".to_string(),
            min_division: 100.0,
            divisions: None,
            year: 2010,
            dataset: "wpgppop".to_string(),
            output_path: "./results".to_string(),
            stats_url: "https://api.worldpop.org/v1/services/stats".to_string(),
            tasks_url: "https://api.worldpop.org/v1/tasks".to_string(),
            overpass_url: "http://overpass-api.de/api/interpreter".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_parse_bounds_two_corners() {
        let bounds = base_config().parse_bounds().unwrap();
        assert_eq!(bounds.min_lat, 50.704257);
        assert_eq!(bounds.max_lon, -3.491951);
    }

    #[test]
    fn test_parse_bounds_four_corners() {
        let mut config = base_config();
        config.bounds = "50.7,-3.5, 50.7,-3.4, 50.8,-3.5, 50.8,-3.4".to_string();
        let bounds = config.parse_bounds().unwrap();
        assert_eq!(bounds.sw(), (50.7, -3.5));
        assert_eq!(bounds.nw(), (50.8, -3.5));
    }

    #[test]
    fn test_parse_bounds_rejects_bad_input() {
        let mut config = base_config();
        config.bounds = "50.7,-3.5,50.8".to_string();
        assert!(config.parse_bounds().is_err());

        config.bounds = "50.7,abc,50.8,-3.4".to_string();
        assert!(config.parse_bounds().is_err());

        // 3 corner points are not a valid bounds description
        config.bounds = "50.7,-3.5,50.8,-3.4,50.9,-3.3".to_string();
        assert!(config.parse_bounds().is_err());
    }

    #[test]
    fn test_sizing_modes() {
        let config = base_config();
        assert_eq!(config.sizing().unwrap(), Sizing::MinDivisionMeters(100.0));

        let mut explicit = base_config();
        explicit.divisions = Some("18,23".to_string());
        assert_eq!(
            explicit.sizing().unwrap(),
            Sizing::Explicit { lat: 18, lon: 23 }
        );
    }

    #[test]
    fn test_sizing_rejects_zero_and_malformed_counts() {
        let mut config = base_config();
        config.divisions = Some("0,23".to_string());
        assert!(config.sizing().is_err());

        config.divisions = Some("18".to_string());
        assert!(config.sizing().is_err());

        config.divisions = Some("18,x".to_string());
        assert!(config.sizing().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_min_division() {
        let mut config = base_config();
        config.stats_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.min_division = 0.0;
        assert!(config.validate().is_err());

        // Explicit divisions make min_division irrelevant
        config.divisions = Some("2,2".to_string());
        assert!(config.validate().is_ok());
    }
}
