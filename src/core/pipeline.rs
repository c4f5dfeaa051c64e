use crate::adapters::{OverpassClient, TokioDelay, WorldPopClient};
use crate::core::grid::{build_grid, Sizing};
use crate::core::population::{total_population, PopulationFetcher};
use crate::core::roads::overpass_query;
use crate::domain::model::{BoundingBox, DivisionSpec, FeatureCollection};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use crate::utils::summary;
use async_trait::async_trait;
use reqwest::Client;

pub const GRID_FILE: &str = "grid.geojson";
pub const POPULATION_FILE: &str = "pop.geojson";
pub const ROADS_FILE: &str = "roads.xml";
pub const SUMMARY_FILE: &str = "summary.md";

/// Stage implementation for one bounding box: grid construction, population
/// annotation, road layout retrieval, and artifact persistence.
pub struct GridPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    bounds: BoundingBox,
    sizing: Sizing,
    fetcher: PopulationFetcher<WorldPopClient, TokioDelay>,
    roads: OverpassClient,
}

impl<S: Storage, C: ConfigProvider> GridPipeline<S, C> {
    pub fn new(storage: S, config: C, bounds: BoundingBox, sizing: Sizing) -> Self {
        let client = Client::new();
        let stats = WorldPopClient::new(
            client.clone(),
            config.stats_endpoint(),
            config.tasks_endpoint(),
        );
        let fetcher = PopulationFetcher::new(stats, TokioDelay, config.dataset(), config.year());
        let roads = OverpassClient::new(client, config.overpass_endpoint());

        Self {
            storage,
            config,
            bounds,
            sizing,
            fetcher,
            roads,
        }
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for GridPipeline<S, C> {
    async fn build_grid(&self) -> Result<(FeatureCollection, [DivisionSpec; 2])> {
        let (grid, specs) = build_grid(&self.bounds, &self.sizing)?;

        let document = serde_json::to_vec_pretty(&grid)?;
        self.storage.write_file(GRID_FILE, &document).await?;

        let report = summary::summary_markdown(&self.bounds, &specs);
        self.storage.write_file(SUMMARY_FILE, report.as_bytes()).await?;

        Ok((grid, specs))
    }

    async fn annotate_population(&self, grid: &mut FeatureCollection) -> Result<()> {
        match self.fetcher.annotate(grid).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // Keep whatever was annotated so a rerun can resume from it
                tracing::warn!("Persisting partially annotated grid before aborting");
                let document = serde_json::to_vec_pretty(grid)?;
                self.storage.write_file(POPULATION_FILE, &document).await?;
                Err(e)
            }
        }
    }

    async fn fetch_roads(&self) -> Result<String> {
        let query = overpass_query(&self.bounds);
        tracing::debug!("Overpass query: {}", query);
        self.roads.fetch(&query).await
    }

    async fn load(&self, grid: FeatureCollection, roads: String) -> Result<String> {
        let document = serde_json::to_vec_pretty(&grid)?;
        self.storage.write_file(POPULATION_FILE, &document).await?;
        self.storage.write_file(ROADS_FILE, roads.as_bytes()).await?;

        let mut report =
            String::from_utf8_lossy(&self.storage.read_file(SUMMARY_FILE).await?).into_owned();
        report.push_str(&summary::population_section(
            total_population(&grid),
            grid.features.len(),
        ));
        self.storage.write_file(SUMMARY_FILE, report.as_bytes()).await?;

        Ok(self.config.output_path().to_string())
    }
}
