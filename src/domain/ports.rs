use crate::domain::model::{DivisionSpec, Feature, FeatureCollection, StatsResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn stats_endpoint(&self) -> &str;
    fn tasks_endpoint(&self) -> &str;
    fn overpass_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn dataset(&self) -> &str;
    fn year(&self) -> u16;
}

/// Remote population-statistics service: a region query that may complete
/// synchronously or escalate to a pollable task.
#[async_trait]
pub trait StatsClient: Send + Sync {
    async fn submit_feature(
        &self,
        dataset: &str,
        year: u16,
        feature: &Feature,
    ) -> Result<StatsResponse>;

    async fn task_status(&self, task_id: &str) -> Result<StatsResponse>;
}

/// Sleep seam so the poll backoff is observable in tests.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, seconds: u64);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn build_grid(&self) -> Result<(FeatureCollection, [DivisionSpec; 2])>;
    async fn annotate_population(&self, grid: &mut FeatureCollection) -> Result<()>;
    async fn fetch_roads(&self) -> Result<String>;
    async fn load(&self, grid: FeatureCollection, roads: String) -> Result<String>;
}
