//! Concrete implementations for external systems: the WorldPop statistics
//! API, the Overpass map-data API, and real sleeps for poll backoff.

use crate::domain::model::{Feature, FeatureCollection, StatsResponse};
use crate::domain::ports::{Delay, StatsClient};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// WorldPop statistics service client. Region queries run synchronous-first
/// (`runasync=false`); long-running requests are monitored through the task
/// endpoint by id.
#[derive(Debug, Clone)]
pub struct WorldPopClient {
    client: Client,
    stats_endpoint: String,
    tasks_endpoint: String,
}

impl WorldPopClient {
    pub fn new(
        client: Client,
        stats_endpoint: impl Into<String>,
        tasks_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            stats_endpoint: stats_endpoint.into(),
            tasks_endpoint: tasks_endpoint.into(),
        }
    }
}

#[async_trait]
impl StatsClient for WorldPopClient {
    async fn submit_feature(
        &self,
        dataset: &str,
        year: u16,
        feature: &Feature,
    ) -> Result<StatsResponse> {
        let geojson = serde_json::to_string(&FeatureCollection::single(feature.clone()))?;
        let year = year.to_string();

        tracing::debug!("Submitting stats request to {}", self.stats_endpoint);
        let response = self
            .client
            .get(&self.stats_endpoint)
            .query(&[
                ("dataset", dataset),
                ("year", &year),
                ("geojson", &geojson),
                ("runasync", "false"),
            ])
            .send()
            .await?;

        tracing::debug!("Stats response status: {}", response.status());
        Ok(response.json().await?)
    }

    async fn task_status(&self, task_id: &str) -> Result<StatsResponse> {
        let url = format!("{}/{}", self.tasks_endpoint.trim_end_matches('/'), task_id);

        tracing::debug!("Polling task status: {}", url);
        let response = self.client.get(&url).send().await?;
        Ok(response.json().await?)
    }
}

/// Overpass API client; returns the response markup verbatim, no parsing.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub async fn fetch(&self, query: &str) -> Result<String> {
        tracing::debug!("Fetching road layout from {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query)])
            .send()
            .await?;
        Ok(response.text().await?)
    }
}

/// Production `Delay`: actually sleeps.
#[derive(Debug, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, seconds: u64) {
        tokio::time::sleep(std::time::Duration::from_secs(seconds)).await;
    }
}
