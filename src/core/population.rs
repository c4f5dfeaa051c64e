use crate::domain::model::{FeatureCollection, PopulationTask, StatsResponse, TaskState};
use crate::domain::ports::{Delay, StatsClient};
use crate::utils::error::{GridError, Result};

const INITIAL_BACKOFF_SECONDS: u64 = 10;
const BACKOFF_INCREMENT_SECONDS: u64 = 10;

/// Annotates grid cells with population counts from the stats service,
/// one cell at a time.
///
/// Each cell is submitted as a synchronous-first request; when the service
/// escalates to a long-running task the fetcher polls the task status with a
/// linearly growing delay (10s, 20s, 30s, ...). The backoff has no cap and
/// no retry limit. Any service-reported error aborts the whole run.
pub struct PopulationFetcher<S: StatsClient, D: Delay> {
    stats: S,
    delay: D,
    dataset: String,
    year: u16,
}

impl<S: StatsClient, D: Delay> PopulationFetcher<S, D> {
    pub fn new(stats: S, delay: D, dataset: impl Into<String>, year: u16) -> Self {
        Self {
            stats,
            delay,
            dataset: dataset.into(),
            year,
        }
    }

    /// Fills the `population` property of every cell in place.
    ///
    /// Cells that already carry a population are skipped without a remote
    /// call, so rerunning against a partially annotated collection resumes
    /// where the previous run stopped.
    pub async fn annotate(&self, grid: &mut FeatureCollection) -> Result<()> {
        let total = grid.features.len();
        tracing::info!("Fetching population for {} regions", total);

        for (index, feature) in grid.features.iter_mut().enumerate() {
            if feature.population().is_some() {
                tracing::debug!("Cell {}/{} already annotated, skipping", index + 1, total);
                continue;
            }

            let mut task = PopulationTask::new(index, INITIAL_BACKOFF_SECONDS);
            tracing::info!("Requesting population for cell {}/{}", index + 1, total);

            task.state = TaskState::InFlight;
            let response = self
                .stats
                .submit_feature(&self.dataset, self.year, feature)
                .await?;

            let population = match self.resolve(&mut task, response).await {
                Ok(population) => population,
                Err(e) => {
                    tracing::error!("Aborting population fetch: {:?}", task);
                    return Err(e);
                }
            };

            feature.set_population(population);
        }

        Ok(())
    }

    /// Classifies the initial response: direct data, task escalation, or a
    /// fatal error, in that precedence order.
    async fn resolve(&self, task: &mut PopulationTask, response: StatsResponse) -> Result<f64> {
        if !response.is_error() {
            if let Some(data) = response.data {
                task.state = TaskState::Done;
                return Ok(data.total_population);
            }
            if response.is_task_status() {
                return self.poll(task, response.taskid).await;
            }
        }

        task.state = TaskState::Failed;
        Err(GridError::Remote {
            cell: task.cell,
            message: response
                .error_description
                .or(response.error_message)
                .unwrap_or_else(|| {
                    format!("unrecognized stats response (status: {:?})", response.status)
                }),
        })
    }

    async fn poll(&self, task: &mut PopulationTask, taskid: Option<String>) -> Result<f64> {
        let task_id = taskid.ok_or_else(|| GridError::Remote {
            cell: task.cell,
            message: "task response carries no taskid".to_string(),
        })?;
        task.task_id = Some(task_id.clone());
        task.state = TaskState::Polling;

        loop {
            let response = self.stats.task_status(&task_id).await?;

            if !response.is_error() {
                if let Some(data) = response.data {
                    task.state = TaskState::Done;
                    return Ok(data.total_population);
                }
                if !response.is_finished() {
                    tracing::debug!(
                        "Task {} not ready, waiting {}s",
                        task_id,
                        task.backoff_seconds
                    );
                    self.delay.wait(task.backoff_seconds).await;
                    task.backoff_seconds += BACKOFF_INCREMENT_SECONDS;
                    continue;
                }
            }

            task.state = TaskState::Failed;
            return Err(GridError::Remote {
                cell: task.cell,
                message: response
                    .error_message
                    .or(response.error_description)
                    .unwrap_or_else(|| format!("task {} finished without data", task_id)),
            });
        }
    }
}

/// Total population across the collection, derived by reduction rather than
/// accumulated during the fetch so that skipped cells always count.
pub fn total_population(grid: &FeatureCollection) -> f64 {
    grid.features.iter().filter_map(|f| f.population()).sum()
}

pub fn average_population(grid: &FeatureCollection) -> f64 {
    if grid.features.is_empty() {
        0.0
    } else {
        total_population(grid) / grid.features.len() as f64
    }
}
