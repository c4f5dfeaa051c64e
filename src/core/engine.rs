use crate::core::population::{average_population, total_population};
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Drives the pipeline stages in order: grid, population, roads, artifacts.
pub struct GridEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> GridEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Building grid...");
        let (mut grid, specs) = self.pipeline.build_grid().await?;
        println!(
            "Generated {} cells ({}x{})",
            grid.features.len(),
            specs[1].count,
            specs[0].count
        );

        println!("Fetching population data...");
        self.pipeline.annotate_population(&mut grid).await?;
        println!(
            "Total population: {:.2} (average {:.2} per cell)",
            total_population(&grid),
            average_population(&grid)
        );

        println!("Fetching road layout...");
        let roads = self.pipeline.fetch_roads().await?;

        println!("Saving artifacts...");
        let output_path = self.pipeline.load(grid, roads).await?;
        println!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
