use clap::Parser;
use gridpop::utils::{logger, validation::Validate};
use gridpop::{CliConfig, GridEngine, GridPipeline, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting gridpop");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(e.exit_code());
    }

    let bounds = config.parse_bounds()?;
    let sizing = config.sizing()?;

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = GridPipeline::new(storage, config, bounds, sizing);
    let engine = GridEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Grid pipeline completed successfully!");
            println!("✅ Grid pipeline completed successfully!");
            println!("📁 Artifacts saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Pipeline failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
