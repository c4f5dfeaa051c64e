pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig};
pub use core::engine::GridEngine;
pub use core::grid::Sizing;
pub use core::pipeline::GridPipeline;
pub use domain::model::{BoundingBox, FeatureCollection};
pub use utils::error::{GridError, Result};
