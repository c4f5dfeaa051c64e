pub mod engine;
pub mod geo;
pub mod grid;
pub mod pipeline;
pub mod population;
pub mod roads;

pub use crate::domain::model::{BoundingBox, DivisionSpec, Feature, FeatureCollection};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
