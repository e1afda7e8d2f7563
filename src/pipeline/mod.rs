//! Pipeline driver and its configuration

mod config;
mod training;

pub use config::PipelineConfig;
pub use training::{PipelineReport, TrainingPipeline};
