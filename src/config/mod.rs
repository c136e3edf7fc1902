pub mod env;
mod loader;

pub use env::{AppConfig, DatasetConfig, DirectoryConfig, TrainingConfig};
pub use loader::load_config;
