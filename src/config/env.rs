use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub artifacts_dir: String,
    pub model_filename: String,
    pub vectorizer_filename: String,
    pub dataset_path: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub total: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub test_ratio: f64,
    pub seed: u64,
    pub max_features: usize,
    pub svm_c: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for environment variable {key}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must be {expected}, got {value}")]
    OutOfRange {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}
