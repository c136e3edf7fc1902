use std::{env, net::SocketAddr, str::FromStr};

use super::env::{
    AppConfig, ConfigError, DatasetConfig, DirectoryConfig, LoggingConfig, ServerConfig,
    TrainingConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so tests do not
    /// have to touch the process environment.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let directories = DirectoryConfig {
            logs_dir: text("LOGS_DIR", "logs"),
            artifacts_dir: text("ARTIFACTS_DIR", "artifacts"),
            model_filename: text("MODEL_FILENAME", "model.bin"),
            vectorizer_filename: text("VECTORIZER_FILENAME", "vectorizer.bin"),
            dataset_path: text("DATASET_PATH", "data/emails.csv"),
        };

        let logging = LoggingConfig {
            level: text("LOG_LEVEL", "info"),
        };

        let server = ServerConfig {
            bind_addr: parse_or(&lookup, "BIND_ADDR", || {
                SocketAddr::from(([127, 0, 0, 1], 8000))
            })?,
        };

        let dataset = DatasetConfig {
            total: parse_or(&lookup, "DATASET_TOTAL", || 150)?,
            seed: parse_opt(&lookup, "DATASET_SEED")?,
        };

        let training = TrainingConfig {
            test_ratio: parse_or(&lookup, "TRAIN_TEST_RATIO", || 0.2)?,
            seed: parse_or(&lookup, "TRAIN_SEED", || 42)?,
            max_features: parse_or(&lookup, "TRAIN_MAX_FEATURES", || 8000)?,
            svm_c: parse_or(&lookup, "SVM_C", || 1.0)?,
        };

        if !(training.test_ratio > 0.0 && training.test_ratio < 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "TRAIN_TEST_RATIO",
                expected: "strictly between 0 and 1",
                value: training.test_ratio.to_string(),
            });
        }
        if !(training.svm_c > 0.0) {
            return Err(ConfigError::OutOfRange {
                key: "SVM_C",
                expected: "positive",
                value: training.svm_c.to_string(),
            });
        }
        if training.max_features == 0 {
            return Err(ConfigError::OutOfRange {
                key: "TRAIN_MAX_FEATURES",
                expected: "at least 1",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            directories,
            logging,
            server,
            dataset,
            training,
        })
    }
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(None),
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or_else(default))
}
