use std::{
    error::Error as StdError,
    fs,
    path::{Path, PathBuf},
};

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::{inference::TrainedModel, linear_svc::LinearSvc, vectorizer::TfidfVectorizer};

const MAX_ARTIFACT_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to access artifact {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {} is corrupt or not a {kind}", path.display())]
    Corrupt {
        path: PathBuf,
        kind: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("failed to encode {kind} artifact")]
    Encode {
        kind: &'static str,
        #[source]
        source: bincode::Error,
    },
    #[error("classifier expects {classifier} features but vectorizer produces {vectorizer}")]
    Inconsistent { vectorizer: usize, classifier: usize },
}

/// Locations of the two persisted artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: &Path, model_filename: &str, vectorizer_filename: &str) -> Self {
        Self {
            model: dir.join(model_filename),
            vectorizer: dir.join(vectorizer_filename),
        }
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_ARTIFACT_BYTES)
}

fn write_artifact<T: Serialize>(
    path: &Path,
    kind: &'static str,
    value: &T,
) -> Result<(), ArtifactError> {
    let bytes = codec()
        .serialize(value)
        .map_err(|source| ArtifactError::Encode { kind, source })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_artifact<T: DeserializeOwned>(path: &Path, kind: &'static str) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    codec()
        .deserialize(&bytes)
        .map_err(|source| corrupt(path, kind, source))
}

fn corrupt(
    path: &Path,
    kind: &'static str,
    source: impl Into<Box<dyn StdError + Send + Sync>>,
) -> ArtifactError {
    ArtifactError::Corrupt {
        path: path.to_path_buf(),
        kind,
        source: source.into(),
    }
}

impl TrainedModel {
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), ArtifactError> {
        write_artifact(&paths.vectorizer, "vectorizer", self.vectorizer())?;
        write_artifact(&paths.model, "classifier", self.classifier())
    }

    /// Loads both artifacts, checks each one's internal shape and that they
    /// describe the same feature space. Any failure here must keep the
    /// service from starting.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let vectorizer: TfidfVectorizer = read_artifact(&paths.vectorizer, "vectorizer")?;
        vectorizer
            .validate()
            .map_err(|source| corrupt(&paths.vectorizer, "vectorizer", source))?;
        let classifier: LinearSvc = read_artifact(&paths.model, "classifier")?;
        classifier
            .validate()
            .map_err(|source| corrupt(&paths.model, "classifier", source))?;
        let (vectorizer_dim, classifier_dim) = (vectorizer.n_features(), classifier.n_features());
        TrainedModel::new(vectorizer, classifier).ok_or(ArtifactError::Inconsistent {
            vectorizer: vectorizer_dim,
            classifier: classifier_dim,
        })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2};
    use serde::Serialize;
    use tempfile::tempdir;

    use super::*;
    use crate::ai::{inference::TextClassifier, linear_svc::SvcParams};

    fn fitted(docs: &[&str], labels: &[&str]) -> TrainedModel {
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(None, docs).unwrap();
        let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        let classifier = LinearSvc::fit(&SvcParams::default(), &rows, &labels).unwrap();
        TrainedModel::new(vectorizer, classifier).unwrap()
    }

    /// Same field layout as `LinearSvc`, for writing artifacts that decode
    /// fine but are internally inconsistent.
    #[derive(Serialize)]
    struct RawClassifier {
        classes: Vec<String>,
        weights: Array2<f64>,
        intercepts: Array1<f64>,
    }

    fn sample_model() -> TrainedModel {
        fitted(
            &["weekly project notes", "lottery winner reward", "server outage escalated"],
            &["normal", "spam", "high_priority"],
        )
    }

    #[test]
    fn saved_model_loads_and_classifies_identically() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        let model = sample_model();
        model.save(&paths).unwrap();

        let loaded = TrainedModel::load(&paths).unwrap();
        let text = "lottery reward inside";
        assert_eq!(
            loaded.classify(text).unwrap(),
            model.classify(text).unwrap()
        );
    }

    #[test]
    fn missing_artifact_is_reported() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        let err = TrainedModel::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn garbage_bytes_are_corrupt() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        sample_model().save(&paths).unwrap();
        fs::write(&paths.model, b"definitely not a classifier").unwrap();
        let err = TrainedModel::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { kind: "classifier", .. }));
    }

    #[test]
    fn mismatched_pair_is_inconsistent() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        sample_model().save(&paths).unwrap();

        let other = fitted(&["alpha beta", "gamma delta"], &["normal", "spam"]);
        write_artifact(&paths.model, "classifier", other.classifier()).unwrap();

        let err = TrainedModel::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::Inconsistent { .. }));
    }

    #[test]
    fn classifier_without_weight_rows_fails_to_load() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        let model = sample_model();
        model.save(&paths).unwrap();

        let n_features = model.vectorizer().n_features();
        let raw = RawClassifier {
            classes: vec!["normal".into(), "spam".into()],
            weights: Array2::zeros((0, n_features)),
            intercepts: Array1::zeros(2),
        };
        write_artifact(&paths.model, "classifier", &raw).unwrap();

        let err = TrainedModel::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { kind: "classifier", .. }));
    }

    #[test]
    fn classifier_with_short_intercepts_fails_to_load() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        let model = sample_model();
        model.save(&paths).unwrap();

        let raw = RawClassifier {
            classes: model.classifier().classes().to_vec(),
            weights: Array2::zeros((3, model.vectorizer().n_features())),
            intercepts: Array1::zeros(1),
        };
        write_artifact(&paths.model, "classifier", &raw).unwrap();

        let err = TrainedModel::load(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { kind: "classifier", .. }));
    }
}
