pub mod split;

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    ai::{
        linear_svc::{LinearSvc, SvcError, SvcParams},
        vectorizer::{TfidfVectorizer, VectorizerError},
        ArtifactError, ArtifactPaths, InferenceError, TextClassifier, TrainedModel,
    },
    config::TrainingConfig,
    dataset::{read_rows, DatasetError},
    domain::DatasetRow,
};

use split::{stratified_split, SplitError};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("failed to split dataset")]
    Split(#[from] SplitError),
    #[error("failed to fit vectorizer")]
    Vectorizer(#[from] VectorizerError),
    #[error("failed to fit classifier")]
    Classifier(#[from] SvcError),
    #[error("failed to score holdout partition")]
    Evaluation(#[from] InferenceError),
    #[error("fitted artifacts disagree on feature count")]
    Inconsistent,
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    pub classes: Vec<String>,
    /// Exact-match accuracy on the holdout partition, in `[0, 1]`.
    pub accuracy: f64,
    pub artifacts: ArtifactPaths,
    pub trained_at: DateTime<Utc>,
}

/// Model fitted on the training partition plus its holdout score.
pub struct FitOutcome {
    pub model: TrainedModel,
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
}

/// Splits `rows`, fits the vectorizer and classifier on the training part
/// only, and scores the held-out part.
pub fn fit(rows: &[DatasetRow], config: &TrainingConfig) -> Result<FitOutcome, TrainError> {
    let texts: Vec<String> = rows.iter().map(DatasetRow::text).collect();
    let labels: Vec<String> = rows.iter().map(|row| row.label.clone()).collect();

    let split = stratified_split(&labels, config.test_ratio, config.seed)?;
    let train_texts: Vec<&str> = split.train.iter().map(|&i| texts[i].as_str()).collect();
    let train_labels: Vec<String> = split.train.iter().map(|&i| labels[i].clone()).collect();

    let (vectorizer, train_rows) =
        TfidfVectorizer::fit_transform(Some(config.max_features), &train_texts)?;
    let params = SvcParams { c: config.svm_c };
    let classifier = LinearSvc::fit(&params, &train_rows, &train_labels)?;
    let model = TrainedModel::new(vectorizer, classifier).ok_or(TrainError::Inconsistent)?;

    let mut correct = 0;
    for &i in &split.test {
        if model.classify(&texts[i])?.label == labels[i] {
            correct += 1;
        }
    }
    let accuracy = accuracy(correct, split.test.len());

    Ok(FitOutcome {
        model,
        train_size: split.train.len(),
        test_size: split.test.len(),
        accuracy,
    })
}

fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// One-shot batch job: dataset in, two artifacts out. Any failure aborts the
/// run before anything is persisted.
pub fn run_training(
    dataset_path: &Path,
    config: &TrainingConfig,
    artifacts: &ArtifactPaths,
) -> Result<TrainingReport, TrainError> {
    let rows = read_rows(dataset_path)?;
    tracing::info!(
        target: "train",
        rows = rows.len(),
        path = %dataset_path.display(),
        "dataset loaded"
    );

    let outcome = fit(&rows, config)?;
    tracing::info!(
        target: "train",
        train = outcome.train_size,
        test = outcome.test_size,
        vocabulary = outcome.model.vectorizer().n_features(),
        "model fitted"
    );
    tracing::info!(target: "train", "Accuracy: {:.2}%", outcome.accuracy * 100.0);

    outcome.model.save(artifacts)?;
    tracing::info!(
        target: "train",
        model = %artifacts.model.display(),
        vectorizer = %artifacts.vectorizer.display(),
        "artifacts saved"
    );

    Ok(TrainingReport {
        train_size: outcome.train_size,
        test_size: outcome.test_size,
        vocabulary_size: outcome.model.vectorizer().n_features(),
        classes: outcome.model.classifier().classes().to_vec(),
        accuracy: outcome.accuracy,
        artifacts: artifacts.clone(),
        trained_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::dataset::{write_records, Distribution, Synthesizer};

    fn training_config() -> TrainingConfig {
        TrainingConfig {
            test_ratio: 0.2,
            seed: 42,
            max_features: 8000,
            svm_c: 1.0,
        }
    }

    #[test]
    fn synthetic_dataset_trains_end_to_end() {
        let dir = tempdir().unwrap();
        let dataset = dir.path().join("emails.csv");
        let records = Synthesizer::from_seed(Some(3)).generate(150, &Distribution::default());
        write_records(&dataset, &records).unwrap();

        let artifacts =
            ArtifactPaths::new(&dir.path().join("artifacts"), "model.bin", "vectorizer.bin");
        let report = run_training(&dataset, &training_config(), &artifacts).unwrap();

        assert_eq!(report.train_size, 120);
        assert_eq!(report.test_size, 30);
        assert_eq!(report.classes, ["high_priority", "normal", "spam"]);
        assert!(report.vocabulary_size > 0);
        assert!(report.accuracy >= 0.9, "accuracy was {}", report.accuracy);

        let model = TrainedModel::load(&artifacts).unwrap();
        let output = model
            .classify("Please find the attached notes from our last call.")
            .unwrap();
        assert_eq!(output.label, "normal");
    }

    #[test]
    fn vocabulary_respects_max_features() {
        let records = Synthesizer::from_seed(Some(11)).generate(60, &Distribution::new(vec![
            (crate::domain::Label::Normal, 20),
            (crate::domain::Label::Spam, 20),
            (crate::domain::Label::HighPriority, 20),
        ]));
        let rows: Vec<DatasetRow> = records
            .iter()
            .map(|r| DatasetRow {
                subject: Some(r.subject.clone()),
                body: Some(r.body.clone()),
                label: r.label.to_string(),
            })
            .collect();
        let config = TrainingConfig {
            max_features: 25,
            ..training_config()
        };
        let outcome = fit(&rows, &config).unwrap();
        assert_eq!(outcome.model.vectorizer().n_features(), 25);
    }

    #[test]
    fn single_label_dataset_fails() {
        let rows: Vec<DatasetRow> = (0..10)
            .map(|i| DatasetRow {
                subject: Some(format!("status report {i}")),
                body: None,
                label: "normal".into(),
            })
            .collect();
        assert!(matches!(
            fit(&rows, &training_config()),
            Err(TrainError::Classifier(SvcError::SingleClass(_)))
        ));
    }

    #[test]
    fn missing_dataset_aborts_without_artifacts() {
        let dir = tempdir().unwrap();
        let artifacts = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        let err = run_training(&dir.path().join("none.csv"), &training_config(), &artifacts)
            .unwrap_err();
        assert!(matches!(err, TrainError::Dataset(_)));
        assert!(!artifacts.model.exists());
        assert!(!artifacts.vectorizer.exists());
    }
}
