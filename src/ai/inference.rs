use thiserror::Error;

use super::{
    linear_svc::LinearSvc,
    vectorizer::{TfidfVectorizer, VectorizerError},
};

/// Failures raised while scoring text with the fitted artifacts.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("classifier expects {expected} features but got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("failed to vectorize text")]
    Vectorize(#[from] VectorizerError),
    #[error("classifier produced a non-finite score for class {class}")]
    NonFiniteScore { class: String },
    #[error("classifier has no classes")]
    NoClasses,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub label: String,
    /// Raw decision value of the winning class.
    pub margin: f64,
}

/// Statistical fallback consulted when no keyword rule matches.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<ModelOutput, InferenceError>;
}

/// The fitted vectorizer/classifier pair, owned exclusively.
#[derive(Debug)]
pub struct TrainedModel {
    vectorizer: TfidfVectorizer,
    classifier: LinearSvc,
}

impl TrainedModel {
    /// Returns `None` when the classifier was fitted on a different feature
    /// space than the vectorizer produces.
    pub fn new(vectorizer: TfidfVectorizer, classifier: LinearSvc) -> Option<Self> {
        (vectorizer.n_features() == classifier.n_features()).then_some(Self {
            vectorizer,
            classifier,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LinearSvc {
        &self.classifier
    }
}

impl TextClassifier for TrainedModel {
    fn classify(&self, text: &str) -> Result<ModelOutput, InferenceError> {
        let features = self.vectorizer.transform(text)?;
        if features.iter().all(|value| *value == 0.0) {
            tracing::debug!(
                target: "service",
                "no in-vocabulary terms; decision rests on intercepts"
            );
        }
        let decision = self.classifier.predict(features.view())?;
        Ok(ModelOutput {
            label: decision.class,
            margin: decision.margin,
        })
    }
}
