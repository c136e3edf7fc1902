use serde::Serialize;

use crate::ai::{ArtifactError, ArtifactPaths, InferenceError, TextClassifier, TrainedModel};

use super::{replies, rules::RuleChain};

/// Reported for every prediction. It is not a calibrated probability; the
/// model's decision margin is only logged.
pub const PLACEHOLDER_CONFIDENCE: f64 = 1.0;

/// Which stage of the pipeline produced a label.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionPath {
    Rule(&'static str),
    Model { margin: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
    #[serde(skip)]
    pub path: DecisionPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub details: HealthDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthDetails {
    pub model_path: String,
    pub vectorizer_path: String,
}

/// Keyword overrides in front of a statistical classifier.
///
/// A value of this type only exists once both artifacts are loaded, so there
/// is no "loading" state to guard against at request time. Nothing here is
/// mutated after construction; share it behind an `Arc`.
pub struct TriageService {
    rules: RuleChain,
    classifier: Box<dyn TextClassifier>,
    artifacts: ArtifactPaths,
}

impl TriageService {
    pub fn new(
        rules: RuleChain,
        classifier: Box<dyn TextClassifier>,
        artifacts: ArtifactPaths,
    ) -> Self {
        Self {
            rules,
            classifier,
            artifacts,
        }
    }

    /// Loads the persisted artifacts with the default rule chain. Failure is
    /// terminal for the process.
    pub fn load(artifacts: ArtifactPaths) -> Result<Self, ArtifactError> {
        let model = TrainedModel::load(&artifacts)?;
        tracing::info!(
            target: "service",
            model = %artifacts.model.display(),
            vectorizer = %artifacts.vectorizer.display(),
            features = model.vectorizer().n_features(),
            classes = ?model.classifier().classes(),
            "artifacts loaded"
        );
        Ok(Self::new(RuleChain::default(), Box::new(model), artifacts))
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, InferenceError> {
        let (label, path) = match self.rules.evaluate(text) {
            Some(rule) => (rule.label.to_string(), DecisionPath::Rule(rule.name)),
            None => {
                let output = self.classifier.classify(text)?;
                (output.label, DecisionPath::Model { margin: output.margin })
            }
        };

        match &path {
            DecisionPath::Rule(rule) => {
                tracing::debug!(target: "service", label = %label, rule, "keyword override")
            }
            DecisionPath::Model { margin } => {
                tracing::debug!(target: "service", label = %label, margin, "model fallback")
            }
        }

        Ok(Prediction {
            label,
            confidence: PLACEHOLDER_CONFIDENCE,
            path,
        })
    }

    pub fn suggest_reply(&self, label: &str) -> &'static str {
        replies::suggest_reply(label)
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            details: HealthDetails {
                model_path: self.artifacts.model.display().to_string(),
                vectorizer_path: self.artifacts.vectorizer.display().to_string(),
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;

    use super::*;
    use crate::{ai::inference::ModelOutput, domain::Label, triage::replies::FALLBACK_REPLY};

    /// Classifier double that always answers with the same label.
    pub(crate) struct FixedClassifier(pub &'static str);

    impl TextClassifier for FixedClassifier {
        fn classify(&self, _text: &str) -> Result<ModelOutput, InferenceError> {
            Ok(ModelOutput {
                label: self.0.to_string(),
                margin: 0.25,
            })
        }
    }

    pub(crate) struct FailingClassifier;

    impl TextClassifier for FailingClassifier {
        fn classify(&self, _text: &str) -> Result<ModelOutput, InferenceError> {
            Err(InferenceError::NonFiniteScore {
                class: "normal".into(),
            })
        }
    }

    pub(crate) fn service_with(classifier: Box<dyn TextClassifier>) -> TriageService {
        TriageService::new(
            RuleChain::default(),
            classifier,
            ArtifactPaths::new(Path::new("/srv/triage"), "model.bin", "vectorizer.bin"),
        )
    }

    #[test]
    fn urgent_keywords_override_the_model() {
        let service = service_with(Box::new(FixedClassifier("spam")));
        let prediction = service.predict("Payment overdue, please process ASAP").unwrap();
        assert_eq!(prediction.label, "high_priority");
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.path, DecisionPath::Rule("urgent_keywords"));
    }

    #[test]
    fn spam_keywords_override_the_model() {
        let service = service_with(Box::new(FixedClassifier("normal")));
        let prediction = service
            .predict("Congratulations, claim your free prize today")
            .unwrap();
        assert_eq!(prediction.label, "spam");
        assert_eq!(prediction.confidence, 1.0);
    }

    #[test]
    fn plain_text_uses_the_model_verbatim() {
        let service = service_with(Box::new(FixedClassifier("some_new_class")));
        let prediction = service.predict("Notes from our weekly sync").unwrap();
        assert_eq!(prediction.label, "some_new_class");
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.path, DecisionPath::Model { margin: 0.25 });
    }

    #[test]
    fn empty_text_reaches_the_model() {
        let service = service_with(Box::new(FixedClassifier("normal")));
        assert_eq!(service.predict("").unwrap().label, "normal");
    }

    #[test]
    fn rules_short_circuit_a_failing_model() {
        let service = service_with(Box::new(FailingClassifier));
        assert_eq!(
            service.predict("urgent").unwrap().label,
            Label::HighPriority.as_str()
        );
        assert!(service.predict("hello there").is_err());
    }

    #[test]
    fn suggest_reply_is_total() {
        let service = service_with(Box::new(FixedClassifier("normal")));
        assert_eq!(
            service.suggest_reply("SPAM"),
            replies::reply_template(Label::Spam)
        );
        assert_eq!(service.suggest_reply("unknown_label"), FALLBACK_REPLY);
    }

    #[test]
    fn health_reports_artifact_paths() {
        let service = service_with(Box::new(FixedClassifier("normal")));
        let report = service.health();
        assert_eq!(report.status, "ok");
        assert_eq!(report.details.model_path, "/srv/triage/model.bin");
        assert_eq!(report.details.vectorizer_path, "/srv/triage/vectorizer.bin");
    }

    #[test]
    fn load_fails_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "model.bin", "vectorizer.bin");
        assert!(matches!(
            TriageService::load(paths),
            Err(ArtifactError::Missing { .. })
        ));
    }
}
