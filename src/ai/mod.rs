pub mod artifacts;
pub mod inference;
pub mod linear_svc;
pub mod vectorizer;

pub use artifacts::{ArtifactError, ArtifactPaths};
pub use inference::{InferenceError, TextClassifier, TrainedModel};
