pub mod replies;
pub mod rules;
pub mod service;

pub use service::{HealthReport, Prediction, TriageService};
