use serde::{Deserialize, Serialize};

use super::label::Label;

/// One synthesized email as written to the dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub subject: String,
    pub body: String,
    pub label: Label,
}

/// A dataset row as read back by the trainer. Text columns may be empty and
/// labels are kept as raw strings so the classifier learns whatever label set
/// the file carries.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub label: String,
}

impl DatasetRow {
    /// Subject and body joined by a single space, missing values as "".
    pub fn text(&self) -> String {
        format!(
            "{} {}",
            self.subject.as_deref().unwrap_or(""),
            self.body.as_deref().unwrap_or("")
        )
    }
}
