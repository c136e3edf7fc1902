use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of triage categories shared by the dataset, the keyword
/// rules and the reply table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Normal,
    Spam,
    HighPriority,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Normal, Label::Spam, Label::HighPriority];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Normal => "normal",
            Label::Spam => "spam",
            Label::HighPriority => "high_priority",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Label::Normal),
            "spam" => Ok(Label::Spam),
            "high_priority" => Ok(Label::HighPriority),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}
