pub mod io;
mod phrases;
pub mod synth;

use std::path::Path;

use anyhow::{Context, Result};

use crate::{config::DatasetConfig, domain::Label};

pub use io::{read_rows, write_records, DatasetError};
pub use synth::{label_counts, Distribution, Synthesizer};

#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub total: usize,
    pub counts: Vec<(Label, usize)>,
}

/// Synthesizes a dataset with the default label distribution and writes it
/// to `path`.
pub fn generate_dataset(config: &DatasetConfig, path: &Path) -> Result<GenerationSummary> {
    let mut synthesizer = Synthesizer::from_seed(config.seed);
    let records = synthesizer.generate(config.total, &Distribution::default());
    write_records(path, &records)
        .with_context(|| format!("failed to write dataset to {}", path.display()))?;

    let counts = label_counts(&records);
    tracing::info!(
        target: "dataset",
        total = records.len(),
        path = %path.display(),
        seeded = config.seed.is_some(),
        "dataset written"
    );

    Ok(GenerationSummary {
        total: records.len(),
        counts,
    })
}
