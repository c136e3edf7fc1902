mod ai;
mod app;
mod config;
mod dataset;
mod domain;
mod http;
mod infrastructure;
mod train;
mod triage;

use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use infrastructure::{directories, logging, shutdown};

#[derive(Parser, Debug)]
#[command(
    name = "email-triage",
    version,
    about = "Synthesize, train and serve an email triage classifier"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a synthetic labeled email dataset as CSV
    Generate {
        /// Number of records to produce
        #[arg(long)]
        total: Option<usize>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Destination file (defaults to DATASET_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fit the vectorizer and classifier and persist both artifacts
    Train {
        /// Dataset to train on (defaults to DATASET_PATH)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Serve predictions and reply suggestions over HTTP
    Serve {
        /// Listen address (defaults to BIND_ADDR)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

impl Command {
    fn component(&self) -> &'static str {
        match self {
            Command::Generate { .. } => "generate",
            Command::Train { .. } => "train",
            Command::Serve { .. } => "serve",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = config::load_config()?;
    match &cli.command {
        Command::Generate { total, seed, output } => {
            if let Some(total) = total {
                config.dataset.total = *total;
            }
            if seed.is_some() {
                config.dataset.seed = *seed;
            }
            if let Some(output) = output {
                config.directories.dataset_path = output.display().to_string();
            }
        }
        Command::Train { dataset } => {
            if let Some(dataset) = dataset {
                config.directories.dataset_path = dataset.display().to_string();
            }
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_addr = *bind;
            }
        }
    }

    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths.logs_dir, cli.command.component())?;

    match cli.command {
        Command::Generate { .. } => {
            let summary = dataset::generate_dataset(&config.dataset, &paths.dataset_path)?;
            tracing::info!(
                path = %paths.dataset_path.display(),
                "Wrote {} emails",
                summary.total
            );
            for (label, count) in &summary.counts {
                tracing::info!(label = %label, count, "label count");
            }
            Ok(())
        }
        Command::Train { .. } => {
            let report =
                train::run_training(&paths.dataset_path, &config.training, &paths.artifacts)
                    .context("training run failed")?;
            tracing::info!(
                train = report.train_size,
                test = report.test_size,
                accuracy = %format!("{:.2}%", report.accuracy * 100.0),
                classes = ?report.classes,
                vocabulary = report.vocabulary_size,
                trained_at = %report.trained_at,
                "Saved {} and {}",
                report.artifacts.model.display(),
                report.artifacts.vectorizer.display()
            );
            Ok(())
        }
        Command::Serve { .. } => {
            let shutdown = shutdown::Shutdown::new();
            shutdown::spawn_signal_watcher(shutdown.clone());

            let app = app::TriageApp::initialize(&config, &paths, shutdown)?;
            app.run().await
        }
    }
}
