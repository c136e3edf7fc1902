use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{ai::ArtifactPaths, config::DirectoryConfig};

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
    pub artifacts: ArtifactPaths,
    pub dataset_path: PathBuf,
}

/// Creates the logs and artifacts directories (and the dataset's parent) and
/// resolves every configured path to an absolute one.
pub fn ensure_directories(cfg: &DirectoryConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(Path::new(&cfg.logs_dir))?;
    let artifacts_dir = ensure_dir(Path::new(&cfg.artifacts_dir))?;

    let dataset = PathBuf::from(&cfg.dataset_path);
    let dataset_path = match dataset.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => ensure_dir(parent)?.join(dataset.file_name().unwrap_or_default()),
        None => absolute(&dataset)?,
    };

    let probe_file = artifacts_dir.join(".write-test");
    fs::write(&probe_file, b"ok").with_context(|| {
        format!("artifacts directory {} is not writable", artifacts_dir.display())
    })?;
    fs::remove_file(&probe_file)?;

    Ok(ResolvedPaths {
        logs_dir,
        artifacts: ArtifactPaths::new(
            &artifacts_dir,
            &cfg.model_filename,
            &cfg.vectorizer_filename,
        ),
        dataset_path,
    })
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(dir) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o755);
            let _ = fs::set_permissions(dir, perms);
        }
    }
    Ok(dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf()))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn creates_nested_directories_and_resolves_paths() {
        let root = tempdir().unwrap();
        let cfg = DirectoryConfig {
            logs_dir: root.path().join("var/logs").display().to_string(),
            artifacts_dir: root.path().join("models").display().to_string(),
            model_filename: "model.bin".into(),
            vectorizer_filename: "vectorizer.bin".into(),
            dataset_path: root.path().join("data/emails.csv").display().to_string(),
        };
        let paths = ensure_directories(&cfg).unwrap();

        assert!(paths.logs_dir.is_dir());
        assert!(paths.artifacts.model.parent().unwrap().is_dir());
        assert!(paths.artifacts.model.is_absolute());
        assert!(paths.artifacts.model.ends_with("models/model.bin"));
        assert!(paths.artifacts.vectorizer.ends_with("models/vectorizer.bin"));
        assert!(paths.dataset_path.ends_with("data/emails.csv"));
        assert!(paths.dataset_path.parent().unwrap().is_dir());
    }
}
