use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::domain::{DatasetRow, EmailRecord};

pub const HEADER: [&str; 3] = ["subject", "body", "label"];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write dataset {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read dataset {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset {} contains no records", path.display())]
    Empty { path: PathBuf },
}

/// Writes the dataset as UTF-8 CSV with a `subject,body,label` header row.
pub fn write_records(path: &Path, records: &[EmailRecord]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DatasetError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_err)?;
    writer.write_record(HEADER).map_err(write_err)?;
    for record in records {
        writer.serialize(record).map_err(write_err)?;
    }
    writer.flush().map_err(|source| write_err(source.into()))?;
    Ok(())
}

pub fn read_rows(path: &Path) -> Result<Vec<DatasetRow>, DatasetError> {
    let read_err = |source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(read_err)?;
    let rows = reader
        .deserialize::<DatasetRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    if rows.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::domain::Label;

    #[test]
    fn writes_header_and_multiline_bodies() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("emails.csv");
        let records = vec![EmailRecord {
            subject: "Payment is overdue".into(),
            body: "Line one, with comma.\nLine two.".into(),
            label: Label::HighPriority,
        }];
        write_records(&path, &records).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("subject,body,label\n"));
        assert!(raw.contains("high_priority"));

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "high_priority");
        assert_eq!(
            rows[0].text(),
            "Payment is overdue Line one, with comma.\nLine two."
        );
    }

    #[test]
    fn empty_cells_read_as_empty_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emails.csv");
        fs::write(
            &path,
            "subject,body,label\n,Only a body,normal\nOnly a subject,,spam\n",
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].text(), " Only a body");
        assert_eq!(rows[1].text(), "Only a subject ");
    }

    #[test]
    fn header_only_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emails.csv");
        fs::write(&path, "subject,body,label\n").unwrap();
        assert!(matches!(read_rows(&path), Err(DatasetError::Empty { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let err = read_rows(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
    }
}
