//! Record files: one record per pretty-printed JSON file.

use labform_core::Record;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum RecordFileError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_json::Error),
    WriteError(PathBuf, std::io::Error),
    Exists(PathBuf),
}

impl std::fmt::Display for RecordFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordFileError::ReadError(path, e) => {
                write!(f, "Failed to read record file '{}': {}", path.display(), e)
            }
            RecordFileError::ParseError(path, e) => {
                write!(f, "Failed to parse record file '{}': {}", path.display(), e)
            }
            RecordFileError::WriteError(path, e) => {
                write!(f, "Failed to write record file '{}': {}", path.display(), e)
            }
            RecordFileError::Exists(path) => {
                write!(f, "Record file already exists: {}", path.display())
            }
        }
    }
}

impl std::error::Error for RecordFileError {}

pub fn load_record(path: &Path) -> Result<Record, RecordFileError> {
    let contents =
        fs::read_to_string(path).map_err(|e| RecordFileError::ReadError(path.to_path_buf(), e))?;
    serde_json::from_str(&contents).map_err(|e| RecordFileError::ParseError(path.to_path_buf(), e))
}

pub fn save_record(path: &Path, record: &Record) -> Result<(), RecordFileError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| RecordFileError::ParseError(path.to_path_buf(), e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| RecordFileError::WriteError(path.to_path_buf(), e))?;
    }
    fs::write(path, json + "\n").map_err(|e| RecordFileError::WriteError(path.to_path_buf(), e))
}

/// Like [`save_record`], but refuses to replace an existing file.
pub fn create_record(path: &Path, record: &Record) -> Result<(), RecordFileError> {
    if path.exists() {
        return Err(RecordFileError::Exists(path.to_path_buf()));
    }
    save_record(path, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("records/pqr-0042.json");

        let mut record = Record::new("pqr", "asme");
        record.prepared_by = Some("j.doe".into());
        save_record(&path, &record).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"formName\": \"pqr\""));
        assert_eq!(load_record(&path).unwrap(), record);
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("pqr.json");
        let record = Record::new("pqr", "asme");

        create_record(&path, &record).unwrap();
        let err = create_record(&path, &record).unwrap_err();
        assert!(matches!(err, RecordFileError::Exists(_)));
    }

    #[test]
    fn test_invalid_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("broken.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{{\"formName\": ").unwrap();

        let err = load_record(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse record file"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_record(Path::new("/nonexistent/record.json")).unwrap_err();
        assert!(matches!(err, RecordFileError::ReadError(..)));
    }
}
