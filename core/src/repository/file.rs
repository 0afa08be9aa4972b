use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FetchFailure;
use crate::repository::traits::SnapshotSource;

/// Reads a locally generated `attendance.json`.
#[derive(Clone)]
pub struct FileSource {
    file_path: PathBuf,
}

impl FileSource {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        self.file_path.display().to_string()
    }

    fn read_snapshot(&self) -> Result<String, FetchFailure> {
        fs::read_to_string(&self.file_path)
            .map_err(|e| FetchFailure::Io(format!("{}: {}", self.file_path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_file_contents_on_every_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"metadata\": 1}}").unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.read_snapshot().unwrap(), "{\"metadata\": 1}");

        fs::write(file.path(), "{}").unwrap();
        assert_eq!(source.read_snapshot().unwrap(), "{}");
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.read_snapshot(), Err(FetchFailure::Io(_))));
    }
}
