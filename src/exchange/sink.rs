//! Delivery targets for finished exports.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::exchange::{ExportArtifact, ExportError};

/// Hands an artifact to the user, returning where it ended up.
pub trait DownloadSink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError>;
}

/// Writes artifacts into a directory, replacing files with the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.filename);
        fs::write(&path, artifact.content.as_bytes())?;
        log::info!("Exported {} to {}", artifact.filename, path.display());
        Ok(path)
    }
}

/// Keeps delivered artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: RefCell<Vec<ExportArtifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<ExportArtifact> {
        self.delivered.borrow().clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        self.delivered.borrow_mut().push(artifact.clone());
        Ok(PathBuf::from(&artifact.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExportFormat;

    #[test]
    fn directory_sink_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));
        let artifact = ExportArtifact::new("deals", ExportFormat::Json, "[]".to_string());

        let path = sink.deliver(&artifact).unwrap();

        assert_eq!(path, dir.path().join("exports").join("deals.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn memory_sink_records_deliveries() {
        let sink = MemorySink::new();
        let artifact = ExportArtifact::new("customers", ExportFormat::Csv, "a\n\"1\"".into());

        sink.deliver(&artifact).unwrap();

        assert_eq!(sink.delivered(), vec![artifact]);
    }
}
