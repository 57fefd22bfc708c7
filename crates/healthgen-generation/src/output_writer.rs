//! Output writer for rendered project files
//!
//! Writes rendered files under a project root with dry-run mode and a
//! conflict policy for files that already exist. Rendering happens before the
//! writer is invoked, so a template failure never leaves a half-written tree.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{GenerationError, Result},
    report::{FileReport, WriteStatus},
};

/// What to do when an output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Leave the existing file untouched
    Skip,
}

/// Configuration for output writing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputWriterConfig {
    /// Render and report without touching the filesystem
    pub dry_run: bool,
    /// Policy for files that already exist
    pub conflict_policy: ConflictPolicy,
}

/// A rendered file waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Name of the template that produced it
    pub template: String,
    /// Path relative to the project root, `.tmpl` suffix already stripped
    pub path: PathBuf,
    /// Final contents
    pub contents: Vec<u8>,
    /// Whether the contents went through substitution
    pub processed: bool,
}

/// Writes rendered files to disk
#[derive(Debug, Clone, Default)]
pub struct OutputWriter {
    config: OutputWriterConfig,
}

impl OutputWriter {
    /// Create a writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom configuration
    pub fn with_config(config: OutputWriterConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> OutputWriterConfig {
        self.config
    }

    /// Write every file under `root`, in order
    ///
    /// Parent directories are created as needed. The first I/O error aborts
    /// the run; files written before it are left in place.
    pub fn write(&self, files: &[OutputFile], root: &Path) -> Result<Vec<FileReport>> {
        files.iter().map(|file| self.write_file(file, root)).collect()
    }

    fn write_file(&self, file: &OutputFile, root: &Path) -> Result<FileReport> {
        let target = root.join(&file.path);
        let report = |status| FileReport {
            template: file.template.clone(),
            path: file.path.clone(),
            was_templated: file.processed,
            status,
        };

        if self.config.dry_run {
            debug!(path = %target.display(), "Planned file (dry run)");
            return Ok(report(WriteStatus::Planned));
        }

        if target.exists() && self.config.conflict_policy == ConflictPolicy::Skip {
            warn!(path = %target.display(), "File already exists, leaving it untouched");
            return Ok(report(WriteStatus::Skipped));
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| GenerationError::file_write(parent, e))?;
        }
        fs::write(&target, &file.contents).map_err(|e| GenerationError::file_write(&target, e))?;

        debug!(
            path = %target.display(),
            bytes = file.contents.len(),
            templated = file.processed,
            "Wrote file"
        );
        Ok(report(WriteStatus::Written))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn file(path: &str, contents: &str) -> OutputFile {
        OutputFile {
            template: path.to_string(),
            path: PathBuf::from(path),
            contents: contents.as_bytes().to_vec(),
            processed: true,
        }
    }

    #[test]
    fn test_write_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new();

        let reports = writer
            .write(&[file("cmd/server/main.go", "package main")], temp_dir.path())
            .unwrap();

        assert_eq!(reports[0].status, WriteStatus::Written);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("cmd/server/main.go")).unwrap(),
            "package main"
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::with_config(OutputWriterConfig {
            dry_run: true,
            ..Default::default()
        });

        let reports = writer.write(&[file("go.mod", "module x")], temp_dir.path()).unwrap();

        assert_eq!(reports[0].status, WriteStatus::Planned);
        assert!(!temp_dir.path().join("go.mod").exists());
    }

    #[test]
    fn test_overwrite_policy_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("go.mod"), "old").unwrap();

        let reports = OutputWriter::new()
            .write(&[file("go.mod", "new")], temp_dir.path())
            .unwrap();

        assert_eq!(reports[0].status, WriteStatus::Written);
        assert_eq!(fs::read_to_string(temp_dir.path().join("go.mod")).unwrap(), "new");
    }

    #[test]
    fn test_skip_policy_keeps_existing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("go.mod"), "old").unwrap();
        let writer = OutputWriter::with_config(OutputWriterConfig {
            conflict_policy: ConflictPolicy::Skip,
            ..Default::default()
        });

        let reports = writer
            .write(&[file("go.mod", "new"), file("README.md", "hi")], temp_dir.path())
            .unwrap();

        assert_eq!(reports[0].status, WriteStatus::Skipped);
        assert_eq!(reports[1].status, WriteStatus::Written);
        assert_eq!(fs::read_to_string(temp_dir.path().join("go.mod")).unwrap(), "old");
    }

    #[test]
    fn test_io_error_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is needed
        fs::write(temp_dir.path().join("cmd"), "not a directory").unwrap();

        let err = OutputWriter::new()
            .write(&[file("cmd/server/main.go", "package main")], temp_dir.path())
            .unwrap_err();

        assert!(matches!(err, GenerationError::FileWrite { .. }));
    }
}
