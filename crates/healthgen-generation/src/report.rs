//! Generation reports

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{features::FeatureSet, tier::Tier};

/// Outcome for one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    /// Written to disk
    Written,
    /// Already existed and was left untouched
    Skipped,
    /// Dry run; nothing was written
    Planned,
}

/// One entry of a [`GenerationReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Template that produced the file
    pub template: String,
    /// Path relative to the project root
    pub path: PathBuf,
    /// Whether variable substitution was applied
    pub was_templated: bool,
    /// What happened to the file
    pub status: WriteStatus,
}

/// Summary of a generation or migration run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Tier the project was generated for
    pub tier: Tier,
    /// Features of that tier
    pub features: FeatureSet,
    /// Timestamp captured by the context
    pub generated_at: DateTime<Utc>,
    /// Whether the run was a dry run
    pub dry_run: bool,
    /// Files in registration order
    pub files: Vec<FileReport>,
}

impl GenerationReport {
    /// Relative paths of every file in the report
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|file| file.path.as_path())
    }

    /// Whether the report lists the given relative path
    pub fn contains_path(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.files.iter().any(|file| file.path == path)
    }

    /// Relative paths of files actually written
    pub fn written_paths(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|file| file.status == WriteStatus::Written)
            .map(|file| file.path.as_path())
    }

    /// Number of files with the given status
    pub fn count(&self, status: WriteStatus) -> usize {
        self.files.iter().filter(|file| file.status == status).count()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "tier {}: {} written, {} skipped, {} planned",
            self.tier,
            self.count(WriteStatus::Written),
            self.count(WriteStatus::Skipped),
            self.count(WriteStatus::Planned),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::features_for_tier;

    fn report() -> GenerationReport {
        GenerationReport {
            tier: Tier::Basic,
            features: features_for_tier(Tier::Basic),
            generated_at: Utc::now(),
            dry_run: false,
            files: vec![
                FileReport {
                    template: "go-mod".into(),
                    path: "go.mod".into(),
                    was_templated: true,
                    status: WriteStatus::Written,
                },
                FileReport {
                    template: "gitignore".into(),
                    path: ".gitignore".into(),
                    was_templated: false,
                    status: WriteStatus::Skipped,
                },
            ],
        }
    }

    #[test]
    fn test_counts_and_summary() {
        let report = report();
        assert_eq!(report.count(WriteStatus::Written), 1);
        assert_eq!(report.count(WriteStatus::Skipped), 1);
        assert_eq!(report.summary(), "tier basic: 1 written, 1 skipped, 0 planned");
        assert!(report.contains_path("go.mod"));
        assert!(!report.contains_path("Dockerfile"));
    }

    #[test]
    fn test_serializes_statuses_lowercase() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["tier"], "basic");
        assert_eq!(json["files"][1]["status"], "skipped");
        assert_eq!(json["features"]["kubernetes"], true);
    }
}
