//! File classification: substitute or copy verbatim
//!
//! Only whitelisted extensions and basenames go through template
//! substitution. Anything unrecognized is copied byte for byte so binary
//! assets are never corrupted.

use std::path::{Path, PathBuf};

/// Suffix marking a file that is always a template
pub const TEMPLATE_SUFFIX: &str = "tmpl";

/// Decides per output path whether content needs variable substitution
#[derive(Debug, Clone)]
pub struct FileClassifier {
    extensions: Vec<&'static str>,
    basenames: Vec<&'static str>,
}

impl FileClassifier {
    /// Classifier with the standard whitelist
    pub fn new() -> Self {
        Self {
            extensions: vec!["go", "ts", "yaml", "yml", "json", "sh", "md"],
            basenames: vec![
                "go.mod",
                "README.md",
                "Dockerfile",
                "docker-compose.yml",
                "package.json",
            ],
        }
    }

    /// Whether the file at `path` must be template-processed.
    ///
    /// Classify the path as registered (before the `.tmpl` suffix is
    /// stripped).
    pub fn needs_substitution(&self, path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        if let Some(extension) = extension.as_deref() {
            if extension == TEMPLATE_SUFFIX || self.extensions.iter().any(|ext| *ext == extension) {
                return true;
            }
        }

        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.basenames.iter().any(|basename| *basename == name))
    }

    /// Final output path: one trailing `.tmpl` suffix removed
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(TEMPLATE_SUFFIX) => path.with_extension(""),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new()
    }
}
