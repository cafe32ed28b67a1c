//! Batch configuration: which directories to process and how
//!
//! A configuration is an ordered list of targets. It can be built in code,
//! loaded from JSON, or taken from [`BatchConfig::default_for`], which
//! reproduces the standard two phases: an in-place check of `data/` followed
//! by the rescue of `dataerror/` into `data/`.

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::relocator::CollisionPolicy;
use crate::transform::{ReplacementRule, DEFAULT_SENTINEL};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the canonical files
pub const DATA_DIR: &str = "data";

/// Staging directory for files that failed normal processing
pub const RESCUE_DIR: &str = "dataerror";

/// One phase of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTarget {
    /// Short identifier (e.g. "rescue")
    pub name: String,
    /// Human-readable phase name used in progress output
    pub label: String,
    /// Directory to move files out of before transforming, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    /// Directory whose CSV files are transformed in place
    pub dest_dir: PathBuf,
    /// Encoding used to read and write files
    #[serde(default)]
    pub encoding: TextEncoding,
    /// Cell text to replace
    #[serde(default = "default_match_value")]
    pub match_value: String,
    /// Replacement text; absent means the missing-value marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_value: Option<String>,
    /// Handling of name clashes when relocating
    #[serde(default)]
    pub collision: CollisionPolicy,
}

fn default_match_value() -> String {
    DEFAULT_SENTINEL.to_string()
}

impl FileTarget {
    /// A target that transforms `dest_dir` in place
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        dest_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            source_dir: None,
            dest_dir: dest_dir.into(),
            encoding: TextEncoding::default(),
            match_value: default_match_value(),
            replacement_value: None,
            collision: CollisionPolicy::default(),
        }
    }

    /// Relocate files from `source_dir` before transforming
    pub fn with_source(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(source_dir.into());
        self
    }

    /// Use a different encoding
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Use a different collision policy
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// The replacement rule this target applies
    pub fn rule(&self) -> ReplacementRule {
        ReplacementRule::new(self.match_value.clone(), self.replacement_value.clone())
    }

    /// Copy of this target with `{year}` and `{month}` expanded in its paths
    pub fn resolve<D: Datelike>(&self, date: &D) -> Self {
        Self {
            source_dir: self.source_dir.as_deref().map(|p| expand_date(p, date)),
            dest_dir: expand_date(&self.dest_dir, date),
            ..self.clone()
        }
    }
}

/// An ordered list of targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Targets, processed in order
    pub targets: Vec<FileTarget>,
}

impl BatchConfig {
    /// Create a config from targets
    pub fn new(targets: Vec<FileTarget>) -> Self {
        Self { targets }
    }

    /// The standard normal-check and rescue phases rooted at `base_dir`
    pub fn default_for<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref();
        let data = base_dir.join(DATA_DIR);

        Self::new(vec![
            FileTarget::new("normal", "normal check", &data),
            FileTarget::new("rescue", "error rescue", &data).with_source(base_dir.join(RESCUE_DIR)),
        ])
    }

    /// Load a config from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Expand date placeholders in every target
    pub fn resolve<D: Datelike>(&self, date: &D) -> Self {
        Self::new(self.targets.iter().map(|t| t.resolve(date)).collect())
    }

    /// Find a target by name
    pub fn find_target(&self, name: &str) -> Option<&FileTarget> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// Replace `{year}` (four digits) and `{month}` (two digits) in a path
pub fn expand_date<D: Datelike>(path: &Path, date: &D) -> PathBuf {
    let raw = path.to_string_lossy();
    if !raw.contains('{') {
        return path.to_path_buf();
    }

    PathBuf::from(
        raw.replace("{year}", &format!("{:04}", date.year()))
            .replace("{month}", &format!("{:02}", date.month())),
    )
}
