//! Generation settings, optionally loaded from a TOML file.
//!
//! ```toml
//! output_root = "src/generated"
//! runtime_path = "crate::curves"
//! indent = "    "
//! parallel = true
//! ```
//!
//! Any key left out keeps its default.

use crate::error::{CodegenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenConfig {
    /// Directory receiving one sub-directory per artifact category.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Module path where emitted code finds `Polynomial*`, `IndexOutOfRange`
    /// and `SlerpUnclamped`.
    #[serde(default = "default_runtime_path")]
    pub runtime_path: String,
    #[serde(default = "default_indent")]
    pub indent: String,
    /// Generate artifacts on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("generated")
}

fn default_runtime_path() -> String {
    "crate".to_string()
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_parallel() -> bool {
    true
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            runtime_path: default_runtime_path(),
            indent: default_indent(),
            parallel: default_parallel(),
        }
    }
}

impl GenConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| CodegenError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(GenConfig::from_toml("").unwrap(), GenConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let cfg = GenConfig::from_toml("runtime_path = \"mathx\"\nparallel = false\n").unwrap();
        assert_eq!(cfg.runtime_path, "mathx");
        assert!(!cfg.parallel);
        assert_eq!(cfg.output_root, PathBuf::from("generated"));
        assert_eq!(cfg.indent, "    ");
    }

    #[test]
    fn test_bad_type_is_reported() {
        assert!(GenConfig::from_toml("parallel = \"yes\"").is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = GenConfig::load(Path::new("/definitely/not/here/curvegen.toml"));
        assert!(matches!(err, Err(CodegenError::Io { .. })));
    }
}
