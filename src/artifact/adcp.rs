//! ADCP output document.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::Candidate;
use crate::error::{AdLoopError, Result};

pub const ADCP_VERSION: &str = "1.0";

pub const TASK: &str = "Creative Generation";

/// Default location of the persisted artifact.
pub const DEFAULT_OUTPUT_PATH: &str = "output/adcp_schema.json";

/// Final artifact of a run, produced exactly once whether or not the
/// candidate was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    #[serde(rename = "adcp_version")]
    pub schema_version: String,

    #[serde(rename = "task")]
    pub task_label: String,

    #[serde(rename = "generation_asset")]
    pub candidate: Candidate,
}

impl OutputArtifact {
    pub fn new(candidate: Candidate) -> Self {
        Self {
            schema_version: ADCP_VERSION.to_string(),
            task_label: TASK.to_string(),
            candidate,
        }
    }

    /// Pretty JSON, two-space indent.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the artifact to `path`, creating parent directories and
    /// replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AdLoopError::Persistence(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        fs::write(path, json)
            .map_err(|e| AdLoopError::Persistence(format!("cannot write {}: {}", path.display(), e)))?;

        info!("Wrote artifact to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact() -> OutputArtifact {
        OutputArtifact::new(Candidate::new("text_ad", "Neon ⚡ Level up!", "energetic", "passed"))
    }

    #[test]
    fn test_json_layout() {
        let json = artifact().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["adcp_version"], "1.0");
        assert_eq!(value["task"], "Creative Generation");
        assert_eq!(value["generation_asset"]["content"], "Neon ⚡ Level up!");
        assert_eq!(value["generation_asset"]["content_metadata"]["length"], 16);
        assert!(json.contains("\n  \"task\""));
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("output").join("adcp_schema.json");

        artifact().write_to(&path).unwrap();

        let written: OutputArtifact = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, artifact());
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("adcp_schema.json");
        fs::write(&path, "stale contents that are much longer than the new document ".repeat(20)).unwrap();

        artifact().write_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("stale"));
        assert!(serde_json::from_str::<OutputArtifact>(&contents).is_ok());
    }

    #[test]
    fn test_write_failure_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let err = artifact().write_to(&blocker.join("adcp_schema.json")).unwrap_err();
        assert!(matches!(err, AdLoopError::Persistence(_)));
    }
}
