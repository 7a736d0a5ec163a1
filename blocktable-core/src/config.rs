use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::entry::Category;
use crate::{BlockTableError, Result};

pub const DEFAULT_SOURCE: &str =
    "scratch-client/scratch-vm/src/extensions/scratch3_minecraft/index.js";
pub const DEFAULT_SNAPSHOT: &str = "sorted_categories.json";
pub const LOCAL_CONFIG: &str = "blocktable.json";

/// Paths and policies shared by every maintenance command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Document the sort pipeline reads and rewrites.
    pub source: PathBuf,
    pub snapshot: PathBuf,
    /// Documents that receive the snapshot on `sync`.
    pub sync_targets: Vec<PathBuf>,
    /// Categories a document must declare before it is rewritten.
    pub required_categories: Vec<Category>,
    /// Category precedence used by dedupe.
    pub dedupe_priority: Vec<Category>,
    /// Building entries echoed after a sort.
    pub sample_size: usize,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT),
            sync_targets: ["player.js", "gui.js", "blocksonly.js", "compatibilitytesting.js"]
                .iter()
                .map(PathBuf::from)
                .collect(),
            required_categories: Category::ALL.to_vec(),
            dedupe_priority: vec![
                Category::Lighting,
                Category::Ore,
                Category::Functional,
                Category::Special,
                Category::Decoration,
                Category::Nature,
                Category::Building,
            ],
            sample_size: 50,
        }
    }
}

impl MaintenanceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|err| BlockTableError::Config(format!("{}: {err}", path.display())))
    }

    /// An explicit path must exist. Otherwise the first candidate that
    /// exists is loaded, falling back to defaults.
    pub fn resolve(explicit: Option<&Path>, candidates: &[PathBuf]) -> Result<Self> {
        if let Some(path) = explicit {
            return match Self::load(path) {
                Err(BlockTableError::Io(err)) if err.kind() == ErrorKind::NotFound => Err(
                    BlockTableError::Config(format!("config file not found: {}", path.display())),
                ),
                other => other,
            };
        }
        for candidate in candidates {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading config");
                return Self::load(candidate);
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blocktable.json");
        let json = r#"{"snapshot": "out/snap.json", "required_categories": ["ORE_BLOCKS"]}"#;
        fs::write(&path, json).unwrap();

        let candidates = [temp.path().join("missing.json"), path];
        let cfg = MaintenanceConfig::resolve(None, &candidates).unwrap();
        assert_eq!(cfg.snapshot, PathBuf::from("out/snap.json"));
        assert_eq!(cfg.required_categories, vec![Category::Ore]);
        assert_eq!(cfg.source, PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(cfg.sample_size, 50);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope.json");
        let err = MaintenanceConfig::resolve(Some(&missing), &[]).unwrap_err();
        assert!(matches!(err, BlockTableError::Config(_)));
        let fallback = MaintenanceConfig::resolve(None, &[missing]).unwrap();
        assert_eq!(fallback, MaintenanceConfig::default());
    }

    #[test]
    fn invalid_json_reports_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = MaintenanceConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
