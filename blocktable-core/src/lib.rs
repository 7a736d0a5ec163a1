use std::fs;
use std::path::Path;
use thiserror::Error;

pub mod audit;
pub mod classify;
pub mod config;
pub mod edit;
pub mod entry;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod sort;
pub mod sync;
pub mod tables;

pub use classify::{classify, classify_in, shape_of, ClassificationKey, Shape};
pub use config::MaintenanceConfig;
pub use entry::{BlockEntry, Category};
pub use parser::{parse_document, BlockDocument, MalformedEntry};
pub use render::render_category;
pub use snapshot::{JsonSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotStore};

#[derive(Debug, Error)]
pub enum BlockTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("category {category} not found in {origin}")]
    CategoryNotFound { category: Category, origin: String },
    #[error("array for {category} is never closed")]
    UnterminatedArray { category: Category },
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("no snapshot at {0}")]
    SnapshotMissing(String),
    #[error("snapshot at {0} changed since it was loaded")]
    SnapshotConflict(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BlockTableError>;

/// Replace `path` with `bytes` by writing a sibling temp file and
/// renaming it over the target. Missing parent directories are created.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = match path.extension() {
        Some(ext) => path.with_extension(format!("{}.tmp", ext.to_string_lossy())),
        None => path.with_extension("tmp"),
    };
    fs::write(&tmp, bytes)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}
