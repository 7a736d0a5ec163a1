use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::entry::Category;
use crate::parser::parse_document;
use crate::snapshot::Snapshot;
use crate::{write_atomic, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Spans for these categories were rewritten.
    Updated(Vec<Category>),
    Unchanged,
    /// The document lacks these categories and was left untouched.
    Skipped(Vec<Category>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub path: PathBuf,
    pub status: SyncStatus,
}

fn is_hidden_or_vendored(name: &str) -> bool {
    (name.starts_with('.') && name.len() > 1) || name == "node_modules"
}

/// `.js` files under `root` that declare at least one category array.
/// Files whose arrays do not parse are included so the sync reports them.
pub fn discover_documents(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !is_hidden_or_vendored(&e.file_name().to_string_lossy())
        });

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().unwrap_or_default() != "js" {
            continue;
        }
        let Ok(text) = fs::read_to_string(path) else {
            debug!(path = %path.display(), "skipping unreadable file");
            continue;
        };
        let anchored = match parse_document(&text) {
            Ok(doc) => !doc.spans().is_empty(),
            Err(_) => true,
        };
        if anchored {
            found.push(path.to_path_buf());
        }
    }
    found
}

/// Categories that `path` must declare: the required ones the snapshot
/// actually carries.
fn needed(snapshot: &Snapshot, required: &[Category]) -> Vec<Category> {
    required
        .iter()
        .copied()
        .filter(|c| snapshot.contains(*c))
        .collect()
}

fn sync_document(
    path: &Path,
    snapshot: &Snapshot,
    required: &[Category],
    dry_run: bool,
) -> Result<SyncStatus> {
    let source = fs::read_to_string(path)?;
    let doc = parse_document(&source)?;

    let missing: Vec<Category> = needed(snapshot, required)
        .into_iter()
        .filter(|c| !doc.contains(*c))
        .collect();
    if !missing.is_empty() {
        return Ok(SyncStatus::Skipped(missing));
    }

    let rendered = doc.render_with(snapshot);
    if rendered == source {
        return Ok(SyncStatus::Unchanged);
    }

    let touched: Vec<Category> = doc
        .spans()
        .iter()
        .map(|s| s.category)
        .filter(|c| snapshot.contains(*c))
        .collect();
    if !dry_run {
        write_atomic(path, rendered.as_bytes())?;
    }
    Ok(SyncStatus::Updated(touched))
}

/// Apply `snapshot` to every document. Each file is handled on its own:
/// a failure or a missing category affects only that file.
pub fn sync_documents(
    paths: &[PathBuf],
    snapshot: &Snapshot,
    required: &[Category],
    dry_run: bool,
) -> Vec<SyncOutcome> {
    paths
        .iter()
        .map(|path| {
            let status = match sync_document(path, snapshot, required, dry_run) {
                Ok(status) => status,
                Err(err) => SyncStatus::Failed(err.to_string()),
            };
            match &status {
                SyncStatus::Updated(categories) => {
                    info!(path = %path.display(), categories = categories.len(), "document synced")
                }
                SyncStatus::Unchanged => debug!(path = %path.display(), "document already in sync"),
                SyncStatus::Skipped(missing) => {
                    warn!(path = %path.display(), missing = ?missing, "document skipped")
                }
                SyncStatus::Failed(reason) => {
                    warn!(path = %path.display(), "sync failed: {reason}")
                }
            }
            SyncOutcome {
                path: path.clone(),
                status,
            }
        })
        .collect()
}
