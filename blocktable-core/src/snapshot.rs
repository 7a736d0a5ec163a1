use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::entry::{BlockEntry, Category};
use crate::parser::BlockDocument;
use crate::{write_atomic, BlockTableError, Result};

/// Category -> ordered entries. Serializes as a JSON object keyed by
/// category constant name, in canonical category order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    categories: BTreeMap<Category, Vec<BlockEntry>>,
}

impl Snapshot {
    pub fn from_document(doc: &BlockDocument) -> Self {
        let mut snapshot = Snapshot::default();
        for span in doc.spans() {
            snapshot.set(span.category, span.entries.clone());
        }
        snapshot
    }

    pub fn get(&self, category: Category) -> Option<&[BlockEntry]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut Vec<BlockEntry>> {
        self.categories.get_mut(&category)
    }

    /// Entries for `category`, creating an empty list if absent.
    pub fn entries_mut(&mut self, category: Category) -> &mut Vec<BlockEntry> {
        self.categories.entry(category).or_default()
    }

    pub fn set(&mut self, category: Category, entries: Vec<BlockEntry>) {
        self.categories.insert(category, entries);
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[BlockEntry])> {
        self.categories.iter().map(|(c, e)| (*c, e.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Category, &mut Vec<BlockEntry>)> {
        self.categories.iter_mut().map(|(c, e)| (*c, e))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.keys().copied()
    }

    pub fn total_entries(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Stored snapshot plus the revision it was read at.
#[derive(Debug, Clone, Default)]
pub struct Versioned {
    pub snapshot: Option<Snapshot>,
    pub revision: Option<u64>,
}

/// Persistence boundary for snapshots. Pipelines receive a store, open a
/// transaction, mutate the snapshot in memory and commit it whole.
pub trait SnapshotStore {
    /// Human-readable location for reports and errors.
    fn location(&self) -> String;

    fn load_versioned(&self) -> Result<Versioned>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;

    fn revision(&self) -> Result<Option<u64>> {
        Ok(self.load_versioned()?.revision)
    }

    /// The last saved snapshot, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.load_versioned()?.snapshot)
    }

    fn begin(&self) -> Result<SnapshotTransaction> {
        let Versioned { snapshot, revision } = self.load_versioned()?;
        Ok(SnapshotTransaction {
            existed: snapshot.is_some(),
            snapshot: snapshot.unwrap_or_default(),
            base_revision: revision,
        })
    }
}

/// An in-memory working copy tied to the revision it was loaded from.
#[derive(Debug, Clone)]
pub struct SnapshotTransaction {
    pub snapshot: Snapshot,
    existed: bool,
    base_revision: Option<u64>,
}

impl SnapshotTransaction {
    /// Whether the store held a snapshot when the transaction began.
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Fails with [`BlockTableError::SnapshotConflict`] if another writer
    /// changed the store since [`SnapshotStore::begin`].
    pub fn ensure_current<S: SnapshotStore + ?Sized>(&self, store: &S) -> Result<()> {
        if store.revision()? != self.base_revision {
            return Err(BlockTableError::SnapshotConflict(store.location()));
        }
        Ok(())
    }

    /// Write the working copy back, refusing on a conflict.
    pub fn commit<S: SnapshotStore + ?Sized>(self, store: &mut S) -> Result<Snapshot> {
        self.ensure_current(store)?;
        store.save(&self.snapshot)?;
        Ok(self.snapshot)
    }
}

fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// Snapshot kept in a JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load_versioned(&self) -> Result<Versioned> {
        let Some(bytes) = self.read_bytes()? else {
            debug!(path = %self.path.display(), "no snapshot file yet");
            return Ok(Versioned::default());
        };
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        Ok(Versioned {
            snapshot: Some(snapshot),
            revision: Some(fingerprint(&bytes)),
        })
    }

    fn revision(&self) -> Result<Option<u64>> {
        Ok(self.read_bytes()?.map(|bytes| fingerprint(&bytes)))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        write_atomic(&self.path, json.as_bytes())?;
        info!(
            path = %self.path.display(),
            entries = snapshot.total_entries(),
            "snapshot saved"
        );
        Ok(())
    }
}

/// Store used by dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    snapshot: Option<Snapshot>,
    revision: u64,
}

impl MemorySnapshotStore {
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            revision: 1,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn load_versioned(&self) -> Result<Versioned> {
        Ok(Versioned {
            snapshot: self.snapshot.clone(),
            revision: self.snapshot.as_ref().map(|_| self.revision),
        })
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.snapshot = Some(snapshot.clone());
        self.revision += 1;
        Ok(())
    }
}
