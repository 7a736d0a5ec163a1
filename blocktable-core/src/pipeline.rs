//! Batch entry points. Each one reads its inputs, transforms them in
//! memory, writes atomically unless `dry_run` is set, and returns the
//! text report the CLI prints.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::audit::{self, DuplicateGroup};
use crate::classify::{classify, classify_in, shape_of};
use crate::edit::{self, FixOutcome, LabelFix};
use crate::entry::{BlockEntry, Category};
use crate::parser::parse_document;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::sort::sort_snapshot;
use crate::sync::{discover_documents, sync_documents, SyncStatus};
use crate::{write_atomic, BlockTableError, Result};

#[derive(Debug, Clone)]
pub struct SortSettings {
    pub source: PathBuf,
    pub required: Vec<Category>,
    /// Leading building entries echoed in the report.
    pub sample_size: usize,
    /// Remove malformed records from the rewritten source instead of
    /// copying them after the sorted entries.
    pub drop_malformed: bool,
    pub dry_run: bool,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}

fn dry_run_note(log: &mut String, dry_run: bool) {
    if dry_run {
        log.push_str("Dry run: nothing was written.\n");
    }
}

fn push_groups(log: &mut String, title: &str, groups: &[DuplicateGroup], limit: usize) {
    log.push_str(&format!("{title}: {}\n", groups.len()));
    for group in groups.iter().take(limit) {
        log.push_str(&format!("  '{}' x{}\n", group.key, group.size()));
        for o in &group.occurrences {
            log.push_str(&format!(
                "    {}[{}] {} / {}\n",
                o.category, o.index_in_category, o.value, o.text
            ));
        }
    }
    if groups.len() > limit {
        log.push_str(&format!("  ... and {} more\n", groups.len() - limit));
    }
}

/// Parse, sort every category, rewrite the source document and replace
/// the stored snapshot. A missing required category aborts before
/// anything is written. The source is written first and restored if the
/// snapshot commit fails.
pub fn run_sort<S: SnapshotStore + ?Sized>(
    settings: &SortSettings,
    store: &mut S,
) -> Result<String> {
    let origin = settings.source.display().to_string();
    let source = fs::read_to_string(&settings.source)?;
    let doc = parse_document(&source)?;
    doc.require(&settings.required, &origin)?;

    let tx = store.begin()?;
    let mut snapshot = Snapshot::from_document(&doc);
    let summaries = sort_snapshot(&mut snapshot);
    let rendered = if settings.drop_malformed {
        doc.render_with(&snapshot)
    } else {
        doc.render_keeping_malformed(&snapshot)
    };

    let mut log = format!("Sorted {origin}\n");
    for (category, summary) in &summaries {
        log.push_str(&format!(
            "  {:<20} {:>4} entries, {:>4} moved, {:>3} unmatched\n",
            category.constant_name(),
            summary.total,
            summary.moved,
            summary.unclassified.len()
        ));
    }
    log.push_str(&format!("Total: {}\n", snapshot.total_entries()));

    let malformed: Vec<_> = doc.malformed().collect();
    if !malformed.is_empty() {
        let fate = if settings.drop_malformed {
            "dropped"
        } else {
            "kept verbatim"
        };
        log.push_str(&format!("Malformed entries {fate}: {}\n", malformed.len()));
        for issue in malformed {
            log.push_str(&format!(
                "  {} at byte {}: {} ({})\n",
                issue.category,
                issue.offset,
                issue.reason,
                issue.raw.lines().next().unwrap_or_default()
            ));
        }
    }

    let duplicates: Vec<DuplicateGroup> = snapshot
        .iter()
        .flat_map(|(category, entries)| audit::find_duplicates(category, entries))
        .collect();
    if !duplicates.is_empty() {
        push_groups(&mut log, "Duplicate identifiers within a category", &duplicates, usize::MAX);
    }

    if settings.dry_run {
        dry_run_note(&mut log, true);
    } else {
        tx.ensure_current(store)?;
        let rewrote = rendered != source;
        if rewrote {
            write_atomic(&settings.source, rendered.as_bytes())?;
        }
        let mut tx = tx;
        tx.snapshot = snapshot.clone();
        if let Err(err) = tx.commit(store) {
            if rewrote {
                warn!(source = %origin, "snapshot commit failed, restoring source");
                write_atomic(&settings.source, source.as_bytes())?;
            }
            return Err(err);
        }
        if rewrote {
            log.push_str(&format!("{origin} rewritten\n"));
        } else {
            log.push_str(&format!("{origin} already in order\n"));
        }
        log.push_str(&format!("Snapshot saved to {}\n", store.location()));
    }

    if let Some(building) = snapshot.get(Category::Building) {
        if settings.sample_size > 0 {
            let shown = settings.sample_size.min(building.len());
            log.push_str(&format!("\nFirst {shown} BUILDING_BLOCKS:\n"));
            for (i, entry) in building.iter().take(settings.sample_size).enumerate() {
                log.push_str(&format!("{:3}. {:<40} - {}\n", i + 1, entry.value, entry.text));
            }
            log.push_str(&format!("... ({} blocks in total)\n", building.len()));
        }
    }

    info!(source = %origin, entries = snapshot.total_entries(), "sort finished");
    Ok(log)
}

/// The stored snapshot, or [`BlockTableError::SnapshotMissing`].
pub fn load_snapshot<S: SnapshotStore + ?Sized>(store: &S) -> Result<Snapshot> {
    store
        .load()?
        .ok_or_else(|| BlockTableError::SnapshotMissing(store.location()))
}

/// Entries straight from a source document, without touching the store.
pub fn snapshot_from_source(path: &Path, required: &[Category]) -> Result<Snapshot> {
    let source = fs::read_to_string(path)?;
    let doc = parse_document(&source)?;
    doc.require(required, &path.display().to_string())?;
    Ok(Snapshot::from_document(&doc))
}

#[derive(Debug, Clone, Default)]
pub struct SyncSettings {
    pub targets: Vec<PathBuf>,
    /// When set, targets are every anchored `.js` file under this directory.
    pub discover: Option<PathBuf>,
    pub required: Vec<Category>,
    pub dry_run: bool,
}

pub fn run_sync<S: SnapshotStore + ?Sized>(settings: &SyncSettings, store: &S) -> Result<String> {
    let snapshot = load_snapshot(store)?;
    let targets = match &settings.discover {
        Some(root) => discover_documents(root),
        None => settings.targets.clone(),
    };

    let mut log = format!(
        "Applying snapshot {} ({} entries) to {} file(s)\n",
        store.location(),
        snapshot.total_entries(),
        targets.len()
    );
    let outcomes = sync_documents(&targets, &snapshot, &settings.required, settings.dry_run);
    for outcome in &outcomes {
        let path = outcome.path.display();
        match &outcome.status {
            SyncStatus::Updated(categories) => {
                log.push_str(&format!("  [OK] {path} ({} categories)\n", categories.len()))
            }
            SyncStatus::Unchanged => log.push_str(&format!("  [--] {path} unchanged\n")),
            SyncStatus::Skipped(missing) => {
                let names: Vec<&str> = missing.iter().map(|c| c.constant_name()).collect();
                log.push_str(&format!("  [SKIP] {path}: missing {}\n", names.join(", ")))
            }
            SyncStatus::Failed(reason) => log.push_str(&format!("  [ERROR] {path}: {reason}\n")),
        }
    }
    dry_run_note(&mut log, settings.dry_run);
    Ok(log)
}

pub fn extract_report(snapshot: &Snapshot, output: Option<&Path>) -> Result<String> {
    let extraction = audit::extract(snapshot);
    let mut log = format!("Total blocks: {}\n", extraction.total_blocks);
    for (category, count) in &extraction.categories {
        let percent = if extraction.total_blocks > 0 {
            *count as f64 / extraction.total_blocks as f64 * 100.0
        } else {
            0.0
        };
        log.push_str(&format!(
            "  {:<20} {:>4} ({:5.1}%)\n",
            category.constant_name(),
            count,
            percent
        ));
    }
    if let Some(path) = output {
        write_json(path, &extraction)?;
        log.push_str(&format!("Flat list written to {}\n", path.display()));
    }
    Ok(log)
}

pub fn duplicates_report(snapshot: &Snapshot, output: Option<&Path>) -> Result<String> {
    let report = audit::duplicate_report(snapshot);
    let s = &report.summary;
    let mut log = format!(
        "Total blocks: {}\nUnique identifiers: {}\nUnique labels: {}\n",
        s.total_blocks, s.unique_values, s.unique_texts
    );
    push_groups(&mut log, "Identifiers repeated within a category", &report.within_category, 20);
    push_groups(&mut log, "Identifiers repeated anywhere", &report.duplicate_values, 20);
    push_groups(&mut log, "Labels repeated anywhere", &report.duplicate_texts, 20);
    if report.is_clean() {
        log.push_str("No duplicates found.\n");
    }
    if let Some(path) = output {
        write_json(path, &report)?;
        log.push_str(&format!("Report written to {}\n", path.display()));
    }
    Ok(log)
}

pub fn audit_report(snapshot: &Snapshot) -> String {
    let audit = audit::audit_categories(snapshot);
    let mut log = format!("Category distribution ({} blocks):\n", audit.total);
    for share in &audit.shares {
        log.push_str(&format!(
            "  {:<20} {:>4} ({:5.1}%)\n",
            share.category.constant_name(),
            share.count,
            share.percent
        ));
    }

    log.push_str(&format!(
        "\nLight sources outside LIGHTING_BLOCKS: {}\n",
        audit.misplaced_lights.len()
    ));
    for o in &audit.misplaced_lights {
        log.push_str(&format!("  {}: {} ({})\n", o.category, o.value, o.text));
    }
    log.push_str(&format!("Ores outside ORE_BLOCKS: {}\n", audit.misplaced_ores.len()));
    for o in &audit.misplaced_ores {
        log.push_str(&format!("  {}: {} ({})\n", o.category, o.value, o.text));
    }

    log.push_str("\nBUILDING_BLOCKS by shape:\n");
    for (shape, count) in &audit.building_shapes {
        log.push_str(&format!("  {:<24} {:>4}\n", shape.label(), count));
    }
    log.push_str("\nShape grouping:\n");
    for range in &audit.building_ranges {
        log.push_str(&format!(
            "  {:<16} {:>4} at {}..={} ({} .. {}){}\n",
            range.shape.label(),
            range.count,
            range.first_index,
            range.last_index,
            range.first.value,
            range.last.value,
            if range.is_contiguous() { "" } else { "  SCATTERED" }
        ));
    }
    let scattered = audit.scattered_shapes().count();
    if scattered == 0 {
        log.push_str("All shape groups are contiguous.\n");
    }

    log.push_str(&format!("\nVariation families (3+ variants): {}\n", audit.families.len()));
    for family in audit.families.iter().take(20) {
        let spread: Vec<String> = family
            .by_category
            .iter()
            .map(|(c, n)| format!("{}={n}", c.short_name()))
            .collect();
        log.push_str(&format!(
            "  {:<32} {:>3} variants [{}]\n",
            family.base,
            family.members.len(),
            spread.join(", ")
        ));
    }
    log
}

pub fn coverage_report(snapshot: &Snapshot, expected: &[String]) -> String {
    let missing = audit::missing_identifiers(snapshot, expected);
    let mut log = format!(
        "Expected {} identifier(s), {} missing\n",
        expected.len(),
        missing.len()
    );
    for value in &missing {
        log.push_str(&format!("  {value}\n"));
    }
    log
}

fn begin_existing<S: SnapshotStore + ?Sized>(
    store: &S,
) -> Result<crate::snapshot::SnapshotTransaction> {
    let tx = store.begin()?;
    if !tx.existed() {
        return Err(BlockTableError::SnapshotMissing(store.location()));
    }
    Ok(tx)
}

pub fn run_fix<S: SnapshotStore + ?Sized>(
    store: &mut S,
    fixes: &[LabelFix],
    dry_run: bool,
) -> Result<String> {
    let mut tx = begin_existing(store)?;
    let results = edit::apply_label_fixes(&mut tx.snapshot, fixes);

    let mut log = format!("Label fixes: {}\n", fixes.len());
    let mut applied = 0usize;
    for (fix, outcome) in &results {
        let line = match outcome {
            FixOutcome::Applied => {
                applied += 1;
                format!(
                    "  [OK] {} {}: '{}' -> '{}'",
                    fix.category, fix.value, fix.old_text, fix.new_text
                )
            }
            FixOutcome::AlreadyApplied => format!(
                "  [--] {} {}: already '{}'",
                fix.category, fix.value, fix.new_text
            ),
            FixOutcome::Mismatch { current } => format!(
                "  [??] {} {}: found '{}', expected '{}'",
                fix.category, fix.value, current, fix.old_text
            ),
            FixOutcome::NotFound => format!("  [!!] {} {}: not found", fix.category, fix.value),
        };
        log.push_str(&line);
        if let Some(reason) = &fix.reason {
            log.push_str(&format!(" ({reason})"));
        }
        log.push('\n');
    }
    log.push_str(&format!("Applied: {applied}\n"));

    if applied > 0 && !dry_run {
        tx.commit(store)?;
        log.push_str(&format!("Snapshot saved to {}\n", store.location()));
    }
    dry_run_note(&mut log, dry_run);
    Ok(log)
}

pub fn run_add<S: SnapshotStore + ?Sized>(
    store: &mut S,
    category: Category,
    additions: &[BlockEntry],
    remove_matching: Option<&str>,
    dry_run: bool,
) -> Result<String> {
    let mut tx = begin_existing(store)?;
    let before = tx.snapshot.get(category).map_or(0, <[BlockEntry]>::len);
    let summary =
        edit::merge_entries(tx.snapshot.entries_mut(category), additions, remove_matching);
    let after = tx.snapshot.get(category).map_or(0, <[BlockEntry]>::len);

    let mut log = format!("{category}: {before} -> {after} entries\n");
    if let Some(needle) = remove_matching {
        log.push_str(&format!("  removed {} entries matching '{needle}'\n", summary.removed.len()));
    }
    log.push_str(&format!(
        "  replaced {}, appended {}\n",
        summary.replaced, summary.appended
    ));

    if !dry_run {
        tx.commit(store)?;
        log.push_str(&format!("Snapshot saved to {}\n", store.location()));
    }
    dry_run_note(&mut log, dry_run);
    Ok(log)
}

pub fn run_dedupe<S: SnapshotStore + ?Sized>(
    store: &mut S,
    priority: &[Category],
    dry_run: bool,
) -> Result<String> {
    let mut tx = begin_existing(store)?;
    let before = tx.snapshot.total_entries();
    let removed = edit::dedupe_by_priority(&mut tx.snapshot, priority);

    let order: Vec<&str> = priority.iter().map(|c| c.short_name()).collect();
    let mut log = format!("Priority: {}\n", order.join(" > "));
    for o in &removed {
        log.push_str(&format!(
            "  removed {}[{}] {} ({})\n",
            o.category, o.index_in_category, o.value, o.text
        ));
    }
    log.push_str(&format!(
        "Entries: {before} -> {} ({} removed)\n",
        tx.snapshot.total_entries(),
        removed.len()
    ));

    if !removed.is_empty() && !dry_run {
        tx.commit(store)?;
        log.push_str(&format!("Snapshot saved to {}\n", store.location()));
    }
    dry_run_note(&mut log, dry_run);
    Ok(log)
}

/// Key and shape for each identifier, under `category` when given and
/// the building cascade otherwise.
pub fn classify_report(identifiers: &[String], category: Option<Category>) -> String {
    let mut log = String::new();
    for value in identifiers {
        let key = match category {
            Some(category) => classify_in(category, value),
            None => classify(value),
        };
        let mut line = format!("{:<40} {:<22} {}", value, shape_of(value).label(), key);
        if key.is_unclassified() {
            line.push_str("  unmatched");
        } else if key.has_sentinel_material() {
            line.push_str("  unknown material");
        }
        log.push_str(&line);
        log.push('\n');
    }
    log
}
