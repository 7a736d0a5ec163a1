use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::audit::Occurrence;
use crate::entry::{BlockEntry, Category};
use crate::snapshot::Snapshot;

/// A label correction for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFix {
    pub category: Category,
    #[serde(alias = "block_id")]
    pub value: String,
    pub old_text: String,
    pub new_text: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Applied,
    AlreadyApplied,
    /// The identifier exists but carries neither the old nor the new label.
    Mismatch { current: String },
    NotFound,
}

/// Apply label fixes in order. Every matching entry in the category is
/// relabelled, so a duplicated identifier is fixed everywhere.
pub fn apply_label_fixes(
    snapshot: &mut Snapshot,
    fixes: &[LabelFix],
) -> Vec<(LabelFix, FixOutcome)> {
    fixes
        .iter()
        .map(|fix| {
            let outcome = apply_label_fix(snapshot, fix);
            match &outcome {
                FixOutcome::Applied => info!(value = %fix.value, "label fixed"),
                FixOutcome::AlreadyApplied => {}
                FixOutcome::Mismatch { current } => {
                    warn!(
                        value = %fix.value,
                        current = %current,
                        "label fix does not match current text"
                    )
                }
                FixOutcome::NotFound => {
                    warn!(
                        category = %fix.category,
                        value = %fix.value,
                        "label fix target not found"
                    )
                }
            }
            (fix.clone(), outcome)
        })
        .collect()
}

fn apply_label_fix(snapshot: &mut Snapshot, fix: &LabelFix) -> FixOutcome {
    let Some(entries) = snapshot.get_mut(fix.category) else {
        return FixOutcome::NotFound;
    };

    let mut outcome = FixOutcome::NotFound;
    for entry in entries.iter_mut().filter(|e| e.value == fix.value) {
        if entry.text == fix.old_text {
            entry.text = fix.new_text.clone();
            outcome = FixOutcome::Applied;
        } else if entry.text == fix.new_text {
            if outcome == FixOutcome::NotFound {
                outcome = FixOutcome::AlreadyApplied;
            }
        } else if !matches!(outcome, FixOutcome::Applied) {
            outcome = FixOutcome::Mismatch {
                current: entry.text.clone(),
            };
        }
    }
    outcome
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub removed: Vec<BlockEntry>,
    pub replaced: usize,
    pub appended: usize,
}

/// Merge `additions` into `entries`: entries with an existing identifier
/// get the new label in place, the rest are appended in order. With
/// `remove_matching`, existing entries whose identifier contains that
/// substring are dropped first.
pub fn merge_entries(
    entries: &mut Vec<BlockEntry>,
    additions: &[BlockEntry],
    remove_matching: Option<&str>,
) -> MergeSummary {
    let mut summary = MergeSummary::default();

    if let Some(needle) = remove_matching {
        let (removed, kept): (Vec<BlockEntry>, Vec<BlockEntry>) = entries
            .drain(..)
            .partition(|e| e.value.contains(needle));
        *entries = kept;
        summary.removed = removed;
    }

    for addition in additions {
        match entries.iter_mut().find(|e| e.value == addition.value) {
            Some(existing) => {
                existing.text = addition.text.clone();
                summary.replaced += 1;
            }
            None => {
                entries.push(addition.clone());
                summary.appended += 1;
            }
        }
    }
    summary
}

/// Keep every identifier only in the first category of `priority` that
/// lists it (categories missing from `priority` rank after it, in
/// canonical order). Repeats inside one category keep their first
/// occurrence. Relative order is preserved.
pub fn dedupe_by_priority(snapshot: &mut Snapshot, priority: &[Category]) -> Vec<Occurrence> {
    let mut ranking: Vec<Category> = priority.to_vec();
    for category in Category::ALL {
        if !ranking.contains(&category) {
            ranking.push(category);
        }
    }

    let mut home: HashMap<String, Category> = HashMap::new();
    for category in &ranking {
        for entry in snapshot.get(*category).unwrap_or(&[]) {
            home.entry(entry.value.clone()).or_insert(*category);
        }
    }

    let mut removed = Vec::new();
    for (category, entries) in snapshot.iter_mut() {
        let mut seen: HashSet<String> = HashSet::new();
        let mut index = 0usize;
        entries.retain(|entry| {
            let keep =
                home.get(&entry.value) == Some(&category) && seen.insert(entry.value.clone());
            if !keep {
                removed.push(Occurrence {
                    category,
                    index_in_category: index,
                    text: entry.text.clone(),
                    value: entry.value.clone(),
                });
            }
            index += 1;
            keep
        });
    }
    removed
}
