use tracing::debug;

use crate::classify::{classify_in, shape_of, Shape};
use crate::entry::{BlockEntry, Category};
use crate::snapshot::Snapshot;

/// Outcome of sorting one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSummary {
    pub total: usize,
    /// Entries whose position changed.
    pub moved: usize,
    /// Identifiers that fell into the last-resort bucket.
    pub unclassified: Vec<String>,
}

/// Stable sort of `entries` by their classification key within
/// `category`. Equal keys keep their relative order.
pub fn sort_entries(category: Category, entries: &mut [BlockEntry]) -> SortSummary {
    let before: Vec<String> = entries.iter().map(|e| e.value.clone()).collect();
    entries.sort_by_cached_key(|entry| classify_in(category, &entry.value));

    let moved = before
        .iter()
        .zip(entries.iter())
        .filter(|(old, new)| **old != new.value)
        .count();

    let unclassified: Vec<String> = entries
        .iter()
        .filter(|entry| classify_in(category, &entry.value).is_unclassified())
        .map(|entry| entry.value.clone())
        .collect();
    for value in &unclassified {
        debug!(%category, value = %value, "identifier placed in unmatched bucket");
    }

    SortSummary {
        total: entries.len(),
        moved,
        unclassified,
    }
}

/// Sort every category in place.
pub fn sort_snapshot(snapshot: &mut Snapshot) -> Vec<(Category, SortSummary)> {
    snapshot
        .iter_mut()
        .map(|(category, entries)| (category, sort_entries(category, entries)))
        .collect()
}

/// True when `entries` is already in classification order.
pub fn is_sorted(category: Category, entries: &[BlockEntry]) -> bool {
    entries
        .windows(2)
        .all(|pair| classify_in(category, &pair[0].value) <= classify_in(category, &pair[1].value))
}

/// Where one shape group sits inside a category listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRange {
    pub shape: Shape,
    pub count: usize,
    pub first_index: usize,
    pub last_index: usize,
    pub first: BlockEntry,
    pub last: BlockEntry,
}

impl ShapeRange {
    /// All members occupy consecutive positions.
    pub fn is_contiguous(&self) -> bool {
        self.last_index + 1 - self.first_index == self.count
    }
}

/// Position ranges of every dedicated shape group present in `entries`,
/// in cascade order.
pub fn shape_ranges(entries: &[BlockEntry]) -> Vec<ShapeRange> {
    let shapes: Vec<Shape> = entries.iter().map(|e| shape_of(&e.value)).collect();

    Shape::CASCADE
        .iter()
        .filter_map(|&shape| {
            let indices: Vec<usize> = shapes
                .iter()
                .enumerate()
                .filter(|(_, s)| **s == shape)
                .map(|(i, _)| i)
                .collect();
            let (&first_index, &last_index) = (indices.first()?, indices.last()?);
            Some(ShapeRange {
                shape,
                count: indices.len(),
                first_index,
                last_index,
                first: entries[first_index].clone(),
                last: entries[last_index].clone(),
            })
        })
        .collect()
}
