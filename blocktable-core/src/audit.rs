use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::{shape_of, Shape};
use crate::entry::{BlockEntry, Category};
use crate::snapshot::Snapshot;
use crate::sort::{shape_ranges, ShapeRange};
use crate::tables;

/// An entry together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub category: Category,
    pub index_in_category: usize,
    pub text: String,
    pub value: String,
}

impl Occurrence {
    fn new(category: Category, index_in_category: usize, entry: &BlockEntry) -> Self {
        Self {
            category,
            index_in_category,
            text: entry.text.clone(),
            value: entry.value.clone(),
        }
    }
}

/// Every entry of every category, in category then source order.
pub fn flatten(snapshot: &Snapshot) -> Vec<Occurrence> {
    snapshot
        .iter()
        .flat_map(|(category, entries)| {
            entries
                .iter()
                .enumerate()
                .map(move |(i, entry)| Occurrence::new(category, i, entry))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub total_blocks: usize,
    pub categories: BTreeMap<Category, usize>,
    pub flat_list: Vec<Occurrence>,
}

pub fn extract(snapshot: &Snapshot) -> Extraction {
    Extraction {
        total_blocks: snapshot.total_entries(),
        categories: snapshot
            .iter()
            .map(|(category, entries)| (category, entries.len()))
            .collect(),
        flat_list: flatten(snapshot),
    }
}

/// Entries sharing one key (identifier or label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub key: String,
    pub occurrences: Vec<Occurrence>,
}

impl DuplicateGroup {
    pub fn size(&self) -> usize {
        self.occurrences.len()
    }
}

fn group_by<'a, F>(items: impl IntoIterator<Item = &'a Occurrence>, key: F) -> Vec<DuplicateGroup>
where
    F: Fn(&Occurrence) -> &str,
{
    let mut groups: BTreeMap<String, Vec<Occurrence>> = BTreeMap::new();
    for item in items {
        groups
            .entry(key(item).to_string())
            .or_default()
            .push(item.clone());
    }
    groups
        .into_iter()
        .filter(|(_, occurrences)| occurrences.len() > 1)
        .map(|(key, occurrences)| DuplicateGroup { key, occurrences })
        .collect()
}

/// Identifiers that appear more than once inside one category.
pub fn find_duplicates(category: Category, entries: &[BlockEntry]) -> Vec<DuplicateGroup> {
    let occurrences: Vec<Occurrence> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| Occurrence::new(category, i, entry))
        .collect();
    group_by(&occurrences, |o| o.value.as_str())
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateSummary {
    pub total_blocks: usize,
    pub unique_values: usize,
    pub unique_texts: usize,
    pub duplicate_values: usize,
    pub duplicate_texts: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateReport {
    pub summary: DuplicateSummary,
    /// Same identifier repeated inside a single category.
    pub within_category: Vec<DuplicateGroup>,
    /// Same identifier anywhere in the table.
    pub duplicate_values: Vec<DuplicateGroup>,
    /// Same label anywhere in the table.
    pub duplicate_texts: Vec<DuplicateGroup>,
}

impl DuplicateReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_values.is_empty() && self.duplicate_texts.is_empty()
    }
}

fn count_unique<'a>(items: &'a [Occurrence], key: impl Fn(&'a Occurrence) -> &'a str) -> usize {
    let mut keys: Vec<&str> = items.iter().map(key).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

pub fn duplicate_report(snapshot: &Snapshot) -> DuplicateReport {
    let all = flatten(snapshot);
    let within_category = snapshot
        .iter()
        .flat_map(|(category, entries)| find_duplicates(category, entries))
        .collect();
    let duplicate_values = group_by(&all, |o| o.value.as_str());
    let duplicate_texts = group_by(&all, |o| o.text.as_str());

    DuplicateReport {
        summary: DuplicateSummary {
            total_blocks: all.len(),
            unique_values: count_unique(&all, |o| o.value.as_str()),
            unique_texts: count_unique(&all, |o| o.text.as_str()),
            duplicate_values: duplicate_values.len(),
            duplicate_texts: duplicate_texts.len(),
        },
        within_category,
        duplicate_values,
        duplicate_texts,
    }
}

/// Fold an identifier into its variation family by dropping the
/// finish/process prefixes.
pub fn normalize_value(value: &str) -> String {
    tables::VARIATION_PREFIXES
        .iter()
        .fold(value.to_string(), |acc, prefix| acc.replace(prefix, ""))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationFamily {
    pub base: String,
    pub members: Vec<Occurrence>,
    pub by_category: BTreeMap<Category, usize>,
}

/// Families with at least `min_members` prefixed variants, largest first.
pub fn variation_families(snapshot: &Snapshot, min_members: usize) -> Vec<VariationFamily> {
    let mut families: BTreeMap<String, Vec<Occurrence>> = BTreeMap::new();
    for occurrence in flatten(snapshot) {
        let base = normalize_value(&occurrence.value);
        if base != occurrence.value {
            families.entry(base).or_default().push(occurrence);
        }
    }

    let mut out: Vec<VariationFamily> = families
        .into_iter()
        .filter(|(_, members)| members.len() >= min_members)
        .map(|(base, members)| {
            let mut by_category = BTreeMap::new();
            for member in &members {
                *by_category.entry(member.category).or_insert(0) += 1;
            }
            VariationFamily {
                base,
                members,
                by_category,
            }
        })
        .collect();
    out.sort_by(|a, b| b.members.len().cmp(&a.members.len()).then_with(|| a.base.cmp(&b.base)));
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone)]
pub struct CategoryAudit {
    pub total: usize,
    pub shares: Vec<CategoryShare>,
    /// Light-source-looking identifiers outside the lighting category.
    pub misplaced_lights: Vec<Occurrence>,
    /// Ore-looking identifiers outside the ore category.
    pub misplaced_ores: Vec<Occurrence>,
    /// Building entries per shape, largest first.
    pub building_shapes: Vec<(Shape, usize)>,
    pub building_ranges: Vec<ShapeRange>,
    pub families: Vec<VariationFamily>,
}

impl CategoryAudit {
    /// Shape groups whose members are split apart in the building list.
    pub fn scattered_shapes(&self) -> impl Iterator<Item = &ShapeRange> {
        self.building_ranges.iter().filter(|r| !r.is_contiguous())
    }
}

fn misplaced(all: &[Occurrence], home: Category, keywords: &[&str]) -> Vec<Occurrence> {
    all.iter()
        .filter(|o| o.category != home)
        .filter(|o| {
            let lower = o.value.to_ascii_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .cloned()
        .collect()
}

pub fn audit_categories(snapshot: &Snapshot) -> CategoryAudit {
    let all = flatten(snapshot);
    let total = all.len();

    let shares = Category::ALL
        .iter()
        .filter_map(|&category| {
            let count = snapshot.get(category)?.len();
            let percent = if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            Some(CategoryShare {
                category,
                count,
                percent,
            })
        })
        .collect();

    let building = snapshot.get(Category::Building).unwrap_or(&[]);
    let mut shape_counts: BTreeMap<Shape, usize> = BTreeMap::new();
    for entry in building {
        *shape_counts.entry(shape_of(&entry.value)).or_insert(0) += 1;
    }
    let mut building_shapes: Vec<(Shape, usize)> = shape_counts.into_iter().collect();
    building_shapes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    CategoryAudit {
        total,
        shares,
        misplaced_lights: misplaced(&all, Category::Lighting, tables::LIGHT_KEYWORDS),
        misplaced_ores: misplaced(&all, Category::Ore, tables::ORE_KEYWORDS),
        building_shapes,
        building_ranges: shape_ranges(building),
        families: variation_families(snapshot, 3),
    }
}

/// `{wood}{suffix}` for every wood species, e.g. all the signs.
pub fn wood_family(suffix: &str) -> Vec<String> {
    tables::WOOD_ORDER
        .iter()
        .map(|wood| format!("{wood}{suffix}"))
        .collect()
}

/// Expected identifiers that appear in no category, in input order.
pub fn missing_identifiers(snapshot: &Snapshot, expected: &[String]) -> Vec<String> {
    let present: std::collections::HashSet<&str> = snapshot
        .iter()
        .flat_map(|(_, entries)| entries.iter().map(|e| e.value.as_str()))
        .collect();
    let mut seen = std::collections::HashSet::new();
    expected
        .iter()
        .filter(|id| !present.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        let mut s = Snapshot::default();
        s.set(
            Category::Building,
            vec![
                BlockEntry::new("Oak Stairs", "oak_stairs"),
                BlockEntry::new("Polished Andesite", "polished_andesite"),
                BlockEntry::new("Andesite Slab", "andesite_slab"),
                BlockEntry::new("Vertical Andesite Slab", "vertical_andesite_slab"),
                BlockEntry::new("Polished Andesite Slab", "polished_andesite_slab"),
                BlockEntry::new("Smooth Andesite Slab", "smooth_andesite_slab"),
                BlockEntry::new("Redstone Lamp", "redstone_lamp"),
            ],
        );
        s.set(
            Category::Decoration,
            vec![
                BlockEntry::new("Oak Sign", "oak_sign"),
                BlockEntry::new("Oak Sign (old)", "oak_sign"),
                BlockEntry::new("Raw Iron", "raw_iron_block"),
            ],
        );
        s.set(Category::Ore, vec![BlockEntry::new("Oak Sign", "iron_ore")]);
        s
    }

    #[test]
    fn one_duplicate_group_for_repeated_identifier() {
        let s = snapshot();
        let groups = find_duplicates(Category::Decoration, s.get(Category::Decoration).unwrap());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "oak_sign");
        assert_eq!(groups[0].size(), 2);
        assert_eq!(groups[0].occurrences[1].index_in_category, 1);
    }

    #[test]
    fn report_counts_values_and_texts() {
        let report = duplicate_report(&snapshot());
        assert_eq!(report.within_category.len(), 1);
        assert_eq!(report.duplicate_values.len(), 1);
        assert_eq!(report.duplicate_texts.len(), 1);
        assert_eq!(report.duplicate_texts[0].key, "Oak Sign");
        assert_eq!(report.summary.total_blocks, 11);
        assert_eq!(report.summary.unique_values, 10);
        assert!(!report.is_clean());
    }

    #[test]
    fn audit_flags_keyword_misplacements() {
        let audit = audit_categories(&snapshot());
        let lights: Vec<&str> = audit.misplaced_lights.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(lights, vec!["redstone_lamp"]);
        let ores: Vec<&str> = audit.misplaced_ores.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(ores, vec!["raw_iron_block"]);
        assert_eq!(audit.shares.len(), 3);
        assert_eq!(audit.building_shapes[0], (Shape::Slab, 3));
    }

    #[test]
    fn families_group_prefixed_variants() {
        assert_eq!(normalize_value("waxed_cut_copper"), "copper");
        let families = variation_families(&snapshot(), 3);
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].base, "andesite_slab");
        assert_eq!(families[0].members.len(), 3);
    }

    #[test]
    fn coverage_lists_absent_identifiers_once() {
        let expected: Vec<String> = wood_family("_sign");
        assert_eq!(expected.len(), 11);
        let missing = missing_identifiers(&snapshot(), &expected);
        assert_eq!(missing.len(), 10);
        assert_eq!(missing[0], "spruce_sign");

        let repeated = vec!["stone".to_string(), "stone".to_string(), "oak_stairs".to_string()];
        assert_eq!(missing_identifiers(&snapshot(), &repeated), vec!["stone".to_string()]);
    }
}
