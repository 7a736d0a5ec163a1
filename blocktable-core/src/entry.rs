use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BlockTableError;

/// One menu record: a localized label and the block identifier it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub text: String,
    pub value: String,
}

impl BlockEntry {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Display bucket. Declaration order is the canonical order used for
/// rendering, snapshots and reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "BUILDING_BLOCKS")]
    Building,
    #[serde(rename = "LIGHTING_BLOCKS")]
    Lighting,
    #[serde(rename = "DECORATION_BLOCKS")]
    Decoration,
    #[serde(rename = "NATURE_BLOCKS")]
    Nature,
    #[serde(rename = "FUNCTIONAL_BLOCKS")]
    Functional,
    #[serde(rename = "ORE_BLOCKS")]
    Ore,
    #[serde(rename = "SPECIAL_BLOCKS")]
    Special,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Building,
        Category::Lighting,
        Category::Decoration,
        Category::Nature,
        Category::Functional,
        Category::Ore,
        Category::Special,
    ];

    /// Name of the `const` declaration that holds this category's array.
    pub fn constant_name(self) -> &'static str {
        match self {
            Category::Building => "BUILDING_BLOCKS",
            Category::Lighting => "LIGHTING_BLOCKS",
            Category::Decoration => "DECORATION_BLOCKS",
            Category::Nature => "NATURE_BLOCKS",
            Category::Functional => "FUNCTIONAL_BLOCKS",
            Category::Ore => "ORE_BLOCKS",
            Category::Special => "SPECIAL_BLOCKS",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Category::Building => "building",
            Category::Lighting => "lighting",
            Category::Decoration => "decoration",
            Category::Nature => "nature",
            Category::Functional => "functional",
            Category::Ore => "ore",
            Category::Special => "special",
        }
    }

    pub fn from_constant_name(name: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.constant_name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_name())
    }
}

impl FromStr for Category {
    type Err = BlockTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(cat) = Category::from_constant_name(trimmed) {
            return Ok(cat);
        }
        let lower = trimmed.to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.short_name() == lower || c.constant_name().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| BlockTableError::UnknownCategory(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_constant_and_short_names() {
        assert_eq!("ORE_BLOCKS".parse::<Category>().unwrap(), Category::Ore);
        assert_eq!("lighting".parse::<Category>().unwrap(), Category::Lighting);
        assert_eq!(
            "decoration_blocks".parse::<Category>().unwrap(),
            Category::Decoration
        );
        assert!(matches!(
            "furniture".parse::<Category>(),
            Err(BlockTableError::UnknownCategory(name)) if name == "furniture"
        ));
    }

    #[test]
    fn canonical_order_follows_declaration() {
        let mut shuffled = vec![Category::Special, Category::Building, Category::Ore];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Category::Building, Category::Ore, Category::Special]
        );
    }

    #[test]
    fn serializes_as_constant_name() {
        let json = serde_json::to_string(&Category::Nature).unwrap();
        assert_eq!(json, "\"NATURE_BLOCKS\"");
    }
}
