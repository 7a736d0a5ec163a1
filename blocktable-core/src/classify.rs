use std::fmt;

use crate::entry::Category;
use crate::tables::{self, position, SENTINEL, UNMATCHED_GROUP};

/// Composite sort key. Field order is comparison order; the trailing
/// identifier makes the order total over distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassificationKey {
    pub group: i32,
    pub subgroup: i32,
    pub material: i32,
    pub identifier: String,
}

impl ClassificationKey {
    fn new(group: i32, subgroup: i32, material: i32, identifier: &str) -> Self {
        Self {
            group,
            subgroup,
            material,
            identifier: identifier.to_string(),
        }
    }

    fn group_only(group: i32, identifier: &str) -> Self {
        Self::new(group, 0, 0, identifier)
    }

    fn indexed(group: i32, material: i32, identifier: &str) -> Self {
        Self::new(group, 0, material, identifier)
    }

    fn unmatched(identifier: &str) -> Self {
        Self::group_only(UNMATCHED_GROUP, identifier)
    }

    /// True for the last-resort bucket.
    pub fn is_unclassified(&self) -> bool {
        self.group == UNMATCHED_GROUP
    }

    pub fn has_sentinel_material(&self) -> bool {
        self.material == SENTINEL
    }
}

impl fmt::Display for ClassificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.group, self.subgroup, self.material, self.identifier
        )
    }
}

/// Geometric form of a building block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape {
    Stairs,
    Slab,
    VerticalSlab,
    Wall,
    Fence,
    FenceGate,
    Button,
    PressurePlate,
    Door,
    Trapdoor,
    FullBlock,
}

impl Shape {
    /// Shapes with a dedicated group, in cascade order.
    pub const CASCADE: [Shape; 10] = [
        Shape::Stairs,
        Shape::Slab,
        Shape::VerticalSlab,
        Shape::Wall,
        Shape::Fence,
        Shape::FenceGate,
        Shape::Button,
        Shape::PressurePlate,
        Shape::Door,
        Shape::Trapdoor,
    ];

    pub fn group_rank(self) -> i32 {
        match self {
            Shape::Stairs => 10,
            Shape::Slab => 11,
            Shape::VerticalSlab => 12,
            Shape::Wall => 13,
            Shape::Fence => 14,
            Shape::FenceGate => 15,
            Shape::Button => 16,
            Shape::PressurePlate => 17,
            Shape::Door => 18,
            Shape::Trapdoor => 19,
            Shape::FullBlock => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shape::Stairs => "Stairs",
            Shape::Slab => "Slabs",
            Shape::VerticalSlab => "Vertical slabs",
            Shape::Wall => "Walls",
            Shape::Fence => "Fences",
            Shape::FenceGate => "Fence gates",
            Shape::Button => "Buttons",
            Shape::PressurePlate => "Pressure plates",
            Shape::Door => "Doors",
            Shape::Trapdoor => "Trapdoors",
            Shape::FullBlock => "Full blocks and other",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First matching shape predicate. The order of the checks resolves
/// identifiers that match several predicates (stairs win over slabs).
pub fn shape_of(value: &str) -> Shape {
    if value.contains("_stairs") {
        return Shape::Stairs;
    }
    if value.contains("_slab") && !value.starts_with("vertical_") {
        return Shape::Slab;
    }
    if value.starts_with("vertical_") && value.contains("_slab") {
        return Shape::VerticalSlab;
    }
    if value.contains("_wall") {
        return Shape::Wall;
    }
    if value.contains("_fence") && !value.contains("_gate") {
        return Shape::Fence;
    }
    if value.contains("_fence_gate") {
        return Shape::FenceGate;
    }
    if value.contains("_button") {
        return Shape::Button;
    }
    if value.contains("pressure_plate") {
        return Shape::PressurePlate;
    }
    if value.contains("_door") {
        return Shape::Door;
    }
    if value.contains("_trapdoor") {
        return Shape::Trapdoor;
    }
    Shape::FullBlock
}

/// Shape-based key used for building blocks.
pub fn classify(value: &str) -> ClassificationKey {
    let shape = shape_of(value);
    let group = shape.group_rank();

    match shape {
        Shape::Stairs => stone_or_wood(group, tables::STAIRS_STONE_ORDER, value),
        Shape::Slab => stone_or_wood(group, tables::SLAB_STONE_ORDER, value),
        Shape::VerticalSlab => ClassificationKey::group_only(group, value),
        Shape::Wall => {
            let material =
                tables::first_substring(tables::WALL_ORDER, value).unwrap_or(SENTINEL);
            ClassificationKey::indexed(group, material, value)
        }
        Shape::Fence | Shape::FenceGate => {
            ClassificationKey::indexed(group, tables::wood_index(value), value)
        }
        Shape::Button | Shape::Door | Shape::Trapdoor => {
            if tables::mentions_wood(value) {
                ClassificationKey::new(group, 0, tables::wood_index(value), value)
            } else {
                ClassificationKey::new(group, 1, 0, value)
            }
        }
        Shape::PressurePlate => {
            if tables::mentions_wood(value) {
                ClassificationKey::new(group, 0, tables::wood_index(value), value)
            } else if value.contains("stone") {
                ClassificationKey::new(group, 1, 0, value)
            } else if value.contains("heavy_weighted") {
                ClassificationKey::new(group, 1, 1, value)
            } else if value.contains("light_weighted") {
                ClassificationKey::new(group, 1, 2, value)
            } else {
                ClassificationKey::new(group, 2, 0, value)
            }
        }
        Shape::FullBlock => classify_full_block(value),
    }
}

fn stone_or_wood(group: i32, stone_order: &[&str], value: &str) -> ClassificationKey {
    if tables::mentions_wood(value) {
        return ClassificationKey::new(group, 0, tables::wood_index(value), value);
    }
    match tables::first_substring(stone_order, value) {
        Some(i) => ClassificationKey::new(group, 1, i, value),
        None => ClassificationKey::new(group, 2, SENTINEL, value),
    }
}

fn classify_full_block(value: &str) -> ClassificationKey {
    let basic = |subgroup: i32, material: i32| ClassificationKey::new(1, subgroup, material, value);

    if let Some(i) = position(tables::BASIC_BASE, value) {
        return basic(1, i);
    }
    if value.contains("_planks") {
        return basic(2, tables::wood_index(value));
    }

    let is_wood_or_hyphae = value.contains("_wood") || value.contains("_hyphae");
    if value.starts_with("stripped_") && (value.contains("_log") || value.contains("_stem")) {
        return basic(3, tables::wood_index(&value.replace("stripped_", "")));
    }
    if is_wood_or_hyphae && !value.contains("stripped") {
        return basic(4, tables::wood_index(value));
    }
    if value.starts_with("stripped_") && is_wood_or_hyphae {
        return basic(5, tables::wood_index(&value.replace("stripped_", "")));
    }

    if let Some(i) = position(tables::STONE_VARIANTS, value) {
        return basic(6, i);
    }
    if let Some(i) = position(tables::BRICK_BLOCKS, value) {
        return basic(7, i);
    }
    if value.contains("_concrete") && !value.contains("powder") {
        let i = tables::color_with_suffix(value, "_concrete").unwrap_or(SENTINEL);
        return basic(8, i);
    }

    // The remaining family checks fall through when the identifier is
    // not one of the listed members.
    if value.contains("prismarine")
        && !value.contains("_slab")
        && !value.contains("_stairs")
        && !value.contains("_wall")
    {
        if let Some(i) = position(tables::PRISMARINE_BLOCKS, value) {
            return basic(9, i);
        }
    }
    if value.contains("quartz")
        && !value.contains("_stairs")
        && !value.contains("_slab")
        && !value.contains("ore")
    {
        if let Some(i) = position(tables::QUARTZ_BLOCKS, value) {
            return basic(10, i);
        }
    }
    if value.contains("purpur") && !value.contains("_stairs") && !value.contains("_slab") {
        if let Some(i) = position(tables::PURPUR_BLOCKS, value) {
            return basic(11, i);
        }
    }
    if value == "bamboo_mosaic" {
        return basic(12, 0);
    }
    if let Some(i) = position(tables::SANDSTONE_BLOCKS, value) {
        return basic(13, i);
    }
    if value == "smooth_stone" {
        return basic(14, 0);
    }

    // Carpets, glazed terracotta, concrete powder, panes, beds, ...
    ClassificationKey::unmatched(value)
}

fn classify_lighting(value: &str) -> ClassificationKey {
    if let Some(i) = position(tables::TORCHES, value) {
        return ClassificationKey::indexed(1, i, value);
    }
    if value.contains("lantern") && !value.contains("sea") && !value.contains("jack") {
        return ClassificationKey::group_only(2, value);
    }
    if position(tables::GLOW_BLOCKS, value).is_some() {
        return ClassificationKey::group_only(3, value);
    }
    if value.contains("jack_o_lantern") {
        return ClassificationKey::group_only(4, value);
    }
    if value.contains("candle") {
        let i = if value == "candle" {
            0
        } else {
            tables::CANDLE_ORDER
                .iter()
                .position(|color| value.strip_prefix(color) == Some("_candle"))
                .map(|i| i as i32)
                .unwrap_or(SENTINEL)
        };
        return ClassificationKey::indexed(5, i, value);
    }
    if value.contains("campfire") {
        return ClassificationKey::group_only(6, value);
    }
    if value.contains("redstone") && value.contains("lamp") {
        return ClassificationKey::new(7, 0, 0, value);
    }
    if value.contains("redstone") && value.contains("torch") {
        return ClassificationKey::new(7, 1, 0, value);
    }
    if value == "soul_fire" {
        return ClassificationKey::group_only(8, value);
    }
    ClassificationKey::unmatched(value)
}

/// Plain variant (-1) first, then dye colors, then anything else.
fn colored(group: i32, plain: Option<&str>, suffix: &str, value: &str) -> ClassificationKey {
    if plain == Some(value) {
        return ClassificationKey::indexed(group, -1, value);
    }
    let i = tables::color_with_suffix(value, suffix).unwrap_or(SENTINEL);
    ClassificationKey::indexed(group, i, value)
}

fn classify_decoration(value: &str) -> ClassificationKey {
    if value.contains("_wool") {
        return colored(1, None, "_wool", value);
    }
    if value.contains("_carpet") || value == "moss_carpet" {
        return colored(2, Some("moss_carpet"), "_carpet", value);
    }
    if value.contains("terracotta") && !value.contains("glazed") {
        return colored(3, Some("terracotta"), "_terracotta", value);
    }
    if value.contains("glazed_terracotta") {
        return colored(4, None, "_glazed_terracotta", value);
    }
    if value.contains("glass") && !value.contains("pane") {
        if value == "glass" {
            return ClassificationKey::indexed(5, -1, value);
        }
        if value.contains("stained_glass") {
            return colored(5, None, "_stained_glass", value);
        }
        return ClassificationKey::indexed(5, SENTINEL, value);
    }
    if value.contains("_bed") {
        return colored(6, None, "_bed", value);
    }
    if value.contains("shulker_box") {
        return colored(7, Some("shulker_box"), "_shulker_box", value);
    }
    if let Some(i) = position(tables::OTHER_DECORATION, value) {
        return ClassificationKey::indexed(8, i, value);
    }
    ClassificationKey::unmatched(value)
}

fn classify_nature(value: &str) -> ClassificationKey {
    if let Some(i) = position(tables::DIRT_TYPES, value) {
        return ClassificationKey::indexed(1, i, value);
    }
    if let Some(i) = position(tables::SAND_TYPES, value) {
        return ClassificationKey::indexed(2, i, value);
    }
    if (value.contains("_log") || value.contains("_stem")) && !value.contains("stripped") {
        return ClassificationKey::indexed(3, tables::wood_index(value), value);
    }
    if value.contains("_leaves") {
        return ClassificationKey::indexed(4, tables::wood_index(value), value);
    }
    if let Some(i) = tables::first_substring(tables::FLOWERS, value) {
        return ClassificationKey::indexed(5, i, value);
    }
    if value.contains("ice") || value.contains("snow") {
        let i = position(tables::ICE_ORDER, value).unwrap_or(SENTINEL);
        return ClassificationKey::indexed(6, i, value);
    }
    if value == "water" {
        return ClassificationKey::group_only(7, value);
    }
    if let Some(i) = position(tables::PLANTS, value) {
        return ClassificationKey::indexed(8, i, value);
    }
    ClassificationKey::unmatched(value)
}

fn classify_functional(value: &str) -> ClassificationKey {
    if let Some(i) = position(tables::CRAFTING_BLOCKS, value) {
        return ClassificationKey::indexed(1, i, value);
    }
    if let Some(i) = position(tables::STORAGE_BLOCKS, value) {
        return ClassificationKey::indexed(2, i, value);
    }
    if let Some(i) = position(tables::FUNCTIONAL_DOORS, value) {
        return ClassificationKey::indexed(3, i, value);
    }
    if let Some(i) = position(tables::FUNCTIONAL_TRAPDOORS, value) {
        return ClassificationKey::indexed(4, i, value);
    }
    let component = position(tables::REDSTONE_COMPONENTS, value);
    if component.is_some()
        || (value.contains("redstone") && position(tables::REDSTONE_ORES, value).is_none())
    {
        return ClassificationKey::indexed(5, component.unwrap_or(SENTINEL), value);
    }
    if value.contains("piston") {
        let i = position(tables::PISTONS, value).unwrap_or(SENTINEL);
        return ClassificationKey::indexed(6, i, value);
    }
    if value.contains("rail") {
        let i = position(tables::RAILS, value).unwrap_or(SENTINEL);
        return ClassificationKey::indexed(7, i, value);
    }
    if let Some(i) = position(tables::FUNCTIONAL_SWITCHES, value) {
        return ClassificationKey::indexed(8, i, value);
    }
    ClassificationKey::unmatched(value)
}

fn ore_index(value: &str, prefix: &str, suffix: &str) -> Option<i32> {
    tables::ORE_ORDER
        .iter()
        .position(|ore| {
            value
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(ore))
                == Some(suffix)
        })
        .map(|i| i as i32)
}

fn classify_ore(value: &str) -> ClassificationKey {
    if let Some(i) = ore_index(value, "", "_ore") {
        return ClassificationKey::indexed(1, i, value);
    }
    if let Some(i) = ore_index(value, "deepslate_", "_ore") {
        return ClassificationKey::indexed(2, i, value);
    }
    if value.contains("nether") && value.contains("_ore") {
        return ClassificationKey::group_only(3, value);
    }
    if let Some(i) = ore_index(value, "", "_block") {
        return ClassificationKey::indexed(4, i, value);
    }
    if position(tables::EXTRA_MINERAL_BLOCKS, value).is_some() {
        return ClassificationKey::indexed(4, tables::EXTRA_MINERAL_INDEX, value);
    }
    if value.contains("raw_") && value.contains("_block") {
        let i = position(tables::RAW_ORE_BLOCKS, value).unwrap_or(SENTINEL);
        return ClassificationKey::indexed(5, i, value);
    }
    ClassificationKey::unmatched(value)
}

fn classify_special(value: &str) -> ClassificationKey {
    if let Some(i) = position(tables::TECHNICAL_BLOCKS, value) {
        return ClassificationKey::indexed(1, i, value);
    }
    if let Some(i) = position(tables::INDESTRUCTIBLE_BLOCKS, value) {
        return ClassificationKey::indexed(2, i, value);
    }
    if value.contains("sponge") {
        let i = position(tables::SPONGES, value).unwrap_or(SENTINEL);
        return ClassificationKey::indexed(3, i, value);
    }
    if value == "lava" {
        return ClassificationKey::group_only(4, value);
    }
    if value.contains("end") && !value.contains("stone") {
        let i = position(tables::END_BLOCKS, value).unwrap_or(SENTINEL);
        return ClassificationKey::indexed(5, i, value);
    }
    if value == "end_stone" {
        return ClassificationKey::group_only(6, value);
    }
    if let Some(i) = position(tables::NETHER_BASICS, value) {
        return ClassificationKey::indexed(7, i, value);
    }
    if value.contains("sculk") {
        let i = position(tables::SCULK_ORDER, value).unwrap_or(SENTINEL);
        return ClassificationKey::indexed(8, i, value);
    }
    ClassificationKey::unmatched(value)
}

/// Key for an identifier within the given category's ordering scheme.
pub fn classify_in(category: Category, value: &str) -> ClassificationKey {
    match category {
        Category::Building => classify(value),
        Category::Lighting => classify_lighting(value),
        Category::Decoration => classify_decoration(value),
        Category::Nature => classify_nature(value),
        Category::Functional => classify_functional(value),
        Category::Ore => classify_ore(value),
        Category::Special => classify_special(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stairs_win_over_slab_substring() {
        assert_eq!(shape_of("example_stairs_slab_test"), Shape::Stairs);
        assert_eq!(classify("example_stairs_slab_test").group, 10);
    }

    #[test]
    fn unknown_wall_material_gets_sentinel() {
        let key = classify("unknownmaterial_wall");
        assert_eq!(key.group, Shape::Wall.group_rank());
        assert_eq!(key.material, SENTINEL);
        assert!(key.has_sentinel_material());
        assert!(!key.is_unclassified());
    }

    #[test]
    fn shape_scenario_keys() {
        let oak_stairs = classify("oak_stairs");
        let copper_stairs = classify("cut_copper_stairs");
        let oak_slab = classify("oak_slab");
        let vertical = classify("vertical_oak_slab");

        assert_eq!((oak_stairs.group, oak_stairs.subgroup, oak_stairs.material), (10, 0, 0));
        assert_eq!(
            (copper_stairs.group, copper_stairs.subgroup, copper_stairs.material),
            (10, 2, SENTINEL)
        );
        assert_eq!((oak_slab.group, oak_slab.subgroup, oak_slab.material), (11, 0, 0));
        assert_eq!(vertical.group, 12);

        assert!(oak_stairs < copper_stairs);
        assert!(copper_stairs < oak_slab);
        assert!(oak_slab < vertical);
    }

    #[test]
    fn full_blocks_sort_before_shapes() {
        assert!(classify("oak_planks") < classify("oak_stairs"));
        assert_eq!(classify("stone").subgroup, 1);
        assert_eq!(classify("spruce_planks").material, 1);
    }

    #[test]
    fn stripped_logs_use_species_after_prefix() {
        let key = classify("stripped_birch_log");
        assert_eq!((key.group, key.subgroup, key.material), (1, 3, 2));
        let wood = classify("stripped_cherry_wood");
        assert_eq!((wood.group, wood.subgroup, wood.material), (1, 5, 7));
        let bark = classify("warped_hyphae");
        assert_eq!((bark.group, bark.subgroup, bark.material), (1, 4, 10));
    }

    #[test]
    fn stone_stairs_match_first_listed_material() {
        let key = classify("polished_andesite_stairs");
        // "andesite" is listed before "polished_andesite" and matches as a substring.
        assert_eq!((key.subgroup, key.material), (1, 2));
    }

    #[test]
    fn pressure_plates_split_by_weight() {
        assert_eq!(classify("oak_pressure_plate").subgroup, 0);
        assert_eq!(classify("stone_pressure_plate").material, 0);
        assert_eq!(classify("heavy_weighted_pressure_plate").material, 1);
        assert_eq!(classify("light_weighted_pressure_plate").material, 2);
        assert_eq!(classify("polished_blackstone_pressure_plate").subgroup, 1);
    }

    #[test]
    fn fence_with_gate_marker_is_gate() {
        assert_eq!(shape_of("oak_fence"), Shape::Fence);
        assert_eq!(shape_of("oak_fence_gate"), Shape::FenceGate);
        assert_eq!(shape_of("iron_trapdoor"), Shape::Trapdoor);
        assert_eq!(shape_of("iron_door"), Shape::Door);
    }

    #[test]
    fn concrete_uses_color_order() {
        assert_eq!(classify("white_concrete").material, 0);
        assert_eq!(classify("black_concrete").material, 15);
        assert!(classify("white_concrete_powder").is_unclassified());
    }

    /// Every listed identifier, each material in every cascade shape,
    /// and colored variants of the dyed families.
    fn vocabulary() -> Vec<String> {
        let lists: &[&[&str]] = &[
            tables::WOOD_ORDER,
            tables::COLOR_ORDER,
            tables::STAIRS_STONE_ORDER,
            tables::SLAB_STONE_ORDER,
            tables::WALL_ORDER,
            tables::BASIC_BASE,
            tables::STONE_VARIANTS,
            tables::BRICK_BLOCKS,
            tables::PRISMARINE_BLOCKS,
            tables::QUARTZ_BLOCKS,
            tables::PURPUR_BLOCKS,
            tables::SANDSTONE_BLOCKS,
            tables::TORCHES,
            tables::GLOW_BLOCKS,
            tables::CANDLE_ORDER,
            tables::OTHER_DECORATION,
            tables::DIRT_TYPES,
            tables::SAND_TYPES,
            tables::FLOWERS,
            tables::ICE_ORDER,
            tables::PLANTS,
            tables::CRAFTING_BLOCKS,
            tables::STORAGE_BLOCKS,
            tables::FUNCTIONAL_DOORS,
            tables::FUNCTIONAL_TRAPDOORS,
            tables::REDSTONE_COMPONENTS,
            tables::REDSTONE_ORES,
            tables::PISTONS,
            tables::RAILS,
            tables::FUNCTIONAL_SWITCHES,
            tables::ORE_ORDER,
            tables::EXTRA_MINERAL_BLOCKS,
            tables::RAW_ORE_BLOCKS,
            tables::TECHNICAL_BLOCKS,
            tables::INDESTRUCTIBLE_BLOCKS,
            tables::SPONGES,
            tables::END_BLOCKS,
            tables::NETHER_BASICS,
            tables::SCULK_ORDER,
        ];
        let shaped = |m: &str| {
            vec![
                format!("{m}_stairs"),
                format!("{m}_slab"),
                format!("vertical_{m}_slab"),
                format!("{m}_wall"),
                format!("{m}_fence"),
                format!("{m}_fence_gate"),
                format!("{m}_button"),
                format!("{m}_pressure_plate"),
                format!("{m}_door"),
                format!("{m}_trapdoor"),
            ]
        };

        let mut ids: Vec<String> = Vec::new();
        for list in lists {
            for id in list.iter() {
                ids.push(id.to_string());
                ids.extend(shaped(*id));
            }
        }
        for wood in tables::WOOD_ORDER {
            for suffix in ["_planks", "_log", "_wood", "_leaves", "_stem", "_hyphae"] {
                ids.push(format!("{wood}{suffix}"));
                ids.push(format!("stripped_{wood}{suffix}"));
            }
        }
        for color in tables::COLOR_ORDER {
            for suffix in ["_wool", "_carpet", "_terracotta", "_glazed_terracotta", "_bed"] {
                ids.push(format!("{color}{suffix}"));
            }
            for suffix in ["_concrete", "_concrete_powder", "_stained_glass", "_shulker_box"] {
                ids.push(format!("{color}{suffix}"));
            }
        }
        for ore in tables::ORE_ORDER {
            ids.push(format!("{ore}_ore"));
            ids.push(format!("deepslate_{ore}_ore"));
            ids.push(format!("{ore}_block"));
        }
        ids.sort();
        ids.dedup();
        ids
    }

    #[test]
    fn keys_order_every_known_identifier_totally() {
        let ids = vocabulary();
        assert!(ids.len() > 1000);

        for category in Category::ALL {
            let mut keys: Vec<ClassificationKey> =
                ids.iter().map(|id| classify_in(category, id)).collect();
            for (id, key) in ids.iter().zip(&keys) {
                assert_eq!(&key.identifier, id, "{category}");
            }
            keys.sort();
            for pair in keys.windows(2) {
                assert!(
                    pair[0] < pair[1],
                    "{category}: {} and {} are not strictly ordered",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn lighting_groups() {
        let lighting = |id| classify_in(Category::Lighting, id);
        assert!(lighting("torch") < lighting("lantern"));
        assert_eq!(classify_in(Category::Lighting, "candle").material, 0);
        assert_eq!(classify_in(Category::Lighting, "white_candle").material, 1);
        assert_eq!(classify_in(Category::Lighting, "sea_lantern").group, 3);
        assert_eq!(classify_in(Category::Lighting, "redstone_torch").subgroup, 1);
    }

    #[test]
    fn decoration_plain_variant_leads_colors() {
        let plain = classify_in(Category::Decoration, "terracotta");
        let white = classify_in(Category::Decoration, "white_terracotta");
        assert_eq!(plain.material, -1);
        assert!(plain < white);
        assert_eq!(classify_in(Category::Decoration, "glass").material, -1);
        assert_eq!(classify_in(Category::Decoration, "tinted_glass").material, SENTINEL);
        assert_eq!(classify_in(Category::Decoration, "white_glazed_terracotta").group, 4);
    }

    #[test]
    fn ore_groups() {
        assert_eq!(classify_in(Category::Ore, "iron_ore").group, 1);
        assert_eq!(classify_in(Category::Ore, "deepslate_iron_ore").group, 2);
        assert_eq!(classify_in(Category::Ore, "nether_gold_ore").group, 3);
        assert_eq!(classify_in(Category::Ore, "netherite_block").material, 900);
        assert_eq!(classify_in(Category::Ore, "raw_gold_block").material, 2);
        let ore = |id| classify_in(Category::Ore, id);
        assert!(ore("copper_block") < ore("netherite_block"));
    }

    #[test]
    fn functional_redstone_excludes_ores() {
        assert_eq!(classify_in(Category::Functional, "redstone_lamp").group, 5);
        assert!(classify_in(Category::Functional, "redstone_ore").is_unclassified());
        assert_eq!(classify_in(Category::Functional, "sticky_piston").material, 1);
    }

    #[test]
    fn special_and_nature_groups() {
        assert_eq!(classify_in(Category::Special, "end_stone").group, 6);
        assert_eq!(classify_in(Category::Special, "end_rod").material, 3);
        assert_eq!(classify_in(Category::Nature, "birch_leaves").material, 2);
        assert_eq!(classify_in(Category::Nature, "blue_ice").material, 2);
        assert!(classify_in(Category::Nature, "mangrove_roots").is_unclassified());
    }
}
