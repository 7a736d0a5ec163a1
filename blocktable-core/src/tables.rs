//! Hand-maintained order lists used as tie-break dictionaries by the
//! classifier. Position in a list is the material index; the lists are
//! product ordering decisions and are kept exactly as authored.

/// Index used when a material lookup finds nothing.
pub const SENTINEL: i32 = 999;

/// Group rank of the last-resort bucket in every category.
pub const UNMATCHED_GROUP: i32 = 99;

/// Wood species, matched as a prefix of the identifier.
pub const WOOD_ORDER: &[&str] = &[
    "oak", "spruce", "birch", "jungle", "acacia", "dark_oak", "mangrove", "cherry", "bamboo",
    "crimson", "warped",
];

/// Dye colors in creative-inventory order.
pub const COLOR_ORDER: &[&str] = &[
    "white", "orange", "magenta", "light_blue", "yellow", "lime", "pink", "gray", "light_gray",
    "cyan", "purple", "blue", "brown", "green", "red", "black",
];

pub const STAIRS_STONE_ORDER: &[&str] = &[
    "stone",
    "cobblestone",
    "andesite",
    "diorite",
    "granite",
    "polished_andesite",
    "polished_diorite",
    "polished_granite",
    "cobbled_deepslate",
    "polished_deepslate",
    "deepslate_brick",
    "deepslate_tile",
    "blackstone",
    "polished_blackstone",
    "polished_blackstone_brick",
    "brick",
    "end_stone_brick",
    "nether_brick",
    "red_nether_brick",
    "sandstone",
    "red_sandstone",
    "smooth_sandstone",
    "smooth_red_sandstone",
    "prismarine",
    "prismarine_brick",
    "dark_prismarine",
    "quartz",
    "smooth_quartz",
    "purpur",
    "mud_brick",
];

pub const SLAB_STONE_ORDER: &[&str] = &[
    "stone",
    "smooth_stone",
    "cobblestone",
    "andesite",
    "diorite",
    "granite",
    "polished_andesite",
    "polished_diorite",
    "polished_granite",
    "cobbled_deepslate",
    "polished_deepslate",
    "deepslate_brick",
    "deepslate_tile",
    "blackstone",
    "polished_blackstone",
    "polished_blackstone_brick",
    "brick",
    "end_stone_brick",
    "nether_brick",
    "sandstone",
    "cut_sandstone",
    "red_sandstone",
    "cut_red_sandstone",
    "smooth_sandstone",
    "smooth_red_sandstone",
    "prismarine",
    "prismarine_brick",
    "dark_prismarine",
    "quartz",
    "smooth_quartz",
    "purpur",
    "mud_brick",
];

pub const WALL_ORDER: &[&str] = &[
    "cobblestone",
    "mossy_cobblestone",
    "andesite",
    "diorite",
    "granite",
    "cobbled_deepslate",
    "polished_deepslate",
    "deepslate_brick",
    "deepslate_tile",
    "blackstone",
    "polished_blackstone",
    "polished_blackstone_brick",
    "brick",
    "end_stone_brick",
    "nether_brick",
    "red_nether_brick",
    "sandstone",
    "red_sandstone",
    "prismarine",
    "mud_brick",
    "stone_brick",
];

pub const BASIC_BASE: &[&str] = &["stone", "cobblestone", "terracotta"];

pub const STONE_VARIANTS: &[&str] = &[
    "andesite",
    "polished_andesite",
    "diorite",
    "polished_diorite",
    "granite",
    "polished_granite",
    "calcite",
    "tuff",
    "chiseled_deepslate",
    "cobbled_deepslate",
    "cracked_deepslate_bricks",
    "cracked_deepslate_tiles",
    "deepslate",
    "deepslate_bricks",
    "deepslate_tiles",
    "polished_deepslate",
    "basalt",
    "polished_basalt",
    "blackstone",
    "gilded_blackstone",
    "polished_blackstone",
    "polished_blackstone_bricks",
    "cracked_polished_blackstone_bricks",
];

pub const BRICK_BLOCKS: &[&str] = &[
    "bricks",
    "end_stone_bricks",
    "nether_bricks",
    "red_nether_bricks",
    "prismarine_bricks",
    "quartz_bricks",
    "stone_bricks",
    "mossy_stone_bricks",
    "cracked_stone_bricks",
    "chiseled_stone_bricks",
    "chiseled_nether_bricks",
    "cracked_nether_bricks",
    "mud_bricks",
];

pub const PRISMARINE_BLOCKS: &[&str] = &["prismarine", "prismarine_bricks", "dark_prismarine"];

pub const QUARTZ_BLOCKS: &[&str] = &[
    "quartz_block",
    "chiseled_quartz_block",
    "quartz_pillar",
    "quartz_bricks",
    "smooth_quartz",
];

pub const PURPUR_BLOCKS: &[&str] = &["purpur_block", "purpur_pillar"];

pub const SANDSTONE_BLOCKS: &[&str] = &[
    "sandstone",
    "chiseled_sandstone",
    "cut_sandstone",
    "smooth_sandstone",
    "red_sandstone",
    "chiseled_red_sandstone",
    "cut_red_sandstone",
    "smooth_red_sandstone",
];

// Lighting

pub const TORCHES: &[&str] = &["torch", "soul_torch"];
pub const GLOW_BLOCKS: &[&str] = &["glowstone", "sea_lantern", "shroomlight"];

/// Plain candle first, then the dyed candles.
pub const CANDLE_ORDER: &[&str] = &[
    "candle", "white", "orange", "magenta", "light_blue", "yellow", "lime", "pink", "gray",
    "light_gray", "cyan", "purple", "blue", "brown", "green", "red", "black",
];

// Decoration

pub const OTHER_DECORATION: &[&str] = &[
    "bookshelf",
    "budding_amethyst",
    "dripstone_block",
    "flower_pot",
    "item_frame",
    "moss_block",
    "painting",
    "smooth_basalt",
];

// Nature

pub const DIRT_TYPES: &[&str] = &[
    "dirt",
    "grass_block",
    "coarse_dirt",
    "podzol",
    "mycelium",
    "farmland",
    "mud",
    "rooted_dirt",
];

pub const SAND_TYPES: &[&str] = &["sand", "red_sand", "gravel", "soul_sand", "soul_soil"];

/// Matched as a substring, first hit wins.
pub const FLOWERS: &[&str] = &[
    "poppy",
    "dandelion",
    "blue_orchid",
    "allium",
    "oxeye_daisy",
    "cornflower",
    "lily_of_the_valley",
    "lilac",
    "rose_bush",
    "peony",
    "sunflower",
];

pub const ICE_ORDER: &[&str] = &[
    "ice",
    "packed_ice",
    "blue_ice",
    "snow",
    "snow_block",
    "powder_snow",
];

pub const PLANTS: &[&str] = &[
    "bamboo",
    "bamboo_block",
    "cactus",
    "sugar_cane",
    "kelp",
    "seagrass",
    "grass",
    "fern",
    "dead_bush",
    "vine",
    "twisting_vines",
    "weeping_vines",
    "glow_berries",
];

// Functional

pub const CRAFTING_BLOCKS: &[&str] = &[
    "crafting_table",
    "furnace",
    "blast_furnace",
    "smoker",
    "anvil",
    "grindstone",
    "stonecutter",
    "smithing_table",
    "cartography_table",
    "fletching_table",
    "loom",
    "brewing_stand",
    "enchanting_table",
];

pub const STORAGE_BLOCKS: &[&str] = &["chest", "barrel", "shulker_box", "hopper"];
pub const FUNCTIONAL_DOORS: &[&str] = &["iron_door", "oak_door"];
pub const FUNCTIONAL_TRAPDOORS: &[&str] = &["iron_trapdoor", "oak_trapdoor"];

pub const REDSTONE_COMPONENTS: &[&str] = &[
    "redstone_block",
    "redstone_torch",
    "comparator",
    "repeater",
    "observer",
    "lever",
    "target",
    "dispenser",
    "dropper",
];

/// Redstone-named identifiers that belong with ores, not components.
pub const REDSTONE_ORES: &[&str] = &["redstone_ore", "deepslate_redstone_ore"];

pub const PISTONS: &[&str] = &["piston", "sticky_piston"];
pub const RAILS: &[&str] = &["rail", "powered_rail", "detector_rail", "activator_rail"];

pub const FUNCTIONAL_SWITCHES: &[&str] = &[
    "oak_button",
    "stone_button",
    "oak_pressure_plate",
    "stone_pressure_plate",
];

// Ore

pub const ORE_ORDER: &[&str] = &[
    "coal", "iron", "copper", "gold", "lapis", "redstone", "diamond", "emerald", "quartz",
];

/// Mineral blocks without an ore, placed after the ore-backed ones.
pub const EXTRA_MINERAL_BLOCKS: &[&str] = &["netherite_block", "amethyst_block"];
pub const EXTRA_MINERAL_INDEX: i32 = 900;

pub const RAW_ORE_BLOCKS: &[&str] = &["raw_iron_block", "raw_copper_block", "raw_gold_block"];

// Special

pub const TECHNICAL_BLOCKS: &[&str] = &["air", "barrier", "structure_void", "light"];
pub const INDESTRUCTIBLE_BLOCKS: &[&str] = &["bedrock", "obsidian", "crying_obsidian"];
pub const SPONGES: &[&str] = &["sponge", "wet_sponge"];
pub const END_BLOCKS: &[&str] = &["end_portal", "end_portal_frame", "end_gateway", "end_rod"];
pub const NETHER_BASICS: &[&str] = &["netherrack", "magma_block"];
pub const SCULK_ORDER: &[&str] = &[
    "sculk",
    "sculk_vein",
    "sculk_sensor",
    "sculk_catalyst",
    "sculk_shrieker",
];

// Audit keywords

pub const LIGHT_KEYWORDS: &[&str] = &[
    "lantern",
    "torch",
    "lamp",
    "light",
    "glowstone",
    "sea_lantern",
    "shroomlight",
    "candle",
    "campfire",
    "fire",
    "jack_o_lantern",
];

pub const ORE_KEYWORDS: &[&str] = &["_ore", "raw_"];

/// Prefixes stripped when folding identifiers into variation families.
pub const VARIATION_PREFIXES: &[&str] = &[
    "stripped_",
    "waxed_",
    "vertical_",
    "polished_",
    "smooth_",
    "chiseled_",
    "cracked_",
    "mossy_",
    "infested_",
    "cut_",
];

/// Position of `needle` in `list`, if present.
pub fn position(list: &[&str], needle: &str) -> Option<i32> {
    list.iter().position(|item| *item == needle).map(|i| i as i32)
}

/// Wood species index by prefix, or [`SENTINEL`].
pub fn wood_index(value: &str) -> i32 {
    WOOD_ORDER
        .iter()
        .position(|wood| value.starts_with(wood))
        .map(|i| i as i32)
        .unwrap_or(SENTINEL)
}

/// True if any wood species occurs anywhere in the identifier.
pub fn mentions_wood(value: &str) -> bool {
    WOOD_ORDER.iter().any(|wood| value.contains(wood))
}

/// First list entry occurring as a substring of `value`.
pub fn first_substring(list: &[&str], value: &str) -> Option<i32> {
    list.iter()
        .position(|item| value.contains(item))
        .map(|i| i as i32)
}

/// Index of the color whose `{color}{suffix}` equals `value`.
pub fn color_with_suffix(value: &str, suffix: &str) -> Option<i32> {
    COLOR_ORDER
        .iter()
        .position(|color| value.strip_prefix(color) == Some(suffix))
        .map(|i| i as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wood_prefix_distinguishes_dark_oak() {
        assert_eq!(wood_index("oak_planks"), 0);
        assert_eq!(wood_index("dark_oak_planks"), 5);
        assert_eq!(wood_index("stone"), SENTINEL);
    }

    #[test]
    fn color_suffix_is_exact() {
        assert_eq!(color_with_suffix("light_gray_wool", "_wool"), Some(8));
        assert_eq!(color_with_suffix("gray_wool", "_wool"), Some(7));
        assert_eq!(color_with_suffix("gray_wool_slab", "_wool"), None);
    }

    #[test]
    fn first_substring_takes_earliest_list_entry() {
        // "stone" precedes "stone_brick" in the stairs list.
        assert_eq!(first_substring(STAIRS_STONE_ORDER, "stone_brick_stairs"), Some(0));
        assert_eq!(first_substring(WALL_ORDER, "unknownmaterial_wall"), None);
    }
}
