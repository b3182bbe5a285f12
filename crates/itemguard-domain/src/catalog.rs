//! Static vanilla game data consulted by the rules.

use crate::model::PotionEffect;

/// Closed classification of item kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindFamily {
    Sword,
    Axe,
    Pickaxe,
    Shovel,
    Hoe,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    Elytra,
    Bow,
    Crossbow,
    Trident,
    Mace,
    FishingRod,
    Shears,
    Shield,
    /// Flint and steel, fungus/carrot sticks, brush.
    Durable,
    /// Heads and carved pumpkins.
    Wearable,
    Compass,
    Potion,
    TippedArrow,
    SpawnEgg,
    FireworkRocket,
    Piston,
    Container,
    Bundle,
    WrittenBook,
    WritableBook,
    EnchantedBook,
    Book,
    FilledMap,
    Map,
    KnowledgeBook,
    ItemFrame,
    ArmorStand,
    /// Known kind without kind-specific rules (blocks, materials, food...).
    Plain,
    Unknown,
}

impl KindFamily {
    pub fn is_armor(self) -> bool {
        matches!(
            self,
            KindFamily::Helmet | KindFamily::Chestplate | KindFamily::Leggings | KindFamily::Boots
        )
    }

    pub fn is_damageable(self) -> bool {
        use KindFamily::*;
        self.is_armor()
            || matches!(
                self,
                Sword
                    | Axe
                    | Pickaxe
                    | Shovel
                    | Hoe
                    | Elytra
                    | Bow
                    | Crossbow
                    | Trident
                    | Mace
                    | FishingRod
                    | Shears
                    | Shield
                    | Durable
            )
    }

    pub fn is_potion_like(self) -> bool {
        matches!(self, KindFamily::Potion | KindFamily::TippedArrow)
    }

    pub fn holds_items(self) -> bool {
        matches!(self, KindFamily::Container | KindFamily::Bundle)
    }
}

pub fn family_of(kind: &str) -> KindFamily {
    use KindFamily::*;
    match kind {
        "" => return Unknown,
        "TURTLE_HELMET" => return Helmet,
        "ELYTRA" => return Elytra,
        "BOW" => return Bow,
        "CROSSBOW" => return Crossbow,
        "TRIDENT" => return Trident,
        "MACE" => return Mace,
        "FISHING_ROD" => return FishingRod,
        "SHEARS" => return Shears,
        "SHIELD" => return Shield,
        "FLINT_AND_STEEL" | "CARROT_ON_A_STICK" | "WARPED_FUNGUS_ON_A_STICK" | "BRUSH" => {
            return Durable;
        }
        "CARVED_PUMPKIN" => return Wearable,
        "COMPASS" | "RECOVERY_COMPASS" => return Compass,
        "POTION" | "SPLASH_POTION" | "LINGERING_POTION" => return Potion,
        "TIPPED_ARROW" => return TippedArrow,
        "FIREWORK_ROCKET" => return FireworkRocket,
        "PISTON" | "STICKY_PISTON" => return Piston,
        "BUNDLE" => return Bundle,
        "WRITTEN_BOOK" => return WrittenBook,
        "WRITABLE_BOOK" => return WritableBook,
        "ENCHANTED_BOOK" => return EnchantedBook,
        "BOOK" => return Book,
        "FILLED_MAP" => return FilledMap,
        "MAP" => return Map,
        "KNOWLEDGE_BOOK" => return KnowledgeBook,
        "ITEM_FRAME" | "GLOW_ITEM_FRAME" => return ItemFrame,
        "ARMOR_STAND" => return ArmorStand,
        _ => {}
    }
    if !kind.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_') {
        return Unknown;
    }
    if container_capacity(kind).is_some() {
        return Container;
    }
    if kind.ends_with("_BUNDLE") {
        return Bundle;
    }
    if kind.ends_with("_SPAWN_EGG") {
        return SpawnEgg;
    }
    if kind.ends_with("_SWORD") {
        Sword
    } else if kind.ends_with("_PICKAXE") {
        Pickaxe
    } else if kind.ends_with("_AXE") {
        Axe
    } else if kind.ends_with("_SHOVEL") {
        Shovel
    } else if kind.ends_with("_HOE") {
        Hoe
    } else if kind.ends_with("_HELMET") {
        Helmet
    } else if kind.ends_with("_CHESTPLATE") {
        Chestplate
    } else if kind.ends_with("_LEGGINGS") {
        Leggings
    } else if kind.ends_with("_BOOTS") {
        Boots
    } else if kind.ends_with("_HEAD") || kind.ends_with("_SKULL") {
        Wearable
    } else if is_plain(kind) {
        Plain
    } else {
        Unknown
    }
}

const PLAIN_KINDS: &[&str] = &[
    "AIR", "STONE", "GRANITE", "DIORITE", "ANDESITE", "DEEPSLATE", "COBBLESTONE", "DIRT",
    "GRASS_BLOCK", "SAND", "RED_SAND", "GRAVEL", "CLAY", "CLAY_BALL", "OBSIDIAN",
    "CRYING_OBSIDIAN", "BEDROCK", "NETHERRACK", "END_STONE", "GLOWSTONE", "SEA_LANTERN",
    "TORCH", "SOUL_TORCH", "LANTERN", "SOUL_LANTERN", "LIGHT", "BARRIER", "STRUCTURE_VOID",
    "STRUCTURE_BLOCK", "JIGSAW", "SPAWNER", "TRIAL_SPAWNER", "VAULT", "COMMAND_BLOCK",
    "CHAIN_COMMAND_BLOCK", "REPEATING_COMMAND_BLOCK", "COMMAND_BLOCK_MINECART", "DEBUG_STICK",
    "TNT", "TNT_MINECART", "END_CRYSTAL", "DRAGON_EGG", "BEACON", "CONDUIT", "ANVIL",
    "CHIPPED_ANVIL", "DAMAGED_ANVIL", "ENCHANTING_TABLE", "CRAFTING_TABLE", "ENDER_CHEST",
    "STICK", "STRING", "FEATHER", "GUNPOWDER", "LEATHER", "PAPER", "SUGAR", "BONE", "ARROW",
    "SPECTRAL_ARROW", "SNOWBALL", "EGG", "ENDER_PEARL", "ENDER_EYE", "BLAZE_ROD",
    "BLAZE_POWDER", "SLIME_BALL", "MAGMA_CREAM", "GHAST_TEAR", "NETHER_STAR", "TOTEM_OF_UNDYING",
    "EXPERIENCE_BOTTLE", "FIRE_CHARGE", "WIND_CHARGE", "DIAMOND", "EMERALD", "COAL",
    "CHARCOAL", "REDSTONE", "LAPIS_LAZULI", "QUARTZ", "AMETHYST_SHARD", "NETHERITE_SCRAP",
    "FLINT", "GLASS_BOTTLE", "HONEY_BOTTLE", "BREAD", "APPLE", "GOLDEN_APPLE",
    "ENCHANTED_GOLDEN_APPLE", "GOLDEN_CARROT", "CARROT", "POTATO", "BAKED_POTATO", "COOKIE",
    "CAKE", "PUMPKIN", "MELON", "MELON_SLICE", "WHEAT", "WHEAT_SEEDS", "NAME_TAG", "LEAD",
    "SADDLE", "CLOCK", "SPYGLASS", "FIREWORK_STAR", "ELYTRA_WING", "HEART_OF_THE_SEA",
    "NAUTILUS_SHELL", "SCUTE", "ARMADILLO_SCUTE", "TURTLE_SCUTE", "ECHO_SHARD",
    "TRIAL_KEY", "OMINOUS_TRIAL_KEY", "OMINOUS_BOTTLE", "HEAVY_CORE", "BREEZE_ROD", "SHULKER_SHELL",
];

const PLAIN_SUFFIXES: &[&str] = &[
    "_PLANKS", "_LOG", "_WOOD", "_STEM", "_HYPHAE", "_LEAVES", "_SAPLING", "_WOOL", "_CARPET",
    "_BED", "_BANNER", "_DYE", "_ORE", "_INGOT", "_NUGGET", "_BLOCK", "_SLAB", "_STAIRS",
    "_WALL", "_FENCE", "_FENCE_GATE", "_DOOR", "_TRAPDOOR", "_BUTTON", "_PRESSURE_PLATE",
    "_SIGN", "_HANGING_SIGN", "_BOAT", "_CHEST_BOAT", "_RAFT", "_BUCKET", "_MINECART",
    "_CONCRETE", "_CONCRETE_POWDER", "_TERRACOTTA", "_GLAZED_TERRACOTTA", "_GLASS",
    "_GLASS_PANE", "_CANDLE", "_BRICKS", "_TILES", "_TULIP", "_MUSHROOM", "_CORAL",
    "_CORAL_FAN", "_HORSE_ARMOR", "_MUSIC_DISC", "_POTTERY_SHERD", "_SMITHING_TEMPLATE",
    "_BANNER_PATTERN", "_RAIL",
];

fn is_plain(kind: &str) -> bool {
    PLAIN_KINDS.contains(&kind)
        || kind.starts_with("MUSIC_DISC_")
        || PLAIN_SUFFIXES.iter().any(|s| kind.ends_with(s))
}

/// Slot capacity of container kinds that keep their contents as an item.
pub fn container_capacity(kind: &str) -> Option<usize> {
    let cap = match kind {
        "CHEST" | "TRAPPED_CHEST" | "BARREL" => 27,
        "DISPENSER" | "DROPPER" | "CRAFTER" => 9,
        "HOPPER" | "BREWING_STAND" => 5,
        "FURNACE" | "BLAST_FURNACE" | "SMOKER" => 3,
        "CHISELED_BOOKSHELF" => 6,
        "LECTERN" | "JUKEBOX" | "DECORATED_POT" => 1,
        k if k.ends_with("SHULKER_BOX") => 27,
        _ => return None,
    };
    Some(cap)
}

/// Entry cap for bundles.
pub const BUNDLE_CAPACITY: usize = 64;

pub fn capacity_of(kind: &str, family: KindFamily) -> Option<usize> {
    match family {
        KindFamily::Bundle => Some(BUNDLE_CAPACITY),
        KindFamily::Container => container_capacity(kind),
        _ => None,
    }
}

/// Entity a spawn egg kind implies, e.g. `ZOMBIE_SPAWN_EGG` -> `ZOMBIE`.
pub fn spawn_egg_entity(kind: &str) -> Option<&str> {
    kind.strip_suffix("_SPAWN_EGG").filter(|e| !e.is_empty())
}

/// Kinds whose placed entity can carry tampered data (invisible frames,
/// posed armor stands).
pub fn is_entity_item(family: KindFamily) -> bool {
    matches!(family, KindFamily::ItemFrame | KindFamily::ArmorStand)
}

/// Blank replacement for an empty-data kind.
pub fn blank_replacement(family: KindFamily) -> Option<&'static str> {
    match family {
        KindFamily::WrittenBook => Some("WRITABLE_BOOK"),
        KindFamily::EnchantedBook | KindFamily::KnowledgeBook => Some("BOOK"),
        KindFamily::FilledMap => Some("MAP"),
        _ => None,
    }
}

/// Vanilla maximum level; `None` for tags the catalog does not know.
pub fn vanilla_max_level(tag: &str) -> Option<u32> {
    let max = match tag {
        "protection" | "fire_protection" | "blast_protection" | "projectile_protection"
        | "feather_falling" | "piercing" | "breach" => 4,
        "respiration" | "thorns" | "depth_strider" | "soul_speed" | "swift_sneak" | "looting"
        | "sweeping_edge" | "sweeping" | "unbreaking" | "fortune" | "luck_of_the_sea" | "lure"
        | "loyalty" | "riptide" | "quick_charge" | "wind_burst" => 3,
        "frost_walker" | "knockback" | "fire_aspect" | "punch" => 2,
        "sharpness" | "smite" | "bane_of_arthropods" | "efficiency" | "power" | "impaling"
        | "density" => 5,
        "aqua_affinity" | "binding_curse" | "silk_touch" | "flame" | "infinity" | "channeling"
        | "multishot" | "mending" | "vanishing_curse" => 1,
        _ => return None,
    };
    Some(max)
}

/// Whether a clean item of `family` can legitimately carry `tag`.
///
/// Returns `None` when the answer is unknowable (unknown kind or tag).
pub fn can_enchant(tag: &str, family: KindFamily) -> Option<bool> {
    use KindFamily::*;
    if family == Unknown || vanilla_max_level(tag).is_none() {
        return None;
    }
    if family == EnchantedBook {
        return Some(true);
    }
    let ok = match tag {
        "protection" | "fire_protection" | "blast_protection" | "projectile_protection"
        | "thorns" => family.is_armor(),
        "respiration" | "aqua_affinity" => family == Helmet,
        "feather_falling" | "depth_strider" | "frost_walker" | "soul_speed" => family == Boots,
        "swift_sneak" => family == Leggings,
        "sharpness" => matches!(family, Sword | Axe),
        "smite" | "bane_of_arthropods" => matches!(family, Sword | Axe | Mace),
        "knockback" | "looting" | "sweeping_edge" | "sweeping" => family == Sword,
        "fire_aspect" => matches!(family, Sword | Mace),
        "efficiency" => matches!(family, Pickaxe | Shovel | Axe | Hoe | Shears),
        "silk_touch" | "fortune" => matches!(family, Pickaxe | Shovel | Axe | Hoe),
        "power" | "punch" | "flame" | "infinity" => family == Bow,
        "multishot" | "piercing" | "quick_charge" => family == Crossbow,
        "loyalty" | "impaling" | "riptide" | "channeling" => family == Trident,
        "luck_of_the_sea" | "lure" => family == FishingRod,
        "density" | "breach" | "wind_burst" => family == Mace,
        "unbreaking" | "mending" => family.is_damageable(),
        "binding_curse" => family.is_armor() || matches!(family, Elytra | Wearable),
        "vanishing_curse" => family.is_damageable() || matches!(family, Wearable | Compass),
        _ => false,
    };
    Some(ok)
}

/// Effects conferred by a base potion type, as (effect, amplifier, ticks).
pub fn base_potion_effects(base: &str) -> Vec<PotionEffect> {
    let (strong, long, name) = if let Some(n) = base.strip_prefix("STRONG_") {
        (true, false, n)
    } else if let Some(n) = base.strip_prefix("LONG_") {
        (false, true, n)
    } else {
        (false, false, base)
    };
    let pick = |normal: u32, extended: u32, strong_ticks: u32| {
        if strong {
            strong_ticks
        } else if long {
            extended
        } else {
            normal
        }
    };
    let amp = u32::from(strong);
    let effects: Vec<(&str, u32, u32)> = match name {
        "SWIFTNESS" => vec![("SPEED", amp, pick(3600, 9600, 1800))],
        "SLOWNESS" => vec![("SLOWNESS", if strong { 3 } else { 0 }, pick(1800, 4800, 400))],
        "LEAPING" => vec![("JUMP_BOOST", amp, pick(3600, 9600, 1800))],
        "STRENGTH" => vec![("STRENGTH", amp, pick(3600, 9600, 1800))],
        "HEALING" => vec![("INSTANT_HEALTH", amp, 1)],
        "HARMING" => vec![("INSTANT_DAMAGE", amp, 1)],
        "POISON" => vec![("POISON", amp, pick(900, 1800, 432))],
        "REGENERATION" => vec![("REGENERATION", amp, pick(900, 1800, 450))],
        "FIRE_RESISTANCE" => vec![("FIRE_RESISTANCE", 0, pick(3600, 9600, 3600))],
        "WATER_BREATHING" => vec![("WATER_BREATHING", 0, pick(3600, 9600, 3600))],
        "NIGHT_VISION" => vec![("NIGHT_VISION", 0, pick(3600, 9600, 3600))],
        "INVISIBILITY" => vec![("INVISIBILITY", 0, pick(3600, 9600, 3600))],
        "WEAKNESS" => vec![("WEAKNESS", 0, pick(1800, 4800, 1800))],
        "SLOW_FALLING" => vec![("SLOW_FALLING", 0, pick(1800, 4800, 1800))],
        "LUCK" => vec![("LUCK", 0, 6000)],
        "TURTLE_MASTER" => vec![
            ("SLOWNESS", if strong { 5 } else { 3 }, pick(400, 800, 400)),
            ("RESISTANCE", if strong { 3 } else { 2 }, pick(400, 800, 400)),
        ],
        "WIND_CHARGED" => vec![("WIND_CHARGED", 0, 3600)],
        "WEAVING" => vec![("WEAVING", 0, 3600)],
        "OOZING" => vec![("OOZING", 0, 3600)],
        "INFESTED" => vec![("INFESTED", 0, 3600)],
        _ => Vec::new(),
    };
    effects
        .into_iter()
        .map(|(e, a, d)| PotionEffect::new(e, a, d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_classified_by_suffix() {
        assert_eq!(family_of("DIAMOND_SWORD"), KindFamily::Sword);
        assert_eq!(family_of("NETHERITE_PICKAXE"), KindFamily::Pickaxe);
        assert_eq!(family_of("IRON_AXE"), KindFamily::Axe);
        assert_eq!(family_of("TURTLE_HELMET"), KindFamily::Helmet);
        assert_eq!(family_of("RED_SHULKER_BOX"), KindFamily::Container);
        assert_eq!(family_of("ALLAY_SPAWN_EGG"), KindFamily::SpawnEgg);
        assert_eq!(family_of("OAK_PLANKS"), KindFamily::Plain);
        assert_eq!(family_of("FROBNICATOR"), KindFamily::Unknown);
        assert_eq!(family_of("bad kind"), KindFamily::Unknown);
    }

    #[test]
    fn legality_follows_reference_items() {
        assert_eq!(can_enchant("sharpness", KindFamily::Sword), Some(true));
        assert_eq!(can_enchant("sharpness", KindFamily::Pickaxe), Some(false));
        assert_eq!(can_enchant("sharpness", KindFamily::Plain), Some(false));
        assert_eq!(can_enchant("mending", KindFamily::Elytra), Some(true));
        assert_eq!(can_enchant("sharpness", KindFamily::EnchantedBook), Some(true));
        assert_eq!(can_enchant("sharpness", KindFamily::Unknown), None);
        assert_eq!(can_enchant("custom_plugin_enchant", KindFamily::Sword), None);
    }

    #[test]
    fn strong_potions_raise_amplifier() {
        let effects = base_potion_effects("STRONG_SWIFTNESS");
        assert_eq!(effects, vec![PotionEffect::new("SPEED", 1, 1800)]);
        assert!(base_potion_effects("WATER").is_empty());
    }

    #[test]
    fn spawn_egg_entity_is_the_prefix() {
        assert_eq!(spawn_egg_entity("MOOSHROOM_SPAWN_EGG"), Some("MOOSHROOM"));
        assert_eq!(spawn_egg_entity("_SPAWN_EGG"), None);
    }
}
