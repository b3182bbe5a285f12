//! Item model handed in by the host adapter.
//!
//! Everything here is plain data. Kind-specific payloads are a closed
//! [`KindData`] union; optional host probes are `Option` fields where `None`
//! means the host could not read the value.

use crate::catalog::{self, KindFamily};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upper-case item type identifier, e.g. `DIAMOND_SWORD`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ItemKind(String);

impl ItemKind {
    pub fn new(raw: &str) -> Self {
        Self(normalize_key(raw).to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn family(&self) -> KindFamily {
        catalog::family_of(&self.0)
    }
}

impl From<String> for ItemKind {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for ItemKind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ItemKind> for String {
    fn from(value: ItemKind) -> Self {
        value.0
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip whitespace and any `minecraft:` namespace.
pub fn normalize_key(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.get(..10) {
        Some(prefix) if prefix.eq_ignore_ascii_case("minecraft:") => &trimmed[10..],
        _ => trimmed,
    }
}

/// Enchantment tags are lower case (`sharpness`).
pub fn enchant_tag(raw: &str) -> String {
    normalize_key(raw).to_ascii_lowercase()
}

/// Effect and attribute keys are upper case (`SPEED`, `GENERIC_ATTACK_DAMAGE`).
pub fn upper_key(raw: &str) -> String {
    normalize_key(raw).to_ascii_uppercase()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ItemMeta>,
}

fn default_amount() -> u32 {
    1
}

impl Item {
    pub fn new(kind: impl Into<ItemKind>, amount: u32) -> Self {
        Self {
            kind: kind.into(),
            amount,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ItemMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// The same kind and amount, carrying only display name and lore.
    pub fn clean_copy(&self) -> Item {
        let meta = self.meta.as_ref().and_then(|m| {
            if m.display_name.is_none() && m.lore.is_none() {
                return None;
            }
            Some(ItemMeta {
                display_name: m.display_name.clone(),
                lore: m.lore.clone(),
                ..ItemMeta::default()
            })
        });
        Item {
            kind: self.kind.clone(),
            amount: self.amount,
            meta,
        }
    }

    pub fn enchantments(&self) -> Option<&Enchantments> {
        self.meta
            .as_ref()
            .map(|m| &m.enchantments)
            .filter(|e| !e.is_empty())
    }

    pub fn data(&self) -> Option<&KindData> {
        self.meta.as_ref().and_then(|m| m.data.as_ref())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.display_name.as_deref())
    }

    /// Contents of a container or bundle, in slot order.
    pub fn contents(&self) -> Option<&[Item]> {
        match self.data()? {
            KindData::Container(c) | KindData::Bundle(c) => Some(&c.items),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Enchantments::is_empty")]
    pub enchantments: Enchantments,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_modifiers: Vec<AttributeGroup>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unbreakable: bool,
    /// Enchantment glint override as reported by the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glint: Option<bool>,
    /// Opaque plugin-persisted data container.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub persistent_data: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<KindData>,
}

impl ItemMeta {
    pub fn attribute_count(&self) -> usize {
        self.attribute_modifiers
            .iter()
            .map(|g| g.modifiers.len())
            .sum()
    }
}

/// Ordered enchantment map with unique tags.
///
/// Serialized as a list of `[tag, level]` pairs so insertion order survives
/// the round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, u32)>", into = "Vec<(String, u32)>")]
pub struct Enchantments(Vec<(String, u32)>);

impl Enchantments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced tag keeps its original position.
    pub fn insert(&mut self, tag: &str, level: u32) {
        let tag = enchant_tag(tag);
        match self.0.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = level,
            None => self.0.push((tag, level)),
        }
    }

    pub fn remove(&mut self, tag: &str) -> Option<u32> {
        let tag = enchant_tag(tag);
        let pos = self.0.iter().position(|(t, _)| *t == tag)?;
        Some(self.0.remove(pos).1)
    }

    pub fn get(&self, tag: &str) -> Option<u32> {
        let tag = enchant_tag(tag);
        self.0.iter().find(|(t, _)| *t == tag).map(|(_, l)| *l)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(t, l)| (t.as_str(), *l))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(t, _)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_level(&self) -> u64 {
        self.0.iter().map(|(_, l)| u64::from(*l)).sum()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, u32) -> bool) {
        self.0.retain(|(t, l)| keep(t, *l));
    }
}

impl From<Vec<(String, u32)>> for Enchantments {
    fn from(pairs: Vec<(String, u32)>) -> Self {
        let mut out = Enchantments::new();
        for (tag, level) in pairs {
            out.insert(&tag, level);
        }
        out
    }
}

impl From<Enchantments> for Vec<(String, u32)> {
    fn from(value: Enchantments) -> Self {
        value.0
    }
}

impl<'a> FromIterator<(&'a str, u32)> for Enchantments {
    fn from_iter<T: IntoIterator<Item = (&'a str, u32)>>(iter: T) -> Self {
        let mut out = Enchantments::new();
        for (tag, level) in iter {
            out.insert(tag, level);
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeGroup {
    pub attribute: String,
    #[serde(default)]
    pub modifiers: Vec<AttributeModifier>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub amount: f64,
    #[serde(default)]
    pub operation: AttributeOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeOperation {
    #[default]
    AddNumber,
    AddScalar,
    MultiplyScalar1,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionEffect {
    pub effect: String,
    #[serde(default)]
    pub amplifier: u32,
    #[serde(default)]
    pub duration_ticks: u32,
}

impl PotionEffect {
    pub fn new(effect: &str, amplifier: u32, duration_ticks: u32) -> Self {
        Self {
            effect: upper_key(effect),
            amplifier,
            duration_ticks,
        }
    }
}

/// Kind-specific payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KindData {
    Book(BookData),
    Potion(PotionData),
    SpawnEgg(SpawnEggData),
    Firework(FireworkData),
    Bundle(ContainerData),
    Container(ContainerData),
    Map(MapData),
    EnchantmentStorage(StoredEnchantments),
    Piston(BlockStateData),
    KnowledgeBook(RecipeData),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookData {
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionData {
    /// Base potion type, e.g. `STRONG_SWIFTNESS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub custom_effects: Vec<PotionEffect>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnEggData {
    /// Entity type the egg reports it will spawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned_type: Option<String>,
    /// Captured entity snapshot, if the host exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_snapshot: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireworkData {
    #[serde(default)]
    pub power: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerData {
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    /// Backing map view id; `None` means no view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_id: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEnchantments {
    #[serde(default)]
    pub stored: Enchantments,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStateData {
    #[serde(default)]
    pub extended: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeData {
    #[serde(default)]
    pub recipes: Vec<String>,
}
