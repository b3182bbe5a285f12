//! Mutually exclusive enchantments, per item category.

use crate::catalog::KindFamily;
use crate::model::{Enchantments, ItemKind, enchant_tag};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Item categories that carry conflict rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConflictCategory {
    Sword,
    Axe,
    Pickaxe,
    Shovel,
    Bow,
    Trident,
    Crossbow,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
}

impl ConflictCategory {
    pub const ALL: &'static [ConflictCategory] = &[
        ConflictCategory::Sword,
        ConflictCategory::Axe,
        ConflictCategory::Pickaxe,
        ConflictCategory::Shovel,
        ConflictCategory::Bow,
        ConflictCategory::Trident,
        ConflictCategory::Crossbow,
        ConflictCategory::Helmet,
        ConflictCategory::Chestplate,
        ConflictCategory::Leggings,
        ConflictCategory::Boots,
    ];

    pub fn for_kind(kind: &ItemKind) -> Option<Self> {
        let cat = match kind.family() {
            KindFamily::Sword => ConflictCategory::Sword,
            KindFamily::Axe => ConflictCategory::Axe,
            KindFamily::Pickaxe => ConflictCategory::Pickaxe,
            KindFamily::Shovel => ConflictCategory::Shovel,
            KindFamily::Bow => ConflictCategory::Bow,
            KindFamily::Trident => ConflictCategory::Trident,
            KindFamily::Crossbow => ConflictCategory::Crossbow,
            KindFamily::Helmet => ConflictCategory::Helmet,
            KindFamily::Chestplate => ConflictCategory::Chestplate,
            KindFamily::Leggings => ConflictCategory::Leggings,
            KindFamily::Boots => ConflictCategory::Boots,
            _ => return None,
        };
        Some(cat)
    }
}

const DAMAGE: &[&str] = &["sharpness", "smite", "bane_of_arthropods"];
const PROTECTION: &[&str] = &[
    "protection",
    "projectile_protection",
    "fire_protection",
    "blast_protection",
];

/// Fixed rule table: each entry is a set of tags that exclude one another.
fn rule_table() -> Vec<(ConflictCategory, &'static [&'static str])> {
    use ConflictCategory::*;
    vec![
        (Sword, DAMAGE),
        (Axe, DAMAGE),
        (Axe, &["fortune", "silk_touch"]),
        (Pickaxe, &["fortune", "silk_touch"]),
        (Shovel, &["fortune", "silk_touch"]),
        (Bow, &["infinity", "mending"]),
        (Trident, &["channeling", "riptide"]),
        (Trident, &["loyalty", "riptide"]),
        (Crossbow, &["multishot", "piercing"]),
        (Helmet, PROTECTION),
        (Chestplate, PROTECTION),
        (Leggings, PROTECTION),
        (Boots, PROTECTION),
        (Boots, &["depth_strider", "frost_walker"]),
    ]
}

/// Symmetric conflict graph, immutable after construction.
#[derive(Clone, Debug, Default)]
pub struct ConflictMatrix {
    edges: BTreeMap<ConflictCategory, BTreeMap<String, BTreeSet<String>>>,
}

impl ConflictMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Matrix built from the vanilla rule table.
    pub fn vanilla() -> Self {
        let mut m = Self::empty();
        for (category, group) in rule_table() {
            m.add_group(category, group);
        }
        m
    }

    /// Mark every pair in `tags` as conflicting.
    pub fn add_group(&mut self, category: ConflictCategory, tags: &[&str]) {
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                self.insert(category, a, b);
            }
        }
    }

    /// Insert `a <-> b`. Both directions are always recorded.
    pub fn insert(&mut self, category: ConflictCategory, a: &str, b: &str) {
        let (a, b) = (enchant_tag(a), enchant_tag(b));
        if a == b {
            return;
        }
        let by_tag = self.edges.entry(category).or_default();
        by_tag.entry(a.clone()).or_default().insert(b.clone());
        by_tag.entry(b).or_default().insert(a);
    }

    pub fn are_conflicting(&self, category: ConflictCategory, a: &str, b: &str) -> bool {
        let Some(by_tag) = self.edges.get(&category) else {
            return false;
        };
        let has = |x: &str, y: &str| by_tag.get(x).is_some_and(|s| s.contains(y));
        has(a, b) || has(b, a)
    }

    pub fn conflicts_of(&self, category: ConflictCategory, tag: &str) -> BTreeSet<String> {
        self.edges
            .get(&category)
            .and_then(|by_tag| by_tag.get(tag))
            .cloned()
            .unwrap_or_default()
    }

    /// Every `(category, a, b)` edge, including both directions.
    pub fn edges(&self) -> impl Iterator<Item = (ConflictCategory, &str, &str)> {
        self.edges.iter().flat_map(|(cat, by_tag)| {
            by_tag
                .iter()
                .flat_map(move |(a, set)| set.iter().map(move |b| (*cat, a.as_str(), b.as_str())))
        })
    }

    /// Groups of conflicting tags present together, in first-seen order.
    ///
    /// The first unclaimed tag claims itself plus every unclaimed tag it
    /// conflicts with; a tag appears in at most one group and only groups of
    /// two or more are returned.
    pub fn find_conflict_groups(
        &self,
        category: ConflictCategory,
        enchantments: &Enchantments,
    ) -> Vec<Vec<String>> {
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut groups = Vec::new();
        for tag in enchantments.tags() {
            if claimed.contains(tag) {
                continue;
            }
            let mut group = vec![tag];
            for other in enchantments.tags() {
                if other == tag || claimed.contains(other) {
                    continue;
                }
                if self.are_conflicting(category, tag, other) {
                    group.push(other);
                }
            }
            if group.len() > 1 {
                claimed.extend(group.iter().copied());
                groups.push(group.into_iter().map(str::to_string).collect());
            }
        }
        groups
    }

    /// Convenience: groups for an item kind, empty for kinds without rules.
    pub fn groups_for(&self, kind: &ItemKind, enchantments: &Enchantments) -> Vec<Vec<String>> {
        match ConflictCategory::for_kind(kind) {
            Some(cat) => self.find_conflict_groups(cat, enchantments),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enchants(tags: &[(&str, u32)]) -> Enchantments {
        tags.iter().copied().collect()
    }

    #[test]
    fn lookups_are_symmetric() {
        let m = ConflictMatrix::vanilla();
        assert!(m.are_conflicting(ConflictCategory::Bow, "infinity", "mending"));
        assert!(m.are_conflicting(ConflictCategory::Bow, "mending", "infinity"));
        assert!(!m.are_conflicting(ConflictCategory::Sword, "infinity", "mending"));
        assert!(m.conflicts_of(ConflictCategory::Trident, "riptide").contains("loyalty"));
    }

    #[test]
    fn one_way_insert_is_still_symmetric() {
        let mut m = ConflictMatrix::empty();
        m.insert(ConflictCategory::Sword, "a", "b");
        assert!(m.are_conflicting(ConflictCategory::Sword, "b", "a"));
        assert!(m.conflicts_of(ConflictCategory::Sword, "b").contains("a"));
    }

    #[test]
    fn groups_are_claimed_by_first_seen_tag() {
        let m = ConflictMatrix::vanilla();
        let e = enchants(&[("smite", 5), ("unbreaking", 3), ("sharpness", 5), ("bane_of_arthropods", 5)]);
        let groups = m.find_conflict_groups(ConflictCategory::Sword, &e);
        assert_eq!(
            groups,
            vec![vec![
                "smite".to_string(),
                "sharpness".to_string(),
                "bane_of_arthropods".to_string()
            ]]
        );
    }

    #[test]
    fn separate_groups_on_trident() {
        let m = ConflictMatrix::vanilla();
        let e = enchants(&[("channeling", 1), ("loyalty", 3), ("riptide", 3)]);
        // channeling claims riptide; loyalty's only partner is taken.
        let groups = m.find_conflict_groups(ConflictCategory::Trident, &e);
        assert_eq!(groups, vec![vec!["channeling".to_string(), "riptide".to_string()]]);
    }

    #[test]
    fn kinds_without_rules_have_no_groups() {
        let m = ConflictMatrix::vanilla();
        let e = enchants(&[("sharpness", 1), ("smite", 1)]);
        assert!(m.groups_for(&ItemKind::new("STONE"), &e).is_empty());
        assert_eq!(m.groups_for(&ItemKind::new("IRON_AXE"), &e).len(), 1);
    }
}
