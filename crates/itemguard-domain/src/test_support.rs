use crate::model::{
    AttributeGroup, AttributeModifier, AttributeOperation, ContainerData, Item, ItemMeta,
    KindData, PotionData, PotionEffect,
};
use crate::policy::{CheckPolicy, RuleConfig};
use crate::{Evaluator, Remediator};
use itemguard_types::{Severity, Violation, ViolationCode};

pub fn item(kind: &str) -> Item {
    Item::new(kind, 1)
}

pub fn with_meta(kind: &str, edit: impl FnOnce(&mut ItemMeta)) -> Item {
    let mut meta = ItemMeta::default();
    edit(&mut meta);
    Item::new(kind, 1).with_meta(meta)
}

pub fn enchanted(kind: &str, enchants: &[(&str, u32)]) -> Item {
    with_meta(kind, |m| {
        for (tag, level) in enchants {
            m.enchantments.insert(tag, *level);
        }
    })
}

pub fn potion(custom: Vec<PotionEffect>, base: Option<&str>) -> Item {
    with_meta("POTION", |m| {
        m.data = Some(KindData::Potion(PotionData {
            base: base.map(str::to_string),
            custom_effects: custom,
        }));
    })
}

pub fn container(kind: &str, items: Vec<Item>) -> Item {
    with_meta(kind, |m| m.data = Some(KindData::Container(ContainerData { items })))
}

pub fn attribute(attribute: &str, amounts: &[f64]) -> AttributeGroup {
    AttributeGroup {
        attribute: attribute.to_string(),
        modifiers: amounts
            .iter()
            .map(|amount| AttributeModifier {
                amount: *amount,
                operation: AttributeOperation::AddNumber,
                slot: None,
            })
            .collect(),
    }
}

/// Config with every check disabled except `check_id`.
pub fn config_with_check(check_id: &str, severity: Severity) -> RuleConfig {
    let mut cfg = RuleConfig::default();
    for (id, policy) in cfg.checks.iter_mut() {
        *policy = if id == check_id {
            CheckPolicy::enabled(severity)
        } else {
            CheckPolicy::disabled()
        };
    }
    cfg
}

pub fn evaluate(item: &Item, cfg: &RuleConfig) -> Vec<Violation> {
    Evaluator::default().evaluate(Some(item), cfg)
}

pub fn remediate(item: &Item, cfg: &RuleConfig) -> Item {
    Remediator::default().remediate(item, cfg)
}

pub fn codes(violations: &[Violation]) -> Vec<ViolationCode> {
    violations.iter().map(|v| v.code).collect()
}
