use super::utils::violation;
use crate::catalog::KindFamily;
use crate::engine::Ctx;
use crate::model::{Item, KindData};
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

/// Missing or hollow kind payloads. Any of these means the item is replaced
/// by a blank of its family.
pub(crate) fn payload_faults(item: &Item) -> Vec<ViolationCode> {
    let family = item.kind.family();
    let Some(meta) = &item.meta else {
        return match family {
            KindFamily::WrittenBook | KindFamily::EnchantedBook | KindFamily::FilledMap => {
                vec![ViolationCode::MissingItemData]
            }
            _ => Vec::new(),
        };
    };

    let mut faults = Vec::new();
    match (family, &meta.data) {
        (KindFamily::WrittenBook, Some(KindData::Book(book))) => {
            if book.pages.is_empty() {
                faults.push(ViolationCode::EmptyBook);
            }
            if book.title.is_none() || book.author.is_none() {
                faults.push(ViolationCode::UnsignedBook);
            }
        }
        (KindFamily::WrittenBook, _) => faults.push(ViolationCode::EmptyBook),
        (KindFamily::EnchantedBook, Some(KindData::EnchantmentStorage(s))) if !s.stored.is_empty() => {}
        (KindFamily::EnchantedBook, _) => faults.push(ViolationCode::EmptyEnchantmentStorage),
        (KindFamily::FilledMap, Some(KindData::Map(map))) if map.map_id.is_some() => {}
        (KindFamily::FilledMap, _) => faults.push(ViolationCode::EmptyMap),
        (KindFamily::KnowledgeBook, Some(KindData::KnowledgeBook(r))) if !r.recipes.is_empty() => {}
        (KindFamily::KnowledgeBook, _) => faults.push(ViolationCode::EmptyKnowledgeBook),
        _ => {}
    }
    faults
}

/// Glint forced on with nothing to back it.
pub(crate) fn has_stray_glint(item: &Item) -> bool {
    let Some(meta) = &item.meta else { return false };
    if meta.glint != Some(true) {
        return false;
    }
    if item.kind.family() == KindFamily::EnchantedBook {
        return !matches!(&meta.data, Some(KindData::EnchantmentStorage(s)) if !s.stored.is_empty());
    }
    meta.enchantments.is_empty()
}

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_EMPTY_DATA) else {
        return;
    };

    for code in payload_faults(item) {
        let message = match code {
            ViolationCode::MissingItemData => format!("{} has no item data", item.kind),
            ViolationCode::EmptyBook => "book has no pages".to_string(),
            ViolationCode::UnsignedBook => "written book is missing title or author".to_string(),
            ViolationCode::EmptyEnchantmentStorage => "empty enchantment book".to_string(),
            ViolationCode::EmptyMap => "map has no backing view".to_string(),
            _ => "knowledge book has no recipes".to_string(),
        };
        out.push(violation(policy, code, message, json!({ "kind": item.kind.as_str() })));
    }

    if has_stray_glint(item) {
        out.push(violation(
            policy,
            ViolationCode::GlintWithoutEnchantments,
            format!("{} shows enchantment glint without enchantments", item.kind),
            json!({ "kind": item.kind.as_str() }),
        ));
    }
}
