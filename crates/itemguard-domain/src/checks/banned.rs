use super::utils::{first_keyword, violation};
use crate::engine::Ctx;
use crate::model::Item;
use itemguard_types::{Violation, ViolationCode, ids};
use serde_json::json;

pub fn run(item: &Item, ctx: &Ctx<'_>, out: &mut Vec<Violation>) {
    let Some(policy) = ctx.cfg.check_policy(ids::CHECK_ITEMS_BANNED) else {
        return;
    };
    let rules = &ctx.cfg.banned;

    if rules.is_banned(&item.kind) {
        out.push(violation(
            policy,
            ViolationCode::BannedKind,
            format!("banned item kind: {}", item.kind),
            json!({ "kind": item.kind.as_str() }),
        ));
    }

    let Some(meta) = &item.meta else { return };

    if let Some(name) = &meta.display_name
        && let Some(keyword) = first_keyword(name, &rules.name_keywords)
    {
        out.push(violation(
            policy,
            ViolationCode::BannedName,
            format!("display name contains banned keyword: {keyword}"),
            json!({ "keyword": keyword }),
        ));
    }

    for (line_no, line) in meta.lore.iter().flatten().enumerate() {
        if let Some(keyword) = first_keyword(line, &rules.lore_keywords) {
            out.push(violation(
                policy,
                ViolationCode::BannedLore,
                format!("lore line {} contains banned keyword: {keyword}", line_no + 1),
                json!({ "keyword": keyword, "line": line_no }),
            ));
        }
    }
}
