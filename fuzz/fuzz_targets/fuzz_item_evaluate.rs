//! Fuzz target for item evaluation and remediation.
//!
//! Goal: any item that deserializes can be evaluated and remediated without
//! panicking, and remediating twice gives the same item as remediating once.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_item_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use itemguard_domain::{Item, Remediator, RuleConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct EvalInput {
    item_json: String,
    fix: bool,
}

fuzz_target!(|input: EvalInput| {
    // Deep nesting is capped by the evaluator, but serde_json still recurses.
    if input.item_json.len() > 4096 {
        return;
    }
    let Ok(item) = serde_json::from_str::<Item>(&input.item_json) else {
        return;
    };

    let cfg = RuleConfig::default();
    let remediator = Remediator::default();
    let _ = remediator.evaluator().evaluate(Some(&item), &cfg);

    if input.fix {
        let once = remediator.remediate(&item, &cfg);
        let twice = remediator.remediate(&once, &cfg);
        assert_eq!(once, twice, "remediation is not idempotent");
    }
});
