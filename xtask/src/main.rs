//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use itemguard_test_util::normalize_nondeterministic;
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(itemguard_settings::ItemguardConfigV1)
}

fn generate_exemptions_schema() -> schemars::Schema {
    schema_for!(itemguard_types::ExemptionFileV1)
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(itemguard_types::ReportEnvelope)
}

const CONFIG_SCHEMA: &str = "itemguard.config.v1.json";
const EXEMPTIONS_SCHEMA: &str = "itemguard.exemptions.v1.json";
const REPORT_SCHEMA: &str = "itemguard.report.v1.json";

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: CONFIG_SCHEMA,
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: EXEMPTIONS_SCHEMA,
            generate: generate_exemptions_schema,
        },
        SchemaSpec {
            filename: REPORT_SCHEMA,
            generate: generate_report_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Fails when schemas/ is missing a file or differs from what the types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Compile a generated schema for validation.
fn compile(generate: fn() -> schemars::Schema) -> anyhow::Result<jsonschema::Validator> {
    let value = serde_json::to_value(generate()).context("Failed to convert schema to JSON")?;
    jsonschema::validator_for(&value).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

/// Lowercase snake_case token, as used for violation codes.
fn is_valid_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Checks beyond the schema: known codes and a gapless leaderboard.
fn report_hygiene(name: &str, report: &Value, errors: &mut Vec<String>) {
    let body = &report["body"];

    if let Some(recent) = body.get("recent").and_then(Value::as_array) {
        for (i, entry) in recent.iter().enumerate() {
            let codes = entry.get("codes").and_then(Value::as_array);
            for code in codes.into_iter().flatten().filter_map(Value::as_str) {
                if !is_valid_token(code)
                    || code.parse::<itemguard_types::ViolationCode>().is_err()
                {
                    errors.push(format!("{name}: recent[{i}] has unknown code '{code}'"));
                }
            }
        }
    }

    if let Some(board) = body.get("leaderboard").and_then(Value::as_array) {
        for (i, entry) in board.iter().enumerate() {
            let rank = entry.get("rank").and_then(Value::as_u64);
            if rank != Some(i as u64 + 1) {
                errors.push(format!(
                    "{name}: leaderboard[{i}].rank is {rank:?}, expected {}",
                    i + 1
                ));
            }
        }
    }

    if let (Some(id), Some(kind)) = (
        report.get("id").and_then(Value::as_str),
        body.get("kind").and_then(Value::as_str),
    ) && !id.starts_with(&format!("{kind}_"))
    {
        errors.push(format!("{name}: id '{id}' does not start with '{kind}_'"));
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn fixture_cases() -> anyhow::Result<Vec<PathBuf>> {
    let dir = fixtures_dir()?;
    let mut cases = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            cases.push(path);
        }
    }
    cases.sort();
    Ok(cases)
}

fn case_name(case: &Path) -> String {
    case.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Validate fixture configs, exemption files and golden reports against the schemas.
fn conform() -> anyhow::Result<()> {
    let config_schema = compile(generate_config_schema)?;
    let exemptions_schema = compile(generate_exemptions_schema)?;
    let report_schema = compile(generate_report_schema)?;
    println!("✓ schemas compile");

    let mut checked = 0;
    let mut errors = Vec::new();

    for case in fixture_cases()? {
        let name = case_name(&case);

        let config_path = case.join("itemguard.toml");
        if config_path.exists() {
            let text = fs::read_to_string(&config_path)?;
            match toml::from_str::<toml::Value>(&text) {
                Ok(doc) => {
                    let value = serde_json::to_value(doc)?;
                    for err in config_schema.iter_errors(&value) {
                        errors.push(format!("{name}/itemguard.toml: {err}"));
                    }
                }
                Err(e) => errors.push(format!("{name}/itemguard.toml: {e}")),
            }
            checked += 1;
        }

        let exemptions_path = case.join("exemptions.json");
        if exemptions_path.exists() {
            let value = read_json(&exemptions_path)?;
            for err in exemptions_schema.iter_errors(&value) {
                errors.push(format!("{name}/exemptions.json: {err}"));
            }
            checked += 1;
        }

        for entry in fs::read_dir(&case)? {
            let path = entry?.path();
            let file = case_name(&path);
            if !(file.starts_with("expected.") && file.ends_with("-report.json")) {
                continue;
            }
            let label = format!("{name}/{file}");
            let value = read_json(&path)?;
            for err in report_schema.iter_errors(&value) {
                errors.push(format!("{label}: {err}"));
            }
            report_hygiene(&label, &value, &mut errors);
            checked += 1;
        }

        println!("  ✓ {name}");
    }

    if checked == 0 {
        bail!("No fixture files found in {}", fixtures_dir()?.display());
    }
    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {checked} fixture files pass conformance checks!");
    Ok(())
}

/// `conform` plus: run the built binary over every fixture with a world
/// snapshot and compare its saved reports to the golden files.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: itemguard scan output ---\n");

    let report_schema = compile(generate_report_schema)?;
    let bin = project_root()?.join("target").join("debug").join("itemguard");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "itemguard binary not found at {}.\n\
            Run `cargo build -p itemguard-cli` first.",
            bin.display()
        );
    }

    let mut errors = Vec::new();

    for case in fixture_cases()? {
        let world = case.join("world.json");
        if !world.exists() {
            continue;
        }
        let name = case_name(&case);

        let temp = tempfile::tempdir().context("Failed to create temp dir")?;
        let data_dir = temp.path().join("data");
        fs::create_dir_all(&data_dir)?;
        let exemptions = case.join("exemptions.json");
        if exemptions.exists() {
            fs::copy(&exemptions, data_dir.join("exemptions.json"))?;
        }

        let output = std::process::Command::new(&bin)
            .arg("--config")
            .arg(case.join("itemguard.toml"))
            .arg("--data-dir")
            .arg(&data_dir)
            .arg("scan")
            .arg("--world")
            .arg(&world)
            .arg("--save-reports")
            .output()
            .with_context(|| format!("Failed to run itemguard on fixture '{name}'"))?;

        if !output.status.success() {
            errors.push(format!(
                "fixture '{name}': itemguard exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let mut saved = Vec::new();
        let reports_dir = data_dir.join("reports");
        if reports_dir.exists() {
            for entry in fs::read_dir(&reports_dir)? {
                saved.push(entry?.path());
            }
        }
        saved.sort();

        for path in &saved {
            let file = case_name(path);
            let value = read_json(path)?;
            for err in report_schema.iter_errors(&value) {
                errors.push(format!("fixture '{name}': {file}: {err}"));
            }
            report_hygiene(&format!("fixture '{name}': {file}"), &value, &mut errors);

            // server_server_<millis>.json -> expected.server-report.json
            // entity_<id>_<millis>.json -> expected.entity-<id>-report.json
            let Some((kind, subject)) = file
                .trim_end_matches(".json")
                .rsplit_once('_')
                .and_then(|(stem, _)| stem.split_once('_'))
            else {
                continue;
            };
            let golden = if kind == "server" {
                case.join("expected.server-report.json")
            } else {
                case.join(format!("expected.{kind}-{subject}-report.json"))
            };
            if !golden.exists() {
                continue;
            }
            let expected = normalize_nondeterministic(read_json(&golden)?);
            let actual = normalize_nondeterministic(value);
            if expected == actual {
                println!("  ✓ fixture '{name}' matches {}", case_name(&golden));
            } else {
                errors.push(format!(
                    "fixture '{name}': {file} differs from {}",
                    case_name(&golden)
                ));
            }
        }

        if saved.is_empty() {
            errors.push(format!("fixture '{name}': no reports saved"));
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!(
            "Full conformance validation failed with {} errors",
            errors.len()
        );
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let check_ids = itemguard_types::explain::all_check_ids();
    let codes = itemguard_types::explain::all_codes();
    let mut errors = Vec::new();

    let identifiers = check_ids
        .iter()
        .map(|id| ("Check ID", *id))
        .chain(codes.iter().map(|code| ("Code", *code)));
    for (label, identifier) in identifiers {
        let Some(exp) = itemguard_types::lookup_explanation(identifier) else {
            errors.push(format!("{label} '{identifier}' has no explanation"));
            continue;
        };
        for (field, text) in [
            ("title", exp.title),
            ("description", exp.description),
            ("remediation", exp.remediation),
            ("example", exp.examples.before),
        ] {
            if text.trim().is_empty() {
                errors.push(format!("{label} '{identifier}' has empty {field}"));
            }
        }
        if exp.examples.before.trim_start().starts_with('{')
            && serde_json::from_str::<itemguard_domain::Item>(exp.examples.before).is_err()
        {
            errors.push(format!(
                "{label} '{identifier}' has an example that is not a valid item"
            ));
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate tests/fixtures against the generated schemas");
    eprintln!("  conform-full      conform + run itemguard scan on fixtures and diff golden reports");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
