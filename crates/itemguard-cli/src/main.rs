//! CLI entry point for itemguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `itemguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use itemguard_app::{
    CheckInput, ExplainOutput, PersistQueue, ReportStore, ScanInput, format_explanation,
    format_not_found, load_config, open_exemptions, parse_items, render_markdown,
    render_report_summary, render_text, run_check, run_explain, run_scan, verdict_exit_code,
};
use itemguard_settings::Overrides;
use std::io::{Read, Write};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "itemguard",
    version,
    about = "Detect, explain and repair tampered game items"
)]
struct Cli {
    /// Path to the itemguard config TOML. A missing file means defaults.
    #[arg(long, default_value = "itemguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (default|strict|lenient).
    #[arg(long)]
    profile: Option<String>,

    /// Directory holding exemptions.json and reports/.
    #[arg(long, default_value = "itemguard-data")]
    data_dir: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate items and report violations.
    Check {
        /// JSON file with one item or an array of items (`-` for stdin).
        #[arg(long, default_value = "-")]
        items: Utf8PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Remediate items and write the corrected copies as JSON.
    Fix {
        #[arg(long, default_value = "-")]
        items: Utf8PathBuf,
        /// Where to write the fixed items (stdout if omitted).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Run one full scan over a world snapshot and print the summary.
    Scan {
        /// JSON array of entities: `[{id, name?, bypass?, slots: [{slot, item}]}]`.
        #[arg(long)]
        world: Utf8PathBuf,
        /// Save server and entity reports under the data directory.
        #[arg(long)]
        save_reports: bool,
    },

    /// Check config syntax and print values that fell back to defaults.
    Validate,

    /// Explain a check id or violation code with remediation guidance.
    Explain {
        /// The check id (e.g. "items.potion") or code (e.g. "extreme_effect").
        identifier: String,
    },

    /// Manage the exemption list.
    Exempt {
        #[command(subcommand)]
        action: ExemptAction,
    },

    /// Manage saved reports.
    Reports {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand, Debug)]
enum ExemptAction {
    /// Exempt every item in the file.
    Add {
        #[arg(long, default_value = "-")]
        items: Utf8PathBuf,
    },
    /// Remove the exemption of every item in the file.
    Remove {
        #[arg(long, default_value = "-")]
        items: Utf8PathBuf,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum ReportAction {
    List,
    Show {
        name: String,
        /// Print the raw JSON envelope.
        #[arg(long)]
        json: bool,
    },
    Delete {
        name: String,
    },
    /// Delete reports older than the retention period.
    Cleanup {
        /// Override the configured retention.
        #[arg(long)]
        days: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_text = read_config(&cli.config)?;
    tracing::debug!(config = %cli.config, bytes = config_text.len(), "config loaded");
    let overrides = Overrides {
        profile: cli.profile.clone(),
    };

    match &cli.cmd {
        Commands::Check { items, format } => {
            cmd_check(&cli, &config_text, overrides, items, *format)
        }
        Commands::Fix { items, output } => {
            cmd_fix(&cli, &config_text, overrides, items, output.as_deref())
        }
        Commands::Scan {
            world,
            save_reports,
        } => cmd_scan(&cli, &config_text, overrides, world, *save_reports),
        Commands::Validate => cmd_validate(&config_text, overrides),
        Commands::Explain { identifier } => cmd_explain(identifier),
        Commands::Exempt { action } => cmd_exempt(&cli, action),
        Commands::Reports { action } => cmd_reports(&cli, &config_text, overrides, action),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn read_input(path: &Utf8Path) -> anyhow::Result<String> {
    if path.as_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read {path}"))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("itemguard: config: {warning}");
    }
}

fn queue() -> anyhow::Result<Arc<PersistQueue>> {
    Ok(Arc::new(PersistQueue::start()?))
}

fn cmd_check(
    cli: &Cli,
    config_text: &str,
    overrides: Overrides,
    items: &Utf8Path,
    format: Format,
) -> anyhow::Result<()> {
    let items_json = read_input(items)?;
    let exemptions = open_exemptions(cli.data_dir.join("exemptions.json"), queue()?)?;
    let output = run_check(CheckInput {
        config_text,
        overrides,
        items_json: &items_json,
        exemptions: Some(exemptions),
        fix: false,
    })?;
    print_warnings(&output.warnings);

    match format {
        Format::Text => print!("{}", render_text(&output.report)),
        Format::Markdown => print!("{}", render_markdown(&output.report)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output.report).context("serialize report")?
        ),
    }

    let code = verdict_exit_code(output.report.verdict);
    if code != 0 {
        std::io::stdout().flush().context("flush stdout")?;
        std::process::exit(code);
    }
    Ok(())
}

fn cmd_fix(
    cli: &Cli,
    config_text: &str,
    overrides: Overrides,
    items: &Utf8Path,
    output: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let items_json = read_input(items)?;
    let exemptions = open_exemptions(cli.data_dir.join("exemptions.json"), queue()?)?;
    let result = run_check(CheckInput {
        config_text,
        overrides,
        items_json: &items_json,
        exemptions: Some(exemptions),
        fix: true,
    })?;
    print_warnings(&result.warnings);

    let fixed: Vec<_> = result
        .report
        .items
        .iter()
        .filter_map(|r| r.fixed.as_ref())
        .collect();
    let text = serde_json::to_string_pretty(&fixed).context("serialize fixed items")? + "\n";
    match output {
        Some(path) => write_text_file(path, &text)?,
        None => print!("{text}"),
    }

    let unfixable = result
        .report
        .items
        .iter()
        .filter(|r| !r.remaining.is_empty())
        .count();
    if unfixable > 0 {
        eprintln!("itemguard: {unfixable} item(s) still violate after fixing and must be removed");
    }
    Ok(())
}

fn cmd_scan(
    cli: &Cli,
    config_text: &str,
    overrides: Overrides,
    world: &Utf8Path,
    save_reports: bool,
) -> anyhow::Result<()> {
    let world_json = read_input(world)?;
    let queue = queue()?;
    let exemptions = open_exemptions(cli.data_dir.join("exemptions.json"), Arc::clone(&queue))?;
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let now = OffsetDateTime::now_utc();
    let output = runtime.block_on(run_scan(
        ScanInput {
            config_text,
            overrides: overrides.clone(),
            world_json: &world_json,
            exemptions: Some(exemptions),
        },
        now,
    ))?;
    print_warnings(&output.warnings);

    let s = output.summary;
    println!(
        "scanned {} entities ({} bypassed): {} violating item(s), {} fixed, {} deleted",
        s.entities_scanned, s.entities_bypassed, s.violations, s.fixed, s.deleted
    );
    print!("{}", render_report_summary(&output.server_report));

    if save_reports {
        let settings = load_config(config_text, overrides)?.effective.reports;
        let store = ReportStore::new(cli.data_dir.join("reports"), queue);
        for report in std::iter::once(&output.server_report).chain(&output.entity_reports) {
            if let Some(path) = store.save(&settings, report)? {
                println!("saved {path}");
            }
        }
        store.apply_retention(&settings, now)?;
    }
    Ok(())
}

fn cmd_validate(config_text: &str, overrides: Overrides) -> anyhow::Result<()> {
    let resolved = load_config(config_text, overrides)?;
    print_warnings(&resolved.warnings);
    println!(
        "config ok: profile {}, {} warning(s)",
        resolved.effective.profile,
        resolved.warnings.len()
    );
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, &available_check_ids, &available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_exempt(cli: &Cli, action: &ExemptAction) -> anyhow::Result<()> {
    let queue = queue()?;
    let exemptions = open_exemptions(cli.data_dir.join("exemptions.json"), Arc::clone(&queue))?;
    match action {
        ExemptAction::Add { items } => {
            for item in parse_items(&read_input(items)?)? {
                let key = itemguard_domain::fingerprint(&item);
                if exemptions.add(&item) {
                    println!("added {key}");
                } else {
                    println!("already exempt {key}");
                }
            }
        }
        ExemptAction::Remove { items } => {
            for item in parse_items(&read_input(items)?)? {
                let key = itemguard_domain::fingerprint(&item);
                if exemptions.remove(&item) {
                    println!("removed {key}");
                } else {
                    println!("not exempt {key}");
                }
            }
        }
        ExemptAction::List => {
            for entry in exemptions.entries() {
                println!("{entry}");
            }
        }
    }
    queue.flush();
    Ok(())
}

fn cmd_reports(
    cli: &Cli,
    config_text: &str,
    overrides: Overrides,
    action: &ReportAction,
) -> anyhow::Result<()> {
    let store = ReportStore::new(cli.data_dir.join("reports"), queue()?);
    match action {
        ReportAction::List => {
            for file in store.list()? {
                println!("{}", file.file_name);
            }
        }
        ReportAction::Show { name, json } => {
            let report = store.load(name)?;
            if *json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serialize report")?
                );
            } else {
                print!("{}", render_report_summary(&report));
            }
        }
        ReportAction::Delete { name } => {
            if !store.delete(name)? {
                anyhow::bail!("no such report: {name}");
            }
            println!("deleted {name}");
        }
        ReportAction::Cleanup { days } => {
            let now = OffsetDateTime::now_utc();
            let removed = match days {
                Some(days) => store.cleanup_older_than(time::Duration::days(i64::from(*days)), now)?,
                None => {
                    let settings = load_config(config_text, overrides)?.effective.reports;
                    store.apply_retention(&settings, now)?
                }
            };
            println!("removed {removed} report(s)");
        }
    }
    Ok(())
}
