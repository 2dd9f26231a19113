//! Migrate command: tag saved drafts with their cast type.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use longcast_core::drafts;

use super::read_input;

/// Arguments for the `migrate` subcommand.
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// JSON file holding an array of drafts (`-` reads stdin).
    pub file: Utf8PathBuf,

    /// Write migrated drafts here instead of stdout.
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<Utf8PathBuf>,
}

/// Read drafts, tag the untyped ones, and write the result.
#[instrument(name = "cmd_migrate", skip_all, fields(file = %args.file))]
pub fn cmd_migrate(
    args: MigrateArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, output = ?args.output, "executing migrate command");

    let content = read_input(&args.file, max_input_bytes)?;
    let stored = drafts::parse_drafts(&content)
        .with_context(|| format!("failed to parse drafts in {}", args.file))?;
    let untyped = stored.iter().filter(|r| r.needs_cast_type()).count();
    let migrated = drafts::migrate_records(&stored);

    match args.output {
        Some(ref out) => {
            drafts::write_drafts(out, &migrated)
                .with_context(|| format!("failed to write migrated drafts to {out}"))?;
            if global_json {
                let summary = serde_json::json!({
                    "output": out,
                    "total": migrated.len(),
                    "tagged": untyped,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} tagged {} of {} drafts → {}",
                    "DONE:".green(),
                    untyped,
                    migrated.len(),
                    out.cyan(),
                );
            }
        }
        None => println!("{}", drafts::drafts_to_json(&migrated)?),
    }

    Ok(())
}
