//! Plans command: print what each subscription tier allows.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use longcast_core::plans::{AnalyticsInterval, PlanLimits, Tier};

/// Arguments for the `plans` subcommand.
#[derive(Args, Debug, Default)]
pub struct PlansArgs {
    /// Show only this tier.
    #[arg(long, value_enum)]
    pub tier: Option<Tier>,
}

#[derive(Serialize)]
struct PlanEntry {
    tier: Tier,
    #[serde(flatten)]
    limits: &'static PlanLimits,
}

/// Print the plan table.
#[instrument(name = "cmd_plans", skip_all, fields(tier = ?args.tier))]
pub fn cmd_plans(args: PlansArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(tier = ?args.tier, "executing plans command");

    let tiers: Vec<Tier> = match args.tier {
        Some(tier) => vec![tier],
        None => Tier::ALL.to_vec(),
    };
    let entries: Vec<PlanEntry> = tiers
        .into_iter()
        .map(|tier| PlanEntry {
            tier,
            limits: tier.limits(),
        })
        .collect();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let limits = entry.limits;
        println!("{}", entry.tier.as_str().bold().underline());
        println!(
            "{}: {}",
            "Long casts per day".dimmed(),
            limits.long_casts_per_day
        );
        println!(
            "{}: {}",
            "Long casts per month".dimmed(),
            limits.long_casts_per_month
        );
        println!("{}: {}", "Saved searches".dimmed(), limits.max_saved_searches);
        println!("{}: {}", "Accounts".dimmed(), limits.max_accounts);
        println!(
            "{}: {}",
            "Scheduled casts".dimmed(),
            limits.max_scheduled_casts
        );
        println!(
            "{}: {}",
            "Analytics".dimmed(),
            intervals(limits.analytics_intervals)
        );
        print_flag("Long cast analytics", limits.long_cast_analytics);
        print_flag(
            "Preview customization",
            limits.long_cast_preview_customization,
        );
        print_flag("Advanced features", limits.long_cast_advanced_features);
    }

    Ok(())
}

fn intervals(intervals: &[AnalyticsInterval]) -> String {
    intervals
        .iter()
        .map(AnalyticsInterval::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_flag(label: &str, enabled: bool) {
    if enabled {
        println!("{}: {}", label.dimmed(), "yes".green());
    } else {
        println!("{}: {}", label.dimmed(), "no".dimmed());
    }
}
