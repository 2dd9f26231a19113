//! Quota command: can this tier post another long cast?

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use longcast_core::plans::{self, Tier};

/// Arguments for the `quota` subcommand.
#[derive(Args, Debug)]
pub struct QuotaArgs {
    /// Subscription tier (defaults to the configured tier, then free).
    #[arg(long, value_enum)]
    pub tier: Option<Tier>,

    /// Long casts already posted today.
    #[arg(long, value_name = "N")]
    pub daily: u32,

    /// Long casts already posted this month.
    #[arg(long, value_name = "N")]
    pub monthly: u32,
}

/// Evaluate the long-cast quota and fail when creation is denied.
#[instrument(name = "cmd_quota", skip_all, fields(tier = ?args.tier))]
pub fn cmd_quota(
    args: QuotaArgs,
    global_json: bool,
    config_tier: Option<Tier>,
) -> anyhow::Result<()> {
    let tier = args.tier.or(config_tier).unwrap_or_default();
    debug!(
        tier = tier.as_str(),
        daily = args.daily,
        monthly = args.monthly,
        "executing quota command"
    );

    let decision = plans::evaluate(tier, args.daily, args.monthly);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else if let Some(ref message) = decision.limit_message {
        bail!("{} ({} plan)", message, tier);
    } else {
        println!(
            "{} {} plan can post a long cast ({} left today, {} left this month)",
            "PASS:".green(),
            tier,
            decision.daily_remaining,
            decision.monthly_remaining,
        );
    }

    Ok(())
}
