//! Subscription plans and long-cast quotas.
//!
//! Every tier has a fixed set of limits. [`evaluate`] turns a tier and the
//! caller's usage counters into a [`QuotaDecision`]. Sourcing the counters
//! and incrementing them after a post is the caller's job.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{PlanError, PlanResult};

/// Subscription tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Tier {
    /// Free (open source) plan.
    #[default]
    #[serde(alias = "open-source", alias = "opensource")]
    #[cfg_attr(feature = "clap", value(alias = "open-source"))]
    Free,
    /// Paid plan for regular posters.
    Creator,
    /// Top plan; no long-cast caps.
    Pro,
}

impl Tier {
    /// All tiers, cheapest first.
    pub const ALL: [Self; 3] = [Self::Free, Self::Creator, Self::Pro];

    /// Returns the tier name as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Creator => "creator",
            Self::Pro => "pro",
        }
    }

    /// Limits for this tier.
    pub fn limits(self) -> &'static PlanLimits {
        match self {
            Self::Free => &PLAN_LIMITS[0],
            Self::Creator => &PLAN_LIMITS[1],
            Self::Pro => &PLAN_LIMITS[2],
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = PlanError;

    fn from_str(s: &str) -> PlanResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" | "open-source" | "opensource" => Ok(Self::Free),
            "creator" => Ok(Self::Creator),
            "pro" => Ok(Self::Pro),
            _ => Err(PlanError::UnknownTier {
                name: s.to_string(),
                available: Self::ALL.map(|t| t.as_str()).join(", "),
            }),
        }
    }
}

/// A usage cap.
///
/// Serializes as the cap number, or the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// At most this many.
    Finite(u32),
    /// No cap.
    Unlimited,
}

impl Limit {
    /// Whether there is no cap.
    pub const fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Whether one more is allowed after `used`.
    pub const fn allows(self, used: u32) -> bool {
        match self {
            Self::Finite(cap) => used < cap,
            Self::Unlimited => true,
        }
    }

    /// What is left after `used`, never below zero.
    pub const fn remaining(self, used: u32) -> Self {
        match self {
            Self::Finite(cap) => Self::Finite(cap.saturating_sub(used)),
            Self::Unlimited => Self::Unlimited,
        }
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(n) => serializer.serialize_u32(*n),
            Self::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

/// Window over which analytics are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnalyticsInterval {
    /// Last seven days.
    #[serde(rename = "7d")]
    Days7,
    /// Last thirty days.
    #[serde(rename = "30d")]
    Days30,
    /// Last ninety days.
    #[serde(rename = "90d")]
    Days90,
}

impl AnalyticsInterval {
    /// Returns the interval as a short label (`7d`, `30d`, `90d`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Days7 => "7d",
            Self::Days30 => "30d",
            Self::Days90 => "90d",
        }
    }
}

/// Everything a tier is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    /// Saved feed searches.
    pub max_saved_searches: u32,
    /// Connected accounts.
    pub max_accounts: u32,
    /// Casts queued for later.
    pub max_scheduled_casts: u32,
    /// Analytics windows on offer.
    pub analytics_intervals: &'static [AnalyticsInterval],
    /// Long casts per day.
    pub long_casts_per_day: Limit,
    /// Long casts per month.
    pub long_casts_per_month: Limit,
    /// Per-cast analytics for long casts.
    pub long_cast_analytics: bool,
    /// Custom preview length and styling for long casts.
    pub long_cast_preview_customization: bool,
    /// Everything else gated on the top plan.
    pub long_cast_advanced_features: bool,
}

impl PlanLimits {
    /// Whether long casts are uncapped on both windows.
    pub const fn is_unlimited(&self) -> bool {
        self.long_casts_per_day.is_unlimited() && self.long_casts_per_month.is_unlimited()
    }
}

static PLAN_LIMITS: [PlanLimits; 3] = [
    PlanLimits {
        max_saved_searches: 1,
        max_accounts: 2,
        max_scheduled_casts: 3,
        analytics_intervals: &[AnalyticsInterval::Days7],
        long_casts_per_day: Limit::Finite(5),
        long_casts_per_month: Limit::Finite(50),
        long_cast_analytics: false,
        long_cast_preview_customization: false,
        long_cast_advanced_features: false,
    },
    PlanLimits {
        max_saved_searches: 5,
        max_accounts: 10,
        max_scheduled_casts: 15,
        analytics_intervals: &[AnalyticsInterval::Days7, AnalyticsInterval::Days30],
        long_casts_per_day: Limit::Finite(25),
        long_casts_per_month: Limit::Finite(300),
        long_cast_analytics: true,
        long_cast_preview_customization: true,
        long_cast_advanced_features: false,
    },
    PlanLimits {
        max_saved_searches: 10,
        max_accounts: 20,
        max_scheduled_casts: 30,
        analytics_intervals: &[
            AnalyticsInterval::Days7,
            AnalyticsInterval::Days30,
            AnalyticsInterval::Days90,
        ],
        long_casts_per_day: Limit::Unlimited,
        long_casts_per_month: Limit::Unlimited,
        long_cast_analytics: true,
        long_cast_preview_customization: true,
        long_cast_advanced_features: true,
    },
];

/// Whether a tier may post another long cast, and how many are left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaDecision {
    /// Tier the decision was made for.
    pub tier: Tier,
    /// Daily long-cast cap.
    pub daily_limit: Limit,
    /// Monthly long-cast cap.
    pub monthly_limit: Limit,
    /// Whether another long cast is allowed.
    pub can_create: bool,
    /// Why not, when not allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_message: Option<String>,
    /// Long casts left today.
    pub daily_remaining: Limit,
    /// Long casts left this month.
    pub monthly_remaining: Limit,
}

/// Decide whether `tier` may post another long cast given current usage.
///
/// The daily cap is reported ahead of the monthly one when both are used up.
#[tracing::instrument]
pub fn evaluate(tier: Tier, daily_count: u32, monthly_count: u32) -> QuotaDecision {
    let limits = tier.limits();
    let daily_limit = limits.long_casts_per_day;
    let monthly_limit = limits.long_casts_per_month;

    let can_create = daily_limit.allows(daily_count) && monthly_limit.allows(monthly_count);
    let limit_message = limit_message(daily_limit, monthly_limit, daily_count, monthly_count);

    tracing::debug!(tier = tier.as_str(), can_create, "evaluated long cast quota");

    QuotaDecision {
        tier,
        daily_limit,
        monthly_limit,
        can_create,
        limit_message,
        daily_remaining: daily_limit.remaining(daily_count),
        monthly_remaining: monthly_limit.remaining(monthly_count),
    }
}

fn limit_message(
    daily: Limit,
    monthly: Limit,
    daily_count: u32,
    monthly_count: u32,
) -> Option<String> {
    if let Limit::Finite(cap) = daily
        && daily_count >= cap
    {
        return Some(format!(
            "You've reached your daily limit of {cap} long casts. Upgrade for more!"
        ));
    }
    if let Limit::Finite(cap) = monthly
        && monthly_count >= cap
    {
        return Some(format!(
            "You've reached your monthly limit of {cap} long casts. Upgrade for unlimited access!"
        ));
    }
    None
}
