//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes cast classification, quota checks and draft migration
//! over the MCP protocol, making them available to AI assistants via stdio
//! transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer. It wraps the same core library
//! that the CLI commands use, and each `#[tool]` method delegates to core
//! library functions rather than implementing business logic directly.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use longcast_core::classify::{CastTextAnalysis, classify};
use longcast_core::drafts::{self, DraftRecord};
use longcast_core::events::CastEvent;
use longcast_core::plans::{self, PlanLimits, Tier};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `classify_cast` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ClassifyCastParams {
    /// The cast text to classify.
    pub text: String,
    /// The text before the latest edit, to detect a cast growing into a long cast.
    pub previous_text: Option<String>,
}

/// Parameters for the `evaluate_quota` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct EvaluateQuotaParams {
    /// Subscription tier: "free", "creator", or "pro". Defaults to the configured tier.
    pub tier: Option<String>,
    /// Long casts already posted today.
    pub daily_count: u32,
    /// Long casts already posted this month.
    pub monthly_count: u32,
}

/// Parameters for the `get_plan` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetPlanParams {
    /// Tier to describe. Omit for every tier.
    pub tier: Option<String>,
}

/// Parameters for the `migrate_drafts` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct MigrateDraftsParams {
    /// Stored draft records (objects with at least a `text` field). Other
    /// values are returned unchanged.
    pub drafts: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct ClassifyCastReport {
    #[serde(flatten)]
    analysis: CastTextAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<CastEvent>,
}

#[derive(Serialize)]
struct PlanReport {
    tier: Tier,
    #[serde(flatten)]
    limits: &'static PlanLimits,
}

/// MCP server exposing longcast to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct CastServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    max_input_bytes: Option<usize>,
    default_tier: Tier,
}

impl Default for CastServer {
    fn default() -> Self {
        Self::new()
    }
}

impl CastServer {
    /// Reject text and draft batches larger than `max` bytes (`None` disables).
    #[must_use]
    pub const fn with_max_input_bytes(mut self, max: Option<usize>) -> Self {
        self.max_input_bytes = max;
        self
    }

    /// Tier used by `evaluate_quota` when the caller names none.
    #[must_use]
    pub const fn with_default_tier(mut self, tier: Tier) -> Self {
        self.default_tier = tier;
        self
    }

    fn check_len(&self, len: usize) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if len > max => Err(McpError::invalid_params(
                format!("input too large: {len} bytes (limit: {max} bytes)"),
                None,
            )),
            _ => Ok(()),
        }
    }

    fn parse_tier(name: &str) -> Result<Tier, McpError> {
        name.parse::<Tier>()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl CastServer {
    /// Create a new MCP server instance.
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            max_input_bytes: Some(longcast_core::DEFAULT_MAX_INPUT_BYTES),
            default_tier: Tier::default(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Classify cast text as a regular or long cast.
    #[tool(
        description = "Classify cast text. Returns byte length (mentions excluded), category (cast or long_cast), validity, preview text, style hint, and warning label. Pass previous_text to detect a cast growing into a long cast."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn classify_cast(
        &self,
        Parameters(params): Parameters<ClassifyCastParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "classify_cast",
            has_previous = params.previous_text.is_some(),
            "executing MCP tool"
        );
        self.check_len(params.text.len())?;
        if let Some(previous) = params.previous_text.as_deref() {
            self.check_len(previous.len())?;
        }

        let analysis = classify(&params.text);
        let event = params.previous_text.as_deref().and_then(|previous| {
            CastEvent::for_transition(classify(previous).category, analysis.category)
        });

        let json = to_json(&ClassifyCastReport {
            analysis,
            event,
        })?;

        tracing::info!(tool = "classify_cast", event = ?event, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Decide whether a tier may post another long cast.
    #[tool(
        description = "Check the long-cast quota for a tier given today's and this month's usage. Returns whether another long cast is allowed, remaining counts, and the limit message when denied."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", tier = ?params.tier))]
    fn evaluate_quota(
        &self,
        Parameters(params): Parameters<EvaluateQuotaParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "evaluate_quota", "executing MCP tool");

        let tier = match params.tier.as_deref() {
            Some(name) => Self::parse_tier(name)?,
            None => self.default_tier,
        };
        let decision = plans::evaluate(tier, params.daily_count, params.monthly_count);
        let json = to_json(&decision)?;

        tracing::info!(
            tool = "evaluate_quota",
            can_create = decision.can_create,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Describe what a tier allows.
    #[tool(
        description = "Get plan limits: long casts per day and month, saved searches, accounts, scheduled casts, analytics intervals, and long-cast feature flags. Omit tier to list every plan."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", tier = ?params.tier))]
    fn get_plan(
        &self,
        Parameters(params): Parameters<GetPlanParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_plan", "executing MCP tool");

        let json = match params.tier.as_deref() {
            Some(name) => {
                let tier = Self::parse_tier(name)?;
                to_json(&PlanReport {
                    tier,
                    limits: tier.limits(),
                })?
            }
            None => {
                let all: Vec<PlanReport> = Tier::ALL
                    .into_iter()
                    .map(|tier| PlanReport {
                        tier,
                        limits: tier.limits(),
                    })
                    .collect();
                to_json(&all)?
            }
        };

        tracing::info!(tool = "get_plan", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Tag stored drafts with their cast type.
    #[tool(
        description = "Migrate saved drafts: each draft without a castType gets one from classifying its text. Drafts that already have a castType are unchanged. Returns the migrated drafts."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", count = params.drafts.len()))]
    fn migrate_drafts(
        &self,
        Parameters(params): Parameters<MigrateDraftsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "migrate_drafts", "executing MCP tool");

        let size: usize = params
            .drafts
            .iter()
            .filter_map(|d| d.get("text").and_then(serde_json::Value::as_str))
            .map(str::len)
            .sum();
        self.check_len(size)?;

        let stored: Vec<DraftRecord> = params
            .drafts
            .into_iter()
            .map(DraftRecord::from_value)
            .collect();
        let migrated = drafts::migrate_records(&stored);
        let json = to_json(&migrated)?;

        tracing::info!(
            tool = "migrate_drafts",
            count = migrated.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for CastServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Classify cast text, check long-cast quotas, and migrate drafts.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
