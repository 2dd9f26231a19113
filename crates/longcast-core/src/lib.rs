//! Core library for longcast.
//!
//! This crate provides the cast-length rules behind the `longcast` CLI and
//! MCP server: classifying cast text into regular and long casts, deciding
//! long-cast quotas per subscription tier, and tagging saved drafts with
//! their cast type.
//!
//! # Modules
//!
//! - [`classify`] - Byte-length classification, preview and style hints
//! - [`structure`] - Mention, channel and URL spans in cast text
//! - [`plans`] - Subscription tiers, limits and quota evaluation
//! - [`drafts`] - Draft records and migration
//! - [`events`] - Long-cast analytics event names
//! - [`submit`] - Outgoing cast payloads
//! - [`limits`] - Protocol and UI constants
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use longcast_core::{CastCategory, Tier, classify, evaluate};
//!
//! let analysis = classify("gm");
//! assert_eq!(analysis.category, CastCategory::Short);
//!
//! let decision = evaluate(Tier::Free, 5, 10);
//! assert!(!decision.can_create);
//! ```
#![deny(unsafe_code)]

pub mod classify;
pub mod config;
pub mod drafts;
pub mod error;
pub mod events;
pub mod limits;
pub mod plans;
pub mod structure;
pub mod submit;

pub use classify::{
    CachedClassifier, CastCategory, CastTextAnalysis, StyleHint, classify, classify_opt,
};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use drafts::{
    Draft, DraftRecord, DraftStatus, migrate_draft, migrate_drafts, migrate_records, parse_drafts,
};
pub use error::{ConfigError, ConfigResult, DraftError, DraftResult, PlanError, PlanResult};
pub use events::CastEvent;
pub use limits::{
    DEFAULT_MAX_INPUT_BYTES, LONG_CAST_MAX_BYTES, PREVIEW_CHARS, SHORT_CAST_MAX_BYTES,
};
pub use plans::{AnalyticsInterval, Limit, PlanLimits, QuotaDecision, Tier, evaluate};
pub use submit::CastAddBody;
