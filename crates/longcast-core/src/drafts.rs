//! Draft records and their long-cast migration.
//!
//! Drafts saved before long casts existed carry no cast type. Migration tags
//! each one with the category its text classifies as. Records come from
//! client storage and may be partial or malformed, so parsing is lenient:
//! anything this crate does not understand is kept verbatim and written
//! back unchanged, apart from the added `castType`.

use camino::Utf8Path;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::classify::{CastCategory, classify};
use crate::error::{DraftError, DraftResult};

/// Lifecycle state of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    /// Being edited.
    Writing,
    /// Queued to publish later.
    Scheduled,
    /// Submission in flight.
    Publishing,
    /// Posted.
    Published,
    /// Deleted by the user.
    Removed,
    /// Submission failed.
    Failed,
    /// A status this crate does not know; kept as written.
    #[serde(untagged)]
    Other(String),
}

/// A saved draft.
///
/// Field names follow the client's camelCase storage format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    /// Draft identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cast text. Missing or null text reads as empty.
    #[serde(deserialize_with = "nullable_text")]
    pub text: String,
    /// Lifecycle state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DraftStatus>,
    /// Creation time, milliseconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Account the draft belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Regular or long cast. Absent on drafts saved before long casts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast_type: Option<CastCategory>,
    /// Every other field, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Draft {
    /// Create a draft holding only `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// One entry of a stored draft array.
///
/// Entries that map cleanly onto [`Draft`] are typed. Anything else (a
/// record with a mistyped field, an unknown `castType`, or a value that is
/// not an object at all) is carried as raw JSON so it serializes exactly as
/// it was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DraftRecord {
    /// A well-formed draft.
    Draft(Draft),
    /// An entry kept as raw JSON.
    Raw(Value),
}

impl DraftRecord {
    /// Read one stored entry. Never fails.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            tracing::warn!(kind = json_kind(&value), "keeping non-object draft record as-is");
            return Self::Raw(value);
        }
        match Draft::deserialize(&value) {
            Ok(draft) => Self::Draft(draft),
            Err(err) => {
                tracing::debug!(error = %err, "draft has mistyped fields, keeping it raw");
                Self::Raw(value)
            }
        }
    }

    /// The typed draft, if this entry parsed as one.
    pub const fn as_draft(&self) -> Option<&Draft> {
        match self {
            Self::Draft(draft) => Some(draft),
            Self::Raw(_) => None,
        }
    }

    /// Whether migration would add a cast type to this entry.
    ///
    /// A raw object needs one when `castType` is missing or null. A
    /// `castType` this crate does not recognise still counts as set.
    pub fn needs_cast_type(&self) -> bool {
        match self {
            Self::Draft(draft) => draft.cast_type.is_none(),
            Self::Raw(Value::Object(map)) => map.get("castType").is_none_or(Value::is_null),
            Self::Raw(_) => false,
        }
    }

    /// Tag this entry with its cast type, returning a new entry.
    ///
    /// Raw objects classify their `text` when it is a string and count as
    /// empty otherwise. Non-object entries are returned unchanged.
    pub fn migrate(&self) -> Self {
        match self {
            Self::Draft(draft) => Self::Draft(migrate_draft(draft)),
            Self::Raw(Value::Object(map)) if self.needs_cast_type() => {
                let text = map.get("text").and_then(Value::as_str).unwrap_or_default();
                let mut map = map.clone();
                map.insert(
                    "castType".to_string(),
                    Value::String(category_for(text).as_str().to_string()),
                );
                Self::Raw(Value::Object(map))
            }
            Self::Raw(value) => Self::Raw(value.clone()),
        }
    }
}

impl From<Draft> for DraftRecord {
    fn from(draft: Draft) -> Self {
        Self::Draft(draft)
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn category_for(text: &str) -> CastCategory {
    if text.is_empty() {
        CastCategory::Short
    } else {
        classify(text).category
    }
}

/// Tag one draft with its cast type.
///
/// A draft that already has a type keeps it. Empty text is a regular cast.
pub fn migrate_draft(draft: &Draft) -> Draft {
    let mut migrated = draft.clone();
    if migrated.cast_type.is_none() {
        migrated.cast_type = Some(category_for(&draft.text));
    }
    migrated
}

/// Tag every draft with its cast type, returning new drafts.
#[tracing::instrument(skip(drafts), fields(count = drafts.len()))]
pub fn migrate_drafts(drafts: &[Draft]) -> Vec<Draft> {
    let migrated: Vec<Draft> = drafts.iter().map(migrate_draft).collect();
    let tagged = drafts.iter().filter(|d| d.cast_type.is_none()).count();
    tracing::info!(total = drafts.len(), tagged, "migrated drafts");
    migrated
}

/// Tag every stored entry with its cast type, returning new entries.
#[tracing::instrument(skip(records), fields(count = records.len()))]
pub fn migrate_records(records: &[DraftRecord]) -> Vec<DraftRecord> {
    let migrated: Vec<DraftRecord> = records.iter().map(DraftRecord::migrate).collect();
    let tagged = records.iter().filter(|r| r.needs_cast_type()).count();
    let raw = records.iter().filter(|r| r.as_draft().is_none()).count();
    tracing::info!(total = records.len(), tagged, raw, "migrated draft records");
    migrated
}

/// Parse a JSON array of stored drafts.
///
/// Only the top level must be an array; individual entries are read
/// leniently with [`DraftRecord::from_value`].
pub fn parse_drafts(json: &str) -> DraftResult<Vec<DraftRecord>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    Ok(values.into_iter().map(DraftRecord::from_value).collect())
}

/// Serialize draft entries as a pretty-printed JSON array.
pub fn drafts_to_json(drafts: &[DraftRecord]) -> DraftResult<String> {
    Ok(serde_json::to_string_pretty(drafts)?)
}

/// Write draft entries to `path` as a JSON array.
pub fn write_drafts(path: &Utf8Path, drafts: &[DraftRecord]) -> DraftResult<()> {
    let json = drafts_to_json(drafts)?;
    std::fs::write(path.as_std_path(), json + "\n").map_err(|source| DraftError::Io {
        path: path.to_path_buf(),
        source,
    })
}
