//! Outgoing cast payloads.
//!
//! The network client signs and submits casts; this module only builds the
//! body it signs, tagged with the type the classifier picked. Mention fids
//! and positions are resolved by the client.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::{CastCategory, classify};

/// Body of a cast submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CastAddBody {
    /// Cast text.
    pub text: String,
    /// Embedded URLs.
    pub embeds: Vec<String>,
    /// Regular or long cast.
    #[serde(rename = "type")]
    pub cast_type: CastCategory,
}

impl CastAddBody {
    /// Build a payload for `text`, tagged by classifying it.
    pub fn new(text: impl Into<String>, embeds: Vec<String>) -> Self {
        let text = text.into();
        let cast_type = classify(&text).category;
        Self {
            text,
            embeds,
            cast_type,
        }
    }
}
