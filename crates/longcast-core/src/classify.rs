//! Cast text classification.
//!
//! Measures cast text the way the protocol does (UTF-8 bytes, mentions
//! excluded), sorts it into a regular or long cast, and derives the preview
//! and status hints a composer or feed needs.
//!
//! ```
//! use longcast_core::classify::{CastCategory, StyleHint, classify};
//!
//! let analysis = classify(&"a".repeat(400));
//! assert_eq!(analysis.category, CastCategory::Long);
//! assert_eq!(analysis.style_hint, StyleHint::LongOk);
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::limits::{
    LONG_CAST_MAX_BYTES, PREVIEW_CHARS, PREVIEW_ELLIPSIS, SHORT_CAST_MAX_BYTES, WARNING_RATIO,
};
use crate::structure;

/// Size category of a cast.
///
/// Serializes to the type marker attached to outgoing casts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CastCategory {
    /// Fits in a regular cast (at most 320 bytes).
    #[default]
    #[serde(rename = "cast")]
    #[cfg_attr(feature = "clap", value(name = "cast"))]
    Short,
    /// Needs a long cast (more than 320 bytes).
    #[serde(rename = "long_cast")]
    #[cfg_attr(feature = "clap", value(name = "long_cast"))]
    Long,
}

impl CastCategory {
    /// Returns the protocol type marker.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "cast",
            Self::Long => "long_cast",
        }
    }
}

impl std::fmt::Display for CastCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a length indicator should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StyleHint {
    /// Short cast well under the limit.
    Normal,
    /// Short cast within 10% of its limit.
    Warning,
    /// Long cast well under the limit.
    LongOk,
    /// Long cast within 10% of its limit.
    LongWarning,
    /// Over the long cast limit; cannot be posted.
    Invalid,
}

impl StyleHint {
    /// Returns the hint as a snake_case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::LongOk => "long_ok",
            Self::LongWarning => "long_warning",
            Self::Invalid => "invalid",
        }
    }
}

/// Result of classifying a piece of cast text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CastTextAnalysis {
    /// Regular or long cast.
    pub category: CastCategory,
    /// UTF-8 byte length of the text with mentions removed.
    pub length_in_bytes: usize,
    /// Whether the text fits in a long cast.
    pub is_valid: bool,
    /// Truncated text shown while collapsed.
    pub preview_text: String,
    /// The input, unmodified.
    pub full_text: String,
    /// Whether the text is longer than the preview.
    pub exceeds_preview: bool,
    /// Styling for the length indicator.
    pub style_hint: StyleHint,
    /// Status message for the length indicator. Empty when nothing to say.
    pub warning_label: String,
}

impl CastTextAnalysis {
    /// Whether this text must be posted as a long cast.
    pub fn is_long_cast(&self) -> bool {
        self.category == CastCategory::Long
    }

    /// Text an expand/collapse view shows in the given state.
    ///
    /// Text that fits in the preview is always shown in full.
    pub fn visible_text(&self, expanded: bool) -> &str {
        if expanded || !self.exceeds_preview {
            &self.full_text
        } else {
            &self.preview_text
        }
    }
}

/// Classify cast text.
///
/// Mentions are stripped before measuring, since the protocol encodes them
/// outside the text body. Limits compare UTF-8 bytes; the preview counts
/// UTF-16 code units, the unit client text fields measure in.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn classify(text: &str) -> CastTextAnalysis {
    let length_in_bytes = structure::strip_mentions(text).len();
    let category = if length_in_bytes > SHORT_CAST_MAX_BYTES {
        CastCategory::Long
    } else {
        CastCategory::Short
    };
    let is_valid = length_in_bytes <= LONG_CAST_MAX_BYTES;
    let (preview_text, exceeds_preview) = preview(text);
    let (style_hint, warning_label) = style(length_in_bytes, category, is_valid);

    tracing::debug!(
        length_in_bytes,
        category = category.as_str(),
        style = style_hint.as_str(),
        "classified cast text"
    );

    CastTextAnalysis {
        category,
        length_in_bytes,
        is_valid,
        preview_text,
        full_text: text.to_string(),
        exceeds_preview,
        style_hint,
        warning_label,
    }
}

/// Classify text that may be absent. Absent text classifies as empty.
pub fn classify_opt(text: Option<&str>) -> CastTextAnalysis {
    classify(text.unwrap_or_default())
}

/// First [`PREVIEW_CHARS`] UTF-16 code units plus an ellipsis, or the whole
/// text. The cut never splits a surrogate pair.
fn preview(text: &str) -> (String, bool) {
    let cut = text
        .char_indices()
        .scan(0, |units, (i, c)| {
            *units += c.len_utf16();
            Some((i, *units))
        })
        .find(|&(_, units)| units > PREVIEW_CHARS)
        .map(|(i, _)| i);
    match cut {
        Some(cut) => (format!("{}{PREVIEW_ELLIPSIS}", text[..cut].trim_end()), true),
        None => (text.to_string(), false),
    }
}

fn near_limit(length: usize, limit: usize) -> bool {
    length as f64 > limit as f64 * WARNING_RATIO
}

fn style(length: usize, category: CastCategory, is_valid: bool) -> (StyleHint, String) {
    if !is_valid {
        return (
            StyleHint::Invalid,
            format!("Exceeds limit by {} bytes", length - LONG_CAST_MAX_BYTES),
        );
    }
    match category {
        CastCategory::Long if near_limit(length, LONG_CAST_MAX_BYTES) => (
            StyleHint::LongWarning,
            format!("Long cast: {} bytes left", LONG_CAST_MAX_BYTES - length),
        ),
        CastCategory::Long => (StyleHint::LongOk, "Long cast".to_string()),
        CastCategory::Short if near_limit(length, SHORT_CAST_MAX_BYTES) => (
            StyleHint::Warning,
            format!("{} bytes left", SHORT_CAST_MAX_BYTES - length),
        ),
        CastCategory::Short => (StyleHint::Normal, String::new()),
    }
}

/// Classifier that remembers its last result.
///
/// Composers re-classify on every keystroke and renders often repeat the
/// same text. A single slot is enough to skip that repeated work.
#[derive(Debug, Default)]
pub struct CachedClassifier {
    last: Option<CastTextAnalysis>,
    hits: u64,
}

impl CachedClassifier {
    /// Create an empty classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `text`, reusing the previous result when the text is unchanged.
    pub fn classify(&mut self, text: &str) -> &CastTextAnalysis {
        if self.last.as_ref().is_some_and(|a| a.full_text == text) {
            self.hits += 1;
        } else {
            self.last = Some(classify(text));
        }
        self.last.get_or_insert_with(|| classify(text))
    }

    /// Number of calls answered from the cache.
    pub const fn hits(&self) -> u64 {
        self.hits
    }
}
