//! Long-cast analytics events.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::CastCategory;

/// Product analytics events around long casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CastEvent {
    /// A long cast was posted.
    LongCastCreated,
    /// A reader expanded a long cast past its preview.
    LongCastExpanded,
    /// A reader collapsed a long cast back to its preview.
    LongCastCollapsed,
    /// A draft grew past the regular cast limit.
    #[serde(rename = "cast_converted_to_long")]
    ShortToLongCast,
}

impl CastEvent {
    /// Returns the event name as reported to analytics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LongCastCreated => "long_cast_created",
            Self::LongCastExpanded => "long_cast_expanded",
            Self::LongCastCollapsed => "long_cast_collapsed",
            Self::ShortToLongCast => "cast_converted_to_long",
        }
    }

    /// Event for a draft moving from `previous` to `current`, if any.
    pub fn for_transition(previous: CastCategory, current: CastCategory) -> Option<Self> {
        (previous == CastCategory::Short && current == CastCategory::Long)
            .then_some(Self::ShortToLongCast)
    }

    /// Event for toggling an expandable cast into the `expanded` state.
    pub const fn for_toggle(expanded: bool) -> Self {
        if expanded {
            Self::LongCastExpanded
        } else {
            Self::LongCastCollapsed
        }
    }
}

impl std::fmt::Display for CastEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_past_limit_is_a_conversion() {
        assert_eq!(
            CastEvent::for_transition(CastCategory::Short, CastCategory::Long),
            Some(CastEvent::ShortToLongCast)
        );
    }

    #[test]
    fn other_transitions_emit_nothing() {
        assert!(CastEvent::for_transition(CastCategory::Long, CastCategory::Short).is_none());
        assert!(CastEvent::for_transition(CastCategory::Long, CastCategory::Long).is_none());
        assert!(CastEvent::for_transition(CastCategory::Short, CastCategory::Short).is_none());
    }

    #[test]
    fn serialized_names_match_analytics_names() {
        for event in [
            CastEvent::LongCastCreated,
            CastEvent::LongCastExpanded,
            CastEvent::LongCastCollapsed,
            CastEvent::ShortToLongCast,
        ] {
            let json = serde_json::to_string(&event).unwrap();
            assert_eq!(json, format!("\"{}\"", event.as_str()));
        }
    }

    #[test]
    fn toggle_events() {
        assert_eq!(CastEvent::for_toggle(true), CastEvent::LongCastExpanded);
        assert_eq!(CastEvent::for_toggle(false), CastEvent::LongCastCollapsed);
    }
}
