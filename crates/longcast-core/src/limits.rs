//! Cast text limits.
//!
//! Byte limits apply to the UTF-8 encoding of cast text with mentions
//! removed. The preview limit counts UTF-16 code units of the raw text.

/// Maximum bytes for a regular cast. Anything longer is a long cast.
pub const SHORT_CAST_MAX_BYTES: usize = 320;

/// Maximum bytes for a long cast. Anything longer is rejected.
pub const LONG_CAST_MAX_BYTES: usize = 1024;

/// UTF-16 code units shown before a long text collapses behind "Show more".
pub const PREVIEW_CHARS: usize = 280;

/// Marker appended to a truncated preview.
pub const PREVIEW_ELLIPSIS: &str = "...";

/// Fraction of a limit past which the UI starts warning.
pub const WARNING_RATIO: f64 = 0.9;

/// Default cap on input read by the CLI and MCP server (1 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
