//! Classify command: sort cast text into a regular or long cast.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tracing::{debug, info, instrument};

use longcast_core::classify::{CastTextAnalysis, StyleHint, classify};
use longcast_core::events::CastEvent;
use longcast_core::limits::LONG_CAST_MAX_BYTES;
use longcast_core::submit::CastAddBody;

use super::{check_input_len, read_input, strip_final_newline};

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// File holding the cast text (`-` reads stdin).
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    pub file: Option<Utf8PathBuf>,

    /// Cast text to classify instead of a file.
    #[arg(long)]
    pub text: Option<String>,

    /// Show the full text instead of the preview.
    #[arg(long)]
    pub expand: bool,

    /// Print the submission payload instead of the analysis.
    #[arg(long)]
    pub payload: bool,

    /// URLs to embed in the payload (repeatable).
    #[arg(long = "embed", value_name = "URL", requires = "payload")]
    pub embeds: Vec<String>,
}

/// Classify cast text and fail when it is too long to post.
#[instrument(name = "cmd_classify", skip_all, fields(file = ?args.file))]
pub fn cmd_classify(
    args: ClassifyArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        file = ?args.file,
        expand = args.expand,
        payload = args.payload,
        "executing classify command"
    );

    let (text, source) = match (args.text, args.file) {
        (Some(text), _) => {
            check_input_len(&text, max_input_bytes)?;
            (text, "--text".to_string())
        }
        (None, Some(file)) => {
            let content = strip_final_newline(read_input(&file, max_input_bytes)?);
            let source = if file.as_str() == "-" {
                "stdin".to_string()
            } else {
                file.to_string()
            };
            (content, source)
        }
        (None, None) => bail!("no input: pass a FILE or --text"),
    };

    let analysis = classify(&text);

    if args.payload {
        if !analysis.is_valid {
            bail!(
                "{source} is {} bytes (limit: {LONG_CAST_MAX_BYTES}). Shorten it before posting.",
                analysis.length_in_bytes,
            );
        }
        let body = CastAddBody::new(text, args.embeds);
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if analysis.exceeds_preview {
        info!(
            event = CastEvent::for_toggle(args.expand).as_str(),
            "rendering long cast"
        );
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{}", analysis.visible_text(args.expand));
    if analysis.exceeds_preview && !args.expand {
        println!("{}", "(--expand to show more)".dimmed());
    }
    println!();
    println!("{}", status_line(&analysis));

    if !analysis.is_valid {
        bail!(
            "{source} is {} bytes (limit: {LONG_CAST_MAX_BYTES}). Shorten it before posting.",
            analysis.length_in_bytes,
        );
    }

    Ok(())
}

/// Byte count, category, and warning label, colored by style hint.
fn status_line(analysis: &CastTextAnalysis) -> String {
    let mut line = format!(
        "{} bytes · {}",
        analysis.length_in_bytes, analysis.category
    );
    if !analysis.warning_label.is_empty() {
        line.push_str(" · ");
        line.push_str(&analysis.warning_label);
    }
    let line = line.as_str();
    match analysis.style_hint {
        StyleHint::Normal => line.if_supports_color(Stdout, |t| t.green()).to_string(),
        StyleHint::Warning | StyleHint::LongWarning => {
            line.if_supports_color(Stdout, |t| t.yellow()).to_string()
        }
        StyleHint::LongOk => line.if_supports_color(Stdout, |t| t.cyan()).to_string(),
        StyleHint::Invalid => line.if_supports_color(Stdout, |t| t.red()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(text: &str) -> ClassifyArgs {
        ClassifyArgs {
            file: None,
            text: Some(text.to_string()),
            expand: false,
            payload: false,
            embeds: Vec::new(),
        }
    }

    #[test]
    fn short_text_succeeds() {
        assert!(cmd_classify(args_for("gm"), false, None).is_ok());
    }

    #[test]
    fn invalid_text_fails_in_text_mode() {
        let err = cmd_classify(args_for(&"a".repeat(1100)), false, None).unwrap_err();
        assert!(err.to_string().contains("1100 bytes"));
    }

    #[test]
    fn json_mode_reports_without_failing() {
        assert!(cmd_classify(args_for(&"a".repeat(1100)), true, None).is_ok());
    }

    #[test]
    fn payload_rejects_invalid_text() {
        let mut args = args_for(&"a".repeat(1100));
        args.payload = true;
        assert!(cmd_classify(args, false, None).is_err());
    }

    #[test]
    fn inline_text_respects_input_limit() {
        let err = cmd_classify(args_for("abcdef"), false, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
    }

    #[test]
    fn status_line_includes_label() {
        owo_colors::set_override(false);
        let line = status_line(&classify(&"a".repeat(300)));
        assert_eq!(line, "300 bytes · cast · 20 bytes left");
    }
}
