//! Cast text structuring.
//!
//! Splits raw cast text into typed spans so callers can treat mentions,
//! channels and links differently from prose. Mentions matter most: the
//! protocol stores them out of band (as fids plus positions), so they do
//! not count toward the byte limit.
//!
//! Spans borrow from the input and concatenate back to it exactly.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// One pattern for every non-prose span. URLs come first so that `@` or `/`
/// inside a link never starts a mention or channel.
static SPAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<url>(?:https?://|www\.)\S+)|(?P<mention>@[a-z0-9][a-z0-9-]{0,15}(?:\.eth)?)|(?P<channel>/[a-z0-9-]{1,16})",
    )
    .expect("valid regex")
});

/// Kind of a structural span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Ordinary prose.
    Plain,
    /// A `@username` reference to another account.
    Mention,
    /// A `/channel` reference.
    Channel,
    /// A link.
    Url,
    /// A line break.
    Newline,
}

/// A typed slice of cast text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span<'a> {
    /// What this span is.
    pub kind: SpanKind,
    /// The serialized content, borrowed from the input.
    pub content: &'a str,
}

impl<'a> Span<'a> {
    const fn new(kind: SpanKind, content: &'a str) -> Self {
        Self { kind, content }
    }
}

/// Split `text` into ordered spans.
///
/// Empty input yields no spans.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn parse(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in SPAN_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (start, mut end) = (whole.start(), whole.end());

        let kind = if caps.name("url").is_some() {
            SpanKind::Url
        } else if caps.name("mention").is_some() {
            let Some(mention_end) = mention_end(text, start, end) else {
                continue;
            };
            end = mention_end;
            SpanKind::Mention
        } else {
            if !channel_bounded(text, start, end) {
                continue;
            }
            SpanKind::Channel
        };

        push_plain(&mut spans, &text[cursor..start]);
        spans.push(Span::new(kind, &text[start..end]));
        cursor = end;
    }

    push_plain(&mut spans, &text[cursor..]);
    spans
}

/// Concatenate every span except mentions.
///
/// This is the text whose UTF-8 length is checked against cast limits.
pub fn strip_mentions(text: &str) -> String {
    parse(text)
        .into_iter()
        .filter(|span| span.kind != SpanKind::Mention)
        .map(|span| span.content)
        .collect()
}

/// Push prose, splitting out line breaks.
fn push_plain<'a>(spans: &mut Vec<Span<'a>>, segment: &'a str) {
    for piece in segment.split_inclusive('\n') {
        match piece.strip_suffix('\n') {
            Some(line) => {
                if !line.is_empty() {
                    spans.push(Span::new(SpanKind::Plain, line));
                }
                spans.push(Span::new(SpanKind::Newline, "\n"));
            }
            None => spans.push(Span::new(SpanKind::Plain, piece)),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// End of the mention matched at `start..end`, if it is one.
///
/// A match ending in `.eth` that runs on into more word characters (as in
/// `@alice.ethereum`) falls back to the bare username.
fn mention_end(text: &str, start: usize, end: usize) -> Option<usize> {
    if mention_bounded(text, start, end) {
        return Some(end);
    }
    let bare = end.checked_sub(ENS_SUFFIX.len())?;
    let has_suffix = bare > start && text[bare..end].eq_ignore_ascii_case(ENS_SUFFIX);
    (has_suffix && mention_bounded(text, start, bare)).then_some(bare)
}

const ENS_SUFFIX: &str = ".eth";

/// A mention needs a non-word character before the `@` (so emails don't
/// match) and must not run on into more username characters.
fn mention_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().is_none_or(|c| !is_word_char(c));
    let after_ok = text[end..]
        .chars()
        .next()
        .is_none_or(|c| !is_word_char(c) && c != '-');
    before_ok && after_ok
}

/// A channel starts a word and ends at a word boundary (so `a/b` is prose).
fn channel_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().is_none_or(char::is_whitespace);
    let after_ok = text[end..]
        .chars()
        .next()
        .is_none_or(|c| !is_word_char(c) && c != '-' && c != '/');
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SpanKind> {
        parse(text).into_iter().map(|s| s.kind).collect()
    }

    fn rejoin(text: &str) -> String {
        parse(text).into_iter().map(|s| s.content).collect()
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(kinds("gm everyone"), vec![SpanKind::Plain]);
    }

    #[test]
    fn detects_mention() {
        let spans = parse("Hello @username this is a test");
        assert_eq!(
            spans,
            vec![
                Span::new(SpanKind::Plain, "Hello "),
                Span::new(SpanKind::Mention, "@username"),
                Span::new(SpanKind::Plain, " this is a test"),
            ]
        );
    }

    #[test]
    fn ens_style_mention_includes_suffix() {
        let spans = parse("cc @vitalik.eth");
        assert_eq!(spans[1], Span::new(SpanKind::Mention, "@vitalik.eth"));
    }

    #[test]
    fn eth_prefix_of_longer_word_is_not_suffix() {
        let spans = parse("ping @alice.ethereum");
        assert_eq!(
            spans,
            vec![
                Span::new(SpanKind::Plain, "ping "),
                Span::new(SpanKind::Mention, "@alice"),
                Span::new(SpanKind::Plain, ".ethereum"),
            ]
        );
        assert_eq!(strip_mentions("ping @alice.ethereum"), "ping .ethereum");
    }

    #[test]
    fn ens_suffix_is_case_insensitive() {
        assert_eq!(kinds("@Bob.ETH"), vec![SpanKind::Mention]);
        assert_eq!(
            kinds("@bob.ETHx"),
            vec![SpanKind::Mention, SpanKind::Plain]
        );
    }

    #[test]
    fn mention_at_start_of_text() {
        assert_eq!(kinds("@dwr hi"), vec![SpanKind::Mention, SpanKind::Plain]);
    }

    #[test]
    fn email_is_not_a_mention() {
        assert_eq!(kinds("mail me at a@example.com"), vec![SpanKind::Plain]);
    }

    #[test]
    fn overlong_username_is_not_a_mention() {
        assert_eq!(kinds("@abcdefghijklmnopqrstuvwxyz"), vec![SpanKind::Plain]);
    }

    #[test]
    fn mention_followed_by_punctuation() {
        let spans = parse("thanks @alice!");
        assert_eq!(spans[1], Span::new(SpanKind::Mention, "@alice"));
        assert_eq!(spans[2], Span::new(SpanKind::Plain, "!"));
    }

    #[test]
    fn detects_channel() {
        assert_eq!(
            kinds("posting in /rust today"),
            vec![SpanKind::Plain, SpanKind::Channel, SpanKind::Plain]
        );
    }

    #[test]
    fn slash_inside_word_is_not_a_channel() {
        assert_eq!(kinds("either/or"), vec![SpanKind::Plain]);
    }

    #[test]
    fn url_swallows_at_sign() {
        let spans = parse("see https://warpcast.com/@dwr now");
        assert_eq!(spans[1], Span::new(SpanKind::Url, "https://warpcast.com/@dwr"));
        assert!(spans.iter().all(|s| s.kind != SpanKind::Mention));
    }

    #[test]
    fn newlines_become_spans() {
        assert_eq!(
            kinds("one\n\ntwo"),
            vec![
                SpanKind::Plain,
                SpanKind::Newline,
                SpanKind::Newline,
                SpanKind::Plain
            ]
        );
    }

    #[test]
    fn spans_rejoin_to_input() {
        for text in [
            "",
            "plain",
            "Hello @a and @b.eth in /dev\nsee www.example.com/x?y=@z",
            "trailing newline\n",
            "emoji 🎉 @fren 🎉",
        ] {
            assert_eq!(rejoin(text), text);
        }
    }

    #[test]
    fn strip_mentions_removes_only_mentions() {
        assert_eq!(strip_mentions("Hello @username /chan"), "Hello  /chan");
        assert_eq!(strip_mentions("no mentions"), "no mentions");
    }
}
