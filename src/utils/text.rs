//! Small text helpers shared by the source adapters, the synthesizer and the CLI.

use std::borrow::Cow;

/// Marker appended to content that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Cut `text` to at most `max_chars` characters, appending [`TRUNCATION_MARKER`]
/// when anything was removed. Counts `char`s, never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Cut `text` to at most `max_chars` characters without adding a marker.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Decode HTML character references such as `&amp;` or `&#8211;`.
/// Text holding a malformed reference (a bare `&`) comes back unchanged.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(text).unwrap_or(Cow::Borrowed(text))
}

/// Collapse every run of whitespace (including newlines) into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Human-readable duration: `350ms`, `2.4s`, `1.5min`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else {
        format!("{:.1}min", seconds / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_appends_marker() {
        assert_eq!(truncate_chars("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // Each of these is a multi-byte character
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
        assert_eq!(excerpt("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(
            decode_html_entities("Tom &amp; Jerry &ndash; caf&eacute; &#8220;1940&#8221;"),
            "Tom & Jerry \u{2013} caf\u{e9} \u{201c}1940\u{201d}"
        );
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
        assert!(matches!(decode_html_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  We study\n   mixture of\texperts  "),
            "We study mixture of experts"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.35), "350ms");
        assert_eq!(format_duration(2.44), "2.4s");
        assert_eq!(format_duration(90.0), "1.5min");
    }
}
