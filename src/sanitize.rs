use encoding_rs::WINDOWS_1252;
use quick_xml::escape::resolve_html5_entity;
use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));

/// Longest entity name in the HTML5 table (`&CounterClockwiseContourIntegral;`).
const MAX_ENTITY_NAME: usize = 32;

/// Entities that HTML also recognizes without the closing `;`.
const LEGACY_ENTITIES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil", "ETH",
    "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT", "Ntilde",
    "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN", "Uacute", "Ucirc",
    "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave", "amp", "aring", "atilde",
    "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg", "divide", "eacute", "ecirc",
    "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt", "iacute", "icirc", "iexcl", "igrave",
    "iquest", "iuml", "laquo", "lt", "macr", "micro", "middot", "nbsp", "not", "ntilde", "oacute",
    "ocirc", "ograve", "ordf", "ordm", "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot",
    "raquo", "reg", "sect", "shy", "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc",
    "ugrave", "uml", "uuml", "yacute", "yen", "yuml",
];

/// Removes markdown emphasis markers and decodes HTML character references.
///
/// `**bold**` and `*italic*` lose their asterisks, then named (`&amp;`), decimal (`&#38;`)
/// and hexadecimal (`&#x26;`) references are decoded. Anything that is not a recognizable
/// reference is kept as written, so the function never fails.
///
/// ```
/// use pptx_layout_scribe::escape;
///
/// assert_eq!(escape(Some("**Q3** results &amp; *outlook*")), "Q3 results & outlook");
/// assert_eq!(escape(None), "");
/// ```
pub fn escape(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return String::new();
    };

    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        match decode_reference(after) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes the reference following a `&`, returning the text and the number of bytes consumed.
fn decode_reference(input: &str) -> Option<(String, usize)> {
    if let Some(numeric) = input.strip_prefix('#') {
        let (digits, radix, prefix_len) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };

        let len = digits.chars().take_while(|c| c.is_digit(radix)).count();
        if len == 0 {
            return None;
        }

        let decoded = decode_code_point(u32::from_str_radix(&digits[..len], radix).ok());
        let terminated = digits[len..].starts_with(';');
        return Some((decoded, prefix_len + len + usize::from(terminated)));
    }

    let name_len = input
        .char_indices()
        .take(MAX_ENTITY_NAME)
        .take_while(|&(_, c)| !matches!(c, '\t' | '\n' | '\x0C' | ' ' | '<' | '&' | '#' | ';'))
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    let name = &input[..name_len];

    if input[name_len..].starts_with(';') {
        if let Some(decoded) = resolve_html5_entity(name) {
            return Some((decoded.to_string(), name_len + 1));
        }
    }

    // Without a match, the longest legacy name at the start wins: `&copy2024` is `©2024`.
    (2..=name_len)
        .rev()
        .filter(|&end| name.is_char_boundary(end))
        .map(|end| &name[..end])
        .find(|prefix| LEGACY_ENTITIES.contains(prefix))
        .and_then(|prefix| resolve_html5_entity(prefix).map(|decoded| (decoded.to_string(), prefix.len())))
}

/// Maps a numeric reference to its text the way HTML parsers do.
///
/// `None` stands for a number too large for `u32`.
fn decode_code_point(code: Option<u32>) -> String {
    let Some(code) = code else {
        return char::REPLACEMENT_CHARACTER.to_string();
    };

    match code {
        0 => char::REPLACEMENT_CHARACTER.to_string(),
        0x0D => "\r".to_string(),
        // C1 controls are read as Windows-1252 bytes (`&#150;` is an en dash).
        0x80..=0x9F => WINDOWS_1252.decode_without_bom_handling(&[code as u8]).0.into_owned(),
        0xD800..=0xDFFF | 0x11_0000.. => char::REPLACEMENT_CHARACTER.to_string(),
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => String::new(),
        c if c & 0xFFFE == 0xFFFE => String::new(),
        c => char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bold() {
        assert_eq!(escape(Some("**bold**")), "bold");
    }

    #[test]
    fn test_strips_italic() {
        assert_eq!(escape(Some("*italic*")), "italic");
    }

    #[test]
    fn test_decodes_named_entity() {
        assert_eq!(escape(Some("&amp;")), "&");
        assert_eq!(escape(Some("&lt;b&gt; &eacute;t&eacute;")), "<b> été");
    }

    #[test]
    fn test_empty_and_absent() {
        assert_eq!(escape(Some("")), "");
        assert_eq!(escape(None), "");
    }

    #[test]
    fn test_decodes_numeric_references() {
        assert_eq!(escape(Some("&#38;&#x26;&#X41;&#169;")), "&&A©");
        assert_eq!(escape(Some("&#0;")), "\u{FFFD}");
        assert_eq!(escape(Some("&#xD800;")), "\u{FFFD}");
        assert_eq!(escape(Some("&#65 and")), "A and");
    }

    #[test]
    fn test_decodes_legacy_entities_without_semicolon() {
        assert_eq!(escape(Some("Fish &amp chips &copy2024 &lt;b&gt")), "Fish & chips ©2024 <b>");
        assert_eq!(escape(Some("&notit; &ampx &AMP")), "¬it; &x &");
        // Only the legacy set may drop the semicolon.
        assert_eq!(escape(Some("&hearts &hearts;")), "&hearts ♥");
    }

    #[test]
    fn test_numeric_references_in_c1_range_use_windows_1252() {
        assert_eq!(escape(Some("&#128; &#150; &#x9F;")), "€ – Ÿ");
        assert_eq!(escape(Some("&#x81;")), "\u{81}");
    }

    #[test]
    fn test_numeric_references_to_invalid_code_points() {
        assert_eq!(escape(Some("a&#1;b&#x7F;c&#xFFFF;d&#xFDD0;")), "abcd");
        assert_eq!(escape(Some("&#13;")), "\r");
        assert_eq!(escape(Some("&#x110000; &#99999999999;")), "\u{FFFD} \u{FFFD}");
    }

    #[test]
    fn test_unknown_references_pass_through() {
        assert_eq!(escape(Some("AT&T &bogus; & &# &;")), "AT&T &bogus; & &# &;");
    }

    #[test]
    fn test_mixed_markers() {
        // The dangling `**` is consumed as an empty italic span.
        assert_eq!(escape(Some("**a** and *b* and **c")), "a and b and c");
    }

    #[test]
    fn test_malformed_markers_do_not_panic() {
        for input in ["*", "**", "***", "****x", "*a**b*", "**\n**", "&", "&#x;"] {
            let _ = escape(Some(input));
        }
    }
}
