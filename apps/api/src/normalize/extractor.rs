//! Response Extractor: removes markdown code fences from raw model output.

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Strips ```` ```json ```` / ```` ``` ```` fence markers from `raw` and trims the outer
/// whitespace. A marker swallows the rest of its line when that is only blanks, so
/// opening and closing fences leave the same single line break behind.
///
/// Markers inside double-quoted JSON strings are content, not fences, and are kept.
///
/// Runs to a fixpoint, so `strip_fences(&strip_fences(x)) == strip_fences(x)`.
pub fn strip_fences(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    loop {
        let next = remove_markers(&text).trim().to_string();
        if next == text {
            return text;
        }
        text = next;
    }
}

fn remove_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut in_string = false;
    let mut escaped = false;
    while let Some(c) = rest.chars().next() {
        if !in_string && rest.starts_with(FENCE) {
            rest = skip_marker_line(&rest[FENCE.len()..]);
            continue;
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Skips an optional `json` tag, trailing blanks and one line break after a marker.
fn skip_marker_line(rest: &str) -> &str {
    let rest = match rest.get(..JSON_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &rest[JSON_TAG.len()..],
        _ => rest,
    };
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest)
}
