// Shared prompt constants.
// Each feature module that calls the LLM defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Stricter instruction used for the single retry after an unparseable response.
pub const STRICT_JSON_SYSTEM: &str = "Your previous answer could not be parsed. \
    Respond with bare JSON only: no prose, no markdown, no code fences, no comments, \
    no trailing commas. Use straight double quotes for every key and string. \
    The first character of your answer must be the opening bracket of the JSON value \
    and the last character must be its closing bracket.";

/// Temperature for the strict retry, lower than the feature defaults.
pub const STRICT_TEMPERATURE: f32 = 0.2;

/// Substitutes each `{key}` placeholder of `template` in a single pass.
///
/// Only the template is scanned, so placeholder-like text inside a substituted value
/// (a resume mentioning `{jd_text}`) is copied verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(idx) = rest.find('{') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        let hit = values.iter().find(|(key, _)| {
            rest[1..]
                .strip_prefix(key)
                .is_some_and(|tail| tail.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &rest[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_every_placeholder() {
        let filled = fill_template(
            "R: {resume_text}\nJD: {jd_text}\nagain {jd_text}",
            &[("resume_text", "cv"), ("jd_text", "role")],
        );
        assert_eq!(filled, "R: cv\nJD: role\nagain role");
    }

    #[test]
    fn test_fill_template_does_not_expand_inside_values() {
        let filled = fill_template(
            "R: {resume_text}\nJD: {jd_text}",
            &[("resume_text", "see {jd_text} below"), ("jd_text", "Rust dev")],
        );
        assert_eq!(filled, "R: see {jd_text} below\nJD: Rust dev");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template("{\"score\": {n}} {x", &[("x", "y")]);
        assert_eq!(filled, "{\"score\": {n}} {x");
    }
}
