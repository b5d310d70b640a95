//! Field probing and coercion used by every schema normalizer.
//!
//! A target field is described by an ordered candidate table: the key paths that
//! different prompt revisions have used for it, canonical key first. Numeric candidates
//! also carry the scale the model expresses them in, so a `0.85` fraction and an `85`
//! percent both land on the same bounded value.

use serde_json::Value;

/// Band a qualitative "low" confidence maps to, in percent.
pub const LOW_CONFIDENCE: u32 = 40;
/// Band a qualitative "medium" confidence maps to, in percent.
pub const MEDIUM_CONFIDENCE: u32 = 70;
/// Band a qualitative "high" confidence maps to, in percent.
pub const HIGH_CONFIDENCE: u32 = 90;

/// A key path from the root of a parsed object, e.g. `&["analysis", "atsScore"]`.
pub type KeyPath = &'static [&'static str];

/// The scale a numeric source key is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// 0-100
    Percent,
    /// 0.0-1.0
    Fraction,
}

/// One numeric candidate: where to look and what scale the value is in.
#[derive(Debug, Clone, Copy)]
pub struct NumericKey {
    pub path: KeyPath,
    pub scale: Scale,
}

pub const fn percent_key(path: KeyPath) -> NumericKey {
    NumericKey {
        path,
        scale: Scale::Percent,
    }
}

pub const fn fraction_key(path: KeyPath) -> NumericKey {
    NumericKey {
        path,
        scale: Scale::Fraction,
    }
}

/// Follows `path` from `root`, treating JSON `null` as absent.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = current.get(*segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// First non-empty string found among `candidates`, trimmed; `default` otherwise.
/// Numbers and booleans are accepted and rendered as text.
pub fn text(root: &Value, candidates: &[KeyPath], default: &str) -> String {
    opt_text(root, candidates).unwrap_or_else(|| default.to_string())
}

/// Like `text` but without a default.
pub fn opt_text(root: &Value, candidates: &[KeyPath]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|path| lookup(root, path))
        .find_map(as_text)
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// First list found among `candidates`, as trimmed non-empty strings.
///
/// Accepts a JSON array of scalars, or a single comma/newline separated string.
pub fn text_list(root: &Value, candidates: &[KeyPath]) -> Vec<String> {
    opt_text_list(root, candidates).unwrap_or_default()
}

/// Like `text_list`, but `None` when no candidate holds a list.
pub fn opt_text_list(root: &Value, candidates: &[KeyPath]) -> Option<Vec<String>> {
    candidates
        .iter()
        .filter_map(|path| lookup(root, path))
        .find_map(|value| match value {
            Value::Array(items) => Some(items.iter().filter_map(as_text).collect()),
            Value::String(s) if !s.trim().is_empty() => Some(
                s.split([',', '\n'])
                    .map(|part| part.trim().trim_start_matches(['-', '*']).trim())
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            _ => None,
        })
}

/// Elements of the first array found among `candidates` (non-array candidates are skipped).
pub fn items<'a>(root: &'a Value, candidates: &[KeyPath]) -> &'a [Value] {
    candidates
        .iter()
        .filter_map(|path| lookup(root, path))
        .find_map(|value| value.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First object found among `candidates`.
pub fn object<'a>(root: &'a Value, candidates: &[KeyPath]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|path| lookup(root, path))
        .find(|value| value.is_object())
}

/// First usable numeric candidate as an integer percent in [0, 100].
pub fn percent(root: &Value, candidates: &[NumericKey]) -> Option<u32> {
    candidates.iter().find_map(|key| {
        lookup(root, key.path).and_then(|value| to_percent(value, key.scale))
    })
}

/// First usable numeric candidate as a fraction in [0, 1].
pub fn fraction(root: &Value, candidates: &[NumericKey]) -> Option<f64> {
    candidates.iter().find_map(|key| {
        lookup(root, key.path).and_then(|value| to_fraction(value, key.scale))
    })
}

/// Coerces a number, numeric string (`"85"`, `"85%"`) or confidence label to a percent.
///
/// A strictly fractional value (between 0 and 1) in a percent field was written as a
/// fraction and is scaled up; whole numbers are taken as percents.
pub fn to_percent(value: &Value, scale: Scale) -> Option<u32> {
    if let Some(band) = confidence_label(value) {
        return Some(band);
    }
    let n = number(value)?;
    let n = match scale {
        Scale::Fraction if n <= 1.0 => n * 100.0,
        Scale::Percent if n > 0.0 && n < 1.0 => n * 100.0,
        _ => n,
    };
    Some(n.clamp(0.0, 100.0).round() as u32)
}

/// Coerces a number, numeric string or confidence label to a fraction in [0, 1].
pub fn to_fraction(value: &Value, scale: Scale) -> Option<f64> {
    if let Some(band) = confidence_label(value) {
        return Some(f64::from(band) / 100.0);
    }
    let n = number(value)?;
    let n = match scale {
        Scale::Percent if n > 0.0 && n < 1.0 => n,
        Scale::Percent => n / 100.0,
        // A "fraction" above 1 was written as a percent.
        Scale::Fraction if n > 1.0 => n / 100.0,
        Scale::Fraction => n,
    };
    Some(n.clamp(0.0, 1.0))
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Maps "low" / "medium" / "high" (case-insensitive, substring) to a percent band.
pub fn confidence_label(value: &Value) -> Option<u32> {
    let label = value.as_str()?.to_lowercase();
    if label.contains("high") {
        Some(HIGH_CONFIDENCE)
    } else if label.contains("medium") || label.contains("moderate") {
        Some(MEDIUM_CONFIDENCE)
    } else if label.contains("low") {
        Some(LOW_CONFIDENCE)
    } else {
        None
    }
}

/// Rounds to 2 decimals so fractions stay stable when re-normalized.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCORE: &[NumericKey] = &[
        percent_key(&["analysis", "ats_score"]),
        percent_key(&["ATS_Score"]),
        fraction_key(&["ats"]),
    ];

    #[test]
    fn test_lookup_nested_and_null() {
        let v = json!({"a": {"b": 1, "c": null}});
        assert_eq!(lookup(&v, &["a", "b"]), Some(&json!(1)));
        assert_eq!(lookup(&v, &["a", "c"]), None);
        assert_eq!(lookup(&v, &["a", "missing"]), None);
    }

    #[test]
    fn test_percent_candidates_in_order() {
        let v = json!({"ATS_Score": 55, "analysis": {"ats_score": 80}});
        assert_eq!(percent(&v, SCORE), Some(80));
        let v = json!({"ATS_Score": "55%"});
        assert_eq!(percent(&v, SCORE), Some(55));
    }

    #[test]
    fn test_percent_skips_unusable_candidates() {
        let v = json!({"analysis": {"ats_score": "n/a"}, "ats": 0.62});
        assert_eq!(percent(&v, SCORE), Some(62));
    }

    #[test]
    fn test_percent_clamps() {
        assert_eq!(to_percent(&json!(140), Scale::Percent), Some(100));
        assert_eq!(to_percent(&json!(-3), Scale::Percent), Some(0));
        assert_eq!(to_percent(&json!(72.6), Scale::Percent), Some(73));
    }

    #[test]
    fn test_fractional_value_in_percent_field_is_scaled() {
        assert_eq!(to_percent(&json!(0.85), Scale::Percent), Some(85));
        assert_eq!(to_percent(&json!("0.5"), Scale::Percent), Some(50));
        assert_eq!(to_percent(&json!(1), Scale::Percent), Some(1));
        assert_eq!(to_percent(&json!(0), Scale::Percent), Some(0));
        let v = json!({"ATS_Score": 0.85});
        assert_eq!(percent(&v, SCORE), Some(85));
        assert_eq!(to_fraction(&json!(0.85), Scale::Percent), Some(0.85));
    }

    #[test]
    fn test_fraction_scaling() {
        assert_eq!(to_fraction(&json!(0.8), Scale::Fraction), Some(0.8));
        assert_eq!(to_fraction(&json!(85), Scale::Fraction), Some(0.85));
        assert_eq!(to_fraction(&json!(50), Scale::Percent), Some(0.5));
        assert_eq!(to_fraction(&json!(7.5), Scale::Fraction), Some(0.075));
        assert_eq!(to_fraction(&json!(-1), Scale::Fraction), Some(0.0));
    }

    #[test]
    fn test_confidence_labels_ordered() {
        let high = to_percent(&json!("High"), Scale::Percent).unwrap();
        let medium = to_percent(&json!("medium"), Scale::Percent).unwrap();
        let low = to_percent(&json!("LOW"), Scale::Percent).unwrap();
        assert!(high > medium && medium > low);
        assert_eq!((high, medium, low), (90, 70, 40));

        let high = to_fraction(&json!("high"), Scale::Fraction).unwrap();
        let medium = to_fraction(&json!("medium"), Scale::Fraction).unwrap();
        let low = to_fraction(&json!("low"), Scale::Fraction).unwrap();
        assert!(high > medium && medium > low);
    }

    #[test]
    fn test_unknown_label_is_unusable() {
        assert_eq!(to_percent(&json!("certain"), Scale::Percent), None);
        assert_eq!(to_percent(&json!({"v": 1}), Scale::Percent), None);
    }

    #[test]
    fn test_text_trims_and_skips_empty() {
        let v = json!({"a": "   ", "b": "  hello ", "c": 3});
        assert_eq!(text(&v, &[&["a"], &["b"]], "dflt"), "hello");
        assert_eq!(text(&v, &[&["a"]], "dflt"), "dflt");
        assert_eq!(text(&v, &[&["c"]], "dflt"), "3");
    }

    #[test]
    fn test_text_list_from_array_and_string() {
        let v = json!({"arr": ["rust", " ", 5, {"x": 1}], "s": "docker, k8s\n- terraform"});
        assert_eq!(text_list(&v, &[&["arr"]]), vec!["rust", "5"]);
        assert_eq!(text_list(&v, &[&["s"]]), vec!["docker", "k8s", "terraform"]);
        assert!(text_list(&v, &[&["missing"]]).is_empty());
        assert_eq!(opt_text_list(&v, &[&["missing"]]), None);
    }

    #[test]
    fn test_items_skips_non_arrays() {
        let v = json!({"recs": "none", "Recs": [{"a": 1}]});
        assert_eq!(items(&v, &[&["recs"], &["Recs"]]).len(), 1);
        assert!(items(&v, &[&["recs"]]).is_empty());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.8549), 0.85);
        assert_eq!(round2(1.0), 1.0);
    }
}
