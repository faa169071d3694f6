//! Text-to-value coercion rules.
//!
//! Numbers are validated by round-tripping rather than by grammar: an integer
//! must re-serialize to exactly the text it came from, and a float must survive
//! a trip through fixed six-decimal text without drifting more than [`EPSILON`].

use std::path::Path;

/// Allowed drift for the float round-trip check.
pub const EPSILON: f64 = 1e-6;

const TRUE_WORDS: [&str; 6] = ["t", "true", "y", "yes", "1", "on"];
const FALSE_WORDS: [&str; 6] = ["f", "false", "n", "no", "0", "off"];

/// Case-insensitive boolean words.
pub fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        return Some(true);
    }
    if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        return Some(false);
    }
    tracing::debug!(value = text, "invalid boolean");
    None
}

/// A 32-bit integer whose canonical text is exactly `text`.
///
/// Leading zeros, an explicit `+`, `-0` and anything with a fraction are rejected.
pub fn parse_int(text: &str) -> Option<i32> {
    let value = match text.parse::<i32>() {
        Ok(v) => v,
        Err(_) => {
            tracing::debug!(value = text, "invalid integer");
            return None;
        }
    };
    if value.to_string() != text {
        tracing::debug!(value = text, "integer does not round-trip");
        return None;
    }
    Some(value)
}

pub fn parse_float(text: &str) -> Option<f32> {
    let first = text.parse::<f32>().ok();
    let second = first.and_then(|v| format!("{v:.6}").parse::<f32>().ok());
    match (first, second) {
        (Some(a), Some(b)) if f64::from((a - b).abs()) <= EPSILON => Some(a),
        _ => {
            tracing::debug!(value = text, "invalid float");
            None
        }
    }
}

pub fn parse_double(text: &str) -> Option<f64> {
    let first = text.parse::<f64>().ok();
    let second = first.and_then(|v| format!("{v:.6}").parse::<f64>().ok());
    match (first, second) {
        (Some(a), Some(b)) if (a - b).abs() <= EPSILON => Some(a),
        _ => {
            tracing::debug!(value = text, "invalid double");
            None
        }
    }
}

/// Whether `path` names something on the local filesystem.
///
/// Any error while probing counts as "does not exist".
pub fn file_exists(path: &str) -> bool {
    Path::new(path).exists()
}
