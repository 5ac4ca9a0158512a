//! Duration coercion and formatting for manifest entries.

use serde_json::Value;

/// Shown when a record has no usable duration.
pub const UNKNOWN_DURATION: &str = "unknown";

/// Coerces a JSON duration (number or numeric string) to seconds.
///
/// Returns `None` for missing, non-numeric, non-finite, or negative values.
pub fn coerce_seconds(value: Option<&Value>) -> Option<f64> {
    let secs = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

/// `h:mm:ss` at or above one hour, else `m:ss`. Fractional seconds are dropped.
pub fn format_duration(secs: f64) -> String {
    let total = secs.floor() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Formatted duration, or [`UNKNOWN_DURATION`].
pub fn format_optional(secs: Option<f64>) -> String {
    secs.map(format_duration)
        .unwrap_or_else(|| UNKNOWN_DURATION.to_string())
}
