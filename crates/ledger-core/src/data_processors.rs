use serde_json::Value;
use tracing::trace;

use crate::models::Amount;

// ── AmountProcessor ───────────────────────────────────────────────────────────

/// Coerces raw cell values into [`Amount`]s.
pub struct AmountProcessor;

impl AmountProcessor {
    /// Coerce a raw cell into an [`Amount`]. Never fails.
    ///
    /// Handles:
    /// * `null` / absent → missing
    /// * JSON number     → the value, when finite and non-negative
    /// * JSON string     → trimmed and parsed as `f64`; empty or
    ///   non-numeric text is missing
    /// * anything else   → missing
    pub fn coerce(value: Option<&Value>) -> Amount {
        match value {
            None | Some(Value::Null) => Amount::MISSING,
            Some(Value::Number(n)) => n.as_f64().map(Amount::new).unwrap_or(Amount::MISSING),
            Some(Value::String(s)) => Self::coerce_str(s),
            Some(_) => Amount::MISSING,
        }
    }

    fn coerce_str(s: &str) -> Amount {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Amount::MISSING;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Amount::new(v),
            Err(_) => {
                trace!("AmountProcessor: non-numeric cell \"{}\"", trimmed);
                Amount::MISSING
            }
        }
    }
}

// ── YearProcessor ─────────────────────────────────────────────────────────────

/// Parses the filing year column.
pub struct YearProcessor;

impl YearProcessor {
    /// Accepts an integer, an integral float (`2024.0`, as spreadsheets
    /// export) or a numeric string. Returns `None` for anything else.
    pub fn parse(value: Option<&Value>) -> Option<i32> {
        match value? {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i32::try_from(i).ok()
                } else {
                    n.as_f64().and_then(Self::from_integral_f64)
                }
            }
            Value::String(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i32>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(Self::from_integral_f64))
            }
            _ => None,
        }
    }

    fn from_integral_f64(f: f64) -> Option<i32> {
        if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
            Some(f as i32)
        } else {
            None
        }
    }
}

// ── FieldExtractor ────────────────────────────────────────────────────────────

/// Looks up row cells under the several header spellings the source
/// datasets use.
pub struct FieldExtractor;

impl FieldExtractor {
    /// Return the first present, non-null cell among `keys`.
    pub fn find_value<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|&key| row.get(key))
            .find(|v| !v.is_null())
    }

    /// Return the first non-blank text cell among `keys`, trimmed.
    ///
    /// Numbers are rendered to text so an all-numeric precinct such as `1`
    /// still reads as `"1"`.
    pub fn find_text(row: &Value, keys: &[&str]) -> Option<String> {
        for &key in keys {
            let text = match row.get(key) {
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => continue,
            };
            if !text.is_empty() {
                return Some(text);
            }
        }
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
