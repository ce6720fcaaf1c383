//! Raw record → [`Candidate`] conversion.
//!
//! Nothing here can fail: malformed numbers become 0, malformed years
//! become `None`, missing strings become empty.

use crate::catalog::RawRecord;
use crate::models::Candidate;
use serde_json::Value;

/// Coerce a loosely typed catalog score into a non-negative integer.
///
/// Integers are taken as-is, floats and numeric strings are truncated,
/// anything else (including negative or non-finite values) is 0.
pub fn parse_score(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(number)) => match number.as_i64() {
            Some(int) => clamp_int(int),
            None => number.as_f64().map(truncate_float).unwrap_or(0),
        },
        Some(Value::String(text)) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(int) => clamp_int(int),
                Err(_) => text.parse::<f64>().map(truncate_float).unwrap_or(0),
            }
        }
        _ => 0,
    }
}

fn clamp_int(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn truncate_float(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX
    value.trunc() as u32
}

/// Year from the first four characters of an ISO-like date ("1985-04-01" → 1985).
pub fn parse_year(value: Option<&str>) -> Option<i32> {
    let prefix: String = value?.chars().take(4).collect();
    prefix.parse().ok()
}

/// Build a candidate from one record, adding the producing strategy's boost.
pub fn normalize(raw: &RawRecord, boost: u32) -> Candidate {
    let text = |value: Option<&str>| value.unwrap_or_default().to_string();

    Candidate {
        external_id: raw
            .id()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        name: text(raw.name()),
        artist_type: text(raw.artist_type()),
        country: text(raw.country()),
        disambiguation: text(raw.disambiguation()),
        catalog_score: parse_score(raw.score()).saturating_add(boost),
        formed_year: parse_year(raw.life_span_begin()),
        ended_year: parse_year(raw.life_span_end()),
        relevance_score: None,
    }
}
