//! Coercion fallbacks.
//!
//! Dirty data must still render, so unparsable numbers become 0 and unknown
//! stance tags become neutral instead of failing the record. The same rules
//! back both the CSV normalizers and the lenient serde readers used for JSON.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::TEXT_SEPARATOR;
use crate::types::{Stance, TaggedText};

static TAGGED_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^(.*)\((apoio|oposicao|neutralidade)\)$").expect("tagged text pattern")
});

/// Parse a finite number; surrounding whitespace is ignored
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative count. Fractions truncate toward zero.
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    count_from_f64(parse_number(raw)?)
}

pub(crate) fn count_from_f64(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 {
        Some(v.trunc() as u64)
    } else {
        None
    }
}

/// Stance counts are never negative
pub(crate) fn clamp_amount(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

pub fn coerce_count(raw: &str) -> u64 {
    parse_count(raw).unwrap_or(0)
}

pub fn coerce_amount(raw: &str) -> f64 {
    parse_number(raw).map(clamp_amount).unwrap_or(0.0)
}

/// Split a flattened `texts` cell. Blank cells yield no texts.
pub fn split_texts(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(TEXT_SEPARATOR)
        .map(|segment| segment.trim().to_string())
        .collect()
}

/// Read one `label(category)` segment. Untagged segments fall back to neutral.
pub fn parse_tagged_text(segment: &str) -> TaggedText {
    let segment = segment.trim();
    match TAGGED_TEXT.captures(segment) {
        Some(caps) => TaggedText {
            text: caps[1].trim().to_string(),
            stance: Stance::from_tag(&caps[2]).unwrap_or_default(),
        },
        None => TaggedText {
            text: segment.to_string(),
            stance: Stance::Neutral,
        },
    }
}

/// Whether a segment carries an explicit stance tag
pub fn is_tagged(segment: &str) -> bool {
    TAGGED_TEXT.is_match(segment.trim())
}

pub fn split_tagged_texts(raw: &str) -> Vec<TaggedText> {
    split_texts(raw)
        .iter()
        .map(|segment| parse_tagged_text(segment))
        .collect()
}

/// Lenient serde readers for JSON datasets.
///
/// Numbers may arrive as strings, ids as numbers, and anything may be `null`.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::*;
    use crate::types::Position;

    fn value_to_string(value: Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    fn value_to_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => parse_number(s),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(value_to_string(Value::deserialize(d)?))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value_to_number(&value)
            .and_then(count_from_f64)
            .unwrap_or(0))
    }

    pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value_to_number(&value).map(clamp_amount).unwrap_or(0.0))
    }

    pub fn optional_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value_to_number(&value).map(clamp_amount))
    }

    pub fn stance<'de, D: Deserializer<'de>>(d: D) -> Result<Stance, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::String(s) => Stance::from_tag(&s).unwrap_or_default(),
            _ => Stance::Neutral,
        })
    }

    pub fn texts<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(value_to_string)
                .collect(),
            Value::String(s) => split_texts(&s),
            _ => Vec::new(),
        })
    }

    pub fn tagged_texts<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<TaggedText>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Null => None,
                    Value::String(s) => Some(parse_tagged_text(&s)),
                    Value::Object(mut obj) => Some(TaggedText {
                        text: obj.remove("text").map(value_to_string).unwrap_or_default(),
                        stance: obj
                            .get("type")
                            .and_then(|t| t.as_str())
                            .and_then(Stance::from_tag)
                            .unwrap_or_default(),
                    }),
                    other => Some(TaggedText {
                        text: other.to_string(),
                        stance: Stance::Neutral,
                    }),
                })
                .collect(),
            Value::String(s) => split_tagged_texts(&s),
            _ => Vec::new(),
        })
    }

    pub fn position<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Position>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(obj) => {
                let coord = |key: &str| obj.get(key).and_then(value_to_number).unwrap_or(0.0);
                Some(Position {
                    x: coord("x"),
                    y: coord("y"),
                })
            }
            _ => None,
        })
    }
}
