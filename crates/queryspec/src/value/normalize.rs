//! Value normalization for loosely typed builder input.
//!
//! Leaf builders accept whatever the caller hands them (chiefly strings from
//! untrusted text sources) and normalize it to the resolved field's type.
//! Numeric and boolean targets deliberately degrade on malformed input
//! instead of erroring; callers depend on the fallback values, so this
//! policy must not be tightened.

use crate::{error::Error, schema::FieldType, value::Value};
use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Normalize `value` to the shape of `ty`.
///
/// `Null` passes through untouched, as does any value whose variant already
/// matches the target. Everything else is rendered to text, digit-normalized,
/// and re-parsed per target type.
pub fn normalize(ty: FieldType, nullable: bool, value: Value) -> Result<Value, Error> {
    if matches!(value, Value::Null) || ty.accepts(&value) {
        return Ok(value);
    }

    let rendered = value
        .render_text()
        .ok_or_else(|| Error::value_conversion(value.variant_name(), ty.label()))?;
    let text = to_ascii_digits(&rendered);

    match ty {
        FieldType::Date => parse_date(&text)
            .map(Value::Date)
            .ok_or_else(|| Error::value_conversion(text.as_str(), ty.label())),
        FieldType::DateTime => parse_datetime(&text)
            .map(Value::DateTime)
            .ok_or_else(|| Error::value_conversion(text.as_str(), ty.label())),
        FieldType::Int | FieldType::Uint | FieldType::Float => Ok(parse_numeric(ty, &text)),
        FieldType::Bool => Ok(parse_bool(&text, nullable)),
        FieldType::Text => Ok(Value::Text(text)),
        FieldType::List(_) | FieldType::Nested(_) => {
            Err(Error::value_conversion(text.as_str(), ty.label()))
        }
    }
}

/// Map Persian and Arabic-Indic digits to ASCII and strip thousands
/// separators.
pub(crate) fn to_ascii_digits(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            ',' => None,
            '\u{06F0}'..='\u{06F9}' => {
                char::from_digit(c as u32 - 0x06F0, 10)
            }
            '\u{0660}'..='\u{0669}' => {
                char::from_digit(c as u32 - 0x0660, 10)
            }
            other => Some(other),
        })
        .collect()
}

/// Numeric targets never fail: malformed input falls back to the target
/// type's minimum representable value.
fn parse_numeric(ty: FieldType, text: &str) -> Value {
    let digits = strip_non_numeric(text);

    match ty {
        FieldType::Int => Value::Int(digits.parse().unwrap_or(i64::MIN)),
        FieldType::Uint => Value::Uint(digits.parse().unwrap_or(u64::MIN)),
        FieldType::Float => Value::Float(digits.parse().unwrap_or(f64::MIN)),
        _ => Value::Null,
    }
}

/// Keep ASCII digits and decimal points only, then drop leading and trailing
/// point runs. Signs are stripped along with everything else; that matches
/// the source policy for untrusted numeric text.
fn strip_non_numeric(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    kept.trim_matches('.').to_string()
}

fn parse_bool(text: &str, nullable: bool) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() && nullable {
        return Value::Null;
    }

    // Lenient fallback: anything that is not "true" reads as false,
    // including unparsable input.
    Value::Bool(trimmed.eq_ignore_ascii_case("true"))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_date(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0)))
}
