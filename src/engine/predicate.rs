//! Total predicates over a single JSON field.
//!
//! Every predicate returns `false` for a missing field or an unexpected JSON
//! type; none of them panic.

use chrono::{DateTime, NaiveDateTime};
use reqwest::Url;
use serde_json::Value;

use super::document::Field;

/// How strictly a URL-valued field is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStrictness {
    /// Must parse as an absolute URL with a host.
    Absolute,
    /// Legacy check: non-empty and starts with `http`.
    HttpPrefix,
}

/// Date-time layouts accepted when no UTC offset is present.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

pub fn is_present(v: Field<'_>) -> bool {
    !v.is_missing()
}

pub fn is_non_empty_string(v: Field<'_>) -> bool {
    matches!(v, Field::Present(Value::String(s)) if !s.is_empty())
}

pub fn is_number(v: Field<'_>) -> bool {
    as_f64(v).is_some()
}

pub fn is_positive_number(v: Field<'_>) -> bool {
    as_f64(v).is_some_and(|n| n > 0.0)
}

/// A JSON number with no fractional part. `2.0` counts as an integer.
pub fn is_integer(v: Field<'_>) -> bool {
    as_integer(v).is_some()
}

pub fn is_non_negative_integer(v: Field<'_>) -> bool {
    as_integer(v).is_some_and(|n| n >= 0.0)
}

pub fn is_positive_integer(v: Field<'_>) -> bool {
    as_integer(v).is_some_and(|n| n > 0.0)
}

/// RFC 3339 with an offset, or an ISO 8601 date-time without one.
///
/// Only strings qualify; date-only and free-form dates are rejected.
pub fn is_iso8601_timestamp(v: Field<'_>) -> bool {
    let Field::Present(Value::String(s)) = v else {
        return false;
    };
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
}

pub fn is_well_formed_url(v: Field<'_>, strictness: UrlStrictness) -> bool {
    let Field::Present(Value::String(s)) = v else {
        return false;
    };
    match strictness {
        UrlStrictness::Absolute => Url::parse(s).is_ok_and(|url| url.has_host()),
        UrlStrictness::HttpPrefix => !s.is_empty() && s.starts_with("http"),
    }
}

pub fn is_one_of(v: Field<'_>, allowed: &[&str]) -> bool {
    matches!(v, Field::Present(Value::String(s)) if allowed.contains(&s.as_str()))
}

pub fn is_array(v: Field<'_>) -> bool {
    matches!(v, Field::Present(Value::Array(_)))
}

pub fn is_non_empty_array(v: Field<'_>) -> bool {
    matches!(v, Field::Present(Value::Array(items)) if !items.is_empty())
}

pub fn is_object(v: Field<'_>) -> bool {
    matches!(v, Field::Present(Value::Object(_)))
}

/// Sort direction of a sequence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Non-decreasing.
    Ascending,
    /// Non-increasing.
    Descending,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
        }
    }
}

/// Index of the first element whose `field` breaks `direction` relative to
/// its predecessor. `None` when every adjacent pair is in order.
///
/// Ties are in order. A non-numeric value on either side of a pair counts as
/// a break.
pub fn first_out_of_order(elements: &[Value], field: &str, direction: Direction) -> Option<usize> {
    elements
        .windows(2)
        .position(|pair| {
            let prev = as_f64(Field::from_option(pair[0].get(field)));
            let cur = as_f64(Field::from_option(pair[1].get(field)));
            let in_order = match (prev, cur, direction) {
                (Some(p), Some(c), Direction::Descending) => c <= p,
                (Some(p), Some(c), Direction::Ascending) => c >= p,
                _ => false,
            };
            !in_order
        })
        .map(|i| i + 1)
}

/// Numeric value of a field, if it is a JSON number.
pub fn as_f64(v: Field<'_>) -> Option<f64> {
    match v {
        Field::Present(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn as_integer(v: Field<'_>) -> Option<f64> {
    as_f64(v).filter(|n| n.fract() == 0.0)
}
