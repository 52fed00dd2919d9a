//! Scalar typing: implicit resolution of plain scalars and the `!!` core tags.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use regex::Regex;

use super::value::Value;
use crate::errors::{Result, VaultError};

const NULL_WORDS: &[&str] = &["", "~", "null", "Null", "NULL"];
const TRUE_WORDS: &[&str] = &["true", "True", "TRUE", "yes", "Yes", "YES", "on", "On", "ON"];
const FALSE_WORDS: &[&str] = &["false", "False", "FALSE", "no", "No", "NO", "off", "Off", "OFF"];

/// (pattern, radix) pairs tried in order; the sign and digits are captured.
const INT_PATTERNS: &[(&str, u32)] = &[
    (r"^([-+]?)0b([01_]+)$", 2),
    (r"^([-+]?)0x([0-9a-fA-F_]+)$", 16),
    (r"^([-+]?)0o([0-7_]+)$", 8),
    (r"^([-+]?)0([0-7_]+)$", 8),
    (r"^([-+]?)(0|[1-9][0-9_]*)$", 10),
];

static INT_RES: LazyLock<Vec<(Regex, u32)>> = LazyLock::new(|| {
    INT_PATTERNS
        .iter()
        .map(|(pattern, radix)| (Regex::new(pattern).expect("valid int pattern"), *radix))
        .collect()
});

static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9][0-9_]*(\.[0-9_]*)?)([eE][-+]?[0-9]+)?$")
        .expect("valid float pattern")
});

static INF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-+]?)\.(inf|Inf|INF)$").expect("valid inf pattern"));

static NAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.(nan|NaN|NAN)$").expect("valid nan pattern"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date pattern"));

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[Tt]|\s+)(\d{1,2}):(\d{2}):(\d{2})(?:\.(\d*))?\s*(Z|[-+]\d{1,2}(?::?\d{2})?)?$",
    )
    .expect("valid timestamp pattern")
});

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([^\s:].*)$").expect("valid symbol pattern"));

/// Type a plain, untagged scalar the way a YAML 1.1 safe loader does.
///
/// Anything that matches no implicit type stays a string.
pub fn resolve_plain(text: &str) -> Value {
    if NULL_WORDS.contains(&text) {
        return Value::Null;
    }
    if let Some(b) = parse_bool(text) {
        return Value::Bool(b);
    }
    if is_int_syntax(text) {
        // Integer-shaped but out of range for i64: keep the text.
        return parse_int(text).map_or_else(|| Value::String(text.to_string()), Value::Int);
    }
    if let Some(f) = parse_float(text) {
        return Value::Float(f);
    }
    if let Some(ts) = parse_timestamp(text) {
        return Value::Timestamp(ts);
    }
    if let Some(date) = parse_date(text) {
        return Value::Date(date);
    }
    if let Some(caps) = SYMBOL_RE.captures(text) {
        return Value::Symbol(caps[1].to_string());
    }
    Value::String(text.to_string())
}

/// Whether `tag` is one of the YAML core tags handled by `resolve_core`.
pub fn is_core_scalar_tag(tag: &str) -> bool {
    matches!(
        tag,
        "!" | "!!str"
            | "!!int"
            | "!!float"
            | "!!bool"
            | "!!null"
            | "!!binary"
            | "!!timestamp"
    )
}

/// Apply an explicit core tag to a scalar's text.
///
/// Text that cannot be read as the tagged type is `MalformedDocument`.
pub fn resolve_core(tag: &str, text: &str) -> Result<Value> {
    let invalid = || VaultError::MalformedDocument(format!("invalid {tag} scalar"));

    match tag {
        "!" | "!!str" => Ok(Value::String(text.to_string())),
        "!!null" => Ok(Value::Null),
        "!!bool" => parse_bool(text).map(Value::Bool).ok_or_else(invalid),
        "!!int" => parse_int(text).map(Value::Int).ok_or_else(invalid),
        "!!float" => parse_float(text)
            .or_else(|| parse_int(text).map(|i| i as f64))
            .map(Value::Float)
            .ok_or_else(invalid),
        "!!binary" => {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            BASE64.decode(compact).map(Value::Binary).map_err(|_| invalid())
        }
        "!!timestamp" => parse_timestamp(text)
            .or_else(|| parse_date(text).and_then(midnight_utc))
            .map(Value::Timestamp)
            .ok_or_else(invalid),
        _ => Err(VaultError::MalformedDocument(format!("unsupported core tag {tag}"))),
    }
}

// ---------------------------------------------------------------------------
// Individual types
// ---------------------------------------------------------------------------

fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_WORDS.contains(&text) {
        Some(true)
    } else if FALSE_WORDS.contains(&text) {
        Some(false)
    } else {
        None
    }
}

fn is_int_syntax(text: &str) -> bool {
    INT_RES.iter().any(|(re, _)| re.is_match(text))
}

fn parse_int(text: &str) -> Option<i64> {
    let (caps, radix) = INT_RES
        .iter()
        .find_map(|(re, radix)| re.captures(text).map(|caps| (caps, *radix)))?;

    let digits: String = caps[2].chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = i128::from_str_radix(&digits, radix).ok()?;
    let signed = if &caps[1] == "-" { -magnitude } else { magnitude };
    i64::try_from(signed).ok()
}

fn parse_float(text: &str) -> Option<f64> {
    if let Some(caps) = INF_RE.captures(text) {
        return Some(if &caps[1] == "-" { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    if NAN_RE.is_match(text) {
        return Some(f64::NAN);
    }
    if !FLOAT_RE.is_match(text) {
        return None;
    }
    text.replace('_', "").parse().ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(text)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let caps = TIMESTAMP_RE.captures(text)?;

    let date =
        NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)?;

    let nanos = match caps.get(7) {
        Some(frac) => {
            let digits: String = frac.as_str().chars().chain(std::iter::repeat('0')).take(9).collect();
            digits.parse().ok()?
        }
        None => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(
        caps[4].parse().ok()?,
        caps[5].parse().ok()?,
        caps[6].parse().ok()?,
        nanos,
    )?;

    let offset = match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") => FixedOffset::east_opt(0)?,
        Some(tz) => parse_offset(tz)?,
    };
    offset.from_local_datetime(&date.and_time(time)).single()
}

/// `+h`, `-hh`, `+hh:mm` or `+hhmm`.
fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, rest) = tz.split_at(1);
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() > 2 => rest.split_at(rest.len() - 2),
        None => (rest, "0"),
    };
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    FixedOffset::east_opt(if sign == "-" { -seconds } else { seconds })
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    let utc = FixedOffset::east_opt(0)?;
    utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn nulls_and_bools() {
        assert_eq!(resolve_plain(""), Value::Null);
        assert_eq!(resolve_plain("~"), Value::Null);
        assert_eq!(resolve_plain("NULL"), Value::Null);
        assert_eq!(resolve_plain("yes"), Value::Bool(true));
        assert_eq!(resolve_plain("Off"), Value::Bool(false));
        assert_eq!(resolve_plain("tRuE"), Value::String("tRuE".into()));
    }

    #[test]
    fn integers() {
        assert_eq!(resolve_plain("42"), Value::Int(42));
        assert_eq!(resolve_plain("-1_000"), Value::Int(-1000));
        assert_eq!(resolve_plain("0x1F"), Value::Int(31));
        assert_eq!(resolve_plain("0o17"), Value::Int(15));
        assert_eq!(resolve_plain("017"), Value::Int(15));
        assert_eq!(resolve_plain("0b101"), Value::Int(5));
        assert_eq!(resolve_plain("0"), Value::Int(0));
    }

    #[test]
    fn oversized_integer_stays_string() {
        let big = "123456789012345678901234567890";
        assert_eq!(resolve_plain(big), Value::String(big.into()));
        assert_eq!(resolve_plain("-9223372036854775809"), Value::String("-9223372036854775809".into()));
        assert_eq!(resolve_plain("0x1FFFFFFFFFFFFFFFFF"), Value::String("0x1FFFFFFFFFFFFFFFFF".into()));
        assert_eq!(resolve_plain("-9223372036854775808"), Value::Int(i64::MIN));
    }

    #[test]
    fn floats() {
        assert_eq!(resolve_plain("1.5"), Value::Float(1.5));
        assert_eq!(resolve_plain("-2.5e3"), Value::Float(-2500.0));
        assert_eq!(resolve_plain(".5"), Value::Float(0.5));
        assert_eq!(resolve_plain("-.inf"), Value::Float(f64::NEG_INFINITY));
        assert!(matches!(resolve_plain(".NaN"), Value::Float(f) if f.is_nan()));
        assert_eq!(resolve_plain("1.2.3"), Value::String("1.2.3".into()));
    }

    #[test]
    fn canonical_timestamp() {
        let Value::Timestamp(ts) = resolve_plain("2018-12-11T01:02:03.00Z") else {
            panic!("expected a timestamp");
        };
        assert_eq!((ts.year(), ts.month(), ts.day()), (2018, 12, 11));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (1, 2, 3));
        assert_eq!(ts.offset().local_minus_utc(), 0);
    }

    #[test]
    fn spaced_timestamp_with_offset() {
        let Value::Timestamp(ts) = resolve_plain("2001-12-14 21:59:43.10 -5") else {
            panic!("expected a timestamp");
        };
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(ts.nanosecond(), 100_000_000);
    }

    #[test]
    fn dates_and_symbols() {
        assert_eq!(
            resolve_plain("2002-12-14"),
            Value::Date(NaiveDate::from_ymd_opt(2002, 12, 14).unwrap())
        );
        assert_eq!(resolve_plain("2002-13-14"), Value::String("2002-13-14".into()));
        assert_eq!(resolve_plain(":Simple"), Value::Symbol("Simple".into()));
        assert_eq!(resolve_plain(":"), Value::String(":".into()));
        assert_eq!(resolve_plain("::x"), Value::String("::x".into()));
    }

    #[test]
    fn core_tags() {
        assert_eq!(resolve_core("!!str", "42").unwrap(), Value::String("42".into()));
        assert_eq!(resolve_core("!!float", "3").unwrap(), Value::Float(3.0));
        assert_eq!(resolve_core("!!null", "anything").unwrap(), Value::Null);
        assert_eq!(
            resolve_core("!!binary", "aGVs\n bG8=").unwrap(),
            Value::Binary(b"hello".to_vec())
        );
        assert!(matches!(resolve_core("!!timestamp", "2002-12-14").unwrap(), Value::Timestamp(_)));
    }

    #[test]
    fn invalid_core_tag_content_is_malformed() {
        assert!(matches!(
            resolve_core("!!int", "forty-two"),
            Err(VaultError::MalformedDocument(_))
        ));
        assert!(matches!(
            resolve_core("!!binary", "***"),
            Err(VaultError::MalformedDocument(_))
        ));
    }

    #[test]
    fn offset_forms() {
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(parse_offset("-0800").unwrap().local_minus_utc(), -8 * 3600);
        assert_eq!(parse_offset("+1").unwrap().local_minus_utc(), 3600);
    }
}
