use crate::foundation::error::{ChronomapError, ChronomapResult};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-+]?[0-9]{1,3}\.[0-9]+").unwrap());
static RE_DECIMAL_LEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?[0-9]{1,3}\.[0-9]+").unwrap());
static RE_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Convert a degree/minute/second or decimal coordinate string to decimal degrees.
///
/// Accepts either a signed decimal (`"-33.5"`, `"33.5S"`) or a DMS compound string with
/// the hemisphere letter anywhere in it (`"33°30'0\"S"`). Decimal detection takes
/// precedence. A southern or western hemisphere letter negates the value.
///
/// Empty (or all-whitespace) input is a missing-value marker and passes through as
/// `Ok(None)`. A non-empty string containing no digits at all is a [`ChronomapError::Parse`].
pub fn parse_dms(input: &str) -> ChronomapResult<Option<f64>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }

    let sign = if compact.chars().any(|c| matches!(c, 's' | 'S' | 'w' | 'W')) {
        -1.0
    } else {
        1.0
    };

    if RE_DECIMAL_LEAD.is_match(&compact) {
        // Signed decimal form: the hemisphere letter still applies, so "-33.5S" flips back
        // to +33.5 exactly as the source data pipeline did.
        let m = RE_DECIMAL
            .find(&compact)
            .ok_or_else(|| ChronomapError::parse(format!("no decimal group in {input:?}")))?;
        let value: f64 = m
            .as_str()
            .parse()
            .map_err(|e| ChronomapError::parse(format!("bad decimal {input:?}: {e}")))?;
        return Ok(Some(sign * value));
    }

    // DMS form: up to four digit runs, [degree, minute, second, fractional-second],
    // missing trailing groups default to zero.
    let groups: Vec<&str> = RE_DIGIT_RUN
        .find_iter(&compact)
        .take(4)
        .map(|m| m.as_str())
        .collect();
    if groups.is_empty() {
        return Err(ChronomapError::parse(format!(
            "coordinate {input:?} contains no digits"
        )));
    }

    let degree: f64 = groups[0]
        .parse()
        .map_err(|e| ChronomapError::parse(format!("bad degree in {input:?}: {e}")))?;
    let minute: f64 = groups.get(1).unwrap_or(&"0").parse().unwrap_or(0.0);
    let second_whole = groups.get(2).copied().unwrap_or("0");
    let second_frac = groups.get(3).copied().unwrap_or("0");
    let second: f64 = format!("{second_whole}.{second_frac}")
        .parse()
        .map_err(|e| ChronomapError::parse(format!("bad seconds in {input:?}: {e}")))?;

    Ok(Some(sign * (degree + minute / 60.0 + second / 3600.0)))
}
