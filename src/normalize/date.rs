use crate::foundation::core::Year;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel returned by [`parse_year`] when no year can be recovered.
pub const UNKNOWN_YEAR: Year = Year(0);

// Optional decade suffix: "1850s" carries the year 1850.
static RE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(1[789][0-9]{2}|20[0-2][0-9])s?\b").unwrap());
static RE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
static RE_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Extract an integer year from a free-form date string.
///
/// Plain numeric strings parse directly. Anything else is searched for a four-digit year
/// in `17xx`, `18xx`, `19xx` or `20[0-2]x`; `"c. 1850s"` yields 1850. No match yields
/// [`UNKNOWN_YEAR`], never an error.
pub fn parse_year(input: &str) -> Year {
    let trimmed = input.trim();
    if let Ok(v) = trimmed.parse::<i32>() {
        return Year(v);
    }
    match RE_YEAR.captures(trimmed) {
        Some(c) => Year(c[1].parse().unwrap_or(0)),
        None => UNKNOWN_YEAR,
    }
}

/// Extract an integer population count from a free-form string.
///
/// Parenthetical annotations (census notes, yearly references) are stripped, the
/// remaining digit runs are concatenated (so `"1,234,567"` reads as 1234567), and an
/// empty or digit-free result yields 0.
pub fn parse_population(input: &str) -> u64 {
    let stripped = RE_PAREN.replace_all(input, "");
    let digits: String = RE_DIGIT_RUN
        .find_iter(&stripped)
        .map(|m| m.as_str())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(0)
}
