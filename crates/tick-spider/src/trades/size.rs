//! Disclosed trade sizes.
//!
//! Filings report the notional value of a trade as a band rather than an exact figure, e.g.
//! `"1K–15K"`, `"< 1K"` or `"> 50M"`. [`SizeRange`] is the typed form of such a band, and
//! [`size_to_numeric`] reduces one to a single dollar estimate for aggregation.
//!
//! | form          | estimate                |
//! |---------------|-------------------------|
//! | `< N`         | `N / 2`                 |
//! | `> N`         | `N`                     |
//! | `A - B`       | `(A + B) / 2`           |
//! | `N`           | `N`                     |
//!
//! `K` multiplies by 1 000 and `M` by 1 000 000. In a range, each side carries its own
//! suffix; a side written without one is taken as typed, so `"1-15K"` spans `1` to `15 000`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;

lazy_static! {
    /// `< 1K`, `>50M`
    static ref BOUND: Regex =
        Regex::new(r"^([<>])\s*([0-9]+(?:\.[0-9]+)?)\s*([KkMm]?)").expect("bound pattern");

    /// `1K-15K`, `1K–15K`, `5M - 25M`
    static ref RANGE: Regex = Regex::new(
        r"^([0-9]+(?:\.[0-9]+)?)\s?([KkMm]?)\s?[-\u{2013}]\s?([0-9]+(?:\.[0-9]+)?)\s?([KkMm]?)"
    )
    .expect("range pattern");

    /// `100K`, `250`
    static ref SINGLE: Regex =
        Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s?([KkMm]?)$").expect("single pattern");
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    #[error("trade size is not disclosed")]
    Undisclosed,

    #[error("could not parse size string: {0}")]
    Unrecognised(String),
}

/// A disclosed trade size, in US dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeRange {
    /// `< N`: anything up to the ceiling.
    Below(f64),

    /// `> N`: at least the floor.
    Above(f64),

    /// `A - B`
    Between(f64, f64),

    /// A single figure.
    Exact(f64),
}

impl SizeRange {
    /// Single representative value of the band.
    ///
    /// A ceiling is halved, a floor is taken as is, and a range gives its midpoint.
    pub fn estimate(&self) -> f64 {
        match *self {
            SizeRange::Below(ceiling) => ceiling / 2.0,
            SizeRange::Above(floor) => floor,
            SizeRange::Between(low, high) => (low + high) / 2.0,
            SizeRange::Exact(value) => value,
        }
    }
}

impl FromStr for SizeRange {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
            return Err(SizeError::Undisclosed);
        }

        let size = normalise_commas(trimmed);
        let unrecognised = || SizeError::Unrecognised(trimmed.to_string());

        if let Some(caps) = BOUND.captures(&size) {
            let value = amount(&caps, 2, 3).ok_or_else(unrecognised)?;
            return Ok(match &caps[1] {
                "<" => SizeRange::Below(value),
                _ => SizeRange::Above(value),
            });
        }

        if let Some(caps) = RANGE.captures(&size) {
            let low = amount(&caps, 1, 2).ok_or_else(unrecognised)?;
            let high = amount(&caps, 3, 4).ok_or_else(unrecognised)?;
            return Ok(SizeRange::Between(low, high));
        }

        if let Some(caps) = SINGLE.captures(&size) {
            let value = amount(&caps, 1, 2).ok_or_else(unrecognised)?;
            return Ok(SizeRange::Exact(value));
        }

        Err(unrecognised())
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SizeRange::Below(ceiling) => write!(f, "< {}", compact(ceiling)),
            SizeRange::Above(floor) => write!(f, "> {}", compact(floor)),
            SizeRange::Between(low, high) => write!(f, "{}-{}", compact(low), compact(high)),
            SizeRange::Exact(value) => write!(f, "{}", compact(value)),
        }
    }
}

/// Estimate the dollar value of a disclosed trade size.
///
/// Never fails: an empty or `N/A` size is `0`, and anything unparsable is logged and also `0`.
pub fn size_to_numeric(size: &str) -> f64 {
    match size.parse::<SizeRange>() {
        Ok(range) => range.estimate(),
        Err(SizeError::Undisclosed) => 0.0,
        Err(err) => {
            warn!("{err}");
            0.0
        }
    }
}

// Apply the K/M suffix in capture group `suffix` to the number in group `number`.
fn amount(caps: &Captures, number: usize, suffix: usize) -> Option<f64> {
    let value: f64 = caps.get(number)?.as_str().parse().ok()?;
    let multiplier = match caps.get(suffix).map(|m| m.as_str()) {
        Some("k" | "K") => THOUSAND,
        Some("m" | "M") => MILLION,
        _ => 1.0,
    };

    // overlong digit strings overflow to infinity
    Some(value * multiplier).filter(|value| value.is_finite())
}

/// Drop thousands separators and turn decimal commas into points.
///
/// A comma between a digit and exactly three digits is a thousands separator (`1,000`);
/// between a digit and any other number of digits it is a decimal comma (`1,5`). Other commas
/// are dropped.
fn normalise_commas(size: &str) -> String {
    let chars: Vec<char> = size.chars().collect();
    let mut out = String::with_capacity(size.len());
    for (i, &c) in chars.iter().enumerate() {
        if c != ',' {
            out.push(c);
            continue;
        }

        let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let digits = chars[i + 1..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count();
        if after_digit && digits > 0 && digits != 3 {
            out.push('.');
        }
    }
    out
}

// `15000` -> `15K`, `1500000` -> `1.5M`, `1234.5` -> `1234.5`
//
// A suffix is only used when the scaled figure reads back to exactly `value`.
fn compact(value: f64) -> String {
    for (scale, places, suffix) in [(MILLION, 6, "M"), (THOUSAND, 3, "K")] {
        if value < scale {
            continue;
        }

        let scaled = format!("{}", value / scale);
        let decimals = scaled.split_once('.').map_or(0, |(_, fraction)| fraction.len());
        let exact = scaled.parse::<f64>().is_ok_and(|s| s * scale == value);
        if decimals <= places && exact {
            return format!("{scaled}{suffix}");
        }
    }
    format!("{value}")
}
