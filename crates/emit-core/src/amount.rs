//! Fixed-point token amounts and fractional rates.
//!
//! [`Amount`] counts micro-units (six fractional digits) and [`Rate`] counts
//! parts per million of a whole. Every `Amount × Rate` product is rounded
//! half-to-even straight back to micro-units, so each intermediate quantity in
//! the emission schedule is already at its final precision before it feeds the
//! next computation.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{AMOUNT_DECIMALS, MICROS_PER_TOKEN, RATE_DECIMALS, RATE_PRECISION};
use crate::error::AmountError;

/// Divide, rounding the quotient to the nearest integer and ties to even.
///
/// `denominator` must be non-zero.
pub fn div_round_half_even(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder * 2;
    if twice > denominator || (twice == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Parse a non-negative decimal string into an integer scaled by `10^decimals`.
///
/// Accepts `_` as a digit separator. Rejects signs, exponents and more than
/// `decimals` fractional digits.
fn parse_scaled(s: &str, decimals: u32) -> Result<u64, AmountError> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(AmountError::Empty);
    }
    if cleaned.starts_with('-') {
        return Err(AmountError::Negative(s.to_string()));
    }

    let (int_part, frac_part) = match cleaned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (cleaned.as_str(), ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::InvalidDecimal(s.to_string()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountError::InvalidDecimal(s.to_string()));
    }

    let frac_trimmed = frac_part.trim_end_matches('0');
    if frac_trimmed.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            value: s.to_string(),
            max: decimals,
        });
    }

    let scale = 10u64.pow(decimals);
    let out_of_range = || AmountError::OutOfRange(s.to_string());

    let whole: u64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| out_of_range())?
    };
    let frac: u64 = if frac_trimmed.is_empty() {
        0
    } else {
        let padded = format!("{frac_trimmed:0<width$}", width = decimals as usize);
        padded.parse().map_err(|_| out_of_range())?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(out_of_range)
}

/// Render `value / 10^decimals` as an exact decimal with trailing zeros trimmed.
fn format_scaled(value: u64, decimals: u32) -> String {
    let scale = 10u64.pow(decimals);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:0width$}", width = decimals as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// A decimal value as it appears in a configuration source.
///
/// Files and environment variables may carry amounts as integers, floats or
/// strings; all three are accepted and normalised through the exact decimal
/// parser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DecimalValue {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl DecimalValue {
    fn into_text(self) -> Result<String, AmountError> {
        match self {
            Self::Integer(n) => Ok(n.to_string()),
            Self::Float(f) if !f.is_finite() => Err(AmountError::InvalidDecimal(f.to_string())),
            Self::Float(f) if f < 0.0 => Err(AmountError::Negative(f.to_string())),
            // f64 Display never uses exponent notation.
            Self::Float(f) => Ok(f.to_string()),
            Self::Text(s) => Ok(s),
        }
    }
}

// ------------------------------------------------------------------
// Amount
// ------------------------------------------------------------------

/// A non-negative token quantity with six fractional digits.
///
/// # Examples
///
/// ```
/// use emit_core::amount::Amount;
/// let a: Amount = "1.5".parse().unwrap();
/// assert_eq!(a.micros(), 1_500_000);
/// assert_eq!(a.to_string(), "1.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "DecimalValue")]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u64::MAX);

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Whole tokens, saturating at [`Amount::MAX`].
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens.saturating_mul(MICROS_PER_TOKEN))
    }

    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Integer part in whole tokens (truncated).
    pub const fn whole_tokens(self) -> u64 {
        self.0 / MICROS_PER_TOKEN
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }

    /// `self × rate`, rounded half-to-even to the nearest micro-unit.
    ///
    /// Never exceeds `self` since rates are at most 1.
    pub fn mul_rate(self, rate: Rate) -> Amount {
        let product = self.0 as u128 * rate.0 as u128;
        Amount(div_round_half_even(product, RATE_PRECISION as u128) as u64)
    }

    /// `self / denominator` as a rate, clamped to 100%. Zero when the
    /// denominator is zero.
    pub fn ratio_of(self, denominator: Amount) -> Rate {
        if denominator.is_zero() {
            return Rate::ZERO;
        }
        let scaled = self.0 as u128 * RATE_PRECISION as u128;
        let ppm = div_round_half_even(scaled, denominator.0 as u128);
        Rate(ppm.min(RATE_PRECISION as u128) as u64)
    }
}

/// Saturating addition.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, AMOUNT_DECIMALS).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format_scaled(self.0, AMOUNT_DECIMALS))
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> String {
        a.to_string()
    }
}

impl TryFrom<DecimalValue> for Amount {
    type Error = AmountError;

    fn try_from(v: DecimalValue) -> Result<Self, Self::Error> {
        v.into_text()?.parse()
    }
}

// ------------------------------------------------------------------
// Rate
// ------------------------------------------------------------------

/// A fraction in `[0, 1]` with six fractional digits (parts per million).
///
/// Parses from a decimal fraction (`"0.04"`) or a percentage (`"4%"`).
///
/// # Examples
///
/// ```
/// use emit_core::amount::Rate;
/// let r: Rate = "4%".parse().unwrap();
/// assert_eq!(r, "0.04".parse().unwrap());
/// assert_eq!(r.ppm(), 40_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "DecimalValue")]
pub struct Rate(u64);

impl Rate {
    pub const ZERO: Rate = Rate(0);
    pub const ONE: Rate = Rate(RATE_PRECISION);

    pub fn from_ppm(ppm: u64) -> Result<Self, AmountError> {
        if ppm > RATE_PRECISION {
            return Err(AmountError::RateAboveOne(format_scaled(ppm, RATE_DECIMALS)));
        }
        Ok(Self(ppm))
    }

    /// Like [`Rate::from_ppm`] but clamps to 100%.
    pub const fn saturating_from_ppm(ppm: u64) -> Self {
        if ppm > RATE_PRECISION {
            Self(RATE_PRECISION)
        } else {
            Self(ppm)
        }
    }

    pub const fn ppm(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `1 - self`.
    pub const fn complement(self) -> Rate {
        Rate(RATE_PRECISION - self.0)
    }

    /// `self × n`, clamped to 100%.
    pub fn scaled(self, n: u64) -> Rate {
        Rate(self.0.saturating_mul(n).min(RATE_PRECISION))
    }

    /// Percentage rendering, e.g. `"27.5%"`.
    pub fn to_percent_string(self) -> String {
        format!("{}%", format_scaled(self.0, RATE_DECIMALS - 2))
    }
}

impl FromStr for Rate {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let ppm = match trimmed.strip_suffix('%') {
            Some(pct) => parse_scaled(pct, RATE_DECIMALS - 2)?,
            None => parse_scaled(trimmed, RATE_DECIMALS)?,
        };
        if ppm > RATE_PRECISION {
            return Err(AmountError::RateAboveOne(s.to_string()));
        }
        Ok(Rate(ppm))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format_scaled(self.0, RATE_DECIMALS))
    }
}

impl From<Rate> for String {
    fn from(r: Rate) -> String {
        r.to_string()
    }
}

impl TryFrom<DecimalValue> for Rate {
    type Error = AmountError;

    fn try_from(v: DecimalValue) -> Result<Self, Self::Error> {
        v.into_text()?.parse()
    }
}
