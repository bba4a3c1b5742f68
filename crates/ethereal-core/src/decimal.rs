//! Fixed-point conversion for exchange prices and quantities.
//!
//! The exchange encodes every price and quantity as an integer scaled by
//! 1e9. Decimal strings are scaled digit by digit (never through a float or
//! a bounded-precision decimal), so any number of fractional digits is
//! accepted and everything past the ninth is truncated toward zero. A
//! rounding mismatch here changes the signed digest and the verifier
//! rejects it.

use crate::error::{ScaleError, ScaleResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by the exchange wire format.
pub const FIXED_POINT_DECIMALS: u32 = 9;

/// Multiplier applied to decimal values (10^9).
pub const FIXED_POINT_SCALE: i128 = 1_000_000_000;

/// Convert a decimal string into its 1e9-scaled integer, truncating extra digits.
///
/// Accepts plain (`"1000.1"`, `"-0.5"`) and scientific (`"1.5e3"`, `"1e-30"`)
/// notation with any number of digits.
///
/// # Errors
/// `ScaleError::InvalidDecimal` if the input is not a decimal number,
/// `ScaleError::Overflow` if the scaled value does not fit in an `i128`.
pub fn scale_1e9(input: &str) -> ScaleResult<i128> {
    let invalid = || ScaleError::InvalidDecimal(input.to_string());
    let overflow = || ScaleError::Overflow(input.to_string());

    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => {
            let exponent: i64 = unsigned[at + 1..].parse().map_err(|_| invalid())?;
            (&unsigned[..at], exponent)
        }
        None => (unsigned, 0),
    };

    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err(invalid());
    }
    if !int_digits
        .bytes()
        .chain(frac_digits.bytes())
        .all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    // scaled = digits * 10^shift; a negative shift drops trailing digits.
    let total = (int_digits.len() + frac_digits.len()) as i64;
    let shift = exponent
        .saturating_add(i64::from(FIXED_POINT_DECIMALS))
        .saturating_sub(frac_digits.len() as i64);
    let kept = if shift < 0 {
        total.saturating_add(shift).max(0)
    } else {
        total
    };

    let mut magnitude: u128 = 0;
    for digit in int_digits.bytes().chain(frac_digits.bytes()).take(kept as usize) {
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(u128::from(digit - b'0')))
            .ok_or_else(overflow)?;
    }
    if magnitude != 0 {
        for _ in 0..shift.max(0) {
            magnitude = magnitude.checked_mul(10).ok_or_else(overflow)?;
        }
    }

    if negative {
        0i128.checked_sub_unsigned(magnitude).ok_or_else(overflow)
    } else {
        i128::try_from(magnitude).map_err(|_| overflow())
    }
}

/// Scale an already parsed decimal by 1e9, truncating toward zero.
///
/// The mantissa of a `Decimal` is below 2^96, so the product with 1e9 always
/// fits in an `i128`; the checked multiply only guards that invariant.
pub fn scale_decimal(value: Decimal) -> ScaleResult<i128> {
    let divisor = 10i128.pow(value.scale());
    value
        .mantissa()
        .checked_mul(FIXED_POINT_SCALE)
        .map(|scaled| scaled / divisor)
        .ok_or_else(|| ScaleError::Overflow(value.to_string()))
}

/// Parse into a `Decimal` at wire precision: digits past the ninth
/// fractional place are dropped before the value is materialized.
fn parse_wire_decimal(input: &str) -> ScaleResult<Decimal> {
    let scaled = scale_1e9(input)?;
    Decimal::try_from_i128_with_scale(scaled, FIXED_POINT_DECIMALS)
        .map(|d| d.normalize())
        .map_err(|_| ScaleError::Overflow(input.to_string()))
}

/// Format a decimal the way it is sent on the wire: at most 9 fractional
/// digits (truncated) and no trailing zeros.
fn to_wire(value: Decimal) -> String {
    value
        .round_dp_with_strategy(FIXED_POINT_DECIMALS, RoundingStrategy::ToZero)
        .normalize()
        .to_string()
}

/// Order price with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Wire representation (decimal string).
    pub fn to_wire(&self) -> String {
        to_wire(self.0)
    }

    /// 1e9-scaled integer value.
    pub fn scaled(&self) -> ScaleResult<i128> {
        scale_decimal(self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_decimal(s).map(Self)
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Order quantity with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(pub Decimal);

impl Quantity {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    pub fn to_wire(&self) -> String {
        to_wire(self.0)
    }

    pub fn scaled(&self) -> ScaleResult<i128> {
        scale_decimal(self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_decimal(s).map(Self)
    }
}

impl From<Decimal> for Quantity {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}
