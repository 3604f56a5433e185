//! Exact Kubernetes resource quantities
//!
//! A [`Quantity`] holds a signed count of nano-units, so summing thousands of
//! container readings stays exact instead of drifting the way repeated
//! floating-point addition does. Precision finer than 10^-9 is rounded up,
//! matching how the API server itself normalizes quantities.

use crate::{Result, UsageError};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as RawQuantity;
use std::cmp::Ordering;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

const NANO_EXPONENT: i32 = 9;

/// Decimal SI suffixes from largest to smallest, with their base-10 exponent
const DECIMAL_SUFFIXES: [(&str, i32); 10] = [
    ("E", 18),
    ("P", 15),
    ("T", 12),
    ("G", 9),
    ("M", 6),
    ("k", 3),
    ("", 0),
    ("m", -3),
    ("u", -6),
    ("n", -9),
];

/// Binary SI suffixes from largest to smallest, with their base-2 exponent
const BINARY_SUFFIXES: [(&str, u32); 6] = [
    ("Ei", 60),
    ("Pi", 50),
    ("Ti", 40),
    ("Gi", 30),
    ("Mi", 20),
    ("Ki", 10),
];

/// How a quantity prefers to be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    DecimalSI,
    BinarySI,
}

/// An exact resource amount, such as CPU cores or memory bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct Quantity {
    nanos: i128,
    format: Format,
}

impl Quantity {
    pub const ZERO: Quantity = Quantity {
        nanos: 0,
        format: Format::DecimalSI,
    };

    pub const fn nanos(&self) -> i128 {
        self.nanos
    }

    pub const fn format(&self) -> Format {
        self.format
    }

    /// Add `other` into this quantity.
    ///
    /// A zero quantity takes on the format of the first value added to it, so
    /// a memory total built from `Mi` readings still renders in binary units.
    pub fn add(&mut self, other: &Quantity) {
        if self.nanos == 0 {
            self.format = other.format;
        }
        self.nanos = self.nanos.saturating_add(other.nanos);
    }

    /// Lossy conversion used when exposing the value as a gauge
    pub fn as_approximate_f64(&self) -> f64 {
        self.nanos as f64 / 1e9
    }
}

impl AddAssign<&Quantity> for Quantity {
    fn add_assign(&mut self, rhs: &Quantity) {
        self.add(rhs);
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nanos.cmp(&other.nanos)
    }
}

enum Multiplier {
    Decimal(i32),
    Binary(u32),
}

fn parse_suffix(suffix: &str) -> Option<(Multiplier, Format)> {
    if let Some((_, bits)) = BINARY_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Some((Multiplier::Binary(*bits), Format::BinarySI));
    }
    if let Some((_, exp)) = DECIMAL_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Some((Multiplier::Decimal(*exp), Format::DecimalSI));
    }

    // Decimal exponent form: 1e3, 5E-2
    let exponent = suffix
        .strip_prefix('e')
        .or_else(|| suffix.strip_prefix('E'))?;
    if exponent.is_empty() || exponent == "-" || exponent == "+" {
        return None;
    }
    exponent
        .parse::<i32>()
        .ok()
        .map(|exp| (Multiplier::Decimal(exp), Format::DecimalSI))
}

/// Compute `numerator * 10^exp10`, rounding a fractional result up
fn scale_pow10(numerator: i128, exp10: i32) -> Option<i128> {
    if exp10 >= 0 {
        return 10i128
            .checked_pow(exp10.unsigned_abs())
            .and_then(|factor| numerator.checked_mul(factor));
    }

    match 10i128.checked_pow(exp10.unsigned_abs()) {
        Some(divisor) => {
            let quotient = numerator / divisor;
            if numerator % divisor == 0 {
                Some(quotient)
            } else {
                Some(quotient + 1)
            }
        }
        // Smaller than one nano-unit
        None => Some(if numerator == 0 { 0 } else { 1 }),
    }
}

impl FromStr for Quantity {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| UsageError::InvalidQuantity {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_prefix('+') {
            (false, rest)
        } else {
            (false, trimmed)
        };

        let number_end = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(number_end);

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("missing number"));
        }
        if fraction.contains('.') {
            return Err(invalid("more than one decimal point"));
        }

        let (multiplier, format) =
            parse_suffix(suffix).ok_or_else(|| invalid("unknown suffix"))?;

        let mut mantissa: i128 = 0;
        for digit in whole.bytes().chain(fraction.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit - b'0')))
                .ok_or_else(|| invalid("too many digits"))?;
        }

        let fraction_digits =
            i32::try_from(fraction.len()).map_err(|_| invalid("too many digits"))?;

        let nanos = match multiplier {
            Multiplier::Decimal(exp) => exp
                .checked_add(NANO_EXPONENT)
                .and_then(|e| e.checked_sub(fraction_digits))
                .and_then(|e| scale_pow10(mantissa, e)),
            Multiplier::Binary(bits) => NANO_EXPONENT
                .checked_sub(fraction_digits)
                .and_then(|e| {
                    2i128
                        .checked_pow(bits)
                        .and_then(|factor| mantissa.checked_mul(factor))
                        .and_then(|scaled| scale_pow10(scaled, e))
                }),
        }
        .ok_or_else(|| invalid("value out of range"))?;

        Ok(Self {
            nanos: if negative { -nanos } else { nanos },
            format,
        })
    }
}

impl TryFrom<&RawQuantity> for Quantity {
    type Error = UsageError;

    fn try_from(raw: &RawQuantity) -> Result<Self> {
        raw.0.parse()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return write!(f, "0");
        }

        let nano = 10i128.pow(NANO_EXPONENT as u32);
        if self.format == Format::BinarySI && self.nanos % nano == 0 {
            let whole = self.nanos / nano;
            for (suffix, bits) in BINARY_SUFFIXES {
                let unit = 1i128 << bits;
                if whole % unit == 0 {
                    return write!(f, "{}{}", whole / unit, suffix);
                }
            }
            return write!(f, "{}", whole);
        }

        // Stops at "n" at the latest, whose unit is one nano.
        for (suffix, exp) in DECIMAL_SUFFIXES {
            let unit = 10i128.pow((exp + NANO_EXPONENT) as u32);
            if self.nanos % unit == 0 {
                return write!(f, "{}{}", self.nanos / unit, suffix);
            }
        }

        write!(f, "{}n", self.nanos)
    }
}
