// [libs/core/decimal/src/scaled.rs]
//! Arbitrary-precision decimal value carried as a signed integer mantissa
//! plus an explicit scale. The canonical wire form is a decimal string —
//! the number of digits after the point *is* the scale, so callers never
//! need a side-channel scale field once a value has been formatted.
//!
//! Rescaling narrows by dropping trailing mantissa digits and widens by
//! appending zeros, which makes truncation-toward-zero the natural and
//! only behavior: no rounding mode ever needs to be chosen or threaded
//! through, so the cache script and this crate cannot disagree on it.

use crate::errors::DecimalError;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Eq)]
pub struct ScaledDecimal {
    mantissa: BigInt,
    scale: u32,
}

impl ScaledDecimal {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    pub fn zero(scale: u32) -> Self {
        Self {
            mantissa: BigInt::zero(),
            scale,
        }
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn neg(&self) -> Self {
        Self {
            mantissa: -self.mantissa.clone(),
            scale: self.scale,
        }
    }

    fn pow10(n: u32) -> BigInt {
        BigInt::from(10u32).pow(n)
    }

    /// Rescale to `new_scale`. Widening multiplies by 10^delta exactly;
    /// narrowing divides by 10^delta, truncating toward zero.
    pub fn rescale(&self, new_scale: u32) -> Self {
        if new_scale == self.scale {
            return self.clone();
        }
        if new_scale > self.scale {
            let factor = Self::pow10(new_scale - self.scale);
            Self {
                mantissa: &self.mantissa * factor,
                scale: new_scale,
            }
        } else {
            let factor = Self::pow10(self.scale - new_scale);
            Self {
                mantissa: &self.mantissa / factor,
                scale: new_scale,
            }
        }
    }

    fn common_scale(a: &Self, b: &Self) -> u32 {
        a.scale.max(b.scale)
    }

    fn align(a: &Self, b: &Self) -> (BigInt, BigInt, u32) {
        let scale = Self::common_scale(a, b);
        (a.rescale(scale).mantissa, b.rescale(scale).mantissa, scale)
    }

    pub fn checked_add(&self, other: &Self) -> Self {
        let (a, b, scale) = Self::align(self, other);
        Self {
            mantissa: a + b,
            scale,
        }
    }

    pub fn checked_sub(&self, other: &Self) -> Self {
        let (a, b, scale) = Self::align(self, other);
        Self {
            mantissa: a - b,
            scale,
        }
    }
}

impl PartialEq for ScaledDecimal {
    fn eq(&self, other: &Self) -> bool {
        let (a, b, _) = Self::align(self, other);
        a == b
    }
}

impl PartialOrd for ScaledDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScaledDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = Self::align(self, other);
        a.cmp(&b)
    }
}

impl fmt::Display for ScaledDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.mantissa.is_negative();
        let digits = self.mantissa.abs().to_str_radix(10);
        if self.scale == 0 {
            return write!(f, "{}{}", if negative { "-" } else { "" }, digits);
        }
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{:0>width$}", digits, width = scale + 1)
        } else {
            digits
        };
        let split_at = padded.len() - scale;
        let (int_part, frac_part) = padded.split_at(split_at);
        write!(
            f,
            "{}{}.{}",
            if negative { "-" } else { "" },
            int_part,
            frac_part
        )
    }
}

impl FromStr for ScaledDecimal {
    type Err = DecimalError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DecimalError::InvalidFormat(raw.to_string()));
        }
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let mut parts = unsigned.splitn(2, '.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next().unwrap_or("");
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DecimalError::InvalidFormat(raw.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(DecimalError::InvalidFormat(raw.to_string()));
        }
        let scale = frac_part.len() as u32;
        let digits = format!("{}{}", int_part, frac_part);
        let mut mantissa = BigInt::from_str(&digits)
            .map_err(|_| DecimalError::InvalidFormat(raw.to_string()))?;
        if negative {
            mantissa = -mantissa;
        }
        Ok(Self { mantissa, scale })
    }
}

impl Serialize for ScaledDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ScaledDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ScaledDecimal::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
