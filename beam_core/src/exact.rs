//! # Exact Arithmetic
//!
//! Helpers around [`BigRational`] used by the equilibrium builder and solver.
//!
//! User input arrives as `f64`. Lifting those values through their binary
//! expansion would turn `0.1` into a 55-digit fraction, so [`from_f64`] lifts
//! the shortest decimal that round-trips to the same float instead. Decimal
//! input therefore produces exact reactions.
//!
//! ```rust
//! use beam_core::exact;
//! use num::BigRational;
//!
//! let tenth = exact::from_f64(0.1).unwrap();
//! assert_eq!(tenth, BigRational::new(1.into(), 10.into()));
//! ```

use num::bigint::BigInt;
use num::rational::BigRational;
use num::{ToPrimitive, Zero};

use crate::errors::{BeamError, BeamResult};

/// Lift a finite float into an exact rational.
///
/// Returns `None` for NaN and infinities.
pub fn from_f64(value: f64) -> Option<BigRational> {
    if !value.is_finite() {
        return None;
    }
    // Display for f64 prints the shortest round-trip digits and never
    // switches to exponent notation.
    parse_decimal(&value.to_string())
}

/// Lift a float, reporting a validation error against `field` when it is not finite.
pub fn lift(field: &str, value: f64) -> BeamResult<BigRational> {
    from_f64(value)
        .ok_or_else(|| BeamError::validation(field, value.to_string(), "Value must be finite"))
}

/// Convert an exact value back to the nearest float.
pub fn to_f64(value: &BigRational) -> f64 {
    match value.to_f64() {
        Some(v) => v,
        None => {
            let numer = value.numer().to_f64().unwrap_or(f64::NAN);
            let denom = value.denom().to_f64().unwrap_or(f64::NAN);
            numer / denom
        }
    }
}

/// Zero as an exact value
pub fn zero() -> BigRational {
    BigRational::zero()
}

fn parse_decimal(text: &str) -> Option<BigRational> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let mantissa: BigInt = format!("{}{}", whole, fraction).parse().ok()?;
    let scale = num::pow(BigInt::from(10u32), fraction.len());
    let value = BigRational::new(mantissa, scale);
    Some(if negative { -value } else { value })
}

/// Serialize exact values as `"p/q"` strings.
pub mod serde_ratio {
    use num::rational::BigRational;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigRational, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigRational, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse::<BigRational>().map_err(de::Error::custom)
    }
}
