//! Typed attribute values.
//!
//! XMLB stores every attribute value as text. The [`Value`] enum recovers the
//! scalar type from that text so that JSON output can use native numbers and
//! booleans, and formats it back to exactly the same text on the way in.
//!
//! Inference is conservative: text is only typed as a number when
//! formatting the parsed number reproduces the original text byte for byte.
//! `"007"`, `"+5"` and `"1.50"` therefore stay strings, and decoding followed
//! by encoding never rewrites a value.

use std::fmt;
use std::num::IntErrorKind;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Boolean, stored as `true` / `false`.
    Bool(bool),
    /// Any other text, stored verbatim.
    Str(String),
}

impl Value {
    /// Infer a typed value from its stored text.
    ///
    /// Rules, in order:
    ///
    /// 1. Text that parses as an `i64` is an integer if it is the integer's
    ///    canonical form, otherwise a string. Integer-shaped text too large
    ///    for `i64` is a string.
    /// 2. Text that parses as a finite `f64` is a float if it is the float's
    ///    canonical form, otherwise a string.
    /// 3. Exactly `true` or `false` is a boolean. `True` is not.
    /// 4. Anything else is a string.
    pub fn infer(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(int) if int.to_string() == text => return Self::Int(int),
            Ok(_) => return Self::Str(text.to_string()),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                return Self::Str(text.to_string());
            }
            Err(_) => {}
        }

        if let Ok(float) = text.parse::<f64>() {
            if float.is_finite() && format_float(float) == text {
                return Self::Float(float);
            }
            return Self::Str(text.to_string());
        }

        match text {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Str(text.to_string()),
        }
    }
}

/// Canonical text of the value, as stored in the string table.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{int}"),
            Self::Float(float) => f.write_str(&format_float(*float)),
            Self::Bool(true) => f.write_str("true"),
            Self::Bool(false) => f.write_str("false"),
            Self::Str(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Format a float the way the game tools write them.
///
/// Uses the shortest digit string that round-trips, always keeps a fractional
/// part (`3.0`, not `3`), and switches to `d.ddde±XX` notation when the decimal
/// exponent is below -4 or at least 16.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e3".
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };

    if !(-4..16).contains(&exponent) {
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exponent_sign}{:02}", exponent.unsigned_abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let integer_digits = exponent + 1;

    if integer_digits <= 0 {
        let zeros = "0".repeat(integer_digits.unsigned_abs() as usize);
        return format!("{sign}0.{zeros}{digits}");
    }

    let integer_digits = integer_digits as usize;
    if digits.len() <= integer_digits {
        let zeros = "0".repeat(integer_digits - digits.len());
        format!("{sign}{digits}{zeros}.0")
    } else {
        let (whole, fraction) = digits.split_at(integer_digits);
        format!("{sign}{whole}.{fraction}")
    }
}
