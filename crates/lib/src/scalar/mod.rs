//! Scalar codec: conversions between native scalar values, JSON tokens, and
//! loosely typed default literals.
//!
//! Every scalar settings field goes through [`ScalarValue`], which fixes three
//! conversions for its native type:
//!
//! - `to_json` / `from_json` — the JSON wire mapping. Types without a native
//!   JSON scalar representation (durations, timestamps, URIs, decimals)
//!   round-trip through a locale-invariant string form.
//! - `from_literal` — coercion of a declared default value, which may be typed
//!   loosely (a string standing in for a date, an integer for a float).
//! - `zero` — the value a field resets to when no default is declared. Types
//!   with no meaningful zero (URIs) return `None` and require a declared
//!   default at registration time.
//!
//! Nullable scalars are `Option<V>`: JSON `null` maps to the absent state in
//! both directions, and a `null` default literal is only legal for them.

use std::{fmt, time::Duration};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use url::Url;

mod errors;
pub use errors::ScalarError;

/// Names the runtime shape of a JSON token, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A loosely typed default-value literal, as written in a schema table.
///
/// Literals are deliberately weaker-typed than the fields they initialize:
/// a string may stand in for a duration, a date, or a URI, and an integer for
/// any numeric type. Coercion into the field's native representation happens
/// exactly once, when the owning type's metadata is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// The absent value; only coercible into nullable scalars.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'static str),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Str(s) => write!(f, "`{s}`"),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&'static str> for Literal {
    fn from(value: &'static str) -> Self {
        Literal::Str(value)
    }
}

/// A native scalar settings value.
///
/// Implemented for the supported scalar set (booleans, integers, floats,
/// strings, timestamps, dates, durations, URIs, decimals, enums generated by
/// [`settings_enum!`](crate::settings_enum)) and for `Option<V>` of any of
/// them, which is the nullable form.
pub trait ScalarValue: Clone + PartialEq + Send + Sync + 'static {
    /// Short human-readable name of the native type, used in error messages.
    fn scalar_kind() -> &'static str;

    /// The value a field of this type resets to when no default is declared,
    /// or `None` if the type has no natural zero and a default is mandatory.
    fn zero() -> Option<Self>;

    /// Converts this value into its JSON scalar token.
    fn to_json(&self) -> Value;

    /// Decodes a JSON token into a native value.
    ///
    /// Fails with [`ScalarError::TypeMismatch`] when the token's runtime shape
    /// does not match the native type.
    fn from_json(value: &Value) -> Result<Self, ScalarError>;

    /// Coerces a loosely typed default literal into a native value.
    fn from_literal(literal: &Literal) -> Result<Self, ScalarError>;
}

fn mismatch<T: ScalarValue>(value: &Value) -> ScalarError {
    ScalarError::TypeMismatch {
        expected: T::scalar_kind(),
        actual: json_kind(value).to_string(),
    }
}

fn bad_literal<T: ScalarValue>(literal: &Literal, reason: impl Into<String>) -> ScalarError {
    ScalarError::InvalidLiteral {
        target: T::scalar_kind(),
        literal: literal.to_string(),
        reason: reason.into(),
    }
}

/// Resolves an enum member by name, ignoring ASCII case.
///
/// Support routine for [`settings_enum!`](crate::settings_enum); `members`
/// lists every member paired with its declared name.
pub fn enum_member_by_name<E: Copy>(
    text: &str,
    members: &[(&'static str, E)],
    kind: &'static str,
) -> Result<E, ScalarError> {
    members
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
        .map(|(_, member)| *member)
        .ok_or_else(|| ScalarError::ParseFailed {
            target: kind,
            value: text.to_string(),
            reason: "no such member".to_string(),
        })
}

/// Resolves an enum member by zero-based declaration position.
///
/// Support routine for [`settings_enum!`](crate::settings_enum), covering
/// integer default literals.
pub fn enum_member_by_ordinal<E: Copy>(
    ordinal: i64,
    members: &[(&'static str, E)],
    kind: &'static str,
) -> Result<E, ScalarError> {
    usize::try_from(ordinal)
        .ok()
        .and_then(|index| members.get(index))
        .map(|(_, member)| *member)
        .ok_or_else(|| ScalarError::OutOfRange {
            target: kind,
            value: ordinal.to_string(),
        })
}

macro_rules! impl_integer_scalar {
    ($ty:ty, $kind:literal) => {
        impl ScalarValue for $ty {
            fn scalar_kind() -> &'static str {
                $kind
            }

            fn zero() -> Option<Self> {
                Some(0)
            }

            fn to_json(&self) -> Value {
                Value::from(*self)
            }

            fn from_json(value: &Value) -> Result<Self, ScalarError> {
                let wide = value.as_i64().ok_or_else(|| mismatch::<Self>(value))?;
                <$ty>::try_from(wide).map_err(|_| ScalarError::OutOfRange {
                    target: $kind,
                    value: wide.to_string(),
                })
            }

            fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
                match literal {
                    Literal::Int(n) => <$ty>::try_from(*n).map_err(|_| ScalarError::OutOfRange {
                        target: $kind,
                        value: n.to_string(),
                    }),
                    Literal::Float(x) if x.fract() == 0.0 => {
                        // `i64::MAX as f64` rounds up to 2^63, which is
                        // already out of range, hence `>=`.
                        if *x < i64::MIN as f64 || *x >= i64::MAX as f64 {
                            return Err(ScalarError::OutOfRange {
                                target: $kind,
                                value: x.to_string(),
                            });
                        }
                        <$ty>::try_from(*x as i64).map_err(|_| ScalarError::OutOfRange {
                            target: $kind,
                            value: x.to_string(),
                        })
                    }
                    Literal::Str(s) => s.parse().map_err(|_| {
                        bad_literal::<Self>(literal, "not an integer string")
                    }),
                    Literal::Null => Err(ScalarError::NullDefault { target: $kind }),
                    other => Err(bad_literal::<Self>(other, "not a numeric literal")),
                }
            }
        }
    };
}

impl_integer_scalar!(i64, "integer");
impl_integer_scalar!(i32, "32-bit integer");
impl_integer_scalar!(u32, "unsigned 32-bit integer");

// u64 gets its own decoder so values above i64::MAX still round-trip.
impl ScalarValue for u64 {
    fn scalar_kind() -> &'static str {
        "unsigned integer"
    }

    fn zero() -> Option<Self> {
        Some(0)
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        value.as_u64().ok_or_else(|| mismatch::<Self>(value))
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Int(n) => u64::try_from(*n).map_err(|_| ScalarError::OutOfRange {
                target: Self::scalar_kind(),
                value: n.to_string(),
            }),
            Literal::Float(x) if x.fract() == 0.0 => {
                // `u64::MAX as f64` rounds up to 2^64, which is already out
                // of range, hence `>=`.
                if *x < 0.0 || *x >= u64::MAX as f64 {
                    return Err(ScalarError::OutOfRange {
                        target: Self::scalar_kind(),
                        value: x.to_string(),
                    });
                }
                Ok(*x as u64)
            }
            Literal::Str(s) => s
                .parse()
                .map_err(|_| bad_literal::<Self>(literal, "not an integer string")),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a numeric literal")),
        }
    }
}

impl ScalarValue for f64 {
    fn scalar_kind() -> &'static str {
        "float"
    }

    fn zero() -> Option<Self> {
        Some(0.0)
    }

    fn to_json(&self) -> Value {
        match serde_json::Number::from_f64(*self) {
            Some(n) => Value::Number(n),
            // Non-finite floats have no JSON representation.
            None => Value::Null,
        }
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        value.as_f64().ok_or_else(|| mismatch::<Self>(value))
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Int(n) => Ok(*n as f64),
            Literal::Float(x) => Ok(*x),
            Literal::Str(s) => s
                .parse()
                .map_err(|_| bad_literal::<Self>(literal, "not a float string")),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a numeric literal")),
        }
    }
}

impl ScalarValue for f32 {
    fn scalar_kind() -> &'static str {
        "float"
    }

    fn zero() -> Option<Self> {
        Some(0.0)
    }

    fn to_json(&self) -> Value {
        f64::from(*self).to_json()
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        f64::from_json(value).map(|x| x as f32)
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        f64::from_literal(literal).map(|x| x as f32)
    }
}

impl ScalarValue for bool {
    fn scalar_kind() -> &'static str {
        "boolean"
    }

    fn zero() -> Option<Self> {
        Some(false)
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(value))
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Bool(b) => Ok(*b),
            Literal::Str(s) => s
                .parse()
                .map_err(|_| bad_literal::<Self>(literal, "not `true` or `false`")),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a boolean literal")),
        }
    }
}

impl ScalarValue for String {
    fn scalar_kind() -> &'static str {
        "string"
    }

    fn zero() -> Option<Self> {
        Some(String::new())
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch::<Self>(value))
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        // Generic string conversion: any non-null literal renders as text.
        match literal {
            Literal::Str(s) => Ok((*s).to_owned()),
            Literal::Bool(b) => Ok(b.to_string()),
            Literal::Int(n) => Ok(n.to_string()),
            Literal::Float(x) => Ok(x.to_string()),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
        }
    }
}

impl ScalarValue for Duration {
    fn scalar_kind() -> &'static str {
        "duration"
    }

    fn zero() -> Option<Self> {
        Some(Duration::ZERO)
    }

    fn to_json(&self) -> Value {
        Value::String(humantime::format_duration(*self).to_string())
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        match value {
            Value::String(s) => humantime::parse_duration(s).map_err(|e| {
                ScalarError::ParseFailed {
                    target: Self::scalar_kind(),
                    value: s.clone(),
                    reason: e.to_string(),
                }
            }),
            other => match other.as_u64() {
                Some(secs) => Ok(Duration::from_secs(secs)),
                None => Err(mismatch::<Self>(other)),
            },
        }
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Str(s) => humantime::parse_duration(s)
                .map_err(|e| bad_literal::<Self>(literal, e.to_string())),
            Literal::Int(n) if *n >= 0 => Ok(Duration::from_secs(*n as u64)),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a duration literal")),
        }
    }
}

impl ScalarValue for DateTime<Utc> {
    fn scalar_kind() -> &'static str {
        "timestamp"
    }

    fn zero() -> Option<Self> {
        Some(DateTime::UNIX_EPOCH)
    }

    fn to_json(&self) -> Value {
        Value::String(self.to_rfc3339())
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| ScalarError::ParseFailed {
                    target: Self::scalar_kind(),
                    value: s.clone(),
                    reason: e.to_string(),
                }),
            other => Err(mismatch::<Self>(other)),
        }
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Str(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| bad_literal::<Self>(literal, e.to_string())),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a timestamp literal")),
        }
    }
}

impl ScalarValue for NaiveDate {
    fn scalar_kind() -> &'static str {
        "date"
    }

    fn zero() -> Option<Self> {
        NaiveDate::from_ymd_opt(1970, 1, 1)
    }

    fn to_json(&self) -> Value {
        Value::String(self.format("%Y-%m-%d").to_string())
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        match value {
            Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
                ScalarError::ParseFailed {
                    target: Self::scalar_kind(),
                    value: s.clone(),
                    reason: e.to_string(),
                }
            }),
            other => Err(mismatch::<Self>(other)),
        }
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Str(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| bad_literal::<Self>(literal, e.to_string())),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a date literal")),
        }
    }
}

impl ScalarValue for Url {
    fn scalar_kind() -> &'static str {
        "URI"
    }

    fn zero() -> Option<Self> {
        // There is no empty URI; non-nullable URI fields must declare a default.
        None
    }

    fn to_json(&self) -> Value {
        Value::String(self.as_str().to_owned())
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        match value {
            Value::String(s) => Url::parse(s).map_err(|e| ScalarError::ParseFailed {
                target: Self::scalar_kind(),
                value: s.clone(),
                reason: e.to_string(),
            }),
            other => Err(mismatch::<Self>(other)),
        }
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Str(s) => {
                Url::parse(s).map_err(|e| bad_literal::<Self>(literal, e.to_string()))
            }
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a URI literal")),
        }
    }
}

impl ScalarValue for Decimal {
    fn scalar_kind() -> &'static str {
        "decimal"
    }

    fn zero() -> Option<Self> {
        Some(Decimal::ZERO)
    }

    fn to_json(&self) -> Value {
        // Fixed-point decimals widen to their string form to avoid float loss.
        Value::String(self.to_string())
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(mismatch::<Self>(other)),
        };
        text.parse().map_err(|e: rust_decimal::Error| {
            ScalarError::ParseFailed {
                target: Self::scalar_kind(),
                value: text,
                reason: e.to_string(),
            }
        })
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Int(n) => Ok(Decimal::from(*n)),
            Literal::Float(x) => {
                Decimal::try_from(*x).map_err(|e| bad_literal::<Self>(literal, e.to_string()))
            }
            Literal::Str(s) => s
                .parse()
                .map_err(|e: rust_decimal::Error| bad_literal::<Self>(literal, e.to_string())),
            Literal::Null => Err(ScalarError::NullDefault {
                target: Self::scalar_kind(),
            }),
            other => Err(bad_literal::<Self>(other, "not a decimal literal")),
        }
    }
}

/// Nullable scalars: JSON `null` and the `null` literal map to `None`.
impl<V: ScalarValue> ScalarValue for Option<V> {
    fn scalar_kind() -> &'static str {
        V::scalar_kind()
    }

    fn zero() -> Option<Self> {
        Some(None)
    }

    fn to_json(&self) -> Value {
        match self {
            Some(v) => v.to_json(),
            None => Value::Null,
        }
    }

    fn from_json(value: &Value) -> Result<Self, ScalarError> {
        match value {
            Value::Null => Ok(None),
            other => V::from_json(other).map(Some),
        }
    }

    fn from_literal(literal: &Literal) -> Result<Self, ScalarError> {
        match literal {
            Literal::Null => Ok(None),
            other => V::from_literal(other).map(Some),
        }
    }
}
