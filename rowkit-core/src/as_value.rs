use crate::{Error, Result, Value, truncate_long};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{any, borrow::Cow};
use time::{Date, PrimitiveDateTime, Time, macros::format_description};

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// `as_value` is used when binding parameters, `try_from_value` when reading
/// columns back out of a [`crate::RowLabeled`]. Numeric conversions are range
/// checked and fall back to parsing `Value::Varchar` (text protocols return
/// numbers as text).
///
/// ```rust
/// use rowkit_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int64(42));
/// let n: i32 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.into())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.into())
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {} value `{}` to {}",
        value.kind(),
        truncate_long!(value.to_string()),
        any::type_name::<T>(),
    ))
}

macro_rules! impl_as_value_integer {
    ($source:ty) => {
        impl AsValue for $source {
            fn as_value(self) -> Value {
                #[allow(irrefutable_let_patterns)]
                if let Ok(v) = i64::try_from(self) {
                    Value::Int64(v)
                } else {
                    Value::UInt64(self as _)
                }
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let out_of_range = |v: &dyn std::fmt::Display| {
                    Error::msg(format!(
                        "Value {} is out of range for {}",
                        v,
                        any::type_name::<Self>(),
                    ))
                };
                match value {
                    Value::Int64(v) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::UInt64(v) => <$source>::try_from(v).map_err(|_| out_of_range(&v)),
                    Value::Boolean(v) => Ok(v as _),
                    Value::Decimal(v) if v.fract().is_zero() => v
                        .to_i128()
                        .and_then(|v| <$source>::try_from(v).ok())
                        .ok_or_else(|| out_of_range(&v)),
                    Value::Varchar(ref v) => v
                        .trim()
                        .parse::<$source>()
                        .map_err(|e| Error::new(e).context(mismatch::<Self>(&value))),
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}
impl_as_value_integer!(i8);
impl_as_value_integer!(i16);
impl_as_value_integer!(i32);
impl_as_value_integer!(i64);
impl_as_value_integer!(u8);
impl_as_value_integer!(u16);
impl_as_value_integer!(u32);
impl_as_value_integer!(u64);

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(v) => Ok(v),
            Value::Int64(v) => Ok(v != 0),
            Value::UInt64(v) => Ok(v != 0),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

macro_rules! impl_as_value_float {
    ($source:ty) => {
        impl AsValue for $source {
            fn as_value(self) -> Value {
                Value::Float64(self as _)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Float64(v) => Ok(v as _),
                    Value::Int64(v) => Ok(v as _),
                    Value::UInt64(v) => Ok(v as _),
                    Value::Decimal(v) => v.to_f64().map(|v| v as _).ok_or_else(|| {
                        Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
                    }),
                    Value::Varchar(ref v) => v
                        .trim()
                        .parse::<$source>()
                        .map_err(|e| Error::new(e).context(mismatch::<Self>(&value))),
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}
impl_as_value_float!(f32);
impl_as_value_float!(f64);

impl AsValue for Decimal {
    fn as_value(self) -> Value {
        Value::Decimal(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Int64(v) => Ok(v.into()),
            Value::UInt64(v) => Ok(v.into()),
            Value::Float64(v) => Decimal::try_from(v).map_err(Into::into),
            Value::Varchar(ref v) => v
                .trim()
                .parse::<Decimal>()
                .map_err(|e| Error::new(e).context(mismatch::<Self>(&value))),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::Varchar(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(v) => Ok(v),
            Value::Blob(v) => String::from_utf8(v.into_vec())
                .map_err(|e| Error::new(e).context("Blob value is not valid UTF-8")),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Cow<'static, str> {
    fn as_value(self) -> Value {
        Value::Varchar(self.into_owned())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Into::into)
    }
}

impl AsValue for Vec<u8> {
    fn as_value(self) -> Value {
        Value::Blob(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v.into_vec()),
            Value::Varchar(v) => Ok(v.into_bytes()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Box<[u8]> {
    fn as_value(self) -> Value {
        Value::Blob(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Vec::<u8>::try_from_value(value).map(Into::into)
    }
}

macro_rules! impl_as_value_temporal {
    ($source:ty, $variant:path, $($format:tt),+ $(,)?) => {
        impl AsValue for $source {
            fn as_value(self) -> Value {
                $variant(self)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $variant(v) => Ok(v),
                    Value::Varchar(ref v) => {
                        $(
                            if let Ok(result) = <$source>::parse(
                                v.trim(),
                                format_description!($format),
                            ) {
                                return Ok(result);
                            }
                        )+
                        Err(mismatch::<Self>(&value))
                    }
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}
impl_as_value_temporal!(Date, Value::Date, "[year]-[month]-[day]");
impl_as_value_temporal!(
    Time,
    Value::Time,
    "[hour]:[minute]:[second].[subsecond]",
    "[hour]:[minute]:[second]",
);
impl_as_value_temporal!(
    PrimitiveDateTime,
    Value::Timestamp,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day] [hour]:[minute]:[second]",
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day]T[hour]:[minute]:[second]",
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}
