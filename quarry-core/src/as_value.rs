use crate::{Error, Result, Value};
use std::any;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used for query parameters and row decoding.
///
/// # Error semantics
/// - Integer conversions are range checked, the error names both the
///   offending value and the target type.
/// - Floating point conversions refuse values that would not survive the
///   round trip (no silent precision loss).
/// - `NULL` only converts into `Option<T>` (as `None`) or [`Value`].
///
/// # Examples
/// ```rust
/// use quarry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Integer(42));
/// let n: i32 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Convert this value into its owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn unexpected<T>(value: &Value) -> Error {
    let error = Error::msg(format!(
        "Cannot convert {} value {} into {}",
        value.kind_name(),
        value,
        any::type_name::<T>()
    ));
    log::debug!("{:#}", error);
    error
}

macro_rules! impl_as_value_integer {
    ($($source:ty),+ $(,)?) => {$(
        impl AsValue for $source {
            fn as_value(self) -> Value {
                Value::Integer(self as i64)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Integer(v) => <$source>::try_from(v).map_err(|_| {
                        Error::msg(format!(
                            "Value {v}: i64 is out of range for {}",
                            any::type_name::<$source>()
                        ))
                    }),
                    _ => Err(unexpected::<$source>(&value)),
                }
            }
        }
        impl From<$source> for Value {
            fn from(value: $source) -> Self {
                value.as_value()
            }
        }
    )+};
}

impl_as_value_integer!(i8, i16, i32, i64, isize, u8, u16, u32);

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Integer(self as i64)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            Value::Integer(v) => Err(Error::msg(format!(
                "Value {v}: i64 is neither 0 nor 1, cannot be read as bool"
            ))),
            _ => Err(unexpected::<bool>(&value)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        value.as_value()
    }
}

impl AsValue for f64 {
    fn as_value(self) -> Value {
        Value::Real(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Real(v) => Ok(v),
            Value::Integer(v) if v as f64 as i128 == v as i128 => Ok(v as f64),
            Value::Integer(v) => Err(Error::msg(format!(
                "Value {v}: i64 cannot be represented exactly as f64"
            ))),
            _ => Err(unexpected::<f64>(&value)),
        }
    }
}

impl AsValue for f32 {
    fn as_value(self) -> Value {
        Value::Real(self as f64)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let v = f64::try_from_value(value)?;
        let narrowed = v as f32;
        if v.is_nan() || narrowed as f64 == v {
            Ok(narrowed)
        } else {
            Err(Error::msg(format!(
                "Value {v}: f64 cannot be represented exactly as f32"
            )))
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        value.as_value()
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        value.as_value()
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::Text(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v),
            _ => Err(unexpected::<String>(&value)),
        }
    }
}

impl AsValue for Box<str> {
    fn as_value(self) -> Value {
        Value::Text(self.into())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(String::into_boxed_str)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl AsValue for Vec<u8> {
    fn as_value(self) -> Value {
        Value::Blob(self.into_boxed_slice())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Box::<[u8]>::try_from_value(value).map(Into::into)
    }
}

impl AsValue for Box<[u8]> {
    fn as_value(self) -> Value {
        Value::Blob(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v),
            _ => Err(unexpected::<Box<[u8]>>(&value)),
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        value.as_value()
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.into())
    }
}

impl AsValue for Value {
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            v => T::try_from_value(v).map(Some),
        }
    }
}

impl<T: AsValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.as_value()
    }
}
