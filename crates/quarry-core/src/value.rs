//! Scalar values stored in and bound to SQLite statements.

use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::error::{Result, StoreError};

/// A single column value or positional parameter.
///
/// Mirrors SQLite's storage classes: every value read from a row or bound to
/// a statement is exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Name of the storage class, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(r) => ValueRef::Real(*r),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, bool);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Builds a positional parameter list from heterogeneous scalars.
///
/// ```
/// use quarry_core::{values, Value};
///
/// let params = values!["Ship tests", 42];
/// assert_eq!(params, vec![Value::Text("Ship tests".into()), Value::Integer(42)]);
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}

/// Conversion from a column value into a concrete Rust type.
pub trait FromValue: Sized {
    /// Converts `value`, read from `column`, or reports a type mismatch.
    fn from_value(column: &str, value: &Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(_column: &str, value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| StoreError::invalid_type(column, "integer", value.type_name()))
    }
}

macro_rules! impl_from_value_narrowing {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(column: &str, value: &Value) -> Result<Self> {
                    let wide = i64::from_value(column, value)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        StoreError::invalid_type(column, stringify!($ty), "out-of-range integer")
                    })
                }
            }
        )*
    };
}

impl_from_value_narrowing!(i32, u32, u64);

impl FromValue for bool {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        i64::from_value(column, value).map(|i| i != 0)
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| StoreError::invalid_type(column, "real", value.type_name()))
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| StoreError::invalid_type(column, "text", value.type_name()))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        value
            .as_blob()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| StoreError::invalid_type(column, "blob", value.type_name()))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}
