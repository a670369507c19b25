//! Bindable values.
//!
//! A [`Value`] is what ends up in [`BuiltQuery::params`](crate::BuiltQuery): one entry per `?`
//! in the compiled SQL, handed to the driver as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

/// A driver-bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

/// The kind of a [`Value`], used by patch exclusion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    Text,
    Bytes,
    Date,
    Time,
    DateTime,
    Timestamp,
    Uuid,
    Json,
    Decimal,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Json(_) => ValueKind::Json,
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => ValueKind::Decimal,
        }
    }

    /// Whether this is the zero/empty value of its kind.
    ///
    /// Temporal values are zero at their `Default` (the Unix epoch, or midnight for times),
    /// UUIDs when nil, JSON when `null`.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !*b,
            Value::Int(i) => *i == 0,
            Value::UInt(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Date(d) => *d == NaiveDate::default(),
            Value::Time(t) => *t == NaiveTime::default(),
            Value::DateTime(dt) => *dt == NaiveDateTime::default(),
            Value::Timestamp(ts) => *ts == DateTime::<Utc>::default(),
            Value::Uuid(u) => u.is_nil(),
            Value::Json(j) => j.is_null(),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(d) => d.is_zero(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($variant:ident <- $($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )+
    };
}

impl_value_from!(Bool <- bool);
impl_value_from!(Int <- i8, i16, i32, i64);
impl_value_from!(UInt <- u8, u16, u32, u64);
impl_value_from!(Float <- f32, f64);
impl_value_from!(Text <- String, &str, &String, Box<str>);
impl_value_from!(Bytes <- Vec<u8>, &[u8]);
impl_value_from!(Date <- NaiveDate);
impl_value_from!(Time <- NaiveTime);
impl_value_from!(DateTime <- NaiveDateTime);
impl_value_from!(Timestamp <- DateTime<Utc>);
impl_value_from!(Uuid <- Uuid);
impl_value_from!(Json <- serde_json::Value);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
