//! Arguments accepted in value position.
//!
//! Every value handed to a condition, payload or projection becomes one [`Arg`] variant, and
//! the compiler has exactly one rendering rule per variant:
//!
//! | variant | rendered as | bound |
//! |---|---|---|
//! | `Value` | `?` | the value |
//! | `Null` | `NULL` | nothing |
//! | `Raw` | the expression, inline | the expression's own args |
//! | `Query` | `(sub-select)` | the sub-statement's params, in place |
//! | `Ident` | `` `quoted` `` | nothing |
//! | `Seq` | `(?, ?, ...)` | each element |

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::expr::Expr;
use crate::statement::Statement;
use crate::value::{Value, ValueKind};

/// One argument in value position.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A literal bound as a driver parameter.
    Value(Value),
    /// The SQL keyword `NULL`, emitted inline.
    Null,
    /// A raw expression merged inline.
    Raw(Expr),
    /// A nested statement, compiled and parenthesized in place.
    Query(Arc<Statement>),
    /// Identifier text, quoted and emitted inline.
    Ident(String),
    /// A list expanded into one placeholder per element.
    Seq(Vec<Value>),
}

impl Arg {
    /// The inline `NULL` keyword.
    pub fn null() -> Self {
        Arg::Null
    }

    /// Identifier text for `??` positions.
    pub fn ident(name: impl Into<String>) -> Self {
        Arg::Ident(name.into())
    }

    /// A sequence of values.
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Arg::Seq(items.into_iter().map(Into::into).collect())
    }

    /// The value kind, for literal arguments.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Arg::Value(v) => Some(v.kind()),
            Arg::Null => Some(ValueKind::Null),
            _ => None,
        }
    }

    /// Whether the argument is a zero value (patch elision).
    ///
    /// Raw expressions and nested statements are never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Arg::Value(v) => v.is_zero(),
            Arg::Null => true,
            Arg::Seq(items) => items.is_empty(),
            Arg::Ident(name) => name.is_empty(),
            Arg::Raw(_) | Arg::Query(_) => false,
        }
    }

    /// Text usable as an identifier (`??` positions and shorthand operators).
    pub(crate) fn as_text(&self) -> Option<&str> {
        match self {
            Arg::Value(Value::Text(s)) | Arg::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn is_list_like(&self) -> bool {
        matches!(self, Arg::Seq(_) | Arg::Query(_))
    }
}

macro_rules! impl_arg_from_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(v.into())
                }
            }

            impl IntoArgs for $ty {
                fn into_args(self) -> Vec<Arg> {
                    vec![Arg::from(self)]
                }
            }
        )+
    };
}

impl_arg_from_value!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &str,
    &String,
    Box<str>,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    Uuid,
    serde_json::Value,
);

#[cfg(feature = "rust_decimal")]
impl_arg_from_value!(rust_decimal::Decimal);

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Value(Value::from(v))
    }
}

/// Element types that expand a `Vec` or array into a `(?, ?, ...)` sequence.
///
/// `u8` is deliberately absent: `Vec<u8>` and `&[u8]` bind as one bytes value.
pub trait SeqItem: Into<Value> {}

macro_rules! impl_seq_item {
    ($($ty:ty),+ $(,)?) => {
        $(impl SeqItem for $ty {})+
    };
}

impl_seq_item!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &str,
    &String,
    Box<str>,
    Vec<u8>,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    Uuid,
    serde_json::Value,
);

#[cfg(feature = "rust_decimal")]
impl_seq_item!(rust_decimal::Decimal);

impl From<Vec<u8>> for Arg {
    fn from(v: Vec<u8>) -> Self {
        Arg::Value(Value::Bytes(v))
    }
}

impl From<&[u8]> for Arg {
    fn from(v: &[u8]) -> Self {
        Arg::Value(Value::Bytes(v.to_vec()))
    }
}

impl<T: SeqItem> From<Vec<T>> for Arg {
    fn from(v: Vec<T>) -> Self {
        Arg::seq(v)
    }
}

impl<T: SeqItem, const N: usize> From<[T; N]> for Arg {
    fn from(v: [T; N]) -> Self {
        Arg::seq(v)
    }
}

impl From<Expr> for Arg {
    fn from(v: Expr) -> Self {
        Arg::Raw(v)
    }
}

impl From<Statement> for Arg {
    fn from(v: Statement) -> Self {
        Arg::Query(Arc::new(v))
    }
}

impl From<&Statement> for Arg {
    fn from(v: &Statement) -> Self {
        Arg::Query(Arc::new(v.clone()))
    }
}

impl From<Arc<Statement>> for Arg {
    fn from(v: Arc<Statement>) -> Self {
        Arg::Query(v)
    }
}

/// An ordered argument list of any length.
///
/// Tuples cover up to eight arguments; use [`args!`](crate::args) beyond that.
#[derive(Debug, Clone, Default)]
pub struct Args(pub Vec<Arg>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, arg: impl Into<Arg>) -> Self {
        self.0.push(arg.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Args(iter.into_iter().collect())
    }
}

/// Build an [`Args`] list from heterogeneous values.
///
/// ```ignore
/// let a = sqlweave::args![1, "admin", sqlweave::Expr::new("NOW()")];
/// ```
#[macro_export]
macro_rules! args {
    () => { $crate::Args::new() };
    ($($x:expr),+ $(,)?) => {
        $crate::Args(vec![$($crate::Arg::from($x)),+])
    };
}

/// Conversion into an argument list.
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl IntoArgs for Args {
    fn into_args(self) -> Vec<Arg> {
        self.0
    }
}

impl IntoArgs for Arg {
    fn into_args(self) -> Vec<Arg> {
        vec![self]
    }
}

impl IntoArgs for Expr {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl IntoArgs for Statement {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl IntoArgs for &Statement {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl IntoArgs for Arc<Statement> {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl<T: Into<Value>> IntoArgs for Option<T> {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl IntoArgs for Vec<u8> {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl IntoArgs for &[u8] {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl<T: SeqItem> IntoArgs for Vec<T> {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

impl<T: SeqItem, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<Arg> {
        vec![Arg::from(self)]
    }
}

macro_rules! impl_into_args_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<Arg>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Arg> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_into_args_tuple!(A);
impl_into_args_tuple!(A, B);
impl_into_args_tuple!(A, B, C);
impl_into_args_tuple!(A, B, C, D);
impl_into_args_tuple!(A, B, C, D, E);
impl_into_args_tuple!(A, B, C, D, E, F);
impl_into_args_tuple!(A, B, C, D, E, F, G);
impl_into_args_tuple!(A, B, C, D, E, F, G, H);
