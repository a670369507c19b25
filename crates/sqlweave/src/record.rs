//! Write payloads.
//!
//! A [`Record`] is an ordered list of named fields. It is built explicitly (the [`record!`]
//! macro, key/value collections, JSON objects) or generated by `#[derive(Record)]`, which
//! carries per-field rename and omit annotations.
//!
//! [`record!`]: crate::record

use std::collections::{BTreeMap, HashMap};

use crate::arg::Arg;
use crate::config::ColumnNaming;
use crate::value::{Value, ValueKind};

/// One named payload field.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub value: Arg,
    /// Explicit column name. `""` and `"-"` drop the field.
    pub rename: Option<String>,
    pub omit: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            rename: None,
            omit: false,
        }
    }

    pub fn rename(mut self, column: impl Into<String>) -> Self {
        self.rename = Some(column.into());
        self
    }

    pub fn omit(mut self) -> Self {
        self.omit = true;
        self
    }

    /// The column this field writes to, or `None` when it is dropped.
    pub fn column(&self, naming: ColumnNaming) -> Option<String> {
        if self.omit {
            return None;
        }
        match self.rename.as_deref() {
            Some("") | Some("-") => None,
            Some(column) => Some(column.to_string()),
            None => Some(naming.apply(&self.name)),
        }
    }
}

/// An ordered set of named fields.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing one of the same name in place.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.put(Field::new(name, value));
        self
    }

    /// Append a pre-annotated field.
    pub fn field(mut self, field: Field) -> Self {
        self.put(field);
        self
    }

    pub fn push(&mut self, field: Field) {
        self.put(field);
    }

    fn put(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Fields exempt from patch elision, by name or by value kind.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    pub fields: Vec<String>,
    pub kinds: Vec<ValueKind>,
}

impl Exclusions {
    pub(crate) fn keeps(&self, column: &str, name: &str, kind: Option<ValueKind>) -> bool {
        self.fields.iter().any(|f| f == column || f == name)
            || kind.is_some_and(|k| self.kinds.contains(&k))
    }
}

/// Conversion into a write payload.
pub trait IntoRecord {
    fn into_record(self) -> Record;
}

impl IntoRecord for Record {
    fn into_record(self) -> Record {
        self
    }
}

impl IntoRecord for &Record {
    fn into_record(self) -> Record {
        self.clone()
    }
}

impl<K: Into<String>, V: Into<Arg>> IntoRecord for Vec<(K, V)> {
    fn into_record(self) -> Record {
        self.into_iter().fold(Record::new(), |r, (k, v)| r.set(k, v))
    }
}

impl<K: Into<String>, V: Into<Arg>, const N: usize> IntoRecord for [(K, V); N] {
    fn into_record(self) -> Record {
        self.into_iter().fold(Record::new(), |r, (k, v)| r.set(k, v))
    }
}

impl<K: Into<String>, V: Into<Arg>> IntoRecord for BTreeMap<K, V> {
    fn into_record(self) -> Record {
        self.into_iter().fold(Record::new(), |r, (k, v)| r.set(k, v))
    }
}

/// Iteration order of a `HashMap` is unspecified; pair it with `Config::order_columns`.
impl<K: Into<String>, V: Into<Arg>, S> IntoRecord for HashMap<K, V, S> {
    fn into_record(self) -> Record {
        self.into_iter().fold(Record::new(), |r, (k, v)| r.set(k, v))
    }
}

impl IntoRecord for serde_json::Map<String, serde_json::Value> {
    fn into_record(self) -> Record {
        self.into_iter()
            .fold(Record::new(), |r, (k, v)| r.set(k, json_arg(v)))
    }
}

fn json_arg(value: serde_json::Value) -> Arg {
    use serde_json::Value as Json;

    match value {
        Json::Null => Arg::Value(Value::Null),
        Json::Bool(b) => Arg::from(b),
        Json::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Arg::from(i),
            (None, Some(u), _) => Arg::from(u),
            (None, None, Some(f)) => Arg::from(f),
            _ => Arg::Value(Value::Json(Json::Number(n))),
        },
        Json::String(s) => Arg::from(s),
        nested @ (Json::Array(_) | Json::Object(_)) => Arg::from(nested),
    }
}

/// Build a [`Record`] from `name => value` pairs, keeping their order.
///
/// ```ignore
/// let r = sqlweave::record! { "Username" => "admin", "Age" => 30 };
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::Record::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::Record::new()$(.set($name, $value))+
    };
}
