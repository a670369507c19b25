//! `CREATE TABLE` / `DROP TABLE` formatting.
//!
//! Separate from statement compilation: nothing here is bound, every literal is inlined and
//! every name goes through the same back-tick quoting as `??` markers.
//!
//! ```ignore
//! use sqlweave::schema::{Column, ColumnType, create_table};
//!
//! let ddl = create_table("users")
//!     .column(Column::new("id", ColumnType::Int(10)).unsigned().auto_increment().primary())
//!     .column(Column::new("email", ColumnType::Varchar(191)).unique())
//!     .build()?;
//! ```

use std::fmt::Write as _;

use crate::error::{WeaveError, WeaveResult};
use crate::ident::quote_ident;
use crate::value::Value;

/// Column data types.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    TinyInt(u32),
    SmallInt(u32),
    MediumInt(u32),
    Int(u32),
    BigInt(u32),
    Char(u32),
    Varchar(u32),
    Binary(u32),
    Varbinary(u32),
    Bit(u32),
    TinyText,
    Text,
    MediumText,
    LongText,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Date,
    DateTime,
    Time,
    Timestamp,
    Year,
    /// `DOUBLE(precision, scale)`
    Double(u32, u32),
    /// `DECIMAL(precision, scale)`
    Decimal(u32, u32),
    /// `FLOAT(precision)` or `FLOAT(precision, scale)`
    Float(u32, Option<u32>),
    Enum(Vec<String>),
    Set(Vec<String>),
    Json,
}

impl ColumnType {
    fn to_sql(&self) -> WeaveResult<String> {
        Ok(match self {
            Self::TinyInt(n) => format!("TINYINT({n})"),
            Self::SmallInt(n) => format!("SMALLINT({n})"),
            Self::MediumInt(n) => format!("MEDIUMINT({n})"),
            Self::Int(n) => format!("INT({n})"),
            Self::BigInt(n) => format!("BIGINT({n})"),
            Self::Char(n) => format!("CHAR({n})"),
            Self::Varchar(n) => format!("VARCHAR({n})"),
            Self::Binary(n) => format!("BINARY({n})"),
            Self::Varbinary(n) => format!("VARBINARY({n})"),
            Self::Bit(n) => format!("BIT({n})"),
            Self::TinyText => "TINYTEXT".to_string(),
            Self::Text => "TEXT".to_string(),
            Self::MediumText => "MEDIUMTEXT".to_string(),
            Self::LongText => "LONGTEXT".to_string(),
            Self::TinyBlob => "TINYBLOB".to_string(),
            Self::Blob => "BLOB".to_string(),
            Self::MediumBlob => "MEDIUMBLOB".to_string(),
            Self::LongBlob => "LONGBLOB".to_string(),
            Self::Date => "DATE".to_string(),
            Self::DateTime => "DATETIME".to_string(),
            Self::Time => "TIME".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::Year => "YEAR".to_string(),
            Self::Double(p, s) => format!("DOUBLE({p}, {s})"),
            Self::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
            Self::Float(p, None) => format!("FLOAT({p})"),
            Self::Float(p, Some(s)) => format!("FLOAT({p}, {s})"),
            Self::Enum(items) => format!("ENUM({})", members("ENUM", items)?),
            Self::Set(items) => format!("SET({})", members("SET", items)?),
            Self::Json => "JSON".to_string(),
        })
    }
}

fn members(kind: &str, items: &[String]) -> WeaveResult<String> {
    if items.is_empty() {
        return Err(WeaveError::schema(format!("{kind} column needs at least one member")));
    }
    Ok(items
        .iter()
        .map(|item| string_literal(item))
        .collect::<Vec<_>>()
        .join(", "))
}

/// `'text'` with quotes doubled and backslashes escaped.
fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// A column default.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    /// Inlined literal; text is quoted, numbers are not.
    Literal(Value),
    /// Verbatim SQL such as `CURRENT_TIMESTAMP` or `NOW()`.
    Expr(String),
}

impl ColumnDefault {
    fn to_sql(&self) -> WeaveResult<String> {
        match self {
            Self::Expr(sql) => Ok(sql.clone()),
            Self::Literal(value) => literal(value),
        }
    }
}

fn literal(value: &Value) -> WeaveResult<String> {
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Text(s) => string_literal(s),
        Value::Date(d) => string_literal(&d.to_string()),
        Value::Time(t) => string_literal(&t.to_string()),
        Value::DateTime(dt) => string_literal(&dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        Value::Timestamp(ts) => string_literal(&ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        Value::Uuid(id) => string_literal(&id.to_string()),
        Value::Json(json) => string_literal(&json.to_string()),
        #[cfg(feature = "rust_decimal")]
        Value::Decimal(d) => d.to_string(),
        Value::Bytes(_) => {
            return Err(WeaveError::schema("binary defaults cannot be inlined"));
        }
    })
}

/// One column definition.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    ty: ColumnType,
    nullable: bool,
    unsigned: bool,
    auto_increment: bool,
    default: Option<ColumnDefault>,
    primary: bool,
    unique: bool,
    index: bool,
    comment: Option<String>,
    references: Option<String>,
}

impl Column {
    /// A `NOT NULL` column of the given type.
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            unsigned: false,
            auto_increment: false,
            default: None,
            primary: false,
            unique: false,
            index: false,
            comment: None,
            references: None,
        }
    }

    /// Allow NULL. A nullable column without an explicit default gets `DEFAULT NULL`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Literal default. `Value::Null` renders `DEFAULT NULL`.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ColumnDefault::Literal(value.into()));
        self
    }

    /// Verbatim default expression.
    pub fn default_expr(mut self, sql: impl Into<String>) -> Self {
        self.default = Some(ColumnDefault::Expr(sql.into()));
        self
    }

    /// Inline `PRIMARY KEY`.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Inline `UNIQUE`.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Anonymous single-column `INDEX`.
    pub fn index(mut self) -> Self {
        self.index = true;
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }

    /// Single-column foreign key to `table.column`.
    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.references = Some(target.into());
        self
    }

    fn to_sql(&self) -> WeaveResult<String> {
        let mut out = format!("{} {}", quote_ident(&self.name)?, self.ty.to_sql()?);
        if self.unsigned {
            out.push_str(" UNSIGNED");
        }
        if !self.nullable {
            out.push_str(" NOT NULL");
        }
        match &self.default {
            Some(default) => {
                let _ = write!(out, " DEFAULT {}", default.to_sql()?);
            }
            None if self.nullable => out.push_str(" DEFAULT NULL"),
            None => {}
        }
        if self.auto_increment {
            out.push_str(" AUTO_INCREMENT");
        }
        if self.primary {
            out.push_str(" PRIMARY KEY");
        }
        if self.unique {
            out.push_str(" UNIQUE");
        }
        if let Some(comment) = &self.comment {
            let _ = write!(out, " COMMENT {}", string_literal(comment));
        }
        Ok(out)
    }
}

/// A composite key: `PRIMARY KEY`, `UNIQUE KEY` or `INDEX`, optionally named.
#[derive(Debug, Clone)]
pub struct Key {
    name: Option<String>,
    columns: Vec<String>,
}

impl Key {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn to_sql(&self, keyword: &str) -> WeaveResult<String> {
        let mut out = keyword.to_string();
        if let Some(name) = &self.name {
            let _ = write!(out, " {}", quote_ident(name)?);
        }
        let _ = write!(out, " ({})", quoted_list(&self.columns, keyword)?);
        Ok(out)
    }
}

fn quoted_list(columns: &[String], context: &str) -> WeaveResult<String> {
    if columns.is_empty() {
        return Err(WeaveError::schema(format!("{context} needs at least one column")));
    }
    let quoted = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<WeaveResult<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

/// `ON UPDATE` / `ON DELETE` behaviour of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceAction {
    Restrict,
    Cascade,
    SetNull,
    NoAction,
    SetDefault,
}

impl ReferenceAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// `FOREIGN KEY [name] (cols) REFERENCES table (cols) [ON UPDATE ..] [ON DELETE ..]`
#[derive(Debug, Clone)]
pub struct ForeignKey {
    name: Option<String>,
    columns: Vec<String>,
    table: String,
    references: Vec<String>,
    on_update: Option<ReferenceAction>,
    on_delete: Option<ReferenceAction>,
}

impl ForeignKey {
    pub fn new<I, S, R, T>(columns: I, table: impl Into<String>, references: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
            table: table.into(),
            references: references.into_iter().map(Into::into).collect(),
            on_update: None,
            on_delete: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_update(mut self, action: ReferenceAction) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn on_delete(mut self, action: ReferenceAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    fn to_sql(&self) -> WeaveResult<String> {
        if self.columns.len() != self.references.len() {
            return Err(WeaveError::schema(format!(
                "foreign key on {:?} references {} column(s)",
                self.columns,
                self.references.len()
            )));
        }
        let mut out = "FOREIGN KEY".to_string();
        if let Some(name) = &self.name {
            let _ = write!(out, " {}", quote_ident(name)?);
        }
        let _ = write!(
            out,
            " ({}) REFERENCES {} ({})",
            quoted_list(&self.columns, "FOREIGN KEY")?,
            quote_ident(&self.table)?,
            quoted_list(&self.references, "REFERENCES")?
        );
        if let Some(action) = self.on_update {
            let _ = write!(out, " ON UPDATE {}", action.as_sql());
        }
        if let Some(action) = self.on_delete {
            let _ = write!(out, " ON DELETE {}", action.as_sql());
        }
        Ok(out)
    }
}

/// Storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    InnoDb,
    MyIsam,
    Memory,
}

impl Engine {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::InnoDb => "INNODB",
            Self::MyIsam => "MYISAM",
            Self::Memory => "MEMORY",
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS` builder.
#[derive(Debug, Clone)]
#[must_use]
pub struct CreateTable {
    name: String,
    columns: Vec<Column>,
    primary: Option<Key>,
    uniques: Vec<Key>,
    indexes: Vec<Key>,
    foreign: Vec<ForeignKey>,
    engine: Engine,
    comment: Option<String>,
}

/// Start a table definition.
pub fn create_table(name: impl Into<String>) -> CreateTable {
    CreateTable {
        name: name.into(),
        columns: Vec::new(),
        primary: None,
        uniques: Vec::new(),
        indexes: Vec::new(),
        foreign: Vec::new(),
        engine: Engine::default(),
        comment: None,
    }
}

/// ``DROP TABLE `name` ``
pub fn drop_table(name: &str) -> WeaveResult<String> {
    Ok(format!("DROP TABLE {}", quote_ident(name)?))
}

/// ``DROP TABLE IF EXISTS `name` ``
pub fn drop_table_if_exists(name: &str) -> WeaveResult<String> {
    Ok(format!("DROP TABLE IF EXISTS {}", quote_ident(name)?))
}

impl CreateTable {
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Composite primary key. A later call replaces an earlier one.
    pub fn primary_key(mut self, key: Key) -> Self {
        self.primary = Some(key);
        self
    }

    pub fn unique_key(mut self, key: Key) -> Self {
        self.uniques.push(key);
        self
    }

    pub fn index(mut self, key: Key) -> Self {
        self.indexes.push(key);
        self
    }

    pub fn foreign_key(mut self, key: ForeignKey) -> Self {
        self.foreign.push(key);
        self
    }

    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }

    /// Render the statement.
    ///
    /// Columns come first, then keys in the order primary, unique, index, foreign.
    pub fn build(&self) -> WeaveResult<String> {
        if self.columns.is_empty() {
            return Err(WeaveError::schema(format!("table `{}` has no columns", self.name)));
        }
        if self.primary.is_some() && self.columns.iter().any(|c| c.primary) {
            return Err(WeaveError::schema(format!(
                "table `{}` declares both a column and a composite primary key",
                self.name
            )));
        }

        let mut defs = Vec::with_capacity(self.columns.len() + 4);
        for column in &self.columns {
            defs.push(column.to_sql()?);
        }
        if let Some(key) = &self.primary {
            defs.push(key.to_sql("PRIMARY KEY")?);
        }
        for key in &self.uniques {
            defs.push(key.to_sql("UNIQUE KEY")?);
        }
        for column in self.columns.iter().filter(|c| c.index) {
            defs.push(format!("INDEX ({})", quote_ident(&column.name)?));
        }
        for key in &self.indexes {
            defs.push(key.to_sql("INDEX")?);
        }
        for column in &self.columns {
            if let Some(target) = &column.references {
                let Some((table, referenced)) = target.rsplit_once('.') else {
                    return Err(WeaveError::schema(format!(
                        "column `{}` references `{target}`, expected `table.column`",
                        column.name
                    )));
                };
                let key = ForeignKey::new([column.name.as_str()], table, [referenced]);
                defs.push(key.to_sql()?);
            }
        }
        for key in &self.foreign {
            defs.push(key.to_sql()?);
        }

        let mut out = format!(
            "CREATE TABLE IF NOT EXISTS {} ({}) ENGINE={}",
            quote_ident(&self.name)?,
            defs.join(", "),
            self.engine.as_sql()
        );
        if let Some(comment) = &self.comment {
            let _ = write!(out, ", COMMENT={}", string_literal(comment));
        }
        Ok(out)
    }
}
