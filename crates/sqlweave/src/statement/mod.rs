//! Statement model and fluent mutators.
//!
//! A [`Statement`] is a plain value. Every mutator consumes it and returns the changed
//! statement, so forking a base is a `clone()` and the two forks never share clause lists:
//!
//! ```ignore
//! use sqlweave::table;
//!
//! let base = table("Users").where_("Active = ?", 1);
//! let page = base.clone().limit(10).select();
//! let all = base.select();
//!
//! assert_eq!(page.build()?.sql, "SELECT * FROM Users WHERE Active = ? LIMIT 10");
//! assert_eq!(all.build()?.sql, "SELECT * FROM Users WHERE Active = ?");
//! ```

mod build;
mod predicate;


use std::sync::Arc;

pub use build::{BuiltQuery, build};

use crate::arg::{Arg, IntoArgs};
use crate::condition::{Condition, Connector};
use crate::config::Config;
use crate::expr::Expr;
use crate::record::{Exclusions, IntoRecord, Record};
use crate::value::{Value, ValueKind};

/// The operation a statement compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    #[default]
    Unset,
    Select,
    Insert,
    Replace,
    Update,
    Patch,
    Delete,
    Exists,
    InsertSelect,
    Raw,
}

/// A table name or a derived table.
#[derive(Debug, Clone)]
pub enum TableRef {
    /// Emitted verbatim, so `Users AS u` works in joins.
    Name(String),
    Query(Arc<Statement>),
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::Name(name.to_string())
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::Name(name)
    }
}

impl From<Statement> for TableRef {
    fn from(stmt: Statement) -> Self {
        TableRef::Query(Arc::new(stmt))
    }
}

impl From<Arc<Statement>> for TableRef {
    fn from(stmt: Arc<Statement>) -> Self {
        TableRef::Query(stmt)
    }
}

/// One entry of the projection list.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Column or expression text, emitted verbatim.
    Column(String),
    /// A raw expression, nested statement or bound value.
    Arg(Arg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Join,
    Left,
    Right,
    Inner,
    Natural,
    Cross,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Join => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Natural => "NATURAL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone)]
pub enum Order {
    /// `ID DESC`, `RAND()`, ...
    Expr(String),
    /// `FIELD (column, ?, ?, ...)`
    Field { column: String, values: Vec<Value> },
}

/// Row limit. The three shapes are mutually exclusive; the last one set wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// `LIMIT count`
    Count(u64),
    /// `LIMIT offset, count`
    Range { offset: u64, count: u64 },
    /// `LIMIT count OFFSET offset`
    Offset { count: u64, offset: u64 },
}

#[derive(Debug, Clone)]
pub struct Union {
    pub all: bool,
    pub query: Arc<Statement>,
}

#[derive(Debug, Clone)]
pub(crate) struct Source {
    pub query: Arc<Statement>,
    pub columns: Vec<String>,
}

/// One compilable SQL statement.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    pub(crate) kind: StatementKind,
    pub(crate) table: Option<TableRef>,
    pub(crate) alias: Option<String>,
    pub(crate) columns: Vec<Projection>,
    pub(crate) wheres: Vec<Condition>,
    pub(crate) havings: Vec<Condition>,
    pub(crate) joins: Vec<Join>,
    pub(crate) groups: Vec<String>,
    pub(crate) orders: Vec<Order>,
    pub(crate) limit: Option<Limit>,
    pub(crate) options: Vec<String>,
    pub(crate) duplicate: Option<Record>,
    pub(crate) payload: Vec<Record>,
    pub(crate) omits: Vec<String>,
    pub(crate) exclusions: Exclusions,
    pub(crate) unions: Vec<Union>,
    pub(crate) source: Option<Source>,
    pub(crate) raw: Option<Expr>,
    pub(crate) config: Config,
}

/// Start a statement on a table.
pub fn table(name: impl Into<String>) -> Statement {
    Statement {
        table: Some(TableRef::from(name.into())),
        ..Statement::default()
    }
}

/// Start a statement on an aliased table (`Products AS p`).
pub fn table_as(name: impl Into<String>, alias: impl Into<String>) -> Statement {
    table(name).as_(alias)
}

/// Start a statement on a derived table.
pub fn from_query(query: impl Into<Arc<Statement>>) -> Statement {
    Statement {
        table: Some(TableRef::Query(query.into())),
        ..Statement::default()
    }
}

/// A statement compiled from a template and its arguments, bypassing clause assembly.
pub fn raw(sql: impl Into<String>, args: impl IntoArgs) -> Statement {
    Statement {
        kind: StatementKind::Raw,
        raw: Some(Expr::with_args(sql, args)),
        ..Statement::default()
    }
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn with_kind(mut self, kind: StatementKind) -> Self {
        self.kind = kind;
        self
    }

    // ==================== Kinds ====================

    /// `SELECT *`, or the projection set so far.
    pub fn select(self) -> Self {
        self.with_kind(StatementKind::Select)
    }

    /// `SELECT col, col, ...`, replacing any projection.
    pub fn select_cols<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = cols
            .into_iter()
            .map(|c| Projection::Column(c.into()))
            .collect();
        self.with_kind(StatementKind::Select)
    }

    /// Append a raw expression or sub-select to the projection.
    pub fn select_expr(mut self, arg: impl Into<Arg>) -> Self {
        self.columns.push(Projection::Arg(arg.into()));
        self.with_kind(StatementKind::Select)
    }

    /// `SELECT ... LIMIT 1`.
    pub fn select_one(self) -> Self {
        self.limit(1).select()
    }

    pub fn insert(mut self, record: impl IntoRecord) -> Self {
        self.payload = vec![record.into_record()];
        self.with_kind(StatementKind::Insert)
    }

    pub fn insert_many<I, R>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        self.payload = records.into_iter().map(IntoRecord::into_record).collect();
        self.with_kind(StatementKind::Insert)
    }

    pub fn replace(self, record: impl IntoRecord) -> Self {
        self.insert(record).with_kind(StatementKind::Replace)
    }

    pub fn replace_many<I, R>(self, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        self.insert_many(records).with_kind(StatementKind::Replace)
    }

    pub fn update(mut self, record: impl IntoRecord) -> Self {
        self.payload = vec![record.into_record()];
        self.with_kind(StatementKind::Update)
    }

    /// UPDATE that skips zero-valued fields, except those named by [`exclude`](Self::exclude)
    /// or [`exclude_kinds`](Self::exclude_kinds).
    pub fn patch(self, record: impl IntoRecord) -> Self {
        self.update(record).with_kind(StatementKind::Patch)
    }

    pub fn delete(self) -> Self {
        self.with_kind(StatementKind::Delete)
    }

    /// `SELECT EXISTS(<this statement as a select>)`.
    pub fn exists(self) -> Self {
        self.with_kind(StatementKind::Exists)
    }

    /// `INSERT INTO table (cols) <source>`.
    pub fn insert_select<I, S>(mut self, source: impl Into<Arc<Statement>>, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = Some(Source {
            query: source.into(),
            columns: cols.into_iter().map(Into::into).collect(),
        });
        self.with_kind(StatementKind::InsertSelect)
    }

    // ==================== Conditions ====================

    pub(crate) fn push_where(mut self, cond: Condition) -> Self {
        self.wheres.push(cond);
        self
    }

    pub(crate) fn push_having(mut self, cond: Condition) -> Self {
        self.havings.push(cond);
        self
    }

    /// Add an AND condition.
    ///
    /// `template` either carries `?`/`??` markers for `args`, is a complete expression with no
    /// args, or is a column name used as shorthand (`("ID", 1)`, `("Age", (">", 18))`).
    pub fn where_(self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.push_where(Condition::and(template, args))
    }

    pub fn or_where(self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.push_where(Condition::or(template, args))
    }

    pub fn where_expr(self, expr: Expr) -> Self {
        self.push_where(Condition::expr(Connector::And, expr))
    }

    pub fn or_where_expr(self, expr: Expr) -> Self {
        self.push_where(Condition::expr(Connector::Or, expr))
    }

    pub fn having(self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.push_having(Condition::and(template, args))
    }

    pub fn or_having(self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.push_having(Condition::or(template, args))
    }

    // ==================== Joins ====================

    fn push_join(
        mut self,
        kind: JoinKind,
        table: impl Into<TableRef>,
        on: impl Into<String>,
        args: impl IntoArgs,
    ) -> Self {
        let on = on.into();
        let args = args.into_args();
        let conditions = if on.trim().is_empty() && args.is_empty() {
            Vec::new()
        } else {
            vec![Condition {
                connector: Connector::And,
                template: on,
                args,
            }]
        };
        self.joins.push(Join {
            kind,
            table: table.into(),
            conditions,
        });
        self
    }

    pub fn join(self, table: impl Into<TableRef>, on: impl Into<String>, args: impl IntoArgs) -> Self {
        self.push_join(JoinKind::Join, table, on, args)
    }

    pub fn left_join(
        self,
        table: impl Into<TableRef>,
        on: impl Into<String>,
        args: impl IntoArgs,
    ) -> Self {
        self.push_join(JoinKind::Left, table, on, args)
    }

    pub fn right_join(
        self,
        table: impl Into<TableRef>,
        on: impl Into<String>,
        args: impl IntoArgs,
    ) -> Self {
        self.push_join(JoinKind::Right, table, on, args)
    }

    pub fn inner_join(
        self,
        table: impl Into<TableRef>,
        on: impl Into<String>,
        args: impl IntoArgs,
    ) -> Self {
        self.push_join(JoinKind::Inner, table, on, args)
    }

    pub fn natural_join(self, table: impl Into<TableRef>) -> Self {
        self.push_join(JoinKind::Natural, table, "", ())
    }

    pub fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.push_join(JoinKind::Cross, table, "", ())
    }

    fn push_join_condition(mut self, cond: Condition) -> Self {
        // Without a join there is nothing to attach to; the condition is dropped.
        if let Some(join) = self.joins.last_mut() {
            join.conditions.push(cond);
        }
        self
    }

    /// Add an AND condition to the most recent join.
    pub fn join_where(self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.push_join_condition(Condition::and(template, args))
    }

    /// Add an OR condition to the most recent join.
    pub fn or_join_where(self, template: impl Into<String>, args: impl IntoArgs) -> Self {
        self.push_join_condition(Condition::or(template, args))
    }

    // ==================== Ordering & grouping ====================

    /// `ORDER BY term`; terms accumulate.
    pub fn order_by(mut self, term: impl Into<String>) -> Self {
        self.orders.push(Order::Expr(term.into()));
        self
    }

    /// `ORDER BY FIELD (column, ?, ...)`.
    pub fn order_by_field<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.orders.push(Order::Field {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.groups.push(column.into());
        self
    }

    // ==================== Limits ====================

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(Limit::Count(count));
        self
    }

    /// `LIMIT offset, count`.
    pub fn limit_range(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some(Limit::Range { offset, count });
        self
    }

    /// `LIMIT count OFFSET offset`.
    pub fn offset(mut self, count: u64, offset: u64) -> Self {
        self.limit = Some(Limit::Offset { count, offset });
        self
    }

    /// One page of `per_page` rows; pages start at 1 and page 0 is treated as 1.
    pub fn paginate(self, page: u64, per_page: u64) -> Self {
        let offset = page.max(1).saturating_sub(1).saturating_mul(per_page);
        self.limit_range(offset, per_page)
    }

    pub fn clear_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    // ==================== Options ====================

    /// Add a MySQL execution option such as `SQL_NO_CACHE` or `FOR UPDATE`.
    ///
    /// Options are normalized to upper case; unsupported ones fail the build.
    pub fn set_option(mut self, option: impl AsRef<str>) -> Self {
        let option = option
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        if !option.is_empty() && !self.options.contains(&option) {
            self.options.push(option);
        }
        self
    }

    pub fn distinct(self) -> Self {
        self.set_option("DISTINCT")
    }

    pub fn for_update(self) -> Self {
        self.set_option("FOR UPDATE")
    }

    pub fn lock_in_share_mode(self) -> Self {
        self.set_option("LOCK IN SHARE MODE")
    }

    // ==================== Write modifiers ====================

    /// `ON DUPLICATE KEY UPDATE col = value, ...`.
    pub fn on_duplicate(mut self, record: impl IntoRecord) -> Self {
        self.duplicate = Some(record.into_record());
        self
    }

    /// Drop these columns from the payload.
    pub fn omit<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.omits.extend(cols.into_iter().map(Into::into));
        self
    }

    /// Keep these fields in a patch even when zero-valued.
    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Keep fields of these kinds in a patch even when zero-valued.
    pub fn exclude_kinds(mut self, kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        self.exclusions.kinds.extend(kinds);
        self
    }

    // ==================== Aliasing, unions, config ====================

    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn union(mut self, query: impl Into<Arc<Statement>>) -> Self {
        self.unions.push(Union {
            all: false,
            query: query.into(),
        });
        self
    }

    pub fn union_all(mut self, query: impl Into<Arc<Statement>>) -> Self {
        self.unions.push(Union {
            all: true,
            query: query.into(),
        });
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}
