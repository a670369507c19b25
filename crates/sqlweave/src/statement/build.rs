//! Clause assembly.
//!
//! Clauses are emitted in a fixed order, each only when non-empty:
//! head, alias, ON DUPLICATE KEY UPDATE, unions, joins, WHERE, HAVING, ORDER BY, GROUP BY,
//! LIMIT / OFFSET, trailing options.

use tracing::{debug, trace};

use super::{Limit, Order, Projection, Statement, StatementKind, TableRef};
use crate::arg::Arg;
use crate::compile::{Compiler, ParamList, Position};
use crate::error::{WeaveError, WeaveResult};
use crate::flatten::{FlattenRules, flatten};
use crate::record::{Exclusions, Record};
use crate::value::Value;

/// Options emitted right after the statement verb.
const LEADING_OPTIONS: &[&str] = &[
    "ALL",
    "DISTINCT",
    "SQL_CACHE",
    "SQL_NO_CACHE",
    "DISTINCTROW",
    "HIGH_PRIORITY",
    "STRAIGHT_JOIN",
    "SQL_SMALL_RESULT",
    "SQL_BIG_RESULT",
    "SQL_BUFFER_RESULT",
    "SQL_CALC_FOUND_ROWS",
    "LOW_PRIORITY",
    "QUICK",
    "IGNORE",
    "DELAYED",
];

/// Options emitted at the very end.
const TRAILING_OPTIONS: &[&str] = &["FOR UPDATE", "LOCK IN SHARE MODE"];

/// Compiled SQL text and its bound values, one per `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Compile a statement. Same as [`Statement::build`].
pub fn build(stmt: &Statement) -> WeaveResult<BuiltQuery> {
    stmt.build()
}

impl Statement {
    /// Compile into SQL text plus bound values.
    ///
    /// Building never mutates the statement; building twice yields the same result.
    pub fn build(&self) -> WeaveResult<BuiltQuery> {
        match self.compile_nested(true) {
            Ok(built) => {
                trace!(
                    target: "sqlweave.build",
                    kind = ?self.kind,
                    params = built.params.len(),
                    sql = %built.sql,
                    "statement compiled"
                );
                Ok(built)
            }
            Err(error) => {
                debug!(target: "sqlweave.build", kind = ?self.kind, %error, "statement build failed");
                Err(error)
            }
        }
    }

    /// Compile on a fresh parameter list. `with_alias = false` leaves the alias to the caller.
    pub(crate) fn compile_nested(&self, with_alias: bool) -> WeaveResult<BuiltQuery> {
        let mut params = ParamList::new();
        let sql = {
            let mut compiler = Compiler::new(&mut params);
            assemble(self, &mut compiler, with_alias)?
        };
        Ok(BuiltQuery {
            sql,
            params: params.into_vec(),
        })
    }
}

fn assemble(stmt: &Statement, c: &mut Compiler<'_>, with_alias: bool) -> WeaveResult<String> {
    match stmt.kind {
        StatementKind::Unset => Err(WeaveError::UnsetKind),
        StatementKind::Raw => match &stmt.raw {
            Some(expr) => c.template(&expr.sql, &expr.args, Position::Bare),
            None => Err(WeaveError::UnsetKind),
        },
        StatementKind::Exists => {
            let mut inner = stmt.clone();
            inner.kind = StatementKind::Select;
            let sql = assemble(&inner, c, with_alias)?;
            Ok(format!("SELECT EXISTS({sql})"))
        }
        _ => clauses(stmt, c, with_alias),
    }
}

fn clauses(stmt: &Statement, c: &mut Compiler<'_>, with_alias: bool) -> WeaveResult<String> {
    let (leading, trailing) = split_options(&stmt.options)?;
    let mut parts = Vec::with_capacity(8);

    let (head, derived_alias) = head(stmt, c, &leading)?;
    parts.push(head);

    let own_alias = if with_alias { stmt.alias.as_deref() } else { None };
    if let Some(alias) = own_alias.or(derived_alias) {
        parts.push(format!("AS {alias}"));
    }

    if let Some(record) = &stmt.duplicate {
        // Omits shape the inserted row only.
        let dup_rules = FlattenRules {
            omits: &[],
            ..rules(stmt, &stmt.exclusions, false)
        };
        let pairs = assignments(stmt, c, std::slice::from_ref(record), dup_rules, "ON DUPLICATE")?;
        parts.push(format!("ON DUPLICATE KEY UPDATE {pairs}"));
    }

    for union in &stmt.unions {
        let sql = c.nested(&union.query, Position::Bare)?;
        let keyword = if union.all { "UNION ALL" } else { "UNION" };
        parts.push(format!("{keyword} {sql}"));
    }

    for join in &stmt.joins {
        let table = match &join.table {
            TableRef::Name(name) => name.clone(),
            TableRef::Query(query) => c.nested(query, Position::Source)?,
        };
        if join.conditions.is_empty() {
            parts.push(format!("{} {table}", join.kind.as_sql()));
        } else {
            let on = c.conditions(&join.conditions)?;
            parts.push(format!("{} {table} ON ({on})", join.kind.as_sql()));
        }
    }

    if !stmt.wheres.is_empty() {
        parts.push(format!("WHERE {}", c.conditions(&stmt.wheres)?));
    }
    if !stmt.havings.is_empty() {
        parts.push(format!("HAVING {}", c.conditions(&stmt.havings)?));
    }
    if !stmt.orders.is_empty() {
        parts.push(format!("ORDER BY {}", orders(&stmt.orders, c)?));
    }
    if !stmt.groups.is_empty() {
        parts.push(format!("GROUP BY {}", stmt.groups.join(", ")));
    }
    match stmt.limit {
        Some(Limit::Count(count)) => parts.push(format!("LIMIT {count}")),
        Some(Limit::Range { offset, count }) => parts.push(format!("LIMIT {offset}, {count}")),
        Some(Limit::Offset { count, offset }) => {
            parts.push(format!("LIMIT {count} OFFSET {offset}"))
        }
        None => {}
    }
    if !trailing.is_empty() {
        parts.push(trailing.join(" "));
    }

    Ok(parts.join(" "))
}

/// The head clause, plus the alias of a derived table that the statement itself does not alias.
fn head<'s>(
    stmt: &'s Statement,
    c: &mut Compiler<'_>,
    leading: &[&str],
) -> WeaveResult<(String, Option<&'s str>)> {
    let before = if leading.is_empty() {
        String::new()
    } else {
        format!("{} ", leading.join(" "))
    };

    let kind = stmt.kind;
    let sql = match kind {
        StatementKind::Select => {
            let projection = projection(&stmt.columns, c)?;
            let table = table(stmt, c)?;
            format!("SELECT {before}{projection} FROM {table}")
        }
        StatementKind::Insert | StatementKind::Replace => {
            let verb = if kind == StatementKind::Insert {
                "INSERT"
            } else {
                "REPLACE"
            };
            let table = table(stmt, c)?;
            let values = values(stmt, c)?;
            format!("{verb} {before}INTO {table} {values}")
        }
        StatementKind::Update | StatementKind::Patch => {
            let table = table(stmt, c)?;
            let patch = kind == StatementKind::Patch;
            let set_rules = rules(stmt, &stmt.exclusions, patch);
            let pairs = assignments(stmt, c, &stmt.payload, set_rules, "SET")?;
            format!("UPDATE {before}{table} SET {pairs}")
        }
        StatementKind::Delete => {
            let table = table(stmt, c)?;
            format!("DELETE {before}FROM {table}")
        }
        StatementKind::InsertSelect => {
            let table = table(stmt, c)?;
            let Some(source) = &stmt.source else {
                return Err(WeaveError::MissingTable { kind });
            };
            let query = c.nested(&source.query, Position::Bare)?;
            if source.columns.is_empty() {
                format!("INSERT {before}INTO {table} {query}")
            } else {
                format!(
                    "INSERT {before}INTO {table} ({}) {query}",
                    source.columns.join(", ")
                )
            }
        }
        StatementKind::Unset | StatementKind::Exists | StatementKind::Raw => {
            return Err(WeaveError::UnsetKind);
        }
    };

    let derived_alias = match &stmt.table {
        Some(TableRef::Query(query)) => query.alias.as_deref(),
        _ => None,
    };
    Ok((sql, derived_alias))
}

fn table(stmt: &Statement, c: &mut Compiler<'_>) -> WeaveResult<String> {
    match &stmt.table {
        Some(TableRef::Name(name)) => Ok(name.clone()),
        Some(TableRef::Query(query)) => c.derived(query),
        None => Err(WeaveError::MissingTable { kind: stmt.kind }),
    }
}

fn projection(columns: &[Projection], c: &mut Compiler<'_>) -> WeaveResult<String> {
    if columns.is_empty() {
        return Ok("*".to_string());
    }
    let mut out = Vec::with_capacity(columns.len());
    for column in columns {
        out.push(match column {
            Projection::Column(text) => text.clone(),
            Projection::Arg(arg) => c.arg(arg, Position::Source, "SELECT")?,
        });
    }
    Ok(out.join(", "))
}

fn rules<'a>(stmt: &'a Statement, exclusions: &'a Exclusions, patch: bool) -> FlattenRules<'a> {
    FlattenRules {
        omits: &stmt.omits,
        exclusions,
        config: &stmt.config,
        patch,
    }
}

/// `(cols) VALUES (..), (..)`
fn values(stmt: &Statement, c: &mut Compiler<'_>) -> WeaveResult<String> {
    let flat = flatten(&stmt.payload, rules(stmt, &stmt.exclusions, false));
    let mut groups = Vec::with_capacity(flat.groups.len().max(1));
    for group in &flat.groups {
        let mut values = Vec::with_capacity(group.len());
        for arg in group {
            values.push(c.arg(arg, Position::Value, "VALUES")?);
        }
        groups.push(format!("({})", values.join(", ")));
    }
    if groups.is_empty() {
        groups.push("()".to_string());
    }
    Ok(format!(
        "({}) VALUES {}",
        flat.columns.join(", "),
        groups.join(", ")
    ))
}

/// `col = value, ...` from the first record.
fn assignments(
    stmt: &Statement,
    c: &mut Compiler<'_>,
    records: &[Record],
    rules: FlattenRules<'_>,
    context: &str,
) -> WeaveResult<String> {
    let flat = flatten(records, rules);
    if flat.is_empty() {
        return Err(WeaveError::EmptyAssignments { kind: stmt.kind });
    }
    let mut pairs = Vec::with_capacity(flat.columns.len());
    for (column, arg) in flat.assignments() {
        let value = c.arg(arg, Position::Value, context)?;
        pairs.push(format!("{column} = {value}"));
    }
    Ok(pairs.join(", "))
}

fn orders(orders: &[Order], c: &mut Compiler<'_>) -> WeaveResult<String> {
    let mut out = Vec::with_capacity(orders.len());
    for order in orders {
        match order {
            Order::Expr(term) => out.push(term.clone()),
            Order::Field { column, values } => {
                if values.is_empty() {
                    return Err(WeaveError::EmptySequence {
                        template: format!("FIELD ({column})"),
                    });
                }
                let mut items = Vec::with_capacity(values.len() + 1);
                items.push(column.clone());
                for value in values {
                    items.push(c.arg(&Arg::Value(value.clone()), Position::Value, column)?);
                }
                out.push(format!("FIELD ({})", items.join(", ")));
            }
        }
    }
    Ok(out.join(", "))
}

/// Split options into leading and trailing groups, rejecting anything else.
fn split_options(options: &[String]) -> WeaveResult<(Vec<&str>, Vec<&str>)> {
    let mut leading = Vec::new();
    let mut trailing = Vec::new();
    for option in options {
        let option = option.as_str();
        if LEADING_OPTIONS.contains(&option) {
            leading.push(option);
        } else if TRAILING_OPTIONS.contains(&option) {
            trailing.push(option);
        } else {
            return Err(WeaveError::UnknownOption(option.to_string()));
        }
    }
    Ok((leading, trailing))
}
