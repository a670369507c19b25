//! Raw SQL expressions.

use crate::arg::{Arg, IntoArgs};

/// A SQL fragment merged inline, with its own arguments.
///
/// The template uses the same markers as conditions: `?` binds one argument, `??` quotes one
/// identifier. Unlike a nested statement, an expression is never wrapped in parentheses.
///
/// # Example
/// ```ignore
/// use sqlweave::{table, Expr, record};
///
/// let stmt = table("Users").insert(record! {
///     "Password" => Expr::with_args("SHA1(?)", ("secret",)),
///     "CreatedAt" => Expr::new("NOW()"),
/// });
/// ```
#[derive(Debug, Clone)]
pub struct Expr {
    pub(crate) sql: String,
    pub(crate) args: Vec<Arg>,
}

impl Expr {
    /// An expression without arguments, e.g. `NOW()`.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    /// An expression with arguments, e.g. `SHA1(?)`.
    pub fn with_args(sql: impl Into<String>, args: impl IntoArgs) -> Self {
        Self {
            sql: sql.into(),
            args: args.into_args(),
        }
    }

    /// `a op b` between two columns, with no bound values.
    pub fn columns(left: &str, op: &str, right: &str) -> Self {
        Self::new(format!("{left} {op} {right}"))
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}
