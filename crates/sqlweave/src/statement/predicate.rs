//! Predicate shortcuts. Each one only pre-shapes a template and its arguments.

use std::sync::Arc;

use super::Statement;
use crate::arg::Arg;
use crate::condition::{Condition, Connector};

fn in_condition(connector: Connector, column: &str, op: &str, values: Arg) -> Condition {
    let template = if values.is_list_like() {
        format!("{column} {op} ?")
    } else {
        format!("{column} {op} (?)")
    };
    Condition::new(connector, template, values)
}

fn between(connector: Connector, column: &str, op: &str, low: Arg, high: Arg) -> Condition {
    Condition::new(connector, format!("{column} {op} ? AND ?"), (low, high))
}

fn compare(connector: Connector, column: &str, op: &str, value: Arg) -> Condition {
    Condition::new(connector, format!("{column} {op} ?"), value)
}

fn bare(connector: Connector, text: String) -> Condition {
    Condition::new(connector, text, ())
}

fn exists(connector: Connector, op: &str, query: Arc<Statement>) -> Condition {
    Condition::new(connector, format!("{op} ?"), Arg::Query(query))
}

impl Statement {
    // ==================== WHERE ====================

    /// `column IN (?, ...)`, or `column IN (sub-select)`.
    pub fn where_in(self, column: &str, values: impl Into<Arg>) -> Self {
        self.push_where(in_condition(Connector::And, column, "IN", values.into()))
    }

    pub fn or_where_in(self, column: &str, values: impl Into<Arg>) -> Self {
        self.push_where(in_condition(Connector::Or, column, "IN", values.into()))
    }

    pub fn where_not_in(self, column: &str, values: impl Into<Arg>) -> Self {
        self.push_where(in_condition(Connector::And, column, "NOT IN", values.into()))
    }

    pub fn or_where_not_in(self, column: &str, values: impl Into<Arg>) -> Self {
        self.push_where(in_condition(Connector::Or, column, "NOT IN", values.into()))
    }

    pub fn where_between(self, column: &str, low: impl Into<Arg>, high: impl Into<Arg>) -> Self {
        self.push_where(between(Connector::And, column, "BETWEEN", low.into(), high.into()))
    }

    pub fn or_where_between(
        self,
        column: &str,
        low: impl Into<Arg>,
        high: impl Into<Arg>,
    ) -> Self {
        self.push_where(between(Connector::Or, column, "BETWEEN", low.into(), high.into()))
    }

    pub fn where_not_between(
        self,
        column: &str,
        low: impl Into<Arg>,
        high: impl Into<Arg>,
    ) -> Self {
        self.push_where(between(Connector::And, column, "NOT BETWEEN", low.into(), high.into()))
    }

    pub fn or_where_not_between(
        self,
        column: &str,
        low: impl Into<Arg>,
        high: impl Into<Arg>,
    ) -> Self {
        self.push_where(between(Connector::Or, column, "NOT BETWEEN", low.into(), high.into()))
    }

    pub fn where_like(self, column: &str, pattern: impl Into<Arg>) -> Self {
        self.push_where(compare(Connector::And, column, "LIKE", pattern.into()))
    }

    pub fn or_where_like(self, column: &str, pattern: impl Into<Arg>) -> Self {
        self.push_where(compare(Connector::Or, column, "LIKE", pattern.into()))
    }

    pub fn where_not_like(self, column: &str, pattern: impl Into<Arg>) -> Self {
        self.push_where(compare(Connector::And, column, "NOT LIKE", pattern.into()))
    }

    pub fn or_where_not_like(self, column: &str, pattern: impl Into<Arg>) -> Self {
        self.push_where(compare(Connector::Or, column, "NOT LIKE", pattern.into()))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.push_where(bare(Connector::And, format!("{column} IS NULL")))
    }

    pub fn or_where_null(self, column: &str) -> Self {
        self.push_where(bare(Connector::Or, format!("{column} IS NULL")))
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.push_where(bare(Connector::And, format!("{column} IS NOT NULL")))
    }

    pub fn or_where_not_null(self, column: &str) -> Self {
        self.push_where(bare(Connector::Or, format!("{column} IS NOT NULL")))
    }

    /// `EXISTS (sub-select)`.
    pub fn where_exists(self, query: impl Into<Arc<Statement>>) -> Self {
        self.push_where(exists(Connector::And, "EXISTS", query.into()))
    }

    pub fn or_where_exists(self, query: impl Into<Arc<Statement>>) -> Self {
        self.push_where(exists(Connector::Or, "EXISTS", query.into()))
    }

    pub fn where_not_exists(self, query: impl Into<Arc<Statement>>) -> Self {
        self.push_where(exists(Connector::And, "NOT EXISTS", query.into()))
    }

    pub fn or_where_not_exists(self, query: impl Into<Arc<Statement>>) -> Self {
        self.push_where(exists(Connector::Or, "NOT EXISTS", query.into()))
    }

    /// Compare two columns, nothing bound: `where_column("LastLogin", ">", "CreatedAt")`.
    pub fn where_column(self, left: &str, op: &str, right: &str) -> Self {
        self.push_where(bare(Connector::And, format!("{left} {op} {right}")))
    }

    pub fn or_where_column(self, left: &str, op: &str, right: &str) -> Self {
        self.push_where(bare(Connector::Or, format!("{left} {op} {right}")))
    }

    // ==================== HAVING ====================

    pub fn having_in(self, column: &str, values: impl Into<Arg>) -> Self {
        self.push_having(in_condition(Connector::And, column, "IN", values.into()))
    }

    pub fn having_not_in(self, column: &str, values: impl Into<Arg>) -> Self {
        self.push_having(in_condition(Connector::And, column, "NOT IN", values.into()))
    }

    pub fn having_between(self, column: &str, low: impl Into<Arg>, high: impl Into<Arg>) -> Self {
        self.push_having(between(Connector::And, column, "BETWEEN", low.into(), high.into()))
    }

    pub fn having_not_between(
        self,
        column: &str,
        low: impl Into<Arg>,
        high: impl Into<Arg>,
    ) -> Self {
        self.push_having(between(Connector::And, column, "NOT BETWEEN", low.into(), high.into()))
    }

    pub fn having_like(self, column: &str, pattern: impl Into<Arg>) -> Self {
        self.push_having(compare(Connector::And, column, "LIKE", pattern.into()))
    }

    pub fn having_not_like(self, column: &str, pattern: impl Into<Arg>) -> Self {
        self.push_having(compare(Connector::And, column, "NOT LIKE", pattern.into()))
    }

    pub fn having_null(self, column: &str) -> Self {
        self.push_having(bare(Connector::And, format!("{column} IS NULL")))
    }

    pub fn having_not_null(self, column: &str) -> Self {
        self.push_having(bare(Connector::And, format!("{column} IS NOT NULL")))
    }
}
