use std::fmt;
use std::time::Duration;

use super::truncate_sql_bytes;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    /// `INSERT` or `REPLACE`
    Insert,
    Update,
    Delete,
    /// Transaction control, DDL, anything else.
    Other,
}

impl QueryType {
    /// Classify by the leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();

        if keyword.eq_ignore_ascii_case("SELECT") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") || keyword.eq_ignore_ascii_case("REPLACE")
        {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            QueryType::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// What a hook sees about the query about to run.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// The SQL that will be sent to the executor.
    pub sql: String,
    pub param_count: usize,
    pub query_type: QueryType,
}

impl QueryContext {
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
        }
    }
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Outcome of a query, as reported to hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Rows(usize),
    Affected(u64),
    /// Failure message, truncated to 512 bytes.
    Error(String),
}

impl QueryResult {
    pub fn error(msg: String) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            Self::Error(format!("{}...", truncate_sql_bytes(&msg, MAX_ERROR_LEN)))
        } else {
            Self::Error(msg)
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Action to take after a hook inspects a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    Continue,
    /// Run this SQL instead. The parameter list is unchanged.
    ModifySql(String),
    /// Fail the query without running it.
    Abort(String),
}

/// Hooks into the query lifecycle of an
/// [`InstrumentedExecutor`](super::InstrumentedExecutor).
pub trait QueryHook: Send + Sync {
    /// Called before the query runs. Hooks run in registration order; each sees the SQL left
    /// by the previous one.
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called after the query finished, successfully or not.
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}
