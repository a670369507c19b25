use std::borrow::Cow;
use std::time::Duration;

use tracing::Level;

use super::truncate_sql_bytes;
use super::types::{HookAction, QueryContext, QueryHook, QueryResult};

// `tracing` callsites need a constant level, so pick one per branch.
macro_rules! event_at {
    ($level:expr, $($rest:tt)+) => {
        if $level == Level::ERROR {
            tracing::event!(target: "sqlweave.sql", Level::ERROR, $($rest)+)
        } else if $level == Level::WARN {
            tracing::event!(target: "sqlweave.sql", Level::WARN, $($rest)+)
        } else if $level == Level::INFO {
            tracing::event!(target: "sqlweave.sql", Level::INFO, $($rest)+)
        } else if $level == Level::DEBUG {
            tracing::event!(target: "sqlweave.sql", Level::DEBUG, $($rest)+)
        } else {
            tracing::event!(target: "sqlweave.sql", Level::TRACE, $($rest)+)
        }
    };
}

/// Logs compiled statements on the `sqlweave.sql` target.
///
/// One event is emitted as the statement is sent. With [`with_outcome`](Self::with_outcome)
/// a second event carries the row count or error and the elapsed time.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    level: Level,
    sql_limit: Option<usize>,
    outcome: bool,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            sql_limit: Some(200),
            outcome: false,
        }
    }
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Cut logged SQL after `bytes` bytes (on a char boundary) and mark it with `...`.
    pub fn sql_limit(mut self, bytes: usize) -> Self {
        self.sql_limit = Some(bytes);
        self
    }

    pub fn full_sql(mut self) -> Self {
        self.sql_limit = None;
        self
    }

    pub fn with_outcome(mut self, enabled: bool) -> Self {
        self.outcome = enabled;
        self
    }

    pub(crate) fn shown_sql<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self.sql_limit {
            Some(limit) if sql.len() > limit => {
                Cow::Owned(format!("{}...", truncate_sql_bytes(sql, limit)))
            }
            _ => Cow::Borrowed(sql),
        }
    }
}

impl QueryHook for TracingSqlHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        event_at!(
            self.level,
            kind = ?ctx.query_type,
            params = ctx.param_count,
            sql = %self.shown_sql(&ctx.sql),
            "sending statement"
        );
        HookAction::Continue
    }

    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if !self.outcome {
            return;
        }
        event_at!(
            self.level,
            kind = ?ctx.query_type,
            elapsed_ms = duration.as_millis() as u64,
            outcome = %result,
            "statement finished"
        );
    }
}
