//! Query hooks and timing around an [`Executor`](crate::Executor).
//!
//! - Inspect, rewrite or abort SQL before it runs ([`QueryHook`])
//! - Observe the outcome and duration after it runs
//! - Warn about slow queries and enforce an optional timeout ([`MonitorConfig`])
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::monitor::{InstrumentedExecutor, MonitorConfig, TracingSqlHook};
//! use std::time::Duration;
//!
//! let executor = InstrumentedExecutor::new(conn)
//!     .with_config(
//!         MonitorConfig::new()
//!             .with_query_timeout(Duration::from_secs(30))
//!             .with_slow_query_threshold(Duration::from_millis(200)),
//!     )
//!     .add_hook(TracingSqlHook::new());
//!
//! let rows = sqlweave::table("Users").select().fetch(&executor).await?;
//! ```

mod config;
mod instrumented;
mod tracing_hook;
mod types;

#[cfg(test)]
mod tests;

pub use config::MonitorConfig;
pub use instrumented::InstrumentedExecutor;
pub use tracing_hook::TracingSqlHook;
pub use types::{HookAction, QueryContext, QueryHook, QueryResult, QueryType};

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
