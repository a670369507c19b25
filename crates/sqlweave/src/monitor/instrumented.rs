use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use super::config::MonitorConfig;
use super::types::{HookAction, QueryContext, QueryHook, QueryResult, QueryType};
use crate::client::{Executor, Transactional};
use crate::error::{WeaveError, WeaveResult};
use crate::value::Value;

/// Wraps an [`Executor`] with hooks, slow-query warnings and an optional timeout.
pub struct InstrumentedExecutor<E> {
    executor: E,
    hooks: Vec<Arc<dyn QueryHook>>,
    config: MonitorConfig,
}

impl<E: Executor> InstrumentedExecutor<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            hooks: Vec::new(),
            config: MonitorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a hook. Hooks run in the order they were added.
    pub fn add_hook<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.add_hook_arc(Arc::new(hook))
    }

    pub fn add_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn inner(&self) -> &E {
        &self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    fn prepare(&self, sql: &str, param_count: usize) -> WeaveResult<QueryContext> {
        let mut ctx = QueryContext::new(sql, param_count);
        for hook in &self.hooks {
            match hook.before_query(&ctx) {
                HookAction::Continue => {}
                HookAction::ModifySql(sql) => {
                    ctx.query_type = QueryType::from_sql(&sql);
                    ctx.sql = sql;
                }
                HookAction::Abort(reason) => {
                    return Err(WeaveError::execution(format!(
                        "query aborted by hook: {reason}"
                    )));
                }
            }
        }
        Ok(ctx)
    }

    async fn with_timeout<T>(
        &self,
        future: impl Future<Output = WeaveResult<T>> + Send,
    ) -> WeaveResult<T> {
        match self.config.query_timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| WeaveError::Timeout(limit))?,
            None => future.await,
        }
    }

    fn report(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        for hook in &self.hooks {
            hook.after_query(ctx, duration, result);
        }
        if let Some(threshold) = self.config.slow_query_threshold {
            if duration > threshold {
                warn!(
                    target: "sqlweave.sql",
                    duration_ms = duration.as_millis() as u64,
                    query_type = ?ctx.query_type,
                    sql = %ctx.sql,
                    "slow query"
                );
            }
        }
    }
}

impl<E: Executor> Executor for InstrumentedExecutor<E> {
    type Row = E::Row;

    async fn query(&self, sql: &str, params: &[Value]) -> WeaveResult<Vec<E::Row>> {
        let ctx = self.prepare(sql, params.len())?;
        let start = Instant::now();
        let result = self.with_timeout(self.executor.query(&ctx.sql, params)).await;
        let outcome = match &result {
            Ok(rows) => QueryResult::Rows(rows.len()),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report(&ctx, start.elapsed(), &outcome);
        result
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> WeaveResult<u64> {
        let ctx = self.prepare(sql, params.len())?;
        let start = Instant::now();
        let result = self
            .with_timeout(self.executor.execute(&ctx.sql, params))
            .await;
        let outcome = match &result {
            Ok(n) => QueryResult::Affected(*n),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report(&ctx, start.elapsed(), &outcome);
        result
    }
}

/// Transaction control goes straight to the wrapped executor.
impl<E: Transactional> Transactional for InstrumentedExecutor<E> {
    async fn begin(&self) -> WeaveResult<()> {
        self.executor.begin().await
    }

    async fn commit(&self) -> WeaveResult<()> {
        self.executor.commit().await
    }

    async fn rollback(&self) -> WeaveResult<()> {
        self.executor.rollback().await
    }

    async fn savepoint(&self, name: &str) -> WeaveResult<()> {
        self.executor.savepoint(name).await
    }

    async fn rollback_to(&self, name: &str) -> WeaveResult<()> {
        self.executor.rollback_to(name).await
    }

    async fn release_savepoint(&self, name: &str) -> WeaveResult<()> {
        self.executor.release_savepoint(name).await
    }
}
