use super::*;
use crate::client::{Executor, Transactional};
use crate::error::{WeaveError, WeaveResult};
use crate::value::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Recording executor shared by the tests below ──

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl Recorder {
    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Executor for Recorder {
    type Row = usize;

    async fn query(&self, sql: &str, params: &[Value]) -> WeaveResult<Vec<usize>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().unwrap().push(sql.to_string());
        Ok((0..params.len()).collect())
    }

    async fn execute(&self, sql: &str, _: &[Value]) -> WeaveResult<u64> {
        self.log.lock().unwrap().push(sql.to_string());
        Ok(3)
    }
}

impl Transactional for Recorder {}

/// Remembers every outcome it is told about.
#[derive(Default)]
struct Outcomes(Mutex<Vec<(QueryType, QueryResult)>>);

impl QueryHook for Outcomes {
    fn after_query(&self, ctx: &QueryContext, _: Duration, result: &QueryResult) {
        self.0.lock().unwrap().push((ctx.query_type, result.clone()));
    }
}

struct Rewrite;

impl QueryHook for Rewrite {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        HookAction::ModifySql(format!("/* app */ {}", ctx.sql))
    }
}

struct DenyDelete;

impl QueryHook for DenyDelete {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        if ctx.query_type == QueryType::Delete {
            HookAction::Abort("deletes are disabled".into())
        } else {
            HookAction::Continue
        }
    }
}

#[test]
fn test_query_type_detection() {
    assert_eq!(QueryType::from_sql("SELECT * FROM Users"), QueryType::Select);
    assert_eq!(QueryType::from_sql("  select 1"), QueryType::Select);
    assert_eq!(
        QueryType::from_sql("(SELECT 1) UNION (SELECT 2)"),
        QueryType::Select
    );
    assert_eq!(QueryType::from_sql("INSERT INTO Users () VALUES ()"), QueryType::Insert);
    assert_eq!(QueryType::from_sql("REPLACE INTO Users () VALUES ()"), QueryType::Insert);
    assert_eq!(QueryType::from_sql("UPDATE Users SET A = ?"), QueryType::Update);
    assert_eq!(QueryType::from_sql("DELETE FROM Users"), QueryType::Delete);
    assert_eq!(QueryType::from_sql("START TRANSACTION"), QueryType::Other);
    assert_eq!(QueryType::from_sql(""), QueryType::Other);
}

#[test]
fn test_error_result_truncation() {
    let long = "é".repeat(400);
    let QueryResult::Error(msg) = QueryResult::error(long) else {
        panic!("expected an error result");
    };
    assert!(msg.ends_with("..."));
    assert!(msg.len() <= 515);
    assert_eq!(QueryResult::Rows(2).to_string(), "2 rows");
}

#[test]
fn test_tracing_hook_sql_limit() {
    let hook = TracingSqlHook::new().sql_limit(10);
    assert_eq!(hook.shown_sql("SELECT * FROM Users"), "SELECT * F...");
    assert_eq!(hook.shown_sql("SELECT 1"), "SELECT 1");
    assert_eq!(
        hook.full_sql().shown_sql("SELECT * FROM Users"),
        "SELECT * FROM Users"
    );
    assert_eq!(
        TracingSqlHook::new().sql_limit(3).shown_sql("éé"),
        "é..."
    );
}

#[tokio::test]
async fn test_hooks_observe_results() {
    let outcomes = Arc::new(Outcomes::default());
    let executor = InstrumentedExecutor::new(Recorder::default())
        .add_hook(TracingSqlHook::new().at_level(tracing::Level::INFO).with_outcome(true))
        .add_hook_arc(outcomes.clone());

    let rows = executor
        .query("SELECT * FROM Users WHERE ID = ?", &[Value::Int(1)])
        .await
        .unwrap();
    assert_eq!(rows, vec![0]);
    assert_eq!(executor.execute("DELETE FROM Users", &[]).await.unwrap(), 3);

    let seen = outcomes.0.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (QueryType::Select, QueryResult::Rows(1)),
            (QueryType::Delete, QueryResult::Affected(3)),
        ]
    );
}

#[tokio::test]
async fn test_hook_can_rewrite_sql() {
    let executor = InstrumentedExecutor::new(Recorder::default()).add_hook(Rewrite);
    executor.query("SELECT 1", &[]).await.unwrap();
    assert_eq!(executor.inner().log(), vec!["/* app */ SELECT 1".to_string()]);
}

#[tokio::test]
async fn test_hook_can_abort() {
    let executor = InstrumentedExecutor::new(Recorder::default()).add_hook(DenyDelete);
    let err = executor.execute("DELETE FROM Users", &[]).await.unwrap_err();
    assert!(matches!(err, WeaveError::Execution(ref m) if m.contains("deletes are disabled")));
    assert!(executor.inner().log().is_empty());
}

#[tokio::test]
async fn test_query_timeout() {
    let outcomes = Arc::new(Outcomes::default());
    let executor = InstrumentedExecutor::new(Recorder::slow(Duration::from_millis(200)))
        .with_config(MonitorConfig::new().with_query_timeout(Duration::from_millis(10)))
        .add_hook_arc(outcomes.clone());

    let err = executor.query("SELECT 1", &[]).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(
        outcomes.0.lock().unwrap()[0].1,
        QueryResult::Error(_)
    ));
}

#[tokio::test]
async fn test_slow_query_still_succeeds() {
    let executor = InstrumentedExecutor::new(Recorder::slow(Duration::from_millis(20)))
        .with_config(MonitorConfig::new().with_slow_query_threshold(Duration::from_millis(1)));
    assert!(executor.query("SELECT 1", &[]).await.is_ok());
}

#[tokio::test]
async fn test_transaction_control_bypasses_hooks() {
    let executor = InstrumentedExecutor::new(Recorder::default()).add_hook(Rewrite);
    executor.begin().await.unwrap();
    executor.savepoint("sp").await.unwrap();
    executor.commit().await.unwrap();
    assert_eq!(
        executor.inner().log(),
        vec!["START TRANSACTION", "SAVEPOINT `sp`", "COMMIT"]
    );
}
