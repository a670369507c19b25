//! Statements run through an in-memory executor.

use std::sync::Mutex;

use sqlweave::{
    Executor, InstrumentedExecutor, MonitorConfig, Transactional, Value, WeaveError, WeaveResult,
    record, table,
};

/// Echoes bound parameters back as rows and logs every SQL string it sees.
#[derive(Default)]
struct Memory {
    log: Mutex<Vec<String>>,
    rows: usize,
    fail_rollback: bool,
}

impl Memory {
    fn with_rows(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Executor for Memory {
    type Row = Vec<Value>;

    async fn query(&self, sql: &str, params: &[Value]) -> WeaveResult<Vec<Vec<Value>>> {
        self.log.lock().unwrap().push(sql.to_string());
        Ok(vec![params.to_vec(); self.rows])
    }

    async fn execute(&self, sql: &str, _params: &[Value]) -> WeaveResult<u64> {
        self.log.lock().unwrap().push(sql.to_string());
        if self.fail_rollback && sql.starts_with("ROLLBACK") {
            return Err(WeaveError::execution("connection lost"));
        }
        Ok(1)
    }
}

impl Transactional for Memory {}

async fn transfer(conn: &Memory, fail: bool) -> WeaveResult<u64> {
    sqlweave::transaction!(conn, tx, {
        let n = table("Accounts")
            .where_("ID", 1)
            .update(record! { "Balance" => 10 })
            .execute(tx)
            .await?;
        if fail {
            Err(WeaveError::execution("insufficient funds"))
        } else {
            Ok(n)
        }
    })
}

#[tokio::test]
async fn test_fetch_passes_compiled_params() {
    let conn = Memory::with_rows(2);
    let rows = table("Users")
        .where_("Username = ? AND Age > ?", ("admin", 18))
        .select()
        .fetch(&conn)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec![Value::from("admin"), Value::Int(18)]);
    assert_eq!(
        conn.log(),
        vec!["SELECT * FROM Users WHERE Username = ? AND Age > ?"]
    );
}

#[tokio::test]
async fn test_fetch_one_and_opt() {
    let empty = Memory::default();
    let stmt = table("Users").where_("ID", 7).select_one();

    let err = stmt.fetch_one(&empty).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(stmt.fetch_opt(&empty).await.unwrap().is_none());

    let one = Memory::with_rows(1);
    assert_eq!(stmt.fetch_one(&one).await.unwrap(), vec![Value::Int(7)]);
    assert_eq!(one.log(), vec!["SELECT * FROM Users WHERE ID = ? LIMIT 1"]);
}

#[tokio::test]
async fn test_build_errors_never_reach_executor() {
    let conn = Memory::default();
    let err = table("Users").execute(&conn).await.unwrap_err();
    assert!(err.is_contract_violation());
    assert!(conn.log().is_empty());
}

#[tokio::test]
async fn test_transaction_commits_on_ok() {
    let conn = Memory::default();
    assert_eq!(transfer(&conn, false).await.unwrap(), 1);
    assert_eq!(
        conn.log(),
        vec![
            "START TRANSACTION",
            "UPDATE Accounts SET Balance = ? WHERE ID = ?",
            "COMMIT",
        ]
    );
}

#[tokio::test]
async fn test_transaction_rolls_back_on_err() {
    let conn = Memory::default();
    let err = transfer(&conn, true).await.unwrap_err();
    assert!(err.to_string().contains("insufficient funds"));
    assert_eq!(conn.log().last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn test_failed_rollback_reports_both_errors() {
    let conn = Memory {
        fail_rollback: true,
        ..Memory::default()
    };
    let err = transfer(&conn, true).await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("insufficient funds"));
    assert!(msg.contains("rollback failed"));
    assert!(msg.contains("connection lost"));
}

#[tokio::test]
async fn test_savepoint_keeps_outer_transaction() -> WeaveResult<()> {
    let conn = Memory::default();
    let result: WeaveResult<()> = sqlweave::transaction!(&conn, tx, {
        let audit: WeaveResult<()> = sqlweave::savepoint!(tx, "audit", {
            Err(WeaveError::execution("audit table locked"))
        });
        assert!(audit.is_err());

        sqlweave::savepoint!(tx, {
            table("Orders")
                .insert(record! { "Total" => 5 })
                .execute(tx)
                .await
        })?;
        Ok(())
    });
    result?;

    let log = conn.log();
    assert_eq!(log[0], "START TRANSACTION");
    assert_eq!(log[1], "SAVEPOINT `audit`");
    assert_eq!(log[2], "ROLLBACK TO SAVEPOINT `audit`");
    assert!(log[3].starts_with("SAVEPOINT `sqlweave_sp_"));
    assert_eq!(log[4], "INSERT INTO Orders (Total) VALUES (?)");
    assert!(log[5].starts_with("RELEASE SAVEPOINT `sqlweave_sp_"));
    assert_eq!(log[6], "COMMIT");
    Ok(())
}

#[tokio::test]
async fn test_instrumented_executor_runs_statements() {
    let conn = InstrumentedExecutor::new(Memory::with_rows(1))
        .with_config(MonitorConfig::new().with_slow_query_threshold(std::time::Duration::ZERO));
    let rows = table("Users").select().fetch(&conn).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(conn.inner().log(), vec!["SELECT * FROM Users"]);
}
