//! Execution collaborator.
//!
//! sqlweave never talks to a database itself. An [`Executor`] receives compiled SQL plus bound
//! values and hands back rows in whatever representation the driver uses.

use std::future::Future;

use crate::error::{WeaveError, WeaveResult};
use crate::ident::quote_ident;
use crate::statement::Statement;
use crate::value::Value;

/// Runs compiled SQL against a connection.
pub trait Executor: Send + Sync {
    /// Driver row type.
    type Row: Send;

    /// Run a statement that returns rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = WeaveResult<Vec<Self::Row>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = WeaveResult<u64>> + Send;

    /// First row, or [`WeaveError::NotFound`].
    fn query_one(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = WeaveResult<Self::Row>> + Send {
        async move {
            self.query_opt(sql, params)
                .await?
                .ok_or_else(|| WeaveError::not_found(format!("no row returned by `{sql}`")))
        }
    }

    /// First row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = WeaveResult<Option<Self::Row>>> + Send {
        async move { Ok(self.query(sql, params).await?.into_iter().next()) }
    }
}

/// An executor that can scope work in a transaction.
///
/// The defaults issue plain MySQL statements through [`Executor::execute`]; drivers with native
/// transaction handles override them.
pub trait Transactional: Executor {
    fn begin(&self) -> impl Future<Output = WeaveResult<()>> + Send {
        async move { self.execute("START TRANSACTION", &[]).await.map(drop) }
    }

    fn commit(&self) -> impl Future<Output = WeaveResult<()>> + Send {
        async move { self.execute("COMMIT", &[]).await.map(drop) }
    }

    fn rollback(&self) -> impl Future<Output = WeaveResult<()>> + Send {
        async move { self.execute("ROLLBACK", &[]).await.map(drop) }
    }

    fn savepoint(&self, name: &str) -> impl Future<Output = WeaveResult<()>> + Send {
        async move {
            let sql = format!("SAVEPOINT {}", quote_ident(name)?);
            self.execute(&sql, &[]).await.map(drop)
        }
    }

    fn rollback_to(&self, name: &str) -> impl Future<Output = WeaveResult<()>> + Send {
        async move {
            let sql = format!("ROLLBACK TO SAVEPOINT {}", quote_ident(name)?);
            self.execute(&sql, &[]).await.map(drop)
        }
    }

    fn release_savepoint(&self, name: &str) -> impl Future<Output = WeaveResult<()>> + Send {
        async move {
            let sql = format!("RELEASE SAVEPOINT {}", quote_ident(name)?);
            self.execute(&sql, &[]).await.map(drop)
        }
    }
}

impl Statement {
    // ==================== Execution ====================

    /// Build, then run as a row-returning query.
    pub async fn fetch<E: Executor>(&self, executor: &E) -> WeaveResult<Vec<E::Row>> {
        let built = self.build()?;
        executor.query(&built.sql, &built.params).await
    }

    /// Build, then return the first row or [`WeaveError::NotFound`].
    pub async fn fetch_one<E: Executor>(&self, executor: &E) -> WeaveResult<E::Row> {
        let built = self.build()?;
        executor.query_one(&built.sql, &built.params).await
    }

    /// Build, then return the first row if any.
    pub async fn fetch_opt<E: Executor>(&self, executor: &E) -> WeaveResult<Option<E::Row>> {
        let built = self.build()?;
        executor.query_opt(&built.sql, &built.params).await
    }

    /// Build, then run for its affected-row count.
    pub async fn execute<E: Executor>(&self, executor: &E) -> WeaveResult<u64> {
        let built = self.build()?;
        executor.execute(&built.sql, &built.params).await
    }
}
