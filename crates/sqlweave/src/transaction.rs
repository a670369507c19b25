//! Transaction helpers: `transaction!` and `savepoint!`.
//!
//! Both macros work on any [`Transactional`](crate::Transactional) executor and expect the block
//! to evaluate to `sqlweave::WeaveResult<T>`.
//!
//! # Example
//!
//! ```ignore
//! use sqlweave::{WeaveResult, record, table};
//!
//! # async fn demo(conn: &impl sqlweave::Transactional) -> WeaveResult<()> {
//! sqlweave::transaction!(conn, tx, {
//!     table("Accounts")
//!         .where_("ID", 1)
//!         .update(record! { "Balance" => 100 })
//!         .execute(tx)
//!         .await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for anonymous savepoint naming.
static SAVEPOINT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Runs the given block inside a transaction.
///
/// - Begins with [`Transactional::begin`](crate::Transactional::begin).
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`; a failed rollback is reported together with the original error.
#[macro_export]
macro_rules! transaction {
    ($executor:expr, $tx:ident, $body:block) => {{
        let $tx = $executor;
        $crate::Transactional::begin($tx).await?;

        let __sqlweave_tx_body_result = async { $body }.await;
        match __sqlweave_tx_body_result {
            Ok(value) => {
                $crate::Transactional::commit($tx).await?;
                Ok(value)
            }
            Err(error) => match $crate::Transactional::rollback($tx).await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::WeaveError::Execution(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
        }
    }};
}

/// Runs the given block inside a savepoint of an open transaction.
///
/// - Creates the savepoint (named, or `sqlweave_sp_<n>` when anonymous).
/// - Releases it on `Ok(_)`.
/// - Rolls back to it on `Err(_)`, leaving the outer transaction usable.
///
/// ```ignore
/// sqlweave::transaction!(conn, tx, {
///     create_order(tx).await?;
///
///     let notified = sqlweave::savepoint!(tx, "notify", {
///         send_notification(tx).await
///     });
///     if let Err(e) = notified {
///         tracing::warn!(error = %e, "notification skipped");
///     }
///     Ok(())
/// })?;
/// ```
#[macro_export]
macro_rules! savepoint {
    // Named savepoint
    ($tx:expr, $name:expr, $body:block) => {{
        let __sqlweave_sp_tx = $tx;
        let __sqlweave_sp_name: &str = $name;
        $crate::Transactional::savepoint(__sqlweave_sp_tx, __sqlweave_sp_name).await?;

        let __sqlweave_sp_body_result = async { $body }.await;
        match __sqlweave_sp_body_result {
            Ok(value) => {
                $crate::Transactional::release_savepoint(__sqlweave_sp_tx, __sqlweave_sp_name)
                    .await?;
                Ok(value)
            }
            Err(error) => {
                match $crate::Transactional::rollback_to(__sqlweave_sp_tx, __sqlweave_sp_name).await
                {
                    Ok(()) => Err(error),
                    Err(rollback_err) => Err($crate::WeaveError::Execution(format!(
                        "{error} (savepoint rollback failed: {rollback_err})"
                    ))),
                }
            }
        }
    }};
    // Anonymous savepoint
    ($tx:expr, $body:block) => {{
        let __sqlweave_sp_anon = $crate::__next_savepoint_name();
        $crate::savepoint!($tx, &__sqlweave_sp_anon, $body)
    }};
}

/// Generate a unique savepoint name (used by the anonymous form of [`savepoint!`]).
#[doc(hidden)]
pub fn __next_savepoint_name() -> String {
    let id = SAVEPOINT_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("sqlweave_sp_{id}")
}
