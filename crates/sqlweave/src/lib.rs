//! # sqlweave
//!
//! A fluent statement compiler for the MySQL dialect.
//!
//! ## Features
//!
//! - **Values stay out of the text**: every bound value becomes a `?` and lands in
//!   [`BuiltQuery::params`] in the order its marker appears
//! - **Plain values**: a [`Statement`] is cloned to fork it; building never mutates it
//! - **Composable**: statements nest as derived tables, join targets, projections and condition
//!   operands, each bringing its parameters along in position
//! - **Records**: insert/update payloads from maps, JSON objects, `record!` or `#[derive(Record)]`
//! - **Bring your own driver**: [`Executor`] receives SQL plus parameters; [`monitor`] wraps it
//!   with hooks, slow-query warnings and timeouts
//!
//! ## Statements
//!
//! ```ignore
//! use sqlweave::{record, table};
//!
//! // SELECT
//! let q = table("Users")
//!     .where_("Username", "admin")
//!     .where_in("Role", vec!["owner", "editor"])
//!     .order_by("ID DESC")
//!     .limit(10)
//!     .select()
//!     .build()?;
//! assert_eq!(
//!     q.sql,
//!     "SELECT * FROM Users WHERE Username = ? AND Role IN (?, ?) ORDER BY ID DESC LIMIT 10"
//! );
//!
//! // INSERT
//! table("Users")
//!     .insert(record! { "Username" => "alice", "Age" => 30 })
//!     .build()?;
//!
//! // UPDATE
//! table("Users")
//!     .where_("ID", 1)
//!     .update(record! { "Age" => 31 })
//!     .build()?;
//!
//! // DELETE
//! table("Users").where_("ID = ?", 1).delete().build()?;
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod monitor;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod statement;
pub mod transaction;

mod arg;
mod compile;
mod expr;
mod flatten;
mod ident;
mod value;

pub use arg::{Arg, Args, IntoArgs, SeqItem};
pub use client::{Executor, Transactional};
pub use condition::{Condition, Connector};
pub use config::{ColumnNaming, Config};
pub use error::{WeaveError, WeaveResult};
pub use expr::Expr;
pub use ident::{Ident, IntoIdent};
pub use monitor::{
    HookAction, InstrumentedExecutor, MonitorConfig, QueryContext, QueryHook, QueryResult,
    QueryType, TracingSqlHook,
};
pub use record::{Exclusions, Field, IntoRecord, Record};
pub use statement::{
    BuiltQuery, JoinKind, Limit, Statement, StatementKind, build, from_query, raw, table, table_as,
};
pub use value::{Value, ValueKind};

#[doc(hidden)]
pub use transaction::__next_savepoint_name;

#[cfg(feature = "derive")]
pub use sqlweave_derive::Record;
