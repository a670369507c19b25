//! Convenient imports for typical `sqlweave` usage.
//!
//! ```ignore
//! use sqlweave::prelude::*;
//! ```

pub use crate::{
    Arg, BuiltQuery, Executor, Expr, IntoArgs, IntoRecord, Record, Statement, Transactional,
    Value, WeaveError, WeaveResult, from_query, raw, table, table_as,
};
pub use crate::{args, record};
