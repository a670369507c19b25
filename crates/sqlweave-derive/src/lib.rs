//! Derive macros for sqlweave
//!
//! Provides `#[derive(Record)]`, turning a struct into an insert/update payload.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive `IntoRecord` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use sqlweave::Record;
///
/// #[derive(Record)]
/// #[record(rename_all = "PascalCase")]
/// struct User {
///     username: String,
///     #[record(rename = "Mail")]
///     email: Option<String>,
///     #[record(skip)]
///     session: Session,
/// }
///
/// sqlweave::table("Users").insert(user).build()?;
/// // INSERT INTO Users (Username, Mail) VALUES (?, ?)
/// ```
///
/// # Attributes
///
/// - `#[record(rename_all = "...")]` (struct) - `snake_case`, `camelCase`, `PascalCase`,
///   `SCREAMING_SNAKE_CASE`, `kebab-case`, `lowercase` or `UPPERCASE`
/// - `#[record(rename = "name")]` - Write to a different column; `""` or `"-"` drops the field
/// - `#[record(skip)]` - Leave the field out entirely
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
