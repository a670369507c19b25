//! MySQL identifier handling.
//!
//! [`Ident`] represents a (possibly dotted) identifier such as `Users.ID`. It is always rendered
//! back-tick quoted, which is what `??` escape markers in condition templates expand to.
//!
//! - Unquoted parts may contain ASCII letters, digits, `_`, `$` and any non-ASCII character
//! - Back-tick quoted parts allow anything except NUL and escape `` ` `` as ``` `` ```
//!
//! # Example
//! ```ignore
//! use sqlweave::Ident;
//!
//! let col = Ident::parse("Users.ID")?;
//! assert_eq!(col.to_sql(), "`Users`.`ID`");
//! # Ok::<(), sqlweave::WeaveError>(())
//! ```

use crate::error::{WeaveError, WeaveResult};

/// A SQL identifier (column, table, or schema name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<String>,
}

impl Ident {
    /// Create a single-part identifier without parsing dots.
    pub fn quoted(name: &str) -> WeaveResult<Self> {
        if name.is_empty() {
            return Err(WeaveError::invalid_ident("empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(WeaveError::invalid_ident(
                "identifier cannot contain NUL character",
            ));
        }
        Ok(Self {
            parts: vec![name.to_string()],
        })
    }

    /// Parse an identifier string, supporting dotted and back-tick quoted forms.
    ///
    /// - Dotted: `db.table.column`
    /// - Quoted: `` `Order Items`.`Qty` ``
    pub fn parse(s: &str) -> WeaveResult<Self> {
        if s.is_empty() {
            return Err(WeaveError::invalid_ident("identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(WeaveError::invalid_ident(
                "identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(WeaveError::invalid_ident(format!(
                                "trailing '.' in `{s}`"
                            )));
                        }
                    }
                    Some(c) => {
                        return Err(WeaveError::invalid_ident(format!(
                            "expected '.' between parts of `{s}`, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&'`') {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('`') => {
                            if chars.peek() == Some(&'`') {
                                chars.next();
                                name.push('`');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(WeaveError::invalid_ident(format!(
                                "unclosed quote in `{s}`"
                            )));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(WeaveError::invalid_ident("empty quoted identifier"));
                }
                parts.push(name);
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                if c == '_' || c == '$' || c.is_ascii_alphanumeric() || !c.is_ascii() {
                    name.push(c);
                    chars.next();
                } else {
                    return Err(WeaveError::invalid_ident(format!(
                        "invalid character '{c}' in `{s}`"
                    )));
                }
            }
            if name.is_empty() {
                return Err(WeaveError::invalid_ident(format!(
                    "empty identifier segment in `{s}`"
                )));
            }
            parts.push(name);
        }

        Ok(Self { parts })
    }

    /// Render the identifier as back-tick quoted SQL.
    pub fn to_sql(&self) -> String {
        let cap = self.parts.iter().map(|p| p.len() + 3).sum::<usize>();
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push('`');
            for ch in part.chars() {
                if ch == '`' {
                    out.push_str("``");
                } else {
                    out.push(ch);
                }
            }
            out.push('`');
        }
    }
}

/// Quote identifier text the way `??` markers do.
pub(crate) fn quote_ident(s: &str) -> WeaveResult<String> {
    Ok(Ident::parse(s)?.to_sql())
}

/// Convert an input into an [`Ident`].
pub trait IntoIdent {
    fn into_ident(self) -> WeaveResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> WeaveResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> WeaveResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> WeaveResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> WeaveResult<Ident> {
        Ident::parse(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("Users").unwrap();
        assert_eq!(ident.to_sql(), "`Users`");
    }

    #[test]
    fn ident_dotted() {
        let ident = Ident::parse("Users.ID").unwrap();
        assert_eq!(ident.to_sql(), "`Users`.`ID`");
    }

    #[test]
    fn ident_quoted_part_keeps_spaces() {
        let ident = Ident::parse("`Order Items`.Qty").unwrap();
        assert_eq!(ident.to_sql(), "`Order Items`.`Qty`");
    }

    #[test]
    fn ident_escapes_backtick() {
        let ident = Ident::parse("`we``ird`").unwrap();
        assert_eq!(ident.parts, vec!["we`ird".to_string()]);
        assert_eq!(ident.to_sql(), "`we``ird`");

        let ident = Ident::quoted("a`b").unwrap();
        assert_eq!(ident.to_sql(), "`a``b`");
    }

    #[test]
    fn ident_allows_leading_digit_and_unicode() {
        assert_eq!(Ident::parse("1st").unwrap().to_sql(), "`1st`");
        assert_eq!(Ident::parse("使用者").unwrap().to_sql(), "`使用者`");
    }

    #[test]
    fn ident_rejects_bad_input() {
        assert!(Ident::parse("").is_err());
        assert!(Ident::parse("my table").is_err());
        assert!(Ident::parse("db..table").is_err());
        assert!(Ident::parse("db.").is_err());
        assert!(Ident::parse("`unclosed").is_err());
        assert!(Ident::parse("id; DROP TABLE x").is_err());
    }
}
