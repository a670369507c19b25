//! Placeholder substitution.
//!
//! Templates are scanned once into [`Segment`]s. `??` consumes one argument as identifier text,
//! `?` consumes one argument rendered by its [`Arg`] variant. Markers inside quoted literals are
//! left alone. Every bound value lands in a [`ParamList`] in the order its `?` appears in the
//! output text.

use std::borrow::Cow;

use crate::arg::Arg;
use crate::condition::{Condition, placeholders};
use crate::error::{WeaveError, WeaveResult};
use crate::ident::quote_ident;
use crate::statement::Statement;
use crate::value::Value;

/// One piece of a scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    /// `??`
    Escape,
    /// `?`
    Placeholder,
}

/// Split a template into text and marker segments.
pub(crate) fn tokenize(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => i = skip_quoted(bytes, i, quote),
            b'?' => {
                if start < i {
                    segments.push(Segment::Text(&template[start..i]));
                }
                if bytes.get(i + 1) == Some(&b'?') {
                    segments.push(Segment::Escape);
                    i += 2;
                } else {
                    segments.push(Segment::Placeholder);
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        segments.push(Segment::Text(&template[start..]));
    }
    segments
}

/// Index just past the closing quote, or the end of input when unterminated.
fn skip_quoted(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote != b'`' => i += 2,
            b if b == quote => {
                if bytes.get(i + 1) == Some(&quote) {
                    i += 2;
                } else {
                    return i + 1;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Number of `?` and `??` markers in a template.
pub(crate) fn count_markers(template: &str) -> usize {
    tokenize(template)
        .iter()
        .filter(|s| !matches!(s, Segment::Text(_)))
        .count()
}

/// Ordered bound values of one compile pass.
#[derive(Clone, Debug, Default)]
pub(crate) struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.params.push(value);
    }

    pub(crate) fn extend(&mut self, values: impl IntoIterator<Item = Value>) {
        self.params.extend(values);
    }

    pub(crate) fn into_vec(self) -> Vec<Value> {
        self.params
    }
}

/// Where an argument is rendered; decides how a nested statement is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    /// Condition or payload value: `(whole statement)`.
    Value,
    /// Derived table or projection: `(statement) AS alias`.
    Source,
    /// Inside a raw expression: the statement text as-is.
    Bare,
}

/// Resolve markers and argument variants into SQL text, binding values as it goes.
pub(crate) struct Compiler<'p> {
    params: &'p mut ParamList,
}

impl<'p> Compiler<'p> {
    pub(crate) fn new(params: &'p mut ParamList) -> Self {
        Self { params }
    }

    /// Compile a condition list joined by each entry's connector.
    pub(crate) fn conditions(&mut self, list: &[Condition]) -> WeaveResult<String> {
        let mut out = String::new();
        for (i, cond) in list.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(cond.connector.as_sql());
                out.push(' ');
            }
            let (template, args) = cond.shape()?;
            out.push_str(&self.template(&template, &args, Position::Value)?);
        }
        Ok(out)
    }

    /// Compile one template against its arguments. `position` applies to its `?` markers.
    pub(crate) fn template(
        &mut self,
        template: &str,
        args: &[Arg],
        position: Position,
    ) -> WeaveResult<String> {
        let segments = tokenize(template);
        let markers = segments
            .iter()
            .filter(|s| !matches!(s, Segment::Text(_)))
            .count();
        if markers != args.len() {
            return Err(WeaveError::mismatch(template, markers, args.len()));
        }
        if markers == 0 {
            return Ok(template.to_string());
        }

        // Escapes first: each `??` takes its positional argument out of the list, leaving the
        // remaining arguments aligned with the remaining `?` markers.
        let mut pieces: Vec<Option<Cow<'_, str>>> = Vec::with_capacity(segments.len());
        let mut bound: Vec<&Arg> = Vec::with_capacity(args.len());
        for (segment, arg) in segments.iter().zip(marker_args(&segments, args)) {
            match (segment, arg) {
                (Segment::Text(text), _) => pieces.push(Some(Cow::Borrowed(*text))),
                (Segment::Escape, Some(arg)) => {
                    let name = arg.as_text().ok_or_else(|| {
                        WeaveError::invalid_ident(format!(
                            "`??` in `{template}` needs identifier text, got {arg:?}"
                        ))
                    })?;
                    pieces.push(Some(Cow::Owned(quote_ident(name)?)));
                }
                (Segment::Placeholder, Some(arg)) => {
                    bound.push(arg);
                    pieces.push(None);
                }
                (_, None) => return Err(WeaveError::mismatch(template, markers, args.len())),
            }
        }

        let mut out = String::with_capacity(template.len() + bound.len() * 2);
        let mut bound = bound.into_iter();
        for piece in pieces {
            match piece {
                Some(text) => out.push_str(&text),
                None => {
                    let arg = bound
                        .next()
                        .ok_or_else(|| WeaveError::mismatch(template, markers, args.len()))?;
                    let sql = self.arg(arg, position, template)?;
                    out.push_str(&sql);
                }
            }
        }
        Ok(out)
    }

    /// Render one argument, binding whatever it carries.
    pub(crate) fn arg(
        &mut self,
        arg: &Arg,
        position: Position,
        context: &str,
    ) -> WeaveResult<String> {
        match arg {
            Arg::Value(value) => {
                self.params.push(value.clone());
                Ok("?".to_string())
            }
            Arg::Null => Ok("NULL".to_string()),
            Arg::Raw(expr) => self.template(&expr.sql, &expr.args, Position::Bare),
            Arg::Query(stmt) => self.nested(stmt, position),
            Arg::Ident(name) => quote_ident(name),
            Arg::Seq(items) => {
                if items.is_empty() {
                    return Err(WeaveError::EmptySequence {
                        template: context.to_string(),
                    });
                }
                self.params.extend(items.iter().cloned());
                Ok(format!("({})", placeholders(items.len())))
            }
        }
    }

    /// Compile a nested statement on its own parameter list, then splice both in place.
    pub(crate) fn nested(&mut self, stmt: &Statement, position: Position) -> WeaveResult<String> {
        let lifted = position == Position::Source;
        let built = stmt.compile_nested(!lifted)?;
        self.params.extend(built.params);
        Ok(match position {
            Position::Bare => built.sql,
            Position::Value => format!("({})", built.sql),
            Position::Source => match stmt.alias.as_deref() {
                Some(alias) => format!("({}) AS {alias}", built.sql),
                None => format!("({})", built.sql),
            },
        })
    }
}

impl Compiler<'_> {
    /// A derived table in FROM position. Its alias is emitted by the owning statement.
    pub(crate) fn derived(&mut self, stmt: &Statement) -> WeaveResult<String> {
        let built = stmt.compile_nested(false)?;
        self.params.extend(built.params);
        Ok(format!("({})", built.sql))
    }
}

/// Pair every segment with the argument its marker consumes.
fn marker_args<'a>(segments: &[Segment<'_>], args: &'a [Arg]) -> Vec<Option<&'a Arg>> {
    let mut next = args.iter();
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(_) => None,
            Segment::Escape | Segment::Placeholder => next.next(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::IntoArgs;
    use crate::expr::Expr;

    fn compile(template: &str, args: impl IntoArgs) -> WeaveResult<(String, Vec<Value>)> {
        let mut params = ParamList::new();
        let sql = Compiler::new(&mut params).template(template, &args.into_args(), Position::Value)?;
        Ok((sql, params.into_vec()))
    }

    #[test]
    fn tokenize_splits_markers() {
        assert_eq!(
            tokenize("?? = ?"),
            vec![Segment::Escape, Segment::Text(" = "), Segment::Placeholder]
        );
        assert_eq!(tokenize("a"), vec![Segment::Text("a")]);
    }

    #[test]
    fn tokenize_skips_quoted_literals() {
        assert_eq!(count_markers("Name = 'wh?t' AND ID = ?"), 1);
        assert_eq!(count_markers(r#"Note = "it\"s ?" OR `a?b` = ?"#), 1);
        assert_eq!(count_markers("x = 'it''s ?'"), 0);
    }

    #[test]
    fn escape_markers_do_not_bind() {
        let (sql, params) = compile("?? = ?", ("ID", 5)).unwrap();
        assert_eq!(sql, "`ID` = ?");
        assert_eq!(params, vec![Value::Int(5)]);
    }

    #[test]
    fn sequences_expand_per_element() {
        let seq = Arg::Seq(vec![
            Value::Int(1),
            Value::Int(5),
            Value::Int(27),
            Value::Int(-1),
            Value::from("d"),
        ]);
        let (sql, params) = compile("id IN ?", seq).unwrap();
        assert_eq!(sql, "id IN (?, ?, ?, ?, ?)");
        assert_eq!(params.len(), 5);
        assert_eq!(params[4], Value::from("d"));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let err = compile("id IN ?", Arg::Seq(Vec::new())).unwrap_err();
        assert!(matches!(err, WeaveError::EmptySequence { .. }));
    }

    #[test]
    fn raw_expressions_inline_their_args() {
        let (sql, params) =
            compile("Password = ?", Expr::with_args("SHA1(?)", ("secret",))).unwrap();
        assert_eq!(sql, "Password = SHA1(?)");
        assert_eq!(params, vec![Value::from("secret")]);
    }

    #[test]
    fn null_renders_inline() {
        let (sql, params) = compile("DeletedAt <=> ?", Arg::null()).unwrap();
        assert_eq!(sql, "DeletedAt <=> NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn marker_count_must_match() {
        assert!(matches!(
            compile("a = ? AND b = ?", 1),
            Err(WeaveError::PlaceholderMismatch { markers: 2, args: 1, .. })
        ));
        assert!(matches!(
            compile("a = ?", ()),
            Err(WeaveError::PlaceholderMismatch { markers: 1, args: 0, .. })
        ));
        assert_eq!(compile("a = b", ()).unwrap().0, "a = b");
    }

    #[test]
    fn escape_needs_text() {
        let err = compile("?? = 1", 5).unwrap_err();
        assert!(matches!(err, WeaveError::InvalidIdentifier(_)));
    }
}
