//! Predicate entries for WHERE / HAVING / JOIN ... ON lists.
//!
//! A [`Condition`] is a template plus its arguments. Templates carry `?` (bind one value) and
//! `??` (quote one identifier) markers. A template without markers is either a complete
//! boolean expression (no arguments) or a column shorthand:
//!
//! ```ignore
//! .where_("ID", 1)                          // ID = ?
//! .where_("Age", (">", 18))                 // Age > ?
//! .where_("ID", ("IN", vec![1, 2, 3]))      // ID IN (?, ?, ?)
//! .where_("Score", ("BETWEEN", 10, 20))     // Score BETWEEN ? AND ?
//! .where_("LastLogin = CreatedAt", ())      // verbatim
//! ```

use std::borrow::Cow;

use crate::arg::{Arg, IntoArgs};
use crate::compile::count_markers;
use crate::error::{WeaveError, WeaveResult};
use crate::expr::Expr;

/// How a condition joins the one before it. Ignored for the first entry of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// One predicate entry.
#[derive(Debug, Clone)]
pub struct Condition {
    pub connector: Connector,
    pub template: String,
    pub args: Vec<Arg>,
}

impl Condition {
    pub fn new(connector: Connector, template: impl Into<String>, args: impl IntoArgs) -> Self {
        Self {
            connector,
            template: template.into(),
            args: args.into_args(),
        }
    }

    pub fn and(template: impl Into<String>, args: impl IntoArgs) -> Self {
        Self::new(Connector::And, template, args)
    }

    pub fn or(template: impl Into<String>, args: impl IntoArgs) -> Self {
        Self::new(Connector::Or, template, args)
    }

    /// A condition supplied as a raw expression.
    pub fn expr(connector: Connector, expr: Expr) -> Self {
        Self {
            connector,
            template: "?".to_string(),
            args: vec![Arg::Raw(expr)],
        }
    }

    /// Resolve shorthand shapes into an explicit template.
    ///
    /// Templates that already contain markers, and marker-free templates without arguments,
    /// are returned unchanged.
    pub(crate) fn shape(&self) -> WeaveResult<(Cow<'_, str>, Cow<'_, [Arg]>)> {
        if self.args.is_empty() || count_markers(&self.template) > 0 {
            return Ok((
                Cow::Borrowed(self.template.as_str()),
                Cow::Borrowed(self.args.as_slice()),
            ));
        }

        let column = self.template.trim();
        let ambiguous = || WeaveError::ambiguous(&self.template, self.args.len());
        if !is_column_ref(column) {
            return Err(ambiguous());
        }

        if let [_value] = self.args.as_slice() {
            return Ok((
                Cow::Owned(format!("{column} = ?")),
                Cow::Borrowed(self.args.as_slice()),
            ));
        }

        let Some(op) = self.args[0].as_text().map(str::trim) else {
            return Err(ambiguous());
        };
        let rest = &self.args[1..];
        let template = match Operator::parse(op) {
            Some(Operator::In) => match rest {
                [single] if single.is_list_like() => format!("{column} {op} ?"),
                [_single] => format!("{column} {op} (?)"),
                many => format!("{column} {op} ({})", placeholders(many.len())),
            },
            Some(Operator::Between) if rest.len() == 2 => format!("{column} {op} ? AND ?"),
            Some(Operator::Compare) if rest.len() == 1 => format!("{column} {op} ?"),
            _ => return Err(ambiguous()),
        };
        Ok((Cow::Owned(template), Cow::Owned(rest.to_vec())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Compare,
    In,
    Between,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        let normalized = op
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "IN" | "NOT IN" => Some(Operator::In),
            "BETWEEN" | "NOT BETWEEN" => Some(Operator::Between),
            "=" | "!=" | "<>" | "<" | "<=" | ">" | ">=" | "<=>" | "LIKE" | "NOT LIKE" | "IS"
            | "IS NOT" | "REGEXP" | "NOT REGEXP" | "RLIKE" | "SOUNDS LIKE" => {
                Some(Operator::Compare)
            }
            _ => None,
        }
    }
}

fn is_column_ref(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '`') || !c.is_ascii())
}

pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaped(cond: &Condition) -> String {
        cond.shape().unwrap().0.into_owned()
    }

    #[test]
    fn explicit_templates_pass_through() {
        assert_eq!(shaped(&Condition::and("ID = ?", 1)), "ID = ?");
        assert_eq!(shaped(&Condition::and("A = B", ())), "A = B");
    }

    #[test]
    fn column_value_shorthand() {
        let cond = Condition::and("Username", "admin");
        let (template, args) = cond.shape().unwrap();
        assert_eq!(template, "Username = ?");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn operator_shorthand_keeps_operator_text() {
        let cond = Condition::and("Age", (">=", 18));
        let (template, args) = cond.shape().unwrap();
        assert_eq!(template, "Age >= ?");
        assert_eq!(args.len(), 1);

        assert_eq!(shaped(&Condition::and("Name", ("not like", "a%"))), "Name not like ?");
    }

    #[test]
    fn in_shorthand_shapes() {
        assert_eq!(shaped(&Condition::and("ID", ("IN", 1))), "ID IN (?)");
        assert_eq!(shaped(&Condition::and("ID", ("IN", vec![1, 2]))), "ID IN ?");
        assert_eq!(shaped(&Condition::and("ID", ("NOT IN", 1, 2, 3))), "ID NOT IN (?, ?, ?)");
    }

    #[test]
    fn between_shorthand() {
        let cond = Condition::and("Score", ("BETWEEN", 10, 20));
        let (template, args) = cond.shape().unwrap();
        assert_eq!(template, "Score BETWEEN ? AND ?");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn ambiguous_shapes_fail() {
        for cond in [
            Condition::and("ID = 1", 5),
            Condition::and("Username", ("admin", "root")),
            Condition::and("Score", ("BETWEEN", 10)),
            Condition::and("Age", (">", 1, 2)),
        ] {
            assert!(matches!(
                cond.shape(),
                Err(WeaveError::AmbiguousCondition { .. })
            ));
        }
    }
}
