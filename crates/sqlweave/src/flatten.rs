//! Payload flattening: records to columns and value groups.

use crate::arg::Arg;
use crate::config::Config;
use crate::record::{Exclusions, Record};

/// Rules applied while flattening one statement's payload.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlattenRules<'a> {
    pub omits: &'a [String],
    pub exclusions: &'a Exclusions,
    pub config: &'a Config,
    /// Drop zero-valued fields unless excluded.
    pub patch: bool,
}

/// Columns shared by every value group, in output order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Flattened<'r> {
    pub columns: Vec<String>,
    pub groups: Vec<Vec<&'r Arg>>,
}

impl<'r> Flattened<'r> {
    /// Column/value pairs of the first record.
    pub(crate) fn assignments(&self) -> impl Iterator<Item = (&str, &'r Arg)> + '_ {
        let first = self.groups.first().map(Vec::as_slice).unwrap_or_default();
        self.columns
            .iter()
            .map(String::as_str)
            .zip(first.iter().copied())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Flatten records into one column list and one value group per record.
///
/// Columns come from the first record. Later records are read by column name; a column they do
/// not carry is written as `NULL`.
pub(crate) fn flatten<'r>(records: &'r [Record], rules: FlattenRules<'_>) -> Flattened<'r> {
    let Some((first, rest)) = records.split_first() else {
        return Flattened::default();
    };

    let head = view(first, rules);
    let columns: Vec<String> = head.iter().map(|(c, _)| c.clone()).collect();
    let mut groups = Vec::with_capacity(records.len());
    groups.push(head.into_iter().map(|(_, v)| v).collect());

    for record in rest {
        let entries = view(record, rules);
        let group = columns
            .iter()
            .map(|column| {
                entries
                    .iter()
                    .find(|(c, _)| c == column)
                    .map_or(&NULL, |(_, v)| *v)
            })
            .collect();
        groups.push(group);
    }

    Flattened { columns, groups }
}

static NULL: Arg = Arg::Null;

/// One record as `column -> value` entries after renames, omissions and patch elision.
fn view<'r>(record: &'r Record, rules: FlattenRules<'_>) -> Vec<(String, &'r Arg)> {
    let mut entries: Vec<(String, &'r Arg)> = record
        .iter()
        .filter_map(|field| {
            let column = field.column(rules.config.column_naming)?;
            if rules.omits.iter().any(|o| *o == column || *o == field.name) {
                return None;
            }
            if rules.patch
                && field.value.is_zero()
                && !rules
                    .exclusions
                    .keeps(&column, &field.name, field.value.kind())
            {
                return None;
            }
            Some((column, &field.value))
        })
        .collect();

    if rules.config.order_columns {
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    entries
}
