//! Where-clauses and their text rendering.
//!
//! A where-clause renders as its range checks joined with `" AND "`. Each range
//! check renders as `[Dataset.]Variable COMPARATOR value`, with `IN`/`NOTIN`
//! values as a parenthesised comma-separated list:
//!
//! ```text
//! AGE IN (18, 65)
//! VS.VSTESTCD EQ "not done"
//! ```
//!
//! Values containing whitespace, commas, or quotes are wrapped in double
//! quotes, or in single quotes when the value itself holds a double quote.
//! A value holding both quote characters is left bare.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::enums::Comparator;
use crate::mdv::MetaDataVersion;

/// One condition of a where-clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeCheck {
    pub comparator: Comparator,
    pub soft_hard: Option<String>,
    pub item_oid: Option<String>,
    pub item_group_oid: Option<String>,
    pub check_values: Vec<String>,
}

impl RangeCheck {
    pub fn new(comparator: Comparator, item_oid: impl Into<String>) -> Self {
        Self {
            comparator,
            soft_hard: Some("Soft".to_string()),
            item_oid: Some(item_oid.into()),
            item_group_oid: None,
            check_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_item_group(mut self, item_group_oid: impl Into<String>) -> Self {
        self.item_group_oid = Some(item_group_oid.into());
        self
    }

    /// Render as `[Dataset.]Variable COMPARATOR value(s)`.
    pub fn to_text(&self, mdv: &MetaDataVersion) -> String {
        let mut subject = String::new();
        if let Some(group) = self
            .item_group_oid
            .as_deref()
            .and_then(|oid| mdv.item_groups.get(oid))
        {
            subject.push_str(&group.name);
            subject.push('.');
        }
        if let Some(item_oid) = self.item_oid.as_deref() {
            match mdv.item_defs.get(item_oid) {
                Some(item_def) => subject.push_str(&item_def.name),
                None => subject.push_str(item_oid),
            }
        }

        let values = if self.comparator.is_multi_value() {
            let joined = self
                .check_values
                .iter()
                .map(|value| quote_value(value))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({joined})")
        } else {
            self.check_values
                .first()
                .map(|value| quote_value(value).into_owned())
                .unwrap_or_default()
        };

        if values.is_empty() {
            format!("{subject} {}", self.comparator)
        } else {
            format!("{subject} {} {values}", self.comparator)
        }
    }
}

/// Quote a check value for display.
pub fn quote_value(value: &str) -> Cow<'_, str> {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || c == ',' || c == '"' || c == '\'');
    if !needs_quotes {
        return Cow::Borrowed(value);
    }
    if !value.contains('"') {
        Cow::Owned(format!("\"{value}\""))
    } else if !value.contains('\'') {
        Cow::Owned(format!("'{value}'"))
    } else {
        Cow::Borrowed(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereClauseSources {
    pub value_lists: Vec<String>,
    pub analysis_results: Vec<String>,
}

impl WhereClauseSources {
    pub fn is_empty(&self) -> bool {
        self.value_lists.is_empty() && self.analysis_results.is_empty()
    }
}

/// Predicate selecting the records a value-level item applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereClause {
    pub oid: String,
    pub range_checks: Vec<RangeCheck>,
    pub comment_oid: Option<String>,
    pub sources: WhereClauseSources,
}

impl WhereClause {
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            range_checks: Vec::new(),
            comment_oid: None,
            sources: WhereClauseSources::default(),
        }
    }

    pub fn add_range_check(&mut self, range_check: RangeCheck) {
        self.range_checks.push(range_check);
    }

    /// Human-readable predicate, e.g. `AGE GE 18 AND SEX EQ F`.
    pub fn to_text(&self, mdv: &MetaDataVersion) -> String {
        self.range_checks
            .iter()
            .map(|range_check| range_check.to_text(mdv))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
