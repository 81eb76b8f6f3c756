//! Bulk update of variable attributes.
//!
//! One field of many ItemDefs is either set to a value or rewritten with a
//! find/replace. Literal finds are escaped and may be anchored to whole words
//! or the whole string; regex finds are used as given and their replacement
//! may use `$1` style group references.

use std::fmt;

use define_model::references::{set_code_list, set_comment};
use define_model::{Describable, MetaDataVersion, ModelError, Origin, Referrer};
use regex::{NoExpand, Regex, RegexBuilder};

use crate::error::{EditError, Result};

/// Variable attribute a bulk update writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkField {
    Name,
    /// Description in the document language.
    Label,
    DataType,
    CodeListOid,
    Length,
    DisplayFormat,
    /// Set replaces all origins with one of the given type; replace edits
    /// origin descriptions.
    Origins,
    Comment,
}

impl BulkField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkField::Name => "name",
            BulkField::Label => "label",
            BulkField::DataType => "dataType",
            BulkField::CodeListOid => "codeListOid",
            BulkField::Length => "length",
            BulkField::DisplayFormat => "displayFormat",
            BulkField::Origins => "origins",
            BulkField::Comment => "commentOid",
        }
    }

    fn supports_replace(&self) -> bool {
        !matches!(self, BulkField::CodeListOid | BulkField::Comment)
    }
}

impl fmt::Display for BulkField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a literal find may match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchScope {
    #[default]
    Anywhere,
    WholeWord,
    WholeString,
}

/// A find/replace request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceSpec {
    pub find: String,
    pub replace: String,
    /// Treat `find` as a regular expression.
    pub regex: bool,
    /// Ignored for regex finds.
    pub scope: MatchScope,
    pub case_sensitive: bool,
}

impl ReplaceSpec {
    /// Case-sensitive literal find, matching anywhere.
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            regex: false,
            scope: MatchScope::Anywhere,
            case_sensitive: true,
        }
    }

    /// Regular expression find.
    pub fn pattern(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            regex: true,
            ..Self::literal(find, replace)
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn ignore_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    fn compile(&self) -> Result<Regex> {
        let pattern = if self.regex {
            self.find.clone()
        } else {
            let escaped = regex::escape(&self.find);
            match self.scope {
                MatchScope::Anywhere => escaped,
                MatchScope::WholeWord => format!(r"\b{escaped}\b"),
                MatchScope::WholeString => format!("^{escaped}$"),
            }
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
            .map_err(|source| EditError::InvalidRegex { pattern, source })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    /// Set the field; an empty value clears an optional field.
    Set(String),
    Replace(ReplaceSpec),
}

impl BulkAction {
    fn name(&self) -> &'static str {
        match self {
            BulkAction::Set(_) => "set",
            BulkAction::Replace(_) => "replace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUpdate {
    pub field: BulkField,
    pub action: BulkAction,
}

impl BulkUpdate {
    pub fn set(field: BulkField, value: impl Into<String>) -> Self {
        Self {
            field,
            action: BulkAction::Set(value.into()),
        }
    }

    pub fn replace(field: BulkField, spec: ReplaceSpec) -> Self {
        Self {
            field,
            action: BulkAction::Replace(spec),
        }
    }
}

/// Compiled form of a [`BulkAction`].
enum Rewrite<'a> {
    Set(&'a str),
    Replace { regex: Regex, spec: &'a ReplaceSpec },
}

impl Rewrite<'_> {
    /// New value for a field, or `None` when it would not change.
    fn apply(&self, current: Option<&str>) -> Option<Option<String>> {
        let updated = match self {
            Rewrite::Set(value) => (!value.is_empty()).then(|| value.to_string()),
            Rewrite::Replace { regex, spec } => {
                let current = current?;
                let replaced = if spec.regex {
                    regex.replace_all(current, spec.replace.as_str())
                } else {
                    regex.replace_all(current, NoExpand(&spec.replace))
                };
                Some(replaced.into_owned())
            }
        };
        (updated.as_deref() != current).then_some(updated)
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Update one field of many variables.
///
/// Returns the OIDs of the variables that changed. Nothing is written when
/// an OID is unknown, a pattern does not compile, or a value is invalid.
pub fn update_items_bulk(
    mdv: &mut MetaDataVersion,
    item_oids: &[String],
    update: &BulkUpdate,
) -> Result<Vec<String>> {
    if let Some(missing) = item_oids
        .iter()
        .find(|oid| !mdv.item_defs.contains_key(oid.as_str()))
    {
        return Err(ModelError::dangling("itemOid", missing.clone()).into());
    }
    let rewrite = match &update.action {
        BulkAction::Set(value) => Rewrite::Set(value),
        BulkAction::Replace(spec) => {
            if !update.field.supports_replace() {
                return Err(EditError::UnsupportedBulkUpdate {
                    field: update.field.as_str(),
                    action: update.action.name(),
                });
            }
            Rewrite::Replace {
                regex: spec.compile()?,
                spec,
            }
        }
    };

    let lang = mdv.lang.clone();
    let mut staged = mdv.clone();
    let mut changed = Vec::new();
    for oid in item_oids {
        if update_item(&mut staged, oid, update.field, &rewrite, lang.as_deref())? {
            changed.push(oid.clone());
        }
    }
    *mdv = staged;

    tracing::info!(
        field = %update.field,
        action = update.action.name(),
        requested = item_oids.len(),
        changed = changed.len(),
        "bulk update applied"
    );
    Ok(changed)
}

fn update_item(
    mdv: &mut MetaDataVersion,
    oid: &str,
    field: BulkField,
    rewrite: &Rewrite<'_>,
    lang: Option<&str>,
) -> Result<bool> {
    match field {
        BulkField::CodeListOid => {
            let current = mdv.item_defs.get(oid).and_then(|i| i.code_list_oid.clone());
            let Some(updated) = rewrite.apply(current.as_deref()) else {
                return Ok(false);
            };
            set_code_list(mdv, oid, updated)?;
            return Ok(true);
        }
        BulkField::Comment => {
            let current = mdv.item_defs.get(oid).and_then(|i| i.comment_oid.clone());
            let Some(updated) = rewrite.apply(current.as_deref()) else {
                return Ok(false);
            };
            set_comment(mdv, &Referrer::ItemDef(oid.to_string()), updated)?;
            return Ok(true);
        }
        _ => {}
    }

    let Some(item_def) = mdv.item_defs.get_mut(oid) else {
        return Ok(false);
    };
    let changed = match field {
        BulkField::Name => match rewrite.apply(Some(item_def.name.as_str())) {
            Some(Some(name)) if !name.trim().is_empty() => {
                item_def.rename(name);
                true
            }
            Some(_) => {
                return Err(ModelError::InvalidValue {
                    field: "name",
                    value: String::new(),
                }
                .into());
            }
            None => false,
        },
        BulkField::Label => {
            // Edit the text the lookup fell back to rather than adding one.
            let index = item_def.description_index(lang);
            match rewrite.apply(item_def.description(lang)) {
                Some(Some(label)) if !label.is_empty() => {
                    match index {
                        Some(index) => item_def.descriptions_mut()[index].value = label,
                        None => item_def.set_description(lang, label),
                    }
                    true
                }
                Some(_) => {
                    if let Some(index) = index {
                        item_def.descriptions_mut().remove(index);
                    }
                    true
                }
                None => false,
            }
        }
        BulkField::DataType => match rewrite.apply(item_def.data_type.as_deref()) {
            Some(updated) => {
                item_def.data_type = optional(updated);
                true
            }
            None => false,
        },
        BulkField::DisplayFormat => match rewrite.apply(item_def.display_format.as_deref()) {
            Some(updated) => {
                item_def.display_format = optional(updated);
                true
            }
            None => false,
        },
        BulkField::Length => {
            let current = item_def.length.map(|length| length.to_string());
            match rewrite.apply(current.as_deref()) {
                Some(updated) => {
                    item_def.length = updated
                        .map(|value| {
                            value.trim().parse::<u32>().map_err(|_| ModelError::InvalidValue {
                                field: "length",
                                value,
                            })
                        })
                        .transpose()?;
                    true
                }
                None => false,
            }
        }
        BulkField::Origins => match rewrite {
            Rewrite::Set(origin_type) => {
                let current = item_def
                    .origins
                    .first()
                    .and_then(|origin| origin.origin_type.as_deref());
                let unchanged = if origin_type.is_empty() {
                    item_def.origins.is_empty()
                } else {
                    item_def.origins.len() == 1 && current == Some(*origin_type)
                };
                if unchanged {
                    false
                } else {
                    item_def.origins = if origin_type.is_empty() {
                        Vec::new()
                    } else {
                        vec![Origin::new(*origin_type)]
                    };
                    true
                }
            }
            Rewrite::Replace { .. } => {
                let mut any = false;
                for origin in &mut item_def.origins {
                    for text in &mut origin.descriptions {
                        if let Some(Some(updated)) = rewrite.apply(Some(text.value.as_str())) {
                            text.value = updated;
                            any = true;
                        }
                    }
                }
                any
            }
        },
        BulkField::CodeListOid | BulkField::Comment => false,
    };
    Ok(changed)
}
