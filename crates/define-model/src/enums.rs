//! Closed vocabularies used by Define-XML attributes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// `Yes` / `No` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" => Ok(YesNo::Yes),
            "No" => Ok(YesNo::No),
            other => Err(ModelError::InvalidValue {
                field: "Yes/No flag",
                value: other.to_string(),
            }),
        }
    }
}

/// RangeCheck comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    In,
    NotIn,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Lt => "LT",
            Comparator::Le => "LE",
            Comparator::Gt => "GT",
            Comparator::Ge => "GE",
            Comparator::Eq => "EQ",
            Comparator::Ne => "NE",
            Comparator::In => "IN",
            Comparator::NotIn => "NOTIN",
        }
    }

    /// `IN` and `NOTIN` take a list of values; the rest take one.
    pub fn is_multi_value(&self) -> bool {
        matches!(self, Comparator::In | Comparator::NotIn)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LT" => Ok(Comparator::Lt),
            "LE" => Ok(Comparator::Le),
            "GT" => Ok(Comparator::Gt),
            "GE" => Ok(Comparator::Ge),
            "EQ" => Ok(Comparator::Eq),
            "NE" => Ok(Comparator::Ne),
            "IN" => Ok(Comparator::In),
            "NOTIN" => Ok(Comparator::NotIn),
            _ => Err(ModelError::InvalidValue {
                field: "Comparator",
                value: s.to_string(),
            }),
        }
    }
}

/// How a codelist stores its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeListType {
    /// `CodeListItem` elements with decodes.
    Decoded,
    /// `EnumeratedItem` elements without decodes.
    Enumerated,
    /// Reference to an external dictionary.
    External,
}

impl CodeListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeListType::Decoded => "decoded",
            CodeListType::Enumerated => "enumerated",
            CodeListType::External => "external",
        }
    }
}

impl fmt::Display for CodeListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
