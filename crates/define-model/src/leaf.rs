use serde::{Deserialize, Serialize};

/// External file reference (`def:leaf`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    pub id: String,
    pub href: String,
    pub title: Option<String>,
}

impl Leaf {
    pub fn new(id: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            title: None,
        }
    }
}
