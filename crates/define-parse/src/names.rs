//! Element and attribute name normalization.
//!
//! Element names lose their namespace prefix and keep their case
//! (`def:ValueListDef` becomes `ValueListDef`). Attribute names lose their
//! prefix and are converted to lower camel case:
//!
//! | raw | key |
//! |---|---|
//! | `OID` | `oid` |
//! | `ODMVersion` | `odmVersion` |
//! | `SASDatasetName` | `sasDatasetName` |
//! | `ItemOID` | `itemOid` |
//! | `def:leafID` | `leafId` |
//! | `xml:lang` | `lang` |
//! | `xmlns:def` | `def` |
//!
//! A leading run of capitals is lowercased. Any later run keeps its first
//! letter and lowercases the rest. When a run is followed by a lowercase
//! letter, its last capital starts the next word.

/// Drop the namespace prefix of a qualified name.
pub fn strip_namespace(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

pub fn lower_camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_uppercase() {
            i += 1;
        }
        let mut end = i;
        if end - start > 1 && chars.get(i).is_some_and(char::is_ascii_lowercase) {
            end -= 1;
        }

        let run = &chars[start..end];
        if start == 0 {
            out.extend(run.iter().map(char::to_ascii_lowercase));
        } else {
            out.push(run[0]);
            out.extend(run[1..].iter().map(char::to_ascii_lowercase));
        }
        i = end;
    }
    out
}

/// Normalized element name.
pub fn element_name(raw: &str) -> String {
    strip_namespace(raw).to_string()
}

/// Normalized attribute key.
pub fn attribute_key(raw: &str) -> String {
    lower_camel_case(strip_namespace(raw))
}
