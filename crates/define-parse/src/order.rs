//! Display order derivation.
//!
//! Elements may carry an explicit position (`OrderNumber`, `KeySequence`).
//! Sorting uses `(position, declaration index)` with a missing position
//! ordering before any explicit one, so unnumbered elements come first in
//! declaration order and numbered elements follow by number. Ties keep
//! declaration order.

/// OIDs sorted by optional position, then declaration index.
pub fn derive_order<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, Option<u32>)>,
{
    let mut indexed: Vec<(Option<u32>, usize, String)> = entries
        .into_iter()
        .enumerate()
        .map(|(index, (oid, position))| (position, index, oid))
        .collect();
    indexed.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    indexed.into_iter().map(|(_, _, oid)| oid).collect()
}

/// Like [`derive_order`], keeping only entries with an explicit position.
///
/// Used for key order, where only variables with a `KeySequence` take part.
pub fn derive_explicit_order<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, Option<u32>)>,
{
    derive_order(entries.into_iter().filter(|(_, position)| position.is_some()))
}
