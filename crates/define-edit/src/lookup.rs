//! Name-based OID lookup, used to resolve pointers across documents.

use define_model::MetaDataVersion;

/// OID of the dataset with the given name.
pub fn item_group_oid_by_name<'a>(mdv: &'a MetaDataVersion, name: &str) -> Option<&'a str> {
    mdv.item_groups_in_order()
        .find(|group| group.name == name)
        .map(|group| group.oid.as_str())
}

/// OID of the variable with the given name.
///
/// With a dataset, only the variables of that dataset are searched. Without
/// one, the first dataset-level variable with the name wins.
pub fn item_def_oid_by_name<'a>(
    mdv: &'a MetaDataVersion,
    item_group_oid: Option<&str>,
    name: &str,
) -> Option<&'a str> {
    match item_group_oid {
        Some(group_oid) => {
            let group = mdv.item_groups.get(group_oid)?;
            group
                .item_ref_order
                .iter()
                .filter_map(|ref_oid| group.item_refs.get(ref_oid))
                .filter_map(|item_ref| mdv.item_defs.get(&item_ref.item_oid))
                .find(|item_def| item_def.name == name)
                .map(|item_def| item_def.oid.as_str())
        }
        None => mdv
            .item_defs
            .values()
            .find(|item_def| item_def.name == name && !item_def.is_value_level())
            .map(|item_def| item_def.oid.as_str()),
    }
}
