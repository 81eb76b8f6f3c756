//! OID classification and registry uniqueness.

use std::collections::BTreeSet;

use proptest::prelude::*;

use define_model::{ItemDef, MetaDataVersion, ModelError, OidKind, OidRegistry};

fn kind_strategy() -> impl Strategy<Value = OidKind> {
    proptest::sample::select(OidKind::ALL.to_vec())
}

#[test]
fn generated_oids_carry_kind_prefix() {
    for kind in OidKind::ALL {
        let oid = kind.generate();
        assert!(oid.starts_with(&format!("{}.", kind.prefix())));
        assert_eq!(OidKind::classify(&oid), Some(kind));
    }
    assert_eq!(OidKind::classify("NOPREFIX"), None);
    assert_eq!(OidKind::classify("IG."), None);
}

#[test]
fn reserve_rejects_taken_oid() {
    let mut mdv = MetaDataVersion::new("MDV.1", "Study");
    mdv.item_defs
        .insert("IT.AGE".to_string(), ItemDef::new("IT.AGE", "AGE"));
    let mut registry = OidRegistry::from_mdv(&mdv);

    let error = registry.reserve(OidKind::ItemDef, "IT.AGE").unwrap_err();
    assert!(matches!(error, ModelError::DuplicateOid { kind: OidKind::ItemDef, .. }));
    registry.reserve(OidKind::ItemGroup, "IT.AGE").unwrap();
}

proptest! {
    #[test]
    fn minted_oids_are_unique_and_disjoint(kinds in proptest::collection::vec(kind_strategy(), 1..200)) {
        let mut mdv = MetaDataVersion::new("MDV.1", "Study");
        for name in ["AGE", "SEX", "RACE"] {
            let oid = format!("IT.{name}");
            mdv.item_defs.insert(oid.clone(), ItemDef::new(oid, name));
        }
        let existing: BTreeSet<String> = mdv.item_defs.keys().cloned().collect();
        let mut registry = OidRegistry::from_mdv(&mdv);
        let before = registry.len();

        let mut minted = BTreeSet::new();
        for kind in &kinds {
            let oid = registry.mint(*kind);
            prop_assert_eq!(OidKind::classify(&oid), Some(*kind));
            prop_assert!(!existing.contains(&oid));
            prop_assert!(minted.insert(oid));
        }
        prop_assert_eq!(registry.len(), before + kinds.len());
    }
}
