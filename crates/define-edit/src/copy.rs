//! Copying variables, datasets, and codelists within or between documents.
//!
//! A copy never touches the target document. It returns a [`CopyOutcome`]
//! holding new entities under freshly minted OIDs; [`apply_copy`] merges it.
//! Every OID is minted through one [`OidRegistry`], so several copies into
//! the same target never hand out the same OID twice.
//!
//! Shared entities are handled as follows:
//!
//! | entity | same document | other document |
//! |---|---|---|
//! | CodeList | reused | an equal target codelist is reused, else copied |
//! | Method | reused, copied with `detach_methods` | deduplicated, copied with `detach_methods` |
//! | Comment | reused, copied with `detach_comments` | deduplicated, copied with `detach_comments` |
//! | Leaf | reused | reused when equal, renamed when the ID is taken by a different leaf |
//!
//! Variables, value lists, and where-clauses are always copied. Range checks
//! of copied where-clauses are pointed at the copied variables; across
//! documents, variables outside the batch are looked up by name and cleared
//! when the target has no match.
//!
//! [`apply_copy`]: crate::apply_copy

use std::collections::BTreeMap;

use define_model::compare::{code_lists_equal, comments_equal, leafs_equal, methods_equal};
use define_model::{
    CodeList, CodeListSources, Comment, CommentSources, Container, DefineConfig, Documentable,
    ItemDef, ItemDefSources, ItemGroup, ItemRef, ItemRefContainer, Leaf, Method, MethodSources,
    MetaDataVersion, ModelError, OidKind, OidRegistry, Origin, RangeCheck, ReferenceMode,
    ValueList, ValueListSources, WhereClause, WhereClauseSources,
};

use crate::error::{EditError, Result};
use crate::lookup::{item_def_oid_by_name, item_group_oid_by_name};

/// Switches for one copy operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Source and target are the same document.
    pub same_define: bool,
    /// Copy the value lists of copied variables.
    pub copy_vlm: bool,
    /// Always duplicate methods instead of sharing or deduplicating them.
    pub detach_methods: bool,
    /// Always duplicate comments instead of sharing or deduplicating them.
    pub detach_comments: bool,
    /// Drop methods and comments and record a `Predecessor` origin instead.
    pub add_as_predecessor: bool,
    pub reference_mode: ReferenceMode,
}

impl CopyOptions {
    pub fn from_config(config: &DefineConfig, same_define: bool) -> Self {
        Self {
            same_define,
            copy_vlm: config.copy.copy_vlm,
            detach_methods: config.copy.detach_methods,
            detach_comments: config.copy.detach_comments,
            add_as_predecessor: false,
            reference_mode: config.reference_mode,
        }
    }

    #[must_use]
    pub fn with_copy_vlm(mut self, copy_vlm: bool) -> Self {
        self.copy_vlm = copy_vlm;
        self
    }

    #[must_use]
    pub fn with_detach_methods(mut self, detach: bool) -> Self {
        self.detach_methods = detach;
        self
    }

    #[must_use]
    pub fn with_detach_comments(mut self, detach: bool) -> Self {
        self.detach_comments = detach;
        self
    }

    #[must_use]
    pub fn with_predecessor(mut self, add_as_predecessor: bool) -> Self {
        self.add_as_predecessor = add_as_predecessor;
        self
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self::from_config(&DefineConfig::default(), false)
    }
}

/// New entities produced by a copy, ready to be merged into the target.
#[derive(Debug, Clone, Default)]
pub struct CopyOutcome {
    pub item_groups: BTreeMap<String, ItemGroup>,
    pub item_group_order: Vec<String>,
    /// Item refs for the target container of a variable copy.
    pub item_refs: BTreeMap<String, ItemRef>,
    pub item_ref_order: Vec<String>,
    pub key_order: Vec<String>,
    pub item_defs: BTreeMap<String, ItemDef>,
    pub value_lists: BTreeMap<String, ValueList>,
    pub where_clauses: BTreeMap<String, WhereClause>,
    pub code_lists: BTreeMap<String, CodeList>,
    pub code_list_order: Vec<String>,
    pub methods: BTreeMap<String, Method>,
    pub comments: BTreeMap<String, Comment>,
    pub leafs: BTreeMap<String, Leaf>,
    pub leaf_order: Vec<String>,
    /// Source OID to target OID, for copied and reused entities alike.
    pub oid_map: BTreeMap<(OidKind, String), String>,
    /// Shared entities reused from the target instead of copied.
    pub reused: usize,
}

impl CopyOutcome {
    /// Target OID standing in for a source entity.
    pub fn mapped(&self, kind: OidKind, source_oid: &str) -> Option<&str> {
        self.oid_map
            .get(&(kind, source_oid.to_string()))
            .map(String::as_str)
    }

    /// Number of new top-level entities.
    pub fn created(&self) -> usize {
        self.item_groups.len()
            + self.item_refs.len()
            + self.item_defs.len()
            + self.value_lists.len()
            + self.where_clauses.len()
            + self.code_lists.len()
            + self.methods.len()
            + self.comments.len()
            + self.leafs.len()
    }
}

/// Variables to copy from one container into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableCopy {
    pub source_container: Container,
    /// Item refs of the source container, in the order they are inserted.
    pub item_ref_oids: Vec<String>,
    pub target_container: Container,
}

struct CopiedRefs {
    item_refs: BTreeMap<String, ItemRef>,
    order: Vec<String>,
    keys: Vec<String>,
}

struct Copier<'a> {
    source: &'a MetaDataVersion,
    target: &'a MetaDataVersion,
    options: &'a CopyOptions,
    registry: &'a mut OidRegistry,
    out: CopyOutcome,
}

impl<'a> Copier<'a> {
    fn new(
        target: &'a MetaDataVersion,
        source: &'a MetaDataVersion,
        options: &'a CopyOptions,
        registry: &'a mut OidRegistry,
    ) -> Self {
        registry.absorb(target);
        Self {
            source,
            target,
            options,
            registry,
            out: CopyOutcome::default(),
        }
    }

    fn map(&mut self, kind: OidKind, source_oid: &str, target_oid: &str) {
        self.out
            .oid_map
            .insert((kind, source_oid.to_string()), target_oid.to_string());
    }

    fn mapped(&self, kind: OidKind, source_oid: &str) -> Option<String> {
        self.out.mapped(kind, source_oid).map(str::to_string)
    }

    fn reuse(&mut self, kind: OidKind, source_oid: &str, target_oid: String) -> Option<String> {
        self.map(kind, source_oid, &target_oid);
        self.out.reused += 1;
        Some(target_oid)
    }

    /// A pointer in the source document names nothing.
    fn missing(&self, field: &'static str, oid: &str) -> Result<Option<String>> {
        if self.options.reference_mode.is_strict() {
            return Err(ModelError::dangling(field, oid).into());
        }
        tracing::warn!(field, oid, "source entity not found, reference cleared");
        Ok(None)
    }

    fn optional(
        &mut self,
        oid: Option<&str>,
        copy: impl FnOnce(&mut Self, &str) -> Result<Option<String>>,
    ) -> Result<Option<String>> {
        match oid {
            Some(oid) => copy(self, oid),
            None => Ok(None),
        }
    }

    // --- Shared entities ---

    /// Codelist referenced by a copied variable.
    fn code_list(&mut self, oid: &str) -> Result<Option<String>> {
        if self.options.same_define {
            return Ok(Some(oid.to_string()));
        }
        self.copy_code_list(oid, true)
    }

    fn copy_code_list(&mut self, oid: &str, dedup: bool) -> Result<Option<String>> {
        if let Some(mapped) = self.mapped(OidKind::CodeList, oid) {
            return Ok(Some(mapped));
        }
        let source_mdv = self.source;
        let Some(source) = source_mdv.code_lists.get(oid) else {
            return self.missing("codeListOid", oid);
        };
        let target_mdv = self.target;
        if dedup
            && let Some(existing) = target_mdv
                .code_lists_in_order()
                .find(|candidate| code_lists_equal(candidate, source))
        {
            return Ok(self.reuse(OidKind::CodeList, oid, existing.oid.clone()));
        }

        let mut copy = source.clone();
        copy.oid = self.registry.mint(OidKind::CodeList);
        copy.sources = CodeListSources::default();
        copy.remint_items(self.registry);
        if !self.options.same_define
            && copy
                .standard_oid
                .as_ref()
                .is_some_and(|standard| !target_mdv.standards.contains_key(standard))
        {
            copy.standard_oid = None;
        }
        self.map(OidKind::CodeList, oid, &copy.oid);
        copy.comment_oid = self.optional(source.comment_oid.as_deref(), Self::comment)?;

        let new_oid = copy.oid.clone();
        self.out.code_list_order.push(new_oid.clone());
        self.out.code_lists.insert(new_oid.clone(), copy);
        Ok(Some(new_oid))
    }

    fn method(&mut self, oid: &str) -> Result<Option<String>> {
        let detach = self.options.detach_methods;
        if self.options.same_define && !detach {
            return Ok(Some(oid.to_string()));
        }
        if let Some(mapped) = self.mapped(OidKind::Method, oid) {
            return Ok(Some(mapped));
        }
        let source_mdv = self.source;
        let Some(source) = source_mdv.methods.get(oid) else {
            return self.missing("methodOid", oid);
        };
        let target_mdv = self.target;
        if !self.options.same_define
            && !detach
            && let Some(existing) = target_mdv
                .methods
                .values()
                .find(|candidate| methods_equal(candidate, source))
        {
            return Ok(self.reuse(OidKind::Method, oid, existing.oid.clone()));
        }

        let mut copy = source.clone();
        copy.oid = self.registry.mint(OidKind::Method);
        copy.sources = MethodSources::default();
        self.map(OidKind::Method, oid, &copy.oid);
        self.remap_documents(&mut copy)?;

        let new_oid = copy.oid.clone();
        self.out.methods.insert(new_oid.clone(), copy);
        Ok(Some(new_oid))
    }

    fn comment(&mut self, oid: &str) -> Result<Option<String>> {
        let detach = self.options.detach_comments;
        if self.options.same_define && !detach {
            return Ok(Some(oid.to_string()));
        }
        if let Some(mapped) = self.mapped(OidKind::Comment, oid) {
            return Ok(Some(mapped));
        }
        let source_mdv = self.source;
        let Some(source) = source_mdv.comments.get(oid) else {
            return self.missing("commentOid", oid);
        };
        let target_mdv = self.target;
        if !self.options.same_define
            && !detach
            && let Some(existing) = target_mdv
                .comments
                .values()
                .find(|candidate| comments_equal(candidate, source))
        {
            return Ok(self.reuse(OidKind::Comment, oid, existing.oid.clone()));
        }

        let mut copy = source.clone();
        copy.oid = self.registry.mint(OidKind::Comment);
        copy.sources = CommentSources::default();
        self.map(OidKind::Comment, oid, &copy.oid);
        self.remap_documents(&mut copy)?;

        let new_oid = copy.oid.clone();
        self.out.comments.insert(new_oid.clone(), copy);
        Ok(Some(new_oid))
    }

    fn leaf(&mut self, id: &str) -> Result<Option<String>> {
        if self.options.same_define {
            return Ok(Some(id.to_string()));
        }
        if let Some(mapped) = self.mapped(OidKind::Leaf, id) {
            return Ok(Some(mapped));
        }
        let source_mdv = self.source;
        let Some(source) = source_mdv.leafs.get(id) else {
            return self.missing("leafId", id);
        };
        let target_mdv = self.target;
        let reusable = match target_mdv.leafs.get(id) {
            Some(existing) => leafs_equal(existing, source).then(|| existing.id.clone()),
            None => target_mdv
                .leafs
                .values()
                .find(|candidate| leafs_equal(candidate, source))
                .map(|existing| existing.id.clone()),
        };
        if let Some(existing) = reusable {
            return Ok(self.reuse(OidKind::Leaf, id, existing));
        }

        let new_id = if self.registry.reserve(OidKind::Leaf, id).is_ok() {
            id.to_string()
        } else {
            let renamed = self.registry.mint(OidKind::Leaf);
            tracing::debug!(leaf = id, renamed = %renamed, "leaf ID taken by a different leaf");
            renamed
        };
        let mut copy = source.clone();
        copy.id = new_id.clone();
        self.map(OidKind::Leaf, id, &new_id);
        self.out.leaf_order.push(new_id.clone());
        self.out.leafs.insert(new_id.clone(), copy);
        Ok(Some(new_id))
    }

    /// Copy the leafs an entity points at and rewrite its document references.
    fn remap_documents(&mut self, entity: &mut impl Documentable) -> Result<()> {
        let mut renames = BTreeMap::new();
        for leaf_id in entity.leaf_ids() {
            let resolved = self.leaf(&leaf_id)?;
            renames.insert(leaf_id, resolved);
        }
        entity
            .documents_mut()
            .retain(|document| !matches!(renames.get(&document.leaf_id), Some(None)));
        for document in entity.documents_mut() {
            if let Some(Some(new_id)) = renames.get(&document.leaf_id) {
                document.leaf_id.clone_from(new_id);
            }
        }
        Ok(())
    }

    // --- Variables and value-level metadata ---

    fn where_clause(&mut self, oid: &str) -> Result<Option<String>> {
        if let Some(mapped) = self.mapped(OidKind::WhereClause, oid) {
            return Ok(Some(mapped));
        }
        let source_mdv = self.source;
        let Some(source) = source_mdv.where_clauses.get(oid) else {
            return self.missing("whereClauseOid", oid);
        };
        let mut copy = source.clone();
        copy.oid = self.registry.mint(OidKind::WhereClause);
        copy.sources = WhereClauseSources::default();
        self.map(OidKind::WhereClause, oid, &copy.oid);
        copy.comment_oid = self.optional(source.comment_oid.as_deref(), Self::comment)?;

        let new_oid = copy.oid.clone();
        self.out.where_clauses.insert(new_oid.clone(), copy);
        Ok(Some(new_oid))
    }

    /// `dataset` is the source dataset name used for predecessor origins.
    fn item_def(&mut self, oid: &str, dataset: Option<&str>) -> Result<Option<String>> {
        if let Some(mapped) = self.mapped(OidKind::ItemDef, oid) {
            return Ok(Some(mapped));
        }
        let source_mdv = self.source;
        let Some(source) = source_mdv.item_defs.get(oid) else {
            return self.missing("itemOid", oid);
        };
        let mut copy = source.clone();
        copy.oid = self.registry.mint(OidKind::ItemDef);
        copy.sources = ItemDefSources::default();
        copy.parent_item_def_oid = None;
        self.map(OidKind::ItemDef, oid, &copy.oid);

        copy.code_list_oid = self.optional(source.code_list_oid.as_deref(), Self::code_list)?;
        if self.options.add_as_predecessor {
            copy.comment_oid = None;
            copy.origins = vec![Origin::predecessor(
                dataset.unwrap_or_default(),
                &source.name,
                self.target.lang.as_deref(),
            )];
        } else {
            copy.comment_oid = self.optional(source.comment_oid.as_deref(), Self::comment)?;
            for origin in &mut copy.origins {
                self.remap_documents(origin)?;
            }
        }
        copy.value_list_oid = match source.value_list_oid.as_deref() {
            Some(list_oid) if self.options.copy_vlm => {
                self.value_list(list_oid, &copy.oid, dataset)?
            }
            _ => None,
        };

        let new_oid = copy.oid.clone();
        self.out.item_defs.insert(new_oid.clone(), copy);
        Ok(Some(new_oid))
    }

    fn value_list(
        &mut self,
        oid: &str,
        parent_oid: &str,
        dataset: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(mapped) = self.mapped(OidKind::ValueList, oid) {
            return Ok(Some(mapped));
        }
        let source_mdv = self.source;
        let Some(source) = source_mdv.value_lists.get(oid) else {
            return self.missing("valueListOid", oid);
        };
        let new_oid = self.registry.mint(OidKind::ValueList);
        self.map(OidKind::ValueList, oid, &new_oid);

        let container = Container::ValueList(oid.to_string());
        let refs = self.item_refs(&container, source, &source.item_ref_order, dataset)?;
        for item_ref in refs.item_refs.values() {
            if let Some(child) = self.out.item_defs.get_mut(&item_ref.item_oid) {
                child.parent_item_def_oid = Some(parent_oid.to_string());
            }
        }

        let mut copy = ValueList::new(new_oid.clone());
        copy.descriptions = source.descriptions.clone();
        copy.item_refs = refs.item_refs;
        copy.item_ref_order = refs.order;
        copy.key_order = refs.keys;
        copy.sources = ValueListSources::default();
        self.out.value_lists.insert(new_oid.clone(), copy);
        Ok(Some(new_oid))
    }

    /// Copy the listed item refs of a source container.
    fn item_refs(
        &mut self,
        container: &Container,
        owner: &dyn ItemRefContainer,
        ref_oids: &[String],
        dataset: Option<&str>,
    ) -> Result<CopiedRefs> {
        let mut copied = CopiedRefs {
            item_refs: BTreeMap::new(),
            order: Vec::with_capacity(ref_oids.len()),
            keys: Vec::new(),
        };
        for ref_oid in ref_oids {
            let item_ref = owner
                .item_refs()
                .get(ref_oid)
                .ok_or_else(|| ModelError::dangling("itemRefOid", ref_oid.clone()))?;
            let Some(item_oid) = self.item_def(&item_ref.item_oid, dataset)? else {
                continue;
            };

            let mut copy = item_ref.clone();
            copy.item_oid = item_oid;
            copy.method_oid = if self.options.add_as_predecessor {
                None
            } else {
                self.optional(item_ref.method_oid.as_deref(), Self::method)?
            };
            copy.role_code_list_oid =
                self.optional(item_ref.role_code_list_oid.as_deref(), Self::code_list)?;
            copy.where_clause_oid = match container {
                Container::ValueList(_) => {
                    self.optional(item_ref.where_clause_oid.as_deref(), Self::where_clause)?
                }
                Container::ItemGroup(_) => None,
            };

            let new_oid = self.registry.mint(OidKind::ItemRef);
            self.map(OidKind::ItemRef, ref_oid, &new_oid);
            copied.order.push(new_oid.clone());
            copied.item_refs.insert(new_oid, copy);
        }

        copied.keys = owner
            .key_order()
            .iter()
            .filter(|key| ref_oids.contains(*key))
            .filter_map(|key| self.mapped(OidKind::ItemRef, key))
            .collect();
        Ok(copied)
    }

    // --- Datasets ---

    fn item_group(&mut self, oid: &str) -> Result<String> {
        let source_mdv = self.source;
        let source = source_mdv
            .item_groups
            .get(oid)
            .ok_or_else(|| EditError::ContainerNotFound(oid.to_string()))?;
        let new_oid = self.registry.mint(OidKind::ItemGroup);
        self.map(OidKind::ItemGroup, oid, &new_oid);

        let mut copy = source.clone();
        copy.oid.clone_from(&new_oid);
        copy.comment_oid = self.optional(source.comment_oid.as_deref(), Self::comment)?;
        if !self.options.same_define
            && copy
                .standard_oid
                .as_ref()
                .is_some_and(|standard| !self.target.standards.contains_key(standard))
        {
            copy.standard_oid = None;
        }
        if let Some(leaf) = copy.leaf.as_mut() {
            let leaf_id = self.registry.mint(OidKind::Leaf);
            if copy.archive_location_id.as_deref() == Some(leaf.id.as_str()) {
                copy.archive_location_id = Some(leaf_id.clone());
            }
            leaf.id = leaf_id;
        }

        let container = Container::ItemGroup(oid.to_string());
        let refs = self.item_refs(
            &container,
            source,
            &source.item_ref_order,
            Some(source.name.as_str()),
        )?;
        copy.item_refs = refs.item_refs;
        copy.item_ref_order = refs.order;
        copy.key_order = refs.keys;

        self.out.item_group_order.push(new_oid.clone());
        self.out.item_groups.insert(new_oid.clone(), copy);
        Ok(new_oid)
    }

    // --- Range check repair ---

    /// Target dataset standing in for a source dataset.
    fn resolve_group(&self, source_group: &str) -> Option<String> {
        if let Some(mapped) = self.mapped(OidKind::ItemGroup, source_group) {
            return Some(mapped);
        }
        if self.options.same_define {
            return Some(source_group.to_string());
        }
        let name = &self.source.item_groups.get(source_group)?.name;
        item_group_oid_by_name(self.target, name).map(str::to_string)
    }

    fn repair_range_check(&self, check: &mut RangeCheck) {
        let Some(item_oid) = check.item_oid.clone() else {
            return;
        };
        if let Some(copied) = self.mapped(OidKind::ItemDef, &item_oid) {
            check.item_oid = Some(copied);
            check.item_group_oid = check
                .item_group_oid
                .as_deref()
                .and_then(|group| self.resolve_group(group));
            return;
        }
        if self.options.same_define {
            return;
        }

        let group_oid = check
            .item_group_oid
            .as_deref()
            .and_then(|group| self.resolve_group(group));
        if check.item_group_oid.is_some() && group_oid.is_none() {
            tracing::warn!(item = %item_oid, "range check dataset not in target, cleared");
            check.item_oid = None;
            check.item_group_oid = None;
            return;
        }
        let resolved = self
            .source
            .item_defs
            .get(&item_oid)
            .and_then(|item_def| {
                item_def_oid_by_name(self.target, group_oid.as_deref(), &item_def.name)
            });
        match resolved {
            Some(oid) => {
                check.item_oid = Some(oid.to_string());
                check.item_group_oid = group_oid;
            }
            None => {
                tracing::warn!(item = %item_oid, "range check variable not in target, cleared");
                check.item_oid = None;
                check.item_group_oid = None;
            }
        }
    }

    fn finish(mut self) -> CopyOutcome {
        let mut clauses = std::mem::take(&mut self.out.where_clauses);
        for clause in clauses.values_mut() {
            for check in &mut clause.range_checks {
                self.repair_range_check(check);
            }
        }
        self.out.where_clauses = clauses;

        tracing::debug!(
            created = self.out.created(),
            reused = self.out.reused,
            same_define = self.options.same_define,
            "copy prepared"
        );
        self.out
    }
}

/// Copy variables into another dataset or value list.
///
/// The target container must exist; its item refs are not modified until the
/// outcome is applied.
pub fn copy_variables(
    target: &MetaDataVersion,
    source: &MetaDataVersion,
    request: &VariableCopy,
    options: &CopyOptions,
    registry: &mut OidRegistry,
) -> Result<CopyOutcome> {
    let owner = source
        .container(&request.source_container)
        .ok_or_else(|| EditError::ContainerNotFound(request.source_container.to_string()))?;
    if target.container(&request.target_container).is_none() {
        return Err(EditError::ContainerNotFound(
            request.target_container.to_string(),
        ));
    }

    let mut copier = Copier::new(target, source, options, registry);
    if let (Container::ItemGroup(from), Container::ItemGroup(to)) =
        (&request.source_container, &request.target_container)
    {
        copier.map(OidKind::ItemGroup, from, to);
    }
    let dataset = source.dataset_name(&request.source_container);
    let refs = copier.item_refs(
        &request.source_container,
        owner,
        &request.item_ref_oids,
        dataset,
    )?;
    copier.out.item_refs = refs.item_refs;
    copier.out.item_ref_order = refs.order;
    copier.out.key_order = refs.keys;

    // Variables landing in a value list become value-level items of the
    // variable that list describes.
    if let Container::ValueList(list_oid) = &request.target_container {
        let parent = target
            .value_lists
            .get(list_oid)
            .and_then(|list| list.sources.item_defs.first())
            .cloned();
        for item_ref in copier.out.item_refs.values() {
            if let Some(item_def) = copier.out.item_defs.get_mut(&item_ref.item_oid) {
                item_def.parent_item_def_oid = parent.clone();
            }
        }
    }
    Ok(copier.finish())
}

/// Copy whole datasets with their variables.
pub fn copy_item_groups(
    target: &MetaDataVersion,
    source: &MetaDataVersion,
    item_group_oids: &[String],
    options: &CopyOptions,
    registry: &mut OidRegistry,
) -> Result<CopyOutcome> {
    let mut copier = Copier::new(target, source, options, registry);
    for oid in item_group_oids {
        copier.item_group(oid)?;
    }
    Ok(copier.finish())
}

/// Copy codelists.
///
/// Within one document every codelist is duplicated. Across documents a
/// codelist equal to one already in the target is reused.
pub fn copy_code_lists(
    target: &MetaDataVersion,
    source: &MetaDataVersion,
    code_list_oids: &[String],
    options: &CopyOptions,
    registry: &mut OidRegistry,
) -> Result<CopyOutcome> {
    let mut copier = Copier::new(target, source, options, registry);
    for oid in code_list_oids {
        copier.copy_code_list(oid, !options.same_define)?;
    }
    Ok(copier.finish())
}
