//! Structural edits on Define-XML metadata.
//!
//! This crate provides:
//!
//! - **Copy** of variables, datasets, and codelists within one document or
//!   from another one, as a [`CopyOutcome`] that does not touch the target
//! - **Merge** of a copy outcome into the target with [`apply_copy`]
//! - **Delete** with cascading removal of entities nothing points at anymore
//! - **Bulk update** of one variable field across many variables
//!
//! Every operation keeps the `sources` back-references consistent and leaves
//! the document unchanged when it fails.
//!
//! # Example
//!
//! ```ignore
//! use define_edit::{CopyOptions, VariableCopy, apply_copy, copy_variables};
//! use define_model::{Container, OidRegistry};
//!
//! let request = VariableCopy {
//!     source_container: Container::ItemGroup("IG.DM".into()),
//!     item_ref_oids: vec!["IR.DM.AGE".into()],
//!     target_container: Container::ItemGroup("IG.ADSL".into()),
//! };
//! let mut registry = OidRegistry::new();
//! let outcome = copy_variables(&target, &source, &request, &options, &mut registry)?;
//! apply_copy(&mut target, outcome, Some(&request.target_container), None, options.reference_mode)?;
//! ```

pub mod apply;
pub mod bulk;
pub mod copy;
pub mod delete;
pub mod error;
pub mod lookup;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use apply::apply_copy;
pub use bulk::{BulkAction, BulkField, BulkUpdate, MatchScope, ReplaceSpec, update_items_bulk};
pub use copy::{
    CopyOptions, CopyOutcome, VariableCopy, copy_code_lists, copy_item_groups, copy_variables,
};
pub use delete::{
    DeleteOutcome, delete_code_lists, delete_item_groups, delete_unused_code_lists,
    delete_variables,
};
pub use error::{EditError, Result};
pub use lookup::{item_def_oid_by_name, item_group_oid_by_name};
