//! Define-XML metadata entity model.
//!
//! This crate provides:
//!
//! - **Entities** for every Define-XML element the editor works with, stored in
//!   OID-keyed maps owned by [`MetaDataVersion`]
//! - **OID minting** with collision checks across a batch of edits
//! - **Cross-reference maintenance** keeping `sources` back-references in step
//!   with forward pointers
//! - **Content comparison** used to deduplicate shared entities on copy
//!
//! # Module Organization
//!
//! - [`text`]: descriptions, aliases, documents, and the `Describable` /
//!   `Documentable` capabilities
//! - [`item_group`], [`item_def`], [`code_list`], [`comment`], [`where_clause`],
//!   [`analysis`], [`leaf`]: entity types
//! - [`mdv`], [`odm`]: document aggregates
//! - [`references`]: attach/detach, rebuild, and audit of back-references
//! - [`compare`]: content equality with documented exclusion lists
//! - [`config`]: [`DefineConfig`] and [`ReferenceMode`]

// Macros first: later modules use them.
pub mod text;

pub mod analysis;
pub mod code_list;
pub mod comment;
pub mod compare;
pub mod config;
pub mod enums;
pub mod error;
pub mod item_def;
pub mod item_group;
pub mod leaf;
pub mod mdv;
pub mod odm;
pub mod oid;
pub mod references;
pub mod where_clause;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{ModelError, Result};

pub use analysis::{
    AnalysisDataset, AnalysisResult, AnalysisResultDisplays, Documentation, ProgrammingCode,
    ResultDisplay,
};
pub use code_list::{CodeList, CodeListItem, CodeListSources, EnumeratedItem, ExternalCodeList};
pub use comment::{Comment, CommentBody, CommentSources, FormalExpression, Method, MethodSources};
pub use config::{CopyDefaults, DefineConfig, ReferenceMode};
pub use enums::{CodeListType, Comparator, YesNo};
pub use item_def::{ItemDef, ItemDefSources, Origin, PREDECESSOR_ORIGIN};
pub use item_group::{
    Container, DatasetClass, ItemGroup, ItemRef, ItemRefContainer, ValueList, ValueListSources,
};
pub use leaf::Leaf;
pub use mdv::{MdvOrder, MetaDataVersion, Standard};
pub use odm::{GlobalVariables, Namespaces, Odm, Study};
pub use oid::{OidKind, OidRegistry};
pub use references::{
    DanglingPointer, DetachOutcome, Reference, Referrer, SourceMismatch, Target, attach_reference,
    audit_sources, dangling_references, detach_reference, forward_references, rebuild_sources,
};
pub use text::{Alias, Describable, Document, Documentable, PdfPageRef, TranslatedText};
pub use where_clause::{RangeCheck, WhereClause, WhereClauseSources};
