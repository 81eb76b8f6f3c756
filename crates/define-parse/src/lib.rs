//! Define-XML parser.
//!
//! Converts Define-XML 2.0/2.1 documents into the [`define_model`] entity
//! graph. Input is either XML text or the xml2js JSON shape; both are first
//! turned into an [`XmlNode`] tree with normalized names.
//!
//! ```rust,ignore
//! use define_model::DefineConfig;
//! use define_parse::parse_define_str;
//!
//! let odm = parse_define_str(&std::fs::read_to_string("define.xml")?, &DefineConfig::default())?;
//! println!("{} datasets", odm.mdv().item_groups.len());
//! ```

pub mod define;
mod elements;
pub mod error;
pub mod names;
pub mod order;
pub mod tree;

pub use define::{parse_define, parse_define_json, parse_define_str};
pub use error::{ParseError, Result};
pub use tree::XmlNode;
