//! Document root: ODM, Study, and global variables.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::mdv::MetaDataVersion;
use crate::oid::OidKind;

pub const ODM_NAMESPACE: &str = "http://www.cdisc.org/ns/odm/v1.3";
pub const DEF_NAMESPACE_21: &str = "http://www.cdisc.org/ns/def/v2.1";
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
pub const ARM_NAMESPACE: &str = "http://www.cdisc.org/ns/arm/v1.0";

/// Namespace declarations carried on the root element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespaces {
    pub xmlns: Option<String>,
    pub def: Option<String>,
    pub xlink: Option<String>,
    pub arm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVariables {
    pub study_name: Option<String>,
    pub study_description: Option<String>,
    pub protocol_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub oid: String,
    pub global_variables: GlobalVariables,
    pub meta_data_version: MetaDataVersion,
}

impl Study {
    pub fn new(oid: impl Into<String>, meta_data_version: MetaDataVersion) -> Self {
        Self {
            oid: oid.into(),
            global_variables: GlobalVariables::default(),
            meta_data_version,
        }
    }
}

/// The `ODM` root of a Define-XML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Odm {
    pub file_oid: String,
    pub file_type: String,
    pub odm_version: String,
    pub creation_date_time: Option<String>,
    pub as_of_date_time: Option<String>,
    pub originator: Option<String>,
    pub source_system: Option<String>,
    pub source_system_version: Option<String>,
    /// `Submission` or `Other` (Define-XML 2.1 `def:Context`).
    pub context: Option<String>,
    pub namespaces: Namespaces,
    pub study: Study,
}

impl Odm {
    /// Fresh Define-XML 2.1 document wrapping an empty MetaDataVersion.
    pub fn new(study_name: impl Into<String>) -> Self {
        let study_name = study_name.into();
        let mut mdv = MetaDataVersion::new(OidKind::MetaDataVersion.generate(), study_name.clone());
        mdv.define_version = Some("2.1.0".to_string());

        let mut study = Study::new(OidKind::Study.generate(), mdv);
        study.global_variables.study_name = Some(study_name);

        Self {
            file_oid: OidKind::Odm.generate(),
            file_type: "Snapshot".to_string(),
            odm_version: "1.3.2".to_string(),
            creation_date_time: Some(Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()),
            as_of_date_time: None,
            originator: None,
            source_system: None,
            source_system_version: None,
            context: Some("Other".to_string()),
            namespaces: Namespaces {
                xmlns: Some(ODM_NAMESPACE.to_string()),
                def: Some(DEF_NAMESPACE_21.to_string()),
                xlink: Some(XLINK_NAMESPACE.to_string()),
                arm: None,
            },
            study,
        }
    }

    pub fn mdv(&self) -> &MetaDataVersion {
        &self.study.meta_data_version
    }

    pub fn mdv_mut(&mut self) -> &mut MetaDataVersion {
        &mut self.study.meta_data_version
    }
}
