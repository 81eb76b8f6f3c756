use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use define_model::{DefineConfig, Odm, ReferenceMode};
use define_parse::{parse_define_json, parse_define_str};
use tracing::{debug, info};

use crate::cli::InspectArgs;

/// What `inspect` produced; printing is left to `main`.
pub enum InspectOutput {
    Summary(Box<Odm>),
    Json(String),
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectOutput> {
    let config = load_config(args)?;
    debug!(mode = ?config.reference_mode, lang = %config.default_lang, "inspect config");

    let odm = load_define(&args.path, &config)?;
    info!(
        path = %args.path.display(),
        item_groups = odm.mdv().item_groups.len(),
        item_defs = odm.mdv().item_defs.len(),
        "define loaded"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&odm).context("serialize define model")?;
        return Ok(InspectOutput::Json(json));
    }
    Ok(InspectOutput::Summary(Box::new(odm)))
}

fn load_config(args: &InspectArgs) -> Result<DefineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            DefineConfig::from_toml_str(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => DefineConfig::default(),
    };
    if args.strict {
        config.reference_mode = ReferenceMode::Strict;
    } else if args.permissive {
        config.reference_mode = ReferenceMode::Permissive;
    }
    Ok(config)
}

fn load_define(path: &Path, config: &DefineConfig) -> Result<Odm> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let value: serde_json::Value =
            serde_json::from_str(&text).with_context(|| format!("parse JSON {}", path.display()))?;
        parse_define_json(&value, config)
            .with_context(|| format!("load Define-XML from {}", path.display()))
    } else {
        parse_define_str(&text, config)
            .with_context(|| format!("load Define-XML from {}", path.display()))
    }
}
