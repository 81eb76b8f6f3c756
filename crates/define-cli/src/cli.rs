//! CLI argument definitions for the Define-XML inspector.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "define-cli",
    version,
    about = "Inspect Define-XML 2.0/2.1 metadata",
    long_about = "Load a Define-XML document (XML or xml2js JSON) into the metadata model.\n\n\
                  Prints a dataset summary with entity counts and reference audit results,\n\
                  or the full model as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a Define-XML document and summarize its metadata.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Define-XML document; `.json` files are read as xml2js output.
    #[arg(value_name = "DEFINE")]
    pub path: PathBuf,

    /// Print the parsed model as JSON instead of the summary table.
    #[arg(long = "json")]
    pub json: bool,

    /// TOML configuration (reference mode, default language, copy defaults).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fail on unresolved references (default unless the config says otherwise).
    #[arg(long = "strict", conflicts_with = "permissive")]
    pub strict: bool,

    /// Keep unresolved references and log a warning for each.
    #[arg(long = "permissive")]
    pub permissive: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormatArg {
    #[default]
    Pretty,
    Compact,
    Json,
}
