//! terrayml cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use terrayml::normalize::MergeScope;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; terrayml ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert terraform directories into terrahub configs
    ///
    /// Converts SOURCE and each of its child directories. Every converted
    /// directory gets a config file in the matching DESTINATION directory.
    ///
    /// When SOURCE and DESTINATION are the same directory the converted
    /// files are deleted (see --keep-sources).
    Convert(ConvertCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct ConvertCommand {
    /// Directory with terraform files
    pub source: PathBuf,

    /// Directory to write configs to
    pub destination: PathBuf,

    /// Only convert SOURCE itself, not its child directories
    #[clap(short = 's', long = "single")]
    pub single: bool,

    /// Keep converted files when converting in place
    #[clap(short = 'k', long = "keep-sources")]
    pub keep_sources: bool,

    /// Name of the generated config file
    #[clap(long = "config-name", default_value = ".terrahub.yml")]
    pub config_name: String,

    #[clap(flatten)]
    pub merge: MergeArgs,
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Where repeated blocks are considered the same
    #[arg(long = "scope", default_value_t)]
    pub scope: Scope,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum Scope {
    /// Merge by field name across the whole file
    #[default]
    Global,
    /// Merge by field name within each top-level block type
    PerGroup,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::PerGroup => f.write_str("per-group"),
        }
    }
}

impl From<Scope> for MergeScope {
    fn from(value: Scope) -> Self {
        match value {
            Scope::Global => MergeScope::Global,
            Scope::PerGroup => MergeScope::PerGroup,
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    /// Pipeline stage to print
    pub stage: Stage,

    /// File to inspect
    pub file: PathBuf,

    #[clap(flatten)]
    pub merge: MergeArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Stage {
    /// Generic tree as parsed
    Tree,
    /// Generic tree after merging repeated blocks
    Normalized,
    /// Json of the normalized tree
    Json,
    /// Generic yaml of the normalized tree
    Yaml,
    /// Template content
    Reshaped,
}
