//! # Tag Subcommand

use anyhow::Result;
use clap::{Args, Subcommand};

use apidoc_tools::ApiDocTools;

use crate::io::emit;

/// Arguments for `apidoc tag`.
#[derive(Args, Debug)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// List tags with their endpoint counts.
    List,
}

/// Execute the tag subcommand.
pub async fn run_tag(args: &TagArgs, tools: &ApiDocTools) -> Result<u8> {
    match &args.command {
        TagCommand::List => emit(tools.list_tags().await),
    }
}
