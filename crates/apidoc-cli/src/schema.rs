//! # Schema Subcommand
//!
//! Data schemas: list, get, create, update, delete.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use apidoc_core::SchemaId;
use apidoc_tools::endpoints::DEFAULT_LIST_LIMIT;
use apidoc_tools::{ApiDocTools, SchemaFilter};

use crate::io::{emit, read_payload};

/// Arguments for `apidoc schema`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// List data schemas.
    List {
        /// Case-insensitive match on name or description.
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },

    /// Show one data schema.
    Get { id: u64 },

    /// Create a data schema from a JSON payload.
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace a data schema with a JSON payload.
    Update {
        id: u64,
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a data schema.
    Delete {
        id: u64,
        #[arg(long)]
        confirm: bool,
    },
}

/// Execute the schema subcommand.
pub async fn run_schema(args: &SchemaArgs, tools: &ApiDocTools) -> Result<u8> {
    match &args.command {
        SchemaCommand::List { keyword, limit } => {
            let filter = SchemaFilter {
                keyword: keyword.clone(),
                limit: Some(*limit),
            };
            emit(tools.list_schemas(&filter).await)
        }
        SchemaCommand::Get { id } => emit(tools.get_schema_detail(SchemaId(*id)).await),
        SchemaCommand::Create { file } => {
            let payload = read_payload(file)?;
            emit(tools.create_schema(&payload).await)
        }
        SchemaCommand::Update { id, file } => {
            let payload = read_payload(file)?;
            emit(tools.update_schema(SchemaId(*id), &payload).await)
        }
        SchemaCommand::Delete { id, confirm } => {
            emit(tools.delete_schema(SchemaId(*id), *confirm).await)
        }
    }
}
