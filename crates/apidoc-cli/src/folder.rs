//! # Folder Subcommand

use anyhow::Result;
use clap::{Args, Subcommand};

use apidoc_client::CreateFolderRequest;
use apidoc_core::FolderId;
use apidoc_tools::ApiDocTools;

use crate::io::emit;

/// Arguments for `apidoc folder`.
#[derive(Args, Debug)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[derive(Subcommand, Debug)]
pub enum FolderCommand {
    /// List folders.
    List,

    /// Create a folder.
    Create {
        #[arg(long)]
        name: String,
        /// Parent folder, 0 for the project root.
        #[arg(long, default_value_t = 0)]
        parent_id: u64,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a folder.
    Delete {
        id: u64,
        #[arg(long)]
        confirm: bool,
    },
}

/// Execute the folder subcommand.
pub async fn run_folder(args: &FolderArgs, tools: &ApiDocTools) -> Result<u8> {
    match &args.command {
        FolderCommand::List => emit(tools.list_folders().await),
        FolderCommand::Create {
            name,
            parent_id,
            description,
        } => {
            let req = CreateFolderRequest {
                name: name.clone(),
                parent_id: FolderId(*parent_id),
                description: description.clone(),
            };
            emit(tools.create_folder(req).await)
        }
        FolderCommand::Delete { id, confirm } => {
            emit(tools.delete_folder(FolderId(*id), *confirm).await)
        }
    }
}
