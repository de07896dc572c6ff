//! Folder and tag tools. Pass-through to the service; the rule engine is
//! not involved.

use apidoc_client::{CreateFolderRequest, Folder, Tag};
use apidoc_core::FolderId;

use crate::error::ToolError;
use crate::{ApiDocTools, DeleteOutcome};

impl ApiDocTools {
    /// `list_folders`
    pub async fn list_folders(&self) -> Result<Vec<Folder>, ToolError> {
        tracing::info!("list_folders");
        Ok(self.client.folders().list().await?)
    }

    /// `create_folder`
    pub async fn create_folder(&self, req: CreateFolderRequest) -> Result<Folder, ToolError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(ToolError::InvalidArgument("folder name must not be empty".into()));
        }
        let req = CreateFolderRequest {
            name: name.to_string(),
            description: req.description.trim().to_string(),
            ..req
        };
        tracing::info!(name = %req.name, parent_id = req.parent_id.as_u64(), "create_folder");
        Ok(self.client.folders().create(&req).await?)
    }

    /// `delete_folder`. Without `confirm` nothing is sent.
    pub async fn delete_folder(&self, id: FolderId, confirm: bool) -> Result<DeleteOutcome, ToolError> {
        if id == FolderId::ROOT {
            return Err(ToolError::InvalidArgument("the root folder cannot be deleted".into()));
        }
        let resource = format!("folder {}", id.as_u64());
        if !confirm {
            return Ok(DeleteOutcome::ConfirmationRequired { resource });
        }
        tracing::info!(folder_id = id.as_u64(), "delete_folder");
        self.client.folders().delete(id).await?;
        Ok(DeleteOutcome::Deleted { resource })
    }

    /// `list_tags`
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ToolError> {
        tracing::info!("list_tags");
        Ok(self.client.tags().list().await?)
    }
}
